oxc_index::define_index_type! {
  /// Position of a module in the module graph. This is the numeric module
  /// identifier written into the artifact.
  #[derive(Default)]
  pub struct ModuleIdx = u32;
}

/// Overrides for module resolution. `None` keeps the platform default.
#[derive(Debug, Default, Clone)]
pub struct ResolveOptions {
  /// Extensions tried for specifiers without one, in order. Defaults to `.js`, `.mjs`, `.cjs`.
  pub extensions: Option<Vec<String>>,
  /// File names tried when a specifier points at a directory. Defaults to `index`.
  pub main_files: Option<Vec<String>>,
  /// Extra `exports` conditions, on top of `require` and `default`.
  pub condition_names: Option<Vec<String>>,
  /// Whether to resolve symlinks to their real path. Defaults to `true`.
  pub symlinks: Option<bool>,
}

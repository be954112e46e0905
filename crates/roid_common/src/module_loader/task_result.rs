use crate::{Asset, ResolvedId};

pub struct NormalModuleTaskResult {
  /// The parsed module. Its `specifier_to_idx` is still empty.
  pub module: Asset,
  /// Resolution of each entry of `module.import_specifiers`, in the same order.
  pub resolved_deps: Vec<ResolvedId>,
}

use std::path::Path;

use arcstr::ArcStr;
use roid_utils::path_ext::PathExt;

/// The result of resolving a specifier: the canonical path of an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
  pub id: ArcStr,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into() }
  }

  /// Created for display purposes.
  pub fn debug_id(&self, cwd: &Path) -> String {
    Path::new(self.id.as_str()).relative_slash(cwd)
  }
}

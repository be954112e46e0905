use std::path::Path;

use arcstr::ArcStr;
use roid_utils::path_ext::PathExt;

/// `ModuleId` is the canonical absolute path of a module.
/// - It is the deduplication key of the module graph: one path, one module.
/// - It stays stable for the whole build, unlike the `ModuleIdx`, which is only
///   final once the graph is complete.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn as_path(&self) -> &Path {
    Path::new(self.0.as_str())
  }

  pub fn stabilize(&self, cwd: &Path) -> String {
    self.as_path().relative_slash(cwd)
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

use std::path::Path;

use oxc_index::IndexVec;
use roid_common::{Asset, ModuleIdx};

/// Every module reachable from the entry, entry first. `modules[i].idx == i`
/// and every `specifier_to_idx` value points into `modules`.
#[derive(Debug)]
pub struct ModuleGraph {
  pub modules: IndexVec<ModuleIdx, Asset>,
}

impl ModuleGraph {
  pub fn entry(&self) -> &Asset {
    &self.modules[ModuleIdx::from_usize(0)]
  }

  pub fn get(&self, idx: ModuleIdx) -> Option<&Asset> {
    self.modules.get(idx)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Asset> {
    self.modules.iter()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Looks a module up by its canonical path.
  pub fn idx_of(&self, path: &Path) -> Option<ModuleIdx> {
    self.modules.iter().find(|module| module.id.as_path() == path).map(|module| module.idx)
  }
}

use arcstr::ArcStr;
use roid_utils::indexmap::FxIndexMap;

use crate::{ModuleId, ModuleIdx};

/// One resolved and transformed source file.
#[derive(Debug, Clone)]
pub struct Asset {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// `id` relative to the build cwd, for diagnostics and output comments.
  pub stable_id: String,
  /// Transformed code, after the loader hook ran.
  pub code: String,
  /// Specifiers exactly as written in the source, in source order.
  pub import_specifiers: Vec<ArcStr>,
  /// Filled by the module loader. Keys follow the order of `import_specifiers`.
  pub specifier_to_idx: FxIndexMap<ArcStr, ModuleIdx>,
}

impl Asset {
  pub fn is_entry(&self) -> bool {
    self.idx.raw() == 0
  }

  /// Modules this asset depends on, without duplicates, in specifier order.
  pub fn dependencies(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    let mut seen = Vec::with_capacity(self.specifier_to_idx.len());
    self.specifier_to_idx.values().copied().filter(move |idx| {
      if seen.contains(idx) {
        false
      } else {
        seen.push(*idx);
        true
      }
    })
  }

  /// Whether every import specifier has been mapped to a module.
  pub fn is_fully_linked(&self) -> bool {
    self.import_specifiers.iter().all(|specifier| self.specifier_to_idx.contains_key(specifier))
  }
}

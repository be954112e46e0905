use std::collections::hash_map::Entry;
use std::sync::Arc;

use arcstr::ArcStr;
use oxc_index::IndexVec;
use roid_common::{Asset, ModuleIdx, ModuleLoaderMsg, NormalModuleTaskResult, ResolvedId};
use roid_error::{BuildDiagnostic, BuildResult};
use roid_fs::OsFileSystem;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc::Receiver;

use super::module_task::{ModuleTask, ModuleTaskOwner};
use super::task_context::TaskContext;

use crate::{
  graph::ModuleGraph,
  types::{SharedOptions, SharedResolver},
};

/// Drives the module tasks. It is the only owner of `visited` and of index
/// allocation, so every canonical path is parsed at most once.
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  /// Indexed by provisional index, in spawn order.
  modules: IndexVec<ModuleIdx, Option<Asset>>,
  visited: FxHashMap<ArcStr, ModuleIdx>,
}

impl ModuleLoader {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext { fs, resolver, options, tx });

    Self {
      rx,
      remaining: 0,
      shared_context,
      modules: IndexVec::new(),
      visited: FxHashMap::default(),
    }
  }

  pub async fn fetch_all_modules(mut self, entry: ResolvedId) -> BuildResult<ModuleGraph> {
    let entry_idx = self.try_spawn_new_task(entry, None);

    while self.remaining > 0 {
      let Some(msg) = self.rx.recv().await else {
        break;
      };

      match msg {
        ModuleLoaderMsg::NormalModuleDone(task_result) => {
          let NormalModuleTaskResult { mut module, resolved_deps } = task_result;

          let owner = ArcStr::from(module.stable_id.as_str());
          for (specifier, resolved_id) in module.import_specifiers.iter().zip(resolved_deps) {
            let idx = self.try_spawn_new_task(
              resolved_id,
              Some(ModuleTaskOwner::new(ArcStr::clone(&owner), ArcStr::clone(specifier))),
            );
            module.specifier_to_idx.insert(ArcStr::clone(specifier), idx);
          }

          let module_idx = module.idx;
          self.modules[module_idx] = Some(module);
          self.remaining -= 1;
        }
        ModuleLoaderMsg::BuildErrors(errors) => {
          // Fail fast. Tasks still in flight finish on their own and their
          // messages are dropped together with the receiver.
          return Err(errors.into());
        }
      }
    }

    let modules = self
      .modules
      .into_iter()
      .collect::<Option<IndexVec<ModuleIdx, Asset>>>()
      .ok_or_else(|| anyhow::anyhow!("Module tasks didn't complete as expected"))?;

    Ok(ModuleGraph { modules: renumber_breadth_first(modules, entry_idx) })
  }

  fn try_spawn_new_task(
    &mut self,
    resolved_id: ResolvedId,
    owner: Option<ModuleTaskOwner>,
  ) -> ModuleIdx {
    match self.visited.entry(ArcStr::clone(&resolved_id.id)) {
      Entry::Occupied(visited) => {
        tracing::trace!(id = %visited.key(), "module already scheduled");
        *visited.get()
      }
      Entry::Vacant(not_visited) => {
        let idx = self.modules.push(None);
        self.remaining += 1;

        let id = ArcStr::clone(&resolved_id.id);
        let task = ModuleTask::new(Arc::clone(&self.shared_context), idx, owner, resolved_id);
        let handle = tokio::spawn(task.run());

        // A panicking task never reports back, so report for it.
        let tx = self.shared_context.tx.clone();
        tokio::spawn(async move {
          if let Err(err) = handle.await {
            let diagnostic =
              BuildDiagnostic::Unhandled(anyhow::anyhow!("Module task for {id} failed: {err}"));
            let _ = tx.send(ModuleLoaderMsg::BuildErrors(vec![diagnostic])).await;
          }
        });

        *not_visited.insert(idx)
      }
    }
  }
}

/// Tasks finish in any order, so provisional indices depend on scheduling.
/// Walking the graph breadth-first from the entry, dependencies in specifier
/// order, gives the numbering a sequential worklist would produce.
fn renumber_breadth_first(
  modules: IndexVec<ModuleIdx, Asset>,
  entry: ModuleIdx,
) -> IndexVec<ModuleIdx, Asset> {
  let mut order = Vec::with_capacity(modules.len());
  let mut seen = IndexVec::<ModuleIdx, bool>::from_vec(vec![false; modules.len()]);
  seen[entry] = true;
  order.push(entry);

  let mut cursor = 0;
  while let Some(&idx) = order.get(cursor) {
    cursor += 1;
    for dep in modules[idx].dependencies() {
      if !seen[dep] {
        seen[dep] = true;
        order.push(dep);
      }
    }
  }

  let mut new_idx = IndexVec::<ModuleIdx, ModuleIdx>::from_vec(vec![entry; modules.len()]);
  for (position, old) in order.iter().enumerate() {
    new_idx[*old] = ModuleIdx::from_usize(position);
  }

  let mut slots = modules.into_iter().map(Some).collect::<IndexVec<ModuleIdx, _>>();
  order
    .iter()
    .filter_map(|old| slots[*old].take())
    .map(|mut module| {
      module.idx = new_idx[module.idx];
      module.specifier_to_idx.values_mut().for_each(|idx| *idx = new_idx[*idx]);
      module
    })
    .collect()
}

#[cfg(test)]
fn asset(idx: usize, deps: &[(&str, usize)]) -> Asset {
  Asset {
    idx: ModuleIdx::from_usize(idx),
    id: roid_common::ModuleId::new(format!("/m{idx}.js")),
    stable_id: format!("m{idx}.js"),
    code: String::new(),
    import_specifiers: deps.iter().map(|(specifier, _)| ArcStr::from(*specifier)).collect(),
    specifier_to_idx: deps
      .iter()
      .map(|(specifier, idx)| (ArcStr::from(*specifier), ModuleIdx::from_usize(*idx)))
      .collect(),
  }
}

#[test]
fn test_renumber_breadth_first() {
  // Provisional order as if tasks finished out of order: entry is 2.
  let modules = IndexVec::from_vec(vec![
    asset(0, &[("./c.js", 1)]),
    asset(1, &[("./a.js", 0)]),
    asset(2, &[("./b.js", 3), ("./a.js", 0)]),
    asset(3, &[("./a.js", 0), ("./c.js", 1)]),
  ]);

  let renumbered = renumber_breadth_first(modules, ModuleIdx::from_usize(2));
  let ids = renumbered.iter().map(|module| module.stable_id.as_str()).collect::<Vec<_>>();
  assert_eq!(ids, vec!["m2.js", "m3.js", "m0.js", "m1.js"]);

  for (position, module) in renumbered.iter_enumerated() {
    assert_eq!(module.idx, position);
  }
  let entry = &renumbered[ModuleIdx::from_usize(0)];
  assert_eq!(entry.specifier_to_idx["./b.js"], ModuleIdx::from_usize(1));
  assert_eq!(entry.specifier_to_idx["./a.js"], ModuleIdx::from_usize(2));
  // m0 <-> m1 is a cycle; both edges follow the renumbering.
  assert_eq!(renumbered[ModuleIdx::from_usize(3)].specifier_to_idx["./a.js"], ModuleIdx::from_usize(2));
  assert_eq!(renumbered[ModuleIdx::from_usize(2)].specifier_to_idx["./c.js"], ModuleIdx::from_usize(3));
}

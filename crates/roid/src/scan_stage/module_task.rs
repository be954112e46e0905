use std::sync::Arc;

use arcstr::ArcStr;
use roid_common::{
  Asset, ModuleId, ModuleIdx, ModuleLoaderMsg, NormalModuleTaskResult, ResolvedId,
};
use roid_ecmascript::{EcmaCompiler, TransformReturn};
use roid_error::{BuildDiagnostic, BuildResult, ImportedBy};
use roid_fs::FileSystem;
use roid_utils::indexmap::FxIndexMap;

use super::task_context::TaskContext;
use crate::utils::resolve_id::resolve_id;

/// The import that led the loader to a module.
pub struct ModuleTaskOwner {
  importer_id: ArcStr,
  specifier: ArcStr,
}

impl ModuleTaskOwner {
  pub fn new(importer_id: ArcStr, specifier: ArcStr) -> Self {
    ModuleTaskOwner { importer_id, specifier }
  }
}

/// Turns one resolved path into an [`Asset`]: read, transform, loader hook, then
/// resolution of every import specifier found in the module.
pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  owner: Option<ModuleTaskOwner>,
  resolved_id: ResolvedId,
}

impl ModuleTask {
  pub fn new(
    ctx: Arc<TaskContext>,
    idx: ModuleIdx,
    owner: Option<ModuleTaskOwner>,
    resolved_id: ResolvedId,
  ) -> Self {
    Self { ctx, idx, owner, resolved_id }
  }

  pub async fn run(self) {
    if let Err(errs) = self.run_inner().await {
      // The receiver is gone once another task has aborted the build.
      let _ = self.ctx.tx.send(ModuleLoaderMsg::BuildErrors(errs.0)).await;
    }
  }

  async fn run_inner(&self) -> BuildResult<()> {
    let id = ModuleId::new(ArcStr::clone(&self.resolved_id.id));
    let stable_id = id.stabilize(&self.ctx.options.cwd);

    let source = self.ctx.fs.read_to_string(id.as_path()).map_err(|source| {
      BuildDiagnostic::Read { path: stable_id.clone(), imported_by: self.imported_by(), source }
    })?;

    let TransformReturn { code, import_specifiers } =
      EcmaCompiler::transform(&source, EcmaCompiler::source_type_from_path(id.as_path()))
        .map_err(|err| self.transform_error(&stable_id, err.to_string()))?;

    let code = match &self.ctx.options.loader_hook {
      Some(hook) => hook.load(id.as_path(), code).map_err(|err| {
        self.transform_error(&stable_id, format!("Loader hook '{}' failed: {err}", hook.name()))
      })?,
      None => code,
    };

    let resolved_deps = import_specifiers
      .iter()
      .map(|specifier| {
        resolve_id(&self.ctx.resolver, specifier, Some(&*id), Some(stable_id.as_str()), false)
      })
      .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(module = %stable_id, deps = resolved_deps.len(), "parsed module");

    let result = ModuleLoaderMsg::NormalModuleDone(NormalModuleTaskResult {
      module: Asset {
        idx: self.idx,
        id,
        stable_id,
        code,
        import_specifiers: import_specifiers.into_iter().map(ArcStr::from).collect(),
        specifier_to_idx: FxIndexMap::default(),
      },
      resolved_deps,
    });

    let _ = self.ctx.tx.send(result).await;

    Ok(())
  }

  fn imported_by(&self) -> Option<ImportedBy> {
    self
      .owner
      .as_ref()
      .map(|owner| ImportedBy::new(owner.importer_id.as_str(), owner.specifier.as_str()))
  }

  fn transform_error(&self, stable_id: &str, message: String) -> BuildDiagnostic {
    BuildDiagnostic::Transform {
      path: stable_id.to_string(),
      imported_by: self.imported_by(),
      message,
    }
  }
}

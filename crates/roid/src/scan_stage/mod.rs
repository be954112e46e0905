pub mod module_loader;

mod module_task;
mod task_context;

use std::sync::Arc;

use module_loader::ModuleLoader;

use roid_error::BuildResult;
use roid_fs::OsFileSystem;

use crate::{
  graph::ModuleGraph,
  types::{SharedOptions, SharedResolver},
  utils::resolve_id::resolve_id,
};

pub struct ScanStage {
  fs: OsFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
}

impl ScanStage {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    Self { fs, options, resolver }
  }

  #[tracing::instrument(level = "debug", skip_all, fields(entry = %self.options.input))]
  pub async fn scan(&self) -> BuildResult<ModuleGraph> {
    let entry = resolve_id(&self.resolver, &self.options.input, None, None, true)?;
    tracing::debug!(entry = %entry.debug_id(&self.options.cwd), "resolved entry");

    let module_loader =
      ModuleLoader::new(self.fs, Arc::clone(&self.options), Arc::clone(&self.resolver));
    let graph = module_loader.fetch_all_modules(entry).await?;

    tracing::debug!(modules = graph.len(), "module graph complete");
    Ok(graph)
  }
}

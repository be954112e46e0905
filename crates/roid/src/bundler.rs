use std::sync::Arc;

use anyhow::Context;
use roid_common::{BundlerOptions, NormalizedBundlerOptions};
use roid_error::BuildResult;
use roid_fs::{FileSystem, OsFileSystem};
use roid_resolver::Resolver;

use crate::{
  generate_stage::GenerateStage,
  graph::ModuleGraph,
  scan_stage::ScanStage,
  types::{bundle_output::BundleOutput, SharedOptions, SharedResolver},
  utils::normalize_options::{normalize_options, NormalizeOptionsReturn},
};

pub struct Bundler {
  pub(crate) fs: OsFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> Self {
    let NormalizeOptionsReturn { options, resolve_options } = normalize_options(options);

    let resolver: SharedResolver =
      Resolver::new(resolve_options, options.platform, options.cwd.clone()).into();

    Bundler { fs: OsFileSystem, options: Arc::new(options), resolver }
  }

  pub fn options(&self) -> &NormalizedBundlerOptions {
    &self.options
  }

  /// Discovers, transforms and numbers every module reachable from the entry.
  pub async fn scan(&self) -> BuildResult<ModuleGraph> {
    ScanStage::new(self.fs, Arc::clone(&self.options), Arc::clone(&self.resolver)).scan().await
  }

  /// Builds the artifact in memory.
  pub async fn generate(&self) -> BuildResult<BundleOutput> {
    let graph = self.scan().await?;
    GenerateStage::new(&graph, &self.options).generate()
  }

  /// Builds the artifact and writes it to `cwd/file`.
  pub async fn write(&self) -> BuildResult<BundleOutput> {
    let output = self.generate().await?;

    for asset in &output.assets {
      let path = self.options.cwd.join(asset.filename());
      if let Some(parent) = path.parent() {
        self
          .fs
          .create_dir_all(parent)
          .with_context(|| format!("Could not create directory {}", parent.display()))?;
      }
      self
        .fs
        .write(&path, asset.content_as_bytes())
        .with_context(|| format!("Could not write {}", path.display()))?;
      tracing::debug!(path = %path.display(), "wrote bundle");
    }

    Ok(output)
  }
}

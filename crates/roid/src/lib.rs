mod bundler;
mod generate_stage;
mod graph;
mod scan_stage;
mod types;
mod utils;

pub use crate::{bundler::Bundler, graph::ModuleGraph, types::bundle_output::BundleOutput};
pub use roid_common::*;
pub use roid_error::{BuildDiagnostic, BuildError, BuildResult, ImportedBy};
pub use roid_plugin::{LoaderHook, SharedLoaderHook};

/// Bundles `entry`, resolved against the current directory, and returns the
/// artifact without writing it.
pub async fn build(entry: impl Into<String>) -> BuildResult<String> {
  let bundler = Bundler::new(BundlerOptions { input: Some(entry.into()), ..Default::default() });
  let output = bundler.generate().await?;
  Ok(output.assets.into_iter().map(|asset| asset.content).next().unwrap_or_default())
}

pub mod normalized_bundler_options;
pub mod platform;
pub mod resolve_options;

use std::path::PathBuf;

use roid_plugin::SharedLoaderHook;

use crate::{Platform, ResolveOptions};

#[derive(Default, Debug, Clone)]
pub struct BundlerOptions {
  // --- Input
  /// The entry module. Resolved against `cwd`.
  pub input: Option<String>,
  pub cwd: Option<PathBuf>,
  pub platform: Option<Platform>,

  // --- Output
  /// Where `Bundler::write` puts the artifact, relative to `cwd`.
  pub file: Option<String>,

  // --- Resolve
  pub resolve: Option<ResolveOptions>,

  // --- Hooks
  pub loader_hook: Option<SharedLoaderHook>,
}

use std::path::PathBuf;

use roid_plugin::SharedLoaderHook;

use crate::Platform;

#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub input: String,
  pub cwd: PathBuf,
  pub platform: Platform,

  // --- Output
  pub file: String,

  // --- Hooks
  pub loader_hook: Option<SharedLoaderHook>,
}

impl NormalizedBundlerOptions {
  pub fn output_path(&self) -> PathBuf {
    self.cwd.join(&self.file)
  }
}

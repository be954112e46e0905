use roid_common::{BundlerOptions, NormalizedBundlerOptions, ResolveOptions};
use sugar_path::SugarPath;

pub struct NormalizeOptionsReturn {
  pub options: NormalizedBundlerOptions,
  pub resolve_options: ResolveOptions,
}

pub fn normalize_options(mut raw_options: BundlerOptions) -> NormalizeOptionsReturn {
  let raw_resolve = std::mem::take(&mut raw_options.resolve).unwrap_or_default();

  let cwd = match raw_options.cwd {
    Some(cwd) if cwd.is_absolute() => cwd,
    Some(cwd) => cwd.absolutize(),
    None => std::env::current_dir().expect("Failed to get current dir"),
  };

  let normalized = NormalizedBundlerOptions {
    input: raw_options.input.unwrap_or_else(|| "./index.js".to_string()),
    cwd,
    platform: raw_options.platform.unwrap_or_default(),
    file: raw_options.file.unwrap_or_else(|| "dist/bundle.js".to_string()),
    loader_hook: raw_options.loader_hook,
  };

  NormalizeOptionsReturn { options: normalized, resolve_options: raw_resolve }
}

#[test]
fn test_defaults() {
  use std::path::PathBuf;

  let NormalizeOptionsReturn { options, resolve_options } =
    normalize_options(BundlerOptions { cwd: Some(PathBuf::from("/app")), ..Default::default() });
  assert_eq!(options.input, "./index.js");
  assert_eq!(options.platform, roid_common::Platform::Node);
  assert_eq!(options.output_path(), PathBuf::from("/app/dist/bundle.js"));
  assert!(options.loader_hook.is_none());
  assert!(resolve_options.extensions.is_none());
}

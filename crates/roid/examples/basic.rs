use std::path::PathBuf;
use sugar_path::SugarPath;

use roid::{Bundler, BundlerOptions};

#[tokio::main]
async fn main() {
  let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let root = root.join("examples/basic");

  let bundler = Bundler::new(BundlerOptions {
    input: Some("./entry.js".to_string()),
    cwd: Some(root.normalize()),
    ..Default::default()
  });

  if let Err(errors) = bundler.write().await {
    for error in &*errors {
      eprintln!("{error}");
    }
  }
}

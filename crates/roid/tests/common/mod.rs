#![allow(dead_code)]

use std::{
  path::{Path, PathBuf},
  process::Command,
};

use roid::{Bundler, BundlerOptions};

/// A fixture tree in a temp dir. `cwd` is canonical so that resolved paths and
/// the build cwd agree.
pub struct Fixture {
  _dir: tempfile::TempDir,
  pub cwd: PathBuf,
}

impl Fixture {
  pub fn new(files: &[(&str, &str)]) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().canonicalize().unwrap();
    for (path, content) in files {
      write_file(&cwd.join(path), content.as_bytes());
    }
    Self { _dir: dir, cwd }
  }

  pub fn path(&self, path: &str) -> PathBuf {
    self.cwd.join(path)
  }

  pub fn bundler(&self, input: &str) -> Bundler {
    self.bundler_with(BundlerOptions { input: Some(input.to_string()), ..Default::default() })
  }

  pub fn bundler_with(&self, options: BundlerOptions) -> Bundler {
    Bundler::new(BundlerOptions { cwd: Some(self.cwd.clone()), ..options })
  }

  pub async fn bundle(&self, input: &str) -> String {
    let output = self.bundler(input).generate().await.unwrap();
    assert_eq!(output.assets.len(), 1);
    output.assets.into_iter().next().unwrap().content
  }
}

pub fn write_file(path: &Path, content: &[u8]) {
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, content).unwrap();
}

/// Evaluates `artifact` with node and returns the JSON of the value it evaluates
/// to. `None` when node isn't installed.
pub fn run_with_node(artifact: &str) -> Option<String> {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("bundle.js");
  std::fs::write(&file, artifact).unwrap();

  let script = "const v = require('vm').runInThisContext(require('fs').readFileSync(process.argv[1], 'utf8')); process.stdout.write(JSON.stringify(v));";
  let output = Command::new("node").arg("-e").arg(script).arg(&file).output().ok()?;
  assert!(
    output.status.success(),
    "artifact failed:\n{}\n{}",
    String::from_utf8_lossy(&output.stderr),
    artifact
  );
  Some(String::from_utf8(output.stdout).unwrap())
}

mod common;

use std::{path::Path, sync::Arc};

use common::{write_file, Fixture};
use roid::{BuildDiagnostic, BundlerOptions, ImportedBy};

#[tokio::test]
async fn unresolvable_entry() {
  let fixture = Fixture::new(&[("index.js", "")]);

  let errors = fixture.bundler("./missing.js").scan().await.unwrap_err();
  assert_eq!(errors.len(), 1);
  match errors.first().unwrap() {
    BuildDiagnostic::Resolution { specifier, importer, .. } => {
      assert_eq!(specifier, "./missing.js");
      assert!(importer.is_none());
    }
    other => panic!("unexpected diagnostic: {other}"),
  }
}

#[tokio::test]
async fn unresolvable_dependency_aborts_the_build() {
  let fixture = Fixture::new(&[
    ("index.js", "import './a.js';\n"),
    ("a.js", "import { nope } from './nope.js';\nexport default nope;\n"),
  ]);

  let errors = fixture.bundler("./index.js").generate().await.unwrap_err();
  let diagnostic = errors.first().unwrap();
  assert!(matches!(
    diagnostic,
    BuildDiagnostic::Resolution { specifier, importer: Some(importer), .. }
      if specifier == "./nope.js" && importer == "a.js"
  ));
  assert!(diagnostic.to_string().starts_with("Could not resolve './nope.js' from a.js: "));
}

#[tokio::test]
async fn syntax_error_is_a_transform_error() {
  let fixture = Fixture::new(&[
    ("index.js", "import { broken } from './broken.js';\nconsole.log(broken);\n"),
    ("broken.js", "export const broken = ;\n"),
  ]);

  let errors = fixture.bundler("./index.js").scan().await.unwrap_err();
  match errors.first().unwrap() {
    BuildDiagnostic::Transform { path, imported_by, message } => {
      assert_eq!(path, "broken.js");
      assert_eq!(imported_by.as_ref(), Some(&ImportedBy::new("index.js", "./broken.js")));
      assert!(!message.is_empty());
    }
    other => panic!("unexpected diagnostic: {other}"),
  }
}

#[tokio::test]
async fn non_utf8_source_is_a_read_error() {
  let fixture = Fixture::new(&[("index.js", "require('./binary.js');\n")]);
  write_file(&fixture.path("binary.js"), &[0xff, 0xfe, 0xfd]);

  let errors = fixture.bundler("./index.js").scan().await.unwrap_err();
  match errors.first().unwrap() {
    BuildDiagnostic::Read { path, imported_by, source } => {
      assert_eq!(path, "binary.js");
      assert_eq!(imported_by.as_ref().map(|by| by.importer.as_str()), Some("index.js"));
      assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
    }
    other => panic!("unexpected diagnostic: {other}"),
  }
}

#[tokio::test]
async fn failing_loader_hook_is_a_transform_error() {
  let fixture = Fixture::new(&[("index.js", "require('./a.js');\n"), ("a.js", "exports.a = 1;\n")]);

  let bundler = fixture.bundler_with(BundlerOptions {
    input: Some("./index.js".to_string()),
    loader_hook: Some(Arc::new(|path: &Path, code: String| -> anyhow::Result<String> {
      if path.ends_with("a.js") {
        anyhow::bail!("refusing a.js");
      }
      Ok(code)
    })),
    ..Default::default()
  });

  let errors = bundler.scan().await.unwrap_err();
  match errors.first().unwrap() {
    BuildDiagnostic::Transform { path, message, .. } => {
      assert_eq!(path, "a.js");
      assert_eq!(message, "Loader hook 'anonymous' failed: refusing a.js");
    }
    other => panic!("unexpected diagnostic: {other}"),
  }
}

#[tokio::test]
async fn panicking_module_task_fails_the_build() {
  let fixture = Fixture::new(&[("index.js", "require('./a.js');\n"), ("a.js", "exports.a = 1;\n")]);

  let bundler = fixture.bundler_with(BundlerOptions {
    input: Some("./index.js".to_string()),
    loader_hook: Some(Arc::new(|path: &Path, code: String| -> anyhow::Result<String> {
      assert!(!path.ends_with("a.js"), "hook blew up on a.js");
      Ok(code)
    })),
    ..Default::default()
  });

  let errors = tokio::time::timeout(std::time::Duration::from_secs(10), bundler.scan())
    .await
    .expect("the build hung after a task panicked")
    .unwrap_err();
  match errors.first().unwrap() {
    BuildDiagnostic::Unhandled(err) => {
      let message = err.to_string();
      assert!(message.starts_with("Module task for "), "{message}");
      assert!(message.contains("a.js"), "{message}");
    }
    other => panic!("unexpected diagnostic: {other}"),
  }
}

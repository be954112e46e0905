mod common;

use std::{path::Path, sync::Arc};

use common::{run_with_node, Fixture};
use roid::{BundlerOptions, LoaderHook};

struct Banner;

impl LoaderHook for Banner {
  fn name(&self) -> &str {
    "banner"
  }

  fn load(&self, path: &Path, code: String) -> anyhow::Result<String> {
    let name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    Ok(format!("globalThis.__loaded = (globalThis.__loaded || []).concat({name:?});\n{code}"))
  }
}

#[tokio::test]
async fn loader_hook_rewrites_every_module() {
  let fixture = Fixture::new(&[
    ("index.js", "import { a } from './a.js';\nmodule.exports = { a, loaded: globalThis.__loaded };\n"),
    ("a.js", "export const a = 1;\n"),
  ]);

  let output = fixture
    .bundler_with(BundlerOptions {
      input: Some("./index.js".to_string()),
      loader_hook: Some(Arc::new(Banner)),
      ..Default::default()
    })
    .generate()
    .await
    .unwrap();
  let artifact = &output.assets[0].content;

  assert_eq!(artifact.matches("globalThis.__loaded = ").count(), 2);
  if let Some(result) = run_with_node(artifact) {
    assert_eq!(result, r#"{"a":1,"loaded":["index.js","a.js"]}"#);
  }
}

#[tokio::test]
async fn write_puts_the_artifact_under_cwd() {
  let fixture = Fixture::new(&[("src/index.js", "module.exports = 42;\n")]);

  let bundler = fixture.bundler_with(BundlerOptions {
    input: Some("./src/index.js".to_string()),
    file: Some("out/app.js".to_string()),
    ..Default::default()
  });
  let output = bundler.write().await.unwrap();

  let written = std::fs::read_to_string(fixture.path("out/app.js")).unwrap();
  assert_eq!(written, output.assets[0].content);
  assert_eq!(output.assets[0].filename(), "out/app.js");
}

#[tokio::test]
async fn constant_entry_evaluates_to_its_exports() {
  let fixture = Fixture::new(&[("index.js", "export const answer = 42;\n")]);
  let artifact = fixture.bundle("./index.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#"{"answer":42}"#);
  }
}

#[tokio::test]
async fn cycle_sees_partial_exports() {
  let fixture = Fixture::new(&[
    (
      "a.js",
      "exports.early = 'a-early';\nconst b = require('./b.js');\nexports.late = 'a-late';\nmodule.exports.seenByB = b.seen;\n",
    ),
    ("b.js", "const a = require('./a.js');\nexports.seen = Object.keys(a);\n"),
  ]);
  let artifact = fixture.bundle("./a.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#"{"early":"a-early","late":"a-late","seenByB":["early"]}"#);
  }
}

#[tokio::test]
async fn esm_cycle_keeps_live_bindings() {
  let fixture = Fixture::new(&[
    ("a.js", "import { getA } from './b.js';\nexport let value = 'initial';\nvalue = 'updated';\nexport default getA();\n"),
    ("b.js", "import { value } from './a.js';\nexport function getA() { return value; }\n"),
  ]);
  let artifact = fixture.bundle("./a.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#"{"value":"updated","default":"updated"}"#);
  }
}

#[tokio::test]
async fn re_require_returns_the_cached_exports() {
  let fixture = Fixture::new(&[
    (
      "index.js",
      "const first = require('./counter.js');\nconst second = require('./counter');\nmodule.exports = { same: first === second, runs: first.runs };\n",
    ),
    ("counter.js", "globalThis.__runs = (globalThis.__runs || 0) + 1;\nexports.runs = globalThis.__runs;\n"),
  ]);
  let artifact = fixture.bundle("./index.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#"{"same":true,"runs":1}"#);
  }
}

#[tokio::test]
async fn esm_and_commonjs_interop() {
  let fixture = Fixture::new(&[
    (
      "index.js",
      "import greet, { punctuation } from './greet.cjs';\nimport * as all from './all.js';\nexport { quiet } from './all.js';\nexport const message = greet('roid') + punctuation;\nexport const keys = Object.keys(all).sort();\nexport const loud = all.shout('hi');\n",
    ),
    ("greet.cjs", "module.exports = function (name) { return 'hello ' + name; };\nmodule.exports.punctuation = '!';\n"),
    ("all.js", "export * from './shout.js';\nexport const quiet = 'quiet';\n"),
    ("shout.js", "export const shout = (s) => s.toUpperCase();\nexport default 'ignored by export *';\n"),
  ]);
  let artifact = fixture.bundle("./index.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(
      result,
      r#"{"quiet":"quiet","message":"hello roid!","keys":["quiet","shout"],"loud":"HI"}"#
    );
  }
}

#[tokio::test]
async fn imports_are_available_above_their_declaration() {
  let fixture = Fixture::new(&[
    ("index.js", "export const v = name;\nimport { name } from './n.js';\n"),
    ("n.js", "export const name = 'n';\n"),
  ]);
  let artifact = fixture.bundle("./index.js").await;

  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#"{"v":"n"}"#);
  }
}

#[tokio::test]
async fn unmapped_specifier_throws_at_runtime() {
  let fixture = Fixture::new(&[("index.js", "module.exports = { ok: true };\n")]);

  // Injected after the transform, so the specifier never enters the module's mapping.
  let output = fixture
    .bundler_with(BundlerOptions {
      input: Some("./index.js".to_string()),
      loader_hook: Some(Arc::new(|_: &Path, code: String| -> anyhow::Result<String> {
        Ok(format!(
          "{code}try {{ require('./nope'); }} catch (err) {{ module.exports.error = err.message; }}\n"
        ))
      })),
      ..Default::default()
    })
    .generate()
    .await
    .unwrap();
  let artifact = &output.assets[0].content;

  if let Some(result) = run_with_node(artifact) {
    assert_eq!(result, r#"{"ok":true,"error":"Cannot find module './nope' required by module 0"}"#);
  }
}

#[tokio::test]
async fn unknown_module_id_throws_at_runtime() {
  let fixture = Fixture::new(&[("index.js", "module.exports = 1;\n")]);
  let artifact = fixture.bundle("./index.js").await;

  let artifact = artifact.replace(
    "return require(0);",
    "try { return require(7); } catch (err) { return err.message; }",
  );
  if let Some(result) = run_with_node(&artifact) {
    assert_eq!(result, r#""Cannot find module with id 7""#);
  }
}

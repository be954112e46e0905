mod common;

use common::Fixture;
use roid::ModuleIdx;

fn idx(raw: usize) -> ModuleIdx {
  ModuleIdx::from_usize(raw)
}

#[tokio::test]
async fn entry_is_zero_and_diamond_is_deduplicated() {
  let fixture = Fixture::new(&[
    ("index.js", "import { a } from './a.js';\nimport { b } from './b';\nexport default a + b;\n"),
    ("a.js", "import { c } from './shared/c.js';\nexport const a = c + 1;\n"),
    ("b.js", "const { c } = require('./shared/c');\nexports.b = c + 2;\n"),
    ("shared/c.js", "export const c = 1;\n"),
  ]);

  let graph = fixture.bundler("./index.js").scan().await.unwrap();

  assert_eq!(graph.len(), 4);
  assert_eq!(graph.entry().stable_id, "index.js");
  assert!(graph.entry().is_entry());
  let ids = graph.iter().map(|module| module.stable_id.as_str()).collect::<Vec<_>>();
  assert_eq!(ids, vec!["index.js", "a.js", "b.js", "shared/c.js"]);

  let a = graph.get(idx(1)).unwrap();
  let b = graph.get(idx(2)).unwrap();
  assert_eq!(a.specifier_to_idx["./shared/c.js"], idx(3));
  assert_eq!(b.specifier_to_idx["./shared/c"], idx(3));
  assert_eq!(graph.idx_of(&fixture.path("shared/c.js")), Some(idx(3)));
}

#[tokio::test]
async fn identifiers_are_unique_and_graph_is_closed() {
  let fixture = Fixture::new(&[
    ("src/main.js", "import './lib';\nimport { x } from './lib/x.js';\nrequire('./lib/index.js');\nconsole.log(x);\n"),
    ("src/lib/index.js", "export * from './x.js';\nexport * from './y.js';\n"),
    ("src/lib/x.js", "export const x = 1;\n"),
    ("src/lib/y.js", "import { x } from './x.js';\nexport const y = x;\n"),
  ]);

  let graph = fixture.bundler("./src/main.js").scan().await.unwrap();
  assert_eq!(graph.len(), 4);

  let mut paths = graph.iter().map(|module| module.id.to_string()).collect::<Vec<_>>();
  paths.sort();
  paths.dedup();
  assert_eq!(paths.len(), graph.len());

  for (position, module) in graph.modules.iter_enumerated() {
    assert_eq!(module.idx, position);
    assert!(module.is_fully_linked(), "{} has unmapped specifiers", module.stable_id);
    for target in module.specifier_to_idx.values() {
      assert!(graph.get(*target).is_some());
    }
  }

  // './lib' and './lib/index.js' are two specifiers for one module.
  let main = graph.entry();
  assert_eq!(main.import_specifiers, vec!["./lib", "./lib/x.js", "./lib/index.js"]);
  assert_eq!(main.specifier_to_idx["./lib"], main.specifier_to_idx["./lib/index.js"]);
  assert_eq!(main.dependencies().count(), 2);
}

#[tokio::test]
async fn cycle_terminates_with_two_modules() {
  let fixture = Fixture::new(&[
    ("a.js", "import { b } from './b.js';\nexport const a = 'a';\nexport function getB() { return b; }\n"),
    ("b.js", "import { a } from './a.js';\nexport const b = 'b';\nexport function getA() { return a; }\n"),
  ]);

  let graph = fixture.bundler("./a.js").scan().await.unwrap();

  assert_eq!(graph.len(), 2);
  let a = graph.entry();
  let b = graph.get(idx(1)).unwrap();
  assert_eq!(a.stable_id, "a.js");
  assert_eq!(b.stable_id, "b.js");
  assert_eq!(a.specifier_to_idx["./b.js"], idx(1));
  assert_eq!(b.specifier_to_idx["./a.js"], idx(0));
}

#[tokio::test]
async fn self_import_maps_to_itself() {
  let fixture = Fixture::new(&[("index.js", "import * as self from './index.js';\nexport const me = () => self;\n")]);

  let graph = fixture.bundler("index.js").scan().await.unwrap();
  assert_eq!(graph.len(), 1);
  assert_eq!(graph.entry().specifier_to_idx["./index.js"], idx(0));
}

#[tokio::test]
async fn node_modules_packages_are_bundled() {
  let fixture = Fixture::new(&[
    ("index.js", "const pkg = require('pkg');\nmodule.exports = pkg;\n"),
    ("node_modules/pkg/package.json", r#"{ "name": "pkg", "main": "./lib/main.js" }"#),
    ("node_modules/pkg/lib/main.js", "module.exports = 'pkg';\n"),
  ]);

  let graph = fixture.bundler("./index.js").scan().await.unwrap();
  assert_eq!(graph.len(), 2);
  assert_eq!(graph.get(idx(1)).unwrap().stable_id, "node_modules/pkg/lib/main.js");
}

#[tokio::test]
async fn output_is_deterministic() {
  let mut files = vec![("index.js".to_string(), String::new())];
  let mut entry = String::new();
  for i in 0..24 {
    entry.push_str(&format!("import {{ v{i} }} from './m{i}.js';\n"));
    files.push((format!("m{i}.js"), format!("import './m{}.js';\nexport const v{i} = {i};\n", (i + 7) % 24)));
  }
  files[0].1 = entry;
  let files = files.iter().map(|(path, code)| (path.as_str(), code.as_str())).collect::<Vec<_>>();
  let fixture = Fixture::new(&files);

  let first = fixture.bundle("./index.js").await;
  for _ in 0..4 {
    assert_eq!(fixture.bundle("./index.js").await, first);
  }

  assert!(first.starts_with("(function (modules) {"));
  assert!(first.contains("/* index.js */\n0: [function (require, module, exports) {\n"));
  assert!(first.contains("/* m0.js */\n1: [function (require, module, exports) {\n"));
  assert!(first.contains("}, {\"./m7.js\": 8}],"));
  assert!(first.trim_end().ends_with("});"));
}

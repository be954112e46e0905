use roid_common::{Asset, OutputAsset, SourceJoiner};
use roid_error::BuildResult;
use roid_utils::ecmascript::to_string_literal;

use crate::{
  graph::ModuleGraph,
  types::{bundle_output::BundleOutput, SharedOptions},
};

const RUNTIME_LOADER: &str = include_str!("./runtime/loader.js");
const MODULE_TABLE_PLACEHOLDER: &str = "/*#__ROID_MODULE_TABLE__*/";

pub struct GenerateStage<'a> {
  graph: &'a ModuleGraph,
  options: &'a SharedOptions,
}

impl<'a> GenerateStage<'a> {
  pub fn new(graph: &'a ModuleGraph, options: &'a SharedOptions) -> Self {
    Self { graph, options }
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub fn generate(&self) -> BuildResult<BundleOutput> {
    let content = self.render_bundle()?;
    tracing::debug!(file = %self.options.file, bytes = content.len(), "rendered bundle");

    Ok(BundleOutput {
      assets: vec![OutputAsset { filename: self.options.file.clone(), content }],
    })
  }

  /// The module table spliced into the runtime loader, one entry per module
  /// in graph order.
  fn render_bundle(&self) -> BuildResult<String> {
    let (head, tail) = RUNTIME_LOADER
      .split_once(MODULE_TABLE_PLACEHOLDER)
      .ok_or_else(|| anyhow::anyhow!("Runtime loader has no module table placeholder"))?;

    let mut joiner = SourceJoiner::default();
    self.graph.iter().for_each(|module| joiner.append_source(render_module_entry(module)));
    joiner.prepend_source(Box::new(head.trim_end()));
    joiner.append_source(tail.trim_start());

    Ok(joiner.join())
  }
}

/// ```js
/// /* src/a.js */
/// 1: [function (require, module, exports) {
/// ...
/// }, {"./b.js": 2}],
/// ```
fn render_module_entry(module: &Asset) -> String {
  let mut buffer = itoa::Buffer::new();

  let mut entry = String::with_capacity(module.code.len() + 128);
  entry.push_str("/* ");
  entry.push_str(&module.stable_id.replace("*/", "*\\/"));
  entry.push_str(" */\n");
  entry.push_str(buffer.format(module.idx.raw()));
  entry.push_str(": [function (require, module, exports) {\n");
  entry.push_str(&module.code);
  if !module.code.ends_with('\n') {
    entry.push('\n');
  }
  entry.push_str("}, {");
  for (index, (specifier, idx)) in module.specifier_to_idx.iter().enumerate() {
    if index > 0 {
      entry.push_str(", ");
    }
    entry.push_str(&to_string_literal(specifier));
    entry.push_str(": ");
    entry.push_str(buffer.format(idx.raw()));
  }
  entry.push_str("}],");
  entry
}

#[test]
fn test_render_module_entry() {
  use arcstr::ArcStr;
  use roid_common::{ModuleId, ModuleIdx};

  let module = Asset {
    idx: ModuleIdx::from_usize(1),
    id: ModuleId::new("/app/src/a.js"),
    stable_id: "src/a.js".to_string(),
    code: "exports.b = require(\"./b\");".to_string(),
    import_specifiers: vec![ArcStr::from("./b"), ArcStr::from("pkg/\"quoted\"")],
    specifier_to_idx: [
      (ArcStr::from("./b"), ModuleIdx::from_usize(2)),
      (ArcStr::from("pkg/\"quoted\""), ModuleIdx::from_usize(10)),
    ]
    .into_iter()
    .collect(),
  };

  assert_eq!(
    render_module_entry(&module),
    "/* src/a.js */\n1: [function (require, module, exports) {\nexports.b = require(\"./b\");\n}, {\"./b\": 2, \"pkg/\\\"quoted\\\"\": 10}],"
  );
}

#[test]
fn test_runtime_loader_has_placeholder() {
  assert_eq!(RUNTIME_LOADER.matches(MODULE_TABLE_PLACEHOLDER).count(), 1);
  assert!(RUNTIME_LOADER.contains("return require(0);"));
}

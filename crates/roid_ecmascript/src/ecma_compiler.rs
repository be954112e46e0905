use std::{ffi::OsStr, path::Path};

use itertools::Itertools;
use oxc::{
  allocator::Allocator,
  parser::{ParseOptions, Parser, ParserReturn},
  semantic::SemanticBuilder,
  span::SourceType,
};

use crate::module_rewriter::ModuleRewriter;

pub struct TransformReturn {
  /// Code that runs inside a `function (require, module, exports) { ... }` wrapper.
  pub code: String,
  /// Static specifiers in source order, without duplicates.
  pub import_specifiers: Vec<String>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn source_type_from_path(path: &Path) -> SourceType {
    let default = SourceType::default().with_module(true);
    match path.extension().and_then(OsStr::to_str) {
      Some("cjs") => default.with_module(false),
      _ => default,
    }
  }

  pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    source_type: SourceType,
  ) -> ParserReturn<'a> {
    // Module bodies end up inside a function, so a top-level `return` is fine.
    let options = ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() };
    Parser::new(allocator, source, source_type).with_options(options).parse()
  }

  /// Rewrites ES module syntax into `require`/`exports` calls and collects the
  /// static import specifiers of `source`.
  pub fn transform(source: &str, source_type: SourceType) -> anyhow::Result<TransformReturn> {
    let allocator = Allocator::default();

    let mut ret = Self::parse(&allocator, source, source_type);
    if Self::has_errors(&ret) && source_type.is_module() {
      // Plain CommonJS files may use sloppy-mode syntax, which module goal rejects.
      let script_ret = Self::parse(&allocator, source, source_type.with_module(false));
      if !Self::has_errors(&script_ret) {
        ret = script_ret;
      }
    }

    if Self::has_errors(&ret) {
      if ret.errors.is_empty() {
        anyhow::bail!("Unrecoverable syntax error");
      }
      anyhow::bail!("{}", ret.errors.iter().map(ToString::to_string).join("; "));
    }

    let semantic = SemanticBuilder::new().build(&ret.program).semantic;

    Ok(ModuleRewriter::new(source, &semantic).rewrite(&ret.program))
  }

  fn has_errors(ret: &ParserReturn<'_>) -> bool {
    ret.panicked || !ret.errors.is_empty()
  }
}

#[test]
fn basic_test() {
  let source = "import { name } from \"./name.js\";\nconsole.log(name);\n";
  let ret = EcmaCompiler::transform(source, SourceType::default().with_module(true)).unwrap();
  assert_eq!(ret.code, "\"use strict\";\nvar _name = require(\"./name.js\");\nconsole.log(_name.name);\n");
  assert_eq!(ret.import_specifiers, vec!["./name.js".to_string()]);
}

#[test]
fn test_syntax_error() {
  let source_type = SourceType::default().with_module(true);
  let err = EcmaCompiler::transform("const = 1;", source_type).err().unwrap();
  assert!(!err.to_string().is_empty());

  let err = EcmaCompiler::transform("import { from './a.js';", source_type).err();
  assert!(err.is_some());
}

#[test]
fn test_top_level_return_and_sloppy_scripts() {
  let source_type = SourceType::default().with_module(true);
  let ret = EcmaCompiler::transform("module.exports = 42;\nreturn;\n", source_type).unwrap();
  assert_eq!(ret.code, "module.exports = 42;\nreturn;\n");
  assert!(ret.import_specifiers.is_empty());

  // `with` is only valid in sloppy mode.
  let ret = EcmaCompiler::transform("with (Math) { exports.pi = PI; }", source_type).unwrap();
  assert_eq!(ret.code, "with (Math) { exports.pi = PI; }");
}

#[test]
fn test_source_type_from_path() {
  assert!(EcmaCompiler::source_type_from_path(Path::new("/a/b.js")).is_module());
  assert!(EcmaCompiler::source_type_from_path(Path::new("/a/b.mjs")).is_module());
  assert!(!EcmaCompiler::source_type_from_path(Path::new("/a/b.cjs")).is_module());
}

use std::path::Path;

use oxc::{
  ast::{
    ast::{
      Argument, BindingIdentifier, ExportAllDeclaration, ExportDefaultDeclaration,
      ExportDefaultDeclarationKind, ExportNamedDeclaration, Expression, ImportDeclaration,
      ImportDeclarationSpecifier, Program, Statement,
    },
    AstKind,
  },
  semantic::{Semantic, SymbolId},
  span::{GetSpan, Span},
};
use oxc_ecmascript::BoundNames;
use roid_utils::{
  ecmascript::{is_validate_identifier_name, legitimize_identifier_name, to_string_literal},
  indexmap::FxIndexSet,
  path_ext::PathExt,
};
use rustc_hash::{FxHashMap, FxHashSet};
use string_wizard::MagicString;

use crate::TransformReturn;

const INTEROP_REQUIRE_DEFAULT: &str = "_interopRequireDefault";
const EXPORT_STAR: &str = "_exportStar";

/// Rewrites one ES module into the CommonJS shape the runtime loader expects.
///
/// Imports become `var _dep = require("dep")` and every reference to an imported
/// binding is rewritten to a member access on `_dep`, so bindings stay live.
/// Exports become getters on `exports`, declared ahead of the module body, and
/// the `require` calls follow them, so imports behave as hoisted.
pub struct ModuleRewriter<'me, 'ast> {
  source: &'me str,
  semantic: &'me Semantic<'ast>,
  magic: MagicString<'me>,
  used_names: FxHashSet<String>,
  /// specifier -> binding holding `require(specifier)`
  require_bindings: FxHashMap<String, String>,
  /// specifier -> binding holding `_interopRequireDefault(require(specifier))`
  interop_bindings: FxHashMap<String, String>,
  /// imported symbol -> expression that replaces its references
  import_bindings: FxHashMap<SymbolId, String>,
  import_binding_names: FxHashMap<String, String>,
  /// (exported name, expression returned by the getter)
  exports: Vec<(String, String)>,
  /// `require` bindings and `export *` copies, in source order
  hoisted: String,
  import_records: Vec<(u32, String)>,
  replaced_spans: Vec<Span>,
  is_esm: bool,
  has_exports: bool,
  interop_name: Option<String>,
  export_star_name: Option<String>,
}

impl<'me, 'ast: 'me> ModuleRewriter<'me, 'ast> {
  pub fn new(source: &'me str, semantic: &'me Semantic<'ast>) -> Self {
    Self {
      source,
      semantic,
      magic: MagicString::new(source),
      used_names: FxHashSet::default(),
      require_bindings: FxHashMap::default(),
      interop_bindings: FxHashMap::default(),
      import_bindings: FxHashMap::default(),
      import_binding_names: FxHashMap::default(),
      exports: Vec::new(),
      hoisted: String::new(),
      import_records: Vec::new(),
      replaced_spans: Vec::new(),
      is_esm: false,
      has_exports: false,
      interop_name: None,
      export_star_name: None,
    }
  }

  pub fn rewrite(mut self, program: &'me Program<'ast>) -> TransformReturn {
    if let Some(hashbang) = &program.hashbang {
      self.magic.remove(hashbang.span.start as usize, hashbang.span.end as usize);
    }

    // Everything that requires a dependency is hoisted, in source order.
    for stmt in &program.body {
      match stmt {
        Statement::ImportDeclaration(decl) => self.rewrite_import_declaration(decl),
        Statement::ExportNamedDeclaration(decl) if decl.source.is_some() => {
          self.rewrite_export_named_declaration(decl);
        }
        Statement::ExportAllDeclaration(decl) => self.rewrite_export_all_declaration(decl),
        _ => {}
      }
    }

    // Imports are hoisted, so `export { x }` may precede `import { x }`.
    for stmt in &program.body {
      match stmt {
        Statement::ExportNamedDeclaration(decl) if decl.source.is_none() => {
          self.rewrite_export_named_declaration(decl);
        }
        Statement::ExportDefaultDeclaration(decl) => self.rewrite_export_default_declaration(decl),
        _ => {}
      }
    }

    let SpanSets { shorthand_spans, callee_spans } = self.scan_nodes();
    self.rewrite_import_references(&shorthand_spans, &callee_spans);

    let prologue = self.render_prologue();
    if !prologue.is_empty() {
      self.magic.prepend(prologue);
    }

    self.import_records.sort_by_key(|(start, _)| *start);
    let import_specifiers = self
      .import_records
      .into_iter()
      .map(|(_, specifier)| specifier)
      .collect::<FxIndexSet<_>>()
      .into_iter()
      .collect();

    TransformReturn { code: self.magic.to_string(), import_specifiers }
  }

  fn rewrite_import_declaration(&mut self, decl: &ImportDeclaration<'ast>) {
    self.is_esm = true;
    if decl.import_kind.is_type() {
      self.replace(decl.span, String::new());
      return;
    }

    let specifier = decl.source.value.as_str();
    self.import_records.push((decl.span.start, specifier.to_string()));

    let binding = self.require_binding(specifier);

    for import in decl.specifiers.iter().flatten() {
      match import {
        ImportDeclarationSpecifier::ImportSpecifier(import) => {
          let expr = member_access(&binding, &import.imported.name().to_string());
          self.bind_import(&import.local, expr);
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(import) => {
          let interop = self.interop_binding(specifier, &binding);
          self.bind_import(&import.local, format!("{interop}.default"));
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(import) => {
          self.bind_import(&import.local, binding.clone());
        }
      }
    }

    self.replace(decl.span, String::new());
  }

  fn rewrite_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'ast>) {
    self.is_esm = true;
    if decl.export_kind.is_type() {
      self.replace(decl.span, String::new());
      return;
    }
    self.has_exports = true;

    if let Some(source) = &decl.source {
      // export { a as b } from "./dep"
      let specifier = source.value.as_str();
      self.import_records.push((decl.span.start, specifier.to_string()));

      let binding = self.require_binding(specifier);
      for export in &decl.specifiers {
        let expr = member_access(&binding, &export.local.name().to_string());
        self.exports.push((export.exported.name().to_string(), expr));
      }
      self.replace(decl.span, String::new());
    } else if let Some(declaration) = &decl.declaration {
      // export const a = 1;
      self.magic.remove(decl.span.start as usize, declaration.span().start as usize);
      let mut names = vec![];
      declaration.bound_names(&mut |ident: &BindingIdentifier| names.push(ident.name.to_string()));
      self.exports.extend(names.into_iter().map(|name| (name.clone(), name)));
    } else {
      // export { a as b }
      for export in &decl.specifiers {
        let local = export.local.name().to_string();
        let expr = self.import_binding_names.get(&local).cloned().unwrap_or(local);
        self.exports.push((export.exported.name().to_string(), expr));
      }
      self.replace(decl.span, String::new());
    }
  }

  fn rewrite_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'ast>) {
    self.is_esm = true;
    self.has_exports = true;

    let declaration_start = decl.declaration.span().start as usize;
    match &decl.declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) if func.id.is_some() => {
        let name = func.id.as_ref().map(|id| id.name.to_string()).unwrap_or_default();
        self.magic.remove(decl.span.start as usize, declaration_start);
        self.exports.push(("default".to_string(), name));
      }
      ExportDefaultDeclarationKind::ClassDeclaration(class) if class.id.is_some() => {
        let name = class.id.as_ref().map(|id| id.name.to_string()).unwrap_or_default();
        self.magic.remove(decl.span.start as usize, declaration_start);
        self.exports.push(("default".to_string(), name));
      }
      ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {
        self.replace(decl.span, String::new());
      }
      ExportDefaultDeclarationKind::FunctionDeclaration(_)
      | ExportDefaultDeclarationKind::ClassDeclaration(_) => {
        // Anonymous declarations turn into expressions and need a terminator.
        self.magic.update(decl.span.start as usize, declaration_start, "exports.default = ");
        self.magic.append_left(decl.span.end as usize, ";");
      }
      _ => {
        self.magic.update(decl.span.start as usize, declaration_start, "exports.default = ");
      }
    }
  }

  fn rewrite_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'ast>) {
    self.is_esm = true;
    if decl.export_kind.is_type() {
      self.replace(decl.span, String::new());
      return;
    }
    self.has_exports = true;

    let specifier = decl.source.value.as_str();
    self.import_records.push((decl.span.start, specifier.to_string()));

    let binding = self.require_binding(specifier);
    match &decl.exported {
      // export * as ns from "./dep"
      Some(exported) => self.exports.push((exported.name().to_string(), binding)),
      // export * from "./dep"
      None => {
        let export_star = self.export_star_name();
        self.hoisted.push_str(&format!("{export_star}(exports, {binding});\n"));
      }
    }
    self.replace(decl.span, String::new());
  }

  /// Collects `require("literal")` calls plus the spans that need special care when
  /// an imported binding is rewritten into a member expression.
  fn scan_nodes(&mut self) -> SpanSets {
    let mut sets = SpanSets::default();
    for node in self.semantic.nodes().iter() {
      match node.kind() {
        AstKind::ObjectProperty(prop) if prop.shorthand => {
          sets.shorthand_spans.insert(prop.value.span());
        }
        AstKind::CallExpression(call) => {
          let Expression::Identifier(callee) = &call.callee else {
            continue;
          };
          sets.callee_spans.insert(callee.span);

          if callee.name.as_str() == "require" && call.arguments.len() == 1 {
            if let Argument::StringLiteral(request) = &call.arguments[0] {
              self.import_records.push((call.span.start, request.value.to_string()));
            }
          }
        }
        _ => {}
      }
    }
    sets
  }

  fn rewrite_import_references(
    &mut self,
    shorthand_spans: &FxHashSet<Span>,
    callee_spans: &FxHashSet<Span>,
  ) {
    let semantic = self.semantic;
    let mut edits = vec![];
    for (symbol_id, expr) in &self.import_bindings {
      for reference in semantic.symbol_references(*symbol_id) {
        let AstKind::IdentifierReference(ident) = semantic.nodes().kind(reference.node_id()) else {
          continue;
        };
        if self.is_replaced(ident.span) {
          continue;
        }
        let replacement = if shorthand_spans.contains(&ident.span) {
          format!("{}: {expr}", ident.name)
        } else if callee_spans.contains(&ident.span) {
          // Keep `this` undefined inside the imported function.
          format!("(0, {expr})")
        } else {
          expr.clone()
        };
        edits.push((ident.span, replacement));
      }
    }

    for (span, replacement) in edits {
      self.magic.update(span.start as usize, span.end as usize, replacement);
    }
  }

  fn render_prologue(&self) -> String {
    let mut prologue = String::new();
    if self.is_esm {
      prologue.push_str("\"use strict\";\n");
    }
    if self.has_exports {
      prologue.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
    }
    for (exported, expr) in &self.exports {
      prologue.push_str(&format!(
        "Object.defineProperty(exports, {}, {{ enumerable: true, get: function () {{ return {expr}; }} }});\n",
        to_string_literal(exported)
      ));
    }
    if let Some(interop) = &self.interop_name {
      prologue.push_str(&format!(
        "function {interop}(obj) {{ return obj && obj.__esModule ? obj : {{ default: obj }}; }}\n"
      ));
    }
    if let Some(export_star) = &self.export_star_name {
      prologue.push_str(&format!(
        "function {export_star}(target, source) {{ Object.keys(source).forEach(function (key) {{ if (key === \"default\" || key === \"__esModule\" || Object.prototype.hasOwnProperty.call(target, key)) return; Object.defineProperty(target, key, {{ enumerable: true, get: function () {{ return source[key]; }} }}); }}); }}\n"
      ));
    }
    prologue.push_str(&self.hoisted);
    prologue
  }

  /// Returns the binding holding `require(specifier)`, hoisting its declaration
  /// the first time the specifier is seen.
  fn require_binding(&mut self, specifier: &str) -> String {
    if let Some(binding) = self.require_bindings.get(specifier) {
      return binding.clone();
    }
    let repr_name = Path::new(specifier).representative_file_name();
    let binding = self.generate_name(&format!("_{}", legitimize_identifier_name(&repr_name)));
    self.hoisted.push_str(&format!("var {binding} = require({});\n", to_string_literal(specifier)));
    self.require_bindings.insert(specifier.to_string(), binding.clone());
    binding
  }

  fn interop_binding(&mut self, specifier: &str, binding: &str) -> String {
    if let Some(interop) = self.interop_bindings.get(specifier) {
      return interop.clone();
    }
    let helper = match &self.interop_name {
      Some(helper) => helper.clone(),
      None => {
        let helper = self.generate_name(INTEROP_REQUIRE_DEFAULT);
        self.interop_name = Some(helper.clone());
        helper
      }
    };
    let interop = self.generate_name(binding);
    self.hoisted.push_str(&format!("var {interop} = {helper}({binding});\n"));
    self.interop_bindings.insert(specifier.to_string(), interop.clone());
    interop
  }

  fn export_star_name(&mut self) -> String {
    if let Some(name) = &self.export_star_name {
      return name.clone();
    }
    let name = self.generate_name(EXPORT_STAR);
    self.export_star_name = Some(name.clone());
    name
  }

  /// Picks a name that appears nowhere in the source and wasn't generated before.
  fn generate_name(&mut self, base: &str) -> String {
    let mut name = base.to_string();
    let mut count = 1;
    while !is_validate_identifier_name(&name)
      || self.source.contains(name.as_str())
      || self.used_names.contains(&name)
    {
      count += 1;
      name = format!("{base}{count}");
    }
    self.used_names.insert(name.clone());
    name
  }

  fn bind_import(&mut self, local: &BindingIdentifier<'ast>, expr: String) {
    if let Some(symbol_id) = local.symbol_id.get() {
      self.import_bindings.insert(symbol_id, expr.clone());
    }
    self.import_binding_names.insert(local.name.to_string(), expr);
  }

  fn replace(&mut self, span: Span, content: String) {
    if content.is_empty() {
      self.magic.remove(span.start as usize, span.end as usize);
    } else {
      self.magic.update(span.start as usize, span.end as usize, content);
    }
    self.replaced_spans.push(span);
  }

  fn is_replaced(&self, span: Span) -> bool {
    self.replaced_spans.iter().any(|replaced| replaced.start <= span.start && span.end <= replaced.end)
  }
}

#[derive(Default)]
struct SpanSets {
  shorthand_spans: FxHashSet<Span>,
  callee_spans: FxHashSet<Span>,
}

fn member_access(object: &str, property: &str) -> String {
  if is_validate_identifier_name(property) {
    format!("{object}.{property}")
  } else {
    format!("{object}[{}]", to_string_literal(property))
  }
}

#[cfg(test)]
fn transform(source: &str) -> TransformReturn {
  crate::EcmaCompiler::transform(source, oxc::span::SourceType::default().with_module(true))
    .unwrap()
}

#[test]
fn test_import_specifiers_in_source_order() {
  let ret = transform(
    r#"import msg from "./message.js";
export { name } from "./name.js";
const util = require("./util.cjs");
export * from "./all.js";
import "./side-effect.js";
import { name as again } from "./name.js";
console.log(msg, util, again);
"#,
  );
  assert_eq!(
    ret.import_specifiers,
    vec!["./message.js", "./name.js", "./util.cjs", "./all.js", "./side-effect.js"]
  );
}

#[test]
fn test_rewrite_imports() {
  let ret = transform(
    r#"import message, { name, "quoted-name" as quoted } from "./message.js";
import * as ns from "./ns.js";
import "./side-effect.js";
const o = { name };
name();
console.log(message(), ns.value, quoted);
function shadow(name) { return name; }
"#,
  );
  let code = ret.code;
  assert!(code.starts_with("\"use strict\";\nfunction _interopRequireDefault(obj)"));
  assert!(code.contains("var _message = require(\"./message.js\");\nvar _message2 = _interopRequireDefault(_message);"));
  assert!(code.contains("var _ns = require(\"./ns.js\");"));
  assert!(code.contains("var _side_effect = require(\"./side-effect.js\");"));
  assert!(code.contains("const o = { name: _message.name };"));
  assert!(code.contains("(0, _message.name)();"));
  assert!(code.contains("console.log((0, _message2.default)(), _ns.value, _message[\"quoted-name\"]);"));
  assert!(code.contains("function shadow(name) { return name; }"));
  assert!(!code.contains("__esModule\", { value: true }"));
}

#[test]
fn test_rewrite_exports() {
  let ret = transform(
    r#"import { helper } from "./helper.js";
export const a = 1, b = 2;
export function f() { return helper(); }
let c = 3;
export { c as renamed, helper };
export default class Foo {}
"#,
  );
  let code = ret.code;
  assert!(code.contains("Object.defineProperty(exports, \"__esModule\", { value: true });"));
  for (exported, expr) in [
    ("a", "a"),
    ("b", "b"),
    ("f", "f"),
    ("renamed", "c"),
    ("helper", "_helper.helper"),
    ("default", "Foo"),
  ] {
    assert!(
      code.contains(&format!(
        "Object.defineProperty(exports, \"{exported}\", {{ enumerable: true, get: function () {{ return {expr}; }} }});"
      )),
      "missing export {exported} in:\n{code}"
    );
  }
  assert!(code.contains("\nconst a = 1, b = 2;"));
  assert!(code.contains("\nfunction f() { return (0, _helper.helper)(); }"));
  assert!(code.contains("\nclass Foo {}"));
  assert!(!code.contains("export "));
}

#[test]
fn test_rewrite_default_and_reexports() {
  let ret = transform(
    r#"export * from "./all.js";
export * as ns from "./ns.js";
export { default as util } from "./util.js";
export default function () { return 1; }
"#,
  );
  let code = ret.code;
  assert!(code.contains("var _all = require(\"./all.js\");\n_exportStar(exports, _all);\n"));
  assert!(code.contains("get: function () { return _ns; }"));
  assert!(code.contains("get: function () { return _util.default; }"));
  assert!(code.contains("exports.default = function () { return 1; };"));
  assert!(code.contains("function _exportStar(target, source)"));
}

#[test]
fn test_requires_are_hoisted_above_the_body() {
  let ret = transform(
    r#"export const v = name;
console.log(v);
import { name } from "./name.js";
export * from "./all.js";
"#,
  );
  let code = ret.code;
  let require_name = code.find("var _name = require(\"./name.js\");").unwrap();
  let export_star = code.find("_exportStar(exports, _all);").unwrap();
  let body = code.find("const v = _name.name;").unwrap();
  assert!(require_name < export_star && export_star < body, "not hoisted:\n{code}");
  assert_eq!(code.matches("require(").count(), 2);
  assert_eq!(ret.import_specifiers, vec!["./name.js", "./all.js"]);
}

#[test]
fn test_generated_names_avoid_collisions() {
  let ret = transform("import { x } from \"./dep.js\";\nconst _dep = x;\n");
  assert!(ret.code.contains("var _dep2 = require(\"./dep.js\");"));
  assert!(ret.code.contains("const _dep = _dep2.x;"));
}

#[test]
fn test_hashbang_is_removed() {
  let ret = transform("#!/usr/bin/env node\nmodule.exports = 1;\n");
  assert_eq!(ret.code, "\nmodule.exports = 1;\n");
}

use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use itertools::Itertools;
use sugar_path::SugarPath;

use oxc_resolver::{
  ResolveError, ResolveOptions as OxcResolverOptions, Resolver as OxcResolver,
};

use roid_common::{Platform, ResolveOptions};

/// Resolves specifiers the way Node.js `require` does: relative join against the
/// importer's directory, extension inference, `index` fallback for directories and
/// `node_modules` lookup for bare specifiers.
#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  inner: OxcResolver,
}

impl Resolver {
  pub fn new(raw_resolve: ResolveOptions, platform: Platform, cwd: PathBuf) -> Self {
    // Modules are instantiated through `require` at runtime.
    let mut condition_names = vec!["require".to_string(), "default".to_string()];

    match platform {
      Platform::Node => {
        condition_names.push("node".to_string());
      }
      Platform::Browser => {
        condition_names.push("browser".to_string());
      }
      Platform::Neutral => {}
    }

    condition_names.extend(raw_resolve.condition_names.unwrap_or_default());
    let condition_names = condition_names.into_iter().unique().collect();

    let main_fields = match platform {
      Platform::Node => {
        vec!["main".to_string(), "module".to_string()]
      }
      Platform::Browser => vec!["browser".to_string(), "module".to_string(), "main".to_string()],
      Platform::Neutral => vec!["main".to_string()],
    };

    let alias_fields = match platform {
      Platform::Browser => vec![vec!["browser".to_string()]],
      _ => vec![],
    };

    let options = OxcResolverOptions {
      main_fields,
      alias_fields,
      condition_names,
      extensions: raw_resolve.extensions.unwrap_or_else(|| {
        vec![String::from(".js"), String::from(".mjs"), String::from(".cjs")]
      }),
      main_files: raw_resolve.main_files.unwrap_or_else(|| vec![String::from("index")]),
      symlinks: raw_resolve.symlinks.unwrap_or(true),
      builtin_modules: false,
      ..Default::default()
    };

    Self { cwd, inner: OxcResolver::new(options) }
  }
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: ArcStr,
}

impl Resolver {
  /// Resolves `specifier` as written in `importer`. Without an importer the
  /// specifier is resolved against the cwd.
  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
    is_user_defined_entry: bool,
  ) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .and_then(|importer| importer.parent())
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let mut resolution = self.inner.resolve(dir, specifier);

    // Handle `roid main.js` -> `<CWD>/main.js`
    if resolution.is_err() && is_user_defined_entry {
      let is_specifier_path_like = specifier.starts_with('.') || specifier.starts_with('/');
      if !is_specifier_path_like {
        let normalized_specifier = self.cwd.join(specifier).normalize();
        let result = self.inner.resolve(dir, &normalized_specifier.to_string_lossy());
        if result.is_ok() {
          resolution = result;
        }
      }
    }

    resolution.map(|info| {
      let path = info.into_path_buf();
      ResolveReturn { path: path.to_string_lossy().as_ref().into() }
    })
  }
}

#[cfg(test)]
fn fixture(files: &[(&str, &str)]) -> tempfile::TempDir {
  let dir = tempfile::tempdir().unwrap();
  for (path, content) in files {
    let path = dir.path().join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }
  dir
}

#[cfg(test)]
fn canonical(dir: &tempfile::TempDir, path: &str) -> ArcStr {
  dir.path().join(path).canonicalize().unwrap().to_string_lossy().as_ref().into()
}

#[test]
fn test_resolve_relative_with_extension_inference() {
  let dir = fixture(&[("src/a.js", ""), ("src/b.mjs", ""), ("src/lib/index.js", "")]);
  let cwd = dir.path().canonicalize().unwrap();
  let resolver = Resolver::new(ResolveOptions::default(), Platform::Node, cwd.clone());
  let importer = cwd.join("src/a.js");

  let ret = resolver.resolve(Some(&importer), "./b", false).unwrap();
  assert_eq!(ret.path, canonical(&dir, "src/b.mjs"));

  let ret = resolver.resolve(Some(&importer), "./lib", false).unwrap();
  assert_eq!(ret.path, canonical(&dir, "src/lib/index.js"));

  let ret = resolver.resolve(Some(&importer), "./a.js", false).unwrap();
  assert_eq!(ret.path, canonical(&dir, "src/a.js"));

  assert!(resolver.resolve(Some(&importer), "./missing", false).is_err());
}

#[test]
fn test_resolve_package_and_entry() {
  let dir = fixture(&[
    ("main.js", ""),
    ("node_modules/greet/package.json", r#"{ "name": "greet", "main": "lib/greet.js" }"#),
    ("node_modules/greet/lib/greet.js", ""),
  ]);
  let cwd = dir.path().canonicalize().unwrap();
  let resolver = Resolver::new(ResolveOptions::default(), Platform::Node, cwd.clone());

  let ret = resolver.resolve(Some(&cwd.join("main.js")), "greet", false).unwrap();
  assert_eq!(ret.path, canonical(&dir, "node_modules/greet/lib/greet.js"));

  // A bare entry falls back to a cwd-relative path.
  let ret = resolver.resolve(None, "main.js", true).unwrap();
  assert_eq!(ret.path, canonical(&dir, "main.js"));
  assert!(resolver.resolve(None, "main.js", false).is_err());
}

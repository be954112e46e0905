use std::{fmt::Debug, path::Path, sync::Arc};

/// Rewrites the transformed code of every module, once per file, before it is
/// placed in the module table.
///
/// A hook may inject code (diagnostics, banners, instrumentation) but must not
/// add, remove or change `require` specifiers: the module's specifier table has
/// already been computed from the transform output.
pub trait LoaderHook: Send + Sync {
  fn name(&self) -> &str {
    "anonymous"
  }

  fn load(&self, path: &Path, code: String) -> anyhow::Result<String>;
}

impl<F> LoaderHook for F
where
  F: Fn(&Path, String) -> anyhow::Result<String> + Send + Sync,
{
  fn load(&self, path: &Path, code: String) -> anyhow::Result<String> {
    self(path, code)
  }
}

pub type SharedLoaderHook = Arc<dyn LoaderHook>;

impl Debug for dyn LoaderHook {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoaderHook").field("name", &self.name()).finish()
  }
}

#[test]
fn test_closure_loader_hook() {
  let hook: SharedLoaderHook = Arc::new(|path: &Path, code: String| -> anyhow::Result<String> {
    if path.ends_with("index.js") {
      Ok(format!("console.log(\"loading index\");\n{code}"))
    } else {
      Ok(code)
    }
  });

  let code = hook.load(Path::new("/app/index.js"), "exports.a = 1;".to_string()).unwrap();
  assert_eq!(code, "console.log(\"loading index\");\nexports.a = 1;");

  let code = hook.load(Path::new("/app/a.js"), "exports.a = 1;".to_string()).unwrap();
  assert_eq!(code, "exports.a = 1;");
  assert_eq!(format!("{hook:?}"), "LoaderHook { name: \"anonymous\" }");
}

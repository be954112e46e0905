use std::{borrow::Cow, ffi::OsStr, path::Path};

use sugar_path::SugarPath;

pub trait PathExt {
  /// Path of `self` relative to `cwd`, slash separated. Used for ids shown to users.
  fn relative_slash(&self, cwd: &Path) -> String;

  fn representative_file_name(&self) -> Cow<'_, str>;
}

impl PathExt for Path {
  fn relative_slash(&self, cwd: &Path) -> String {
    if self.is_absolute() {
      self.relative(cwd).to_slash_lossy().into_owned()
    } else {
      self.to_slash_lossy().into_owned()
    }
  }

  /// It doesn't ensure the file name is a valid identifier in JS.
  fn representative_file_name(&self) -> Cow<'_, str> {
    let file_name =
      self.file_stem().map_or_else(|| self.to_string_lossy(), |stem| stem.to_string_lossy());

    let file_name = match &*file_name {
      // "index": Node.js use `index` as a special name for directory import.
      "index" | "" | "." | ".." => self
        .parent()
        .and_then(Self::file_stem)
        .map(OsStr::to_string_lossy)
        .map_or(file_name, |parent_dir_name| parent_dir_name),
      _ => file_name,
    };

    file_name
  }
}

#[test]
fn test_representative_file_name() {
  let cwd = Path::new(".").join("project");
  let path = cwd.join("src").join("message.js");
  assert_eq!(path.representative_file_name(), "message");

  let path = cwd.join("lib").join("index.js");
  assert_eq!(path.representative_file_name(), "lib");

  assert_eq!(Path::new("./name.js").representative_file_name(), "name");
  assert_eq!(Path::new("lodash").representative_file_name(), "lodash");
}

#[test]
fn test_relative_slash() {
  let cwd = Path::new("/project");
  assert_eq!(Path::new("/project/src/a.js").relative_slash(cwd), "src/a.js");
  assert_eq!(Path::new("src/b.js").relative_slash(cwd), "src/b.js");
}

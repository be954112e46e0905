use std::{io, path::Path};

use crate::file_system::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    std::fs::write(path, content)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
  }
}

#[test]
fn test_os_file_system() {
  let dir = tempfile::tempdir().unwrap();
  let fs = OsFileSystem;

  let nested = dir.path().join("dist").join("js");
  fs.create_dir_all(&nested).unwrap();
  let file = nested.join("bundle.js");
  assert!(!file.exists());

  fs.write(&file, b"require(0);").unwrap();
  assert!(file.exists());
  assert_eq!(fs.read_to_string(&file).unwrap(), "require(0);");

  std::fs::write(dir.path().join("binary.js"), [0xff, 0xfe, 0x00]).unwrap();
  let err = fs.read_to_string(&dir.path().join("binary.js")).unwrap_err();
  assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

mod build_diagnostic;

use std::ops::{Deref, DerefMut};

pub use crate::build_diagnostic::{BuildDiagnostic, ImportedBy};

#[derive(Debug)]
pub struct BuildError(pub Vec<BuildDiagnostic>);

impl BuildError {
  /// The diagnostic that aborted the build.
  pub fn first(&self) -> Option<&BuildDiagnostic> {
    self.0.first()
  }
}

impl Deref for BuildError {
  type Target = Vec<BuildDiagnostic>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<BuildDiagnostic> for BuildError {
  fn from(diagnostic: BuildDiagnostic) -> Self {
    Self(vec![diagnostic])
  }
}

impl From<Vec<BuildDiagnostic>> for BuildError {
  fn from(diagnostics: Vec<BuildDiagnostic>) -> Self {
    Self(diagnostics)
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![BuildDiagnostic::Unhandled(error)])
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (index, diagnostic) in self.0.iter().enumerate() {
      if index > 0 {
        writeln!(f)?;
      }
      write!(f, "{diagnostic}")?;
    }
    Ok(())
  }
}

pub type BuildResult<T> = Result<T, BuildError>;

#[test]
fn test_build_error_from_anyhow() {
  let err = BuildError::from(anyhow::anyhow!("disk full"));
  assert_eq!(err.len(), 1);
  assert!(matches!(err.first(), Some(BuildDiagnostic::Unhandled(_))));
  assert_eq!(err.to_string(), "disk full");
}

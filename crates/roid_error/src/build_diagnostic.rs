use std::fmt::Display;

/// Where a failing module was reached from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedBy {
  pub importer: String,
  pub specifier: String,
}

impl ImportedBy {
  pub fn new(importer: impl Into<String>, specifier: impl Into<String>) -> Self {
    Self { importer: importer.into(), specifier: specifier.into() }
  }
}

impl Display for ImportedBy {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} as '{}'", self.importer, self.specifier)
  }
}

fn imported_by_hint(imported_by: &Option<ImportedBy>) -> String {
  imported_by.as_ref().map(|by| format!(" (imported by {by})")).unwrap_or_default()
}

fn importer_hint(importer: &Option<String>) -> String {
  importer.as_ref().map(|importer| format!(" from {importer}")).unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum BuildDiagnostic {
  #[error("Could not resolve '{specifier}'{}: {reason}", importer_hint(.importer))]
  Resolution { specifier: String, importer: Option<String>, reason: String },

  #[error("Could not read {path}{}: {source}", imported_by_hint(.imported_by))]
  Read { path: String, imported_by: Option<ImportedBy>, source: std::io::Error },

  #[error("Failed to transform {path}{}: {message}", imported_by_hint(.imported_by))]
  Transform { path: String, imported_by: Option<ImportedBy>, message: String },

  #[error(transparent)]
  Unhandled(#[from] anyhow::Error),
}

impl BuildDiagnostic {
  /// The file the diagnostic is about, when there is one.
  pub fn path(&self) -> Option<&str> {
    match self {
      Self::Read { path, .. } | Self::Transform { path, .. } => Some(path),
      Self::Resolution { importer, .. } => importer.as_deref(),
      Self::Unhandled(_) => None,
    }
  }
}

#[test]
fn test_diagnostic_messages() {
  let resolution = BuildDiagnostic::Resolution {
    specifier: "./missing.js".to_string(),
    importer: Some("src/a.js".to_string()),
    reason: "Cannot find module './missing.js'".to_string(),
  };
  assert_eq!(
    resolution.to_string(),
    "Could not resolve './missing.js' from src/a.js: Cannot find module './missing.js'"
  );
  assert_eq!(resolution.path(), Some("src/a.js"));

  let transform = BuildDiagnostic::Transform {
    path: "src/b.js".to_string(),
    imported_by: Some(ImportedBy::new("src/a.js", "./b.js")),
    message: "Unexpected token".to_string(),
  };
  assert_eq!(
    transform.to_string(),
    "Failed to transform src/b.js (imported by src/a.js as './b.js'): Unexpected token"
  );
}

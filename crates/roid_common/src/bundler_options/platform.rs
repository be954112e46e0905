#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
  /// Represents the Node.js environment.
  #[default]
  Node,
  /// Represents the browser environment.
  Browser,
  /// Represents a platform-neutral environment.
  Neutral,
}

use std::borrow::Cow;

use oxc::syntax::identifier::{is_identifier_name, is_identifier_part, is_identifier_start};

pub fn is_validate_identifier_name(name: &str) -> bool {
  is_identifier_name(name)
}

/// Turns an arbitrary name into something usable as a JS binding name.
pub fn legitimize_identifier_name(name: &str) -> Cow<'_, str> {
  if !name.is_empty() && is_validate_identifier_name(name) {
    return Cow::Borrowed(name);
  }

  let mut legitimized = String::with_capacity(name.len() + 1);
  for (idx, char) in name.chars().enumerate() {
    let valid = if idx == 0 { is_identifier_start(char) } else { is_identifier_part(char) };
    if valid {
      legitimized.push(char);
    } else if idx == 0 && is_identifier_part(char) {
      // Digits may continue an identifier but can't start one.
      legitimized.push('_');
      legitimized.push(char);
    } else {
      legitimized.push('_');
    }
  }

  if legitimized.is_empty() {
    legitimized.push('_');
  }

  Cow::Owned(legitimized)
}

/// Quotes `value` as a JS string literal. JSON strings are valid JS strings.
pub fn to_string_literal(value: &str) -> String {
  serde_json::Value::String(value.to_string()).to_string()
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_legitimize_identifier_name() {
  assert_eq!(legitimize_identifier_name("foo"), "foo");
  assert_eq!(legitimize_identifier_name("foo-bar"), "foo_bar");
  assert_eq!(legitimize_identifier_name("1foo"), "_1foo");
  assert_eq!(legitimize_identifier_name("@scope/pkg"), "_scope_pkg");
  assert_eq!(legitimize_identifier_name(""), "_");
}

#[test]
fn test_to_string_literal() {
  assert_eq!(to_string_literal("./a.js"), r#""./a.js""#);
  assert_eq!(to_string_literal("it's \"quoted\""), r#""it's \"quoted\"""#);
}

//! Schemaless documents.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A scalar value held in a document field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
  /// An explicit null.
  Null,
  /// A boolean.
  Bool(bool),
  /// A signed integer.
  Integer(i64),
  /// A floating-point number.
  Float(f64),
  /// A UTF-8 string.
  String(String),
}

impl FieldValue {
  /// Returns the string contents, if this is a string.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      FieldValue::String(s) => Some(s),
      _ => None,
    }
  }

  /// The name of this value's type, for diagnostics.
  pub fn type_name(&self) -> &'static str {
    match self {
      FieldValue::Null => "null",
      FieldValue::Bool(_) => "bool",
      FieldValue::Integer(_) => "integer",
      FieldValue::Float(_) => "float",
      FieldValue::String(_) => "string",
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldValue::Null => write!(f, "null"),
      FieldValue::Bool(b) => write!(f, "{b}"),
      FieldValue::Integer(i) => write!(f, "{i}"),
      FieldValue::Float(x) => write!(f, "{x}"),
      FieldValue::String(s) => write!(f, "{s:?}"),
    }
  }
}

impl From<&str> for FieldValue {
  fn from(value: &str) -> Self { FieldValue::String(value.to_owned()) }
}

impl From<String> for FieldValue {
  fn from(value: String) -> Self { FieldValue::String(value) }
}

impl From<bool> for FieldValue {
  fn from(value: bool) -> Self { FieldValue::Bool(value) }
}

impl From<i64> for FieldValue {
  fn from(value: i64) -> Self { FieldValue::Integer(value) }
}

impl From<f64> for FieldValue {
  fn from(value: f64) -> Self { FieldValue::Float(value) }
}

/// A document: an ordered map of field names to scalar values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, FieldValue>);

impl Document {
  /// Creates an empty document.
  pub fn new() -> Self { Self::default() }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(
    mut self,
    field: impl Into<String>,
    value: impl Into<FieldValue>,
  ) -> Self {
    self.insert(field, value);
    self
  }

  /// Sets a field, returning the previous value if there was one.
  pub fn insert(
    &mut self,
    field: impl Into<String>,
    value: impl Into<FieldValue>,
  ) -> Option<FieldValue> {
    self.0.insert(field.into(), value.into())
  }

  /// Gets a field.
  pub fn get(&self, field: &str) -> Option<&FieldValue> { self.0.get(field) }

  /// Overwrites this document's fields with those of `other`. Fields absent
  /// from `other` are left untouched.
  pub fn merge(&mut self, other: Document) { self.0.extend(other.0); }

  /// The number of fields.
  pub fn len(&self) -> usize { self.0.len() }

  /// Whether the document has no fields.
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Iterates over fields in name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Document {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

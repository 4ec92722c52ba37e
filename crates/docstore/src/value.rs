//! Encoded document bytes.

use serde::{de::DeserializeOwned, Serialize};

/// A serialized document, as held by stores that keep documents encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Value(Vec<u8>);

impl Value {
  /// Create a new value with the given bytes.
  pub fn new(value: Vec<u8>) -> Self { Self(value) }
  /// Get the inner bytes of the value.
  pub fn into_inner(self) -> Vec<u8> { self.0 }

  /// Serialize a value into a [`Value`], using MessagePack with field names.
  pub fn serialize<T: Serialize>(
    value: &T,
  ) -> Result<Self, rmp_serde::encode::Error> {
    Ok(Self(rmp_serde::to_vec_named(value)?))
  }
  /// Deserialize a value from a [`Value`], using MessagePack.
  pub fn deserialize<T: DeserializeOwned>(
    &self,
  ) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(self.0.as_slice())
  }
}

impl From<Vec<u8>> for Value {
  fn from(value: Vec<u8>) -> Self { Self(value) }
}

impl AsRef<[u8]> for Value {
  fn as_ref(&self) -> &[u8] { &self.0 }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Document, FieldValue};

  #[test]
  fn documents_survive_encoding() {
    let doc = Document::new()
      .with("name", "Pen")
      .with("password", "1.50")
      .with("archived", false)
      .with("missing", FieldValue::Null);

    let value = Value::serialize(&doc).unwrap();
    let decoded: Document = value.deserialize().unwrap();
    assert_eq!(decoded, doc);
  }

  #[test]
  fn garbage_fails_to_decode() {
    let value = Value::new(vec![0xc1]);
    assert!(value.deserialize::<Document>().is_err());
  }
}

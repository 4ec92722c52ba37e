//! The product record and its document mapping.

use std::{fmt, str::FromStr};

use docstore::{Document, DocumentId, FieldValue};

/// The document field holding a product's name.
pub const NAME_FIELD: &str = "name";
/// The document field holding a product's secondary attribute.
///
/// The stored field is named `password` for compatibility with existing
/// documents; it carries no credential semantics.
pub const SECRET_FIELD: &str = "password";

/// The store-assigned identifier of a saved [`Product`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(DocumentId);

/// A product ID string was blank.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("product id must not be blank: {0:?}")]
pub struct InvalidProductId(pub String);

impl ProductId {
  /// Parses a user-supplied ID. Surrounding whitespace is trimmed.
  pub fn parse(raw: &str) -> Result<Self, InvalidProductId> {
    DocumentId::try_new(raw.to_owned())
      .map(Self)
      .map_err(|_| InvalidProductId(raw.to_owned()))
  }

  /// The ID as a string slice.
  pub fn as_str(&self) -> &str { self.0.as_ref() }

  /// The underlying document key.
  pub fn as_document_id(&self) -> &DocumentId { &self.0 }
}

impl FromStr for ProductId {
  type Err = InvalidProductId;
  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl From<DocumentId> for ProductId {
  fn from(id: DocumentId) -> Self { Self(id) }
}

impl From<ProductId> for DocumentId {
  fn from(id: ProductId) -> Self { id.0 }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A document could not be mapped to a [`Product`].
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
pub enum DecodeError {
  /// A field held a value of the wrong type.
  #[error("field `{field}` of document `{id}` should be a string, got {found}")]
  WrongType {
    /// The document's ID.
    id:    String,
    /// The offending field.
    field: &'static str,
    /// The type that was found instead.
    found: &'static str,
  },
}

/// A product.
///
/// A product is either unsaved (no ID) or saved, in which case its ID names
/// exactly one document in the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Product {
  id:     Option<ProductId>,
  name:   String,
  secret: String,
}

impl Product {
  /// Creates an unsaved product.
  pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      id:     None,
      name:   name.into(),
      secret: secret.into(),
    }
  }

  /// Returns this product with the given ID attached.
  pub fn with_id(mut self, id: ProductId) -> Self {
    self.id = Some(id);
    self
  }

  /// The product's ID, if it has been saved.
  pub fn id(&self) -> Option<&ProductId> { self.id.as_ref() }
  /// The product's display name.
  pub fn name(&self) -> &str { &self.name }
  /// The product's secondary attribute.
  pub fn secret(&self) -> &str { &self.secret }
  /// Whether the product has a store-assigned ID.
  pub fn is_saved(&self) -> bool { self.id.is_some() }

  /// Whether both products carry the same name and secret, ignoring IDs.
  pub fn same_fields(&self, other: &Product) -> bool {
    self.name == other.name && self.secret == other.secret
  }

  /// Encodes the product's fields. The ID is never part of the body.
  pub fn to_document(&self) -> Document {
    Document::new()
      .with(NAME_FIELD, self.name.as_str())
      .with(SECRET_FIELD, self.secret.as_str())
  }

  /// Decodes a product from a stored document.
  ///
  /// Missing fields decode as empty strings; unknown fields are ignored.
  pub fn from_document(
    id: ProductId,
    document: &Document,
  ) -> Result<Self, DecodeError> {
    let name = string_field(&id, document, NAME_FIELD)?;
    let secret = string_field(&id, document, SECRET_FIELD)?;
    Ok(Self {
      id: Some(id),
      name,
      secret,
    })
  }
}

fn string_field(
  id: &ProductId,
  document: &Document,
  field: &'static str,
) -> Result<String, DecodeError> {
  match document.get(field) {
    None | Some(FieldValue::Null) => Ok(String::new()),
    Some(FieldValue::String(s)) => Ok(s.clone()),
    Some(other) => Err(DecodeError::WrongType {
      id: id.to_string(),
      field,
      found: other.type_name(),
    }),
  }
}

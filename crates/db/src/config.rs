/// The collection products are stored in unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "Productos";

/// Configuration for a [`StoreSession`](crate::StoreSession).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaoConfig {
  /// The name of the document collection holding products.
  pub collection: String,
}

impl DaoConfig {
  /// Uses the given collection name.
  pub fn with_collection(collection: impl Into<String>) -> Self {
    Self {
      collection: collection.into(),
    }
  }
}

impl Default for DaoConfig {
  fn default() -> Self { Self::with_collection(DEFAULT_COLLECTION) }
}

//! A generic interface over remote document databases.
//!
//! A document store holds schemaless [`Document`]s grouped into named
//! collections. Each document is keyed by an opaque [`DocumentId`] that the
//! store assigns on creation. Implementations live in other crates and are
//! consumed through [`DocumentClient`].

mod document;
mod errors;
mod id;
mod value;

use std::sync::Arc;

use health::{ComponentHealth, HealthReporter};
use tracing::instrument;

pub use self::{document::*, errors::*, id::*, value::*};

/// A remote document database.
///
/// All operations are asynchronous. Once [`terminate`](Self::terminate) has
/// been called, every other operation must fail with
/// [`StoreError::Terminated`].
#[async_trait::async_trait]
pub trait DocumentStore: HealthReporter {
  /// Adds a new document to the collection, returning its store-assigned ID.
  async fn add(
    &self,
    collection: &str,
    document: Document,
  ) -> StoreResult<DocumentId>;

  /// Merges `fields` into an existing document.
  ///
  /// Fails with [`StoreError::NotFound`] if the document does not exist.
  async fn update(
    &self,
    collection: &str,
    id: &DocumentId,
    fields: Document,
  ) -> StoreResult<()>;

  /// Deletes a document. Deleting a missing document is not an error.
  async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()>;

  /// Fetches a document by its ID.
  async fn get(
    &self,
    collection: &str,
    id: &DocumentId,
  ) -> StoreResult<Option<Document>>;

  /// Fetches every document in the collection, in store-defined order.
  async fn list(
    &self,
    collection: &str,
  ) -> StoreResult<Vec<(DocumentId, Document)>>;

  /// Shuts the client down. Idempotent.
  async fn terminate(&self) -> StoreResult<()>;

  /// Drops any locally persisted state. Only valid after
  /// [`terminate`](Self::terminate).
  async fn clear_persistence(&self) -> StoreResult<()>;
}

/// A shared handle to a [`DocumentStore`] implementation.
#[derive(Clone)]
pub struct DocumentClient(Arc<dyn DocumentStore>);

impl DocumentClient {
  /// Wraps a store implementation.
  pub fn new<S: DocumentStore>(store: Arc<S>) -> Self { Self(store) }

  /// Returns a reference to the named collection.
  pub fn collection(&self, name: impl Into<Arc<str>>) -> CollectionRef {
    CollectionRef {
      client: self.clone(),
      name:   name.into(),
    }
  }

  /// Shuts the underlying client down.
  pub async fn terminate(&self) -> StoreResult<()> { self.0.terminate().await }

  /// Drops locally persisted state of the underlying client.
  pub async fn clear_persistence(&self) -> StoreResult<()> {
    self.0.clear_persistence().await
  }
}

#[async_trait::async_trait]
impl HealthReporter for DocumentClient {
  fn name(&self) -> &'static str { self.0.name() }
  async fn health_check(&self) -> ComponentHealth {
    self.0.health_check().await
  }
}

/// A named collection within a [`DocumentClient`].
#[derive(Clone)]
pub struct CollectionRef {
  client: DocumentClient,
  name:   Arc<str>,
}

impl CollectionRef {
  /// The name of the collection.
  pub fn name(&self) -> &str { &self.name }

  /// Adds a document, returning its new ID.
  #[instrument(skip(self, document), fields(collection = %self.name))]
  pub async fn add(&self, document: Document) -> StoreResult<DocumentId> {
    self.client.0.add(&self.name, document).await
  }

  /// Merges fields into an existing document.
  #[instrument(skip(self, fields), fields(collection = %self.name))]
  pub async fn update(
    &self,
    id: &DocumentId,
    fields: Document,
  ) -> StoreResult<()> {
    self.client.0.update(&self.name, id, fields).await
  }

  /// Deletes a document.
  #[instrument(skip(self), fields(collection = %self.name))]
  pub async fn delete(&self, id: &DocumentId) -> StoreResult<()> {
    self.client.0.delete(&self.name, id).await
  }

  /// Fetches a document.
  #[instrument(skip(self), fields(collection = %self.name))]
  pub async fn get(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
    self.client.0.get(&self.name, id).await
  }

  /// Fetches every document in the collection.
  #[instrument(skip(self), fields(collection = %self.name))]
  pub async fn list(&self) -> StoreResult<Vec<(DocumentId, Document)>> {
    self.client.0.list(&self.name).await
  }
}

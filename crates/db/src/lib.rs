//! Data access for products stored in a document collection.
//!
//! [`ProductDao`] exposes five operations over the collection configured in
//! a [`StoreSession`]. Each operation is available in two forms:
//!
//! - an `async` method returning a [`DaoOutcome`], which keeps "not found"
//!   apart from real failures;
//! - a `*_then` method that spawns the operation and hands a collapsed value
//!   (`None` / `false` on any failure) to a completion callback.
//!
//! Every failure is logged with the operation name before it is returned or
//! collapsed. The `*_then` methods spawn onto the current Tokio runtime and
//! panic if called outside of one.

mod config;
mod outcome;
mod session;
#[cfg(test)]
mod tests;

use model::{Product, ProductId};
use tokio::task::JoinHandle;
use tracing::instrument;

pub use self::{config::*, outcome::*, session::*};

/// A data-access object for products.
#[derive(Clone)]
pub struct ProductDao {
  session: StoreSession,
}

fn failed<T>(operation: &'static str, error: DaoError) -> DaoOutcome<T> {
  tracing::error!(operation, %error, "product operation failed");
  DaoOutcome::Failed(error)
}

impl ProductDao {
  /// Creates a data-access object bound to the given session.
  pub fn new(session: StoreSession) -> Self { Self { session } }

  /// The session this object is bound to.
  pub fn session(&self) -> &StoreSession { &self.session }

  /// Inserts a new product, returning its store-assigned ID.
  ///
  /// Any ID already on `product` is ignored.
  #[instrument(
    skip(self, product),
    fields(collection = %self.session.config().collection)
  )]
  pub async fn insert(&self, product: &Product) -> DaoOutcome<ProductId> {
    let collection = match self.session.collection() {
      Ok(collection) => collection,
      Err(e) => return failed("insert", e),
    };

    match collection.add(product.to_document()).await {
      Ok(id) => {
        tracing::debug!(%id, "inserted product");
        DaoOutcome::Ok(id.into())
      }
      Err(e) => failed("insert", e.into()),
    }
  }

  /// Replaces the name and secret of an existing product.
  #[instrument(
    skip(self, product),
    fields(collection = %self.session.config().collection)
  )]
  pub async fn update(&self, id: &str, product: &Product) -> DaoOutcome<()> {
    let collection = match self.session.collection() {
      Ok(collection) => collection,
      Err(e) => return failed("update", e),
    };
    let id = match ProductId::parse(id) {
      Ok(id) => id,
      Err(e) => return failed("update", e.into()),
    };

    match collection
      .update(id.as_document_id(), product.to_document())
      .await
    {
      Ok(()) => DaoOutcome::Ok(()),
      Err(error @ docstore::StoreError::NotFound { .. }) => {
        tracing::error!(
          operation = "update",
          %error,
          "product operation failed"
        );
        DaoOutcome::NotFound
      }
      Err(e) => failed("update", e.into()),
    }
  }

  /// Deletes a product. Deleting an absent product succeeds.
  #[instrument(
    skip(self),
    fields(collection = %self.session.config().collection)
  )]
  pub async fn delete(&self, id: &str) -> DaoOutcome<()> {
    let collection = match self.session.collection() {
      Ok(collection) => collection,
      Err(e) => return failed("delete", e),
    };
    let id = match ProductId::parse(id) {
      Ok(id) => id,
      Err(e) => return failed("delete", e.into()),
    };

    match collection.delete(id.as_document_id()).await {
      Ok(()) => DaoOutcome::Ok(()),
      Err(e) => failed("delete", e.into()),
    }
  }

  /// Fetches a product by its ID.
  #[instrument(
    skip(self),
    fields(collection = %self.session.config().collection)
  )]
  pub async fn get_by_id(&self, id: &str) -> DaoOutcome<Product> {
    let collection = match self.session.collection() {
      Ok(collection) => collection,
      Err(e) => return failed("get_by_id", e),
    };
    let id = match ProductId::parse(id) {
      Ok(id) => id,
      Err(e) => return failed("get_by_id", e.into()),
    };

    match collection.get(id.as_document_id()).await {
      Ok(Some(document)) => match Product::from_document(id, &document) {
        Ok(product) => DaoOutcome::Ok(product),
        Err(e) => failed("get_by_id", e.into()),
      },
      Ok(None) => DaoOutcome::NotFound,
      Err(e) => failed("get_by_id", e.into()),
    }
  }

  /// Fetches every product in store order.
  ///
  /// An empty collection is reported as [`DaoOutcome::NotFound`], so a
  /// successful result is never empty.
  #[instrument(
    skip(self),
    fields(collection = %self.session.config().collection)
  )]
  pub async fn get_all(&self) -> DaoOutcome<Vec<Product>> {
    let collection = match self.session.collection() {
      Ok(collection) => collection,
      Err(e) => return failed("get_all", e),
    };

    let documents = match collection.list().await {
      Ok(documents) => documents,
      Err(e) => return failed("get_all", e.into()),
    };
    if documents.is_empty() {
      return DaoOutcome::NotFound;
    }

    let products: Result<Vec<_>, _> = documents
      .into_iter()
      .map(|(id, document)| Product::from_document(id.into(), &document))
      .collect();
    match products {
      Ok(products) => DaoOutcome::Ok(products),
      Err(e) => failed("get_all", e.into()),
    }
  }

  /// Spawns [`insert`](Self::insert) and passes the new ID, or `None` on
  /// failure, to `callback`.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn insert_then<F>(&self, product: Product, callback: F) -> JoinHandle<()>
  where
    F: FnOnce(Option<ProductId>) + Send + 'static,
  {
    let dao = self.clone();
    tokio::spawn(async move { callback(dao.insert(&product).await.ok()) })
  }

  /// Spawns [`update`](Self::update) and passes `true` on success, `false`
  /// otherwise, to `callback`. Not-found counts as failure.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn update_then<F>(
    &self,
    id: impl Into<String>,
    product: Product,
    callback: F,
  ) -> JoinHandle<()>
  where
    F: FnOnce(bool) + Send + 'static,
  {
    let dao = self.clone();
    let id = id.into();
    tokio::spawn(async move {
      callback(dao.update(&id, &product).await.is_ok())
    })
  }

  /// Spawns [`delete`](Self::delete) and passes `true` on success, `false`
  /// otherwise, to `callback`.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn delete_then<F>(
    &self,
    id: impl Into<String>,
    callback: F,
  ) -> JoinHandle<()>
  where
    F: FnOnce(bool) + Send + 'static,
  {
    let dao = self.clone();
    let id = id.into();
    tokio::spawn(async move { callback(dao.delete(&id).await.is_ok()) })
  }

  /// Spawns [`get_by_id`](Self::get_by_id) and passes the product, or
  /// `None` if it is absent or the read failed, to `callback`.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn get_by_id_then<F>(
    &self,
    id: impl Into<String>,
    callback: F,
  ) -> JoinHandle<()>
  where
    F: FnOnce(Option<Product>) + Send + 'static,
  {
    let dao = self.clone();
    let id = id.into();
    tokio::spawn(async move { callback(dao.get_by_id(&id).await.ok()) })
  }

  /// Spawns [`get_all`](Self::get_all) and passes the products, or `None`
  /// if the collection is empty or the read failed, to `callback`.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn get_all_then<F>(&self, callback: F) -> JoinHandle<()>
  where
    F: FnOnce(Option<Vec<Product>>) + Send + 'static,
  {
    let dao = self.clone();
    tokio::spawn(async move { callback(dao.get_all().await.ok()) })
  }
}

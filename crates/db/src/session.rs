use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use docstore::{CollectionRef, DocumentClient, StoreResult};
use health::{ComponentHealth, HealthReporter};

use crate::{DaoConfig, DaoError, ProductDao};

/// A scoped handle on a document store.
///
/// A session is opened when a screen starts and released when it closes.
/// Releasing terminates the store client and clears its local persistence;
/// after that, every [`ProductDao`] handed out by the session fails with
/// [`DaoError::SessionReleased`] without reaching the store.
#[derive(Clone)]
pub struct StoreSession(Arc<SessionInner>);

struct SessionInner {
  client:     DocumentClient,
  collection: CollectionRef,
  config:     DaoConfig,
  released:   AtomicBool,
}

impl StoreSession {
  /// Opens a session on the given client.
  pub fn open(client: DocumentClient, config: DaoConfig) -> Self {
    tracing::info!(collection = %config.collection, "opening store session");
    let collection = client.collection(config.collection.as_str());
    Self(Arc::new(SessionInner {
      client,
      collection,
      config,
      released: AtomicBool::new(false),
    }))
  }

  /// Returns a data-access object bound to this session.
  pub fn dao(&self) -> ProductDao { ProductDao::new(self.clone()) }

  /// The session's configuration.
  pub fn config(&self) -> &DaoConfig { &self.0.config }

  /// Whether [`release`](Self::release) has been called.
  pub fn is_released(&self) -> bool { self.0.released.load(Ordering::Acquire) }

  /// Terminates the store client and clears its persistence.
  ///
  /// Only the first call does any work; later calls return `Ok(())`.
  pub async fn release(&self) -> StoreResult<()> {
    if self.0.released.swap(true, Ordering::AcqRel) {
      return Ok(());
    }
    tracing::info!(
      collection = %self.0.config.collection,
      "releasing store session"
    );
    self.0.client.terminate().await?;
    self.0.client.clear_persistence().await
  }

  pub(crate) fn collection(&self) -> Result<&CollectionRef, DaoError> {
    if self.is_released() {
      return Err(DaoError::SessionReleased);
    }
    Ok(&self.0.collection)
  }

  /// The client this session wraps.
  pub fn client(&self) -> &DocumentClient { &self.0.client }
}

impl Drop for SessionInner {
  fn drop(&mut self) {
    if !self.released.load(Ordering::Acquire) {
      tracing::warn!(
        collection = %self.config.collection,
        "store session dropped without being released"
      );
    }
  }
}

#[async_trait::async_trait]
impl HealthReporter for StoreSession {
  fn name(&self) -> &'static str { stringify!(StoreSession) }
  async fn health_check(&self) -> ComponentHealth {
    if self.is_released() {
      ComponentHealth::Down("session released".into())
    } else {
      ComponentHealth::Up
    }
  }
}

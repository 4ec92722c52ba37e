//! An in-memory implementation of [`DocumentStore`]. Follows Firestore
//! semantics for IDs, merges, deletes, and client teardown.


use std::{
  collections::{BTreeMap, HashMap},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use docstore::{
  Document, DocumentId, DocumentStore, StoreError, StoreResult, Value,
};
use health::{ComponentHealth, HealthReporter};
use miette::{Context, IntoDiagnostic};
use nanorand::Rng;
use tokio::sync::{Mutex, RwLock};

const AUTO_ID_ALPHABET: &[u8] =
  b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const AUTO_ID_LEN: usize = 20;

type Collection = BTreeMap<DocumentId, Value>;

/// A mock document store.
pub struct MemoryStore {
  data:                Arc<RwLock<HashMap<String, Collection>>>,
  fault:               Mutex<Option<Fault>>,
  terminated:          AtomicBool,
  persistence_cleared: AtomicBool,
}

struct Fault {
  remaining: usize,
  reason:    String,
}

impl MemoryStore {
  /// Create a new, empty mock store.
  pub fn new() -> Arc<Self> {
    Arc::new(Self {
      data:                Arc::new(RwLock::new(HashMap::new())),
      fault:               Mutex::new(None),
      terminated:          AtomicBool::new(false),
      persistence_cleared: AtomicBool::new(false),
    })
  }

  /// Opens another client on the same data. The new client is running and
  /// has no pending faults, even if this one has been terminated.
  pub fn reconnect(&self) -> Arc<Self> {
    Arc::new(Self {
      data:                Arc::clone(&self.data),
      fault:               Mutex::new(None),
      terminated:          AtomicBool::new(false),
      persistence_cleared: AtomicBool::new(false),
    })
  }

  /// Makes the next `count` operations fail with
  /// [`StoreError::Unavailable`]. A count of zero clears any pending fault.
  pub async fn fail_next(&self, count: usize, reason: impl Into<String>) {
    let mut fault = self.fault.lock().await;
    *fault = (count > 0).then(|| Fault {
      remaining: count,
      reason:    reason.into(),
    });
  }

  /// The number of documents in a collection, bypassing faults and teardown.
  pub async fn document_count(&self, collection: &str) -> usize {
    self.data.read().await.get(collection).map_or(0, BTreeMap::len)
  }

  /// Whether [`terminate`](DocumentStore::terminate) has been called.
  pub fn is_terminated(&self) -> bool {
    self.terminated.load(Ordering::Acquire)
  }

  /// Whether [`clear_persistence`](DocumentStore::clear_persistence) has
  /// succeeded.
  pub fn is_persistence_cleared(&self) -> bool {
    self.persistence_cleared.load(Ordering::Acquire)
  }

  async fn check_available(&self, op: &'static str) -> StoreResult<()> {
    if self.is_terminated() {
      return Err(StoreError::Terminated);
    }

    let mut fault = self.fault.lock().await;
    if let Some(pending) = fault.as_mut() {
      pending.remaining -= 1;
      let reason = pending.reason.clone();
      if pending.remaining == 0 {
        *fault = None;
      }
      tracing::debug!(op, %reason, "injecting store fault");
      return Err(StoreError::Unavailable(reason));
    }
    Ok(())
  }
}

fn auto_id() -> StoreResult<DocumentId> {
  let mut rng = nanorand::tls_rng();
  let raw: String = (0..AUTO_ID_LEN)
    .map(|_| AUTO_ID_ALPHABET[rng.generate_range(0..AUTO_ID_ALPHABET.len())])
    .map(char::from)
    .collect();
  DocumentId::try_new(raw).map_err(|e| {
    StoreError::Platform(miette::miette!("generated an invalid id: {e}"))
  })
}

fn encode(document: &Document) -> StoreResult<Value> {
  Value::serialize(document)
    .into_diagnostic()
    .context("failed to encode document")
    .map_err(StoreError::Serde)
}

fn decode(value: &Value) -> StoreResult<Document> {
  value
    .deserialize()
    .into_diagnostic()
    .context("failed to decode document")
    .map_err(StoreError::Serde)
}

#[async_trait::async_trait]
impl HealthReporter for MemoryStore {
  fn name(&self) -> &'static str { stringify!(MemoryStore) }
  async fn health_check(&self) -> ComponentHealth {
    if self.is_terminated() {
      ComponentHealth::Down("terminated".into())
    } else {
      ComponentHealth::IntrinsicallyUp
    }
  }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
  async fn add(
    &self,
    collection: &str,
    document: Document,
  ) -> StoreResult<DocumentId> {
    self.check_available("add").await?;
    let value = encode(&document)?;

    let mut data = self.data.write().await;
    let docs = data.entry(collection.to_owned()).or_default();
    let id = loop {
      let candidate = auto_id()?;
      if !docs.contains_key(&candidate) {
        break candidate;
      }
    };
    docs.insert(id.clone(), value);

    tracing::trace!(%id, collection, "added document");
    Ok(id)
  }

  async fn update(
    &self,
    collection: &str,
    id: &DocumentId,
    fields: Document,
  ) -> StoreResult<()> {
    self.check_available("update").await?;

    let mut data = self.data.write().await;
    let Some(existing) = data.get_mut(collection).and_then(|c| c.get_mut(id))
    else {
      return Err(StoreError::NotFound {
        collection: collection.to_owned(),
        id:         id.clone(),
      });
    };

    let mut document = decode(existing)?;
    document.merge(fields);
    *existing = encode(&document)?;
    Ok(())
  }

  async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()> {
    self.check_available("delete").await?;

    let mut data = self.data.write().await;
    if let Some(docs) = data.get_mut(collection) {
      docs.remove(id);
    }
    Ok(())
  }

  async fn get(
    &self,
    collection: &str,
    id: &DocumentId,
  ) -> StoreResult<Option<Document>> {
    self.check_available("get").await?;

    let data = self.data.read().await;
    data
      .get(collection)
      .and_then(|c| c.get(id))
      .map(decode)
      .transpose()
  }

  async fn list(
    &self,
    collection: &str,
  ) -> StoreResult<Vec<(DocumentId, Document)>> {
    self.check_available("list").await?;

    let data = self.data.read().await;
    let Some(docs) = data.get(collection) else {
      return Ok(Vec::new());
    };
    docs
      .iter()
      .map(|(id, value)| Ok((id.clone(), decode(value)?)))
      .collect()
  }

  async fn terminate(&self) -> StoreResult<()> {
    if !self.terminated.swap(true, Ordering::AcqRel) {
      tracing::debug!("mock store terminated");
    }
    Ok(())
  }

  /// Only records the call. The mock keeps no local cache apart from the
  /// shared data, which other clients may still be using.
  async fn clear_persistence(&self) -> StoreResult<()> {
    if !self.is_terminated() {
      return Err(StoreError::StillRunning);
    }
    self.persistence_cleared.store(true, Ordering::Release);
    Ok(())
  }
}

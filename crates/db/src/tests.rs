use std::{collections::HashSet, sync::Arc};

use docstore::{DocumentClient, DocumentStore};
use docstore_mock_impl::MemoryStore;
use health::HealthReporter;
use model::{Product, ProductId};
use tokio::sync::{mpsc, oneshot};

use crate::{DaoConfig, DaoError, DaoOutcome, ProductDao, StoreSession};

fn setup() -> (Arc<MemoryStore>, StoreSession) {
  let store = MemoryStore::new();
  let session = StoreSession::open(
    DocumentClient::new(store.clone()),
    DaoConfig::default(),
  );
  (store, session)
}

fn pen() -> Product { Product::new("Pen", "1.50") }

async fn insert(dao: &ProductDao, product: &Product) -> ProductId {
  match dao.insert(product).await {
    DaoOutcome::Ok(id) => id,
    other => panic!("insert failed: {other:?}"),
  }
}

#[tokio::test]
async fn inserted_products_can_be_fetched() {
  let (_store, session) = setup();
  let dao = session.dao();

  let id = insert(&dao, &pen()).await;
  let fetched = dao.get_by_id(id.as_str()).await.ok().unwrap();

  assert!(fetched.same_fields(&pen()));
  assert_eq!(fetched.id(), Some(&id));
  session.release().await.unwrap();
}

#[tokio::test]
async fn inserts_land_in_the_configured_collection() {
  let store = MemoryStore::new();
  let session = StoreSession::open(
    DocumentClient::new(store.clone()),
    DaoConfig::with_collection("Inventario"),
  );

  insert(&session.dao(), &pen()).await;

  assert_eq!(store.document_count("Inventario").await, 1);
  assert_eq!(store.document_count("Productos").await, 0);
  session.release().await.unwrap();
}

#[tokio::test]
async fn absent_ids_are_not_found() {
  let (_store, session) = setup();

  let outcome = session.dao().get_by_id("does-not-exist").await;
  assert!(outcome.is_not_found());
  session.release().await.unwrap();
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
  let (_store, session) = setup();
  let dao = session.dao();
  let id = insert(&dao, &pen()).await;

  let pencil = Product::new("Pencil", "0.80");
  assert!(dao.update(id.as_str(), &pencil).await.is_ok());

  let fetched = dao.get_by_id(id.as_str()).await.ok().unwrap();
  assert!(fetched.same_fields(&pencil));
  assert_eq!(fetched.id(), Some(&id));
  session.release().await.unwrap();
}

#[tokio::test]
async fn update_of_absent_product_is_not_found() {
  let (store, session) = setup();

  let outcome = session.dao().update("ghost", &pen()).await;
  assert!(outcome.is_not_found());
  assert_eq!(store.document_count("Productos").await, 0);
  session.release().await.unwrap();
}

#[tokio::test]
async fn deleted_products_are_gone() {
  let (_store, session) = setup();
  let dao = session.dao();
  let id = insert(&dao, &pen()).await;

  assert!(dao.delete(id.as_str()).await.is_ok());
  assert!(dao.get_by_id(id.as_str()).await.is_not_found());
  session.release().await.unwrap();
}

#[tokio::test]
async fn get_all_on_empty_collection_is_not_found() {
  let (_store, session) = setup();

  assert!(session.dao().get_all().await.is_not_found());
  session.release().await.unwrap();
}

#[tokio::test]
async fn blank_ids_are_rejected() {
  let (_store, session) = setup();
  let dao = session.dao();

  for outcome in [dao.delete("  ").await, dao.update("", &pen()).await] {
    assert!(matches!(outcome, DaoOutcome::Failed(DaoError::InvalidId(_))));
  }
  assert!(matches!(
    dao.get_by_id("").await,
    DaoOutcome::Failed(DaoError::InvalidId(_))
  ));
  session.release().await.unwrap();
}

#[tokio::test]
async fn store_failures_are_distinguished_from_absence() {
  let (store, session) = setup();
  let dao = session.dao();
  let id = insert(&dao, &pen()).await;

  store.fail_next(1, "network down").await;
  let outcome = dao.get_by_id(id.as_str()).await;
  assert!(matches!(outcome, DaoOutcome::Failed(DaoError::Store(_))));

  store.fail_next(1, "network down").await;
  assert!(dao.get_all().await.error().is_some());

  store.fail_next(1, "network down").await;
  assert!(dao.insert(&pen()).await.error().is_some());
  session.release().await.unwrap();
}

#[tokio::test]
async fn undecodable_documents_fail() {
  let (store, session) = setup();
  let id = store
    .add(
      "Productos",
      docstore::Document::new()
        .with("name", "Pen")
        .with("password", 150_i64),
    )
    .await
    .unwrap();

  let outcome = session.dao().get_by_id(id.as_ref()).await;
  assert!(matches!(outcome, DaoOutcome::Failed(DaoError::Decode(_))));
  assert!(session.dao().get_all().await.error().is_some());
  session.release().await.unwrap();
}

#[tokio::test]
async fn released_sessions_reject_operations() {
  let (store, session) = setup();
  let dao = session.dao();
  let id = insert(&dao, &pen()).await;

  session.release().await.unwrap();
  session.release().await.unwrap();

  assert!(store.is_terminated());
  assert!(store.is_persistence_cleared());
  assert!(!session.health_check().await.is_available());

  let outcomes = [
    dao.delete(id.as_str()).await.error().is_some(),
    dao.update(id.as_str(), &pen()).await.error().is_some(),
  ];
  assert_eq!(outcomes, [true, true]);
  assert!(matches!(
    dao.get_by_id(id.as_str()).await,
    DaoOutcome::Failed(DaoError::SessionReleased)
  ));
  assert!(matches!(
    dao.get_all().await,
    DaoOutcome::Failed(DaoError::SessionReleased)
  ));
  assert!(matches!(
    dao.insert(&pen()).await,
    DaoOutcome::Failed(DaoError::SessionReleased)
  ));
}

#[tokio::test]
async fn insert_read_delete_scenario() {
  let (_store, session) = setup();
  let dao = session.dao();

  let id = insert(&dao, &pen()).await;

  let all = dao.get_all().await.ok().unwrap();
  assert_eq!(all, vec![pen().with_id(id.clone())]);

  assert!(dao.delete(id.as_str()).await.is_ok());
  assert!(dao.get_all().await.is_not_found());
  session.release().await.unwrap();
}

#[tokio::test]
async fn get_all_keeps_store_order() {
  let (store, session) = setup();
  let dao = session.dao();
  for i in 0..10 {
    insert(&dao, &Product::new(format!("item {i}"), i.to_string())).await;
  }

  let fetched: Vec<_> = dao
    .get_all()
    .await
    .ok()
    .unwrap()
    .iter()
    .map(|p| p.id().cloned().unwrap())
    .collect();
  let listed: Vec<ProductId> = store
    .list("Productos")
    .await
    .unwrap()
    .into_iter()
    .map(|(id, _)| id.into())
    .collect();

  assert_eq!(fetched.len(), 10);
  assert_eq!(fetched, listed);
  session.release().await.unwrap();
}

#[tokio::test]
async fn empty_fields_round_trip() {
  let (_store, session) = setup();
  let dao = session.dao();

  for product in [
    Product::new("", ""),
    Product::new("Pen", ""),
    Product::new("", "1.50"),
  ] {
    let id = insert(&dao, &product).await;
    let fetched = dao.get_by_id(id.as_str()).await.ok().unwrap();
    assert!(fetched.same_fields(&product));
  }
  session.release().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_operations_all_complete() {
  let (store, session) = setup();
  let dao = session.dao();

  let (tx, mut rx) = mpsc::unbounded_channel();
  let handles: Vec<_> = (0..50)
    .map(|i| {
      let tx = tx.clone();
      dao.insert_then(Product::new(format!("item {i}"), ""), move |id| {
        let _ = tx.send(id);
      })
    })
    .collect();
  drop(tx);
  for handle in handles {
    handle.await.unwrap();
  }

  let mut ids = HashSet::new();
  while let Some(id) = rx.recv().await {
    ids.insert(id.expect("insert failed"));
  }
  assert_eq!(ids.len(), 50);
  assert_eq!(store.document_count("Productos").await, 50);

  let (all, missing) =
    tokio::join!(dao.get_all(), dao.get_by_id("does-not-exist"));
  assert_eq!(all.ok().map(|all| all.len()), Some(50));
  assert!(missing.is_not_found());
  session.release().await.unwrap();
}

mod logging {
  use std::{
    io,
    sync::{Mutex, PoisonError},
  };

  use tracing_subscriber::fmt::MakeWriter;

  use super::*;

  #[derive(Clone, Default)]
  struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

  impl CapturedLogs {
    fn contents(&self) -> String {
      let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
      String::from_utf8_lossy(&buf).into_owned()
    }
  }

  impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> { Ok(()) }
  }

  impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;
    fn make_writer(&'a self) -> Self::Writer { self.clone() }
  }

  fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
      .with_writer(logs.clone())
      .with_ansi(false)
      .with_max_level(tracing::Level::ERROR)
      .finish();
    (logs, tracing::subscriber::set_default(subscriber))
  }

  #[tokio::test]
  async fn update_of_absent_product_logs_an_error() {
    let (logs, _guard) = capture();
    let (_store, session) = setup();

    assert!(session.dao().update("ghost", &pen()).await.is_not_found());

    let output = logs.contents();
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains(r#"operation="update""#), "{output}");
    assert!(output.contains("ghost"), "{output}");
    session.release().await.unwrap();
  }

  #[tokio::test]
  async fn store_failures_log_operation_and_cause() {
    let (logs, _guard) = capture();
    let (store, session) = setup();

    store.fail_next(1, "network down").await;
    assert!(session.dao().insert(&pen()).await.error().is_some());

    let output = logs.contents();
    assert!(output.contains(r#"operation="insert""#), "{output}");
    assert!(output.contains("network down"), "{output}");
    session.release().await.unwrap();
  }

  #[tokio::test]
  async fn successes_log_no_errors() {
    let (logs, _guard) = capture();
    let (_store, session) = setup();

    let id = insert(&session.dao(), &pen()).await;
    assert!(session.dao().get_by_id(id.as_str()).await.is_ok());

    assert_eq!(logs.contents(), "");
    session.release().await.unwrap();
  }
}

mod callbacks {
  use super::*;

  #[tokio::test]
  async fn callbacks_receive_values_on_success() {
    let (_store, session) = setup();
    let dao = session.dao();

    let (tx, rx) = oneshot::channel();
    dao.insert_then(pen(), move |id| {
      let _ = tx.send(id);
    });
    let id = rx.await.unwrap().unwrap();

    let (tx, rx) = oneshot::channel();
    dao.get_by_id_then(id.as_str(), move |product| {
      let _ = tx.send(product);
    });
    assert!(rx.await.unwrap().unwrap().same_fields(&pen()));

    let (tx, rx) = oneshot::channel();
    dao.update_then(id.as_str(), Product::new("Pencil", "0.80"), move |ok| {
      let _ = tx.send(ok);
    });
    assert!(rx.await.unwrap());

    let (tx, rx) = oneshot::channel();
    dao.get_all_then(move |products| {
      let _ = tx.send(products);
    });
    let products = rx.await.unwrap().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name(), "Pencil");

    let (tx, rx) = oneshot::channel();
    dao.delete_then(id.as_str(), move |ok| {
      let _ = tx.send(ok);
    });
    assert!(rx.await.unwrap());
    session.release().await.unwrap();
  }

  #[tokio::test]
  async fn failures_collapse_to_sentinels() {
    let (store, session) = setup();
    let dao = session.dao();

    store.fail_next(1, "offline").await;
    let (tx, rx) = oneshot::channel();
    dao.insert_then(pen(), move |id| {
      let _ = tx.send(id);
    });
    assert_eq!(rx.await.unwrap(), None);

    let (tx, rx) = oneshot::channel();
    dao.update_then("ghost", pen(), move |ok| {
      let _ = tx.send(ok);
    });
    assert!(!rx.await.unwrap());

    store.fail_next(1, "offline").await;
    let (tx, rx) = oneshot::channel();
    dao.delete_then("anything", move |ok| {
      let _ = tx.send(ok);
    });
    assert!(!rx.await.unwrap());

    let (tx, rx) = oneshot::channel();
    dao.get_by_id_then("ghost", move |product| {
      let _ = tx.send(product);
    });
    assert_eq!(rx.await.unwrap(), None);

    let (tx, rx) = oneshot::channel();
    dao.get_all_then(move |products| {
      let _ = tx.send(products);
    });
    assert_eq!(rx.await.unwrap(), None);
    session.release().await.unwrap();
  }

  #[tokio::test]
  async fn callbacks_after_release_get_sentinels() {
    let (_store, session) = setup();
    let dao = session.dao();
    session.release().await.unwrap();

    let (tx, rx) = oneshot::channel();
    dao.insert_then(pen(), move |id| {
      let _ = tx.send(id);
    });
    assert_eq!(rx.await.unwrap(), None);

    let handle = dao.get_all_then(|products| assert!(products.is_none()));
    handle.await.unwrap();
  }
}

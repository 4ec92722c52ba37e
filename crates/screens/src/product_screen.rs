use std::sync::Arc;

use db::{DaoConfig, ProductDao, StoreSession};
use docstore::{DocumentClient, StoreResult};
use listing::ProductAdapter;
use model::{Product, ProductId};
use tokio::sync::mpsc;

use crate::{Notifier, TextField};

/// A completed operation, delivered back to the screen for handling.
#[derive(Debug)]
pub enum ScreenEvent {
  /// An insert finished.
  Created(Option<ProductId>),
  /// A read of every product finished.
  Loaded(Option<Vec<Product>>),
  /// A delete finished.
  Deleted(bool),
  /// An update finished.
  Updated(bool),
}

/// The product-management screen.
///
/// Actions return immediately. Their results arrive as [`ScreenEvent`]s,
/// which the owner of the screen feeds back through
/// [`next_event`](Self::next_event) and [`apply`](Self::apply), so that all
/// state changes happen on the task driving the screen.
pub struct ProductScreen {
  /// The product name input.
  pub name:   TextField,
  /// The secondary attribute input.
  pub secret: TextField,
  /// The product ID input, used by update and delete.
  pub id:     TextField,

  session:   StoreSession,
  dao:       ProductDao,
  adapter:   ProductAdapter,
  notifier:  Arc<dyn Notifier>,
  events_tx: mpsc::UnboundedSender<ScreenEvent>,
  events_rx: mpsc::UnboundedReceiver<ScreenEvent>,
}

impl ProductScreen {
  /// Opens the screen, acquiring a store session.
  pub fn open(
    client: DocumentClient,
    config: DaoConfig,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    let session = StoreSession::open(client, config);
    let dao = session.dao();

    let tap_notifier = notifier.clone();
    let adapter = ProductAdapter::empty(move |product| {
      tap_notifier.notify(&format!("Product: {}", product.name()));
    });

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    Self {
      name: TextField::default(),
      secret: TextField::default(),
      id: TextField::default(),
      session,
      dao,
      adapter,
      notifier,
      events_tx,
      events_rx,
    }
  }

  /// The list adapter backing the product list.
  pub fn adapter(&self) -> &ProductAdapter { &self.adapter }

  /// The session held by this screen.
  pub fn session(&self) -> &StoreSession { &self.session }

  fn product_from_fields(&self) -> Product {
    Product::new(self.name.text(), self.secret.text())
  }

  /// Creates a product from the name and secret fields.
  pub fn create(&self) {
    let tx = self.events_tx.clone();
    self.dao.insert_then(self.product_from_fields(), move |id| {
      let _ = tx.send(ScreenEvent::Created(id));
    });
  }

  /// Loads every product into the list.
  pub fn read_all(&self) {
    let tx = self.events_tx.clone();
    self.dao.get_all_then(move |products| {
      let _ = tx.send(ScreenEvent::Loaded(products));
    });
  }

  /// Deletes the product named by the ID field.
  pub fn delete(&self) {
    let tx = self.events_tx.clone();
    self.dao.delete_then(self.id.text(), move |ok| {
      let _ = tx.send(ScreenEvent::Deleted(ok));
    });
  }

  /// Overwrites the product named by the ID field with the name and secret
  /// fields.
  pub fn update(&self) {
    let tx = self.events_tx.clone();
    self
      .dao
      .update_then(self.id.text(), self.product_from_fields(), move |ok| {
        let _ = tx.send(ScreenEvent::Updated(ok));
      });
  }

  /// Waits for the next completed operation.
  pub async fn next_event(&mut self) -> Option<ScreenEvent> {
    self.events_rx.recv().await
  }

  /// Waits for the next completed operation and applies it.
  ///
  /// Each action delivers exactly one event. The screen holds its own
  /// sender, so with no action outstanding this waits forever; use
  /// [`try_settle`](Self::try_settle) to poll instead.
  pub async fn settle(&mut self) {
    if let Some(event) = self.next_event().await {
      self.apply(event);
    }
  }

  /// Applies a completed operation if one is ready. Returns whether an
  /// event was applied.
  pub fn try_settle(&mut self) -> bool {
    match self.events_rx.try_recv() {
      Ok(event) => {
        self.apply(event);
        true
      }
      Err(_) => false,
    }
  }

  /// Reflects a completed operation in the screen state.
  pub fn apply(&mut self, event: ScreenEvent) {
    let message = match event {
      ScreenEvent::Created(Some(id)) => {
        tracing::debug!(%id, "product created");
        "Product created".to_owned()
      }
      ScreenEvent::Created(None) => "Could not create product".to_owned(),
      ScreenEvent::Loaded(products) => {
        for product in products.iter().flatten() {
          tracing::debug!(name = product.name(), "loaded product");
        }
        self.adapter.replace(products);
        match self.adapter.row_count() {
          0 => "No products found".to_owned(),
          1 => "Loaded 1 product".to_owned(),
          n => format!("Loaded {n} products"),
        }
      }
      ScreenEvent::Deleted(true) => "Product deleted".to_owned(),
      ScreenEvent::Deleted(false) => "Could not delete product".to_owned(),
      ScreenEvent::Updated(true) => "Product updated".to_owned(),
      ScreenEvent::Updated(false) => "Could not update product".to_owned(),
    };
    self.notifier.notify(&message);
  }

  /// Closes the screen, releasing its store session.
  pub async fn close(self) -> StoreResult<()> { self.session.release().await }
}

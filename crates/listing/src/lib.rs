//! Projects a sequence of products onto renderable rows.

mod row;

use std::{fmt, sync::Arc};

use model::Product;

pub use self::row::*;

/// Invoked with the tapped product when a bound row is tapped.
pub type SelectionCallback = Arc<dyn Fn(Arc<Product>) + Send + Sync>;

/// A row index was outside the bound sequence.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, miette::Diagnostic,
)]
#[error("row {index} is out of range for {len} products")]
pub struct BindError {
  /// The requested index.
  pub index: usize,
  /// The number of products held.
  pub len:   usize,
}

/// Binds an ordered sequence of products to rows.
///
/// The sequence only ever changes by wholesale replacement; the adapter
/// never notices in-place changes to the products it holds.
pub struct ProductAdapter {
  products:  Vec<Arc<Product>>,
  on_select: SelectionCallback,
}

impl ProductAdapter {
  /// Creates an adapter over `products`.
  pub fn new(
    products: Vec<Arc<Product>>,
    on_select: impl Fn(Arc<Product>) + Send + Sync + 'static,
  ) -> Self {
    Self {
      products,
      on_select: Arc::new(on_select),
    }
  }

  /// Creates an adapter with no rows.
  pub fn empty(
    on_select: impl Fn(Arc<Product>) + Send + Sync + 'static,
  ) -> Self {
    Self::new(Vec::new(), on_select)
  }

  /// The number of rows, i.e. the length of the held sequence.
  pub fn row_count(&self) -> usize { self.products.len() }

  /// The product at `index`.
  pub fn get(&self, index: usize) -> Option<&Arc<Product>> {
    self.products.get(index)
  }

  /// The held sequence.
  pub fn products(&self) -> &[Arc<Product>] { &self.products }

  /// Replaces the held sequence. `None` is treated as an empty sequence.
  pub fn replace(&mut self, products: Option<Vec<Product>>) {
    self.replace_shared(
      products
        .unwrap_or_default()
        .into_iter()
        .map(Arc::new)
        .collect(),
    );
  }

  /// Replaces the held sequence with already-shared products.
  pub fn replace_shared(&mut self, products: Vec<Arc<Product>>) {
    tracing::debug!(rows = products.len(), "replacing adapter contents");
    self.products = products;
  }

  /// Writes the product at `index` into `row` and attaches a tap handler
  /// that reports that product.
  pub fn bind<R: Row + ?Sized>(
    &self,
    row: &mut R,
    index: usize,
  ) -> Result<(), BindError> {
    let product = self.products.get(index).ok_or(BindError {
      index,
      len: self.products.len(),
    })?;

    row.set_primary_text(product.name());
    row.set_secondary_text(product.secret());

    let product = Arc::clone(product);
    let on_select = Arc::clone(&self.on_select);
    row.set_on_tap(Box::new(move || on_select(Arc::clone(&product))));
    Ok(())
  }
}

impl fmt::Debug for ProductAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProductAdapter")
      .field("products", &self.products)
      .finish_non_exhaustive()
  }
}

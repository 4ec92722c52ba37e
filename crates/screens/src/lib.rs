//! Screen controllers for the product catalogue.
//!
//! Controllers hold the text typed into their fields, trigger
//! [`ProductDao`](db::ProductDao) operations from discrete user actions, and
//! turn the results into transient messages and list refreshes.

mod notifier;
mod product_screen;

pub use self::{notifier::*, product_screen::*};

/// The screens a user can be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
  /// The landing screen.
  Main,
  /// The product-management screen.
  Products,
}

/// The landing screen. Its only action navigates to the product screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct MainScreen;

impl MainScreen {
  /// Navigates to the product-management screen.
  pub fn open_products(&self) -> Screen {
    tracing::debug!("navigating to product screen");
    Screen::Products
  }
}

/// A single-line text input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextField(String);

impl TextField {
  /// Replaces the field's contents.
  pub fn set(&mut self, text: impl Into<String>) { self.0 = text.into(); }
  /// The field's current contents.
  pub fn text(&self) -> &str { &self.0 }
  /// Empties the field.
  pub fn clear(&mut self) { self.0.clear(); }
}

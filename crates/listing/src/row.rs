use std::fmt;

/// A handler run when a row is tapped.
pub type TapHandler = Box<dyn Fn() + Send + Sync>;

/// A rendered row with two text slots and a tap target.
pub trait Row {
  /// Sets the first text slot.
  fn set_primary_text(&mut self, text: &str);
  /// Sets the second text slot.
  fn set_secondary_text(&mut self, text: &str);
  /// Replaces the row's tap handler.
  fn set_on_tap(&mut self, handler: TapHandler);
}

/// A plain in-memory row.
#[derive(Default)]
pub struct TextRow {
  primary:   String,
  secondary: String,
  on_tap:    Option<TapHandler>,
}

impl TextRow {
  /// The first text slot.
  pub fn primary(&self) -> &str { &self.primary }
  /// The second text slot.
  pub fn secondary(&self) -> &str { &self.secondary }

  /// Taps the row. Returns whether a handler was attached.
  pub fn tap(&self) -> bool {
    match &self.on_tap {
      Some(handler) => {
        handler();
        true
      }
      None => false,
    }
  }
}

impl Row for TextRow {
  fn set_primary_text(&mut self, text: &str) {
    text.clone_into(&mut self.primary);
  }
  fn set_secondary_text(&mut self, text: &str) {
    text.clone_into(&mut self.secondary);
  }
  fn set_on_tap(&mut self, handler: TapHandler) { self.on_tap = Some(handler); }
}

impl fmt::Debug for TextRow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TextRow")
      .field("primary", &self.primary)
      .field("secondary", &self.secondary)
      .field("bound", &self.on_tap.is_some())
      .finish()
  }
}

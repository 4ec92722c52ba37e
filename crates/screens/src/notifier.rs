use std::sync::Mutex;

/// Shows short-lived messages to the user.
pub trait Notifier: Send + Sync {
  /// Shows a transient message.
  fn notify(&self, message: &str);
}

/// A notifier that records every message, newest last.
#[derive(Debug, Default)]
pub struct MessageLog(Mutex<Vec<String>>);

impl MessageLog {
  /// All messages shown so far.
  pub fn messages(&self) -> Vec<String> {
    self.0.lock().map(|m| m.clone()).unwrap_or_default()
  }

  /// The most recent message.
  pub fn last(&self) -> Option<String> {
    self.0.lock().ok().and_then(|m| m.last().cloned())
  }
}

impl Notifier for MessageLog {
  fn notify(&self, message: &str) {
    if let Ok(mut messages) = self.0.lock() {
      messages.push(message.to_owned());
    }
  }
}

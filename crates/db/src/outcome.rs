use docstore::StoreError;
use model::{DecodeError, InvalidProductId};

/// The outcome of a [`ProductDao`](crate::ProductDao) operation.
///
/// Unlike the callback API, this keeps "not found", "empty", and genuine
/// failures apart.
#[must_use]
#[derive(Debug)]
pub enum DaoOutcome<T> {
  /// The operation succeeded.
  Ok(T),
  /// The targeted document does not exist, or the collection is empty.
  NotFound,
  /// The operation failed.
  Failed(DaoError),
}

impl<T> DaoOutcome<T> {
  /// Returns the success value, collapsing `NotFound` and `Failed` to
  /// `None`.
  pub fn ok(self) -> Option<T> {
    match self {
      DaoOutcome::Ok(value) => Some(value),
      DaoOutcome::NotFound | DaoOutcome::Failed(_) => None,
    }
  }

  /// Whether the operation succeeded.
  pub fn is_ok(&self) -> bool { matches!(self, DaoOutcome::Ok(_)) }

  /// Whether the target was absent.
  pub fn is_not_found(&self) -> bool { matches!(self, DaoOutcome::NotFound) }

  /// Returns the failure, if there was one.
  pub fn error(&self) -> Option<&DaoError> {
    match self {
      DaoOutcome::Failed(error) => Some(error),
      _ => None,
    }
  }

  /// Maps the success value.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DaoOutcome<U> {
    match self {
      DaoOutcome::Ok(value) => DaoOutcome::Ok(f(value)),
      DaoOutcome::NotFound => DaoOutcome::NotFound,
      DaoOutcome::Failed(error) => DaoOutcome::Failed(error),
    }
  }

  /// Converts into a `Result`, with `NotFound` as `Ok(None)`.
  pub fn into_result(self) -> Result<Option<T>, DaoError> {
    match self {
      DaoOutcome::Ok(value) => Ok(Some(value)),
      DaoOutcome::NotFound => Ok(None),
      DaoOutcome::Failed(error) => Err(error),
    }
  }
}

/// Why a [`ProductDao`](crate::ProductDao) operation failed.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DaoError {
  /// The supplied ID was blank.
  #[error(transparent)]
  InvalidId(#[from] InvalidProductId),
  /// The store rejected the operation.
  #[error("store operation failed: {0}")]
  Store(#[from] StoreError),
  /// A stored document could not be mapped to a product.
  #[error(transparent)]
  Decode(#[from] DecodeError),
  /// The session owning the store handle was already released.
  #[error("the store session has been released")]
  #[diagnostic(help("operations must be issued before the screen closes"))]
  SessionReleased,
}

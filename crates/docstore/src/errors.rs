use crate::DocumentId;

/// The result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An error returned by a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum StoreError {
  /// The document does not exist.
  #[error("document `{id}` not found in collection `{collection}`")]
  NotFound {
    /// The collection that was searched.
    collection: String,
    /// The missing document's ID.
    id:         DocumentId,
  },
  /// The client was used after it was terminated.
  #[error("store client has been terminated")]
  #[diagnostic(help("open a new session before issuing further operations"))]
  Terminated,
  /// Persistence was cleared while the client was still running.
  #[error("cannot clear persistence while the client is running")]
  StillRunning,
  /// The store could not be reached or rejected the request.
  #[error("store unavailable: {0}")]
  Unavailable(String),
  /// A document could not be encoded or decoded.
  #[error("document serialization failed: {0}")]
  Serde(miette::Report),
  /// Some other platform error.
  #[error("platform error: {0}")]
  Platform(miette::Report),
}

use nutype::nutype;

/// The opaque, store-assigned key of a document.
#[nutype(
  sanitize(trim),
  validate(not_empty),
  derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRef,
    Serialize, Deserialize
  )
)]
pub struct DocumentId(String);

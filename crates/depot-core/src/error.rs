//! Error types for `depot-core`.
//!
//! This is the one error enum the store traits speak. Storage backends map
//! their transport failures into [`Error::Storage`]; everything else is a
//! domain signal callers are expected to match on.

use thiserror::Error;

use crate::asset::AssetId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("an asset with serial number {0:?} already exists")]
  DuplicateSerial(String),

  #[error("asset not found: {0}")]
  AssetNotFound(AssetId),

  #[error("asset {id} is already assigned to {assignee:?}")]
  AlreadyAssigned { id: AssetId, assignee: String },

  #[error("checkout requires an assignee")]
  MissingAssignee,

  #[error("a user named {0:?} already exists")]
  DuplicateUsername(String),

  #[error("user not found: {0}")]
  UserNotFound(i64),

  #[error("cannot remove or demote the last admin account")]
  LastAdmin,

  #[error("unknown access scope: {0:?}")]
  UnknownScope(String),

  #[error("unknown ledger action: {0:?}")]
  UnknownAction(String),

  /// Generic backend failure, after rollback. Retryable by the caller.
  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  /// Wrap a backend transport failure, reducing it to its message.
  pub fn storage(err: impl std::fmt::Display) -> Self {
    Self::Storage(err.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

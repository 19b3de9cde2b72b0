//! User accounts and the authenticated principal.
//!
//! Credential material (the password hash) never leaves the store layer;
//! callers only ever see [`UserSummary`] and [`Principal`].

use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// An account row as surfaced to administrative callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
  pub id:       i64,
  pub username: String,
  /// Display label only; authorisation is decided by `scope`.
  pub role:     String,
  pub scope:    Scope,
}

/// The authenticated identity for one interaction — created at login,
/// passed explicitly to each gated operation, dropped at logout. There is
/// no ambient current-user state anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
  pub id:       i64,
  pub username: String,
  pub role:     String,
  pub scope:    Scope,
}

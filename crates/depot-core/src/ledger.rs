//! Ledger types — append-only custody and lifecycle records per asset.
//!
//! A transaction is written exactly once per lifecycle event and never
//! updated. Rows leave the ledger only when their owning asset is deleted
//! (cascade). Current custody is held on the asset itself; the ledger append
//! and the asset mutation are committed as one unit by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, asset::AssetId};

/// Cap applied to the global recent-activity view when the caller gives none.
pub const DEFAULT_AUDIT_LIMIT: usize = 500;

// ─── Action ──────────────────────────────────────────────────────────────────

/// The kind of lifecycle or custody event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxAction {
  /// Asset created unassigned. Informational; no custody change.
  Create,
  /// Asset created with an initial custodian already set.
  CreateAssign,
  /// Custody handed to a named assignee. Requires the asset to be available.
  Checkout,
  /// Custody returned; the asset becomes available again.
  Checkin,
}

impl TxAction {
  /// The string stored in the `action` column. Must match the serde tags.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Create => "CREATE",
      Self::CreateAssign => "CREATE_ASSIGN",
      Self::Checkout => "CHECKOUT",
      Self::Checkin => "CHECKIN",
    }
  }
}

impl std::str::FromStr for TxAction {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "CREATE" => Ok(Self::Create),
      "CREATE_ASSIGN" => Ok(Self::CreateAssign),
      "CHECKOUT" => Ok(Self::Checkout),
      "CHECKIN" => Ok(Self::Checkin),
      other => Err(Error::UnknownAction(other.to_owned())),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// An immutable audit record. Once written, no field is ever updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
  pub id:        i64,
  pub asset_id:  AssetId,
  /// The acting (authenticated) user, not the assignee.
  pub user_name: String,
  pub assignee:  Option<String>,
  pub action:    TxAction,
  /// Server-assigned; never changes after creation.
  pub timestamp: DateTime<Utc>,
}

/// A transaction joined with the identity of its asset, for the global
/// audit view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
  pub timestamp:     DateTime<Utc>,
  pub action:        TxAction,
  pub user_name:     String,
  pub assignee:      Option<String>,
  pub asset_id:      AssetId,
  pub serial_number: String,
  pub make:          String,
  pub model:         String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn action_string_roundtrip() {
    for action in [
      TxAction::Create,
      TxAction::CreateAssign,
      TxAction::Checkout,
      TxAction::Checkin,
    ] {
      assert_eq!(action.as_str().parse::<TxAction>().unwrap(), action);
    }
  }

  #[test]
  fn unknown_action_is_rejected() {
    let err = "TRANSFER".parse::<TxAction>().unwrap_err();
    assert!(matches!(err, Error::UnknownAction(s) if s == "TRANSFER"));
  }
}

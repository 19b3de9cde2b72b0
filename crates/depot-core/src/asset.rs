//! Asset types — the tracked physical device record.
//!
//! Assets are identified by an integer id assigned by the store on creation.
//! All mutation goes through [`crate::store::AssetStore`]; custody changes
//! additionally flow through the transaction ledger so the two stay
//! consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry identifier, assigned on creation, immutable thereafter.
pub type AssetId = i64;

/// Assignee value denoting an asset with no current custodian.
pub const AVAILABLE: &str = "Available";

// ─── Asset ───────────────────────────────────────────────────────────────────

/// A tracked physical device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
  pub id:             AssetId,
  pub device_type:    String,
  pub make:           String,
  pub model:          String,
  /// Globally unique, required, never empty.
  pub serial_number:  String,
  pub stock_number:   String,
  /// Account/budget code the purchase was booked against.
  pub account_code:   String,
  /// Purchase price. Missing prices count as zero in aggregations.
  pub price:          Option<f64>,
  pub building:       String,
  pub room:           String,
  pub classification: Option<String>,
  pub rack:           Option<String>,
  pub row:            Option<String>,
  pub table:          Option<String>,
  /// Current custodian; [`AVAILABLE`] when unassigned. Never empty.
  pub assigned_to:    String,
  /// Free-form labels; persisted as a normalised comma-separated list.
  pub tags:           Vec<String>,
  pub date_added:     DateTime<Utc>,
  pub last_modified:  DateTime<Utc>,
  /// Raw timestamp of the last physical verification scan. `None` means the
  /// asset was never scanned. Kept as text: the bulk-edit path may write
  /// arbitrary strings, and the health classifier owns interpretation.
  pub last_scanned:   Option<String>,
}

impl Asset {
  pub fn is_available(&self) -> bool {
    self.assigned_to == AVAILABLE
  }
}

// ─── NewAsset ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::AssetStore::create_asset`].
///
/// `date_added` and `last_modified` are always stamped by the store;
/// `last_scanned` starts out unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAsset {
  pub device_type:    String,
  pub make:           String,
  pub model:          String,
  pub serial_number:  String,
  #[serde(default)]
  pub stock_number:   String,
  #[serde(default)]
  pub account_code:   String,
  pub price:          Option<f64>,
  pub building:       String,
  pub room:           String,
  pub classification: Option<String>,
  pub rack:           Option<String>,
  pub row:            Option<String>,
  pub table:          Option<String>,
  /// Initial custodian; empty or absent means [`AVAILABLE`].
  pub assigned_to:    Option<String>,
  #[serde(default)]
  pub tags:           Vec<String>,
}

impl NewAsset {
  /// The custodian the asset starts out with.
  pub fn initial_assignee(&self) -> &str {
    match self.assigned_to.as_deref() {
      Some(name) if !name.trim().is_empty() => name,
      _ => AVAILABLE,
    }
  }
}

// ─── AssetPatch ──────────────────────────────────────────────────────────────

/// A named-field partial update for [`crate::store::AssetStore::update_asset`].
///
/// Only fields that are `Some` are applied. `id` and `date_added` are not
/// representable here and therefore never editable; `last_modified` is
/// stamped by the store on every successful update. Unknown keys in a JSON
/// body deserialise to nothing rather than erroring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetPatch {
  pub device_type:    Option<String>,
  pub make:           Option<String>,
  pub model:          Option<String>,
  pub serial_number:  Option<String>,
  pub stock_number:   Option<String>,
  pub account_code:   Option<String>,
  pub price:          Option<f64>,
  pub building:       Option<String>,
  pub room:           Option<String>,
  pub classification: Option<String>,
  pub rack:           Option<String>,
  pub row:            Option<String>,
  pub table:          Option<String>,
  pub assigned_to:    Option<String>,
  pub tags:           Option<Vec<String>>,
  pub last_scanned:   Option<String>,
}

//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Tags are stored as a
//! normalised comma-separated list (trimmed, deduplicated, no empties) so
//! exact per-tag matching can be done in SQL. The domain-field-to-column
//! mapping lives here and nowhere else.

use chrono::{DateTime, Utc};
use depot_core::{
  Error, Result,
  asset::Asset,
  ledger::{AuditEntry, Transaction},
  query::SearchField,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::storage(format!("bad timestamp {s:?}: {e}")))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> String {
  let mut out: Vec<&str> = Vec::new();
  for tag in tags {
    let t = tag.trim();
    if !t.is_empty() && !out.contains(&t) {
      out.push(t);
    }
  }
  out.join(",")
}

pub fn decode_tags(s: &str) -> Vec<String> {
  s.split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}

// ─── Search fields ───────────────────────────────────────────────────────────

/// The column a search field matches against.
pub fn search_column(field: SearchField) -> &'static str {
  match field {
    SearchField::Make => "make",
    SearchField::Model => "model",
    SearchField::SerialNumber => "serial_number",
    SearchField::DeviceType => "device_type",
    SearchField::AssignedTo => "assigned_to",
    SearchField::Building => "building",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawAsset::from_row`].
pub const ASSET_COLUMNS: &str = "id, device_type, make, model, \
   serial_number, stock_number, account_code, price, building, room, \
   classification, rack, row_num, table_num, assigned_to, tags, \
   date_added, last_modified, last_scanned";

/// Raw values read directly from an `assets` row.
pub struct RawAsset {
  pub id:             i64,
  pub device_type:    String,
  pub make:           String,
  pub model:          String,
  pub serial_number:  String,
  pub stock_number:   String,
  pub account_code:   String,
  pub price:          Option<f64>,
  pub building:       String,
  pub room:           String,
  pub classification: Option<String>,
  pub rack:           Option<String>,
  pub row_num:        Option<String>,
  pub table_num:      Option<String>,
  pub assigned_to:    String,
  pub tags:           String,
  pub date_added:     String,
  pub last_modified:  String,
  pub last_scanned:   Option<String>,
}

impl RawAsset {
  /// Read from a row selected with [`ASSET_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      device_type:    row.get(1)?,
      make:           row.get(2)?,
      model:          row.get(3)?,
      serial_number:  row.get(4)?,
      stock_number:   row.get(5)?,
      account_code:   row.get(6)?,
      price:          row.get(7)?,
      building:       row.get(8)?,
      room:           row.get(9)?,
      classification: row.get(10)?,
      rack:           row.get(11)?,
      row_num:        row.get(12)?,
      table_num:      row.get(13)?,
      assigned_to:    row.get(14)?,
      tags:           row.get(15)?,
      date_added:     row.get(16)?,
      last_modified:  row.get(17)?,
      last_scanned:   row.get(18)?,
    })
  }

  pub fn into_asset(self) -> Result<Asset> {
    Ok(Asset {
      id:             self.id,
      device_type:    self.device_type,
      make:           self.make,
      model:          self.model,
      serial_number:  self.serial_number,
      stock_number:   self.stock_number,
      account_code:   self.account_code,
      price:          self.price,
      building:       self.building,
      room:           self.room,
      classification: self.classification,
      rack:           self.rack,
      row:            self.row_num,
      table:          self.table_num,
      assigned_to:    self.assigned_to,
      tags:           decode_tags(&self.tags),
      date_added:     decode_dt(&self.date_added)?,
      last_modified:  decode_dt(&self.last_modified)?,
      last_scanned:   self.last_scanned,
    })
  }
}

/// Raw values read directly from a `transactions` row.
pub struct RawTransaction {
  pub id:        i64,
  pub asset_id:  i64,
  pub user_name: String,
  pub assignee:  Option<String>,
  pub action:    String,
  pub timestamp: String,
}

impl RawTransaction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      asset_id:  row.get(1)?,
      user_name: row.get(2)?,
      assignee:  row.get(3)?,
      action:    row.get(4)?,
      timestamp: row.get(5)?,
    })
  }

  pub fn into_transaction(self) -> Result<Transaction> {
    Ok(Transaction {
      id:        self.id,
      asset_id:  self.asset_id,
      user_name: self.user_name,
      assignee:  self.assignee,
      action:    self.action.parse()?,
      timestamp: decode_dt(&self.timestamp)?,
    })
  }
}

/// Raw values from a `transactions` row joined with its asset.
pub struct RawAuditEntry {
  pub timestamp:     String,
  pub action:        String,
  pub user_name:     String,
  pub assignee:      Option<String>,
  pub asset_id:      i64,
  pub serial_number: String,
  pub make:          String,
  pub model:         String,
}

impl RawAuditEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      timestamp:     row.get(0)?,
      action:        row.get(1)?,
      user_name:     row.get(2)?,
      assignee:      row.get(3)?,
      asset_id:      row.get(4)?,
      serial_number: row.get(5)?,
      make:          row.get(6)?,
      model:         row.get(7)?,
    })
  }

  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      timestamp:     decode_dt(&self.timestamp)?,
      action:        self.action.parse()?,
      user_name:     self.user_name,
      assignee:      self.assignee,
      asset_id:      self.asset_id,
      serial_number: self.serial_number,
      make:          self.make,
      model:         self.model,
    })
  }
}

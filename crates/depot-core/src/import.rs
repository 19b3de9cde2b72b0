//! Bulk-import contract: pre-parsed records handed over by an external
//! CSV-parsing collaborator.
//!
//! Only `serial` is required; every other field falls back to a fixed
//! default. Records flow through the same create path as manual entry, so
//! duplicate serials are rejected the same way — bad rows are skipped and
//! counted, never fatal.

use serde::{Deserialize, Serialize};

use crate::asset::NewAsset;

/// Classification stamped on every imported asset.
pub const IMPORTED_CLASSIFICATION: &str = "Imported";

/// One record from the import collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRecord {
  pub serial:      String,
  #[serde(rename = "type")]
  pub device_type: Option<String>,
  pub make:        Option<String>,
  pub model:       Option<String>,
  pub price:       Option<f64>,
  pub building:    Option<String>,
  pub room:        Option<String>,
  pub assigned:    Option<String>,
}

impl ImportRecord {
  /// Apply the documented defaults and produce a creation input.
  pub fn into_new_asset(self) -> NewAsset {
    NewAsset {
      device_type:    self.device_type.unwrap_or_else(|| "Unknown".into()),
      make:           self.make.unwrap_or_else(|| "Generic".into()),
      model:          self.model.unwrap_or_else(|| "Generic".into()),
      serial_number:  self.serial,
      stock_number:   String::new(),
      account_code:   String::new(),
      price:          Some(self.price.unwrap_or(0.0)),
      building:       self.building.unwrap_or_else(|| "Main".into()),
      room:           self.room.unwrap_or_else(|| "000".into()),
      classification: Some(IMPORTED_CLASSIFICATION.into()),
      rack:           None,
      row:            None,
      table:          None,
      assigned_to:    self.assigned,
      tags:           Vec::new(),
    }
  }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportReport {
  pub imported: usize,
  pub skipped:  usize,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset::AVAILABLE;

  #[test]
  fn missing_fields_fall_back_to_defaults() {
    let record = ImportRecord {
      serial: "SN-77".into(),
      ..Default::default()
    };
    let input = record.into_new_asset();

    assert_eq!(input.serial_number, "SN-77");
    assert_eq!(input.device_type, "Unknown");
    assert_eq!(input.make, "Generic");
    assert_eq!(input.model, "Generic");
    assert_eq!(input.price, Some(0.0));
    assert_eq!(input.building, "Main");
    assert_eq!(input.room, "000");
    assert_eq!(input.classification.as_deref(), Some("Imported"));
    assert_eq!(input.initial_assignee(), AVAILABLE);
  }

  #[test]
  fn supplied_fields_are_kept() {
    let record = ImportRecord {
      serial:      "SN-78".into(),
      device_type: Some("Laptop".into()),
      make:        Some("Dell".into()),
      price:       Some(899.99),
      assigned:    Some("Alice".into()),
      ..Default::default()
    };
    let input = record.into_new_asset();

    assert_eq!(input.device_type, "Laptop");
    assert_eq!(input.make, "Dell");
    assert_eq!(input.price, Some(899.99));
    assert_eq!(input.initial_assignee(), "Alice");
  }
}

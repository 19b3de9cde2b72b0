//! Tabular export contract for the external reporting collaborator.
//!
//! The collaborator renders the actual file (CSV or otherwise); this module
//! only fixes the column order and the cell formatting.

use crate::{asset::Asset, health::NEVER_SCANNED};

/// Fixed column order of the flat export.
pub const EXPORT_COLUMNS: [&str; 19] = [
  "ID",
  "Type",
  "Make",
  "Model",
  "Serial",
  "Stock #",
  "Account",
  "Price",
  "Building",
  "Room",
  "Class",
  "Rack",
  "Row",
  "Table",
  "Assigned To",
  "Tags",
  "Date Added",
  "Last Modified",
  "Last Scanned",
];

/// Render one asset as a row matching [`EXPORT_COLUMNS`].
pub fn export_row(asset: &Asset) -> Vec<String> {
  vec![
    asset.id.to_string(),
    asset.device_type.clone(),
    asset.make.clone(),
    asset.model.clone(),
    asset.serial_number.clone(),
    asset.stock_number.clone(),
    asset.account_code.clone(),
    asset.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
    asset.building.clone(),
    asset.room.clone(),
    asset.classification.clone().unwrap_or_default(),
    asset.rack.clone().unwrap_or_default(),
    asset.row.clone().unwrap_or_default(),
    asset.table.clone().unwrap_or_default(),
    asset.assigned_to.clone(),
    asset.tags.join(","),
    asset.date_added.to_rfc3339(),
    asset.last_modified.to_rfc3339(),
    asset
      .last_scanned
      .clone()
      .unwrap_or_else(|| NEVER_SCANNED.to_owned()),
  ]
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::asset::{AVAILABLE, Asset};

  #[test]
  fn row_matches_column_order() {
    let asset = Asset {
      id:             7,
      device_type:    "Laptop".into(),
      make:           "Dell".into(),
      model:          "Latitude 7420".into(),
      serial_number:  "SN1".into(),
      stock_number:   "ST-9".into(),
      account_code:   "65000".into(),
      price:          Some(1299.5),
      building:       "Main HQ".into(),
      room:           "101".into(),
      classification: None,
      rack:           Some("R2".into()),
      row:            None,
      table:          None,
      assigned_to:    AVAILABLE.into(),
      tags:           vec!["loaner".into(), "2024".into()],
      date_added:     Utc::now(),
      last_modified:  Utc::now(),
      last_scanned:   None,
    };

    let row = export_row(&asset);
    assert_eq!(row.len(), EXPORT_COLUMNS.len());
    assert_eq!(row[0], "7");
    assert_eq!(row[4], "SN1");
    assert_eq!(row[7], "1299.50");
    assert_eq!(row[11], "R2");
    assert_eq!(row[15], "loaner,2024");
    assert_eq!(row[18], "Never");
  }
}

//! Portfolio-level aggregation and the financial lifecycle curve.
//!
//! All metrics are recomputed on demand from the registry; nothing here is
//! cached or incrementally maintained.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Registry-wide metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
  pub total_assets:     usize,
  /// Sum of known prices; missing prices count as zero.
  pub total_value:      f64,
  /// Number of distinct non-empty device types.
  pub distinct_types:   usize,
  /// Sorted, deduplicated union of every asset's tag list.
  pub tags:             Vec<String>,
  /// Distinct device types, for populating type-selection inputs.
  pub device_types:     Vec<String>,
  /// Assets whose `date_added` falls in the current calendar month.
  pub added_this_month: usize,
}

// ─── Depreciation ────────────────────────────────────────────────────────────

/// Years over which an asset depreciates straight-line to zero.
pub const DEPRECIATION_YEARS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPoint {
  pub date:  DateTime<Utc>,
  pub value: f64,
}

/// Annual book values from `acquired` until the asset is fully written off,
/// floored at zero.
pub fn depreciation_schedule(
  price: f64,
  acquired: DateTime<Utc>,
) -> Vec<DepreciationPoint> {
  let annual = price / f64::from(DEPRECIATION_YEARS);
  (0..=DEPRECIATION_YEARS)
    .map(|year| DepreciationPoint {
      date:  acquired + Months::new(12 * year),
      value: (price - annual * f64::from(year)).max(0.0),
    })
    .collect()
}

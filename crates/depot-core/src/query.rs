//! The list/search/filter/pagination contract over the asset registry.
//!
//! Results are always ordered by id descending (newest first); that is the
//! only supported order. `Page::total` counts the whole filtered set, not
//! the returned slice.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;

/// Sentinel tag-filter value meaning "no tag filter".
pub const TAG_FILTER_ALL: &str = "All";

// ─── Search fields ───────────────────────────────────────────────────────────

/// A column participating in free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
  Make,
  Model,
  SerialNumber,
  DeviceType,
  AssignedTo,
  Building,
}

impl SearchField {
  /// The default searchable set. `Building` is available as an opt-in.
  pub const DEFAULT: &'static [SearchField] = &[
    SearchField::Make,
    SearchField::Model,
    SearchField::SerialNumber,
    SearchField::DeviceType,
    SearchField::AssignedTo,
  ];
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::AssetStore::list_assets`].
#[derive(Debug, Clone)]
pub struct AssetQuery {
  /// Exact per-tag filter; `None`, empty, or the sentinel `"All"` disables it.
  pub tag:    Option<String>,
  /// Free text. Whitespace-split into terms; every term must match at least
  /// one of `fields` (case-insensitive substring). Terms are ANDed, fields
  /// within a term are ORed.
  pub search: Option<String>,
  pub fields: Vec<SearchField>,
  /// Page size; `None` returns the whole filtered set.
  pub limit:  Option<usize>,
  /// Offset into the ordered, filtered result. Past the end yields an empty
  /// page, not an error.
  pub offset: usize,
}

impl Default for AssetQuery {
  fn default() -> Self {
    Self {
      tag:    None,
      search: None,
      fields: SearchField::DEFAULT.to_vec(),
      limit:  None,
      offset: 0,
    }
  }
}

impl AssetQuery {
  /// The tag filter with the sentinel resolved away.
  pub fn effective_tag(&self) -> Option<&str> {
    self
      .tag
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty() && *t != TAG_FILTER_ALL)
  }

  /// Whitespace-delimited search terms.
  pub fn terms(&self) -> Vec<&str> {
    self
      .search
      .as_deref()
      .map(|s| s.split_whitespace().collect())
      .unwrap_or_default()
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One slice of a filtered listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  pub items: Vec<Asset>,
  /// Size of the full filtered set, before pagination.
  pub total: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_sentinel_disables_tag_filter() {
    let mut q = AssetQuery::default();
    assert_eq!(q.effective_tag(), None);

    q.tag = Some("All".into());
    assert_eq!(q.effective_tag(), None);

    q.tag = Some("  ".into());
    assert_eq!(q.effective_tag(), None);

    q.tag = Some("loaner".into());
    assert_eq!(q.effective_tag(), Some("loaner"));
  }

  #[test]
  fn terms_split_on_whitespace() {
    let q = AssetQuery {
      search: Some("  Dell\t7420 ".into()),
      ..Default::default()
    };
    assert_eq!(q.terms(), vec!["Dell", "7420"]);
    assert!(AssetQuery::default().terms().is_empty());
  }
}

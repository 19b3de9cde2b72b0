//! Staleness classification from an asset's last physical scan timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Assets unseen for longer than this many days are flagged stale.
pub const STALE_AFTER_DAYS: i64 = 180;

/// Literal value some writers use for an asset that was never scanned.
pub const NEVER_SCANNED: &str = "Never";

/// Derived health of an asset's verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
  /// No scan has ever been recorded.
  Never,
  /// Last scan is older than [`STALE_AFTER_DAYS`].
  Stale,
  Healthy,
  /// The stored value does not parse as a date.
  Unknown,
}

impl Health {
  /// Everything except `Healthy` is surfaced as needing attention.
  pub fn is_flagged(self) -> bool {
    !matches!(self, Self::Healthy)
  }
}

/// Classify against the current wall clock.
pub fn health(last_scanned: Option<&str>) -> Health {
  health_at(last_scanned, Utc::now())
}

/// Classify against an explicit reference instant.
pub fn health_at(last_scanned: Option<&str>, now: DateTime<Utc>) -> Health {
  let raw = match last_scanned {
    None => return Health::Never,
    Some(s) if s.trim().is_empty() || s == NEVER_SCANNED => {
      return Health::Never;
    }
    Some(s) => s,
  };

  let Some(scanned) = parse_timestamp(raw) else {
    return Health::Unknown;
  };

  if (now - scanned).num_days() > STALE_AFTER_DAYS {
    Health::Stale
  } else {
    Health::Healthy
  }
}

/// Accepts RFC 3339 plus the `YYYY-MM-DD HH:MM:SS` and bare-date forms the
/// bulk-edit path tends to produce.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    return Some(naive.and_utc());
  }
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Some(date.and_time(NaiveTime::MIN).and_utc());
  }
  None
}

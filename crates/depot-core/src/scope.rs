//! Access scopes and the capability matrix gating every operation.
//!
//! Scopes form a closed enumeration; every gated operation names the one
//! [`Capability`] it needs and consults [`Scope::allows`]. No call site
//! compares scope strings directly.

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Access level of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
  Admin,
  #[serde(rename = "Read/Write")]
  ReadWrite,
  #[serde(rename = "Read Only")]
  ReadOnly,
}

impl Scope {
  /// The string stored in the `scope` column. Must match the serde tags.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Admin => "Admin",
      Self::ReadWrite => "Read/Write",
      Self::ReadOnly => "Read Only",
    }
  }
}

impl std::str::FromStr for Scope {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "Admin" => Ok(Self::Admin),
      "Read/Write" => Ok(Self::ReadWrite),
      "Read Only" => Ok(Self::ReadOnly),
      other => Err(Error::UnknownScope(other.to_owned())),
    }
  }
}

// ─── Capability ──────────────────────────────────────────────────────────────

/// An operation class a scope may or may not be allowed to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  /// Read, list, and search assets; per-asset history; stats.
  ViewAssets,
  /// Tabular export of the asset set.
  ExportData,
  /// Create, edit, and delete assets.
  ManageAssets,
  /// Checkout/checkin custody records.
  RecordCustody,
  /// Stamp scan times during a physical inventory pass.
  RecordScan,
  /// Bulk import of pre-parsed records.
  ImportAssets,
  /// Direct bulk edit of asset rows.
  BulkEdit,
  /// The global audit log.
  ViewAuditLog,
  /// Credential store administration.
  ManageUsers,
  /// Raw store backup download.
  Backup,
}

impl Scope {
  /// The single capability check consulted by every gated operation.
  pub fn allows(self, cap: Capability) -> bool {
    use Capability::*;
    match self {
      Self::Admin => true,
      Self::ReadWrite => matches!(
        cap,
        ViewAssets | ExportData | ManageAssets | RecordCustody | RecordScan
          | ImportAssets
      ),
      Self::ReadOnly => matches!(cap, ViewAssets | ExportData),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scope_string_roundtrip() {
    for scope in [Scope::Admin, Scope::ReadWrite, Scope::ReadOnly] {
      assert_eq!(scope.as_str().parse::<Scope>().unwrap(), scope);
    }
    assert!(matches!(
      "Superuser".parse::<Scope>(),
      Err(Error::UnknownScope(_))
    ));
  }

  #[test]
  fn admin_allows_everything() {
    for cap in [
      Capability::ViewAssets,
      Capability::ManageAssets,
      Capability::BulkEdit,
      Capability::ViewAuditLog,
      Capability::ManageUsers,
      Capability::Backup,
    ] {
      assert!(Scope::Admin.allows(cap));
    }
  }

  #[test]
  fn read_write_cannot_administer() {
    assert!(Scope::ReadWrite.allows(Capability::ManageAssets));
    assert!(Scope::ReadWrite.allows(Capability::RecordCustody));
    assert!(Scope::ReadWrite.allows(Capability::ImportAssets));
    assert!(!Scope::ReadWrite.allows(Capability::ManageUsers));
    assert!(!Scope::ReadWrite.allows(Capability::BulkEdit));
    assert!(!Scope::ReadWrite.allows(Capability::Backup));
    assert!(!Scope::ReadWrite.allows(Capability::ViewAuditLog));
  }

  #[test]
  fn read_only_is_view_and_export_only() {
    assert!(Scope::ReadOnly.allows(Capability::ViewAssets));
    assert!(Scope::ReadOnly.allows(Capability::ExportData));
    assert!(!Scope::ReadOnly.allows(Capability::ManageAssets));
    assert!(!Scope::ReadOnly.allows(Capability::RecordCustody));
    assert!(!Scope::ReadOnly.allows(Capability::RecordScan));
    assert!(!Scope::ReadOnly.allows(Capability::ImportAssets));
  }
}

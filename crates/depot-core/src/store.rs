//! The `AssetStore` and `CredentialStore` traits.
//!
//! Both are implemented by storage backends (e.g. `depot-store-sqlite`).
//! Higher layers (`depot-api`, `depot-server`) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  Result,
  asset::{Asset, AssetId, AssetPatch, NewAsset},
  ledger::{AuditEntry, Transaction, TxAction},
  query::{AssetQuery, Page},
  scope::Scope,
  stats::Stats,
  user::{Principal, UserSummary},
};

// ─── Asset registry + ledger ─────────────────────────────────────────────────

/// Registry, query, ledger, and aggregation operations over one shared
/// durable store.
///
/// Every operation is a short-lived transactional unit: it opens its own
/// scope, acts, and commits or rolls back before returning. Nothing holds a
/// transaction open across calls.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AssetStore: Send + Sync {
  // ── Registry ──────────────────────────────────────────────────────────

  /// Create and persist a new asset, stamping `date_added` and
  /// `last_modified`. Fails with [`crate::Error::DuplicateSerial`] — and
  /// writes nothing — if the serial number is already registered.
  fn create_asset(
    &self,
    input: NewAsset,
  ) -> impl Future<Output = Result<Asset>> + Send + '_;

  /// Retrieve an asset by id. Returns `None` if not found.
  fn get_asset(
    &self,
    id: AssetId,
  ) -> impl Future<Output = Result<Option<Asset>>> + Send + '_;

  /// Retrieve an asset by its (unique) serial number.
  fn get_asset_by_serial<'a>(
    &'a self,
    serial: &'a str,
  ) -> impl Future<Output = Result<Option<Asset>>> + Send + 'a;

  /// Apply the `Some` fields of `patch` and stamp `last_modified`.
  ///
  /// Returns `false` — a no-op, not an error — when the id is unknown.
  fn update_asset(
    &self,
    id: AssetId,
    patch: AssetPatch,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Remove an asset and (by cascade) its transactions. Idempotent: deleting
  /// an absent id is a silent no-op.
  fn delete_asset(
    &self,
    id: AssetId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Stamp `last_scanned = now` for the asset with this serial. No-op for an
  /// unknown serial.
  fn update_scan_time<'a>(
    &'a self,
    serial: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  // ── Query ─────────────────────────────────────────────────────────────

  /// Filtered, ordered (id descending), paginated listing. `Page::total`
  /// counts the full filtered set before the limit/offset slice.
  fn list_assets<'a>(
    &'a self,
    query: &'a AssetQuery,
  ) -> impl Future<Output = Result<Page>> + Send + 'a;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Record a custody/lifecycle event and apply its asset mutation as one
  /// transactional unit — on any failure neither takes effect.
  ///
  /// `Checkout` requires the asset to be available and an assignee to be
  /// given; `Checkin` resets custody unconditionally; `Create` and
  /// `CreateAssign` only log. Every successful action stamps the asset's
  /// `last_modified`.
  fn record(
    &self,
    asset_id: AssetId,
    user_name: String,
    action: TxAction,
    assignee: Option<String>,
  ) -> impl Future<Output = Result<Transaction>> + Send + '_;

  /// All transactions for one asset, newest first.
  fn history(
    &self,
    asset_id: AssetId,
  ) -> impl Future<Output = Result<Vec<Transaction>>> + Send + '_;

  /// The global audit view: transactions joined with asset identity, newest
  /// first, capped at `limit` (default
  /// [`crate::ledger::DEFAULT_AUDIT_LIMIT`]).
  fn recent_activity(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<AuditEntry>>> + Send + '_;

  // ── Aggregation ───────────────────────────────────────────────────────

  /// Portfolio metrics, recomputed from the registry on every call.
  fn stats(&self) -> impl Future<Output = Result<Stats>> + Send + '_;
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Account storage and verification.
pub trait CredentialStore: Send + Sync {
  /// Check a username/password pair. Unknown users and wrong passwords both
  /// yield `None` — callers cannot distinguish the two.
  fn verify<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<Principal>>> + Send + 'a;

  /// Create an account, hashing the password with a per-credential salt.
  /// Fails with [`crate::Error::DuplicateUsername`] if the name is taken.
  fn add_user(
    &self,
    username: String,
    password: String,
    role: String,
    scope: Scope,
  ) -> impl Future<Output = Result<UserSummary>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserSummary>>> + Send + '_;

  /// Change an account's scope. No-op for an unknown id; fails with
  /// [`crate::Error::LastAdmin`] if it would demote the only admin.
  fn update_user_scope(
    &self,
    id: i64,
    scope: Scope,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Re-hash and store a new password. No-op for an unknown id.
  fn update_user_password(
    &self,
    id: i64,
    password: String,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Delete an account. No-op for an unknown id; fails with
  /// [`crate::Error::LastAdmin`] if it would remove the only admin.
  fn delete_user(&self, id: i64)
  -> impl Future<Output = Result<()>> + Send + '_;
}

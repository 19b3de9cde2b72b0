//! SQLite backend for the Depot asset tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Implements both
//! [`depot_core::store::AssetStore`] and
//! [`depot_core::store::CredentialStore`] against one database file.

mod encode;
mod password;
mod schema;
mod store;

pub use store::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, SqliteStore};

#[cfg(test)]
mod tests;

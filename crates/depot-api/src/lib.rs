//! JSON REST API for Depot.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`AssetStore`] + [`CredentialStore`]. Every route authenticates with
//! HTTP Basic against the credential store; handlers gate themselves
//! through the scope capability matrix. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = depot_api::api_router(state);
//! ```

pub mod assets;
pub mod auth;
pub mod backup;
pub mod custody;
pub mod error;
pub mod scan;
pub mod stats;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use depot_core::store::{AssetStore, CredentialStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  /// Path of the live store file, served verbatim by the backup route.
  pub store_path: Arc<PathBuf>,
}

// Manual impl: cloning shares the Arcs and needs no `S: Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      store_path: Arc::clone(&self.store_path),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: AssetStore + CredentialStore + 'static,
{
  Router::new()
    // Assets
    .route("/assets", get(assets::list::<S>).post(assets::create::<S>))
    .route("/assets/bulk", post(assets::bulk_update::<S>))
    .route("/assets/by-serial/{serial}", get(assets::get_by_serial::<S>))
    .route(
      "/assets/{id}",
      get(assets::get_one::<S>)
        .patch(assets::update::<S>)
        .delete(assets::delete_one::<S>),
    )
    // Custody ledger
    .route("/assets/{id}/checkout", post(custody::checkout::<S>))
    .route("/assets/{id}/checkin", post(custody::checkin::<S>))
    .route("/assets/{id}/history", get(custody::history::<S>))
    .route("/activity", get(custody::activity::<S>))
    // Inventory scanning
    .route("/scan", post(scan::handler::<S>))
    // Reporting
    .route("/stats", get(stats::handler::<S>))
    .route("/export", get(stats::export::<S>))
    .route("/import", post(assets::import::<S>))
    // Administration
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/{id}", delete(users::delete_one::<S>))
    .route("/users/{id}/scope", put(users::update_scope::<S>))
    .route("/users/{id}/password", put(users::update_password::<S>))
    .route("/backup", get(backup::handler::<S>))
    .with_state(state)
}

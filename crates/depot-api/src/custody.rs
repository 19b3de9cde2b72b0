//! Handlers for custody ledger endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/assets/:id/checkout` | Body: `{"assignee":"..."}` |
//! | `POST` | `/assets/:id/checkin` | No body |
//! | `GET`  | `/assets/:id/history` | Newest first |
//! | `GET`  | `/activity` | Global audit view, admin only |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use depot_core::{
  asset::AssetId,
  ledger::{AuditEntry, Transaction, TxAction},
  scope::Capability,
  store::{AssetStore, CredentialStore},
};
use serde::Deserialize;

use crate::{AppState, auth::Identity, error::ApiError};

// ─── Checkout / checkin ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
  pub assignee: String,
}

/// `POST /assets/:id/checkout` — fails with 409 if the asset is already
/// assigned; the ledger guard is authoritative even if a stale client
/// offers the button anyway.
pub async fn checkout<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
  Json(body): Json<CheckoutBody>,
) -> Result<Json<Transaction>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::RecordCustody)?;
  let transaction = state
    .store
    .record(
      id,
      identity.0.username.clone(),
      TxAction::Checkout,
      Some(body.assignee),
    )
    .await?;
  Ok(Json(transaction))
}

/// `POST /assets/:id/checkin` — resets custody regardless of the prior
/// assignee.
pub async fn checkin<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
) -> Result<Json<Transaction>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::RecordCustody)?;
  let transaction = state
    .store
    .record(id, identity.0.username.clone(), TxAction::Checkin, None)
    .await?;
  Ok(Json(transaction))
}

// ─── History / audit ─────────────────────────────────────────────────────────

/// `GET /assets/:id/history`
pub async fn history<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;
  let history = state.store.history(id).await?;
  Ok(Json(history))
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityParams {
  pub limit: Option<usize>,
}

/// `GET /activity[?limit=...]`
pub async fn activity<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Query(params): Query<ActivityParams>,
) -> Result<Json<Vec<AuditEntry>>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAuditLog)?;
  let entries = state.store.recent_activity(params.limit).await?;
  Ok(Json(entries))
}

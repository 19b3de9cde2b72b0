//! Handlers for `GET /stats` and `GET /export`.

use axum::{
  Json,
  extract::{Query, State},
};
use depot_core::{
  export::{EXPORT_COLUMNS, export_row},
  query::AssetQuery,
  scope::Capability,
  stats::Stats,
  store::{AssetStore, CredentialStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /stats` — portfolio metrics, recomputed per call.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
) -> Result<Json<Stats>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;
  let stats = state.store.stats().await?;
  Ok(Json(stats))
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ExportParams {
  pub tag:    Option<String>,
  pub search: Option<String>,
}

/// The flat tabular structure handed to the reporting collaborator.
#[derive(Debug, Serialize)]
pub struct ExportPayload {
  pub columns: Vec<&'static str>,
  pub rows:    Vec<Vec<String>>,
}

/// `GET /export[?tag=...][&search=...]` — the full (optionally filtered)
/// set, never paginated.
pub async fn export<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Query(params): Query<ExportParams>,
) -> Result<Json<ExportPayload>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ExportData)?;

  let query = AssetQuery {
    tag: params.tag,
    search: params.search,
    ..Default::default()
  };
  let page = state.store.list_assets(&query).await?;

  Ok(Json(ExportPayload {
    columns: EXPORT_COLUMNS.to_vec(),
    rows:    page.items.iter().map(export_row).collect(),
  }))
}

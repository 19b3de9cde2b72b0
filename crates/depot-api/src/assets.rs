//! Handlers for `/assets` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/assets` | List/search/filter/paginate |
//! | `POST`   | `/assets` | Create + ledger `CREATE`/`CREATE_ASSIGN` entry |
//! | `GET`    | `/assets/:id` | 404 if not found |
//! | `PATCH`  | `/assets/:id` | Named-field partial update |
//! | `DELETE` | `/assets/:id` | Idempotent; cascades to the ledger |
//! | `GET`    | `/assets/by-serial/:serial` | Exact serial lookup |
//! | `POST`   | `/import` | Pre-parsed bulk records; bad rows skipped |
//! | `POST`   | `/assets/bulk` | Admin row-by-row bulk edit |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use depot_core::{
  Error,
  asset::{Asset, AssetId, AssetPatch, NewAsset},
  import::{ImportRecord, ImportReport},
  ledger::TxAction,
  query::{AssetQuery, Page},
  scope::Capability,
  store::{AssetStore, CredentialStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Identity, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Tag filter; omitted or `All` means no filter.
  pub tag:    Option<String>,
  /// Free-text search terms (whitespace-separated, ANDed).
  pub search: Option<String>,
  pub limit:  Option<usize>,
  #[serde(default)]
  pub offset: usize,
}

impl ListParams {
  fn into_query(self) -> AssetQuery {
    AssetQuery {
      tag: self.tag,
      search: self.search,
      limit: self.limit,
      offset: self.offset,
      ..Default::default()
    }
  }
}

/// `GET /assets[?tag=...][&search=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Query(params): Query<ListParams>,
) -> Result<Json<Page>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;
  let page = state.store.list_assets(&params.into_query()).await?;
  Ok(Json(page))
}

// ─── Create ──────────────────────────────────────────────────────────────────

fn validate_new(input: &NewAsset) -> Result<(), ApiError> {
  let mut missing: Vec<&str> = Vec::new();
  if input.serial_number.trim().is_empty() {
    missing.push("serial_number");
  }
  if input.building.trim().is_empty() {
    missing.push("building");
  }
  if input.room.trim().is_empty() {
    missing.push("room");
  }
  if !missing.is_empty() {
    return Err(ApiError::BadRequest(format!(
      "missing required fields: {}",
      missing.join(", ")
    )));
  }
  if input.price.is_some_and(|p| p < 0.0) {
    return Err(ApiError::BadRequest("price must not be negative".into()));
  }
  Ok(())
}

/// `POST /assets` — creates the asset and writes the matching informational
/// ledger entry (`CREATE_ASSIGN` when an initial custodian is given).
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<NewAsset>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageAssets)?;
  validate_new(&body)?;

  let asset = state.store.create_asset(body).await?;

  let (action, assignee) = if asset.is_available() {
    (TxAction::Create, None)
  } else {
    (TxAction::CreateAssign, Some(asset.assigned_to.clone()))
  };
  state
    .store
    .record(asset.id, identity.0.username.clone(), action, assignee)
    .await?;

  Ok((StatusCode::CREATED, Json(asset)))
}

// ─── Get ─────────────────────────────────────────────────────────────────────

/// `GET /assets/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;
  let asset = state
    .store
    .get_asset(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

/// `GET /assets/by-serial/:serial`
pub async fn get_by_serial<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(serial): Path<String>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;
  let asset = state.store.get_asset_by_serial(&serial).await?.ok_or_else(
    || ApiError::NotFound(format!("no asset with serial {serial:?}")),
  )?;
  Ok(Json(asset))
}

// ─── Update / delete ─────────────────────────────────────────────────────────

/// `PATCH /assets/:id` — applies the `Some` fields of the body.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
  Json(patch): Json<AssetPatch>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageAssets)?;
  if patch.price.is_some_and(|p| p < 0.0) {
    return Err(ApiError::BadRequest("price must not be negative".into()));
  }
  if patch.serial_number.as_deref().is_some_and(|s| s.trim().is_empty()) {
    return Err(ApiError::BadRequest("serial_number must not be empty".into()));
  }

  if !state.store.update_asset(id, patch).await? {
    return Err(ApiError::NotFound(format!("asset {id} not found")));
  }
  let asset = state
    .store
    .get_asset(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

/// `DELETE /assets/:id` — idempotent.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<AssetId>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageAssets)?;
  state.store.delete_asset(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Import ──────────────────────────────────────────────────────────────────

/// `POST /import` — body: an array of pre-parsed [`ImportRecord`]s.
///
/// Rows without a serial, or with one that is already registered, are
/// skipped and counted; the rest go through the normal create path.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(records): Json<Vec<ImportRecord>>,
) -> Result<Json<ImportReport>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ImportAssets)?;

  let mut report = ImportReport::default();
  for record in records {
    if record.serial.trim().is_empty() {
      report.skipped += 1;
      continue;
    }
    match state.store.create_asset(record.into_new_asset()).await {
      Ok(_) => report.imported += 1,
      Err(Error::DuplicateSerial(_)) => report.skipped += 1,
      Err(e) => return Err(e.into()),
    }
  }
  Ok(Json(report))
}

// ─── Bulk edit ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BulkRow {
  pub id:    AssetId,
  #[serde(flatten)]
  pub patch: AssetPatch,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkReport {
  pub updated: usize,
  pub failed:  usize,
}

/// `POST /assets/bulk` — admin-only row-by-row edit. Failing rows are
/// counted, not fatal.
pub async fn bulk_update<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(rows): Json<Vec<BulkRow>>,
) -> Result<Json<BulkReport>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::BulkEdit)?;

  let mut report = BulkReport::default();
  for row in rows {
    match state.store.update_asset(row.id, row.patch).await {
      Ok(true) => report.updated += 1,
      Ok(false) | Err(_) => report.failed += 1,
    }
  }
  Ok(Json(report))
}

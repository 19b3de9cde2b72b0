//! Handler for `POST /scan` — the fast-inventory path.
//!
//! A scan is a serial lookup plus, for writer scopes, a `last_scanned`
//! stamp. Read-only principals may still look assets up; they just leave no
//! trace. The running session log stays with the client.

use axum::{Json, extract::State};
use depot_core::{
  asset::Asset,
  health::{Health, health},
  scope::Capability,
  store::{AssetStore, CredentialStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Identity, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ScanBody {
  pub serial: String,
}

#[derive(Debug, Serialize)]
pub struct ScanOutcome {
  /// Whether the serial matched a registered asset.
  pub verified: bool,
  /// Verification health as of before this scan was stamped.
  pub health:   Option<Health>,
  pub asset:    Option<Asset>,
}

/// `POST /scan` — body: `{"serial":"..."}`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<ScanBody>,
) -> Result<Json<ScanOutcome>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ViewAssets)?;

  let asset = state.store.get_asset_by_serial(&body.serial).await?;
  if let Some(asset) = &asset
    && identity.0.scope.allows(Capability::RecordScan)
  {
    state.store.update_scan_time(&asset.serial_number).await?;
  }

  let health = asset.as_ref().map(|a| health(a.last_scanned.as_deref()));
  Ok(Json(ScanOutcome { verified: asset.is_some(), health, asset }))
}

//! Handler for `GET /backup` — a raw copy of the live store file.
//!
//! This is an administrative whole-file download, not a selective export;
//! restoring is simply dropping the file back in place.

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use depot_core::{
  scope::Capability,
  store::{AssetStore, CredentialStore},
};

use crate::{AppState, auth::Identity, error::ApiError};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
) -> Result<Response, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::Backup)?;

  let bytes = tokio::fs::read(state.store_path.as_ref())
    .await
    .map_err(|e| ApiError::Store(format!("cannot read store file: {e}")))?;

  Ok(
    (
      [
        (header::CONTENT_TYPE, "application/octet-stream"),
        (
          header::CONTENT_DISPOSITION,
          "attachment; filename=\"depot-backup.db\"",
        ),
      ],
      bytes,
    )
      .into_response(),
  )
}

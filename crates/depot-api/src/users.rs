//! Handlers for `/users` endpoints — credential store administration.
//!
//! All routes here require the `ManageUsers` capability. Self-deletion is
//! rejected outright; removing or demoting the last admin is refused by the
//! store itself.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use depot_core::{
  scope::{Capability, Scope},
  store::{AssetStore, CredentialStore},
  user::UserSummary,
};
use serde::Deserialize;

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
) -> Result<Json<Vec<UserSummary>>, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageUsers)?;
  let users = state.store.list_users().await?;
  Ok(Json(users))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
  pub username: String,
  pub password: String,
  #[serde(default = "default_role")]
  pub role:     String,
  pub scope:    Scope,
}

fn default_role() -> String {
  "User".to_owned()
}

/// `POST /users` — 409 when the username is taken.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageUsers)?;
  if body.username.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest(
      "username and password are required".into(),
    ));
  }

  let user = state
    .store
    .add_user(body.username, body.password, body.role, body.scope)
    .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScopeBody {
  pub scope: Scope,
}

/// `PUT /users/:id/scope`
pub async fn update_scope<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<i64>,
  Json(body): Json<ScopeBody>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageUsers)?;
  state.store.update_user_scope(id, body.scope).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PasswordBody {
  pub password: String,
}

/// `PUT /users/:id/password`
pub async fn update_password<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<i64>,
  Json(body): Json<PasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageUsers)?;
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }
  state.store.update_user_password(id, body.password).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /users/:id` — the acting account cannot delete itself.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore + CredentialStore + 'static,
{
  identity.require(Capability::ManageUsers)?;
  if id == identity.0.id {
    return Err(ApiError::Forbidden(
      "you cannot delete your own account".into(),
    ));
  }
  state.store.delete_user(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

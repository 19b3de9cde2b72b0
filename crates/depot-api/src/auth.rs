//! HTTP Basic-auth extractor resolving credentials against the store.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use depot_core::{
  scope::Capability, store::CredentialStore, user::Principal,
};

use crate::{AppState, error::ApiError};

/// The authenticated identity for one request — the explicit session object
/// every gated handler receives. Present in a handler means the request
/// carried valid credentials.
#[derive(Debug, Clone)]
pub struct Identity(pub Principal);

impl Identity {
  /// Gate an operation on one capability.
  pub fn require(&self, cap: Capability) -> Result<(), ApiError> {
    if self.0.scope.allows(cap) {
      Ok(())
    } else {
      Err(ApiError::Forbidden(format!(
        "scope {:?} may not {cap:?}",
        self.0.scope.as_str()
      )))
    }
  }
}

/// Pull the username/password pair out of a Basic authorization header.
/// Any malformed header is simply absent credentials.
fn decode_basic(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?;
  let encoded = value.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (username, password) = creds.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: CredentialStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (username, password) =
      decode_basic(&parts.headers).ok_or(ApiError::Unauthorized)?;

    let principal = state
      .store
      .verify(&username, &password)
      .await?
      .ok_or(ApiError::Unauthorized)?;

    Ok(Identity(principal))
  }
}

#[cfg(test)]
mod tests {
  use std::{path::PathBuf, sync::Arc};

  use axum::http::{Request, header};
  use depot_core::{Result, scope::Scope, user::UserSummary};

  use super::*;

  // A minimal credential backend for exercising the extractor only.
  #[derive(Clone)]
  struct SingleUserStore;

  impl CredentialStore for SingleUserStore {
    async fn verify(
      &self,
      username: &str,
      password: &str,
    ) -> Result<Option<Principal>> {
      Ok((username == "carol" && password == "secret").then(|| Principal {
        id:       1,
        username: "carol".into(),
        role:     "User".into(),
        scope:    Scope::ReadWrite,
      }))
    }

    async fn add_user(
      &self,
      _: String,
      _: String,
      _: String,
      _: Scope,
    ) -> Result<UserSummary> {
      unimplemented!()
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
      unimplemented!()
    }

    async fn update_user_scope(&self, _: i64, _: Scope) -> Result<()> {
      unimplemented!()
    }

    async fn update_user_password(&self, _: i64, _: String) -> Result<()> {
      unimplemented!()
    }

    async fn delete_user(&self, _: i64) -> Result<()> {
      unimplemented!()
    }
  }

  fn state() -> AppState<SingleUserStore> {
    AppState {
      store:      Arc::new(SingleUserStore),
      store_path: Arc::new(PathBuf::from(":memory:")),
    }
  }

  async fn extract(
    req: Request<axum::body::Body>,
  ) -> Result<Identity, ApiError> {
    let (mut parts, _) = req.into_parts();
    Identity::from_request_parts(&mut parts, &state()).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("carol", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    let identity = extract(req).await.unwrap();
    assert_eq!(identity.0.username, "carol");
    assert_eq!(identity.0.scope, Scope::ReadWrite);
  }

  #[tokio::test]
  async fn wrong_password() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("carol", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_user_rejects_identically() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("mallory", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn capability_gating() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("carol", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    let identity = extract(req).await.unwrap();

    assert!(identity.require(Capability::ManageAssets).is_ok());
    assert!(matches!(
      identity.require(Capability::ManageUsers),
      Err(ApiError::Forbidden(_))
    ));
  }
}

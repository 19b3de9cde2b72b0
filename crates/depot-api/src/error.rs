//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use depot_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(String),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match &e {
      CoreError::DuplicateSerial(_)
      | CoreError::DuplicateUsername(_)
      | CoreError::AlreadyAssigned { .. }
      | CoreError::LastAdmin => ApiError::Conflict(e.to_string()),
      CoreError::AssetNotFound(_) | CoreError::UserNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      CoreError::MissingAssignee
      | CoreError::UnknownScope(_)
      | CoreError::UnknownAction(_) => ApiError::BadRequest(e.to_string()),
      CoreError::Storage(_) => ApiError::Store(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_owned())
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Store(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };

    let mut res =
      (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"depot\""),
      );
    }
    res
  }
}

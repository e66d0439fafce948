//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use maize_core::submission::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  /// Carries no id: a missing record and another owner's record produce the
  /// same response body.
  #[error("prediction not found")]
  NotFound,

  #[error(transparent)]
  Validation(ValidationError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<maize_core::Error> for ApiError {
  fn from(e: maize_core::Error) -> Self {
    match e {
      maize_core::Error::Validation(v) => Self::Validation(v),
      maize_core::Error::PredictionNotFound(_) => Self::NotFound,
      maize_core::Error::Store(e) => Self::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

/// An id that does not parse cannot name an existing record.
impl From<PathRejection> for ApiError {
  fn from(_: PathRejection) -> Self { Self::NotFound }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "authentication required" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"maize\""),
        );
        res
      }
      ApiError::NotFound => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "prediction not found" })),
      )
        .into_response(),
      ApiError::Validation(v) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid input", "fields": v.fields })),
      )
        .into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal error" })),
        )
          .into_response()
      }
    }
  }
}

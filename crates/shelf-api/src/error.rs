//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client errors render as `{"detail": ...}`. Internal failures are logged and
//! render as an [`ErrorReport`].

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use shelf_core::report::ErrorReport;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{context}: {source}")]
  Internal {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn product_not_found() -> Self { Self::NotFound("Product not found".to_owned()) }

  pub fn internal<E>(context: &'static str, e: E) -> Self
  where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    Self::Internal { context, source: e.into() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
      ApiError::Internal { context, source } => {
        tracing::error!(context, error = %source, "request failed");
        let report = ErrorReport::new(&source, Some(context));
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(report)).into_response();
      }
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}

//! Handlers for `/sync` endpoints.

use axum::{Json, extract::State, http::StatusCode};
use shelf_core::{
  source::ProductSource,
  store::ProductStore,
  sync::{SyncReport, SyncStatus, sync_products, sync_status},
};

use crate::{AppState, error::ApiError};

/// `POST /sync/trigger`: run one reconciliation pass against the upstream.
///
/// A failed run is returned as a 500 carrying the error report.
pub async fn trigger<S, U>(
  State(state): State<AppState<S, U>>,
) -> (StatusCode, Json<SyncReport>)
where
  S: ProductStore,
  U: ProductSource,
{
  let report = sync_products(state.store.as_ref(), state.upstream.as_ref()).await;
  let status = if report.is_success() {
    StatusCode::OK
  } else {
    StatusCode::INTERNAL_SERVER_ERROR
  };
  (status, Json(report))
}

/// `GET /sync/status`
pub async fn status<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<SyncStatus>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let status = sync_status(state.store.as_ref())
    .await
    .map_err(|e| ApiError::internal("sync_status", e))?;
  Ok(Json(status))
}

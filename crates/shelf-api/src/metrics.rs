//! Handlers for `/metrics/inventory` and `/health`.

use axum::{Json, extract::State};
use shelf_core::{
  metrics::{InventoryMetrics, SyncHealth, check_sync_health, inventory_metrics},
  source::ProductSource,
  store::ProductStore,
};

use crate::{AppState, error::ApiError};

/// `GET /metrics/inventory`
pub async fn inventory<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<InventoryMetrics>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let metrics = inventory_metrics(state.store.as_ref())
    .await
    .map_err(|e| ApiError::internal("inventory_metrics", e))?;
  Ok(Json(metrics))
}

/// `GET /health`
pub async fn health<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<SyncHealth>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let health = check_sync_health(state.store.as_ref())
    .await
    .map_err(|e| ApiError::internal("sync_health", e))?;
  Ok(Json(health))
}

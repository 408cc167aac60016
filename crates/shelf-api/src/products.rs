//! Handlers for `/products` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/products` | `?skip=0&limit=100` |
//! | `GET`    | `/products/low-stock` | `?threshold=10`, accepted range `0..=1000` |
//! | `GET`    | `/products/{id}` | 404 if not found |
//! | `DELETE` | `/products/{id}` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;
use shelf_core::{
  metrics::{LOW_STOCK_THRESHOLD, validate_threshold},
  product::{Page, Product},
  source::ProductSource,
  store::ProductStore,
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:  usize,
  #[serde(default = "default_limit")]
  pub limit: usize,
}

fn default_limit() -> usize { 100 }

/// `GET /products[?skip=<n>][&limit=<n>]`
pub async fn list<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let products = state
    .store
    .list_products(Page::new(params.skip, params.limit))
    .await
    .map_err(|e| ApiError::internal("list_products", e))?;
  Ok(Json(products))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /products/{id}`
pub async fn get_one<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let product = state
    .store
    .get_product(id)
    .await
    .map_err(|e| ApiError::internal("get_product", e))?
    .ok_or_else(ApiError::product_not_found)?;
  Ok(Json(product))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /products/{id}`
pub async fn delete_one<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let deleted = state
    .store
    .delete_product(id)
    .await
    .map_err(|e| ApiError::internal("delete_product", e))?;

  if deleted {
    tracing::info!(id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::product_not_found())
  }
}

// ─── Low stock ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
  #[serde(default = "default_threshold")]
  pub threshold: i64,
}

fn default_threshold() -> i64 { LOW_STOCK_THRESHOLD }

/// `GET /products/low-stock[?threshold=<n>]`
pub async fn low_stock<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<LowStockParams>,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let threshold =
    validate_threshold(params.threshold).map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let products = state
    .store
    .low_inventory_products(threshold)
    .await
    .map_err(|e| ApiError::internal("low_inventory_products", e))?;
  Ok(Json(products))
}

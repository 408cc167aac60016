//! JSON REST API for Shelf.
//!
//! Exposes an axum [`Router`] backed by any [`ProductStore`] and any
//! [`ProductSource`]. TLS and transport concerns are the caller's
//! responsibility; cross-origin policy is provided by [`cors::cors_layer`] for
//! the caller to apply.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = shelf_api::api_router(state).layer(shelf_api::cors::cors_layer(&origins));
//! ```

pub mod cors;
pub mod error;
pub mod metrics;
pub mod products;
pub mod sync;
pub mod webhook;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use shelf_core::{source::ProductSource, store::ProductStore};

pub use error::ApiError;
pub use webhook::WebhookVerifier;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, U> {
  pub store:    Arc<S>,
  pub upstream: Arc<U>,
  pub webhook:  Arc<WebhookVerifier>,
}

impl<S, U> AppState<S, U> {
  pub fn new(store: S, upstream: U, webhook: WebhookVerifier) -> Self {
    Self {
      store:    Arc::new(store),
      upstream: Arc::new(upstream),
      webhook:  Arc::new(webhook),
    }
  }
}

// Derived `Clone` would demand `S: Clone` and `U: Clone`.
impl<S, U> Clone for AppState<S, U> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      upstream: Arc::clone(&self.upstream),
      webhook:  Arc::clone(&self.webhook),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, U>(state: AppState<S, U>) -> Router<()>
where
  S: ProductStore + 'static,
  U: ProductSource + 'static,
{
  Router::new()
    // Products
    .route("/products", get(products::list::<S, U>))
    .route("/products/low-stock", get(products::low_stock::<S, U>))
    .route(
      "/products/{id}",
      get(products::get_one::<S, U>).delete(products::delete_one::<S, U>),
    )
    // Sync
    .route("/sync/trigger", post(sync::trigger::<S, U>))
    .route("/sync/status", get(sync::status::<S, U>))
    // Metrics
    .route("/metrics/inventory", get(metrics::inventory::<S, U>))
    .route("/health", get(metrics::health::<S, U>))
    // Webhooks
    .route("/webhook/inventory-update", post(webhook::inventory_update::<S, U>))
    .with_state(state)
}

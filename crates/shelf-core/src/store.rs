//! The `ProductStore` trait: the data-access contract.
//!
//! Implemented by storage backends (e.g. `shelf-store-sqlite`). The services
//! in this crate and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::product::{NewProduct, Page, Product, ProductUpdate};

/// Abstraction over a product store backend.
///
/// Every write is committed on its own; there is no transaction spanning
/// several calls. Lookups that find nothing return `Ok(None)` rather than an
/// error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProductStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a product by its local id.
  fn get_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  /// Retrieve a product by its upstream identifier.
  fn get_product_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + 'a;

  /// List products in `id` order within `page`. No total count is returned.
  fn list_products(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  /// Exact number of stored products.
  fn count_products(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Products with `inventory <= threshold`, in `id` order.
  fn low_inventory_products(
    &self,
    threshold: i64,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new product. `previous_inventory` is set to
  /// `initial_inventory`, `inventory_change` to zero and `last_synced` to now.
  ///
  /// Fails if `external_id` is already taken.
  fn create_product(
    &self,
    input: NewProduct,
    initial_inventory: i64,
  ) -> impl Future<Output = Result<Product, Self::Error>> + Send + '_;

  /// Apply the `Some` fields of `update` and stamp `last_synced`.
  /// Returns the refreshed record, or `None` if `id` does not exist.
  fn update_product(
    &self,
    id: i64,
    update: ProductUpdate,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  /// Delete a product. Returns `false` if it did not exist.
  fn delete_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every product, returning how many were removed.
  fn clear_products(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

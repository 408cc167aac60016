//! Read-only inventory metrics and sync-health checks.
//!
//! The aggregations are pure functions over a product slice; the `async`
//! wrappers only load the slice from a [`ProductStore`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  product::{Page, Product},
  store::ProductStore,
};

/// Inventory at or below this level counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Upper bound accepted by [`validate_threshold`].
pub const MAX_THRESHOLD: i64 = 1000;

/// A product not written for this long is stale.
pub const STALE_AFTER_SECS: i64 = 60 * 60;

// ─── Stock status ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
  OutOfStock,
  LowStock,
  InStock,
}

impl StockStatus {
  pub fn classify(inventory: i64) -> Self {
    if inventory <= 0 {
      Self::OutOfStock
    } else if inventory <= LOW_STOCK_THRESHOLD {
      Self::LowStock
    } else {
      Self::InStock
    }
  }
}

/// Accept thresholds in `0..=1000`.
pub fn validate_threshold(value: i64) -> Result<i64> {
  if (0..=MAX_THRESHOLD).contains(&value) {
    Ok(value)
  } else {
    Err(Error::InvalidThreshold(value))
  }
}

// ─── Inventory metrics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMetrics {
  pub total_inventory:    i64,
  pub low_stock_count:    usize,
  pub out_of_stock_count: usize,
  pub total_products:     usize,
}

impl InventoryMetrics {
  /// Aggregate `products`. Only products at exactly zero count as out of
  /// stock here; negative levels are counted as low stock.
  ///
  /// Fails if the total inventory does not fit in an `i64`.
  pub fn from_products(products: &[Product]) -> Result<Self> {
    let total_inventory = products
      .iter()
      .try_fold(0i64, |acc, p| acc.checked_add(p.inventory))
      .ok_or(Error::TotalInventoryOverflow)?;

    Ok(Self {
      total_inventory,
      low_stock_count: products
        .iter()
        .filter(|p| p.inventory <= LOW_STOCK_THRESHOLD)
        .count(),
      out_of_stock_count: products.iter().filter(|p| p.inventory == 0).count(),
      total_products: products.len(),
    })
  }
}

pub async fn inventory_metrics<S: ProductStore>(store: &S) -> Result<InventoryMetrics> {
  let products = store.list_products(Page::all()).await.map_err(Error::store)?;
  InventoryMetrics::from_products(&products)
}

// ─── Sync health ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
  Healthy,
  Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncHealth {
  pub status:                 HealthStatus,
  pub stale_products_count:   usize,
  pub last_check:             DateTime<Utc>,
  pub total_products_checked: usize,
}

impl SyncHealth {
  /// Classify `products` as of `now`. An empty set is healthy.
  pub fn assess(products: &[Product], now: DateTime<Utc>) -> Self {
    let cutoff = now - TimeDelta::seconds(STALE_AFTER_SECS);
    let stale = products.iter().filter(|p| p.last_synced < cutoff).count();

    Self {
      status:                 if stale == 0 {
        HealthStatus::Healthy
      } else {
        HealthStatus::Warning
      },
      stale_products_count:   stale,
      last_check:             now,
      total_products_checked: products.len(),
    }
  }
}

pub async fn check_sync_health<S: ProductStore>(store: &S) -> Result<SyncHealth> {
  let products = store.list_products(Page::all()).await.map_err(Error::store)?;
  Ok(SyncHealth::assess(&products, Utc::now()))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use rust_decimal::Decimal;

  use super::*;

  fn product(inventory: i64, last_synced: DateTime<Utc>) -> Product {
    Product {
      id: 1,
      external_id: format!("ext-{inventory}"),
      title: "Widget".into(),
      inventory,
      previous_inventory: inventory,
      inventory_change: 0,
      price: Decimal::ZERO,
      last_synced,
    }
  }

  fn noon() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() }

  #[test]
  fn classify_boundaries() {
    assert_eq!(StockStatus::classify(-3), StockStatus::OutOfStock);
    assert_eq!(StockStatus::classify(0), StockStatus::OutOfStock);
    assert_eq!(StockStatus::classify(1), StockStatus::LowStock);
    assert_eq!(StockStatus::classify(10), StockStatus::LowStock);
    assert_eq!(StockStatus::classify(11), StockStatus::InStock);
  }

  #[test]
  fn threshold_range_is_inclusive() {
    assert_eq!(validate_threshold(0).unwrap(), 0);
    assert_eq!(validate_threshold(1000).unwrap(), 1000);
    assert!(matches!(validate_threshold(-1), Err(Error::InvalidThreshold(-1))));
    assert!(matches!(validate_threshold(1001), Err(Error::InvalidThreshold(1001))));
  }

  #[test]
  fn metrics_over_mixed_inventory() {
    let now = noon();
    let products = vec![product(0, now), product(7, now), product(10, now), product(50, now)];
    let m = InventoryMetrics::from_products(&products).unwrap();
    assert_eq!(m.total_inventory, 67);
    assert_eq!(m.low_stock_count, 3);
    assert_eq!(m.out_of_stock_count, 1);
    assert_eq!(m.total_products, 4);
  }

  #[test]
  fn metrics_over_empty_set() {
    let m = InventoryMetrics::from_products(&[]).unwrap();
    assert_eq!(m, InventoryMetrics {
      total_inventory:    0,
      low_stock_count:    0,
      out_of_stock_count: 0,
      total_products:     0,
    });
  }

  #[test]
  fn only_zero_inventory_is_out_of_stock() {
    let now = noon();
    let products = vec![product(-2, now), product(0, now), product(3, now)];
    let m = InventoryMetrics::from_products(&products).unwrap();
    assert_eq!(m.out_of_stock_count, 1);
    assert_eq!(m.low_stock_count, 3);
    assert_eq!(m.total_inventory, 1);
  }

  #[test]
  fn overflowing_total_is_an_error() {
    let now = noon();
    let products = vec![product(i64::MAX, now), product(1, now)];
    assert!(matches!(
      InventoryMetrics::from_products(&products),
      Err(Error::TotalInventoryOverflow)
    ));
  }

  #[test]
  fn empty_set_is_healthy() {
    let health = SyncHealth::assess(&[], noon());
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.stale_products_count, 0);
    assert_eq!(health.total_products_checked, 0);
  }

  #[test]
  fn product_older_than_an_hour_is_stale() {
    let now = noon();
    let products = vec![
      product(5, now - TimeDelta::minutes(59)),
      product(6, now - TimeDelta::minutes(61)),
    ];
    let health = SyncHealth::assess(&products, now);
    assert_eq!(health.status, HealthStatus::Warning);
    assert_eq!(health.stale_products_count, 1);
    assert_eq!(health.total_products_checked, 2);
    assert_eq!(health.last_check, now);
  }

  #[test]
  fn health_status_serialises_lowercase() {
    let json = serde_json::to_value(SyncHealth::assess(&[], noon())).unwrap();
    assert_eq!(json["status"], "healthy");
  }
}

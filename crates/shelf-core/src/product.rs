//! Product: the single entity mirrored between the upstream catalogue and
//! the local store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, metrics::StockStatus};

// ─── Persisted record ────────────────────────────────────────────────────────

/// A product as held in the local store.
///
/// `inventory_change` is always `inventory - previous_inventory` as of the
/// most recent write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  /// Locally assigned primary key. Never reassigned.
  pub id:                 i64,
  /// Identifier assigned by the upstream catalogue; unique across records.
  pub external_id:        String,
  pub title:              String,
  pub inventory:          i64,
  pub previous_inventory: i64,
  pub inventory_change:   i64,
  #[serde(with = "rust_decimal::serde::float")]
  pub price:              Decimal,
  /// Server-assigned on every create and update.
  pub last_synced:        DateTime<Utc>,
}

impl Product {
  pub fn stock_status(&self) -> StockStatus { StockStatus::classify(self.inventory) }
}

// ─── Write payloads ──────────────────────────────────────────────────────────

/// Creation payload. `id`, the inventory baseline and `last_synced` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
  pub external_id: String,
  pub title:       String,
  pub inventory:   i64,
  #[serde(with = "rust_decimal::serde::float")]
  pub price:       Decimal,
}

/// A partial update: only `Some` fields are written. The store always
/// refreshes `last_synced`, even when every field is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
  pub title:              Option<String>,
  pub inventory:          Option<i64>,
  pub previous_inventory: Option<i64>,
  pub inventory_change:   Option<i64>,
  pub price:              Option<Decimal>,
}

impl ProductUpdate {
  /// Move inventory from `old` to `new`, recording the baseline and delta.
  /// Fails if the delta does not fit in an `i64`.
  pub fn inventory_delta(old: i64, new: i64) -> Result<Self> {
    let change = new
      .checked_sub(old)
      .ok_or(Error::InventoryOverflow { old, new })?;
    Ok(Self {
      inventory: Some(new),
      previous_inventory: Some(old),
      inventory_change: Some(change),
      ..Self::default()
    })
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A `skip`/`limit` window over products ordered by `id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
  pub skip:  usize,
  /// `None` means no upper bound.
  pub limit: Option<usize>,
}

impl Page {
  pub fn new(skip: usize, limit: usize) -> Self { Self { skip, limit: Some(limit) } }

  /// Every product, in `id` order.
  pub fn all() -> Self { Self::default() }
}

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Prices are stored as decimal
//! strings so no precision is lost to floating point.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelf_core::product::Product;

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_price(price: Decimal) -> String { price.normalize().to_string() }

pub fn decode_price(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawProduct::from_row`].
pub const PRODUCT_COLUMNS: &str = "id, external_id, title, inventory, \
                                   previous_inventory, inventory_change, \
                                   price, last_synced";

/// Raw values read directly from a `products` row.
pub struct RawProduct {
  pub id:                 i64,
  pub external_id:        String,
  pub title:              String,
  pub inventory:          i64,
  pub previous_inventory: i64,
  pub inventory_change:   i64,
  pub price:              String,
  pub last_synced:        String,
}

impl RawProduct {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      external_id:        row.get(1)?,
      title:              row.get(2)?,
      inventory:          row.get(3)?,
      previous_inventory: row.get(4)?,
      inventory_change:   row.get(5)?,
      price:              row.get(6)?,
      last_synced:        row.get(7)?,
    })
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      id:                 self.id,
      external_id:        self.external_id,
      title:              self.title,
      inventory:          self.inventory,
      previous_inventory: self.previous_inventory,
      inventory_change:   self.inventory_change,
      price:              decode_price(&self.price)?,
      last_synced:        decode_dt(&self.last_synced)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn price_round_trips_exactly() {
    let price = Decimal::new(15999, 2);
    assert_eq!(encode_price(price), "159.99");
    assert_eq!(decode_price("159.99").unwrap(), price);
  }

  #[test]
  fn zero_price_encodes_as_zero() {
    assert_eq!(encode_price(Decimal::new(0, 2)), "0");
  }

  #[test]
  fn bad_timestamp_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}

//! A randomised in-memory catalogue standing in for a real shop.
//!
//! The catalogue itself is fixed; every snapshot draws fresh inventory
//! quantities so repeated syncs produce visible deltas.

use std::{convert::Infallible, ops::RangeInclusive};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use shelf_core::{
  product::NewProduct,
  source::{ExternalProduct, ProductSource},
};

/// Quantity range reported by every snapshot.
const SNAPSHOT_RANGE: RangeInclusive<i64> = 0..=100;

struct CatalogItem {
  id:            &'static str,
  title:         &'static str,
  /// Price in cents.
  price_cents:   i64,
  /// Initial stock range used when seeding a fresh database.
  initial_stock: RangeInclusive<i64>,
}

const CATALOG: &[CatalogItem] = &[
  CatalogItem { id: "840080123456", title: "Classic T-Shirt",     price_cents: 2999,  initial_stock: 0..=100 },
  CatalogItem { id: "840080123457", title: "Vintage Jeans",       price_cents: 8999,  initial_stock: 0..=50 },
  CatalogItem { id: "840080123458", title: "Running Shoes",       price_cents: 11999, initial_stock: 0..=30 },
  CatalogItem { id: "840080123459", title: "Summer Dress",        price_cents: 6999,  initial_stock: 5..=75 },
  CatalogItem { id: "840080123460", title: "Leather Wallet",      price_cents: 4999,  initial_stock: 10..=200 },
  CatalogItem { id: "840080123461", title: "Designer Sunglasses", price_cents: 15999, initial_stock: 0..=150 },
  CatalogItem { id: "840080123462", title: "Travel Backpack",     price_cents: 7999,  initial_stock: 5..=50 },
  CatalogItem { id: "840080123463", title: "Smart Watch",         price_cents: 29999, initial_stock: 0..=25 },
  CatalogItem { id: "840080123464", title: "Athletic Sneakers",   price_cents: 8999,  initial_stock: 10..=100 },
  CatalogItem { id: "840080123465", title: "Baseball Cap",        price_cents: 2499,  initial_stock: 20..=200 },
  CatalogItem { id: "840080123466", title: "Yoga Mat",            price_cents: 3999,  initial_stock: 15..=80 },
  CatalogItem { id: "840080123467", title: "Wireless Earbuds",    price_cents: 12999, initial_stock: 5..=60 },
  CatalogItem { id: "840080123468", title: "Coffee Maker",        price_cents: 19999, initial_stock: 8..=40 },
  CatalogItem { id: "840080123469", title: "Desk Lamp",           price_cents: 4599,  initial_stock: 12..=90 },
  CatalogItem { id: "840080123470", title: "Water Bottle",        price_cents: 1999,  initial_stock: 30..=150 },
  CatalogItem { id: "840080123471", title: "Gaming Mouse",        price_cents: 7999,  initial_stock: 10..=70 },
  CatalogItem { id: "840080123472", title: "Portable Charger",    price_cents: 3499,  initial_stock: 20..=120 },
  CatalogItem { id: "840080123473", title: "Bluetooth Speaker",   price_cents: 8999,  initial_stock: 5..=45 },
  CatalogItem { id: "840080123474", title: "Plant Pot Set",       price_cents: 2999,  initial_stock: 15..=60 },
  CatalogItem { id: "840080123475", title: "Kitchen Knife Set",   price_cents: 14999, initial_stock: 8..=35 },
];

/// Randomised mock of an upstream shop.
pub struct MockCatalog {
  rng: Mutex<StdRng>,
}

impl MockCatalog {
  /// A catalogue seeded from the operating system's entropy source.
  pub fn new() -> Self { Self { rng: Mutex::new(StdRng::from_os_rng()) } }

  /// A reproducible catalogue: the same seed yields the same snapshots.
  pub fn with_seed(seed: u64) -> Self {
    Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
  }

  /// Draw a fresh snapshot of every catalogue item.
  pub fn snapshot(&self) -> Vec<ExternalProduct> {
    let mut rng = self.rng.lock();
    CATALOG
      .iter()
      .map(|item| ExternalProduct {
        external_id: item.id.to_owned(),
        title:       item.title.to_owned(),
        inventory:   rng.random_range(SNAPSHOT_RANGE),
        price:       Decimal::new(item.price_cents, 2),
      })
      .collect()
  }

  /// Demo records for seeding an empty database, with per-item stock ranges.
  pub fn seed_products(&self) -> Vec<NewProduct> {
    let mut rng = self.rng.lock();
    CATALOG
      .iter()
      .map(|item| NewProduct {
        external_id: item.id.to_owned(),
        title:       item.title.to_owned(),
        inventory:   rng.random_range(item.initial_stock.clone()),
        price:       Decimal::new(item.price_cents, 2),
      })
      .collect()
  }
}

impl Default for MockCatalog {
  fn default() -> Self { Self::new() }
}

impl ProductSource for MockCatalog {
  type Error = Infallible;

  async fn fetch_current_products(&self) -> Result<Vec<ExternalProduct>, Infallible> {
    Ok(self.snapshot())
  }
}

//! The `ProductSource` capability: anything that can report the current
//! state of the upstream catalogue.

use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::NewProduct;

/// One product as reported by the upstream catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProduct {
  pub external_id: String,
  pub title:       String,
  pub inventory:   i64,
  #[serde(with = "rust_decimal::serde::float")]
  pub price:       Decimal,
}

impl From<ExternalProduct> for NewProduct {
  fn from(p: ExternalProduct) -> Self {
    NewProduct {
      external_id: p.external_id,
      title:       p.title,
      inventory:   p.inventory,
      price:       p.price,
    }
  }
}

/// A snapshot provider for reconciliation.
///
/// Implementations decide how fresh the snapshot is and how transport
/// failures are reported; callers never retry.
pub trait ProductSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every product the upstream currently knows about.
  fn fetch_current_products(
    &self,
  ) -> impl Future<Output = Result<Vec<ExternalProduct>, Self::Error>> + Send + '_;
}

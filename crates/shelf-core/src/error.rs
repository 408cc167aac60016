//! Error types for `shelf-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("threshold {0} is outside the accepted range 0..=1000")]
  InvalidThreshold(i64),

  #[error("invalid inventory event: {0}")]
  InvalidEvent(#[from] serde_json::Error),

  /// The change from `old` to `new` does not fit in an `i64`.
  #[error("inventory change from {old} to {new} is out of range")]
  InventoryOverflow { old: i64, new: i64 },

  #[error("total inventory is out of range")]
  TotalInventoryOverflow,

  /// The record was deleted between lookup and update.
  #[error("product {0} disappeared during update")]
  ProductVanished(i64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("upstream error: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn upstream<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Upstream(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Upstream catalogue clients for Shelf.
//!
//! Two [`ProductSource`] variants are provided: [`MockCatalog`], a randomised
//! stand-in for a real shop, and [`ShopifyClient`], which reads the Shopify
//! Admin REST API. [`Upstream`] selects one at startup.

pub mod error;
pub mod mock;
pub mod shopify;

pub use error::{Error, Result};
pub use mock::MockCatalog;
pub use shopify::{ShopifyClient, ShopifyConfig};

use shelf_core::source::{ExternalProduct, ProductSource};

/// The upstream chosen by configuration.
pub enum Upstream {
  Mock(MockCatalog),
  Shopify(ShopifyClient),
}

impl ProductSource for Upstream {
  type Error = Error;

  async fn fetch_current_products(&self) -> Result<Vec<ExternalProduct>> {
    match self {
      Upstream::Mock(catalog) => Ok(catalog.snapshot()),
      Upstream::Shopify(client) => client.fetch_current_products().await,
    }
  }
}

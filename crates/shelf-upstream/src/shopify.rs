//! Async client for the Shopify Admin REST API.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shelf_core::source::{ExternalProduct, ProductSource};

use crate::{Error, Result};

/// Largest page the products endpoint will return.
const PAGE_LIMIT: u32 = 250;

/// Connection settings for one shop.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
  /// e.g. `https://example.myshopify.com`
  pub shop_url:     String,
  pub access_token: String,
  /// e.g. `2024-01`
  pub api_version:  String,
  pub timeout:      Duration,
}

/// Reads the current product list from a Shopify shop.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ShopifyClient {
  client: Client,
  config: ShopifyConfig,
}

impl ShopifyClient {
  pub fn new(config: ShopifyConfig) -> Result<Self> {
    if config.shop_url.trim().is_empty() {
      return Err(Error::Config("shop url is empty".into()));
    }
    if config.access_token.is_empty() {
      return Err(Error::Config("access token is empty".into()));
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn products_url(&self) -> String {
    format!(
      "{}/admin/api/{}/products.json",
      self.config.shop_url.trim_end_matches('/'),
      self.config.api_version
    )
  }
}

impl ProductSource for ShopifyClient {
  type Error = Error;

  /// `GET /admin/api/{version}/products.json`
  // TODO: follow the `Link: rel="next"` header for shops with more than 250 products.
  async fn fetch_current_products(&self) -> Result<Vec<ExternalProduct>> {
    let resp = self
      .client
      .get(self.products_url())
      .header("X-Shopify-Access-Token", &self.config.access_token)
      .query(&[("limit", PAGE_LIMIT)])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    let body: ProductsResponse = resp.json().await?;
    tracing::debug!(count = body.products.len(), "fetched products from shopify");
    Ok(body.products.into_iter().map(ShopifyProduct::into_external).collect())
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProductsResponse {
  products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
struct ShopifyProduct {
  id:       u64,
  title:    String,
  #[serde(default)]
  variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
struct ShopifyVariant {
  #[serde(default)]
  inventory_quantity: i64,
  #[serde(with = "rust_decimal::serde::str")]
  price:              Decimal,
}

impl ShopifyProduct {
  /// Inventory is summed across variants; the first variant's price stands
  /// for the product.
  fn into_external(self) -> ExternalProduct {
    ExternalProduct {
      external_id: self.id.to_string(),
      title:       self.title,
      inventory:   self.variants.iter().map(|v| v.inventory_quantity).sum(),
      price:       self.variants.first().map_or(Decimal::ZERO, |v| v.price),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const BODY: &str = r#"{
    "products": [
      {
        "id": 632910392,
        "title": "IPod Nano - 8GB",
        "vendor": "Apple",
        "variants": [
          { "id": 1, "price": "199.00", "inventory_quantity": 10 },
          { "id": 2, "price": "209.00", "inventory_quantity": 20 },
          { "id": 3, "price": "199.00" }
        ]
      },
      { "id": 921728736, "title": "IPod Touch 8GB", "variants": [] }
    ]
  }"#;

  fn parse() -> Vec<ExternalProduct> {
    let body: ProductsResponse = serde_json::from_str(BODY).unwrap();
    body.products.into_iter().map(ShopifyProduct::into_external).collect()
  }

  #[test]
  fn variants_are_folded_into_one_product() {
    let products = parse();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].external_id, "632910392");
    assert_eq!(products[0].title, "IPod Nano - 8GB");
    assert_eq!(products[0].inventory, 30);
    assert_eq!(products[0].price, Decimal::new(19900, 2));
  }

  #[test]
  fn product_without_variants_has_zero_stock_and_price() {
    let products = parse();
    assert_eq!(products[1].inventory, 0);
    assert_eq!(products[1].price, Decimal::ZERO);
  }

  fn config() -> ShopifyConfig {
    ShopifyConfig {
      shop_url:     "https://example.myshopify.com/".into(),
      access_token: "shpat_test".into(),
      api_version:  "2024-01".into(),
      timeout:      Duration::from_secs(5),
    }
  }

  #[test]
  fn products_url_joins_cleanly() {
    let client = ShopifyClient::new(config()).unwrap();
    assert_eq!(
      client.products_url(),
      "https://example.myshopify.com/admin/api/2024-01/products.json"
    );
  }

  #[test]
  fn missing_credentials_are_rejected() {
    let mut cfg = config();
    cfg.access_token.clear();
    assert!(matches!(ShopifyClient::new(cfg), Err(Error::Config(_))));
  }
}

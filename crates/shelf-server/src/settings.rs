//! Server configuration: an optional TOML file overlaid with the process
//! environment.
//!
//! Environment keys are unprefixed, so `DATABASE_URL` sets `database_url`.

use std::{path::Path, time::Duration};

use anyhow::{Context as _, bail};
use serde::Deserialize;
use shelf_upstream::{MockCatalog, ShopifyClient, ShopifyConfig, Upstream};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
  #[default]
  Mock,
  Shopify,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub database_url:           Option<String>,
  pub shopify_webhook_secret: Option<String>,
  #[serde(default = "default_host")]
  pub host:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  /// Comma-separated list of allowed browser origins.
  #[serde(default = "default_cors_origins")]
  pub cors_origins:           String,
  #[serde(default)]
  pub upstream:               UpstreamKind,
  pub mock_seed:              Option<u64>,
  pub shopify_shop_url:       Option<String>,
  pub shopify_access_token:   Option<String>,
  #[serde(default = "default_api_version")]
  pub shopify_api_version:    String,
  #[serde(default = "default_timeout_secs")]
  pub upstream_timeout_secs:  u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_cors_origins() -> String { "http://localhost:3000".to_owned() }

fn default_api_version() -> String { "2024-01".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

impl ServerConfig {
  /// Read `path` (if it exists) and then the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::default().try_parsing(true))
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  /// The database connection string. There is no fallback.
  pub fn database_url(&self) -> anyhow::Result<&str> {
    match self.database_url.as_deref().map(str::trim) {
      Some(url) if !url.is_empty() => Ok(url),
      _ => bail!("DATABASE_URL is not set; refusing to start without a database"),
    }
  }

  pub fn cors_origins(&self) -> Vec<String> {
    self
      .cors_origins
      .split(',')
      .map(str::trim)
      .filter(|o| !o.is_empty())
      .map(str::to_owned)
      .collect()
  }

  pub fn bind_address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Construct the configured upstream.
  pub fn build_upstream(&self) -> anyhow::Result<Upstream> {
    match self.upstream {
      UpstreamKind::Mock => {
        let catalog = match self.mock_seed {
          Some(seed) => MockCatalog::with_seed(seed),
          None => MockCatalog::new(),
        };
        Ok(Upstream::Mock(catalog))
      }
      UpstreamKind::Shopify => {
        let (Some(shop_url), Some(access_token)) =
          (&self.shopify_shop_url, &self.shopify_access_token)
        else {
          bail!("upstream = shopify requires SHOPIFY_SHOP_URL and SHOPIFY_ACCESS_TOKEN");
        };
        let client = ShopifyClient::new(ShopifyConfig {
          shop_url:     shop_url.clone(),
          access_token: access_token.clone(),
          api_version:  self.shopify_api_version.clone(),
          timeout:      Duration::from_secs(self.upstream_timeout_secs),
        })
        .context("invalid shopify configuration")?;
        Ok(Upstream::Shopify(client))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_apply() {
    let cfg = from_toml(r#"database_url = "sqlite://shelf.db""#);
    assert_eq!(cfg.bind_address(), "0.0.0.0:8000");
    assert_eq!(cfg.cors_origins(), ["http://localhost:3000"]);
    assert_eq!(cfg.upstream, UpstreamKind::Mock);
    assert_eq!(cfg.shopify_api_version, "2024-01");
    assert_eq!(cfg.upstream_timeout_secs, 30);
    assert!(cfg.shopify_webhook_secret.is_none());
    assert_eq!(cfg.database_url().unwrap(), "sqlite://shelf.db");
  }

  #[test]
  fn missing_database_url_is_an_error() {
    let cfg = from_toml("port = 9000");
    assert!(cfg.database_url().is_err());

    let blank = from_toml(r#"database_url = "  ""#);
    assert!(blank.database_url().is_err());
  }

  #[test]
  fn cors_origins_are_split_and_trimmed() {
    let cfg = from_toml(
      r#"cors_origins = "http://localhost:3000, https://admin.example.com,,""#,
    );
    assert_eq!(cfg.cors_origins(), [
      "http://localhost:3000",
      "https://admin.example.com"
    ]);
  }

  #[test]
  fn seeded_mock_upstream() {
    let cfg = from_toml("mock_seed = 5");
    assert!(matches!(cfg.build_upstream().unwrap(), Upstream::Mock(_)));
  }

  #[test]
  fn shopify_upstream_requires_credentials() {
    let cfg = from_toml(r#"upstream = "shopify""#);
    assert!(cfg.build_upstream().is_err());

    let cfg = from_toml(
      r#"
        upstream = "shopify"
        shopify_shop_url = "https://example.myshopify.com"
        shopify_access_token = "shpat_test"
        upstream_timeout_secs = 5
      "#,
    );
    assert!(matches!(cfg.build_upstream().unwrap(), Upstream::Shopify(_)));
  }
}

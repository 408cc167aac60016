//! Shelf server binary.
//!
//! Reads `shelf.toml` (or the path given with `--config`) and the process
//! environment, opens the SQLite store named by `DATABASE_URL`, and serves the
//! inventory API over HTTP.
//!
//! # Demo data
//!
//! To replace every stored product with the demo catalogue:
//!
//! ```text
//! cargo run -p shelf-server -- --seed
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use shelf_api::{AppState, WebhookVerifier, cors::cors_layer};
use shelf_core::store::ProductStore;
use shelf_store_sqlite::SqliteStore;
use shelf_upstream::MockCatalog;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Shelf inventory sync server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shelf.toml")]
  config: PathBuf,

  /// Replace all stored products with the demo catalogue and exit.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match dotenvy::dotenv() {
    Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
    Err(e) if e.not_found() => {}
    Err(e) => return Err(e).context("failed to read .env"),
  }

  let server_cfg = ServerConfig::load(&cli.config)?;
  let database_url = server_cfg.database_url()?;

  let store = SqliteStore::connect(database_url)
    .await
    .with_context(|| format!("failed to open store at {database_url}"))?;

  // Helper mode: load demo data and exit.
  if cli.seed {
    return seed(&store, server_cfg.mock_seed).await;
  }

  let upstream = server_cfg.build_upstream()?;

  let webhook = match &server_cfg.shopify_webhook_secret {
    Some(secret) if !secret.is_empty() => WebhookVerifier::new(secret.as_bytes()),
    _ => {
      tracing::warn!("SHOPIFY_WEBHOOK_SECRET is not set; all webhooks will be rejected");
      WebhookVerifier::disabled()
    }
  };

  let state = AppState::new(store, upstream, webhook);
  let app = shelf_api::api_router(state)
    .layer(cors_layer(&server_cfg.cors_origins()))
    .layer(TraceLayer::new_for_http());

  let address = server_cfg.bind_address();
  tracing::info!(upstream = ?server_cfg.upstream, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Clear the store and insert the demo catalogue with randomised stock.
async fn seed(store: &SqliteStore, rng_seed: Option<u64>) -> anyhow::Result<()> {
  let catalog = match rng_seed {
    Some(s) => MockCatalog::with_seed(s),
    None => MockCatalog::new(),
  };

  let removed = store
    .clear_products()
    .await
    .context("failed to clear products")?;
  tracing::info!(removed, "cleared existing products");

  let mut created = 0usize;
  for product in catalog.seed_products() {
    let baseline = product.inventory;
    let external_id = product.external_id.clone();
    store
      .create_product(product, baseline)
      .await
      .with_context(|| format!("failed to create product {external_id}"))?;
    created += 1;
  }

  tracing::info!(created, "seeded demo catalogue");
  Ok(())
}

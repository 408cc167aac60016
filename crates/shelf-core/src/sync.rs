//! Reconciliation: fold an upstream snapshot into the local store.
//!
//! Each external product is matched by `external_id`. Unseen products are
//! created with a zero delta; known products have their inventory delta
//! recorded. Every write commits on its own, so a failure part-way through a
//! batch leaves the earlier writes in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  metrics::LOW_STOCK_THRESHOLD,
  product::{Product, ProductUpdate},
  source::{ExternalProduct, ProductSource},
  store::ProductStore,
};

// ─── Results ─────────────────────────────────────────────────────────────────

/// What a single reconciliation write did.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
  Created(Product),
  Updated(Product),
}

impl Reconciled {
  pub fn product(&self) -> &Product {
    match self {
      Self::Created(p) | Self::Updated(p) => p,
    }
  }

  pub fn into_product(self) -> Product {
    match self {
      Self::Created(p) | Self::Updated(p) => p,
    }
  }

  pub fn is_created(&self) -> bool { matches!(self, Self::Created(_)) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
  pub created: usize,
  pub updated: usize,
}

/// Outcome of a sync run. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncReport {
  Success {
    products_created: usize,
    products_updated: usize,
    timestamp:        DateTime<Utc>,
  },
  Error {
    error:     String,
    timestamp: DateTime<Utc>,
  },
}

impl SyncReport {
  pub fn is_success(&self) -> bool { matches!(self, Self::Success { .. }) }
}

/// Read-only store summary, independent of whether a sync ever ran.
///
/// `{"status":"success","total_products":..,"low_inventory_count":..,"last_sync":..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename = "success")]
pub struct SyncStatus {
  pub total_products:      u64,
  pub low_inventory_count: usize,
  /// When the status was computed.
  pub last_sync:           DateTime<Utc>,
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Create or update the local record for one external product.
pub async fn reconcile_one<S: ProductStore>(
  store: &S,
  external: ExternalProduct,
) -> Result<Reconciled> {
  let existing = store
    .get_product_by_external_id(&external.external_id)
    .await
    .map_err(Error::store)?;

  match existing {
    Some(current) => {
      let update = ProductUpdate {
        title: Some(external.title),
        price: Some(external.price),
        ..ProductUpdate::inventory_delta(current.inventory, external.inventory)?
      };
      store
        .update_product(current.id, update)
        .await
        .map_err(Error::store)?
        .map(Reconciled::Updated)
        .ok_or(Error::ProductVanished(current.id))
    }
    None => {
      // First sighting: the baseline equals the current level, so no change.
      let baseline = external.inventory;
      let created = store
        .create_product(external.into(), baseline)
        .await
        .map_err(Error::store)?;
      Ok(Reconciled::Created(created))
    }
  }
}

/// Fetch a snapshot from `source` and reconcile every record in order.
/// Stops at the first failure.
pub async fn reconcile<S, P>(store: &S, source: &P) -> Result<SyncCounts>
where
  S: ProductStore,
  P: ProductSource,
{
  let snapshot = source
    .fetch_current_products()
    .await
    .map_err(Error::upstream)?;

  let mut counts = SyncCounts::default();
  for external in snapshot {
    match reconcile_one(store, external).await? {
      Reconciled::Created(_) => counts.created += 1,
      Reconciled::Updated(_) => counts.updated += 1,
    }
  }
  Ok(counts)
}

/// Run one sync and summarise it as a [`SyncReport`].
pub async fn sync_products<S, P>(store: &S, source: &P) -> SyncReport
where
  S: ProductStore,
  P: ProductSource,
{
  match reconcile(store, source).await {
    Ok(counts) => {
      tracing::info!(
        created = counts.created,
        updated = counts.updated,
        "product sync complete"
      );
      SyncReport::Success {
        products_created: counts.created,
        products_updated: counts.updated,
        timestamp:        Utc::now(),
      }
    }
    Err(e) => {
      tracing::error!(error = %e, "product sync failed");
      SyncReport::Error { error: e.to_string(), timestamp: Utc::now() }
    }
  }
}

pub async fn sync_status<S: ProductStore>(store: &S) -> Result<SyncStatus> {
  let total_products = store.count_products().await.map_err(Error::store)?;
  let low_inventory_count = store
    .low_inventory_products(LOW_STOCK_THRESHOLD)
    .await
    .map_err(Error::store)?
    .len();

  Ok(SyncStatus { total_products, low_inventory_count, last_sync: Utc::now() })
}

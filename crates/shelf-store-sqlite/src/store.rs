//! [`SqliteStore`]: the SQLite implementation of [`ProductStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use shelf_core::{
  product::{NewProduct, Page, Product, ProductUpdate},
  store::ProductStore,
};

use crate::{
  Location, Result,
  encode::{PRODUCT_COLUMNS, RawProduct, encode_dt, encode_price},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf product store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Statements
/// from concurrent callers are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the store named by a `DATABASE_URL`-style connection string.
  pub async fn connect(database_url: &str) -> Result<Self> {
    match Location::parse(database_url)? {
      Location::Memory => Self::open_in_memory().await,
      Location::File(path) => Self::open(path).await,
    }
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {PRODUCT_COLUMNS} ...` query with a single optional row.
  async fn query_one(
    &self,
    sql: String,
    param: rusqlite::types::Value,
  ) -> Result<Option<Product>> {
    let raw: Option<RawProduct> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawProduct::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProduct::into_product).transpose()
  }
}

// ─── ProductStore impl ───────────────────────────────────────────────────────

impl ProductStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_product(&self, id: i64) -> Result<Option<Product>> {
    self
      .query_one(
        format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        id.into(),
      )
      .await
  }

  async fn get_product_by_external_id(&self, external_id: &str) -> Result<Option<Product>> {
    self
      .query_one(
        format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE external_id = ?1"),
        external_id.to_owned().into(),
      )
      .await
  }

  async fn list_products(&self, page: Page) -> Result<Vec<Product>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = page.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let offset_val = i64::try_from(page.skip).unwrap_or(i64::MAX);

    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawProduct::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  async fn count_products(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }

  async fn low_inventory_products(&self, threshold: i64) -> Result<Vec<Product>> {
    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PRODUCT_COLUMNS} FROM products WHERE inventory <= ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![threshold], RawProduct::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_product(
    &self,
    input: NewProduct,
    initial_inventory: i64,
  ) -> Result<Product> {
    let last_synced = Utc::now();

    let external_id = input.external_id.clone();
    let title       = input.title.clone();
    let inventory   = input.inventory;
    let price_str   = encode_price(input.price);
    let at_str      = encode_dt(last_synced);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO products (
             external_id, title, inventory,
             previous_inventory, inventory_change,
             price, last_synced
           ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
          rusqlite::params![
            external_id,
            title,
            inventory,
            initial_inventory,
            price_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, external_id = %input.external_id, "product created");

    Ok(Product {
      id,
      external_id: input.external_id,
      title: input.title,
      inventory: input.inventory,
      previous_inventory: initial_inventory,
      inventory_change: 0,
      price: input.price,
      last_synced,
    })
  }

  async fn update_product(
    &self,
    id: i64,
    update: ProductUpdate,
  ) -> Result<Option<Product>> {
    let price_str = update.price.map(encode_price);
    let at_str    = encode_dt(Utc::now());

    let raw: Option<RawProduct> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE products SET
             title              = COALESCE(?1, title),
             inventory          = COALESCE(?2, inventory),
             previous_inventory = COALESCE(?3, previous_inventory),
             inventory_change   = COALESCE(?4, inventory_change),
             price              = COALESCE(?5, price),
             last_synced        = ?6
           WHERE id = ?7",
          rusqlite::params![
            update.title,
            update.inventory,
            update.previous_inventory,
            update.inventory_change,
            price_str,
            at_str,
            id,
          ],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
              rusqlite::params![id],
              RawProduct::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProduct::into_product).transpose()
  }

  async fn delete_product(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM products WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn clear_products(&self) -> Result<u64> {
    let deleted = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM products", [])?))
      .await?;
    Ok(deleted as u64)
  }
}

//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS products (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id        TEXT    NOT NULL UNIQUE,  -- upstream identifier
    title              TEXT    NOT NULL,
    inventory          INTEGER NOT NULL,
    previous_inventory INTEGER NOT NULL DEFAULT 0,
    inventory_change   INTEGER NOT NULL DEFAULT 0,
    price              TEXT    NOT NULL,         -- exact decimal string
    last_synced        TEXT    NOT NULL          -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS products_inventory_idx ON products(inventory);

PRAGMA user_version = 1;
";

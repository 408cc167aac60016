//! SQLite backend for the Shelf product store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod location;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use location::Location;
pub use store::SqliteStore;

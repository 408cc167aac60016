//! Core types, traits, and services for the Shelf inventory mirror.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ProductStore`]; upstream catalogues
//! implement [`source::ProductSource`]. The reconciliation, webhook, and
//! metrics services are written against those two traits only.

pub mod error;
pub mod metrics;
pub mod product;
pub mod report;
pub mod source;
pub mod store;
pub mod sync;
pub mod webhook;

pub use error::{Error, Result};

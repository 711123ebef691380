//! SQLite-backed storage for the sales fact table.
//!
//! The store owns the connection pool and the two write paths
//! (append and replace); all read-side aggregation lives in the
//! `analytics` crate.

pub mod error;
pub mod record;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use record::SaleRecord;
pub use sqlite::SalesStore;

//! CSV ingestion for the sales fact store.
//!
//! Parsing is strict: one malformed row fails the whole load, and the
//! error reports how many rows parsed cleanly versus failed. Writes go
//! through the store's transactional append/replace paths, so a failed
//! load never partially commits.

pub mod error;
pub mod load;
pub mod parse;

pub use error::{LoadError, Result};
pub use load::{CsvLoader, LoadReport};

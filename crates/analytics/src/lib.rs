//! Read-side revenue queries over the sales fact table.
//!
//! This crate is the query side of the service:
//! - [`RevenueAnalytics::total_revenue`] — summed revenue over a range
//! - [`RevenueAnalytics::by_dimension`] — grouped revenue per product,
//!   category or region, sorted by revenue descending
//! - [`RevenueAnalytics::trends`] — calendar-bucketed revenue time series
//! - [`RevenueAnalytics::summary`] — composition of the above
//!
//! All queries are read-only; validation of ranges and limits happens
//! at the API boundary before they run.

pub mod error;
pub mod revenue;
pub mod types;

pub use error::{AnalyticsError, Result};
pub use revenue::RevenueAnalytics;
pub use types::{DimensionRevenue, RevenueSummary, TopEntry, TrendPoint};

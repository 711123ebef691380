//! Shared types for the revenue analytics service.

pub mod types;

pub use types::{
    DateRange, Dimension, InvalidDateRange, LoadMode, Period, UnknownLoadMode, UnknownPeriod,
};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive calendar date range bounding every revenue query.
///
/// Construction enforces `start <= end`, so downstream query code never
/// has to re-check the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Error returned when a range's end precedes its start.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("end_date {end} precedes start_date {start}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if end < start {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Grouping dimension for revenue aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Product,
    Category,
    Region,
}

impl Dimension {
    /// The fact-table column this dimension groups by.
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Product => "product",
            Dimension::Category => "category",
            Dimension::Region => "region",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Calendar granularity for trend bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    Quarterly,
    Yearly,
}

/// Error returned when a period string is not one of the known granularities.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid period {0:?}: use \"monthly\", \"quarterly\" or \"yearly\"")]
pub struct UnknownPeriod(pub String);

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Period::Monthly),
            "quarterly" => Ok(Period::Quarterly),
            "yearly" => Ok(Period::Yearly),
            other => Err(UnknownPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

/// How a CSV refresh treats existing rows: add to them or discard them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    Append,
    Replace,
}

/// Error returned when a load mode string is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid mode {0:?}: use \"append\" or \"replace\"")]
pub struct UnknownLoadMode(pub String);

impl FromStr for LoadMode {
    type Err = UnknownLoadMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(LoadMode::Append),
            "replace" => Ok(LoadMode::Replace),
            other => Err(UnknownLoadMode(other.to_string())),
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::Append => f.write_str("append"),
            LoadMode::Replace => f.write_str("replace"),
        }
    }
}

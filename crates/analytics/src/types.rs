use serde::Serialize;

/// One group from a dimension aggregation: the dimension value plus its
/// summed revenue, summed quantity, distinct customers and row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRevenue {
    pub key: String,
    pub revenue: f64,
    pub quantity: i64,
    pub customer_count: i64,
    pub order_count: i64,
}

/// One calendar bucket in a revenue trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub revenue: f64,
    pub order_count: i64,
}

/// Highest-revenue entry for a single dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub revenue: f64,
}

/// Cross-dimension summary for a date range.
///
/// Top entries are `None` when the range matches no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub top_product: Option<TopEntry>,
    pub top_category: Option<TopEntry>,
    pub top_region: Option<TopEntry>,
}

//! Revenue aggregation endpoints.

use std::sync::Arc;

use analytics::DimensionRevenue;
use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use common::{DateRange, Dimension, Period, UnknownPeriod};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

/// Raw query parameters shared by all range-based endpoints.
///
/// Values stay strings until validated so a bad value can be rejected
/// with a message naming the offending field.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<String>,
    period: Option<String>,
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let value = value.ok_or_else(|| {
        ApiError::BadRequest(format!("missing required parameter: {field}"))
    })?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("invalid {field}: expected YYYY-MM-DD, got {value:?}"))
    })
}

fn parse_range(params: &RangeParams) -> Result<DateRange, ApiError> {
    let start = parse_date("start_date", params.start_date.as_deref())?;
    let end = parse_date("end_date", params.end_date.as_deref())?;
    DateRange::new(start, end).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_limit(params: &RangeParams) -> Result<Option<u32>, ApiError> {
    match params.limit.as_deref() {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ApiError::BadRequest(format!(
                "invalid limit: expected a positive integer, got {raw:?}"
            ))),
        },
    }
}

// Absent period falls back to monthly.
fn parse_period(params: &RangeParams) -> Result<Period, ApiError> {
    match params.period.as_deref() {
        None => Ok(Period::Monthly),
        Some(raw) => raw
            .parse()
            .map_err(|e: UnknownPeriod| ApiError::BadRequest(e.to_string())),
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct TotalRevenueResponse {
    pub total_revenue: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
pub struct ProductRevenueResponse {
    pub product: String,
    pub revenue: f64,
    pub quantity: i64,
    pub order_count: i64,
}

#[derive(Serialize)]
pub struct CategoryRevenueResponse {
    pub category: String,
    pub revenue: f64,
    pub quantity: i64,
    pub order_count: i64,
}

#[derive(Serialize)]
pub struct RegionRevenueResponse {
    pub region: String,
    pub revenue: f64,
    pub customer_count: i64,
    pub order_count: i64,
}

#[derive(Serialize)]
pub struct TrendResponse {
    pub period: String,
    pub revenue: f64,
    pub order_count: i64,
}

#[derive(Serialize)]
pub struct TopEntryResponse {
    pub name: String,
    pub revenue: f64,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub total_revenue: f64,
    pub top_product: Option<TopEntryResponse>,
    pub top_category: Option<TopEntryResponse>,
    pub top_region: Option<TopEntryResponse>,
}

// -- Handlers --

/// GET /revenue/total — summed line revenue over the range.
#[tracing::instrument(skip(state))]
pub async fn total(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<TotalRevenueResponse>, ApiError> {
    let range = parse_range(&params)?;
    let total_revenue = state.analytics.total_revenue(range).await?;

    Ok(Json(TotalRevenueResponse {
        total_revenue,
        start_date: range.start(),
        end_date: range.end(),
    }))
}

/// GET /revenue/by-product — grouped revenue per product, top first.
#[tracing::instrument(skip(state))]
pub async fn by_product(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<ProductRevenueResponse>>, ApiError> {
    let groups = grouped(&state, &params, Dimension::Product).await?;
    Ok(Json(
        groups
            .into_iter()
            .map(|g| ProductRevenueResponse {
                product: g.key,
                revenue: g.revenue,
                quantity: g.quantity,
                order_count: g.order_count,
            })
            .collect(),
    ))
}

/// GET /revenue/by-category — grouped revenue per category, top first.
#[tracing::instrument(skip(state))]
pub async fn by_category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<CategoryRevenueResponse>>, ApiError> {
    let groups = grouped(&state, &params, Dimension::Category).await?;
    Ok(Json(
        groups
            .into_iter()
            .map(|g| CategoryRevenueResponse {
                category: g.key,
                revenue: g.revenue,
                quantity: g.quantity,
                order_count: g.order_count,
            })
            .collect(),
    ))
}

/// GET /revenue/by-region — grouped revenue per region with distinct
/// customer counts, top first.
#[tracing::instrument(skip(state))]
pub async fn by_region(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<RegionRevenueResponse>>, ApiError> {
    let groups = grouped(&state, &params, Dimension::Region).await?;
    Ok(Json(
        groups
            .into_iter()
            .map(|g| RegionRevenueResponse {
                region: g.key,
                revenue: g.revenue,
                customer_count: g.customer_count,
                order_count: g.order_count,
            })
            .collect(),
    ))
}

/// GET /revenue/trends — calendar-bucketed revenue series, ascending.
#[tracing::instrument(skip(state))]
pub async fn trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<TrendResponse>>, ApiError> {
    let range = parse_range(&params)?;
    let period = parse_period(&params)?;
    let points = state.analytics.trends(range, period).await?;

    Ok(Json(
        points
            .into_iter()
            .map(|p| TrendResponse {
                period: p.period,
                revenue: p.revenue,
                order_count: p.order_count,
            })
            .collect(),
    ))
}

/// GET /revenue/summary — total plus the top entry per dimension.
#[tracing::instrument(skip(state))]
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let range = parse_range(&params)?;
    let summary = state.analytics.summary(range).await?;

    let top = |entry: Option<analytics::TopEntry>| {
        entry.map(|e| TopEntryResponse {
            name: e.name,
            revenue: e.revenue,
        })
    };

    Ok(Json(SummaryResponse {
        total_revenue: summary.total_revenue,
        top_product: top(summary.top_product),
        top_category: top(summary.top_category),
        top_region: top(summary.top_region),
    }))
}

async fn grouped(
    state: &AppState,
    params: &RangeParams,
    dimension: Dimension,
) -> Result<Vec<DimensionRevenue>, ApiError> {
    let range = parse_range(params)?;
    let limit = parse_limit(params)?;
    Ok(state.analytics.by_dimension(range, dimension, limit).await?)
}

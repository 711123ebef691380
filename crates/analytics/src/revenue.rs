use common::{DateRange, Dimension, Period};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use store::SalesStore;

use crate::{DimensionRevenue, Result, RevenueSummary, TopEntry, TrendPoint};

/// Revenue query service over the sales fact table.
///
/// Holds a store handle (shared pool); cheap to clone.
#[derive(Clone)]
pub struct RevenueAnalytics {
    store: SalesStore,
}

impl RevenueAnalytics {
    /// Creates the query service over a sales store.
    pub fn new(store: SalesStore) -> Self {
        Self { store }
    }

    /// Summed line revenue over the (inclusive) date range.
    ///
    /// An empty range yields `0.0`, not an error.
    pub async fn total_revenue(&self, range: DateRange) -> Result<f64> {
        let total: Option<f64> =
            sqlx::query_scalar("SELECT SUM(revenue) FROM sales WHERE sale_date BETWEEN ?1 AND ?2")
                .bind(range.start())
                .bind(range.end())
                .fetch_one(self.store.pool())
                .await?;
        Ok(total.unwrap_or(0.0))
    }

    /// Grouped revenue per dimension value, sorted by revenue descending,
    /// truncated to `limit` when given.
    pub async fn by_dimension(
        &self,
        range: DateRange,
        dimension: Dimension,
        limit: Option<u32>,
    ) -> Result<Vec<DimensionRevenue>> {
        // The grouping column comes from the Dimension enum, never from
        // user input.
        let column = dimension.column();
        let mut sql = format!(
            "SELECT {column} AS key, \
                    SUM(revenue) AS revenue, \
                    SUM(quantity) AS quantity, \
                    COUNT(DISTINCT customer_id) AS customer_count, \
                    COUNT(order_id) AS order_count \
             FROM sales \
             WHERE sale_date BETWEEN ?1 AND ?2 \
             GROUP BY {column} \
             ORDER BY revenue DESC"
        );
        if limit.is_some() {
            sql.push_str(" LIMIT ?3");
        }

        let mut query = sqlx::query(&sql).bind(range.start()).bind(range.end());
        if let Some(limit) = limit {
            query = query.bind(i64::from(limit));
        }

        let rows = query.fetch_all(self.store.pool()).await?;
        tracing::debug!(%dimension, groups = rows.len(), "grouped revenue query");
        rows.into_iter().map(row_to_group).collect()
    }

    /// Revenue bucketed by calendar period, ascending by period.
    ///
    /// Buckets with no matching rows are omitted (sparse series).
    pub async fn trends(&self, range: DateRange, period: Period) -> Result<Vec<TrendPoint>> {
        match period {
            Period::Quarterly => self.quarterly_trends(range).await,
            Period::Monthly => self.strftime_trends(range, "%Y-%m").await,
            Period::Yearly => self.strftime_trends(range, "%Y").await,
        }
    }

    /// Cross-dimension summary: range total plus the top entry for each
    /// grouping dimension (aggregator with limit 1). Composition only.
    pub async fn summary(&self, range: DateRange) -> Result<RevenueSummary> {
        let total_revenue = self.total_revenue(range).await?;
        let top_product = self.top_entry(range, Dimension::Product).await?;
        let top_category = self.top_entry(range, Dimension::Category).await?;
        let top_region = self.top_entry(range, Dimension::Region).await?;

        Ok(RevenueSummary {
            total_revenue,
            top_product,
            top_category,
            top_region,
        })
    }

    async fn top_entry(&self, range: DateRange, dimension: Dimension) -> Result<Option<TopEntry>> {
        let top = self
            .by_dimension(range, dimension, Some(1))
            .await?
            .into_iter()
            .next()
            .map(|group| TopEntry {
                name: group.key,
                revenue: group.revenue,
            });
        Ok(top)
    }

    async fn strftime_trends(&self, range: DateRange, format: &str) -> Result<Vec<TrendPoint>> {
        let sql = format!(
            "SELECT strftime('{format}', sale_date) AS period, \
                    SUM(revenue) AS revenue, \
                    COUNT(order_id) AS order_count \
             FROM sales \
             WHERE sale_date BETWEEN ?1 AND ?2 \
             GROUP BY period \
             ORDER BY period"
        );
        let rows = sqlx::query(&sql)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(self.store.pool())
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TrendPoint {
                    period: row.try_get("period")?,
                    revenue: row.try_get("revenue")?,
                    order_count: row.try_get("order_count")?,
                })
            })
            .collect()
    }

    // SQLite has no quarter function; derive it from the month.
    async fn quarterly_trends(&self, range: DateRange) -> Result<Vec<TrendPoint>> {
        let rows = sqlx::query(
            "SELECT strftime('%Y', sale_date) AS year, \
                    (CAST(strftime('%m', sale_date) AS INTEGER) + 2) / 3 AS quarter, \
                    SUM(revenue) AS revenue, \
                    COUNT(order_id) AS order_count \
             FROM sales \
             WHERE sale_date BETWEEN ?1 AND ?2 \
             GROUP BY year, quarter \
             ORDER BY year, quarter",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.store.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                let year: String = row.try_get("year")?;
                let quarter: i64 = row.try_get("quarter")?;
                Ok(TrendPoint {
                    period: format!("{year}-Q{quarter}"),
                    revenue: row.try_get("revenue")?,
                    order_count: row.try_get("order_count")?,
                })
            })
            .collect()
    }
}

fn row_to_group(row: SqliteRow) -> Result<DimensionRevenue> {
    Ok(DimensionRevenue {
        key: row.try_get("key")?,
        revenue: row.try_get("revenue")?,
        quantity: row.try_get("quantity")?,
        customer_count: row.try_get("customer_count")?,
        order_count: row.try_get("order_count")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;
    use store::SaleRecord;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    fn record(
        order_id: &str,
        product: &str,
        category: &str,
        region: &str,
        customer_id: &str,
        sale_date: &str,
        quantity: i64,
        unit_price: f64,
    ) -> SaleRecord {
        SaleRecord {
            order_id: order_id.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            region: region.to_string(),
            customer_id: customer_id.to_string(),
            sale_date: date(sale_date),
            quantity,
            unit_price,
        }
    }

    async fn seeded_analytics() -> RevenueAnalytics {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SalesStore::new(pool);
        store.run_migrations().await.unwrap();

        // Revenue: Gadget 80 (Jan), Widget 25 (Jan), Widget 30 (Mar)
        store
            .append(&vec![
                record(
                    "ORD-1", "Widget", "Hardware", "North", "CUST-1", "2024-01-05", 2, 10.0,
                ),
                record(
                    "ORD-2", "Widget", "Hardware", "South", "CUST-2", "2024-01-20", 1, 5.0,
                ),
                record(
                    "ORD-3", "Gadget", "Hardware", "North", "CUST-1", "2024-01-25", 4, 20.0,
                ),
                record(
                    "ORD-4", "Widget", "Hardware", "North", "CUST-3", "2024-03-10", 3, 10.0,
                ),
            ])
            .await
            .unwrap();

        RevenueAnalytics::new(store)
    }

    #[tokio::test]
    async fn total_revenue_sums_line_revenue_in_range() {
        let analytics = seeded_analytics().await;
        let total = analytics
            .total_revenue(range("2024-01-01", "2024-01-31"))
            .await
            .unwrap();
        assert_eq!(total, 105.0);
    }

    #[tokio::test]
    async fn total_revenue_is_zero_for_empty_range() {
        let analytics = seeded_analytics().await;
        let total = analytics
            .total_revenue(range("2023-01-01", "2023-12-31"))
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn by_dimension_sorts_by_revenue_descending() {
        let analytics = seeded_analytics().await;
        let groups = analytics
            .by_dimension(range("2024-01-01", "2024-01-31"), Dimension::Product, None)
            .await
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Gadget");
        assert_eq!(groups[0].revenue, 80.0);
        assert_eq!(groups[0].quantity, 4);
        assert_eq!(groups[0].order_count, 1);
        assert_eq!(groups[1].key, "Widget");
        assert_eq!(groups[1].revenue, 25.0);
        assert_eq!(groups[1].order_count, 2);
    }

    #[tokio::test]
    async fn by_dimension_limit_truncates_to_top_groups() {
        let analytics = seeded_analytics().await;
        let groups = analytics
            .by_dimension(
                range("2024-01-01", "2024-12-31"),
                Dimension::Product,
                Some(1),
            )
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Gadget");
    }

    #[tokio::test]
    async fn by_dimension_partitions_the_total() {
        let analytics = seeded_analytics().await;
        let query_range = range("2024-01-01", "2024-12-31");
        let total = analytics.total_revenue(query_range).await.unwrap();

        for dimension in [Dimension::Product, Dimension::Category, Dimension::Region] {
            let groups = analytics
                .by_dimension(query_range, dimension, None)
                .await
                .unwrap();
            let sum: f64 = groups.iter().map(|g| g.revenue).sum();
            assert_eq!(sum, total, "{dimension} groups must partition the total");
        }
    }

    #[tokio::test]
    async fn by_region_counts_distinct_customers() {
        let analytics = seeded_analytics().await;
        let groups = analytics
            .by_dimension(range("2024-01-01", "2024-12-31"), Dimension::Region, None)
            .await
            .unwrap();

        let north = groups.iter().find(|g| g.key == "North").unwrap();
        // CUST-1 appears twice in North but counts once.
        assert_eq!(north.customer_count, 2);
        assert_eq!(north.order_count, 3);
    }

    #[tokio::test]
    async fn by_dimension_empty_range_yields_empty_sequence() {
        let analytics = seeded_analytics().await;
        let groups = analytics
            .by_dimension(range("2023-01-01", "2023-12-31"), Dimension::Category, None)
            .await
            .unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn monthly_trends_over_one_month_yield_one_bucket() {
        let analytics = seeded_analytics().await;
        let query_range = range("2024-01-01", "2024-01-31");
        let trends = analytics
            .trends(query_range, Period::Monthly)
            .await
            .unwrap();
        let total = analytics.total_revenue(query_range).await.unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].period, "2024-01");
        assert_eq!(trends[0].revenue, total);
        assert_eq!(trends[0].order_count, 3);
    }

    #[tokio::test]
    async fn monthly_trends_omit_empty_buckets() {
        let analytics = seeded_analytics().await;
        let trends = analytics
            .trends(range("2024-01-01", "2024-03-31"), Period::Monthly)
            .await
            .unwrap();

        // February has no sales, so only January and March appear.
        let periods: Vec<&str> = trends.iter().map(|t| t.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-03"]);
    }

    #[tokio::test]
    async fn quarterly_trends_label_year_and_quarter() {
        let analytics = seeded_analytics().await;
        let trends = analytics
            .trends(range("2024-01-01", "2024-12-31"), Period::Quarterly)
            .await
            .unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].period, "2024-Q1");
        assert_eq!(trends[0].revenue, 135.0);
    }

    #[tokio::test]
    async fn yearly_trends_bucket_by_year() {
        let analytics = seeded_analytics().await;
        let trends = analytics
            .trends(range("2024-01-01", "2024-12-31"), Period::Yearly)
            .await
            .unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].period, "2024");
        assert_eq!(trends[0].order_count, 4);
    }

    #[tokio::test]
    async fn summary_composes_total_and_top_entries() {
        let analytics = seeded_analytics().await;
        let summary = analytics
            .summary(range("2024-01-01", "2024-12-31"))
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, 135.0);
        let top_product = summary.top_product.unwrap();
        assert_eq!(top_product.name, "Gadget");
        assert_eq!(top_product.revenue, 80.0);
        assert_eq!(summary.top_category.unwrap().name, "Hardware");
        assert_eq!(summary.top_region.unwrap().name, "North");
    }

    #[tokio::test]
    async fn summary_has_no_top_entries_for_empty_range() {
        let analytics = seeded_analytics().await;
        let summary = analytics
            .summary(range("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, 0.0);
        assert!(summary.top_product.is_none());
        assert!(summary.top_category.is_none());
        assert!(summary.top_region.is_none());
    }
}

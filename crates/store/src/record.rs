use chrono::NaiveDate;

/// One sale/order line in the denormalized fact table.
///
/// Product, category and region are plain string attributes, not
/// foreign-keyed entities. Records are created by the loader and never
/// updated in place; a replace-mode refresh is the only way rows leave
/// the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub order_id: String,
    pub product: String,
    pub category: String,
    pub region: String,
    pub customer_id: String,
    pub sale_date: NaiveDate,
    pub quantity: i64,
    pub unit_price: f64,
}

impl SaleRecord {
    /// Line revenue, derived as quantity × unit price.
    ///
    /// Non-negative as long as quantity and price are, which the loader
    /// enforces before a record is built.
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

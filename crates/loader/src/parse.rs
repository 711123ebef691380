use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use store::SaleRecord;

use crate::{LoadError, Result};

/// Expected CSV header:
/// `order_id,product,category,region,customer_id,sale_date,quantity,unit_price`
///
/// Numeric and date fields arrive as strings so each can be validated
/// with a line-numbered error instead of an opaque serde failure.
#[derive(Debug, Deserialize)]
struct RawRow {
    order_id: String,
    product: String,
    category: String,
    region: String,
    customer_id: String,
    sale_date: String,
    quantity: String,
    unit_price: String,
}

/// Parses a whole CSV file into sale records.
///
/// Strict policy: the entire file is scanned, and any malformed row
/// fails the load with a [`LoadError::DataIntegrity`] carrying the
/// parsed/failed counts and the first offending line.
pub fn parse_file(path: &Path) -> Result<Vec<SaleRecord>> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    parse_reader(file)
}

/// Parses CSV content from any reader. Split out from [`parse_file`] so
/// tests and benches can run against in-memory buffers.
pub fn parse_reader<R: Read>(input: R) -> Result<Vec<SaleRecord>> {
    let mut reader = csv::Reader::from_reader(input);

    let mut records = Vec::new();
    let mut failures: Vec<(usize, String)> = Vec::new();

    for (index, row) in reader.deserialize::<RawRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        match row {
            Ok(raw) => match parse_row(&raw) {
                Ok(record) => records.push(record),
                Err(reason) => failures.push((line, reason)),
            },
            Err(e) => failures.push((line, e.to_string())),
        }
    }

    if let Some((line, reason)) = failures.first() {
        return Err(LoadError::DataIntegrity {
            line: *line,
            reason: reason.clone(),
            processed: records.len(),
            failed: failures.len(),
        });
    }

    Ok(records)
}

fn parse_row(raw: &RawRow) -> std::result::Result<SaleRecord, String> {
    for (field, value) in [
        ("order_id", &raw.order_id),
        ("product", &raw.product),
        ("category", &raw.category),
        ("region", &raw.region),
        ("customer_id", &raw.customer_id),
    ] {
        if value.trim().is_empty() {
            return Err(format!("missing required field {field}"));
        }
    }

    let sale_date = NaiveDate::parse_from_str(raw.sale_date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("sale_date {:?} is not a YYYY-MM-DD date", raw.sale_date))?;

    let quantity: i64 = raw
        .quantity
        .trim()
        .parse()
        .map_err(|_| format!("quantity {:?} is not an integer", raw.quantity))?;
    if quantity < 0 {
        return Err(format!("quantity {quantity} is negative"));
    }

    let unit_price: f64 = raw
        .unit_price
        .trim()
        .parse()
        .map_err(|_| format!("unit_price {:?} is not a number", raw.unit_price))?;
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(format!("unit_price {unit_price} is not a non-negative number"));
    }

    Ok(SaleRecord {
        order_id: raw.order_id.trim().to_string(),
        product: raw.product.trim().to_string(),
        category: raw.category.trim().to_string(),
        region: raw.region.trim().to_string(),
        customer_id: raw.customer_id.trim().to_string(),
        sale_date,
        quantity,
        unit_price,
    })
}

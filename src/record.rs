use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// The fixed order-type enumeration. Anything else buckets into `(OTHER)`.
pub const CATEGORIES: [&str; 9] = ["MO", "DO", "RO", "SO", "PDA", "CO", "CN", "AS", "MIGRATE"];
pub const OTHER_CATEGORY: &str = "(OTHER)";
pub const BLANK_STATUS: &str = "(blank)";

/// One order row, projected through the schema map. Immutable; rebuilt from
/// the row source on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub order_id: String,
    pub service_code: String,
    pub customer_name: String,
    pub status: String,
    pub category: String,
    pub order_date: Option<NaiveDate>,
    pub order_date_raw: String,
    pub last_updated_raw: String,
    pub branch: Option<String>,
}

pub fn canonical_category(raw: &str) -> String {
    let up = raw.trim().to_uppercase();
    if CATEGORIES.contains(&up.as_str()) {
        up
    } else {
        OTHER_CATEGORY.to_string()
    }
}

/// Collapse duplicates on `(order_id, service_code)` keeping the first
/// occurrence, then sort ascending by order date. Records without a date
/// sort first; the sort is stable so equal dates keep input order.
pub fn dedup_and_sort(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for r in records {
        if seen.insert((r.order_id.clone(), r.service_code.clone())) {
            out.push(r);
        }
    }
    out.sort_by_key(|r| r.order_date.unwrap_or(NaiveDate::MIN));
    out
}

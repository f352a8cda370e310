use crate::dates;
use crate::record::Record;
use crate::schema::{cell, SchemaError, SchemaMap, LIST_COLUMNS};
use crate::status;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Structured filter parameters for the pending listings. All members are
/// optional; an empty spec matches every pending record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub keyword: Option<String>,
    pub branch: Option<String>,
    pub year_month: Option<(i32, u32)>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl FilterSpec {
    /// Effective date bounds: a year-month expands to its full calendar
    /// range and takes precedence over an explicit start/end pair.
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        if let Some((y, m)) = self.year_month {
            if let Some((s, e)) = dates::month_range(y, m) {
                return (Some(s), Some(e));
            }
        }
        (self.date_start, self.date_end)
    }
}

static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Branch comparison strips all whitespace so "MUARO JAMBI" == "muarojambi".
pub fn normalize_branch(name: &str) -> String {
    WS.replace_all(name.trim(), "").to_lowercase()
}

/// Column positions for the listing operations, resolved once per query.
pub struct ListColumns {
    pub customer_name: usize,
    pub order_id: usize,
    pub service_code: usize,
    pub status: usize,
    pub category: usize,
    pub order_date: usize,
    pub branch: Option<usize>,
    pub last_updated: Option<usize>,
}

impl ListColumns {
    pub fn resolve(schema: &SchemaMap) -> Result<Self, SchemaError> {
        schema.require(LIST_COLUMNS)?;
        Ok(Self {
            customer_name: schema.index("customer_name")?,
            order_id: schema.index("order_id")?,
            service_code: schema.index("no sc")?,
            status: schema.index("status do")?,
            category: schema.index("jenis order")?,
            order_date: schema.index("order_date")?,
            branch: schema.branch(),
            last_updated: schema.get("last_updated_date"),
        })
    }

    pub fn project(&self, row: &[String]) -> Record {
        Record {
            order_id: cell(row, self.order_id).to_string(),
            service_code: cell(row, self.service_code).to_string(),
            customer_name: cell(row, self.customer_name).to_string(),
            status: cell(row, self.status).to_string(),
            category: cell(row, self.category).to_string(),
            order_date: dates::parse_date(cell(row, self.order_date)),
            order_date_raw: cell(row, self.order_date).to_string(),
            last_updated_raw: self
                .last_updated
                .map(|i| cell(row, i).to_string())
                .unwrap_or_default(),
            branch: self
                .branch
                .map(|i| cell(row, i).trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Scan the row set (header first) for pending records matching `spec`,
/// stopping after `limit` survivors. Skip order per row: closed status,
/// branch, date range, keyword. A branch filter with no branch column in
/// the sheet is silently ignored. Survivors come back in row order; the
/// caller owns dedup and chronological sorting.
pub fn filter_pending(
    rows: &[Vec<String>],
    spec: &FilterSpec,
    limit: usize,
) -> Result<Vec<Record>, SchemaError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let schema = SchemaMap::from_header(header);
    let cols = ListColumns::resolve(&schema)?;

    let keyword = spec
        .keyword
        .as_deref()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty());
    let want_branch = spec
        .branch
        .as_deref()
        .map(normalize_branch)
        .filter(|b| !b.is_empty());
    let (start, end) = spec.date_bounds();

    let mut out = Vec::new();
    for row in data {
        if status::is_closed(cell(row, cols.status)) {
            continue;
        }
        if let (Some(want), Some(i)) = (want_branch.as_deref(), cols.branch) {
            if normalize_branch(cell(row, i)) != want {
                continue;
            }
        }
        let d = dates::parse_date(cell(row, cols.order_date));
        if !dates::within(d, start, end) {
            continue;
        }
        if let Some(q) = keyword.as_deref() {
            let hay = format!(
                "{} {} {}",
                cell(row, cols.customer_name),
                cell(row, cols.order_id),
                cell(row, cols.service_code)
            )
            .to_lowercase();
            if !hay.contains(q) {
                continue;
            }
        }
        out.push(cols.project(row));
        if out.len() >= limit {
            break;
        }
    }
    Ok(out)
}

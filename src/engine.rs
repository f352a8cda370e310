use crate::dates;
use crate::filter::{filter_pending, FilterSpec, ListColumns};
use crate::record::{dedup_and_sort, Record};
use crate::schema::{cell, SchemaError, SchemaMap};
use crate::source::{RowSource, SourceError};
use crate::summary::{summarize, Summary};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// The query operations over one row source. Stateless between calls: every
/// operation re-reads the full row set and recomputes from scratch.
pub struct Engine<S> {
    source: S,
    sheet: Option<String>,
}

impl<S: RowSource> Engine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sheet: None,
        }
    }

    pub fn with_sheet(source: S, sheet: impl Into<String>) -> Self {
        Self {
            source,
            sheet: Some(sheet.into()),
        }
    }

    fn read_rows(&self) -> Result<Vec<Vec<String>>, QueryError> {
        Ok(self.source.rows(self.sheet.as_deref())?)
    }

    /// Exact-match lookup on order id or service code. `Ok(None)` when no
    /// row matches; only the two identity columns are required, descriptive
    /// columns degrade to the order-id column when absent.
    pub fn find_by_key(&self, key: &str) -> Result<Option<Record>, QueryError> {
        let rows = self.read_rows()?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(None);
        };
        let schema = SchemaMap::from_header(header);
        schema.require(&["order_id", "no sc"])?;
        let i_order = schema.index("order_id")?;
        let i_sc = schema.index("no sc")?;
        let fallback = |name: &str| schema.get(name).unwrap_or(i_order);

        let key = key.trim();
        for row in data {
            let order_id = cell(row, i_order).trim();
            let service_code = cell(row, i_sc).trim();
            if key != order_id && key != service_code {
                continue;
            }
            let raw_date = cell(row, fallback("order_date"));
            return Ok(Some(Record {
                order_id: order_id.to_string(),
                service_code: service_code.to_string(),
                customer_name: cell(row, fallback("customer_name")).to_string(),
                status: cell(row, fallback("status do")).to_string(),
                category: cell(row, fallback("jenis order")).to_string(),
                order_date: dates::parse_date(raw_date),
                order_date_raw: raw_date.to_string(),
                last_updated_raw: schema
                    .get("last_updated_date")
                    .map(|i| cell(row, i).to_string())
                    .unwrap_or_default(),
                branch: schema
                    .branch()
                    .map(|i| cell(row, i).trim().to_string())
                    .filter(|s| !s.is_empty()),
            }));
        }
        Ok(None)
    }

    /// Case-insensitive substring search on customer name, capped at `limit`
    /// matches in row order, then deduplicated and date-sorted.
    pub fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<Record>, QueryError> {
        let rows = self.read_rows()?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        let schema = SchemaMap::from_header(header);
        let cols = ListColumns::resolve(&schema)?;

        let q = query.trim().to_lowercase();
        let mut out = Vec::new();
        for row in data {
            if !cell(row, cols.customer_name).to_lowercase().contains(&q) {
                continue;
            }
            out.push(cols.project(row));
            if out.len() >= limit {
                break;
            }
        }
        Ok(dedup_and_sort(out))
    }

    /// Pending records (status neither complete nor cancelled) matching the
    /// filter spec, deduplicated and sorted oldest first.
    pub fn list_pending(&self, spec: &FilterSpec, limit: usize) -> Result<Vec<Record>, QueryError> {
        let rows = self.read_rows()?;
        let out = filter_pending(&rows, spec, limit)?;
        Ok(dedup_and_sort(out))
    }

    pub fn list_pending_in_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<Record>, QueryError> {
        let spec = FilterSpec {
            date_start: start,
            date_end: end,
            ..FilterSpec::default()
        };
        self.list_pending(&spec, limit)
    }

    pub fn list_pending_in_month(
        &self,
        year: i32,
        month: u32,
        limit: usize,
    ) -> Result<Vec<Record>, QueryError> {
        let spec = FilterSpec {
            year_month: Some((year, month)),
            ..FilterSpec::default()
        };
        self.list_pending(&spec, limit)
    }

    pub fn summarize(
        &self,
        branch: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Summary, QueryError> {
        let rows = self.read_rows()?;
        Ok(summarize(&rows, branch, start, end)?)
    }
}

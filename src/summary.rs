use crate::dates;
use crate::filter::normalize_branch;
use crate::record::{canonical_category, BLANK_STATUS, CATEGORIES, OTHER_CATEGORY};
use crate::schema::{cell, SchemaError, SchemaMap};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Status x category counts over a filtered row subset. Unlike the pending
/// listings this counts every status, closed ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sorted by count descending, then status name ascending.
    pub per_status: Vec<(String, usize)>,
    pub per_status_by_category: BTreeMap<String, BTreeMap<String, usize>>,
    /// The fixed category enumeration in its canonical order. `(OTHER)`
    /// rows count in `grand_total` and the pivot, but not here.
    pub totals_by_category: Vec<(String, usize)>,
    pub grand_total: usize,
}

impl Summary {
    pub fn category_total(&self, category: &str) -> usize {
        self.totals_by_category
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Count of rows whose category fell outside the fixed enumeration.
    pub fn other_total(&self) -> usize {
        let fixed: usize = self.totals_by_category.iter().map(|(_, n)| n).sum();
        self.grand_total - fixed
    }
}

const SUMMARY_COLUMNS: &[&str] = &["status do", "jenis order", "order_date"];

/// Aggregate the row set (header first) into per-status counts, the
/// status x category pivot, fixed-category totals, and a grand total.
/// Branch and date-range filtering behave as in the pending listings; the
/// branch column itself is required here.
pub fn summarize(
    rows: &[Vec<String>],
    branch: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Summary, SchemaError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Summary::default());
    };
    let schema = SchemaMap::from_header(header);
    schema.require(SUMMARY_COLUMNS)?;
    let i_branch = schema.branch().ok_or_else(|| SchemaError::MissingColumns {
        columns: vec!["branch".to_string()],
    })?;
    let i_status = schema.index("status do")?;
    let i_category = schema.index("jenis order")?;
    let i_date = schema.index("order_date")?;

    let want_branch = branch.map(normalize_branch).filter(|b| !b.is_empty());

    let mut per_status: HashMap<String, usize> = HashMap::new();
    let mut pivot: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut totals: Vec<(String, usize)> =
        CATEGORIES.iter().map(|c| (c.to_string(), 0)).collect();
    let mut grand_total = 0usize;

    for row in data {
        if let Some(want) = want_branch.as_deref() {
            if normalize_branch(cell(row, i_branch)) != want {
                continue;
            }
        }
        let d = dates::parse_date(cell(row, i_date));
        if !dates::within(d, start, end) {
            continue;
        }

        let status_cell = cell(row, i_status).trim();
        let status = if status_cell.is_empty() {
            BLANK_STATUS.to_string()
        } else {
            status_cell.to_string()
        };
        let category = canonical_category(cell(row, i_category));

        *per_status.entry(status.clone()).or_insert(0) += 1;
        *pivot
            .entry(status)
            .or_default()
            .entry(category.clone())
            .or_insert(0) += 1;
        if category != OTHER_CATEGORY {
            if let Some(slot) = totals.iter_mut().find(|(c, _)| *c == category) {
                slot.1 += 1;
            }
        }
        grand_total += 1;
    }

    let mut per_status: Vec<(String, usize)> = per_status.into_iter().collect();
    per_status.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(Summary {
        per_status,
        per_status_by_category: pivot,
        totals_by_category: totals,
        grand_total,
    })
}

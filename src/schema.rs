use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing columns in sheet: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

/// Logical column names for the pending/search listing operations.
pub const LIST_COLUMNS: &[&str] = &[
    "order_id",
    "no sc",
    "status do",
    "jenis order",
    "order_date",
    "customer_name",
];

/// Header row resolved into column positions. Matching is case-insensitive
/// and whitespace-trimmed; duplicate names keep the last occurrence.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    by_name: HashMap<String, usize>,
}

impl SchemaMap {
    pub fn from_header(header: &[String]) -> Self {
        let mut by_name = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            by_name.insert(name.trim().to_lowercase(), i);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn index(&self, name: &str) -> Result<usize, SchemaError> {
        self.get(name).ok_or_else(|| SchemaError::MissingColumns {
            columns: vec![name.to_string()],
        })
    }

    /// Fails with every missing name at once so the caller can report them all.
    pub fn require(&self, names: &[&str]) -> Result<(), SchemaError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.by_name.contains_key(**n))
            .map(|n| n.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns { columns: missing })
        }
    }

    /// Branch column under either of its historical names, `branch` first.
    pub fn branch(&self) -> Option<usize> {
        self.get("branch").or_else(|| self.get("datel"))
    }
}

/// Bounds-safe cell access: short rows read as empty cells.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

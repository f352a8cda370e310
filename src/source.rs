use once_cell::sync::OnceCell;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("row source read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("row source line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
}

/// Where the rows come from. The first returned row is the header. One read
/// per query; a failure fails that query only and is never retried.
pub trait RowSource {
    fn rows(&self, sheet: Option<&str>) -> Result<Vec<Vec<String>>, SourceError>;
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn rows(&self, sheet: Option<&str>) -> Result<Vec<Vec<String>>, SourceError> {
        (**self).rows(sheet)
    }
}

/// Spreadsheet export as JSON lines: each line one JSON array, one element
/// per cell. A named sheet maps to a sibling `<name>.jsonl` file.
#[derive(Debug, Clone)]
pub struct JsonRowsFile {
    path: PathBuf,
}

impl JsonRowsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn sheet_path(&self, sheet: Option<&str>) -> PathBuf {
        match sheet {
            None => self.path.clone(),
            Some(name) => self.path.with_file_name(format!("{name}.jsonl")),
        }
    }
}

impl RowSource for JsonRowsFile {
    fn rows(&self, sheet: Option<&str>) -> Result<Vec<Vec<String>>, SourceError> {
        let path = self.sheet_path(sheet);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                if let Some(name) = sheet {
                    return SourceError::SheetNotFound(name.to_string());
                }
            }
            SourceError::Io(e)
        })?;
        let mut rows = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values: Vec<Value> = serde_json::from_str(line)
                .map_err(|e| SourceError::Parse { line: i + 1, source: e })?;
            rows.push(values.into_iter().map(cell_text).collect());
        }
        log::debug!("read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

// Sheets exports are loose about cell types; render non-strings as text.
fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

static SHARED: OnceCell<JsonRowsFile> = OnceCell::new();

/// Process-scoped memoized handle to the rows file. Initialized at most
/// once; later calls reuse the first handle regardless of `path`. Read-only
/// after creation, so it is safe to share across concurrent queries.
pub fn shared(path: &Path) -> &'static JsonRowsFile {
    SHARED.get_or_init(|| JsonRowsFile::new(path))
}

/// In-memory row set, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub rows: Vec<Vec<String>>,
}

impl MemorySource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

impl RowSource for MemorySource {
    fn rows(&self, _sheet: Option<&str>) -> Result<Vec<Vec<String>>, SourceError> {
        Ok(self.rows.clone())
    }
}

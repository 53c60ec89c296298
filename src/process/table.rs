use csv::{ErrorKind, ReaderBuilder};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// One run file, as read: header plus string cells, no coercion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names from the header line. The row index column is named `""`.
    pub headers: Vec<String>,
    /// Each data row, one cell per header.
    pub rows: Vec<Vec<String>>,
    /// 1-based source line of each row, for error reporting.
    pub lines: Vec<u64>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source line of row `idx`.
    pub fn line(&self, idx: usize) -> u64 {
        self.lines.get(idx).copied().unwrap_or(0)
    }
}

/// Parse the full text of a run file.
///
/// Every record must have exactly as many fields as the header; anything else
/// is a `MalformedRow`. Blank lines are skipped by the reader.
pub fn parse_table(path: &Path, text: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| malformed(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = RawTable {
        headers,
        ..RawTable::default()
    };

    for result in rdr.records() {
        let record = result.map_err(|e| malformed(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        table.rows.push(record.iter().map(str::to_string).collect());
        table.lines.push(line);
    }

    Ok(table)
}

fn malformed(path: &Path, err: csv::Error) -> PipelineError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let reason = match err.kind() {
        ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        _ => err.to_string(),
    };
    PipelineError::MalformedRow {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

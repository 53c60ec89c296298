use std::path::Path;
use tracing::debug;

use super::date_parser::parse_timestamp_millis;
use super::table::RawTable;
use crate::error::{PipelineError, Result};

/// Millisecond timings of one row, relative to its file's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: i64,
    pub end: i64,
    /// `end - start` on the absolute timestamps.
    pub duration: i64,
}

/// Per-file result of time normalization, row-aligned with the input table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Earliest absolute `start` in the file, `None` for a file without rows.
    pub epoch: Option<i64>,
    pub timings: Vec<Timing>,
}

/// Rebase every `start`/`end` of `table` onto the file-local epoch.
///
/// Any unparseable timestamp fails the whole file.
pub fn normalize(path: &Path, table: &RawTable) -> Result<Normalized> {
    if table.is_empty() {
        return Ok(Normalized::default());
    }

    let start_col = required_column(path, table, "start")?;
    let end_col = required_column(path, table, "end")?;

    // 1) absolute timestamps for every row
    let mut absolute = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let start = timestamp(path, table, idx, "start", &row[start_col])?;
        let end = timestamp(path, table, idx, "end", &row[end_col])?;
        absolute.push((start, end));
    }

    // 2) epoch = earliest start in this file
    let epoch = match absolute.iter().map(|(s, _)| *s).min() {
        Some(e) => e,
        None => return Ok(Normalized::default()),
    };

    // 3) offsets and durations
    let timings = absolute
        .into_iter()
        .map(|(start, end)| Timing {
            start: start - epoch,
            end: end - epoch,
            duration: end - start,
        })
        .collect();

    debug!(path = %path.display(), epoch, rows = table.len(), "normalized");
    Ok(Normalized {
        epoch: Some(epoch),
        timings,
    })
}

fn required_column(path: &Path, table: &RawTable, name: &str) -> Result<usize> {
    table
        .column(name)
        .ok_or_else(|| PipelineError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

fn timestamp(path: &Path, table: &RawTable, idx: usize, column: &str, raw: &str) -> Result<i64> {
    parse_timestamp_millis(raw).ok_or_else(|| PipelineError::UnparseableTimestamp {
        path: path.to_path_buf(),
        line: table.line(idx),
        column: column.to_string(),
        value: raw.to_string(),
    })
}

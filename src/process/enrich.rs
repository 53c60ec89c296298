use std::{collections::HashSet, path::Path};
use tracing::{debug, warn};

use super::normalize::Normalized;
use super::record::{Row, Value};
use super::table::RawTable;
use crate::error::{PipelineError, Result};
use crate::params::{ParamRef, ParsedParams};

/// Columns computed per row; these always override filename fields.
pub const DERIVED_COLUMNS: [&str; 4] = ["i", "start", "end", "duration"];

/// Header of the anonymous row index column.
pub const INDEX_COLUMN: &str = "";

/// One filename parameter attached to every row under `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub param: ParamRef,
}

impl FieldSpec {
    pub fn new(name: &str, param: ParamRef) -> Self {
        Self {
            name: name.to_string(),
            param,
        }
    }
}

/// Which filename parameters end up in the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attach {
    /// Selected parameters under chosen names, in list order.
    Projection(Vec<FieldSpec>),
    /// Every parsed parameter; positional ones named by their index.
    RawParams,
}

impl Attach {
    /// `provider`, `proto`, `concurrency`, `cn` from position 0 and `p`, `c`, `i`.
    pub fn default_projection() -> Self {
        Attach::Projection(vec![
            FieldSpec::new("provider", ParamRef::Position(0)),
            FieldSpec::new("proto", ParamRef::key("p")),
            FieldSpec::new("concurrency", ParamRef::key("c")),
            FieldSpec::new("cn", ParamRef::key("i")),
        ])
    }

    /// Resolve against one file's parameters. Missing parameters are skipped.
    pub fn fields(&self, params: &ParsedParams) -> Vec<(String, String)> {
        match self {
            Attach::Projection(specs) => specs
                .iter()
                .filter_map(|spec| {
                    spec.param
                        .resolve(params)
                        .map(|v| (spec.name.clone(), v.to_string()))
                })
                .collect(),
            Attach::RawParams => params.entries(),
        }
    }
}

impl Default for Attach {
    fn default() -> Self {
        Attach::default_projection()
    }
}

/// Build the output rows of one file.
///
/// Insertion order is filename fields, then the raw columns, then `i`,
/// `start`, `end`, `duration`; a later insert of the same name wins.
pub fn enrich(
    path: &Path,
    table: &RawTable,
    normalized: &Normalized,
    fields: &[(String, String)],
) -> Result<Vec<Row>> {
    warn_collisions(path, table, fields);

    let index_col = table.column(INDEX_COLUMN);
    if index_col.is_none() && !table.is_empty() {
        debug!(path = %path.display(), "no index column, numbering rows by position");
    }

    let mut out = Vec::with_capacity(table.len());
    for (idx, (cells, timing)) in table.rows.iter().zip(&normalized.timings).enumerate() {
        let mut row = Row::with_capacity(fields.len() + cells.len() + 2);

        for (name, value) in fields {
            row.insert(name.clone(), Value::from(value.as_str()));
        }
        for (header, cell) in table.headers.iter().zip(cells) {
            row.insert(header.clone(), Value::from(cell.as_str()));
        }

        let i = match index_col {
            Some(col) => parse_index(path, table, idx, &cells[col])?,
            None => idx as i64,
        };
        row.insert("i".to_string(), Value::Int(i));
        row.insert("start".to_string(), Value::Int(timing.start));
        row.insert("end".to_string(), Value::Int(timing.end));
        row.insert("duration".to_string(), Value::Int(timing.duration));

        out.push(row);
    }

    Ok(out)
}

fn parse_index(path: &Path, table: &RawTable, idx: usize, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PipelineError::MalformedRow {
            path: path.to_path_buf(),
            line: table.line(idx),
            reason: format!("row index {:?} is not an integer", raw),
        })
}

/// Filename fields shadowed by a measured column keep the measured value.
fn warn_collisions(path: &Path, table: &RawTable, fields: &[(String, String)]) {
    let mut warned = HashSet::new();
    for (name, _) in fields {
        if DERIVED_COLUMNS.contains(&name.as_str()) || !table.headers.contains(name) {
            continue;
        }
        if warned.insert(name.as_str()) {
            warn!(
                path = %path.display(),
                column = %name,
                "filename field collides with a file column, keeping the column value"
            );
        }
    }
}

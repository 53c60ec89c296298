use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;

/// A single output cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One normalized row. Re-inserting a name replaces the value in place.
pub type Row = IndexMap<String, Value>;

/// Rows of every input file, in resolver order then file order.
///
/// Rows need not share a key set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputTable {
    rows: Vec<Row>,
}

impl OutputTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all row keys in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for row in &self.rows {
            for key in row.keys() {
                seen.insert(key);
            }
        }
        seen.into_iter().map(str::to_string).collect()
    }
}

use std::path::Path;
use tracing::info;

use crate::config::Dataset;
use crate::error::Result;
use crate::process::{process_file, OutputTable};
use crate::resolve::resolve;

/// Resolve the dataset's files under `dir` and merge them into one table.
///
/// Files are processed one at a time in resolver order; the first error aborts
/// the run and no table is returned.
pub fn run(dir: &Path, dataset: &Dataset) -> Result<OutputTable> {
    let files = resolve(dir, &dataset.selection)?;
    info!(
        dataset = %dataset.name,
        dir = %dir.display(),
        files = files.len(),
        "starting run"
    );

    let mut table = OutputTable::new();
    for path in &files {
        let rows = process_file(path, &dataset.attach)?;
        table.extend(rows);
    }

    info!(dataset = %dataset.name, rows = table.len(), "run complete");
    Ok(table)
}

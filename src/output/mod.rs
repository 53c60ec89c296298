pub mod columnar;

use std::{
    fmt,
    io::{self, Write},
    path::Path,
    str::FromStr,
};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::process::OutputTable;

/// Output encoding of the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Csv,
    Json,
    Parquet,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" => Ok(Format::Parquet),
            other => Err(format!(
                "unknown format `{}` (expected csv, json or parquet)",
                other
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Parquet => "parquet",
        })
    }
}

/// Header is the column union; a row without a key gets an empty cell.
pub fn write_csv<W: Write>(table: &OutputTable, writer: W) -> Result<()> {
    let columns = table.columns();
    let mut wtr = csv::Writer::from_writer(writer);

    if !columns.is_empty() {
        wtr.write_record(&columns)?;
    }
    for row in table.rows() {
        wtr.write_record(
            columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed array of objects, keys in row order.
pub fn write_json<W: Write>(table: &OutputTable, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Encode `table` in full into memory.
pub fn encode(table: &OutputTable, format: Format) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        Format::Csv => write_csv(table, &mut buf)?,
        Format::Json => write_json(table, &mut buf)?,
        Format::Parquet => columnar::write_parquet(table, &mut buf)?,
    }
    Ok(buf)
}

/// Write the encoded table to stdout in one go.
pub fn write_stdout(table: &OutputTable, format: Format) -> Result<()> {
    let bytes = encode(table, format)?;
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(&bytes)?;
    lock.flush()?;
    Ok(())
}

/// Write the table to `path` atomically: temp file in the same directory,
/// then rename over the target.
pub fn write_file(table: &OutputTable, format: Format, path: &Path) -> Result<()> {
    let bytes = encode(table, format)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;

    info!(path = %path.display(), format = %format, bytes = bytes.len(), "wrote output");
    Ok(())
}

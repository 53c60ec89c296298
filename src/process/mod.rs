// src/process/mod.rs

//! Per-file processing: parse rows, rebase timestamps, attach filename fields.

pub mod date_parser;
pub mod enrich;
pub mod normalize;
pub mod record;
pub mod table;

use std::{fs, path::Path};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::params::ParsedParams;

pub use enrich::{Attach, FieldSpec};
pub use record::{OutputTable, Row, Value};
pub use table::RawTable;

/// Read one run file fully and turn it into output rows.
#[tracing::instrument(level = "info", skip(path, attach), fields(path = %path.display()))]
pub fn process_file(path: &Path, attach: &Attach) -> Result<Vec<Row>> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;

    let params = ParsedParams::from_path(path);
    let table = table::parse_table(path, &text)?;
    let normalized = normalize::normalize(path, &table)?;
    let fields = attach.fields(&params);
    let rows = enrich::enrich(path, &table, &normalized, &fields)?;

    info!(rows = rows.len(), epoch = ?normalized.epoch, "file processed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,benchnorm::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn process_recorder_file() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = dir.path().join("chainstack,limits,b=500,c=100,p=h2,i=2.csv");
        fs::write(
            &path,
            ",start,end,error\n\
             0,2024-02-12 15:04:05.120000,2024-02-12 15:04:05.480000,\n\
             1,2024-02-12 15:04:05.100000,2024-02-12 15:04:06.000000,\"HTTPStatusError('429')\"\n",
        )?;

        let rows = process_file(&path, &Attach::default())?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["provider"], Value::from("chainstack"));
        assert_eq!(rows[0]["cn"], Value::from("2"));
        assert_eq!(rows[0]["start"], Value::Int(20));
        assert_eq!(rows[0]["end"], Value::Int(380));
        assert_eq!(rows[0]["duration"], Value::Int(360));
        assert_eq!(rows[1]["start"], Value::Int(0));
        assert_eq!(rows[1]["duration"], Value::Int(900));
        assert_eq!(rows[1]["error"], Value::from("HTTPStatusError('429')"));
        Ok(())
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let err = process_file(Path::new("/definitely/not/here.csv"), &Attach::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}

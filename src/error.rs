use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can abort a normalization run.
///
/// All variants are fatal: the pipeline stops at the first one and nothing is
/// written to the output.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file {} does not exist", .path.display())]
    MissingFile { path: PathBuf },

    #[error("{}:{line}: malformed row: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("{}:{line}: cannot parse `{column}` timestamp {value:?}", .path.display())]
    UnparseableTimestamp {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{}: missing required column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid glob pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    #[error("dataset `{name}`: {reason}")]
    InvalidDataset { name: String, reason: String },

    #[error("parsing manifest {}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("reading {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing output")]
    Write(#[from] io::Error),

    #[error("encoding CSV output")]
    Csv(#[from] csv::Error),

    #[error("encoding JSON output")]
    Json(#[from] serde_json::Error),

    #[error("building Arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("encoding Parquet output")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

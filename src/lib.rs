//! Merge per-run benchmark CSVs into one time-normalized table.
//!
//! Every run file carries its experiment parameters in its name
//! (`alchemy,b=1000,c=100,p=h2,i=3.csv`). Rows are rebased onto their file's
//! earliest `start`, given a `duration`, tagged with the filename parameters
//! and concatenated in file order.

pub mod config;
pub mod error;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod process;
pub mod resolve;

pub use config::{Catalogue, Dataset};
pub use error::{PipelineError, Result};
pub use output::Format;
pub use params::{ParamRef, ParsedParams};
pub use process::{Attach, FieldSpec, OutputTable, Row, Value};
pub use resolve::Selection;

//! Record reading, input discovery, and score output for isoforest.

mod domain;
mod error;
mod reader;
mod walk;
mod writer;

pub use domain::{ColumnSpec, ExperimentName, ScoreRow, SourceSummary};
pub use error::IoError;
pub use reader::RecordReader;
pub use walk::collect_files;
pub use writer::ScoreWriter;

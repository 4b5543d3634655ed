//! CSV score writer and JSON summary writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ExperimentName, ScoreRow, SourceSummary};
use crate::IoError;

/// Writes per-record scores and per-file summaries.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_scores.csv` and
/// `{experiment}_summary.json`.
pub struct ScoreWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ScoreWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the CSV score file.
    pub fn scores_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_scores.csv", self.experiment.as_str()))
    }

    /// Path of the JSON summary file.
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_summary.json", self.experiment.as_str()))
    }

    /// Write score rows to `{experiment}_scores.csv` with a
    /// `source,sample,score` header.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] if a row cannot be written or flushed.
    #[instrument(skip_all, fields(n_rows = rows.len()))]
    pub fn write_scores(&self, rows: &[ScoreRow]) -> Result<(), IoError> {
        let path = self.scores_path();
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
        for row in rows {
            wtr.serialize(row).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| csv_err(e.into()))?;

        info!(path = %path.display(), "scores written");
        Ok(())
    }

    /// Write per-file summaries to `{experiment}_summary.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_sources = sources.len()))]
    pub fn write_summary(&self, n_trees_requested: u32, sources: &[SourceSummary]) -> Result<(), IoError> {
        let path = self.summary_path();

        let artifact = SummaryArtifact {
            experiment: self.experiment.as_str(),
            n_trees_requested,
            n_sources: sources.len(),
            n_samples: sources.iter().map(|s| s.n_samples).sum(),
            sources,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "summary written");
        Ok(())
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SummaryArtifact<'a> {
    experiment: &'a str,
    n_trees_requested: u32,
    n_sources: usize,
    n_samples: usize,
    sources: &'a [SourceSummary],
}

//! Domain types for isoforest-io.

use std::collections::HashSet;
use std::str::FromStr;

use serde::Serialize;

use crate::IoError;

/// Mapping from feature names to zero-based field positions in a record.
///
/// Parsed from comma-separated `name=index` pairs, for example
/// `totalCount=2,price=3,qualityScore=4`. Features are emitted in spec order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<(String, usize)>,
}

impl ColumnSpec {
    /// Parse a column spec.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::EmptyColumnSpec`] | no entries |
    /// | [`IoError::InvalidColumnSpec`] | entry lacks `=`, has an empty name, a non-numeric index, or repeats a name |
    pub fn parse(spec: &str) -> Result<Self, IoError> {
        let mut columns = Vec::new();
        let mut seen = HashSet::new();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = |reason| IoError::InvalidColumnSpec {
                entry: entry.to_string(),
                reason,
            };
            let (name, index) = entry.split_once('=').ok_or_else(|| invalid("expected name=index"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("feature name is empty"));
            }
            let index: usize = index
                .trim()
                .parse()
                .map_err(|_| invalid("index is not a non-negative integer"))?;
            if !seen.insert(name.to_string()) {
                return Err(invalid("feature name appears more than once"));
            }
            columns.push((name.to_string(), index));
        }

        if columns.is_empty() {
            return Err(IoError::EmptyColumnSpec);
        }
        Ok(Self { columns })
    }

    /// Return the `(name, index)` pairs in spec order.
    #[must_use]
    pub fn columns(&self) -> &[(String, usize)] {
        &self.columns
    }

    /// Return the number of mapped features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`: parsing rejects empty specs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromStr for ColumnSpec {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scored record, written as a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    /// File the record came from.
    pub source: String,
    /// Sample name (`{file_stem}:{line}`).
    pub sample: String,
    /// Mean path length across the forest.
    pub score: f64,
}

/// Per-file score statistics for the JSON summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    /// File the records came from.
    pub source: String,
    /// Number of records scored.
    pub n_samples: usize,
    /// Number of trees the file's forest ended up with.
    pub n_trees: usize,
    /// Mean score over all records.
    pub mean_score: f64,
    /// Lowest score (the strongest outlier).
    pub min_score: f64,
    /// Highest score.
    pub max_score: f64,
}

impl SourceSummary {
    /// Summarize the scores of one file. An empty score list yields zeros.
    #[must_use]
    pub fn from_scores(source: impl Into<String>, n_trees: usize, scores: &[f64]) -> Self {
        let n_samples = scores.len();
        let (mean_score, min_score, max_score) = if scores.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = scores.iter().sum();
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / n_samples as f64, min, max)
        };
        Self {
            source: source.into(),
            n_samples,
            n_trees,
            mean_score,
            min_score,
            max_score,
        }
    }
}

//! Delimited record reader producing [`Sample`]s.

use std::path::{Path, PathBuf};

use isoforest_core::Sample;
use tracing::{debug, info, instrument};

use crate::domain::ColumnSpec;
use crate::IoError;

/// Reads one delimited text file into samples.
///
/// Records have no header. Each non-blank line becomes a [`Sample`] named
/// `{file_stem}:{line}` carrying one feature per [`ColumnSpec`] entry, in spec
/// order. Fields are trimmed and parsed as `u64`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::RecordParse`] | Malformed record (e.g. invalid UTF-8) |
/// | [`IoError::MissingColumn`] | Record has fewer fields than a mapped index needs |
/// | [`IoError::InvalidValue`] | Field is not an unsigned integer |
/// | [`IoError::EmptyDataset`] | No records in the file |
pub struct RecordReader {
    path: PathBuf,
    columns: ColumnSpec,
    delimiter: u8,
}

impl RecordReader {
    /// Create a tab-delimited reader for `path` using `columns`.
    pub fn new(path: &Path, columns: ColumnSpec) -> Self {
        Self {
            path: path.to_path_buf(),
            columns,
            delimiter: b'\t',
        }
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Return the file this reader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate every record.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Sample>, IoError> {
        // 1. Open file (FileNotFound on failure)
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // 2. Headerless, flexible reader: field counts are checked per column below.
        // Quotes are literal so free-text fields never swallow delimiters.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .delimiter(self.delimiter)
            .from_reader(file);

        let stem = self
            .path
            .file_stem()
            .map_or_else(|| self.path.display().to_string(), |s| s.to_string_lossy().into_owned());

        // 3. One sample per record
        let mut samples = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| IoError::RecordParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;
            let line = record.position().map_or(0, |p| p.line());

            // Lines holding only whitespace are blank too.
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let mut sample = Sample::new(format!("{stem}:{line}"));
            for (name, column) in self.columns.columns() {
                let raw = record.get(*column).ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    line,
                    column: *column,
                    name: name.clone(),
                    got: record.len(),
                })?;
                let value: u64 = raw.trim().parse().map_err(|_| IoError::InvalidValue {
                    path: self.path.clone(),
                    line,
                    column: *column,
                    raw: raw.to_string(),
                })?;
                sample = sample.with_feature(name.as_str(), value);
            }
            debug!(sample = sample.name(), "record parsed");
            samples.push(sample);
        }

        // 4. Check for empty dataset
        if samples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = samples.len(),
            n_features = self.columns.len(),
            "records loaded"
        );

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_records(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn spec(s: &str) -> ColumnSpec {
        ColumnSpec::parse(s).unwrap()
    }

    #[test]
    fn read_tab_separated() {
        let f = write_records("a\tb\t7\t120\t3\nc\td\t9\t80\t4\n");
        let samples = RecordReader::new(f.path(), spec("count=2,price=3,quality=4"))
            .read()
            .unwrap();
        assert_eq!(samples.len(), 2);
        let first = &samples[0];
        assert_eq!(first.len(), 3);
        assert_eq!(first.features()[0].name(), "count");
        assert_eq!(first.feature("count").unwrap().value(), 7);
        assert_eq!(first.feature("price").unwrap().value(), 120);
        assert_eq!(first.feature("quality").unwrap().value(), 3);
        assert_eq!(samples[1].feature("price").unwrap().value(), 80);
    }

    #[test]
    fn sample_names_carry_stem_and_line() {
        let f = write_records("1\t2\n3\t4\n");
        let stem = f.path().file_stem().unwrap().to_string_lossy().into_owned();
        let samples = RecordReader::new(f.path(), spec("x=0,y=1")).read().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].name(), format!("{stem}:1"));
        assert_eq!(samples[1].name(), format!("{stem}:2"));
    }

    #[test]
    fn blank_lines_skipped() {
        let f = write_records("1\t2\n\n   \n3\t4\n\n");
        let samples = RecordReader::new(f.path(), spec("x=0,y=1")).read().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].feature("x").unwrap().value(), 3);
    }

    #[test]
    fn custom_delimiter() {
        let f = write_records("5,6\n7,8\n");
        let samples = RecordReader::new(f.path(), spec("y=1"))
            .with_delimiter(b',')
            .read()
            .unwrap();
        assert_eq!(samples[1].feature("y").unwrap().value(), 8);
    }

    #[test]
    fn fields_are_trimmed() {
        let f = write_records(" 12 \t 3\r\n");
        let samples = RecordReader::new(f.path(), spec("x=0,y=1")).read().unwrap();
        assert_eq!(samples[0].feature("x").unwrap().value(), 12);
        assert_eq!(samples[0].feature("y").unwrap().value(), 3);
    }

    #[test]
    fn missing_column_rejected() {
        let f = write_records("1\t2\t3\n4\t5\n");
        let result = RecordReader::new(f.path(), spec("z=2")).read();
        assert!(matches!(
            result,
            Err(IoError::MissingColumn { line: 2, column: 2, got: 2, .. })
        ));
    }

    #[test]
    fn decimal_value_rejected() {
        let f = write_records("12.0\t3\n");
        let result = RecordReader::new(f.path(), spec("x=0")).read();
        assert!(matches!(result, Err(IoError::InvalidValue { line: 1, column: 0, .. })));
    }

    #[test]
    fn negative_value_rejected() {
        let f = write_records("-4\t3\n");
        let result = RecordReader::new(f.path(), spec("x=0")).read();
        assert!(matches!(result, Err(IoError::InvalidValue { .. })));
    }

    #[test]
    fn empty_file() {
        let f = write_records("\n\n");
        let result = RecordReader::new(f.path(), spec("x=0")).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn file_not_found() {
        let result = RecordReader::new(Path::new("/nonexistent/records.txt"), spec("x=0")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}

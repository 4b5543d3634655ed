//! Recursive input discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::IoError;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}

/// Collect the record files under `root`.
///
/// A file root is returned as-is. A directory is walked recursively, skipping
/// hidden entries (names starting with `.`) below the root. When `extension`
/// is given only files with that extension are kept. Results are sorted by
/// path.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | `root` does not exist |
/// | [`IoError::DirectoryWalk`] | An entry cannot be read during the walk |
#[instrument(skip_all, fields(root = %root.display(), extension = ?extension))]
pub fn collect_files(root: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>, IoError> {
    let meta = std::fs::metadata(root).map_err(|e| IoError::FileNotFound {
        path: root.to_path_buf(),
        source: e,
    })?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let wanted = extension.map(|ext| ext.trim_start_matches('.'));
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(|e| IoError::DirectoryWalk {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(ext) = wanted
            && entry.path().extension().and_then(|s| s.to_str()) != Some(ext)
        {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();

    debug!(n_files = files.len(), "input files collected");
    Ok(files)
}

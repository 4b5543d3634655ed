//! Forest persistence via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::error::ForestError;
use crate::forest::Forest;
use crate::node::Node;
use crate::randomizer::DefaultRandomizer;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for a saved forest.
///
/// The randomizer is not persisted; a loaded forest gets a fresh
/// entropy-seeded one.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Number of construction attempts configured.
    n_trees_to_create: u32,
    /// Depth limit (0 = unbounded).
    max_depth: u32,
    /// Training catalog.
    catalog: Catalog,
    /// Built trees in construction order.
    trees: Vec<Node>,
}

impl Forest {
    /// Save the forest to a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ForestError::SerializeModel`] | bincode encoding failed |
    /// | [`ForestError::WriteModel`] | file write failed |
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ForestError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees_to_create: self.n_trees_to_create,
            max_depth: self.max_depth,
            catalog: self.catalog.clone(),
            trees: self.trees.clone(),
        };

        let bytes = bincode::serialize(&envelope)
            .map_err(|e| ForestError::SerializeModel { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| ForestError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(size_bytes = bytes.len(), n_trees = self.trees.len(), "forest saved");

        Ok(())
    }

    /// Load a forest from a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ForestError::ReadModel`] | file read failed |
    /// | [`ForestError::DeserializeModel`] | bincode decoding failed |
    /// | [`ForestError::IncompatibleModelVersion`] | format version mismatch |
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| ForestError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope =
            bincode::deserialize(&bytes).map_err(|e| ForestError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(ForestError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        debug!(
            n_trees = envelope.trees.len(),
            n_features = envelope.catalog.n_features(),
            "forest loaded"
        );

        Ok(Self {
            randomizer: Box::new(DefaultRandomizer::from_entropy()),
            catalog: envelope.catalog,
            trees: envelope.trees,
            n_trees_to_create: envelope.n_trees_to_create,
            max_depth: envelope.max_depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::config::ForestConfig;
    use crate::feature::Sample;
    use crate::forest::Forest;

    fn train_simple_forest() -> Forest {
        let samples: Vec<Sample> = (0..40)
            .map(|i| Sample::new("t").with_feature("x", i % 10).with_feature("y", i / 4))
            .collect();
        ForestConfig::new(6).unwrap().with_seed(42).with_max_depth(8).fit(&samples)
    }

    #[test]
    fn round_trip_identical_scores() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("forest.bin");

        let forest = train_simple_forest();
        forest.save(&model_path).unwrap();
        let loaded = Forest::load(&model_path).unwrap();

        assert_eq!(loaded.trees(), forest.trees());
        assert_eq!(loaded.catalog(), forest.catalog());
        assert_eq!(loaded.n_trees_to_create(), 6);
        assert_eq!(loaded.max_depth(), 8);

        let probes = [
            Sample::new("a").with_feature("x", 3).with_feature("y", 2),
            Sample::new("b").with_feature("x", 50).with_feature("y", 50),
            Sample::new("c").with_feature("y", 1),
        ];
        for sample in &probes {
            assert_eq!(forest.score(sample), loaded.score(sample), "sample {}", sample.name());
        }
    }

    #[test]
    fn load_nonexistent_file_error() {
        let err = Forest::load("/tmp/nonexistent_forest_abc123.bin").unwrap_err();
        assert!(matches!(err, crate::ForestError::ReadModel { .. }));
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"xx").unwrap();
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(err, crate::ForestError::DeserializeModel { .. }));
    }

    #[test]
    fn load_wrong_version_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        // format_version = 99 followed by an otherwise empty forest.
        let mut bytes = bincode::serialize(&99u32).unwrap();
        bytes.extend(bincode::serialize(&(10u32, 0u32)).unwrap());
        bytes.extend(bincode::serialize(&crate::Catalog::new()).unwrap());
        bytes.extend(bincode::serialize(&Vec::<crate::Node>::new()).unwrap());
        std::fs::write(&path, bytes).unwrap();
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::ForestError::IncompatibleModelVersion { expected: 1, found: 99, .. }
        ));
    }
}

//! Configuration builder for isolation forest training.

use tracing::instrument;

use crate::error::ForestError;
use crate::feature::Sample;
use crate::forest::Forest;
use crate::randomizer::DefaultRandomizer;

/// Configuration for isolation forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter   | Default                |
/// |-------------|------------------------|
/// | `max_depth` | 0 (unbounded)          |
/// | `seed`      | `None` (OS entropy)    |
/// | `parallel`  | `false`                |
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub(crate) n_trees: u32,
    pub(crate) max_depth: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) parallel: bool,
}

impl ForestConfig {
    /// Create a new config requesting `n_trees` trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: u32) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_depth: 0,
            seed: None,
            parallel: false,
        })
    }

    // --- Setters ---

    /// Set the maximum tree depth. `0` means unbounded.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Seed the randomizer for reproducible trees.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build trees in parallel with rayon.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    // --- Getters ---

    /// Return the number of trees requested.
    #[must_use]
    pub fn n_trees(&self) -> u32 {
        self.n_trees
    }

    /// Return the maximum depth (0 = unbounded).
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Return the random seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Return whether trees are built in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Build an untrained forest with this configuration.
    #[must_use]
    pub fn build(&self) -> Forest {
        let mut forest = Forest::new(self.n_trees, self.max_depth);
        if let Some(seed) = self.seed {
            forest.set_randomizer(Box::new(DefaultRandomizer::from_seed(seed)));
        }
        forest
    }

    /// Train a forest on `samples` and grow its trees.
    #[instrument(skip_all, fields(n_samples = samples.len()))]
    pub fn fit(&self, samples: &[Sample]) -> Forest {
        let mut forest = self.build();
        for sample in samples {
            forest.add_sample(sample);
        }
        if self.parallel {
            forest.create_parallel();
        } else {
            forest.create();
        }
        forest
    }
}

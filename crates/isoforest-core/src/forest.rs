//! Isolation forest training and ensemble construction.

use std::fmt;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::feature::Sample;
use crate::node::Node;
use crate::randomizer::{DefaultRandomizer, Randomizer};
use crate::tree::build_tree;

/// Default number of trees requested by [`Forest::default`].
pub const DEFAULT_N_TREES: u32 = 10;

/// An ensemble of isolation trees grown over a catalog of training values.
///
/// Usage follows three phases: feed training samples with
/// [`add_sample`](Forest::add_sample), grow the ensemble once with
/// [`create`](Forest::create), then call [`score`](Forest::score) as often as
/// needed. Scoring only borrows the forest, so a built forest can be shared
/// across threads and scored concurrently.
pub struct Forest {
    pub(crate) randomizer: Box<dyn Randomizer>,
    pub(crate) catalog: Catalog,
    pub(crate) trees: Vec<Node>,
    pub(crate) n_trees_to_create: u32,
    pub(crate) max_depth: u32,
}

impl Forest {
    /// Create an untrained forest.
    ///
    /// `max_depth == 0` means tree depth is unbounded. The randomizer is
    /// seeded from OS entropy; use [`set_randomizer`](Forest::set_randomizer)
    /// or [`ForestConfig`](crate::ForestConfig) for reproducible trees.
    #[must_use]
    pub fn new(n_trees: u32, max_depth: u32) -> Self {
        Self {
            randomizer: Box::new(DefaultRandomizer::from_entropy()),
            catalog: Catalog::new(),
            trees: Vec::new(),
            n_trees_to_create: n_trees,
            max_depth,
        }
    }

    /// Replace the randomizer used by subsequent tree construction.
    ///
    /// Trees that are already built are unaffected.
    pub fn set_randomizer(&mut self, randomizer: Box<dyn Randomizer>) {
        self.randomizer = randomizer;
    }

    /// Absorb the feature values of a training sample into the catalog.
    ///
    /// The sample itself is not retained.
    pub fn add_sample(&mut self, sample: &Sample) {
        self.catalog.absorb(sample);
    }

    /// Grow the ensemble from the current catalog.
    ///
    /// Makes `n_trees_to_create` construction attempts, each starting from
    /// the full catalog at depth 0 and drawing from the forest's randomizer in
    /// sequence. Attempts that yield no tree are dropped, so the forest may
    /// end up with fewer trees than requested (possibly none). Any previously
    /// built trees are replaced.
    #[instrument(skip_all, fields(n_trees = self.n_trees_to_create, max_depth = self.max_depth))]
    pub fn create(&mut self) {
        info!(n_features = self.catalog.n_features(), "creating isolation forest");

        let snapshot = self.catalog.snapshot();
        let view = snapshot.view();
        let mut trees = Vec::with_capacity(self.n_trees_to_create as usize);
        for attempt in 0..self.n_trees_to_create {
            match build_tree(&view, 0, self.max_depth, self.randomizer.as_mut()) {
                Some(tree) => {
                    debug!(attempt, n_nodes = tree.n_nodes(), height = tree.height(), "tree built");
                    trees.push(tree);
                }
                None => debug!(attempt, "tree construction declined"),
            }
        }
        self.trees = trees;

        info!(n_trees_built = self.trees.len(), "isolation forest created");
    }

    /// Grow the ensemble in parallel.
    ///
    /// Draws one seed per requested tree from the forest's randomizer, then
    /// builds every tree on its own [`DefaultRandomizer`] stream via rayon.
    /// The catalog is shared read-only between workers. Results are
    /// deterministic for a given randomizer state, although they differ from
    /// [`create`](Forest::create) because each tree consumes its own stream.
    #[instrument(skip_all, fields(n_trees = self.n_trees_to_create, max_depth = self.max_depth))]
    pub fn create_parallel(&mut self) {
        info!(n_features = self.catalog.n_features(), "creating isolation forest in parallel");

        let tree_seeds: Vec<u64> = (0..self.n_trees_to_create)
            .map(|_| self.randomizer.next_u64())
            .collect();

        let max_depth = self.max_depth;
        let snapshot = self.catalog.snapshot();
        let built: Vec<Option<Node>> = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = DefaultRandomizer::from_seed(seed);
                build_tree(&snapshot.view(), 0, max_depth, &mut rng)
            })
            .collect();

        let requested = built.len();
        self.trees = built.into_iter().flatten().collect();

        debug!(n_declined = requested - self.trees.len(), "parallel construction complete");
        info!(n_trees_built = self.trees.len(), "isolation forest created");
    }

    /// Return the built trees in construction order.
    #[must_use]
    pub fn trees(&self) -> &[Node] {
        &self.trees
    }

    /// Return the number of built trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the number of construction attempts [`create`](Forest::create) makes.
    #[must_use]
    pub fn n_trees_to_create(&self) -> u32 {
        self.n_trees_to_create
    }

    /// Return the depth limit (0 = unbounded).
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Return the training catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::new(DEFAULT_N_TREES, 0)
    }
}

impl fmt::Debug for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("n_trees_to_create", &self.n_trees_to_create)
            .field("max_depth", &self.max_depth)
            .field("n_features", &self.catalog.n_features())
            .field("n_trees", &self.trees.len())
            .finish_non_exhaustive()
    }
}

//! Path-length scoring against single trees and the whole ensemble.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::feature::Sample;
use crate::forest::Forest;
use crate::node::Node;

/// Path length of `sample` through the subtree rooted at `node`.
///
/// Each comparison adds one to the depth. When the sample lacks the feature a
/// node compares, the walk cannot pick a side, so the result is the mean of
/// both continuations, each counted from the depth reached so far. An absent
/// subtree contributes `0`.
fn path_length(sample: &Sample, node: Option<&Node>) -> f64 {
    let mut depth = 0.0;
    let mut current = node;

    while let Some(node) = current {
        match sample.feature(node.feature_name()) {
            Some(feature) => {
                depth += 1.0;
                current = if feature.value() < node.split_value() {
                    node.left()
                } else {
                    node.right()
                };
            }
            None => {
                let left = depth + path_length(sample, node.left());
                let right = depth + path_length(sample, node.right());
                return (left + right) / 2.0;
            }
        }
    }

    depth
}

impl Forest {
    /// Score a sample against a single tree.
    ///
    /// Returns the raw path length; it is not normalized.
    #[must_use]
    pub fn score_tree(sample: &Sample, tree: &Node) -> f64 {
        path_length(sample, Some(tree))
    }

    /// Score a sample against the ensemble.
    ///
    /// Returns the mean path length over all trees, or `0.0` when the forest
    /// holds no trees. Lower values mean the sample was isolated faster and
    /// is more likely an outlier. Callers that need to tell "no model" apart
    /// from a zero path length should check [`n_trees`](Forest::n_trees).
    #[must_use]
    pub fn score(&self, sample: &Sample) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|tree| Self::score_tree(sample, tree)).sum();
        total / self.trees.len() as f64
    }

    /// Score a batch of samples in parallel, preserving input order.
    #[must_use]
    pub fn score_batch(&self, samples: &[Sample]) -> Vec<f64> {
        samples.par_iter().map(|sample| self.score(sample)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::feature::Sample;
    use crate::forest::Forest;
    use crate::node::Node;

    /// x@5 -> (left) y@3 -> (right) z@4 -> (left) leaf z@2
    fn chain_tree() -> Node {
        let mut z = Node::new("z", 4);
        z.set_left_subtree(Some(Node::new("z", 2)));
        let mut y = Node::new("y", 3);
        y.set_right_subtree(Some(z));
        let mut x = Node::new("x", 5);
        x.set_left_subtree(Some(y));
        x.set_right_subtree(Some(Node::new("y", 9)));
        x
    }

    // --- Single tree ---

    #[test]
    fn full_path_counts_comparisons() {
        // x=1 < 5 -> y; y=7 >= 3 -> z; z=3 < 4 -> leaf z@2; z=3 >= 2 -> right (absent)
        let sample = Sample::new("s").with_feature("x", 1).with_feature("y", 7).with_feature("z", 3);
        assert_eq!(Forest::score_tree(&sample, &chain_tree()), 4.0);
    }

    #[test]
    fn equal_value_goes_right() {
        let mut root = Node::new("x", 5);
        root.set_left_subtree(Some(Node::new("x", 1)));
        let sample = Sample::new("s").with_feature("x", 5);
        // Right child absent: one comparison and stop.
        assert_eq!(Forest::score_tree(&sample, &root), 1.0);
    }

    #[test]
    fn missing_feature_averages_both_sides() {
        // Reaches z@4 at depth 2. The left leaf also compares "z", which the
        // sample lacks, and has no children, so it adds nothing; the right
        // side is absent. (2 + 0 + 2 + 0) / 2 = 2.
        let sample = Sample::new("s").with_feature("x", 1).with_feature("y", 7);
        assert_eq!(Forest::score_tree(&sample, &chain_tree()), 2.0);
    }

    #[test]
    fn missing_feature_at_root() {
        // Left: y=0 < 3 -> y's left is absent -> 1. Right: y=0 < 9 -> absent -> 1.
        let sample = Sample::new("s").with_feature("y", 0);
        assert_eq!(Forest::score_tree(&sample, &chain_tree()), 1.0);
    }

    #[test]
    fn missing_feature_uneven_branches() {
        let mut root = Node::new("m", 10);
        let mut left = Node::new("a", 5);
        left.set_right_subtree(Some(Node::new("a", 8)));
        root.set_left_subtree(Some(left));
        // Left branch: a=9 >= 5 -> a@8, 9 >= 8 -> absent => 2. Right absent => 0.
        let sample = Sample::new("s").with_feature("a", 9);
        assert_eq!(Forest::score_tree(&sample, &root), 1.0);
    }

    #[test]
    fn first_matching_feature_is_used() {
        let mut root = Node::new("x", 5);
        root.set_left_subtree(Some(Node::new("x", 1)));
        // First "x" (0) goes left to x@1, which sends 0 left again (absent).
        let sample = Sample::new("s").with_feature("x", 0).with_feature("x", 100);
        assert_eq!(Forest::score_tree(&sample, &root), 2.0);
    }

    // --- Ensemble ---

    #[test]
    fn empty_forest_scores_zero() {
        let forest = Forest::new(10, 0);
        let sample = Sample::new("s").with_feature("x", 1);
        assert_eq!(forest.score(&sample), 0.0);
    }

    #[test]
    fn ensemble_score_is_mean() {
        let mut forest = Forest::new(2, 0);
        forest.trees = vec![chain_tree(), Node::new("x", 0)];
        let sample = Sample::new("s").with_feature("x", 1).with_feature("y", 7).with_feature("z", 3);
        // 4 from the chain, 1 from the single node.
        assert_eq!(forest.score(&sample), 2.5);
    }

    #[test]
    fn batch_matches_individual() {
        let mut forest = Forest::new(1, 0);
        forest.trees = vec![chain_tree()];
        let samples = vec![
            Sample::new("a").with_feature("x", 1).with_feature("y", 7),
            Sample::new("b").with_feature("x", 9),
            Sample::new("c"),
        ];
        let batch = forest.score_batch(&samples);
        for (sample, score) in samples.iter().zip(&batch) {
            assert_eq!(forest.score(sample), *score);
        }
    }
}

//! Recursive isolation-tree construction over a catalog view.

use crate::catalog::CatalogView;
use crate::node::Node;
use crate::randomizer::Randomizer;

/// Recursively grow one isolation tree.
///
/// Returns `None` when no node can be produced at this position: fewer than
/// two features remain, the depth limit (`max_depth > 0`) has been reached,
/// or the randomly selected feature has no values left. The caller treats
/// absence as a missing subtree, never as a failure.
///
/// Draw order is fixed: feature index, split index (only when more than one
/// value remains), then the entire left subtree, then the right subtree.
pub(crate) fn build_tree<R>(
    view: &CatalogView<'_>,
    depth: u32,
    max_depth: u32,
    rng: &mut R,
) -> Option<Node>
where
    R: Randomizer + ?Sized,
{
    let n_features = view.n_features();
    if n_features <= 1 {
        return None;
    }

    if max_depth > 0 && depth >= max_depth {
        return None;
    }

    let feature_index = rng.uniform(0, (n_features - 1) as u64) as usize;
    let (feature_name, values) = view.entry(feature_index);
    if values.is_empty() {
        return None;
    }

    let split_index = if values.len() > 1 {
        rng.uniform(0, (values.len() - 1) as u64) as usize
    } else {
        0
    };
    let split_value = values[split_index];

    let mut node = Node::new(feature_name, split_value);

    // The split value itself is excluded from both sides.
    let left_view = view.with_values(feature_index, &values[..split_index]);
    node.set_left_subtree(build_tree(&left_view, depth + 1, max_depth, rng));

    // No right child when the split value is the largest one remaining.
    if split_index < values.len() - 1 {
        let right_view = view.with_values(feature_index, &values[split_index + 1..]);
        node.set_right_subtree(build_tree(&right_view, depth + 1, max_depth, rng));
    }

    Some(node)
}

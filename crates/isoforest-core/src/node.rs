/// A node of an isolation tree.
///
/// Each node exclusively owns its children, so dropping a root drops the
/// whole tree. A node whose split value was the largest value still available
/// for its feature has no right child; the opposite shape (right child
/// without left) is never produced by construction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    feature_name: String,
    split_value: u64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    /// Create a childless node splitting `feature_name` at `split_value`.
    pub fn new(feature_name: impl Into<String>, split_value: u64) -> Self {
        Self {
            feature_name: feature_name.into(),
            split_value,
            left: None,
            right: None,
        }
    }

    /// Return the name of the feature this node compares.
    #[must_use]
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// Return the split value: samples below it go left, the rest go right.
    #[must_use]
    pub fn split_value(&self) -> u64 {
        self.split_value
    }

    /// Return the left subtree, if any.
    #[must_use]
    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    /// Return the right subtree, if any.
    #[must_use]
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Replace the left subtree, dropping whatever occupied the slot.
    pub fn set_left_subtree(&mut self, subtree: Option<Node>) {
        self.left = subtree.map(Box::new);
    }

    /// Replace the right subtree, dropping whatever occupied the slot.
    pub fn set_right_subtree(&mut self, subtree: Option<Node>) {
        self.right = subtree.map(Box::new);
    }

    /// Return `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Return the number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        1 + self.left().map_or(0, Node::n_nodes) + self.right().map_or(0, Node::n_nodes)
    }

    /// Return the number of levels in this subtree (a lone node has height 1).
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self
            .left()
            .map_or(0, Node::height)
            .max(self.right().map_or(0, Node::height))
    }

    /// Iterate over every node of this subtree in pre-order.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }
}

/// Pre-order iterator over a subtree, returned by [`Node::iter`].
#[derive(Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        Some(node)
    }
}

//! Structure-of-arrays decision tree with numeric splits.

use super::NodeId;

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    #[error("node {node} references child {child} but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path, or via a cycle.
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    /// Cover array length does not match the node count.
    #[error("cover array has {covers_len} entries for {n_nodes} nodes")]
    CoversLenMismatch { covers_len: usize, n_nodes: usize },
}

/// Immutable SoA tree storage.
///
/// All arrays are indexed by [`NodeId`]. Leaf nodes carry their value in
/// `leaf_values`; split nodes carry a feature index and threshold. Missing
/// feature values (NaN) follow the per-node default direction.
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
    /// Optional cover (hessian sum) per node, required for TreeSHAP.
    covers: Option<Box<[f32]>>,
}

impl Tree {
    /// Create a tree from parallel arrays. All arrays must have equal length.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f32>,
    ) -> Self {
        let n_nodes = split_indices.len();
        debug_assert_eq!(n_nodes, split_thresholds.len());
        debug_assert_eq!(n_nodes, left_children.len());
        debug_assert_eq!(n_nodes, right_children.len());
        debug_assert_eq!(n_nodes, default_left.len());
        debug_assert_eq!(n_nodes, is_leaf.len());
        debug_assert_eq!(n_nodes, leaf_values.len());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
            covers: None,
        }
    }

    /// Attach per-node cover statistics (builder pattern).
    pub fn with_covers(mut self, covers: Vec<f32>) -> Self {
        debug_assert_eq!(covers.len(), self.n_nodes());
        self.covers = Some(covers.into_boxed_slice());
        self
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Whether this tree carries cover statistics.
    #[inline]
    pub fn has_covers(&self) -> bool {
        self.covers.is_some()
    }

    /// Cover (hessian sum) per node, if present.
    pub fn covers(&self) -> Option<&[f32]> {
        self.covers.as_deref()
    }

    /// Maximum root-to-leaf depth (number of nodes on the longest path).
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, node: NodeId) -> usize {
        if self.is_leaf(node) {
            1
        } else {
            1 + self
                .depth_from(self.left_child(node))
                .max(self.depth_from(self.right_child(node)))
        }
    }

    /// Traverse from the root to a leaf for the given feature row.
    ///
    /// NaN feature values take the per-node default direction. Features
    /// beyond the row length are treated as missing.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f32]) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let fvalue = features
                .get(self.split_index(node) as usize)
                .copied()
                .unwrap_or(f32::NAN);
            node = if fvalue.is_nan() {
                if self.default_left(node) {
                    self.left_child(node)
                } else {
                    self.right_child(node)
                }
            } else if fvalue < self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Leaf value reached by the given feature row.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        self.leaf_value(self.traverse_to_leaf(features))
    }

    /// Validate basic structural invariants.
    ///
    /// Intended for debug checks and the model conversion path.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        if let Some(covers) = self.covers() {
            if covers.len() != n_nodes {
                return Err(TreeValidationError::CoversLenMismatch {
                    covers_len: covers.len(),
                    n_nodes,
                });
            }
        }

        // Iterative DFS with visit marking to reject cycles and shared nodes.
        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if idx >= n_nodes {
                return Err(TreeValidationError::ChildOutOfBounds {
                    node,
                    child: node,
                    n_nodes,
                });
            }
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            if !self.is_leaf(node) {
                let left = self.left_child(node);
                let right = self.right_child(node);
                if left == node || right == node {
                    return Err(TreeValidationError::SelfLoop { node });
                }
                for child in [left, right] {
                    if (child as usize) >= n_nodes {
                        return Err(TreeValidationError::ChildOutOfBounds {
                            node,
                            child,
                            n_nodes,
                        });
                    }
                }
                stack.push(right);
                stack.push(left);
            }
        }

        for (i, &seen) in visited.iter().enumerate() {
            if !seen {
                return Err(TreeValidationError::UnreachableNode { node: i as u32 });
            }
        }

        Ok(())
    }
}

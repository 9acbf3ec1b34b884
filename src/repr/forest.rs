//! Forest of decision trees with a single output group.

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    /// A tree failed its own validation.
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        #[source]
        error: TreeValidationError,
    },
}

/// Additive ensemble of trees.
///
/// The served classifier is binary, so the forest has exactly one output
/// group: a margin is `base_score + Σ leaf values`.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
}

impl Forest {
    /// Create an empty forest with the given base margin.
    pub fn new(base_score: f32) -> Self {
        Self {
            trees: Vec::new(),
            base_score,
        }
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Base margin added to every prediction.
    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Get a reference to a specific tree.
    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    /// Iterate over trees.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Raw margin for a single feature row.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.predict_row(features);
        }
        margin
    }

    /// Validate every tree in the forest.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx: i, error })?;
        }
        Ok(())
    }
}

//! Path-dependent TreeSHAP over the native forest.

use std::sync::Arc;

use crate::error::ExplainError;
use crate::repr::{Forest, NodeId, Tree};

use super::path::PathState;
use super::Attribution;

/// TreeSHAP explainer for the loaded forest.
///
/// Shares ownership of the forest with the model and precomputes everything
/// that does not depend on the explained sample: the baseline (cover-weighted
/// expected margin over the training population) and the maximum path length,
/// used to preallocate the path state per request.
#[derive(Debug)]
pub struct TreeExplainer {
    forest: Arc<Forest>,
    n_features: usize,
    expected_value: f64,
    max_path_len: usize,
}

impl TreeExplainer {
    /// Create an explainer for the given forest.
    ///
    /// # Errors
    /// [`ExplainError::MissingCovers`] if any tree lacks cover statistics;
    /// the algorithm needs them to apportion feature-absent subsets.
    pub fn new(forest: Arc<Forest>, n_features: usize) -> Result<Self, ExplainError> {
        if forest.trees().any(|t| !t.has_covers()) {
            return Err(ExplainError::MissingCovers(
                "every tree must carry sum_hessian node statistics",
            ));
        }

        let expected_value = f64::from(forest.base_score())
            + forest
                .trees()
                .map(|tree| tree_expected_value(tree, 0))
                .sum::<f64>();

        // Longest root-to-leaf path plus the sentinel element.
        let max_path_len = forest.trees().map(Tree::depth).max().unwrap_or(0) + 1;

        Ok(Self {
            forest,
            n_features,
            expected_value,
            max_path_len,
        })
    }

    /// The baseline: expected margin over the training population.
    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    /// Compute per-feature margin contributions for a single sample.
    ///
    /// The result satisfies the additivity law
    /// `baseline + Σ contributions ≈ forest.predict_row(features)`.
    pub fn explain_row(&self, features: &[f32]) -> Result<Attribution, ExplainError> {
        if features.len() != self.n_features {
            return Err(ExplainError::LengthMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut contributions = vec![0.0f64; self.n_features];
        let root_path = PathState::with_capacity(self.max_path_len);
        for tree in self.forest.trees() {
            self.recurse(tree, features, &mut contributions, 0, &root_path, 1.0, 1.0, -1);
        }

        Ok(Attribution {
            baseline: self.expected_value,
            contributions,
        })
    }

    /// One step of the recursive walk: extend the path with the parent's
    /// split, then either credit the leaf or descend hot and cold branches.
    #[allow(clippy::too_many_arguments)]
    fn recurse(
        &self,
        tree: &Tree,
        features: &[f32],
        contributions: &mut [f64],
        node: NodeId,
        parent_path: &PathState,
        parent_zero_fraction: f64,
        parent_one_fraction: f64,
        parent_feature: i32,
    ) {
        let mut path = parent_path.extended(parent_zero_fraction, parent_one_fraction, parent_feature);

        if tree.is_leaf(node) {
            let leaf_value = f64::from(tree.leaf_value(node));
            for i in 1..path.len() {
                let w = path.unwound_sum(i);
                let feature = path.feature(i) as usize;
                contributions[feature] +=
                    w * (path.one_fraction(i) - path.zero_fraction(i)) * leaf_value;
            }
            return;
        }

        let covers = tree.covers().expect("checked at explainer construction");
        let feature = tree.split_index(node);
        let left = tree.left_child(node);
        let right = tree.right_child(node);

        // Hot child: where the explained sample actually goes. Missing
        // values follow the same default-direction rule as scoring.
        let fvalue = features.get(feature as usize).copied().unwrap_or(f32::NAN);
        let go_left = if fvalue.is_nan() {
            tree.default_left(node)
        } else {
            fvalue < tree.split_threshold(node)
        };
        let (hot, cold) = if go_left { (left, right) } else { (right, left) };

        // A feature met twice on the path: undo its earlier extend and fold
        // the fractions into this split.
        let mut incoming_zero_fraction = 1.0;
        let mut incoming_one_fraction = 1.0;
        if let Some(k) = path.find_feature(feature as i32) {
            incoming_zero_fraction = path.zero_fraction(k);
            incoming_one_fraction = path.one_fraction(k);
            path.unwind(k);
        }

        let node_cover = f64::from(covers[node as usize]);
        let hot_zero_fraction = f64::from(covers[hot as usize]) / node_cover;
        let cold_zero_fraction = f64::from(covers[cold as usize]) / node_cover;

        self.recurse(
            tree,
            features,
            contributions,
            hot,
            &path,
            hot_zero_fraction * incoming_zero_fraction,
            incoming_one_fraction,
            feature as i32,
        );
        self.recurse(
            tree,
            features,
            contributions,
            cold,
            &path,
            cold_zero_fraction * incoming_zero_fraction,
            0.0,
            feature as i32,
        );
    }
}

/// Cover-weighted mean of leaf values: the tree's output expectation over
/// the training population.
fn tree_expected_value(tree: &Tree, node: NodeId) -> f64 {
    if tree.is_leaf(node) {
        return f64::from(tree.leaf_value(node));
    }
    let covers = tree.covers().expect("checked at explainer construction");
    let left = tree.left_child(node);
    let right = tree.right_child(node);
    let left_cover = f64::from(covers[left as usize]);
    let right_cover = f64::from(covers[right as usize]);
    let total = left_cover + right_cover;

    (left_cover * tree_expected_value(tree, left) + right_cover * tree_expected_value(tree, right))
        / total
}

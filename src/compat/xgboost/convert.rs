//! Conversion from XGBoost JSON types to the native forest.

use crate::repr::{Forest, Tree};

use super::json::{GradientBooster, TreeDump, XgbModel};

/// Error type for XGBoost model conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("unsupported booster '{0}': only gbtree models can be served")]
    UnsupportedBooster(&'static str),

    #[error("tree {0} has no nodes")]
    EmptyTree(usize),

    #[error("tree {tree} node {node} references child {child} but the tree has {num_nodes} nodes")]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i32,
        num_nodes: usize,
    },

    #[error("tree {tree}: array '{array}' has {actual} entries, expected {expected}")]
    ArrayLenMismatch {
        tree: usize,
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tree {0} uses categorical splits, which are not supported")]
    CategoricalSplit(usize),
}

/// Convert `base_score` from probability space to margin space.
///
/// XGBoost stores `base_score` in probability space in JSON for logistic
/// objectives, while the forest accumulates margins. This mirrors XGBoost's
/// `ProbToMargin`.
pub(crate) fn prob_to_margin(base_score: f32, objective: &str) -> f32 {
    match objective {
        "binary:logistic" | "reg:logistic" => {
            let p = base_score.clamp(1e-7, 1.0 - 1e-7);
            (p / (1.0 - p)).ln()
        }
        _ => base_score,
    }
}

impl XgbModel {
    /// Convert to a native [`Forest`].
    ///
    /// Only gbtree boosters with numeric splits convert; anything else is a
    /// [`ConversionError`] that the asset loader turns into a fatal
    /// `ConfigError`.
    pub fn to_forest(&self) -> Result<Forest, ConversionError> {
        let trees = match &self.learner.gradient_booster {
            GradientBooster::Gbtree { model } => &model.trees,
            other => return Err(ConversionError::UnsupportedBooster(other.name())),
        };

        let base_margin = prob_to_margin(
            self.learner.learner_model_param.base_score,
            self.learner.objective.name(),
        );

        let mut forest = Forest::new(base_margin);
        for (idx, dump) in trees.iter().enumerate() {
            forest.push_tree(convert_tree(idx, dump)?);
        }
        Ok(forest)
    }
}

fn convert_tree(tree_idx: usize, dump: &TreeDump) -> Result<Tree, ConversionError> {
    let n_nodes = dump.left_children.len();
    if n_nodes == 0 {
        return Err(ConversionError::EmptyTree(tree_idx));
    }

    check_len(tree_idx, "right_children", n_nodes, dump.right_children.len())?;
    check_len(tree_idx, "split_indices", n_nodes, dump.split_indices.len())?;
    check_len(
        tree_idx,
        "split_conditions",
        n_nodes,
        dump.split_conditions.len(),
    )?;
    check_len(tree_idx, "default_left", n_nodes, dump.default_left.len())?;
    check_len(tree_idx, "sum_hessian", n_nodes, dump.sum_hessian.len())?;

    if dump.split_type.iter().any(|&t| t != 0) {
        return Err(ConversionError::CategoricalSplit(tree_idx));
    }

    let mut split_indices = Vec::with_capacity(n_nodes);
    let mut split_thresholds = Vec::with_capacity(n_nodes);
    let mut left_children = Vec::with_capacity(n_nodes);
    let mut right_children = Vec::with_capacity(n_nodes);
    let mut default_left = Vec::with_capacity(n_nodes);
    let mut is_leaf = Vec::with_capacity(n_nodes);
    let mut leaf_values = Vec::with_capacity(n_nodes);

    for node in 0..n_nodes {
        let left = dump.left_children[node];
        let right = dump.right_children[node];
        let leaf = left == -1;

        if leaf {
            // Leaf value lives in split_conditions for XGBoost dumps.
            split_indices.push(0);
            split_thresholds.push(0.0);
            left_children.push(0);
            right_children.push(0);
            leaf_values.push(dump.split_conditions[node]);
        } else {
            for child in [left, right] {
                if child < 0 || child as usize >= n_nodes {
                    return Err(ConversionError::InvalidNodeIndex {
                        tree: tree_idx,
                        node,
                        child,
                        num_nodes: n_nodes,
                    });
                }
            }
            split_indices.push(dump.split_indices[node] as u32);
            split_thresholds.push(dump.split_conditions[node]);
            left_children.push(left as u32);
            right_children.push(right as u32);
            leaf_values.push(0.0);
        }
        is_leaf.push(leaf);
        default_left.push(dump.default_left[node] != 0);
    }

    let covers: Vec<f32> = dump.sum_hessian.iter().map(|&h| h as f32).collect();

    Ok(Tree::new(
        split_indices,
        split_thresholds,
        left_children,
        right_children,
        default_left,
        is_leaf,
        leaf_values,
    )
    .with_covers(covers))
}

fn check_len(
    tree: usize,
    array: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ConversionError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ConversionError::ArrayLenMismatch {
            tree,
            array,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::xgboost::{LearnerModelParam, Objective};
    use serde_json::json;

    fn stump_dump() -> TreeDump {
        serde_json::from_value(json!({
            "tree_param": {"num_nodes": "3", "num_feature": "1"},
            "id": 0,
            "sum_hessian": [100.0, 60.0, 40.0],
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [0, 0, 0],
            "split_conditions": [4.0, -0.4, 0.6],
            "default_left": [1, 0, 0]
        }))
        .unwrap()
    }

    fn binary_model(trees: Vec<TreeDump>) -> XgbModel {
        XgbModel {
            version: [2, 0, 0],
            learner: crate::compat::xgboost::Learner {
                feature_names: vec![],
                gradient_booster: GradientBooster::Gbtree {
                    model: crate::compat::xgboost::ModelTrees {
                        trees,
                        tree_info: vec![0],
                    },
                },
                objective: Objective::BinaryLogistic,
                learner_model_param: LearnerModelParam {
                    base_score: 0.5,
                    n_class: 0,
                    n_features: 1,
                },
            },
        }
    }

    #[test]
    fn prob_to_margin_logistic() {
        assert!(prob_to_margin(0.5, "binary:logistic").abs() < 1e-6);
        let m = prob_to_margin(0.9, "binary:logistic");
        assert!((m - (0.9f32 / 0.1).ln()).abs() < 1e-5);
        // Non-logistic objectives pass through unchanged.
        assert_eq!(prob_to_margin(0.25, "binary:logitraw"), 0.25);
    }

    #[test]
    fn converts_stump_and_keeps_covers() {
        let model = binary_model(vec![stump_dump()]);
        let forest = model.to_forest().unwrap();

        assert_eq!(forest.n_trees(), 1);
        assert!(forest.base_score().abs() < 1e-6);
        let tree = forest.tree(0);
        assert!(tree.has_covers());
        assert_eq!(tree.predict_row(&[3.5]), -0.4);
        assert_eq!(tree.predict_row(&[4.5]), 0.6);
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_child_index() {
        let mut dump = stump_dump();
        dump.right_children[0] = 9;
        let model = binary_model(vec![dump]);
        assert!(matches!(
            model.to_forest(),
            Err(ConversionError::InvalidNodeIndex { child: 9, .. })
        ));
    }

    #[test]
    fn rejects_categorical_splits() {
        let mut dump = stump_dump();
        dump.split_type = vec![0, 1, 0];
        let model = binary_model(vec![dump]);
        assert!(matches!(
            model.to_forest(),
            Err(ConversionError::CategoricalSplit(0))
        ));
    }

    #[test]
    fn rejects_array_len_mismatch() {
        let mut dump = stump_dump();
        dump.sum_hessian.pop();
        let model = binary_model(vec![dump]);
        assert!(matches!(
            model.to_forest(),
            Err(ConversionError::ArrayLenMismatch {
                array: "sum_hessian",
                ..
            })
        ));
    }
}

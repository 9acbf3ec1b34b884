//! Shared helpers for unit and integration tests.
//!
//! Compiled into the library so the `tests/` suites can reuse the same
//! builders as the `#[cfg(test)]` modules.

use crate::repr::{Forest, Tree};

/// Default tolerance for additivity checks (f32 margins vs f64 attributions).
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Build a depth-1 tree: `feature < threshold` -> `left` leaf, else `right`.
pub fn stump(feature: u32, threshold: f32, left: f32, right: f32) -> Tree {
    Tree::new(
        vec![feature, 0, 0],
        vec![threshold, 0.0, 0.0],
        vec![1, 0, 0],
        vec![2, 0, 0],
        vec![true, true, true],
        vec![false, true, true],
        vec![0.0, left, right],
    )
}

/// [`stump`] with cover statistics `[root, left, right]` attached.
pub fn stump_with_covers(
    feature: u32,
    threshold: f32,
    left: f32,
    right: f32,
    covers: [f32; 3],
) -> Tree {
    stump(feature, threshold, left, right).with_covers(covers.to_vec())
}

/// A small forest of cover-carrying stumps over four features, matching the
/// shipped fixture model: base margin 0 and one stump per feature.
pub fn demo_forest() -> Forest {
    let mut forest = Forest::new(0.0);
    forest.push_tree(stump_with_covers(0, 4.0, -0.4, 0.6, [100.0, 60.0, 40.0]));
    forest.push_tree(stump_with_covers(2, 13.0, -0.3, 0.5, [100.0, 55.0, 45.0]));
    forest.push_tree(stump_with_covers(1, 15.0, 0.4, -0.2, [100.0, 50.0, 50.0]));
    forest.push_tree(stump_with_covers(3, 180.0, -0.2, 0.3, [100.0, 70.0, 30.0]));
    forest
}

//! Additive feature attribution for the loaded forest.
//!
//! Implements path-dependent TreeSHAP (Lundberg et al. 2020, "From local
//! explanations to global understanding with explainable AI for trees").
//! Attributions are computed in margin space, where the decomposition is
//! exact: `baseline + Σ contributions == raw margin`.

mod path;
mod tree_shap;

pub use path::PathState;
pub use tree_shap::TreeExplainer;

use serde::Serialize;

/// Additive decomposition of one prediction.
///
/// `baseline` is the cover-weighted expected margin of the forest;
/// `contributions[i]` is the signed margin-space contribution of feature `i`,
/// aligned with the feature-spec order.
#[derive(Debug, Clone, Serialize)]
pub struct Attribution {
    pub baseline: f64,
    pub contributions: Vec<f64>,
}

impl Attribution {
    /// `baseline + Σ contributions`; equals the raw margin up to float noise.
    pub fn reconstructed_margin(&self) -> f64 {
        self.baseline + self.contributions.iter().sum::<f64>()
    }
}

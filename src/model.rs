//! The loaded classifier: forest plus scoring metadata.

use std::sync::Arc;

use crate::error::ScoreError;
use crate::features::InputVector;
use crate::repr::Forest;

/// Binary bleeding-risk classifier over patient covariates.
///
/// Wraps the converted forest with its expected input width. Margins are the
/// forest's raw additive output; the class-1 probability is the logistic
/// transform of the margin. The forest is shared with the explainer.
#[derive(Debug, Clone)]
pub struct RiskModel {
    forest: Arc<Forest>,
    n_features: usize,
}

impl RiskModel {
    pub fn new(forest: Arc<Forest>, n_features: usize) -> Self {
        Self { forest, n_features }
    }

    /// Expected input width.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The underlying forest.
    #[inline]
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Raw margin for an input vector.
    ///
    /// The width invariant is re-checked here so a vector built against the
    /// wrong spec list can never reach the forest.
    pub fn margin(&self, input: &InputVector) -> Result<f32, ScoreError> {
        if input.len() != self.n_features {
            return Err(ScoreError::LengthMismatch {
                expected: self.n_features,
                actual: input.len(),
            });
        }
        Ok(self.forest.predict_row(input.as_slice()))
    }

    /// Class-1 probability: `sigmoid(margin)`.
    pub fn probability(&self, input: &InputVector) -> Result<f32, ScoreError> {
        Ok(sigmoid(self.margin(input)?))
    }
}

/// Numerically stable logistic sigmoid.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSpec;
    use crate::testing::demo_forest;

    fn specs(n: usize) -> Vec<FeatureSpec> {
        (0..n)
            .map(|i| FeatureSpec::from_name(format!("feature {i}")))
            .collect()
    }

    #[test]
    fn sigmoid_midpoint_and_saturation() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-7);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
        // Extreme inputs stay finite.
        assert!(sigmoid(1e30).is_finite());
        assert!(sigmoid(-1e30).is_finite());
    }

    #[test]
    fn margin_rejects_wrong_width() {
        let model = RiskModel::new(Arc::new(demo_forest()), 4);
        let input = InputVector::new(vec![1.0, 2.0], &specs(2)).unwrap();
        assert_eq!(
            model.margin(&input),
            Err(ScoreError::LengthMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn probability_is_sigmoid_of_margin() {
        let model = RiskModel::new(Arc::new(demo_forest()), 4);
        let input = InputVector::new(vec![3.5, 18.0, 14.0, 200.0], &specs(4)).unwrap();

        let margin = model.margin(&input).unwrap();
        let prob = model.probability(&input).unwrap();
        assert!((prob - sigmoid(margin)).abs() < 1e-7);
        // Fixture margin for this row is -0.4 + 0.5 - 0.2 + 0.3 = 0.2.
        assert!((margin - 0.2).abs() < 1e-6);
    }

    #[test]
    fn scoring_is_deterministic() {
        let model = RiskModel::new(Arc::new(demo_forest()), 4);
        let input = InputVector::new(vec![3.5, 18.0, 14.0, 200.0], &specs(4)).unwrap();

        let first = model.probability(&input).unwrap();
        for _ in 0..10 {
            assert_eq!(model.probability(&input).unwrap(), first);
        }
    }
}

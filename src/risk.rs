//! Risk scoring and three-tier clinical classification.

use serde::Serialize;

use crate::error::ScoreError;
use crate::features::InputVector;
use crate::model::{sigmoid, RiskModel};

/// Tier breakpoints on the class-1 probability. Boundary values belong to
/// the higher tier.
pub const HIGH_THRESHOLD: f32 = 0.30;
pub const MEDIUM_THRESHOLD: f32 = 0.10;

/// Ordered clinical risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk",
            RiskTier::Medium => "Medium risk",
            RiskTier::High => "High risk",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            RiskTier::Low => "Routine follow-up every 3 months, maintain anticoagulation",
            RiskTier::Medium => {
                "Biweekly outpatient follow-up, start non-selective beta-blocker therapy"
            }
            RiskTier::High => {
                "Immediate inpatient monitoring, prioritize endoscopy, \
                 consider prophylactic shunt procedure (TIPS)"
            }
        }
    }

    /// Display color token for the tier.
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Low => "#2E86C1",
            RiskTier::Medium => "#FFA500",
            RiskTier::High => "#FF4B4B",
        }
    }
}

/// Map a probability to its tier. Pure; thresholds are inclusive on the
/// lower bound of each tier.
pub fn classify(probability: f32) -> RiskTier {
    if probability >= HIGH_THRESHOLD {
        RiskTier::High
    } else if probability >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Probability as a percentage rounded to two decimals, display only.
/// Classification always runs on the full-precision value.
pub fn display_percent(probability: f32) -> f32 {
    (f64::from(probability) * 10_000.0).round() as f32 / 100.0
}

/// Which of the two observed scoring procedures to use. Both produce the
/// same probability for the same model and input; the margin variant exists
/// so the scorer and the explainer share one numeric convention end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreConvention {
    /// The model's native probability output.
    #[default]
    NativeProbability,
    /// Raw margin passed through the logistic transform here.
    SigmoidOfMargin,
}

/// Scores inputs against the model under a fixed convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    convention: ScoreConvention,
}

impl Scorer {
    pub fn new(convention: ScoreConvention) -> Self {
        Self { convention }
    }

    /// Class-1 probability for the input.
    pub fn probability(&self, model: &RiskModel, input: &InputVector) -> Result<f32, ScoreError> {
        match self.convention {
            ScoreConvention::NativeProbability => model.probability(input),
            ScoreConvention::SigmoidOfMargin => Ok(sigmoid(model.margin(input)?)),
        }
    }

    /// Score and classify in one step.
    pub fn assess(&self, model: &RiskModel, input: &InputVector) -> Result<RiskAssessment, ScoreError> {
        let probability = self.probability(model, input)?;
        Ok(RiskAssessment::from_probability(probability))
    }
}

/// One prediction cycle's result: probability plus derived tier data.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub probability: f32,
    pub tier: RiskTier,
    pub advice: &'static str,
    pub color: &'static str,
}

impl RiskAssessment {
    pub fn from_probability(probability: f32) -> Self {
        let tier = classify(probability);
        Self {
            probability,
            tier,
            advice: tier.advice(),
            color: tier.color(),
        }
    }

    /// Rounded percentage for the results panel.
    pub fn percent(&self) -> f32 {
        display_percent(self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSpec;
    use crate::model::RiskModel;
    use crate::testing::demo_forest;
    use std::sync::Arc;

    #[test]
    fn tier_boundaries_belong_to_the_higher_tier() {
        assert_eq!(classify(0.10), RiskTier::Medium);
        assert_eq!(classify(0.30), RiskTier::High);
        assert_eq!(classify(0.0999), RiskTier::Low);
        assert_eq!(classify(0.9), RiskTier::High);
    }

    #[test]
    fn tiers_partition_the_probability_range() {
        for i in 0..=1000 {
            let p = i as f32 / 1000.0;
            let tier = classify(p);
            if p < MEDIUM_THRESHOLD {
                assert_eq!(tier, RiskTier::Low, "p={p}");
            } else if p < HIGH_THRESHOLD {
                assert_eq!(tier, RiskTier::Medium, "p={p}");
            } else {
                assert_eq!(tier, RiskTier::High, "p={p}");
            }
        }
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
    }

    #[test]
    fn display_rounding_is_two_decimals() {
        assert_eq!(display_percent(0.54983), 54.98);
        assert_eq!(display_percent(0.1), 10.0);
        // Rounding must not move a value across a tier boundary:
        // 0.29999 displays as 30.00 but still classifies as Medium.
        assert_eq!(display_percent(0.29999), 30.0);
        assert_eq!(classify(0.29999), RiskTier::Medium);
    }

    #[test]
    fn conventions_agree() {
        let model = RiskModel::new(Arc::new(demo_forest()), 4);
        let specs: Vec<_> = (0..4)
            .map(|i| FeatureSpec::from_name(format!("f{i}")))
            .collect();
        let input =
            crate::features::InputVector::new(vec![3.5, 18.0, 14.0, 200.0], &specs).unwrap();

        let native = Scorer::new(ScoreConvention::NativeProbability)
            .probability(&model, &input)
            .unwrap();
        let manual = Scorer::new(ScoreConvention::SigmoidOfMargin)
            .probability(&model, &input)
            .unwrap();
        assert_eq!(native, manual);
    }

    #[test]
    fn assessment_carries_tier_advice_and_color() {
        let assessment = RiskAssessment::from_probability(0.55);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.color, "#FF4B4B");
        assert!(assessment.advice.contains("endoscopy"));
        assert_eq!(assessment.percent(), 55.0);
    }
}

//! Patient covariates: feature kinds, input widget bounds, input vectors.
//!
//! The upstream model was trained on four lab-derived covariates. Display
//! names are classified into a [`FeatureKind`] exactly once, when the
//! feature-name list is loaded; every later render and prediction works off
//! the resolved kind instead of re-matching strings.

use serde::Serialize;

use crate::error::ScoreError;

/// Clinical category of a feature, resolved from its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    /// Neutrophil-to-lymphocyte ratio.
    InflammationRatio,
    /// Platelet count / spleen diameter ratio.
    PlateletSpleenRatio,
    /// Portal vein width on ultrasound.
    PortalVeinWidth,
    /// Serum type-IV collagen.
    CollagenIv,
    /// Unrecognised name: unconstrained numeric input.
    Other,
}

impl FeatureKind {
    /// Classify a display name by substring. The Chinese aliases keep
    /// feature lists exported from the original training environment
    /// working unchanged.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("nlr") {
            FeatureKind::InflammationRatio
        } else if lower.contains("platelet") || name.contains("血小板") {
            FeatureKind::PlateletSpleenRatio
        } else if lower.contains("portal") || name.contains("门静脉") {
            FeatureKind::PortalVeinWidth
        } else if lower.contains("collagen") || name.contains("IV型胶原") {
            FeatureKind::CollagenIv
        } else {
            FeatureKind::Other
        }
    }
}

/// Widget parameters for one feature: bounds, default, step, display unit.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
    /// Display unit, empty for dimensionless features.
    pub unit: &'static str,
}

impl FeatureSpec {
    /// Build the spec for a display name, with clinically reasonable
    /// bounds and defaults per kind.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FeatureKind::from_name(&name);
        let (min, max, default, step, unit) = match kind {
            FeatureKind::InflammationRatio => (0.1, 50.0, 3.5, 0.1, ""),
            FeatureKind::PlateletSpleenRatio => (0.1, 100.0, 18.0, 0.1, "×10⁹/L/cm"),
            FeatureKind::PortalVeinWidth => (5.0, 40.0, 14.0, 0.1, "mm"),
            FeatureKind::CollagenIv => (0.0, 2000.0, 200.0, 1.0, "ng/mL"),
            FeatureKind::Other => (0.0, 1.0e6, 0.0, 0.1, ""),
        };
        Self {
            name,
            kind,
            min,
            max,
            default,
            step,
            unit,
        }
    }
}

/// Ordered numeric inputs, one per feature spec, in spec order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputVector(Vec<f32>);

impl InputVector {
    /// Build an input vector, enforcing the order/length invariant against
    /// the feature specs before it can reach the scorer.
    pub fn new(values: Vec<f32>, specs: &[FeatureSpec]) -> Result<Self, ScoreError> {
        if values.len() != specs.len() {
            return Err(ScoreError::LengthMismatch {
                expected: specs.len(),
                actual: values.len(),
            });
        }
        for (value, spec) in values.iter().zip(specs) {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteInput {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(Self(values))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

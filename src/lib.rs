//! hemorisk: bleeding-risk prediction service for Budd-Chiari syndrome.
//!
//! Loads a pre-trained XGBoost binary classifier over four lab-derived
//! patient covariates, serves a single-page form, and for each submission
//! produces a 6-month upper-GI bleeding probability, a three-tier clinical
//! recommendation, and a TreeSHAP feature-attribution chart.
//!
//! # Key Types
//!
//! - [`AppContext`](assets::AppContext) - immutable model + feature specs, built once at startup
//! - [`RiskModel`](model::RiskModel) - margin and probability scoring
//! - [`Scorer`](risk::Scorer) / [`classify`](risk::classify) - probability to clinical tier
//! - [`TreeExplainer`](explain::TreeExplainer) - additive margin-space attributions

pub mod assets;
pub mod compat;
pub mod config;
pub mod error;
pub mod explain;
pub mod features;
pub mod model;
pub mod render;
pub mod repr;
pub mod risk;
pub mod server;
pub mod testing;

pub use assets::AppContext;
pub use config::{Config, RenderMode};
pub use error::{ConfigError, ExplainError, ScoreError};
pub use features::{FeatureKind, FeatureSpec, InputVector};
pub use model::RiskModel;
pub use risk::{classify, RiskAssessment, RiskTier, ScoreConvention, Scorer};

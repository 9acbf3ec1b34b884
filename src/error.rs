//! Error taxonomy for the prediction service.
//!
//! Three families with different propagation policies:
//!
//! - [`ConfigError`]: startup-time asset/model problems. Fatal; the process
//!   logs the error and exits instead of serving with a broken model.
//! - [`ScoreError`]: per-request input problems. Rendered in the UI; the
//!   session stays usable.
//! - [`ExplainError`]: attribution failures. Rendered as a warning next to
//!   the (still valid) risk result.

use std::path::PathBuf;

use crate::compat::xgboost::ConversionError;
use crate::repr::ForestValidationError;

/// Fatal startup errors: missing or invalid assets.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("assets directory missing: {0}")]
    AssetsDirMissing(PathBuf),

    #[error("failed to read {path}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    AssetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("model conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("invalid model structure: {0}")]
    InvalidStructure(#[from] ForestValidationError),

    #[error("only binary classifiers are supported (model has {n_classes} classes)")]
    WrongClassCount { n_classes: usize },

    #[error("feature name list has {names} entries but the model expects {model} features")]
    FeatureCountMismatch { names: usize, model: usize },
}

/// Per-request scoring errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("input has {actual} values but the model expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("value for '{name}' is not a finite number")]
    NonFiniteInput { name: String },

    #[error("missing value for '{name}'")]
    MissingInput { name: String },

    #[error("value for '{name}' is not numeric: '{raw}'")]
    MalformedInput { name: String, raw: String },
}

/// Attribution computation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplainError {
    #[error("cover statistics required for TreeSHAP: {0}")]
    MissingCovers(&'static str),

    #[error("input has {actual} values but the explainer expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

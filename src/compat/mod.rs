//! Loaders for foreign model formats.

pub mod xgboost;

//! XGBoost JSON model format support.
//!
//! Parses the XGBoost >= 2.0 JSON envelope and converts it into the native
//! [`Forest`](crate::repr::Forest) representation. Only the shapes the
//! service can actually serve survive conversion: a gbtree booster with a
//! binary objective and numeric splits.

mod convert;
mod json;

pub use convert::ConversionError;
pub use json::{
    GradientBooster, Learner, LearnerModelParam, ModelTrees, Objective, TreeDump, TreeParam,
    XgbModel,
};

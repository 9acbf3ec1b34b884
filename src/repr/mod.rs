//! Native representation of the loaded classifier.
//!
//! Trees are stored in a flat structure-of-arrays layout for cache-friendly
//! root-to-leaf traversal. The service only ever scores one patient row per
//! request, so there is no batch machinery here; [`Forest::predict_row`] is
//! the whole inference surface.

mod forest;
mod tree;

/// Node index local to a tree (0 = root).
pub type NodeId = u32;

pub use forest::{Forest, ForestValidationError};
pub use tree::{Tree, TreeValidationError};

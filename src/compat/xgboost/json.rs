//! XGBoost JSON model parsing.
//!
//! These are "foreign types" mirroring the on-disk layout of XGBoost >= 2.0
//! JSON models. Numeric learner parameters arrive as strings
//! (`"num_feature": "4"`), hence the `DisplayFromStr` annotations, and
//! `base_score` shows up as a number, a string, or a bracketed string like
//! `"[5E-1]"` depending on the XGBoost version that wrote the file.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SerdeError::custom("invalid number for base_score"));
            }
            Value::String(s) => {
                if let Ok(f) = s.trim().parse::<f32>() {
                    return Ok(f);
                }
                // Bracketed scalar like "[5E-1]".
                let t = s.trim();
                if t.starts_with('[') && t.ends_with(']') {
                    if let Ok(f) = t[1..t.len() - 1].trim().parse::<f32>() {
                        return Ok(f);
                    }
                }
                return Err(SerdeError::custom(format!(
                    "cannot parse base_score from string: {s}"
                )));
            }
            Value::Array(arr) => {
                cur = arr
                    .into_iter()
                    .next()
                    .ok_or_else(|| SerdeError::custom("empty base_score array"))?;
            }
            _ => {
                return Err(SerdeError::custom(
                    "base_score must be number, string, or array",
                ));
            }
        }
    }
}

fn default_num_class() -> i64 {
    0
}

// =============================================================================
// Tree / model level definitions
// =============================================================================

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_nodes: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub num_feature: i64,
}

/// One tree of the gbtree ensemble, in XGBoost's parallel-array dump format.
///
/// For leaves, `left_children[i] == -1` and `split_conditions[i]` holds the
/// leaf value. `sum_hessian` is the per-node cover used by TreeSHAP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDump {
    pub tree_param: TreeParam,
    #[serde(default)]
    pub id: i32,
    pub sum_hessian: Vec<f64>,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    pub split_conditions: Vec<f32>,
    pub default_left: Vec<i32>,
    #[serde(default)]
    pub split_type: Vec<i32>,
    #[serde(default)]
    pub loss_changes: Vec<f64>,
    #[serde(default)]
    pub base_weights: Vec<f32>,
    #[serde(default)]
    pub parents: Vec<i32>,
    #[serde(default)]
    pub categories: Vec<i32>,
    #[serde(default)]
    pub categories_nodes: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrees {
    pub trees: Vec<TreeDump>,
    #[serde(default)]
    pub tree_info: Vec<i32>,
}

/// Gradient booster variants. Only `gbtree` converts; the others are named
/// so the loader can report exactly what it refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree { model: ModelTrees },
    Gblinear { model: Value },
    Dart { gbtree: Value, weight_drop: Value },
}

impl GradientBooster {
    pub fn name(&self) -> &'static str {
        match self {
            GradientBooster::Gbtree { .. } => "gbtree",
            GradientBooster::Gblinear { .. } => "gblinear",
            GradientBooster::Dart { .. } => "dart",
        }
    }
}

// =============================================================================
// Objective / learner-level definitions
// =============================================================================

/// Training objective. Binary objectives are the supported set; everything
/// else parses (so error messages can name it) but is rejected at
/// conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Objective {
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
    #[serde(rename = "binary:logitraw")]
    BinaryLogitRaw,
    #[serde(untagged)]
    Other { name: String },
}

impl Objective {
    /// The objective name as it appears in the JSON.
    pub fn name(&self) -> &str {
        match self {
            Objective::BinaryLogistic => "binary:logistic",
            Objective::BinaryLogitRaw => "binary:logitraw",
            Objective::Other { name } => name,
        }
    }

    /// Whether this is a supported binary classification objective.
    pub fn is_binary(&self) -> bool {
        matches!(self, Objective::BinaryLogistic | Objective::BinaryLogitRaw)
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f32,
    #[serde(rename = "num_class")]
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_num_class")]
    pub n_class: i64,
    #[serde(rename = "num_feature")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_features: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

// =============================================================================
// Top-level XGBoost model
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XgbModel {
    #[serde(default)]
    pub version: [u32; 3],
    pub learner: Learner,
}

impl XgbModel {
    /// Load a model from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Number of input features the model was trained on.
    pub fn n_features(&self) -> usize {
        self.learner.learner_model_param.n_features as usize
    }

    /// Number of learned classes.
    ///
    /// XGBoost writes `num_class` as 0 (or 1) for binary models; the learned
    /// class count of a binary objective is 2 either way.
    pub fn n_classes(&self) -> usize {
        let n = self.learner.learner_model_param.n_class;
        if n <= 1 && self.learner.objective.is_binary() {
            2
        } else {
            n.max(1) as usize
        }
    }
}

//! Asset loading and the immutable application context.
//!
//! Loads exactly two artifacts from the assets directory: the serialized
//! XGBoost classifier (`bcs_hemorrhage_model.json`) and the ordered
//! feature-name list (`feature_names.json`). Every validation failure is a
//! fatal [`ConfigError`]; the service never starts with a broken model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::compat::xgboost::XgbModel;
use crate::config::Config;
use crate::error::ConfigError;
use crate::explain::TreeExplainer;
use crate::features::FeatureSpec;
use crate::model::RiskModel;

/// File name of the serialized classifier inside the assets directory.
pub const MODEL_FILE: &str = "bcs_hemorrhage_model.json";
/// File name of the ordered feature-name list.
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Everything a request handler needs, built once at startup and shared
/// read-only for the process lifetime. Replaces the cached globals of the
/// original tool with an explicitly constructed object. The explainer is
/// part of the context so its baseline is computed exactly once.
#[derive(Debug)]
pub struct AppContext {
    pub model: RiskModel,
    pub explainer: TreeExplainer,
    pub specs: Vec<FeatureSpec>,
    pub config: Config,
}

impl AppContext {
    /// Load, validate, and assemble the context.
    ///
    /// Validation ladder, in order:
    /// 1. assets directory exists;
    /// 2. model file parses as XGBoost JSON;
    /// 3. the model is a binary classifier (learned class count == 2);
    /// 4. booster converts (gbtree, numeric splits only);
    /// 5. every tree is structurally sound (no cycles or dangling children);
    /// 6. feature-name list length equals the model's input width.
    pub fn load(config: Config) -> Result<Self, ConfigError> {
        let dir = &config.assets_dir;
        if !dir.is_dir() {
            return Err(ConfigError::AssetsDirMissing(dir.clone()));
        }

        let xgb = load_xgb_model(&dir.join(MODEL_FILE))?;

        if !xgb.learner.objective.is_binary() {
            return Err(ConfigError::UnsupportedModel(format!(
                "objective '{}' is not a binary classifier",
                xgb.learner.objective.name()
            )));
        }
        if xgb.n_classes() != 2 {
            return Err(ConfigError::WrongClassCount {
                n_classes: xgb.n_classes(),
            });
        }

        let forest = xgb.to_forest()?;
        forest.validate()?;
        let forest = Arc::new(forest);
        let n_features = xgb.n_features();

        let explainer = TreeExplainer::new(Arc::clone(&forest), n_features)
            .map_err(|err| ConfigError::UnsupportedModel(err.to_string()))?;

        let names = load_feature_names(&dir.join(FEATURE_NAMES_FILE))?;
        if names.len() != n_features {
            return Err(ConfigError::FeatureCountMismatch {
                names: names.len(),
                model: n_features,
            });
        }

        let specs = names.into_iter().map(FeatureSpec::from_name).collect();

        Ok(Self {
            model: RiskModel::new(forest, n_features),
            explainer,
            specs,
            config,
        })
    }
}

fn load_xgb_model(path: &Path) -> Result<XgbModel, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::AssetRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::AssetParse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_feature_names(path: &Path) -> Result<Vec<String>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::AssetRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::AssetParse {
        path: path.to_path_buf(),
        source,
    })
}

//! Asset loading tests: the shipped model parses, converts, and validates;
//! broken asset layouts fail with the right `ConfigError`.

mod common;

use hemorisk::compat::xgboost::XgbModel;
use hemorisk::{AppContext, ConfigError, FeatureKind};

use common::{assets_dir, config_for, fixture_dir, load_shipped_context};

#[test]
fn shipped_model_parses_as_xgboost_json() {
    let model = XgbModel::from_file(assets_dir().join("bcs_hemorrhage_model.json"))
        .expect("model file must parse");

    assert!(model.learner.objective.is_binary());
    assert_eq!(model.n_classes(), 2);
    assert_eq!(model.n_features(), 4);

    let forest = model.to_forest().expect("conversion must succeed");
    assert_eq!(forest.n_trees(), 4);
    assert!(forest.validate().is_ok());
    // binary:logistic stores base_score in probability space; 0.5 is margin 0.
    assert!(forest.base_score().abs() < 1e-6);
}

#[test]
fn context_resolves_feature_kinds_once_at_load() {
    let ctx = load_shipped_context();
    let kinds: Vec<_> = ctx.specs.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FeatureKind::InflammationRatio,
            FeatureKind::PlateletSpleenRatio,
            FeatureKind::PortalVeinWidth,
            FeatureKind::CollagenIv,
        ]
    );
}

#[test]
fn missing_model_file_is_a_config_error() {
    let err = AppContext::load(config_for(fixture_dir("missing_model"))).unwrap_err();
    assert!(matches!(err, ConfigError::AssetRead { .. }));
}

#[test]
fn missing_assets_dir_is_a_config_error() {
    let err = AppContext::load(config_for(fixture_dir("no_such_dir"))).unwrap_err();
    assert!(matches!(err, ConfigError::AssetsDirMissing(_)));
}

#[test]
fn non_binary_objective_is_rejected() {
    let err = AppContext::load(config_for(fixture_dir("bad_objective"))).unwrap_err();
    match err {
        ConfigError::UnsupportedModel(msg) => assert!(msg.contains("reg:squarederror")),
        other => panic!("expected UnsupportedModel, got {other:?}"),
    }
}

#[test]
fn cyclic_tree_structure_is_rejected_at_startup() {
    // A parseable gbtree model whose root names itself as a child must be a
    // startup error, never a forest that loops forever at prediction time.
    let err = AppContext::load(config_for(fixture_dir("self_loop"))).unwrap_err();
    match err {
        ConfigError::InvalidStructure(inner) => {
            assert!(inner.to_string().contains("tree 0"), "{inner}");
        }
        other => panic!("expected InvalidStructure, got {other:?}"),
    }
}

#[test]
fn feature_name_count_must_match_model_width() {
    let err = AppContext::load(config_for(fixture_dir("name_mismatch"))).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::FeatureCountMismatch { names: 3, model: 4 }
    ));
}

//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::path::PathBuf;

use hemorisk::config::RenderMode;
use hemorisk::{AppContext, Config, ScoreConvention};

pub use hemorisk::testing::DEFAULT_TOLERANCE;

/// The shipped assets directory (also the fixture model for these tests).
pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// A broken-asset fixture directory under `tests/fixtures/`.
pub fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn config_for(assets_dir: PathBuf) -> Config {
    Config {
        port: 0,
        assets_dir,
        render_mode: RenderMode::Svg,
        convention: ScoreConvention::NativeProbability,
    }
}

/// Load the application context from the shipped assets.
pub fn load_shipped_context() -> AppContext {
    AppContext::load(config_for(assets_dir())).expect("shipped assets must load")
}

/// The spec's end-to-end example input, in feature order:
/// NLR, platelet/spleen ratio, portal vein width, collagen IV.
pub const EXAMPLE_INPUT: [f32; 4] = [3.5, 18.0, 14.0, 200.0];

//! Service configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::risk::ScoreConvention;

/// How the attribution panel is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Static inline SVG bar chart.
    #[default]
    Svg,
    /// Interactive HTML panel with hover details.
    Interactive,
}

/// Runtime configuration. Every field has a default that reproduces the
/// original tool's behavior: assets next to the binary, static chart.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub render_mode: RenderMode,
    pub convention: ScoreConvention,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("HEMORISK_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let assets_dir = env::var("HEMORISK_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets"));

        let render_mode = match env::var("HEMORISK_RENDER_MODE").as_deref() {
            Ok("interactive") => RenderMode::Interactive,
            _ => RenderMode::Svg,
        };

        let convention = match env::var("HEMORISK_SCORING").as_deref() {
            Ok("margin") => ScoreConvention::SigmoidOfMargin,
            _ => ScoreConvention::NativeProbability,
        };

        Self {
            port,
            assets_dir,
            render_mode,
            convention,
        }
    }
}

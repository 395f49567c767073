//! Deck configuration: canvas geometry loaded from `deck.toml`.
//!
//! Configuration is sparse TOML over stock defaults — override just the
//! values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! width = 10.0          # Page width (canvas units; stock geometry is inches)
//! height = 7.5          # Page height
//! margin_top = 0.75     # Room for the slide title
//! margin_bottom = 0.5
//! margin_left = 0.5
//! margin_right = 0.5
//! label_height = 0.4    # Caption slot under each image
//! label_gap = 0.1       # Gap between image bottom and caption
//! ```
//!
//! Every value must be positive and the margins must leave usable area;
//! violations are configuration errors caught by [`DeckConfig::validate`]
//! before any layout runs. Unknown keys are rejected to catch typos early.

use crate::layout::Canvas;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Deck configuration loaded from `deck.toml`. All fields default; user
/// files only carry overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// Page geometry handed to the layout engine.
    pub canvas: Canvas,
}

impl DeckConfig {
    /// Validate config values are usable before handing them to layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.canvas
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Load and validate config from `path`. A missing file means stock defaults.
pub fn load_config(path: &Path) -> Result<DeckConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        DeckConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A documented stock `deck.toml`, printed by the `gen-config` command.
pub fn stock_config_toml() -> String {
    let c = Canvas::default();
    format!(
        "\
# microdeck configuration. All options are optional; the values below are
# the stock defaults. Canvas units are whatever your renderer treats them
# as - the stock geometry is a 10 x 7.5 inch 16:9 page.

[canvas]
width = {width}
height = {height}
margin_top = {margin_top}
margin_bottom = {margin_bottom}
margin_left = {margin_left}
margin_right = {margin_right}
# Caption slot reserved under every placed image.
label_height = {label_height}
# Gap between an image's bottom edge and its caption.
label_gap = {label_gap}
",
        width = c.width,
        height = c.height,
        margin_top = c.margin_top,
        margin_bottom = c.margin_bottom,
        margin_left = c.margin_left,
        margin_right = c.margin_right,
        label_height = c.label_height,
        label_gap = c.label_gap,
    )
}

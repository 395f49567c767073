//! Slide layout engine — pure geometry, no I/O.
//!
//! Turns a group of catalogue entries into placement instructions for a
//! rendering backend. The module is split the same way as the rest of the
//! pipeline:
//!
//! - **[`grid`]**: Pure dimension math — grid sizing and aspect-preserving
//!   cell fitting (unit testable without a canvas or entries)
//! - **[`profile`]**: User-authored region layouts and the on-disk store
//! - **[`compose`]**: Per-group composition — dispatches on layout kind and
//!   emits [`SlideUnit`](compose::SlideUnit)s of placed rectangles
//!
//! Everything is computed in absolute canvas units (the same unit the
//! [`Canvas`] dimensions are given in — the stock config uses inches). The
//! caller picks the unit; the engine only promises consistency.

pub mod compose;
pub mod grid;
pub mod profile;

pub use compose::{EntryView, PlacedImage, SlideUnit, compose};
pub use profile::{LayoutKind, LayoutProfile, ProfileStore, Region};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
    #[error("invalid region for '{identifier}': {reason}")]
    InvalidRegion { identifier: String, reason: String },
}

/// Canvas geometry: page size, margins, and the label slot reserved under
/// every image. All values share one absolute unit, caller's choice.
///
/// This is configuration, not computed state — violating the positivity
/// requirements is a configuration error reported by [`Canvas::validate`],
/// never a silent coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Vertical space for the filename caption under each image.
    pub label_height: f64,
    /// Gap between an image's bottom edge and its caption.
    pub label_gap: f64,
}

impl Default for Canvas {
    /// 16:9 page in inches, matching the stock presentation geometry.
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 7.5,
            margin_top: 0.75,
            margin_bottom: 0.5,
            margin_left: 0.5,
            margin_right: 0.5,
            label_height: 0.4,
            label_gap: 0.1,
        }
    }
}

impl Canvas {
    /// Horizontal span available to images after margins.
    pub fn available_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Vertical span available to images after margins.
    pub fn available_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Reject non-positive geometry and margin sets that leave no room.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("label_height", self.label_height),
            ("label_gap", self.label_gap),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidCanvas(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.available_width() <= 0.0 || self.available_height() <= 0.0 {
            return Err(LayoutError::InvalidCanvas(
                "margins leave no available area".to_string(),
            ));
        }
        Ok(())
    }
}

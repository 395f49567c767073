//! User-authored layout profiles.
//!
//! A profile overrides the automatic layout for one group. It either forces a
//! stock layout kind (grid / horizontal / mixed) or carries hand-drawn
//! **regions**: fractional rectangles over the canvas, each bound to one
//! identifier, into which that identifier's images are packed independently.
//!
//! Profiles are keyed by group label and round-trip through a JSON file
//! ([`ProfileStore`]) so a drawing front-end and this planner can share them.
//! Region coordinates are normalized to `[0, 1]` over the *available* canvas
//! area (inside margins); the composer scales them to absolute units.
//!
//! Layout kinds form a closed set, so dispatch is an enum match — a profile
//! naming an unknown kind or an identifier outside the taxonomy fails at
//! deserialization, before any geometry runs.

use crate::identifier::Identifier;
use crate::layout::LayoutError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a group's slide(s) should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Hand-drawn regions; falls back to [`Grid`](LayoutKind::Grid) when no
    /// region matches the group.
    Visual,
    /// Force the standard grid.
    Grid,
    /// Force full-width horizontal slices (the spectrum layout).
    Horizontal,
    /// Force the split spectrum/other layout.
    Mixed,
    /// Detect from the group's identifiers.
    #[default]
    Auto,
}

/// One drawn rectangle bound to an identifier. Coordinates are fractions of
/// the available canvas area, `(x1, y1)` top-left, `(x2, y2)` bottom-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub identifier: Identifier,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Region {
    /// Reject coordinates outside `[0, 1]` or rectangles with no area.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason: &str| {
            Err(LayoutError::InvalidRegion {
                identifier: self.identifier.to_string(),
                reason: reason.to_string(),
            })
        };
        let coords = [self.x1, self.y1, self.x2, self.y2];
        if coords.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0) {
            return invalid("coordinates must lie in [0, 1]");
        }
        if self.x2 <= self.x1 || self.y2 <= self.y1 {
            return invalid("rectangle has no area");
        }
        Ok(())
    }
}

/// A group's layout override: a kind plus (for visual layouts) its regions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutProfile {
    #[serde(rename = "type", default)]
    pub kind: LayoutKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<Region>,
}

impl LayoutProfile {
    pub fn validate(&self) -> Result<(), LayoutError> {
        for region in &self.regions {
            region.validate()?;
        }
        Ok(())
    }
}

/// All saved profiles, keyed by group label. Serialized as a single JSON
/// object so the map stays human-inspectable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(flatten)]
    profiles: BTreeMap<String, LayoutProfile>,
}

impl ProfileStore {
    /// Load a store from disk. A missing file is an empty store, not an
    /// error — profiles are optional.
    pub fn load(path: &Path) -> Result<Self, ProfileStoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileStoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, group_label: &str) -> Option<&LayoutProfile> {
        self.profiles.get(group_label)
    }

    pub fn insert(&mut self, group_label: String, profile: LayoutProfile) {
        self.profiles.insert(group_label, profile);
    }

    pub fn remove(&mut self, group_label: &str) -> Option<LayoutProfile> {
        self.profiles.remove(group_label)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier::*;

    fn region(id: Identifier, x1: f64, y1: f64, x2: f64, y2: f64) -> Region {
        Region {
            identifier: id,
            x1,
            y1,
            x2,
            y2,
        }
    }

    // =========================================================================
    // Region validation
    // =========================================================================

    #[test]
    fn region_in_bounds_is_valid() {
        assert!(region(Pdbse, 0.0, 0.0, 0.5, 1.0).validate().is_ok());
    }

    #[test]
    fn region_outside_unit_square_is_rejected() {
        assert!(region(Pdbse, -0.1, 0.0, 0.5, 1.0).validate().is_err());
        assert!(region(Pdbse, 0.0, 0.0, 1.5, 1.0).validate().is_err());
    }

    #[test]
    fn region_without_area_is_rejected() {
        assert!(region(Pdbse, 0.5, 0.0, 0.5, 1.0).validate().is_err());
        assert!(region(Pdbse, 0.2, 0.8, 0.6, 0.8).validate().is_err());
        assert!(region(Pdbse, 0.6, 0.2, 0.4, 0.8).validate().is_err());
    }

    // =========================================================================
    // Profile serde
    // =========================================================================

    #[test]
    fn profile_kind_uses_lowercase_tag() {
        let profile: LayoutProfile = serde_json::from_str(r#"{"type": "horizontal"}"#).unwrap();
        assert_eq!(profile.kind, LayoutKind::Horizontal);
        assert!(profile.regions.is_empty());
    }

    #[test]
    fn profile_kind_defaults_to_auto() {
        let profile: LayoutProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.kind, LayoutKind::Auto);
    }

    #[test]
    fn profile_unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<LayoutProfile>(r#"{"type": "diagonal"}"#).is_err());
    }

    #[test]
    fn profile_unknown_identifier_is_rejected() {
        let json = r#"{
            "type": "visual",
            "regions": [{"identifier": "HAADF", "x1": 0.0, "y1": 0.0, "x2": 1.0, "y2": 1.0}]
        }"#;
        assert!(serde_json::from_str::<LayoutProfile>(json).is_err());
    }

    #[test]
    fn profile_visual_round_trips() {
        let profile = LayoutProfile {
            kind: LayoutKind::Visual,
            regions: vec![
                region(Pdbse, 0.0, 0.0, 0.5, 1.0),
                region(Spectrum, 0.5, 0.0, 1.0, 1.0),
            ],
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: LayoutProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    // =========================================================================
    // Store
    // =========================================================================

    #[test]
    fn store_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ProfileStore::load(&dir.path().join("profiles.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn store_round_trips_by_group_label() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");

        let mut store = ProfileStore::default();
        store.insert(
            "0001".to_string(),
            LayoutProfile {
                kind: LayoutKind::Visual,
                regions: vec![region(Ud, 0.0, 0.0, 1.0, 0.5)],
            },
        );
        store.insert(
            "SPEC2".to_string(),
            LayoutProfile {
                kind: LayoutKind::Horizontal,
                regions: vec![],
            },
        );
        store.save(&path).unwrap();

        let loaded = ProfileStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("0001").unwrap().kind, LayoutKind::Visual);
        assert_eq!(loaded.get("SPEC2").unwrap().kind, LayoutKind::Horizontal);
        assert!(loaded.get("MAP9").is_none());
    }
}

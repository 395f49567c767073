//! The identifier taxonomy: the closed vocabulary of acquisition modalities.
//!
//! Electron-microscope vendor software stamps a modality token into every
//! exported filename — detector names like `PDBSE` or `UD`, or EDS export
//! names like `Spectrum` and `Map`. This module is the single source of truth
//! for that vocabulary:
//!
//! - [`Identifier`] enumerates every valid token. Nothing outside this set may
//!   be assigned to a catalogue entry; edit paths validate via [`FromStr`].
//! - The taxonomy is *ordered*. Position in [`Identifier::ALL`] defines both
//!   the match preference used by [`classify`](crate::classify) (after the
//!   longest-first re-sort) and the sort priority used by
//!   [`sort`](crate::sort).
//! - [`format_group_label`] turns `(group number, identifier)` into the
//!   display label that names a group everywhere: `0002`, `SPEC2`, `MAP3`, or
//!   a custom label verbatim.
//!
//! ## Two families
//!
//! **Groupable** identifiers (detector images: UD, LD, MD, UVD, PDBSE,
//! PDBSE1, BSE, SE, ABF, ADF) carry their 4-digit group code *adjacent* to
//! the token in the filename and share plain numeric labels.
//!
//! **Non-groupable** identifiers (Spectrum, Spectra, Map, Maps, Electron
//! Image) are numbered by the export tool itself — the group number is a
//! trailing counter, and their labels get a `SPEC`/`MAP` prefix so they never
//! collide with detector groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown identifier '{0}' (not in the taxonomy)")]
pub struct ParseIdentifierError(pub String);

/// An acquisition-modality token. The set is closed: every valid value is a
/// variant here, in taxonomy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    #[serde(rename = "UD")]
    Ud,
    #[serde(rename = "LD")]
    Ld,
    #[serde(rename = "MD")]
    Md,
    #[serde(rename = "UVD")]
    Uvd,
    #[serde(rename = "PDBSE")]
    Pdbse,
    #[serde(rename = "PDBSE1")]
    Pdbse1,
    #[serde(rename = "BSE")]
    Bse,
    #[serde(rename = "SE")]
    Se,
    #[serde(rename = "ABF")]
    Abf,
    #[serde(rename = "ADF")]
    Adf,
    Spectrum,
    Spectra,
    Map,
    Maps,
    #[serde(rename = "Electron Image")]
    ElectronImage,
}

use Identifier::*;

/// Sort category of an entry, derived from its identifier. Categories never
/// interleave: every category-0 entry sorts before any category-1 entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    /// Detector images grouped by adjacent 4-digit code.
    Groupable = 0,
    /// Map, Maps, Electron Image.
    MapLike = 1,
    /// Spectrum, Spectra — the horizontal-slice layout family.
    SpectrumLike = 2,
    /// No identifier, or anything unrecognized.
    Other = 3,
}

impl Identifier {
    /// Groupable identifiers, in priority order.
    pub const GROUPABLE: [Identifier; 10] = [Ud, Ld, Md, Uvd, Pdbse, Pdbse1, Bse, Se, Abf, Adf];

    /// Non-groupable identifiers, in priority order.
    pub const NON_GROUPABLE: [Identifier; 5] = [Spectrum, Spectra, Map, Maps, ElectronImage];

    /// The complete taxonomy: groupable first, then non-groupable.
    pub const ALL: [Identifier; 15] = [
        Ud,
        Ld,
        Md,
        Uvd,
        Pdbse,
        Pdbse1,
        Bse,
        Se,
        Abf,
        Adf,
        Spectrum,
        Spectra,
        Map,
        Maps,
        ElectronImage,
    ];

    /// Canonical spelling — what appears in labels, listings, and JSON.
    pub const fn canonical(self) -> &'static str {
        match self {
            Ud => "UD",
            Ld => "LD",
            Md => "MD",
            Uvd => "UVD",
            Pdbse => "PDBSE",
            Pdbse1 => "PDBSE1",
            Bse => "BSE",
            Se => "SE",
            Abf => "ABF",
            Adf => "ADF",
            Spectrum => "Spectrum",
            Spectra => "Spectra",
            Map => "Map",
            Maps => "Maps",
            ElectronImage => "Electron Image",
        }
    }

    pub const fn is_groupable(self) -> bool {
        matches!(
            self,
            Ud | Ld | Md | Uvd | Pdbse | Pdbse1 | Bse | Se | Abf | Adf
        )
    }

    pub const fn is_spectrum_like(self) -> bool {
        matches!(self, Spectrum | Spectra)
    }

    pub const fn is_map_like(self) -> bool {
        matches!(self, Map | Maps | ElectronImage)
    }

    pub const fn category(self) -> Category {
        if self.is_groupable() {
            Category::Groupable
        } else if self.is_map_like() {
            Category::MapLike
        } else {
            Category::SpectrumLike
        }
    }

    /// Sort priority within a category: groupable identifiers rank by taxonomy
    /// position (0..), non-groupable by 100 + position. See
    /// [`sort`](crate::sort) for the missing-identifier sentinel (999).
    pub fn priority(self) -> u16 {
        if let Some(pos) = Self::GROUPABLE.iter().position(|&id| id == self) {
            pos as u16
        } else if let Some(pos) = Self::NON_GROUPABLE.iter().position(|&id| id == self) {
            100 + pos as u16
        } else {
            999
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

impl FromStr for Identifier {
    type Err = ParseIdentifierError;

    /// Parse a canonical identifier name, case-insensitively. This is the
    /// validation gate for metadata edits: anything outside the taxonomy is
    /// rejected, not coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.canonical().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseIdentifierError(s.to_string()))
    }
}

/// Format the display label for a group.
///
/// - No group number → empty string (the entry is ungrouped).
/// - Exact 4-digit code: spectrum-like identifiers become `SPEC{n}` (no zero
///   padding: `0002` → `SPEC2`), map-like become `MAP{n}`, detector groups
///   keep the 4-digit string as-is.
/// - Anything else is a user-authored custom label, returned verbatim.
pub fn format_group_label(group_number: Option<&str>, identifier: Option<Identifier>) -> String {
    let Some(group) = group_number.filter(|g| !g.is_empty()) else {
        return String::new();
    };

    if group.len() == 4 && group.bytes().all(|b| b.is_ascii_digit()) {
        // Always succeeds for a 4-digit ASCII string.
        let n: u32 = group.parse().unwrap_or(0);
        match identifier {
            Some(id) if id.is_spectrum_like() => format!("SPEC{n}"),
            Some(id) if id.is_map_like() => format!("MAP{n}"),
            _ => group.to_string(),
        }
    } else {
        group.to_string()
    }
}

/// Reverse of [`format_group_label`]: recover the stored group number from a
/// display label. `SPEC2`/`MAP12` yield the zero-padded code (`0002`/`0012`);
/// plain 4-digit labels and custom labels come back unchanged.
///
/// Round-trip guarantee: `format_group_label(parse_group_label(l), id)`
/// reproduces `l` for any label produced by `format_group_label`.
pub fn parse_group_label(label: &str) -> Option<String> {
    if label.is_empty() {
        return None;
    }
    for prefix in ["SPEC", "MAP"] {
        if let Some(rest) = label.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = rest.parse::<u32>() {
                    return Some(format!("{n:04}"));
                }
            }
        }
    }
    Some(label.to_string())
}

//! Filename classification: identifier + group-number extraction.
//!
//! Instrument export filenames carry their identity in-band. A detector image
//! looks like `NiCoCr_HT1250c_48h_0001_2_UD.tif` (sample prefix, 4-digit site
//! code, frame counter, detector token); EDS exports look like
//! `Co K_alpha_1 Map Data 2.tif` or `Spectrum 5.tiff` (tool-chosen name with
//! a trailing counter). [`extract`] recovers `(group number, identifier,
//! matched text)` from either shape with a ranked heuristic:
//!
//! 1. Strip the file extension.
//! 2. Try every identifier in the taxonomy, **longest spelling first**, so a
//!    more specific token (`PDBSE1`) always beats its prefix (`PDBSE`). Order
//!    is fixed: ties keep taxonomy order.
//! 3. A token counts only when bounded by whitespace/underscore/dash or a
//!    string edge on the left, and by a separator, `(`, digit, lowercase
//!    suffix (`UDmod2`), or the string end on the right — tolerating
//!    instrument-generated noise like `PDBSE1(COMP)`.
//! 4. The group number comes from the token's family:
//!    - **Groupable** (detector) tokens: prefer a 4-digit run *before* the
//!      token (skipping separator/frame-counter noise), then any digit run
//!      before it, then a digit run after it; each zero-padded to 4 digits.
//!    - **Map-like** tokens: a number after the token (words may intervene),
//!      else the last digit run at end-of-name; a trailing `_N` frame suffix
//!      is ignored in both cases.
//!    - **Spectrum-like** tokens: the last digit run at end-of-name, same
//!      `_N` tolerance.
//!
//! A token with no recoverable number still classifies (`group_number` =
//! `None`); a filename with no token at all yields all-`None`. The function
//! is total and pure — same string in, same tuple out, no I/O.
//!
//! ## Pattern table
//!
//! Every regex is compiled exactly once into [`CANDIDATES`], a ranked table
//! evaluated in fixed order. Nothing about the matching rules can change at
//! runtime.
//!
//! Known limitation, kept on purpose: the end-of-name fallback for Map and
//! Spectrum groups will happily pick up an unrelated trailing number (say, a
//! version suffix). The heuristic has no way to tell those apart; pattern
//! order is the only disambiguation.

use crate::identifier::Identifier;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Result of classifying one filename. All fields are `None` when no
/// identifier token was found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// 4-digit zero-padded group code, if one was recovered.
    pub group_number: Option<String>,
    /// The identifier in canonical taxonomy casing (never filename casing).
    pub identifier: Option<Identifier>,
    /// The substring (or number+token span) the heuristic matched on,
    /// as it appeared in the filename.
    pub matched_text: Option<String>,
}

impl Classification {
    fn none() -> Self {
        Self::default()
    }
}

/// Number-extraction patterns for one identifier, chosen by its family.
enum NumberPatterns {
    /// Detector tokens: number adjacent to the token.
    Groupable {
        /// `0001_1_UD` — 4-digit code, then optional frame-counter noise.
        four_before: Regex,
        /// `17 UD` — any digit run directly before the token.
        any_before: Regex,
        /// `ABF 0100` — digit run directly after the token.
        after: Regex,
    },
    /// Map/Maps/Electron Image: number after the token, words may intervene.
    MapLike { after_words: Regex },
    /// Spectrum/Spectra: trailing number only.
    SpectrumLike,
}

/// One ranked classification candidate: the token-occurrence pattern plus the
/// family-specific number patterns.
struct Candidate {
    id: Identifier,
    token: Regex,
    number: NumberPatterns,
}

/// Right-hand context a token may be followed by: separator, `(`, digit,
/// lowercase suffix with optional digits, or end of string.
const TOKEN_TAIL: &str = r"(?:[\s_\-\(\d]|[a-z]+\d*|$)";

fn token_pattern(escaped: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|[\s_\-])({escaped}){TOKEN_TAIL}"))
        .expect("valid token pattern")
}

fn build_candidate(id: Identifier) -> Candidate {
    let escaped = regex::escape(id.canonical());
    let number = if id.is_groupable() {
        NumberPatterns::Groupable {
            four_before: Regex::new(&format!(
                r"(?i)(\d{{4}})[\s\-_]+\d*[\s\-_]*{escaped}{TOKEN_TAIL}"
            ))
            .expect("valid four-digit pattern"),
            any_before: Regex::new(&format!(r"(?i)(\d+)[\s\-_]+{escaped}{TOKEN_TAIL}"))
                .expect("valid preceding-number pattern"),
            after: Regex::new(&format!(r"(?i){escaped}[\s\-_]+(\d+)"))
                .expect("valid following-number pattern"),
        }
    } else if id.is_map_like() {
        NumberPatterns::MapLike {
            after_words: Regex::new(&format!(
                r"(?i){escaped}(?:\s+\w+)*?[_\s\-]+(\d+)(?:_\d+)?(?:\s|$)"
            ))
            .expect("valid map-number pattern"),
        }
    } else {
        NumberPatterns::SpectrumLike
    };

    Candidate {
        id,
        token: token_pattern(&escaped),
        number,
    }
}

/// The ranked candidate table: taxonomy re-sorted longest-spelling-first
/// (stable, so equal lengths keep taxonomy order), patterns compiled once.
static CANDIDATES: Lazy<Vec<Candidate>> = Lazy::new(|| {
    let mut ids = Identifier::ALL.to_vec();
    ids.sort_by_key(|id| std::cmp::Reverse(id.canonical().len()));
    ids.into_iter().map(build_candidate).collect()
});

/// Last digit run before a trailing `_N` suffix, anchored to end-of-name.
/// Used as the Map-family fallback.
static LAST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_\s\-](\d+)(?:_\d+)?\s*$").expect("valid trailing-number pattern"));

/// Like [`LAST_NUMBER_RE`] but the separator is optional — the Spectrum
/// variant, which also accepts `Spectrum5`.
static TRAILING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_\s\-]?(\d+)(?:_\d+)?\s*$").expect("valid trailing-number pattern"));

/// Zero-pad a digit run to the 4-digit group code width.
fn pad_group(digits: &str) -> String {
    format!("{digits:0>4}")
}

/// Classify a filename into `(group number, identifier, matched text)`.
///
/// The filename may carry an extension (stripped first) but no path
/// components. Deterministic: the result is a pure function of the string.
///
/// ```
/// use microdeck::classify::extract;
/// use microdeck::identifier::Identifier;
///
/// let c = extract("0001 PDBSE.tif");
/// assert_eq!(c.group_number.as_deref(), Some("0001"));
/// assert_eq!(c.identifier, Some(Identifier::Pdbse));
/// assert_eq!(c.matched_text.as_deref(), Some("0001 PDBSE"));
/// ```
pub fn extract(filename: &str) -> Classification {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    for candidate in CANDIDATES.iter() {
        let Some(caps) = candidate.token.captures(&stem) else {
            continue;
        };
        // The token as it appears in the filename (its casing, not ours).
        let found = caps.get(1).map(|m| m.as_str().to_string());

        match &candidate.number {
            NumberPatterns::Groupable {
                four_before,
                any_before,
                after,
            } => {
                if let Some(caps) = four_before.captures(&stem) {
                    return Classification {
                        group_number: Some(caps[1].to_string()),
                        identifier: Some(candidate.id),
                        matched_text: Some(caps[0].trim().to_string()),
                    };
                }
                if let Some(caps) = any_before.captures(&stem) {
                    return Classification {
                        group_number: Some(pad_group(&caps[1])),
                        identifier: Some(candidate.id),
                        matched_text: Some(caps[0].trim().to_string()),
                    };
                }
                if let Some(caps) = after.captures(&stem) {
                    return Classification {
                        group_number: Some(pad_group(&caps[1])),
                        identifier: Some(candidate.id),
                        matched_text: Some(caps[0].to_string()),
                    };
                }
                return Classification {
                    group_number: None,
                    identifier: Some(candidate.id),
                    matched_text: found,
                };
            }
            NumberPatterns::MapLike { after_words } => {
                let number = after_words
                    .captures(&stem)
                    .or_else(|| LAST_NUMBER_RE.captures(&stem))
                    .map(|caps| pad_group(&caps[1]));
                return Classification {
                    group_number: number,
                    identifier: Some(candidate.id),
                    matched_text: found,
                };
            }
            NumberPatterns::SpectrumLike => {
                let number = TRAILING_NUMBER_RE
                    .captures(&stem)
                    .map(|caps| pad_group(&caps[1]));
                return Classification {
                    group_number: number,
                    identifier: Some(candidate.id),
                    matched_text: found,
                };
            }
        }
    }

    Classification::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier::*;

    fn check(filename: &str, group: Option<&str>, id: Option<Identifier>, matched: Option<&str>) {
        let c = extract(filename);
        assert_eq!(c.group_number.as_deref(), group, "group for {filename}");
        assert_eq!(c.identifier, id, "identifier for {filename}");
        assert_eq!(c.matched_text.as_deref(), matched, "match for {filename}");
    }

    // =========================================================================
    // Detector (groupable) filenames
    // =========================================================================

    #[test]
    fn four_digit_code_before_token() {
        check("0001 PDBSE.tif", Some("0001"), Some(Pdbse), Some("0001 PDBSE"));
        check("0001 UD.tif", Some("0001"), Some(Ud), Some("0001 UD"));
        check("0001 LD.tif", Some("0001"), Some(Ld), Some("0001 LD"));
    }

    #[test]
    fn code_with_frame_counter_noise() {
        // Real instrument names: sample prefix, site code, frame counter, token.
        check(
            "NiCoCr_HT1250c_48h_0001_2_UD.tif",
            Some("0001"),
            Some(Ud),
            Some("0001_2_UD"),
        );
        check(
            "NiCoCr_HT1250c_48h_0002_2_UD.tif",
            Some("0002"),
            Some(Ud),
            Some("0002_2_UD"),
        );
    }

    #[test]
    fn specific_token_beats_shorter_prefix() {
        // PDBSE1 must win over PDBSE, even with a suffix glued on.
        check(
            "NiCoCr_HT1250c_48h_0001_1_PDBSE1(COMP).tif",
            Some("0001"),
            Some(Pdbse1),
            Some("0001_1_PDBSE1("),
        );
    }

    #[test]
    fn lowercase_suffix_on_token() {
        check(
            "NiCoCr_HT1250c_48h_0003_2_UDmod2.tif",
            Some("0003"),
            Some(Ud),
            Some("0003_2_UDmod2"),
        );
        check(
            "NiCoCr_HT1250c_48h_0003_2_UDmod.tif",
            Some("0003"),
            Some(Ud),
            Some("0003_2_UDmod"),
        );
    }

    #[test]
    fn short_number_before_token_is_padded() {
        check("17 ABF.tif", Some("0017"), Some(Abf), Some("17 ABF"));
    }

    #[test]
    fn number_after_token() {
        check("ABF 0100.tif", Some("0100"), Some(Abf), Some("ABF 0100"));
        check("ABF 7.tif", Some("0007"), Some(Abf), Some("ABF 7"));
    }

    #[test]
    fn token_without_number_still_classifies() {
        check("sample_BSE.tif", None, Some(Bse), Some("BSE"));
    }

    #[test]
    fn token_casing_is_canonicalized() {
        let c = extract("0005 pdbse.tif");
        assert_eq!(c.identifier, Some(Pdbse));
        assert_eq!(c.group_number.as_deref(), Some("0005"));
    }

    #[test]
    fn se_does_not_fire_inside_pdbse() {
        // Boundary rule: SE needs a separator or string edge on its left.
        let c = extract("0001 PDBSE.tif");
        assert_eq!(c.identifier, Some(Pdbse));
    }

    // =========================================================================
    // Map-family filenames
    // =========================================================================

    #[test]
    fn map_number_after_intervening_words() {
        check("Co K_alpha_1 Map Data 1.tif", Some("0001"), Some(Map), Some("Map"));
        check("Co K_alpha_1 Map Data 2.tif", Some("0002"), Some(Map), Some("Map"));
        check("O K_alpha_1 Map Data 3.tif", Some("0003"), Some(Map), Some("Map"));
        check("Cr K_alpha_1 Map Data 2.tif", Some("0002"), Some(Map), Some("Map"));
    }

    #[test]
    fn electron_image_trailing_number() {
        check("Electron Image 1.tif", Some("0001"), Some(ElectronImage), Some("Electron Image"));
        check("Electron Image 4.tif", Some("0004"), Some(ElectronImage), Some("Electron Image"));
    }

    #[test]
    fn map_frame_suffix_is_ignored() {
        // "_1" after the group counter is a frame suffix, not the group.
        check("Ni K_alpha Map Data 3_1.tif", Some("0003"), Some(Map), Some("Map"));
    }

    #[test]
    fn map_without_any_number() {
        check("Overview Map.tif", None, Some(Map), Some("Map"));
    }

    // =========================================================================
    // Spectrum filenames
    // =========================================================================

    #[test]
    fn spectrum_trailing_number() {
        check("Spectrum 1.tiff", Some("0001"), Some(Spectrum), Some("Spectrum"));
        check("Spectrum 5.tiff", Some("0005"), Some(Spectrum), Some("Spectrum"));
    }

    #[test]
    fn spectrum_with_frame_suffix() {
        check("Spectrum 12_1.tiff", Some("0012"), Some(Spectrum), Some("Spectrum"));
    }

    #[test]
    fn spectrum_without_number() {
        check("Spectrum_Analysis.jpg", None, Some(Spectrum), Some("Spectrum"));
    }

    #[test]
    fn spectra_plural_form() {
        check("Spectra 3.tif", Some("0003"), Some(Spectra), Some("Spectra"));
    }

    // =========================================================================
    // No classification
    // =========================================================================

    #[test]
    fn unrecognized_filename_is_all_none() {
        check("IMG_20260114_093021.jpg", None, None, None);
        check("holiday photo.png", None, None, None);
        check("", None, None, None);
    }

    #[test]
    fn token_must_be_bounded() {
        // "mud" contains "UD" but with no left boundary.
        check("mud sample.tif", None, None, None);
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn extract_is_deterministic() {
        let names = [
            "NiCoCr_HT1250c_48h_0001_1_PDBSE1(COMP).tif",
            "Co K_alpha_1 Map Data 2.tif",
            "Spectrum 5.tiff",
            "nothing here.png",
        ];
        for name in names {
            assert_eq!(extract(name), extract(name), "unstable for {name}");
        }
    }
}

//! Deterministic ordering of catalogue entries.
//!
//! The listing and the deck plan both present entries in one canonical order:
//! detector groups first, then Map groups, then Spectrum groups, then
//! everything unclassified — with grouped entries adjacent inside each band.
//! [`sort_key`] produces that order as a plain comparable key, so callers
//! sort with `sort_by_key`/`sort_by_cached_key` and nothing else.
//!
//! Key layout (compared field by field, ascending):
//!
//! 1. **Category** — groupable 0, map-like 1, spectrum-like 2, other 3.
//!    Categories never interleave.
//! 2. **Group number** — the raw stored string. Numeric codes are zero-padded
//!    to 4 digits, so lexicographic compare is numeric compare; entries with
//!    no group use a sentinel that sorts after every real code.
//! 3. **Identifier priority** — taxonomy position (UD before LD before …),
//!    non-groupable offset by 100, missing identifier 999.
//! 4. **Lowercased filename** — final tie-break.
//!
//! The key is pure: same metadata in, same key out.

use crate::identifier::{Category, Identifier};

/// Sorts after every 4-digit group code and every custom label that starts
/// with an ASCII letter below 'z'.
const NO_GROUP_SENTINEL: &str = "zzzzz";

/// Total-order sort key for a catalogue entry. Derived `Ord` compares fields
/// top to bottom, which is exactly the policy order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    category: Category,
    group: String,
    priority: u16,
    filename: String,
}

/// Build the sort key from an entry's classification metadata and filename.
pub fn sort_key(
    identifier: Option<Identifier>,
    group_number: Option<&str>,
    filename: &str,
) -> SortKey {
    let group = match group_number {
        Some(g) if !g.is_empty() => g.to_string(),
        _ => NO_GROUP_SENTINEL.to_string(),
    };
    SortKey {
        category: identifier.map_or(Category::Other, Identifier::category),
        group,
        priority: identifier.map_or(999, Identifier::priority),
        filename: filename.to_lowercase(),
    }
}

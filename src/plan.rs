//! Deck planning: compose every group in the catalogue into one plan.
//!
//! This is the orchestration layer over [`layout::compose`]: materialize the
//! grouped view of the catalogue, look up each group's layout profile, and
//! emit a [`DeckPlan`] — the ordered list of slide units a rendering backend
//! turns into an actual document.
//!
//! Groups compose independently (composition is a pure function of the
//! group's entries and profile), so the fan-out runs on rayon. Output order
//! is still the deterministic label order, regardless of which group
//! finished first.

use crate::catalogue::Catalogue;
use crate::layout::compose::{EntryView, SlideUnit, compose};
use crate::layout::{Canvas, LayoutError, ProfileStore};
use rayon::prelude::*;
use serde::Serialize;

/// The planner's output manifest: canvas echo plus every slide unit, in
/// group-label order. Serialized to `deck-plan.json` for the renderer.
#[derive(Debug, Serialize)]
pub struct DeckPlan {
    pub canvas: Canvas,
    pub units: Vec<SlideUnit>,
}

impl DeckPlan {
    /// Number of distinct groups that produced at least one unit.
    pub fn group_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&str> = None;
        for unit in &self.units {
            if last != Some(unit.group_label.as_str()) {
                count += 1;
                last = Some(&unit.group_label);
            }
        }
        count
    }
}

/// Compose all groups (or the `include` subset) into a deck plan.
///
/// Ungrouped entries never reach a slide. A group named in `include` that
/// does not exist simply contributes nothing — the filter mirrors the
/// catalogue, it does not validate against it.
pub fn build_deck_plan(
    catalogue: &Catalogue,
    profiles: &ProfileStore,
    canvas: &Canvas,
    include: Option<&[String]>,
) -> Result<DeckPlan, LayoutError> {
    canvas.validate()?;

    let groups: Vec<(String, Vec<EntryView>)> = catalogue
        .groups()
        .into_iter()
        .filter(|(label, _)| include.is_none_or(|only| only.iter().any(|g| g == label)))
        .map(|(label, entries)| {
            let views = entries.iter().map(|e| e.view()).collect();
            (label, views)
        })
        .collect();

    let composed: Vec<Vec<SlideUnit>> = groups
        .par_iter()
        .map(|(label, views)| compose(label, views, profiles.get(label), canvas))
        .collect::<Result<_, _>>()?;

    Ok(DeckPlan {
        canvas: canvas.clone(),
        units: composed.into_iter().flatten().collect(),
    })
}

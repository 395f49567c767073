//! Per-group slide composition.
//!
//! [`compose`] takes one group's entries (already in catalogue sort order),
//! an optional layout profile, and the canvas geometry, and emits
//! [`SlideUnit`]s — one per output canvas — of placed, non-overlapping image
//! rectangles with caption slots. This is the whole interface the rendering
//! backend consumes; nothing here draws.
//!
//! ## Dispatch
//!
//! An explicit profile kind always wins. Without one (or with `auto`), the
//! group's identifier mix decides:
//!
//! | Group contents | Layout |
//! |---|---|
//! | spectrum-like and others | **mixed** — others left 1/3, spectra right 2/3 |
//! | spectrum-like only | **horizontal** — full-width slices, ≤3 per unit |
//! | anything else | **grid** — the [`plan_grid`] table over the full canvas |
//!
//! A **visual** profile packs each region independently (its own grid over
//! the region bounds), skipping regions whose identifier has no entries in
//! the group; when nothing matches at all — or the region list is empty —
//! the group degrades to the grid layout. A forced **mixed** layout whose
//! spectrum/other split leaves one side empty likewise degrades to the auto
//! path instead of inventing a split.
//!
//! ## Batching
//!
//! Horizontal units hold at most 3 slices. Mixed units advance both sides in
//! lockstep — ≤2 others, ≤3 spectra per unit, `max(ceil(other/2),
//! ceil(spectrum/3))` units total — so a side that runs out early leaves its
//! area under-filled rather than repeating images. Every unit records its
//! `part`/`parts` position for "Part i/n" captioning downstream.

use crate::identifier::Identifier;
use crate::layout::grid::{aspect_ratio, fit_to_width, place_in_cell, plan_grid};
use crate::layout::profile::{LayoutKind, LayoutProfile, Region};
use crate::layout::{Canvas, LayoutError};
use serde::Serialize;

/// The slice of a catalogue entry that composition needs. Built by the
/// caller from whatever store the entries live in.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub entry_id: u64,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub identifier: Option<Identifier>,
}

impl EntryView {
    fn aspect(&self) -> f64 {
        aspect_ratio(self.width, self.height)
    }

    fn is_spectrum_like(&self) -> bool {
        self.identifier.is_some_and(Identifier::is_spectrum_like)
    }
}

/// One image placed on a canvas, in absolute canvas units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedImage {
    pub entry_id: u64,
    /// Caption text for the label slot.
    pub filename: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Top of the caption slot under the image.
    pub label_y: f64,
}

/// One output canvas's worth of placed images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideUnit {
    pub group_label: String,
    /// 1-based position within the group's units.
    pub part: u32,
    /// Total units for the group.
    pub parts: u32,
    pub images: Vec<PlacedImage>,
}

/// Compose a group into slide units. Empty groups compose to zero units;
/// only configuration (canvas/profile) problems error.
pub fn compose(
    group_label: &str,
    entries: &[EntryView],
    profile: Option<&LayoutProfile>,
    canvas: &Canvas,
) -> Result<Vec<SlideUnit>, LayoutError> {
    canvas.validate()?;
    if let Some(profile) = profile {
        profile.validate()?;
    }
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let kind = profile.map(|p| p.kind).unwrap_or_default();
    let units = match kind {
        LayoutKind::Visual => {
            let regions = profile.map(|p| p.regions.as_slice()).unwrap_or(&[]);
            visual_units(entries, regions, canvas)
        }
        LayoutKind::Grid => vec![grid_unit(entries, canvas)],
        LayoutKind::Horizontal => horizontal_units(entries, canvas),
        LayoutKind::Mixed => {
            let (spectra, others) = split_spectrum(entries);
            if spectra.is_empty() || others.is_empty() {
                auto_units(entries, canvas)
            } else {
                mixed_units(&spectra, &others, canvas)
            }
        }
        LayoutKind::Auto => auto_units(entries, canvas),
    };

    let parts = units.len() as u32;
    Ok(units
        .into_iter()
        .enumerate()
        .map(|(i, images)| SlideUnit {
            group_label: group_label.to_string(),
            part: i as u32 + 1,
            parts,
            images,
        })
        .collect())
}

/// Partition a group into (spectrum-like, everything else), keeping order.
fn split_spectrum(entries: &[EntryView]) -> (Vec<&EntryView>, Vec<&EntryView>) {
    entries.iter().partition(|e| e.is_spectrum_like())
}

fn auto_units(entries: &[EntryView], canvas: &Canvas) -> Vec<Vec<PlacedImage>> {
    let (spectra, others) = split_spectrum(entries);
    if !spectra.is_empty() && !others.is_empty() {
        mixed_units(&spectra, &others, canvas)
    } else if !spectra.is_empty() {
        horizontal_units(entries, canvas)
    } else {
        vec![grid_unit(entries, canvas)]
    }
}

fn place(entry: &EntryView, fitted: crate::layout::grid::FittedImage) -> PlacedImage {
    PlacedImage {
        entry_id: entry.entry_id,
        filename: entry.filename.clone(),
        x: fitted.x,
        y: fitted.y,
        width: fitted.width,
        height: fitted.height,
        label_y: fitted.label_y,
    }
}

/// Standard grid over the full available area. Always a single unit — the
/// grid table grows to hold any count.
fn grid_unit(entries: &[EntryView], canvas: &Canvas) -> Vec<PlacedImage> {
    grid_into(
        entries.iter().collect::<Vec<_>>().as_slice(),
        canvas.margin_left,
        canvas.margin_top,
        canvas.available_width(),
        canvas.available_height(),
        canvas,
    )
}

/// Pack entries into a grid over an arbitrary rectangle. Shared by the full
/// canvas grid and per-region packing, which is what makes regions
/// independent and composable.
fn grid_into(
    entries: &[&EntryView],
    origin_x: f64,
    origin_y: f64,
    area_w: f64,
    area_h: f64,
    canvas: &Canvas,
) -> Vec<PlacedImage> {
    let (rows, cols) = plan_grid(entries.len());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let cell_w = area_w / cols as f64;
    let cell_h = area_h / rows as f64;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let row = idx / cols;
            let col = idx % cols;
            let fitted = place_in_cell(
                origin_x + col as f64 * cell_w,
                origin_y + row as f64 * cell_h,
                cell_w,
                cell_h,
                entry.aspect(),
                canvas.label_height,
                canvas.label_gap,
            );
            place(entry, fitted)
        })
        .collect()
}

/// Visual layout: one unit, each region packed independently. Degrades to
/// the grid when no region matches any entry (or there are no regions).
fn visual_units(entries: &[EntryView], regions: &[Region], canvas: &Canvas) -> Vec<Vec<PlacedImage>> {
    let avail_w = canvas.available_width();
    let avail_h = canvas.available_height();

    let mut images = Vec::new();
    for region in regions {
        let matching: Vec<&EntryView> = entries
            .iter()
            .filter(|e| e.identifier == Some(region.identifier))
            .collect();
        if matching.is_empty() {
            continue;
        }
        let origin_x = canvas.margin_left + region.x1 * avail_w;
        let origin_y = canvas.margin_top + region.y1 * avail_h;
        let region_w = (region.x2 - region.x1) * avail_w;
        let region_h = (region.y2 - region.y1) * avail_h;
        images.extend(grid_into(&matching, origin_x, origin_y, region_w, region_h, canvas));
    }

    if images.is_empty() {
        vec![grid_unit(entries, canvas)]
    } else {
        vec![images]
    }
}

/// Horizontal layout: full-width equal-height slices, at most 3 per unit.
/// Slice height is the available height over *this* unit's slice count, so a
/// short final batch gets taller slices.
fn horizontal_units(entries: &[EntryView], canvas: &Canvas) -> Vec<Vec<PlacedImage>> {
    let avail_w = canvas.available_width();
    let avail_h = canvas.available_height();

    entries
        .chunks(3)
        .map(|batch| {
            let slice_h = avail_h / batch.len() as f64;
            batch
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let y = canvas.margin_top + idx as f64 * slice_h;
                    let reserved = (slice_h - canvas.label_height - canvas.label_gap).max(0.0);
                    let (w, h) = fit_to_width(avail_w * 0.95, reserved, entry.aspect());
                    let x = canvas.margin_left + (avail_w - w) / 2.0;
                    PlacedImage {
                        entry_id: entry.entry_id,
                        filename: entry.filename.clone(),
                        x,
                        y,
                        width: w,
                        height: h,
                        label_y: y + h + canvas.label_gap,
                    }
                })
                .collect()
        })
        .collect()
}

/// Mixed layout: others stacked on the left third (≤2 per unit), spectra
/// stacked on the right two-thirds (≤3 per unit), advancing in lockstep.
fn mixed_units(
    spectra: &[&EntryView],
    others: &[&EntryView],
    canvas: &Canvas,
) -> Vec<Vec<PlacedImage>> {
    const SPECTRUM_BATCH: usize = 3;
    const OTHER_BATCH: usize = 2;

    let avail_w = canvas.available_width();
    let avail_h = canvas.available_height();
    let left_w = avail_w / 3.0;
    let right_w = avail_w * 2.0 / 3.0;
    let right_x = canvas.margin_left + left_w;

    let units = others
        .len()
        .div_ceil(OTHER_BATCH)
        .max(spectra.len().div_ceil(SPECTRUM_BATCH));

    (0..units)
        .map(|unit| {
            let mut images = Vec::new();

            let other_batch = bounded_batch(others, unit * OTHER_BATCH, OTHER_BATCH);
            if !other_batch.is_empty() {
                let slice_h = avail_h / other_batch.len() as f64;
                for (idx, entry) in other_batch.iter().enumerate() {
                    let y = canvas.margin_top + idx as f64 * slice_h;
                    let reserved = (slice_h - canvas.label_height - canvas.label_gap).max(0.0);
                    let (w, h) = fit_to_width(left_w * 0.9, reserved, entry.aspect());
                    let x = canvas.margin_left + (left_w - w) / 2.0;
                    images.push(PlacedImage {
                        entry_id: entry.entry_id,
                        filename: entry.filename.clone(),
                        x,
                        y,
                        width: w,
                        height: h,
                        label_y: y + h + canvas.label_gap,
                    });
                }
            }

            let spec_batch = bounded_batch(spectra, unit * SPECTRUM_BATCH, SPECTRUM_BATCH);
            if !spec_batch.is_empty() {
                let slice_h = avail_h / spec_batch.len() as f64;
                for (idx, entry) in spec_batch.iter().enumerate() {
                    let y = canvas.margin_top + idx as f64 * slice_h;
                    let reserved = (slice_h - canvas.label_height - canvas.label_gap).max(0.0);
                    let (w, h) = fit_to_width(right_w * 0.95, reserved, entry.aspect());
                    let x = right_x + (right_w - w) / 2.0;
                    images.push(PlacedImage {
                        entry_id: entry.entry_id,
                        filename: entry.filename.clone(),
                        x,
                        y,
                        width: w,
                        height: h,
                        label_y: y + h + canvas.label_gap,
                    });
                }
            }

            images
        })
        .collect()
}

/// Slice `[start, start + len)` clamped to the list bounds; empty past the end.
fn bounded_batch<'a>(list: &'a [&'a EntryView], start: usize, len: usize) -> &'a [&'a EntryView] {
    if start >= list.len() {
        &[]
    } else {
        &list[start..(start + len).min(list.len())]
    }
}

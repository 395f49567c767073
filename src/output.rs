//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric: the primary display for every entity is
//! its semantic identity — group label, identifier, slide position — with
//! filesystem detail as indented context. Each stage has a `format_*`
//! function returning `Vec<String>` (pure, testable) and a `print_*` wrapper
//! that writes to stdout.
//!
//! ```text
//! Group 0001 (3 images)
//!     UD     0001_2_UD.tif (1024x943)
//!     PDBSE1 0001_1_PDBSE1(COMP).tif (1024x943)
//! ```

use crate::catalogue::{Catalogue, ImageEntry, IndexReport};
use crate::classify::Classification;
use crate::plan::DeckPlan;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format one entry line: identifier column, filename, dimensions.
fn entry_line(entry: &ImageEntry) -> String {
    let identifier = entry
        .metadata
        .identifier
        .map(|id| id.canonical().to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}{:<14} {} ({}x{})",
        indent(1),
        identifier,
        entry.filename,
        entry.width,
        entry.height
    )
}

// ============================================================================
// Index
// ============================================================================

/// Format the outcome of an `index` run.
pub fn format_index_report(report: &IndexReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Indexed {} new image(s), {} already present",
        report.added.len(),
        report.already_indexed
    )];
    for (path, reason) in &report.skipped {
        lines.push(format!("{}skipped {}: {}", indent(1), path.display(), reason));
    }
    lines
}

pub fn print_index_report(report: &IndexReport) {
    for line in format_index_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// List
// ============================================================================

/// Format the grouped catalogue listing: one block per group in label order,
/// then ungrouped entries, then the stats footer.
pub fn format_list_output(catalogue: &Catalogue) -> Vec<String> {
    let mut lines = Vec::new();

    for (label, entries) in catalogue.groups() {
        lines.push(format!("Group {} ({} images)", label, entries.len()));
        for entry in entries {
            lines.push(entry_line(entry));
        }
    }

    let ungrouped = catalogue.ungrouped();
    if !ungrouped.is_empty() {
        lines.push(format!("Ungrouped ({} images)", ungrouped.len()));
        for entry in ungrouped {
            lines.push(entry_line(entry));
        }
    }

    let stats = catalogue.stats();
    let mb = stats.total_bytes as f64 / (1024.0 * 1024.0);
    lines.push(format!(
        "{} image(s), {:.2} MB",
        stats.total_images, mb
    ));
    lines
}

pub fn print_list_output(catalogue: &Catalogue) {
    for line in format_list_output(catalogue) {
        println!("{line}");
    }
}

// ============================================================================
// Classify (dry run)
// ============================================================================

/// Format classifier dry-run results, one line per filename.
pub fn format_classify_output(results: &[(String, Classification)]) -> Vec<String> {
    results
        .iter()
        .map(|(filename, c)| {
            format!(
                "{} -> group: {} | type: {} | match: {}",
                filename,
                c.group_number.as_deref().unwrap_or("-"),
                c.identifier
                    .map(|id| id.canonical())
                    .unwrap_or("-"),
                c.matched_text.as_deref().unwrap_or("-"),
            )
        })
        .collect()
}

pub fn print_classify_output(results: &[(String, Classification)]) {
    for line in format_classify_output(results) {
        println!("{line}");
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format the deck plan summary: one header per unit, one line per placement.
pub fn format_plan_output(plan: &DeckPlan) -> Vec<String> {
    let mut lines = Vec::new();
    for unit in &plan.units {
        let header = if unit.parts > 1 {
            format!(
                "Group {} (Part {}/{}) - {} images",
                unit.group_label,
                unit.part,
                unit.parts,
                unit.images.len()
            )
        } else {
            format!("Group {} - {} images", unit.group_label, unit.images.len())
        };
        lines.push(header);
        for img in &unit.images {
            lines.push(format!(
                "{}{} @ ({:.2}, {:.2}) {:.2}x{:.2}",
                indent(1),
                img.filename,
                img.x,
                img.y,
                img.width,
                img.height
            ));
        }
    }
    lines.push(format!(
        "Planned {} unit(s) across {} group(s)",
        plan.units.len(),
        plan.group_count()
    ));
    lines
}

pub fn print_plan_output(plan: &DeckPlan) {
    for line in format_plan_output(plan) {
        println!("{line}");
    }
}

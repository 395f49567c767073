//! # microdeck
//!
//! A slide-deck planner for electron-microscope image sets. Your filenames
//! are the data source: instrument exports carry a modality token (`UD`,
//! `PDBSE1`, `Spectrum`, `Map`, ...) and a group code in every name, and
//! microdeck turns a directory of them into an ordered, laid-out deck plan.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Microdeck processes images through independent stages, each producing a
//! JSON artifact the next stage consumes:
//!
//! ```text
//! 1. Index   images/          →  catalogue.json   (filenames → classified entries)
//! 2. Plan    catalogue.json   →  deck-plan.json   (groups → placed rectangles)
//! 3. Render  deck-plan.json   →  slides           (external backend)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each artifact is human-readable JSON you can inspect.
//! - **Correctable classification**: the heuristic classifier is wrong
//!   sometimes; edits live in the catalogue, and replanning is cheap.
//! - **Testability**: classification, sorting, and layout are pure functions
//!   over in-memory data, so unit tests never touch the filesystem or decode
//!   an image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`identifier`] | The closed modality taxonomy, categories, priorities, and group-label formatting |
//! | [`classify`] | Filename → (group number, identifier, matched text) via the ranked pattern table |
//! | [`sort`] | Canonical total order over catalogue entries |
//! | [`catalogue`] | The image index: entries, metadata edits, JSON round-trip, directory indexing |
//! | [`config`] | `deck.toml` canvas configuration with validation |
//! | [`layout`] | Geometry: grid planning, cell fitting, layout profiles, per-group composition |
//! | [`plan`] | Whole-catalogue deck planning and the output manifest |
//! | [`output`] | CLI output formatting — pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## Classification Is Heuristic, Metadata Is Authoritative
//!
//! Filenames are classified exactly once, when an entry enters the
//! catalogue. Afterwards the stored `identifier`/`group_number` metadata is
//! the truth — users correct misclassifications there, and only an explicit
//! `reindex` re-runs the heuristic. Planning never re-parses a filename.
//!
//! ## The Taxonomy Is a Closed Enum
//!
//! Identifiers form a fixed vocabulary, so [`identifier::Identifier`] is an
//! enum, not strings: match order, sort priority, and label formatting are
//! total functions checked at compile time, and an invalid identifier in an
//! edit or a layout profile fails at the parse boundary instead of deep in
//! layout code.
//!
//! ## Layout Without Pixels
//!
//! The planner never decodes an image. Pixel dimensions come from
//! header-level identification at index time (`image::image_dimensions`) and
//! travel with the entry; every layout computation is closed-form arithmetic
//! over those numbers. A deck over gigabytes of TIFFs plans in milliseconds,
//! and composition parallelizes per group with rayon because each group's
//! layout is a pure function of its own entries.
//!
//! ## Plans, Not Slides
//!
//! The output is placement instructions — `(entry, x, y, width, height,
//! label slot)` per unit in canvas units — not a rendered document. Any
//! backend (PowerPoint writer, HTML gallery, on-screen preview) can consume
//! `deck-plan.json` without this crate growing a rendering dependency.

pub mod catalogue;
pub mod classify;
pub mod config;
pub mod identifier;
pub mod layout;
pub mod output;
pub mod plan;
pub mod sort;

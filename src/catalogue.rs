//! The image catalogue: every indexed image and its classification metadata.
//!
//! The catalogue is the one mutable store in the pipeline. Entries are
//! appended by indexing files, classified once on the way in, and afterwards
//! only two metadata fields ever change: the group number and the identifier
//! (user corrections). Everything downstream — sorting, grouping, deck
//! planning — reads the catalogue and owns nothing.
//!
//! The store round-trips through a JSON file the same way the pipeline's
//! other artifacts do: human-readable, diffable, no custom format. Content
//! hashing is deliberately absent; duplicate detection is by filepath only.
//!
//! ## Dimensions without decoding
//!
//! Pixel dimensions come from `image::image_dimensions`, which parses headers
//! only — indexing a directory of multi-hundred-MB TIFFs never decodes a
//! pixel.

use crate::classify;
use crate::identifier::{Identifier, format_group_label};
use crate::layout::EntryView;
use crate::sort::{SortKey, sort_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalogue JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("cannot read dimensions of {path}: {source}")]
    Dimensions {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("no catalogue entry with id {0}")]
    UnknownId(u64),
}

/// File extensions the instruments export. Everything else is skipped.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

/// Classification metadata on an entry, plus free-form user fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    /// The filename substring the classifier matched on — kept for display
    /// and debugging, never re-parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_match: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// One indexed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: u64,
    pub filename: String,
    pub filepath: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    #[serde(default)]
    pub metadata: EntryMetadata,
}

impl ImageEntry {
    /// Display label of the group this entry belongs to; empty when ungrouped.
    pub fn group_label(&self) -> String {
        format_group_label(
            self.metadata.group_number.as_deref(),
            self.metadata.identifier,
        )
    }

    pub fn sort_key(&self) -> SortKey {
        sort_key(
            self.metadata.identifier,
            self.metadata.group_number.as_deref(),
            &self.filename,
        )
    }

    /// The slice of this entry the layout engine consumes.
    pub fn view(&self) -> EntryView {
        EntryView {
            entry_id: self.id,
            filename: self.filename.clone(),
            width: self.width,
            height: self.height,
            identifier: self.metadata.identifier,
        }
    }
}

/// Outcome of indexing a directory: what got added, what was skipped and why.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub added: Vec<u64>,
    pub already_indexed: usize,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Aggregate numbers for the listing footer.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogueStats {
    pub total_images: usize,
    pub total_bytes: u64,
    pub by_extension: BTreeMap<String, usize>,
}

/// The entry store. Construct empty, or [`load`](Catalogue::load) from a
/// previously saved JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalogue {
    entries: Vec<ImageEntry>,
    next_id: u64,
}

impl Catalogue {
    /// Load from disk; a missing file is an empty catalogue.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogueError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Add an entry from already-known facts (no filesystem access). The
    /// filename is classified on the way in. Returns the id — the existing
    /// one when the filepath is already indexed.
    pub fn add(
        &mut self,
        filepath: PathBuf,
        width: u32,
        height: u32,
        size_bytes: u64,
    ) -> u64 {
        if let Some(existing) = self.entries.iter().find(|e| e.filepath == filepath) {
            return existing.id;
        }

        let filename = filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let c = classify::extract(&filename);

        self.next_id += 1;
        let entry = ImageEntry {
            id: self.next_id,
            filename,
            filepath,
            width,
            height,
            size_bytes,
            metadata: EntryMetadata {
                identifier: c.identifier,
                group_number: c.group_number,
                identifier_match: c.matched_text,
                extra: BTreeMap::new(),
            },
        };
        self.entries.push(entry);
        self.next_id
    }

    /// Index a single image file: verify the extension, read header-level
    /// dimensions and byte size, classify, append.
    pub fn add_file(&mut self, path: &Path) -> Result<u64, CatalogueError> {
        if !is_supported(path) {
            return Err(CatalogueError::UnsupportedFormat(path.to_path_buf()));
        }
        let (width, height) =
            image::image_dimensions(path).map_err(|source| CatalogueError::Dimensions {
                path: path.to_path_buf(),
                source,
            })?;
        let size_bytes = fs::metadata(path)?.len();
        Ok(self.add(path.to_path_buf(), width, height, size_bytes))
    }

    /// Walk a directory and index every supported image, skipping (and
    /// reporting) files that cannot be read. Walk order is sorted by file
    /// name so ids are deterministic.
    pub fn index_dir(&mut self, dir: &Path) -> IndexReport {
        let mut report = IndexReport::default();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if !is_supported(path) {
                continue;
            }
            let before = self.len();
            match self.add_file(path) {
                Ok(id) if self.len() > before => report.added.push(id),
                Ok(_) => report.already_indexed += 1,
                Err(err) => report.skipped.push((path.to_path_buf(), err.to_string())),
            }
        }
        report
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Re-run the classifier over every entry (after a taxonomy or heuristic
    /// change). Returns how many entries changed.
    pub fn reclassify_all(&mut self) -> usize {
        let mut changed = 0;
        for entry in &mut self.entries {
            let c = classify::extract(&entry.filename);
            if entry.metadata.identifier != c.identifier
                || entry.metadata.group_number != c.group_number
            {
                changed += 1;
            }
            entry.metadata.identifier = c.identifier;
            entry.metadata.group_number = c.group_number;
            entry.metadata.identifier_match = c.matched_text;
        }
        changed
    }

    /// Reassign an entry's group number (`None` ungroups it).
    pub fn set_group(&mut self, id: u64, group: Option<String>) -> Result<(), CatalogueError> {
        let entry = self.get_mut(id)?;
        entry.metadata.group_number = group.filter(|g| !g.is_empty());
        Ok(())
    }

    /// Reassign an entry's identifier. The [`Identifier`] type is the
    /// validation: unknown names fail at parse time, before this call.
    pub fn set_identifier(
        &mut self,
        id: u64,
        identifier: Option<Identifier>,
    ) -> Result<(), CatalogueError> {
        let entry = self.get_mut(id)?;
        entry.metadata.identifier = identifier;
        Ok(())
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut ImageEntry, CatalogueError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CatalogueError::UnknownId(id))
    }

    /// Case-insensitive substring search over filenames and metadata values.
    pub fn search(&self, query: &str) -> Vec<&ImageEntry> {
        let q = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.filename.to_lowercase().contains(&q)
                    || e.group_label().to_lowercase().contains(&q)
                    || e.metadata
                        .identifier
                        .is_some_and(|id| id.canonical().to_lowercase().contains(&q))
                    || e.metadata
                        .extra
                        .values()
                        .any(|v| v.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// All entries in canonical sort order.
    pub fn sorted_entries(&self) -> Vec<&ImageEntry> {
        let mut sorted: Vec<&ImageEntry> = self.entries.iter().collect();
        sorted.sort_by_cached_key(|e| e.sort_key());
        sorted
    }

    /// Grouped view: label → entries in sort order. Ungrouped entries (empty
    /// label) are left out — they have no slide to appear on.
    pub fn groups(&self) -> BTreeMap<String, Vec<&ImageEntry>> {
        let mut groups: BTreeMap<String, Vec<&ImageEntry>> = BTreeMap::new();
        for entry in self.sorted_entries() {
            let label = entry.group_label();
            if label.is_empty() {
                continue;
            }
            groups.entry(label).or_default().push(entry);
        }
        groups
    }

    /// Entries that classify to no group at all.
    pub fn ungrouped(&self) -> Vec<&ImageEntry> {
        self.sorted_entries()
            .into_iter()
            .filter(|e| e.group_label().is_empty())
            .collect()
    }

    pub fn stats(&self) -> CatalogueStats {
        let mut by_extension: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &self.entries {
            let ext = entry
                .filepath
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "none".to_string());
            *by_extension.entry(ext).or_default() += 1;
        }
        CatalogueStats {
            total_images: self.entries.len(),
            total_bytes: self.entries.iter().map(|e| e.size_bytes).sum(),
            by_extension,
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier::*;

    fn add(cat: &mut Catalogue, name: &str) -> u64 {
        cat.add(PathBuf::from(format!("/images/{name}")), 1024, 768, 2048)
    }

    // =========================================================================
    // Adding and classification on entry
    // =========================================================================

    #[test]
    fn add_classifies_the_filename() {
        let mut cat = Catalogue::default();
        let id = add(&mut cat, "0001 PDBSE.tif");
        let entry = cat.get(id).unwrap();
        assert_eq!(entry.metadata.identifier, Some(Pdbse));
        assert_eq!(entry.metadata.group_number.as_deref(), Some("0001"));
        assert_eq!(entry.metadata.identifier_match.as_deref(), Some("0001 PDBSE"));
        assert_eq!(entry.group_label(), "0001");
    }

    #[test]
    fn add_same_filepath_returns_existing_id() {
        let mut cat = Catalogue::default();
        let first = add(&mut cat, "Spectrum 1.tiff");
        let second = add(&mut cat, "Spectrum 1.tiff");
        assert_eq!(first, second);
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut cat = Catalogue::default();
        let a = add(&mut cat, "0001 UD.tif");
        assert!(cat.remove(a));
        let b = add(&mut cat, "0002 UD.tif");
        assert_ne!(a, b);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let mut cat = Catalogue::default();
        let err = cat.add_file(Path::new("/images/readme.txt")).unwrap_err();
        assert!(matches!(err, CatalogueError::UnsupportedFormat(_)));
    }

    // =========================================================================
    // Metadata edits
    // =========================================================================

    #[test]
    fn set_group_reassigns_and_ungroups() {
        let mut cat = Catalogue::default();
        let id = add(&mut cat, "0001 UD.tif");

        cat.set_group(id, Some("0042".to_string())).unwrap();
        assert_eq!(cat.get(id).unwrap().group_label(), "0042");

        cat.set_group(id, Some("Batch-A".to_string())).unwrap();
        assert_eq!(cat.get(id).unwrap().group_label(), "Batch-A");

        cat.set_group(id, None).unwrap();
        assert_eq!(cat.get(id).unwrap().group_label(), "");
    }

    #[test]
    fn set_identifier_changes_label_family() {
        let mut cat = Catalogue::default();
        let id = add(&mut cat, "0001 UD.tif");
        cat.set_identifier(id, Some(Spectrum)).unwrap();
        assert_eq!(cat.get(id).unwrap().group_label(), "SPEC1");
    }

    #[test]
    fn edits_on_unknown_id_error() {
        let mut cat = Catalogue::default();
        assert!(matches!(
            cat.set_group(7, None),
            Err(CatalogueError::UnknownId(7))
        ));
    }

    #[test]
    fn reclassify_reports_changes() {
        let mut cat = Catalogue::default();
        let id = add(&mut cat, "0001 UD.tif");
        cat.set_group(id, Some("Batch-A".to_string())).unwrap();

        // First pass restores the classifier's view; second is a no-op.
        assert_eq!(cat.reclassify_all(), 1);
        assert_eq!(cat.get(id).unwrap().group_label(), "0001");
        assert_eq!(cat.reclassify_all(), 0);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[test]
    fn groups_cluster_by_formatted_label() {
        let mut cat = Catalogue::default();
        add(&mut cat, "0001 UD.tif");
        add(&mut cat, "0001 PDBSE.tif");
        add(&mut cat, "0002 UD.tif");
        add(&mut cat, "Spectrum 1.tiff");
        add(&mut cat, "unclassified.png");

        let groups = cat.groups();
        let labels: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(labels, ["0001", "0002", "SPEC1"]);
        assert_eq!(groups["0001"].len(), 2);
        // UD outranks PDBSE within the group.
        assert_eq!(groups["0001"][0].filename, "0001 UD.tif");

        assert_eq!(cat.ungrouped().len(), 1);
    }

    #[test]
    fn sorted_entries_follow_the_policy() {
        let mut cat = Catalogue::default();
        add(&mut cat, "Spectrum 2.tiff");
        add(&mut cat, "unclassified.png");
        add(&mut cat, "Co K_alpha_1 Map Data 1.tif");
        add(&mut cat, "0001 UD.tif");

        let names: Vec<&str> = cat
            .sorted_entries()
            .iter()
            .map(|e| e.filename.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "0001 UD.tif",
                "Co K_alpha_1 Map Data 1.tif",
                "Spectrum 2.tiff",
                "unclassified.png",
            ]
        );
    }

    #[test]
    fn search_matches_filename_label_and_identifier() {
        let mut cat = Catalogue::default();
        add(&mut cat, "0001 PDBSE.tif");
        add(&mut cat, "Spectrum 4.tiff");

        assert_eq!(cat.search("pdbse").len(), 1);
        assert_eq!(cat.search("spec4").len(), 1); // group label SPEC4
        assert_eq!(cat.search("TIFF").len(), 1);
        assert_eq!(cat.search("nothing").len(), 0);
    }

    #[test]
    fn stats_aggregate_counts_and_bytes() {
        let mut cat = Catalogue::default();
        add(&mut cat, "0001 UD.tif");
        add(&mut cat, "Spectrum 1.tiff");
        let stats = cat.stats();
        assert_eq!(stats.total_images, 2);
        assert_eq!(stats.total_bytes, 4096);
        assert_eq!(stats.by_extension["tif"], 1);
        assert_eq!(stats.by_extension["tiff"], 1);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[test]
    fn catalogue_round_trips_through_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalogue.json");

        let mut cat = Catalogue::default();
        let id = add(&mut cat, "0001 PDBSE.tif");
        cat.set_group(id, Some("Batch-A".to_string())).unwrap();
        cat.save(&path).unwrap();

        let loaded = Catalogue::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let entry = loaded.get(id).unwrap();
        assert_eq!(entry.metadata.group_number.as_deref(), Some("Batch-A"));
        assert_eq!(entry.metadata.identifier, Some(Pdbse));

        // New ids keep counting from where the saved catalogue left off.
        let mut loaded = loaded;
        let next = add(&mut loaded, "0002 UD.tif");
        assert!(next > id);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let cat = Catalogue::load(&dir.path().join("catalogue.json")).unwrap();
        assert!(cat.is_empty());
    }
}

// JSON chord tables.
//
// Enumerating and classifying every chord of a wide range takes a while,
// so a classified range can be written to disk once as a `ChordTable` and
// reloaded later. Tables are named after their range
// (`chords_min48_max72.json`) inside a cache directory. A table also
// records the span limit and chord sizes it was built with, so a reader can
// tell whether it still answers the current configuration.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tonsatz_theory::{ClassificationResult, GroupNumber, Pitch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordTable {
    pub min_note: Pitch,
    pub max_note: Pitch,
    pub max_octaves: u32,
    /// Sorted, deduplicated chord sizes. Tables written before sizes were
    /// recorded load with an empty list and never match.
    #[serde(default)]
    pub chord_sizes: Vec<usize>,
    pub chords: Vec<ClassificationResult>,
}

impl ChordTable {
    pub fn new(
        min_note: Pitch,
        max_note: Pitch,
        max_octaves: u32,
        chord_sizes: &[usize],
        chords: Vec<ClassificationResult>,
    ) -> Self {
        ChordTable {
            min_note,
            max_note,
            max_octaves,
            chord_sizes: normalize_sizes(chord_sizes),
            chords,
        }
    }

    /// Whether this table was built for exactly this range, span limit and
    /// set of chord sizes (in any order).
    pub fn covers(
        &self,
        min_note: Pitch,
        max_note: Pitch,
        max_octaves: u32,
        chord_sizes: &[usize],
    ) -> bool {
        self.min_note == min_note
            && self.max_note == max_note
            && self.max_octaves == max_octaves
            && self.chord_sizes == normalize_sizes(chord_sizes)
    }

    /// File name used for a range inside a cache directory.
    pub fn file_name(min_note: Pitch, max_note: Pitch) -> String {
        format!("chords_min{min_note}_max{max_note}.json")
    }

    pub fn default_path(cache_dir: &Path, min_note: Pitch, max_note: Pitch) -> PathBuf {
        cache_dir.join(Self::file_name(min_note, max_note))
    }

    /// Write the table as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("wrote {} chords to {}", self.chords.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let table: ChordTable = serde_json::from_str(&json)?;
        log::info!("loaded {} chords from {}", table.chords.len(), path.display());
        Ok(table)
    }

    /// Load the table at `path` if it exists.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, StoreError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Number of chords per group.
    pub fn group_counts(&self) -> BTreeMap<GroupNumber, usize> {
        let mut counts = BTreeMap::new();
        for chord in &self.chords {
            *counts.entry(chord.group).or_insert(0) += 1;
        }
        counts
    }
}

fn normalize_sizes(sizes: &[usize]) -> Vec<usize> {
    let mut sizes = sizes.to_vec();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

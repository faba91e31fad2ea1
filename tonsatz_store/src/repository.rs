// The chord repository port.
//
// A repository stores `ClassificationResult`s under sequential ids and
// answers queries by root note, group and chord size. Both adapters return
// results in ascending id order, i.e. insertion order.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tonsatz_theory::{ClassificationResult, GroupNumber, Pitch};

/// Identifier assigned by a repository on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChordId(pub i64);

impl fmt::Display for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChord {
    pub id: ChordId,
    pub chord: ClassificationResult,
}

impl StoredChord {
    pub fn num_notes(&self) -> usize {
        self.chord.notes.len()
    }

    pub fn min_note(&self) -> Option<Pitch> {
        self.chord.notes.iter().min().copied()
    }

    pub fn max_note(&self) -> Option<Pitch> {
        self.chord.notes.iter().max().copied()
    }
}

/// Filter for `ChordRepository::find`. Empty lists and `None` match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordQuery {
    pub root_note: Option<Pitch>,
    pub groups: Vec<GroupNumber>,
    pub sizes: Vec<usize>,
    /// Upper bound on the group number (inclusive).
    pub max_group: Option<GroupNumber>,
}

impl ChordQuery {
    pub fn root(root_note: Pitch) -> Self {
        ChordQuery {
            root_note: Some(root_note),
            ..Default::default()
        }
    }

    pub fn group(group: GroupNumber) -> Self {
        ChordQuery {
            groups: vec![group],
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups: &[GroupNumber]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    pub fn with_sizes(mut self, sizes: &[usize]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    pub fn with_max_group(mut self, max_group: GroupNumber) -> Self {
        self.max_group = Some(max_group);
        self
    }

    pub fn matches(&self, chord: &ClassificationResult) -> bool {
        self.root_note.is_none_or(|r| r == chord.root_note)
            && (self.groups.is_empty() || self.groups.contains(&chord.group))
            && (self.sizes.is_empty() || self.sizes.contains(&chord.notes.len()))
            && self.max_group.is_none_or(|g| chord.group <= g)
    }
}

/// Storage for classified chords.
pub trait ChordRepository {
    fn save(&mut self, chord: &ClassificationResult) -> Result<ChordId, StoreError>;

    fn save_all(&mut self, chords: &[ClassificationResult]) -> Result<Vec<ChordId>, StoreError> {
        chords.iter().map(|c| self.save(c)).collect()
    }

    fn find_by_id(&self, id: ChordId) -> Result<Option<StoredChord>, StoreError>;

    fn find_all(&self) -> Result<Vec<StoredChord>, StoreError>;

    /// Returns whether a chord was removed.
    fn delete_by_id(&mut self, id: ChordId) -> Result<bool, StoreError>;

    /// Remove every chord.
    fn truncate(&mut self) -> Result<(), StoreError>;

    fn find(&self, query: &ChordQuery) -> Result<Vec<StoredChord>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;

    fn find_by_group(&self, group: GroupNumber) -> Result<Vec<StoredChord>, StoreError> {
        self.find(&ChordQuery::group(group))
    }

    fn find_by_root(&self, root_note: Pitch) -> Result<Vec<StoredChord>, StoreError> {
        self.find(&ChordQuery::root(root_note))
    }

    fn find_by_root_and_groups_and_sizes(
        &self,
        root_note: Pitch,
        groups: &[GroupNumber],
        sizes: &[usize],
    ) -> Result<Vec<StoredChord>, StoreError> {
        self.find(
            &ChordQuery::root(root_note)
                .with_groups(groups)
                .with_sizes(sizes),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonsatz_theory::ChordAnalysis;

    #[test]
    fn test_query_matching() {
        let chord = ChordAnalysis::default().analyze(&[60, 65, 69]).unwrap();
        // F major over C: root 65, group 2.
        assert!(ChordQuery::default().matches(&chord));
        assert!(ChordQuery::root(65).matches(&chord));
        assert!(!ChordQuery::root(60).matches(&chord));
        assert!(ChordQuery::root(65).with_groups(&[1, 2]).matches(&chord));
        assert!(!ChordQuery::root(65).with_sizes(&[4]).matches(&chord));
        assert!(ChordQuery::default().with_max_group(2).matches(&chord));
        assert!(!ChordQuery::default().with_max_group(1).matches(&chord));
    }

    #[test]
    fn test_stored_chord_extents() {
        let chord = ChordAnalysis::default().analyze(&[64, 60, 67]).unwrap();
        let stored = StoredChord {
            id: ChordId(1),
            chord,
        };
        assert_eq!(stored.num_notes(), 3);
        assert_eq!(stored.min_note(), Some(60));
        assert_eq!(stored.max_note(), Some(67));
    }
}

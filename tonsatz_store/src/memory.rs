// In-memory chord repository.
//
// Rows live in a `BTreeMap` keyed by id; a secondary index maps
// (root note, group, size) to ids so root-note queries (the common case
// when picking chords to play) scan one index range instead of every row.
// Used in tests and for one-off CLI runs that do not need a database.

use crate::StoreError;
use crate::repository::{ChordId, ChordQuery, ChordRepository, StoredChord};
use std::collections::{BTreeMap, BTreeSet};
use tonsatz_theory::{ClassificationResult, GroupNumber, Pitch};

type IndexKey = (Pitch, GroupNumber, usize);

#[derive(Debug, Clone, Default)]
pub struct MemoryChordRepository {
    rows: BTreeMap<ChordId, ClassificationResult>,
    by_root_group_size: BTreeMap<IndexKey, BTreeSet<ChordId>>,
    next_id: i64,
}

fn index_key(chord: &ClassificationResult) -> IndexKey {
    (chord.root_note, chord.group, chord.notes.len())
}

impl MemoryChordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn stored(&self, id: ChordId) -> Option<StoredChord> {
        self.rows.get(&id).map(|chord| StoredChord {
            id,
            chord: chord.clone(),
        })
    }
}

impl ChordRepository for MemoryChordRepository {
    fn save(&mut self, chord: &ClassificationResult) -> Result<ChordId, StoreError> {
        self.next_id += 1;
        let id = ChordId(self.next_id);
        self.by_root_group_size
            .entry(index_key(chord))
            .or_default()
            .insert(id);
        self.rows.insert(id, chord.clone());
        Ok(id)
    }

    fn find_by_id(&self, id: ChordId) -> Result<Option<StoredChord>, StoreError> {
        Ok(self.stored(id))
    }

    fn find_all(&self) -> Result<Vec<StoredChord>, StoreError> {
        Ok(self
            .rows
            .iter()
            .map(|(&id, chord)| StoredChord {
                id,
                chord: chord.clone(),
            })
            .collect())
    }

    fn delete_by_id(&mut self, id: ChordId) -> Result<bool, StoreError> {
        let Some(chord) = self.rows.remove(&id) else {
            return Ok(false);
        };
        let key = index_key(&chord);
        if let Some(ids) = self.by_root_group_size.get_mut(&key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_root_group_size.remove(&key);
            }
        }
        Ok(true)
    }

    fn truncate(&mut self) -> Result<(), StoreError> {
        self.rows.clear();
        self.by_root_group_size.clear();
        Ok(())
    }

    fn find(&self, query: &ChordQuery) -> Result<Vec<StoredChord>, StoreError> {
        let Some(root) = query.root_note else {
            return Ok(self
                .rows
                .iter()
                .filter(|(_, chord)| query.matches(chord))
                .map(|(&id, chord)| StoredChord {
                    id,
                    chord: chord.clone(),
                })
                .collect());
        };

        let range = (root, GroupNumber::MIN, usize::MIN)..=(root, GroupNumber::MAX, usize::MAX);
        let mut ids: Vec<ChordId> = self
            .by_root_group_size
            .range(range)
            .filter(|((_, group, size), _)| {
                (query.groups.is_empty() || query.groups.contains(group))
                    && (query.sizes.is_empty() || query.sizes.contains(size))
                    && query.max_group.is_none_or(|g| *group <= g)
            })
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        ids.sort_unstable();
        Ok(ids.into_iter().filter_map(|id| self.stored(id)).collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.rows.len())
    }
}

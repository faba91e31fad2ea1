// Chord classification.
//
// `ChordAnalysis` owns a shared `SpecificationTable` and classifies note
// lists: sort, compute frame interval and column, resolve the root, then
// walk the table in precedence order and stop at the first specification
// that accepts the chord with the lowest note as bass.
//
// The analyzer is immutable and `Send + Sync`; the batch pipeline shares
// one instance across rayon workers.

use crate::chord::{Chord, Column};
use crate::rules;
use crate::table::SpecificationTable;
use crate::{ChordError, GroupNumber, Pitch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fewest notes that count as a chord.
pub const MIN_CHORD_NOTES: usize = 3;

/// Outcome of classifying one chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Notes in ascending order.
    pub notes: Vec<Pitch>,
    pub column: Column,
    pub root_note: Pitch,
    pub group: GroupNumber,
    pub frame_interval: i32,
}

impl ClassificationResult {
    pub fn bass(&self) -> Pitch {
        self.notes.first().copied().unwrap_or(self.root_note)
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}  column {}  group {:>2}  root {}  frame {}",
            self.notes, self.column, self.group, self.root_note, self.frame_interval
        )
    }
}

#[derive(Debug, Clone)]
pub struct ChordAnalysis {
    table: Arc<SpecificationTable>,
}

impl Default for ChordAnalysis {
    fn default() -> Self {
        ChordAnalysis::new(SpecificationTable::shared())
    }
}

impl ChordAnalysis {
    pub fn new(table: Arc<SpecificationTable>) -> Self {
        ChordAnalysis { table }
    }

    pub fn table(&self) -> &SpecificationTable {
        &self.table
    }

    /// Classify a chord given in any note order.
    pub fn analyze(&self, notes: &[Pitch]) -> Result<ClassificationResult, ChordError> {
        if notes.len() < MIN_CHORD_NOTES {
            return Err(ChordError::TooFewNotes {
                found: notes.len(),
                required: MIN_CHORD_NOTES,
            });
        }
        let mut sorted = notes.to_vec();
        sorted.sort_unstable();
        let chord = Chord::new(sorted);
        self.analyze_chord(&chord)
    }

    /// Classify an already-sorted chord.
    pub fn analyze_chord(&self, chord: &Chord) -> Result<ClassificationResult, ChordError> {
        let Some(bass) = chord.bass() else {
            return Err(ChordError::TooFewNotes {
                found: 0,
                required: MIN_CHORD_NOTES,
            });
        };
        let root = chord.root()?;
        let column = chord.column();

        let group = self
            .table
            .precedence()
            .find(|(_, spec)| rules::matches(chord, root, bass, spec))
            .map(|(group, _)| group)
            .ok_or_else(|| ChordError::Unclassifiable {
                notes: chord.notes().to_vec(),
            })?;

        log::trace!("{:?}: column {column}, root {root}, group {group}", chord.notes());
        Ok(ClassificationResult {
            notes: chord.notes().to_vec(),
            column,
            root_note: root,
            group,
            frame_interval: chord.frame_interval(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ChordSpecification;

    #[test]
    fn test_major_triad() {
        let result = ChordAnalysis::default().analyze(&[67, 60, 64]).unwrap();
        assert_eq!(result.notes, vec![60, 64, 67]);
        assert_eq!(result.column, Column::TritoneFree);
        assert_eq!(result.root_note, 60);
        assert_eq!(result.group, 1);
        assert_eq!(result.frame_interval, 7);
    }

    #[test]
    fn test_too_few_notes() {
        let err = ChordAnalysis::default().analyze(&[60, 64]).unwrap_err();
        assert_eq!(
            err,
            ChordError::TooFewNotes {
                found: 2,
                required: 3
            }
        );
        let analysis = ChordAnalysis::default();
        assert!(matches!(
            analysis.analyze(&[60]),
            Err(ChordError::TooFewNotes { found: 1, .. })
        ));
        assert!(matches!(
            analysis.analyze(&[]),
            Err(ChordError::TooFewNotes { found: 0, .. })
        ));
    }

    #[test]
    fn test_root_unresolvable() {
        let err = ChordAnalysis::default().analyze(&[48, 60, 72]).unwrap_err();
        assert!(matches!(err, ChordError::RootUnresolvable { .. }));
    }

    #[test]
    fn test_unclassifiable_with_narrow_table() {
        let table = SpecificationTable::new([(
            1,
            ChordSpecification::new("only fifths").require(&[7]),
        )])
        .unwrap();
        let analysis = ChordAnalysis::new(Arc::new(table));
        assert_eq!(analysis.analyze(&[60, 64, 67]).unwrap().group, 1);
        assert!(matches!(
            analysis.analyze(&[60, 63, 66]),
            Err(ChordError::Unclassifiable { .. })
        ));
    }

    #[test]
    fn test_precedence_beats_group_order() {
        // C E F# A# also satisfies group 4, but the multiple-tritone
        // group 6 is tried first.
        let result = ChordAnalysis::default().analyze(&[60, 64, 66, 70]).unwrap();
        assert_eq!(result.group, 6);
        assert_eq!(result.root_note, 60);
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChordAnalysis>();
    }

    #[test]
    fn test_display() {
        let result = ChordAnalysis::default().analyze(&[60, 64, 67]).unwrap();
        assert_eq!(
            result.to_string(),
            "[60, 64, 67]  column A  group  1  root 60  frame 7"
        );
    }
}

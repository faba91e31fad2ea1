// Errors raised by chord analysis and rule-table loading.
//
// Generation never errors: degenerate enumeration inputs just produce no
// chords. Analysis distinguishes malformed input (too few notes), chords
// whose intervals are all unisons/octaves, and chords that no group
// specification accepts.

use crate::{GroupNumber, Pitch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordError {
    #[error("a chord needs at least {required} notes, got {found}")]
    TooFewNotes { found: usize, required: usize },

    #[error("no root note: every interval of {notes:?} is a unison or octave")]
    RootUnresolvable { notes: Vec<Pitch> },

    #[error("chord {notes:?} matches no group specification")]
    Unclassifiable { notes: Vec<Pitch> },

    #[error("unknown chord group {0}")]
    UnknownGroup(GroupNumber),

    #[error("invalid specification table: {0}")]
    InvalidTable(String),
}

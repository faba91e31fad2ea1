// Tonsatz chord theory engine
//
// Analyzes and enumerates chords according to Paul Hindemith's harmonic
// theory ("Unterweisung im Tonsatz"). Every chord (a set of MIDI pitches)
// receives a consonance column (tritone-free or tritone-bearing), a unique
// root note, and a group number from Hindemith's chord table.
//
// Architecture:
// - interval.rs: Interval and HindemithInterval (octave-reduced distance,
//   consonance rank, root-candidate side), lookup tables keyed by distance
// - combinator.rs: lexicographic k-note enumeration with distinct pitch
//   classes, span filter, scale-restricted enumeration
// - chord.rs: Chord (frame interval, all/root/pitch-class intervals, column)
// - root.rs: root-note resolution (best interval, lowest-root tie-break)
// - spec.rs: IntervalSet bitsets and the declarative ChordSpecification
// - table.rs: SpecificationTable, the ordered 16-group rule table
// - rules.rs: evaluation of one specification against one chord
// - analysis.rs: ChordAnalysis, the priority-ordered group classifier
// - scale.rs: scale-membership predicate and the named scale catalog
// - finder.rs: specification-directed search for all chords of a given group
// - error.rs: ChordError
//
// Everything here is pure and deterministic. The rule table is built once
// and shared behind an `Arc`, so analyzers can be used from many threads.

pub mod analysis;
pub mod chord;
pub mod combinator;
pub mod error;
pub mod finder;
pub mod interval;
pub mod root;
pub mod rules;
pub mod scale;
pub mod spec;
pub mod table;

pub use analysis::{ChordAnalysis, ClassificationResult};
pub use chord::{Chord, Column};
pub use error::ChordError;
pub use interval::{HindemithInterval, Interval};
pub use spec::{ChordSpecification, IntervalSet};
pub use table::SpecificationTable;

/// A MIDI note number. The engine accepts any integer; range limits are
/// enforced where notes leave the process (MIDI output).
pub type Pitch = i32;

/// A chord group number from the rule table (1-based).
pub type GroupNumber = u8;

/// Pitch class (0-11) of a note, correct for negative notes too.
pub fn pitch_class(note: Pitch) -> u8 {
    note.rem_euclid(12) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class() {
        assert_eq!(pitch_class(60), 0);
        assert_eq!(pitch_class(71), 11);
        assert_eq!(pitch_class(-1), 11);
    }
}

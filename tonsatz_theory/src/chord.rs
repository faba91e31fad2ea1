// Chord structure: notes plus every interval the rules look at.
//
// A `Chord` derives, once at construction:
// - the frame interval (highest minus lowest note),
// - `all_intervals`: every pair (i, j) with i < j, in index order, which
//   means the intervals above the bass come first,
// - the root intervals: the first n-1 entries of `all_intervals`, i.e. the
//   bass against each upper note,
// - `pitch_class_intervals`: pairs over the distinct pitch classes present,
//   which is what tritone counting and the column use.
//
// Construction is total; callers are expected to pass notes in ascending
// order (`ChordAnalysis::analyze` sorts before building a chord).
//
// See also: `root.rs` for root resolution, `rules.rs` for the predicates
// evaluated against these intervals.

use crate::interval::{HindemithInterval, TRITONE};
use crate::root::resolve_root;
use crate::{ChordError, Pitch, pitch_class};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Hindemith's two chord columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// Column A: no tritone between any two pitch classes.
    TritoneFree,
    /// Column B: at least one tritone.
    WithTritone,
}

impl Column {
    /// The letter Hindemith uses for the column.
    pub fn letter(self) -> char {
        match self {
            Column::TritoneFree => 'A',
            Column::WithTritone => 'B',
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    notes: Vec<Pitch>,
    all_intervals: Vec<HindemithInterval>,
    pitch_class_intervals: Vec<HindemithInterval>,
}

impl Chord {
    pub fn new(notes: Vec<Pitch>) -> Self {
        let all_intervals = pairwise(&notes);
        let pitch_classes: Vec<Pitch> = notes
            .iter()
            .map(|&n| pitch_class(n) as Pitch)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let pitch_class_intervals = pairwise(&pitch_classes);
        Chord {
            notes,
            all_intervals,
            pitch_class_intervals,
        }
    }

    pub fn notes(&self) -> &[Pitch] {
        &self.notes
    }

    /// Lowest-positioned note, i.e. the first one.
    pub fn bass(&self) -> Option<Pitch> {
        self.notes.first().copied()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Distance between the outer notes; 0 for chords with fewer than two
    /// notes.
    pub fn frame_interval(&self) -> i32 {
        match (self.notes.iter().min(), self.notes.iter().max()) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0,
        }
    }

    pub fn all_intervals(&self) -> &[HindemithInterval] {
        &self.all_intervals
    }

    /// The intervals from the first note to every other note.
    pub fn root_intervals(&self) -> &[HindemithInterval] {
        let n = self.notes.len().saturating_sub(1);
        &self.all_intervals[..n]
    }

    pub fn pitch_class_intervals(&self) -> &[HindemithInterval] {
        &self.pitch_class_intervals
    }

    /// Bitmask of the octave-reduced distances present in `all_intervals`.
    pub fn distance_mask(&self) -> u16 {
        self.all_intervals
            .iter()
            .fold(0u16, |mask, iv| mask | (1 << iv.pitch_class_distance()))
    }

    pub fn tritone_count(&self) -> usize {
        self.pitch_class_intervals
            .iter()
            .filter(|iv| iv.pitch_class_distance() == TRITONE)
            .count()
    }

    pub fn column(&self) -> Column {
        if self.tritone_count() > 0 {
            Column::WithTritone
        } else {
            Column::TritoneFree
        }
    }

    /// Root note by Hindemith's best-interval rule.
    pub fn root(&self) -> Result<Pitch, ChordError> {
        resolve_root(&self.all_intervals).ok_or_else(|| ChordError::RootUnresolvable {
            notes: self.notes.clone(),
        })
    }

    /// The same chord shifted by `semitones`.
    pub fn transpose(&self, semitones: i32) -> Chord {
        Chord::new(self.notes.iter().map(|n| n + semitones).collect())
    }
}

fn pairwise(notes: &[Pitch]) -> Vec<HindemithInterval> {
    let mut intervals = Vec::with_capacity(notes.len() * notes.len().saturating_sub(1) / 2);
    for (i, &a) in notes.iter().enumerate() {
        for &b in &notes[i + 1..] {
            intervals.push(HindemithInterval::new(a, b));
        }
    }
    intervals
}

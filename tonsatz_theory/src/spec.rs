// Declarative chord-group specifications.
//
// Each group of Hindemith's chord table is described by one
// `ChordSpecification`: which octave-reduced interval distances the chord
// must avoid, which it must contain, which alternatives it needs at least
// one of, how the root relates to the bass, which column it belongs to, and
// three special flags (several tritones, "layered" fourths/major thirds,
// diminished-family structure).
//
// Interval sets are `IntervalSet` bitsets over the distances 0-11. They
// serialize as plain lists of distances so rule tables can be written by
// hand in JSON.
//
// Specifications are built with consuming setter methods:
//
//     ChordSpecification::new("A) I. 1.")
//         .exclude(&[1, 2, 6, 10, 11])
//         .root(RootRelation::EqualsBass)
//         .column(ColumnRequirement::TritoneFree)
//
// and never change afterwards. See `table.rs` for the full table and
// `rules.rs` for how a specification is evaluated.

use crate::chord::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of pitch-class distances (0-11), stored as a 12-bit mask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct IntervalSet(u16);

impl IntervalSet {
    pub const EMPTY: IntervalSet = IntervalSet(0);

    /// Set of the given distances. Values are reduced modulo 12.
    pub fn of(distances: &[u8]) -> Self {
        IntervalSet(
            distances
                .iter()
                .fold(0u16, |mask, &d| mask | (1 << (d % 12))),
        )
    }

    pub fn from_mask(mask: u16) -> Self {
        IntervalSet(mask & 0x0FFF)
    }

    pub fn mask(self) -> u16 {
        self.0
    }

    pub fn contains(self, distance: u8) -> bool {
        distance < 12 && self.0 & (1 << distance) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if any distance of `mask` is in the set.
    pub fn intersects(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    /// True if every distance of the set is in `mask`.
    pub fn is_subset_of(self, mask: u16) -> bool {
        self.0 & !mask == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..12u8).filter(move |&d| self.contains(d))
    }
}

impl fmt::Debug for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl TryFrom<Vec<u8>> for IntervalSet {
    type Error = String;

    fn try_from(distances: Vec<u8>) -> Result<Self, Self::Error> {
        if let Some(bad) = distances.iter().find(|&&d| d > 11) {
            return Err(format!("interval distance {bad} is outside 0..=11"));
        }
        Ok(IntervalSet::of(&distances))
    }
}

impl From<IntervalSet> for Vec<u8> {
    fn from(set: IntervalSet) -> Self {
        set.iter().collect()
    }
}

/// How the root must relate to the bass note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootRelation {
    #[default]
    Any,
    EqualsBass,
    NotEqualsBass,
}

impl RootRelation {
    pub fn accepts(self, root: crate::Pitch, bass: crate::Pitch) -> bool {
        match self {
            RootRelation::Any => true,
            RootRelation::EqualsBass => root == bass,
            RootRelation::NotEqualsBass => root != bass,
        }
    }
}

/// Which column a chord must be in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRequirement {
    #[default]
    Any,
    TritoneFree,
    WithTritone,
}

impl ColumnRequirement {
    pub fn accepts(self, column: Column) -> bool {
        match self {
            ColumnRequirement::Any => true,
            ColumnRequirement::TritoneFree => column == Column::TritoneFree,
            ColumnRequirement::WithTritone => column == Column::WithTritone,
        }
    }
}

/// The predicate describing one chord group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordSpecification {
    /// Position in Hindemith's table, e.g. "B) II. b1".
    pub label: String,
    /// Distances that must not occur between any two notes.
    pub exclude_intervals: IntervalSet,
    /// Distances that must all occur.
    pub require_intervals: IntervalSet,
    /// Each non-empty set needs at least one of its distances present.
    pub require_any_groups: Vec<IntervalSet>,
    pub root_relation: RootRelation,
    pub column_requirement: ColumnRequirement,
    /// At least two tritones between the chord's pitch classes.
    pub require_multiple_tritones: bool,
    /// Chords built by stacking equal intervals (fourths or major thirds).
    pub layering_major_third_or_fourth: bool,
    /// Chords built from minor thirds (diminished triads and sevenths).
    pub diminished_family: bool,
}

impl ChordSpecification {
    pub fn new(label: impl Into<String>) -> Self {
        ChordSpecification {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn exclude(mut self, distances: &[u8]) -> Self {
        self.exclude_intervals = IntervalSet::of(distances);
        self
    }

    pub fn require(mut self, distances: &[u8]) -> Self {
        self.require_intervals = IntervalSet::of(distances);
        self
    }

    /// Adds one "at least one of" group.
    pub fn require_any(mut self, distances: &[u8]) -> Self {
        self.require_any_groups.push(IntervalSet::of(distances));
        self
    }

    pub fn root(mut self, relation: RootRelation) -> Self {
        self.root_relation = relation;
        self
    }

    pub fn column(mut self, requirement: ColumnRequirement) -> Self {
        self.column_requirement = requirement;
        self
    }

    pub fn multiple_tritones(mut self) -> Self {
        self.require_multiple_tritones = true;
        self
    }

    pub fn layering(mut self) -> Self {
        self.layering_major_third_or_fourth = true;
        self
    }

    pub fn diminished(mut self) -> Self {
        self.diminished_family = true;
        self
    }

    /// Sets that must and must not be present contradict each other.
    pub fn is_contradictory(&self) -> bool {
        self.exclude_intervals
            .intersects(self.require_intervals.mask())
            || self
                .require_any_groups
                .iter()
                .any(|g| !g.is_empty() && g.is_subset_of(self.exclude_intervals.mask()))
    }
}

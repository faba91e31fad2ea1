// Intervals between two pitches, and their Hindemith properties.
//
// An `Interval` normalizes its two notes so that `low <= high` and records
// both the real distance in semitones and the octave-reduced pitch-class
// distance (0-11). A `HindemithInterval` adds the two properties the chord
// theory needs:
//
// - quality: the rank of the distance in Hindemith's "Reihe 2" (series 2),
//   the ordering of intervals from most to least harmonically stable:
//   fifth, fourth, major third, minor sixth, minor third, major sixth,
//   major second, minor seventh, minor second, major seventh, tritone.
//   Lower rank is better. Unisons and octaves have no rank.
// - root candidate: which of the two notes is the interval's root. For
//   fifths, thirds, sevenths and the tritone it is the lower note; for
//   their inversions (fourths, sixths, seconds) it is the upper one.
//
// Both properties are plain constant tables indexed by distance, so they can
// be checked at a glance against the ranking list.
//
// See also: `chord.rs` which builds every pairwise interval of a chord, and
// `root.rs` which picks the chord root from interval qualities.

use crate::{Pitch, pitch_class};

/// Semitone distance of the tritone, the only interval that decides the
/// column of a chord.
pub const TRITONE: u8 = 6;

/// Hindemith's series 2: pitch-class distances from best to worst.
pub const CONSONANCE_ORDER: [u8; 11] = [7, 5, 4, 8, 3, 9, 2, 10, 1, 11, 6];

/// Distances whose lower note is the root (fifth, thirds, sevenths, tritone).
pub const LOWER_ROOT_DISTANCES: [u8; 6] = [7, 4, 3, 10, 11, 6];

/// Quality rank per distance 0-11 (position in `CONSONANCE_ORDER`).
const QUALITY_BY_DISTANCE: [Option<u8>; 12] = [
    None,     // unison / octave
    Some(8),  // minor second
    Some(6),  // major second
    Some(4),  // minor third
    Some(2),  // major third
    Some(1),  // fourth
    Some(10), // tritone
    Some(0),  // fifth
    Some(3),  // minor sixth
    Some(5),  // major sixth
    Some(7),  // minor seventh
    Some(9),  // major seventh
];

/// Which note of an interval is its root candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSide {
    Lower,
    Upper,
}

/// Root side per distance 0-11. Unison counts as "upper", which is moot
/// since a unison never takes part in root resolution.
const ROOT_SIDE_BY_DISTANCE: [RootSide; 12] = [
    RootSide::Upper,
    RootSide::Upper,
    RootSide::Upper,
    RootSide::Lower,
    RootSide::Lower,
    RootSide::Upper,
    RootSide::Lower,
    RootSide::Lower,
    RootSide::Upper,
    RootSide::Upper,
    RootSide::Lower,
    RootSide::Lower,
];

/// Two pitches with `low <= high`.
///
/// `Interval::new(a, b) == Interval::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    low: Pitch,
    high: Pitch,
}

impl Interval {
    pub fn new(a: Pitch, b: Pitch) -> Self {
        if a > b {
            log::trace!("interval notes given high to low ({a}, {b}), swapping");
            Interval { low: b, high: a }
        } else {
            Interval { low: a, high: b }
        }
    }

    pub fn low(&self) -> Pitch {
        self.low
    }

    pub fn high(&self) -> Pitch {
        self.high
    }

    /// Distance in semitones, not octave-reduced.
    pub fn real_difference(&self) -> i32 {
        self.high - self.low
    }

    /// Distance reduced into one octave (0-11).
    pub fn pitch_class_distance(&self) -> u8 {
        pitch_class(self.real_difference())
    }

    pub fn is_tritone(&self) -> bool {
        self.pitch_class_distance() == TRITONE
    }
}

/// An interval together with its consonance rank and root candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HindemithInterval {
    interval: Interval,
}

impl HindemithInterval {
    pub fn new(a: Pitch, b: Pitch) -> Self {
        HindemithInterval {
            interval: Interval::new(a, b),
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn low(&self) -> Pitch {
        self.interval.low
    }

    pub fn high(&self) -> Pitch {
        self.interval.high
    }

    pub fn real_difference(&self) -> i32 {
        self.interval.real_difference()
    }

    pub fn pitch_class_distance(&self) -> u8 {
        self.interval.pitch_class_distance()
    }

    pub fn is_tritone(&self) -> bool {
        self.interval.is_tritone()
    }

    /// Consonance rank (0 = fifth, 10 = tritone); `None` for unison/octave.
    pub fn quality(&self) -> Option<u8> {
        QUALITY_BY_DISTANCE[self.pitch_class_distance() as usize]
    }

    pub fn root_side(&self) -> RootSide {
        ROOT_SIDE_BY_DISTANCE[self.pitch_class_distance() as usize]
    }

    /// The note this interval nominates as root.
    pub fn root_candidate(&self) -> Pitch {
        match self.root_side() {
            RootSide::Lower => self.interval.low,
            RootSide::Upper => self.interval.high,
        }
    }
}

impl From<Interval> for HindemithInterval {
    fn from(interval: Interval) -> Self {
        HindemithInterval { interval }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_swaps_reversed_notes() {
        let iv = Interval::new(67, 60);
        assert_eq!(iv.low(), 60);
        assert_eq!(iv.high(), 67);
        assert_eq!(iv, Interval::new(60, 67));
    }

    #[test]
    fn test_distances_beyond_octave() {
        let iv = Interval::new(60, 79); // C4 to G5, a twelfth
        assert_eq!(iv.real_difference(), 19);
        assert_eq!(iv.pitch_class_distance(), 7);

        let octave = Interval::new(48, 72);
        assert_eq!(octave.pitch_class_distance(), 0);
    }

    #[test]
    fn test_quality_table_matches_consonance_order() {
        for (rank, &distance) in CONSONANCE_ORDER.iter().enumerate() {
            let iv = HindemithInterval::new(60, 60 + distance as i32);
            assert_eq!(iv.quality(), Some(rank as u8), "distance {distance}");
        }
        assert_eq!(HindemithInterval::new(60, 72).quality(), None);
        assert_eq!(HindemithInterval::new(60, 60).quality(), None);
    }

    #[test]
    fn test_root_side_table_matches_lower_root_list() {
        for distance in 1..12u8 {
            let iv = HindemithInterval::new(60, 60 + distance as i32);
            let expect_lower = LOWER_ROOT_DISTANCES.contains(&distance);
            assert_eq!(
                iv.root_side() == RootSide::Lower,
                expect_lower,
                "distance {distance}"
            );
        }
    }

    #[test]
    fn test_root_candidates() {
        // Fifth C-G: root C.
        assert_eq!(HindemithInterval::new(60, 67).root_candidate(), 60);
        // Fourth C-F: root F.
        assert_eq!(HindemithInterval::new(60, 65).root_candidate(), 65);
        // Minor sixth E-C: root C (upper).
        assert_eq!(HindemithInterval::new(64, 72).root_candidate(), 72);
        // Tritone: lower note.
        assert_eq!(HindemithInterval::new(60, 66).root_candidate(), 60);
        // Compound fifth keeps the lower note as root.
        assert_eq!(HindemithInterval::new(48, 67).root_candidate(), 48);
    }

    #[test]
    fn test_tritone_detection() {
        assert!(HindemithInterval::new(60, 66).is_tritone());
        assert!(HindemithInterval::new(60, 78).is_tritone());
        assert!(!HindemithInterval::new(60, 67).is_tritone());
    }
}

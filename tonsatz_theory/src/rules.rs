// Evaluation of a `ChordSpecification` against a chord.
//
// `matches` is the conjunction of every clause of the specification. The
// interval clauses look at `all_intervals` (octave-reduced distances); the
// tritone count looks at the pitch-class intervals; the two structural
// flags look at the root intervals (bass against each upper note):
//
// - layering: cond1 = every root interval's distance is a multiple of 4
//   (stacked major thirds); cond2 = every root interval's real size is a
//   multiple of 5 (stacked fourths). A chord passes when
//   `flag == cond1 || cond2`. With the flag off this rejects augmented
//   triads that are not also quartal; quartal chords always pass.
// - diminished family: cond3 = every root interval's real size is a
//   multiple of 3. A chord passes when `flag == cond3`, so with the flag
//   off stacks of minor thirds are rejected.

use crate::Pitch;
use crate::chord::Chord;
use crate::spec::ChordSpecification;

/// Full evaluation: interval clauses, root relation and column.
pub fn matches(chord: &Chord, root: Pitch, bass_note: Pitch, spec: &ChordSpecification) -> bool {
    matches_intervals(chord, spec)
        && spec.root_relation.accepts(root, bass_note)
        && spec.column_requirement.accepts(chord.column())
}

/// Every clause except root relation and column.
pub fn matches_intervals(chord: &Chord, spec: &ChordSpecification) -> bool {
    let mask = chord.distance_mask();
    excludes_none(mask, spec)
        && spec.require_intervals.is_subset_of(mask)
        && spec
            .require_any_groups
            .iter()
            .all(|group| group.is_empty() || group.intersects(mask))
        && layering_holds(chord, spec.layering_major_third_or_fourth)
        && diminished_holds(chord, spec.diminished_family)
        && (!spec.require_multiple_tritones || chord.tritone_count() >= 2)
}

/// No distance in `distance_mask` is excluded by `spec`. This is the only
/// clause that stays true when notes are removed from a chord, which makes
/// it usable for pruning partial chords.
pub fn excludes_none(distance_mask: u16, spec: &ChordSpecification) -> bool {
    !spec.exclude_intervals.intersects(distance_mask)
}

fn layering_holds(chord: &Chord, flag: bool) -> bool {
    let roots = chord.root_intervals();
    let major_thirds = roots.iter().all(|iv| iv.pitch_class_distance() % 4 == 0);
    let fourths = roots.iter().all(|iv| iv.real_difference() % 5 == 0);
    flag == major_thirds || fourths
}

fn diminished_holds(chord: &Chord, flag: bool) -> bool {
    let minor_thirds = chord
        .root_intervals()
        .iter()
        .all(|iv| iv.real_difference() % 3 == 0);
    flag == minor_thirds
}

// Note-set enumeration (the "note combinator").
//
// Produces every strictly increasing k-note sequence inside a pitch range
// whose notes all have different pitch classes, in lexicographic order.
// A chord may not double a pitch class (no octave doublings), so the
// enumeration backtracks as soon as a pitch class repeats; the result is
// exactly the filtered lexicographic enumeration, just without building
// the rejected tuples.
//
// `restrict_span` is a separate post-filter limiting how far apart the
// outer notes of a sequence may be.
//
// Scale-restricted enumeration takes any `ScaleMembership` predicate
// (see `scale.rs`) and only places notes the predicate accepts.

use crate::scale::ScaleMembership;
use crate::{Pitch, pitch_class};

/// All k-note sequences in `[min_note, max_note]` with distinct pitch
/// classes, lexicographically ordered.
///
/// Returns an empty list when `k == 0`, `k > 12` (there are only twelve
/// pitch classes), `min_note > max_note`, or the range holds fewer than `k`
/// notes.
pub fn generate_chords(k: usize, min_note: Pitch, max_note: Pitch) -> Vec<Vec<Pitch>> {
    generate_filtered(k, min_note, max_note, &|_: Pitch| true)
}

/// Like `generate_chords`, but only using notes that belong to `scale`.
pub fn generate_in_scale<S: ScaleMembership + ?Sized>(
    k: usize,
    min_note: Pitch,
    max_note: Pitch,
    scale: &S,
) -> Vec<Vec<Pitch>> {
    generate_filtered(k, min_note, max_note, &|note: Pitch| scale.contains(note))
}

/// Keep only sequences whose outer notes are less than `max_octaves`
/// octaves apart.
pub fn restrict_span(sequences: Vec<Vec<Pitch>>, max_octaves: u32) -> Vec<Vec<Pitch>> {
    let limit = max_octaves as i64 * 12;
    sequences
        .into_iter()
        .filter(|seq| match (seq.first(), seq.last()) {
            (Some(&first), Some(&last)) => (last as i64 - first as i64) < limit,
            _ => false,
        })
        .collect()
}

fn generate_filtered(
    k: usize,
    min_note: Pitch,
    max_note: Pitch,
    allowed: &dyn Fn(Pitch) -> bool,
) -> Vec<Vec<Pitch>> {
    if !range_can_hold(k, min_note, max_note) {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    extend(
        &mut Walk {
            k,
            max_note,
            allowed,
            out: &mut out,
        },
        &mut current,
        min_note as i64,
        0,
    );
    log::debug!(
        "enumerated {} {}-note chords in {}..={}",
        out.len(),
        k,
        min_note,
        max_note
    );
    out
}

/// Whether `[min_note, max_note]` can hold any k-note chord with distinct
/// pitch classes. Range arithmetic is done in i64 so extreme pitches don't
/// overflow.
pub(crate) fn range_can_hold(k: usize, min_note: Pitch, max_note: Pitch) -> bool {
    (1..=12).contains(&k)
        && min_note <= max_note
        && max_note as i64 - min_note as i64 + 1 >= k as i64
}

struct Walk<'a> {
    k: usize,
    max_note: Pitch,
    allowed: &'a dyn Fn(Pitch) -> bool,
    out: &'a mut Vec<Vec<Pitch>>,
}

/// Depth-first extension of `current`; `used` is a bitmask of the pitch
/// classes already in it. Note positions are walked as i64 so the range may
/// end at `Pitch::MAX`.
fn extend(walk: &mut Walk<'_>, current: &mut Vec<Pitch>, from: i64, used: u16) {
    if current.len() == walk.k {
        walk.out.push(current.clone());
        return;
    }
    let remaining = walk.k - current.len();
    if 12 - (used.count_ones() as usize) < remaining {
        return;
    }
    // The last note that still leaves room for the remaining positions.
    let last_start = walk.max_note as i64 - (remaining as i64 - 1);
    for pos in from..=last_start {
        let note = pos as Pitch;
        let bit = 1u16 << pitch_class(note);
        if used & bit == 0 && (walk.allowed)(note) {
            current.push(note);
            extend(walk, current, pos + 1, used | bit);
            current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert!(generate_chords(0, 60, 72).is_empty());
        assert!(generate_chords(3, 72, 60).is_empty());
        assert!(generate_chords(3, 60, 61).is_empty());
    }

    #[test]
    fn test_more_notes_than_pitch_classes_is_empty() {
        let start = std::time::Instant::now();
        assert!(generate_chords(13, 0, 127).is_empty());
        assert!(generate_in_scale(13, 0, 127, &|_: Pitch| true).is_empty());
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_twelve_notes_one_octave() {
        // Exactly one 12-note chord fits in a single octave.
        assert_eq!(generate_chords(12, 60, 71), vec![(60..72).collect::<Vec<_>>()]);
        // 60 and 72 share a pitch class, so one of them is always left out.
        assert_eq!(generate_chords(12, 60, 72).len(), 2);
    }

    #[test]
    fn test_extreme_pitch_bounds() {
        let top = generate_chords(3, Pitch::MAX - 3, Pitch::MAX);
        assert_eq!(top.len(), 4);
        assert_eq!(top[3], vec![Pitch::MAX - 2, Pitch::MAX - 1, Pitch::MAX]);
        let bottom = generate_chords(2, Pitch::MIN, Pitch::MIN + 1);
        assert_eq!(bottom, vec![vec![Pitch::MIN, Pitch::MIN + 1]]);
    }

    #[test]
    fn test_small_range_lexicographic() {
        let chords = generate_chords(2, 60, 62);
        assert_eq!(chords, vec![vec![60, 61], vec![60, 62], vec![61, 62]]);
    }

    #[test]
    fn test_octave_doublings_rejected() {
        // 60..=72: C4 and C5 share a pitch class.
        let chords = generate_chords(2, 60, 72);
        assert!(!chords.contains(&vec![60, 72]));
        // 13 notes choose 2 = 78, minus the one C-C pair.
        assert_eq!(chords.len(), 77);
    }

    #[test]
    fn test_matches_filtered_brute_force() {
        let (min, max, k) = (55, 70, 3);
        let mut brute = Vec::new();
        for a in min..=max {
            for b in a + 1..=max {
                for c in b + 1..=max {
                    let pcs: BTreeSet<u8> = [a, b, c].iter().map(|&n| pitch_class(n)).collect();
                    if pcs.len() == 3 {
                        brute.push(vec![a, b, c]);
                    }
                }
            }
        }
        assert_eq!(generate_chords(k, min, max), brute);
    }

    #[test]
    fn test_sequences_strictly_increasing_and_distinct_pcs() {
        for seq in generate_chords(4, 48, 66) {
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
            let pcs: BTreeSet<u8> = seq.iter().map(|&n| pitch_class(n)).collect();
            assert_eq!(pcs.len(), seq.len());
        }
    }

    #[test]
    fn test_restrict_span() {
        let seqs = vec![vec![60, 64, 67], vec![60, 64, 72 + 7], vec![48, 61, 71]];
        let kept = restrict_span(seqs, 1);
        assert_eq!(kept, vec![vec![60, 64, 67]]);

        // Exactly one octave apart is not "less than one octave".
        let kept = restrict_span(vec![vec![60, 65, 72]], 1);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_generate_in_scale() {
        // White keys only.
        let white = |note: Pitch| [0, 2, 4, 5, 7, 9, 11].contains(&pitch_class(note));
        let chords = generate_in_scale(3, 60, 64, &white);
        assert_eq!(chords, vec![vec![60, 62, 64]]);
    }
}

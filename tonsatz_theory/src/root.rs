// Root-note resolution.
//
// The root of a chord is the root candidate of its best interval, the
// one with the lowest quality rank. When several intervals share the best
// rank (e.g. two fifths), the lowest of their root candidates wins.
// Unisons and octaves carry no rank and are ignored entirely, so a chord
// made only of octave doublings has no root.

use crate::Pitch;
use crate::interval::HindemithInterval;

/// Root note for a set of intervals, or `None` when none of them is
/// ranked.
pub fn resolve_root(intervals: &[HindemithInterval]) -> Option<Pitch> {
    let mut best_quality: Option<u8> = None;
    let mut best: Vec<&HindemithInterval> = Vec::new();

    for iv in intervals {
        let Some(quality) = iv.quality() else {
            continue;
        };
        match best_quality {
            Some(q) if quality > q => {}
            Some(q) if quality == q => best.push(iv),
            _ => {
                best_quality = Some(quality);
                best.clear();
                best.push(iv);
            }
        }
    }

    best.iter().map(|iv| iv.root_candidate()).min()
}

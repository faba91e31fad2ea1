// Specification-directed chord search: "all k-note chords of group g in a range".
//
// Enumerating every chord and classifying it works, but most of the
// search space can be cut early. Excluded intervals can only accumulate as
// notes are added, so a partial chord that already contains an excluded
// distance is abandoned together with every extension of it. Complete
// candidates are then classified by the full analyzer, so a chord is only
// reported when the group's specification is also the first one (in
// precedence order) to accept it.
//
// See also: `combinator.rs` for the unrestricted enumeration this mirrors,
// `rules::excludes_none` for the pruning predicate.

use crate::analysis::{ChordAnalysis, ClassificationResult};
use crate::chord::Chord;
use crate::combinator::range_can_hold;
use crate::rules::excludes_none;
use crate::scale::ScaleMembership;
use crate::spec::ChordSpecification;
use crate::{ChordError, GroupNumber, Pitch, pitch_class};

#[derive(Debug, Clone, Default)]
pub struct ChordFinder {
    analysis: ChordAnalysis,
}

/// Search state for one `find` call.
struct Search<'a> {
    analysis: &'a ChordAnalysis,
    spec: &'a ChordSpecification,
    group: GroupNumber,
    k: usize,
    max_note: Pitch,
    scale: Option<&'a dyn ScaleMembership>,
    found: Vec<ClassificationResult>,
    visited: u64,
}

impl ChordFinder {
    pub fn new(analysis: ChordAnalysis) -> Self {
        ChordFinder { analysis }
    }

    /// All k-note chords in `[min_note, max_note]` (distinct pitch classes,
    /// optionally inside `scale`) that classify into `group`, in
    /// lexicographic order.
    pub fn find(
        &self,
        group: GroupNumber,
        k: usize,
        min_note: Pitch,
        max_note: Pitch,
        scale: Option<&dyn ScaleMembership>,
    ) -> Result<Vec<ClassificationResult>, ChordError> {
        let spec = self
            .analysis
            .table()
            .get(group)
            .ok_or(ChordError::UnknownGroup(group))?;
        if !range_can_hold(k, min_note, max_note) {
            return Ok(Vec::new());
        }

        let mut search = Search {
            analysis: &self.analysis,
            spec,
            group,
            k,
            max_note,
            scale,
            found: Vec::new(),
            visited: 0,
        };
        let mut current = Vec::with_capacity(k);
        search.extend(&mut current, min_note as i64, 0, 0);
        log::debug!(
            "group {group}: {} {k}-note chords found, {} partial chords visited",
            search.found.len(),
            search.visited
        );
        Ok(search.found)
    }
}

impl Search<'_> {
    /// `used_pcs` is the pitch-class bitmask of `current`, `distances` the
    /// mask of octave-reduced distances between its notes. Positions are
    /// i64 so a range ending at `Pitch::MAX` does not overflow.
    fn extend(&mut self, current: &mut Vec<Pitch>, from: i64, used_pcs: u16, distances: u16) {
        self.visited += 1;
        if current.len() == self.k {
            self.accept(current);
            return;
        }
        let remaining = self.k - current.len();
        if 12 - (used_pcs.count_ones() as usize) < remaining {
            return;
        }
        let last_start = self.max_note as i64 - (remaining as i64 - 1);
        for pos in from..=last_start {
            let note = pos as Pitch;
            let pc = pitch_class(note);
            let pc_bit = 1u16 << pc;
            if used_pcs & pc_bit != 0 {
                continue;
            }
            if self.scale.is_some_and(|scale| !scale.contains(note)) {
                continue;
            }
            let added = current.iter().fold(distances, |mask, &prev| {
                mask | (1 << ((pc + 12 - pitch_class(prev)) % 12))
            });
            if !excludes_none(added, self.spec) {
                continue;
            }
            current.push(note);
            self.extend(current, pos + 1, used_pcs | pc_bit, added);
            current.pop();
        }
    }

    fn accept(&mut self, notes: &[Pitch]) {
        let chord = Chord::new(notes.to_vec());
        match self.analysis.analyze_chord(&chord) {
            Ok(result) if result.group == self.group => self.found.push(result),
            Ok(_) => {}
            Err(e) => log::trace!("skipping {notes:?}: {e}"),
        }
    }
}

// Scale membership.
//
// Chord generation can be restricted to the notes of a scale. The engine
// only ever asks one question of a scale, whether a note belongs to it, so
// the seam is the `ScaleMembership` trait; plain closures implement it too.
//
// `ScaleCatalog` provides the named scales used for restricted generation:
// the twelve major (ionian) scales, four hexatonic "construct" scales
// (alternating minor second / major third), three octatonic scales and the
// two whole-tone scales. Pitch classes are absolute (C = 0); the tonic is
// kept for display.

use crate::{Pitch, pitch_class};
use serde::{Deserialize, Serialize};

/// Anything that can say whether a note is part of it.
pub trait ScaleMembership {
    fn contains(&self, note: Pitch) -> bool;
}

impl<F: Fn(Pitch) -> bool> ScaleMembership for F {
    fn contains(&self, note: Pitch) -> bool {
        self(note)
    }
}

/// A named pitch-class set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub name: String,
    /// Tonic pitch class (0-11).
    pub tonic: u8,
    /// Membership by pitch class, indexed 0-11.
    pub pitch_classes: [bool; 12],
}

impl Scale {
    pub fn new(name: impl Into<String>, tonic: u8, pitch_classes: &[u8]) -> Self {
        let mut pcs = [false; 12];
        for &pc in pitch_classes {
            pcs[(pc % 12) as usize] = true;
        }
        Scale {
            name: name.into(),
            tonic: tonic % 12,
            pitch_classes: pcs,
        }
    }

    pub fn size(&self) -> usize {
        self.pitch_classes.iter().filter(|&&b| b).count()
    }

    /// All notes of the scale in `[min_note, max_note]`, ascending.
    pub fn notes_in_range(&self, min_note: Pitch, max_note: Pitch) -> Vec<Pitch> {
        (min_note..=max_note).filter(|&n| self.contains(n)).collect()
    }
}

impl ScaleMembership for Scale {
    fn contains(&self, note: Pitch) -> bool {
        self.pitch_classes[pitch_class(note) as usize]
    }
}

/// The built-in scales, looked up by name.
#[derive(Debug, Clone)]
pub struct ScaleCatalog {
    scales: Vec<Scale>,
}

impl Default for ScaleCatalog {
    fn default() -> Self {
        ScaleCatalog::standard()
    }
}

impl ScaleCatalog {
    pub fn standard() -> Self {
        const IONIAN: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
        // Circle of fifths from C, as (name, tonic).
        let majors = [
            ("c-ionian", 0),
            ("g-ionian", 7),
            ("d-ionian", 2),
            ("a-ionian", 9),
            ("e-ionian", 4),
            ("b-ionian", 11),
            ("f#-ionian", 6),
            ("db-ionian", 1),
            ("ab-ionian", 8),
            ("eb-ionian", 3),
            ("bb-ionian", 10),
            ("f-ionian", 5),
        ];
        let mut scales: Vec<Scale> = majors
            .iter()
            .map(|&(name, tonic)| {
                let pcs: Vec<u8> = IONIAN.iter().map(|&d| (d + tonic) % 12).collect();
                Scale::new(name, tonic, &pcs)
            })
            .collect();

        for tonic in 0..4u8 {
            let pcs: Vec<u8> = [0, 1, 4, 5, 8, 9].iter().map(|&d| (d + tonic) % 12).collect();
            let name = ["c", "c#", "d", "d#"][tonic as usize];
            scales.push(Scale::new(format!("{name}-construct"), tonic, &pcs));
        }
        for tonic in 0..3u8 {
            let pcs: Vec<u8> = [0, 1, 3, 4, 6, 7, 9, 10]
                .iter()
                .map(|&d| (d + tonic) % 12)
                .collect();
            let name = ["c", "c#", "d"][tonic as usize];
            scales.push(Scale::new(format!("{name}-octatonic"), tonic, &pcs));
        }
        scales.push(Scale::new("c-whole-tone", 0, &[0, 2, 4, 6, 8, 10]));
        scales.push(Scale::new("c#-whole-tone", 1, &[1, 3, 5, 7, 9, 11]));

        ScaleCatalog { scales }
    }

    pub fn get(&self, name: &str) -> Option<&Scale> {
        self.scales.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scale> {
        self.scales.iter()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

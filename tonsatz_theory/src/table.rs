// The chord-group rule table.
//
// `SpecificationTable` maps group numbers to `ChordSpecification`s and
// fixes the order in which the classifier tries them. The default table is
// Hindemith's chord table (Unterweisung im Tonsatz I, chapter IV) in 16
// groups:
//
//   A I      major/minor triads and their relatives, no seconds/sevenths
//   B II     tritone chords without minor seconds/major sevenths
//   A III    tritone-free chords with seconds or sevenths
//   B IV     tritone chords with minor seconds/major sevenths
//   A V      "layered" chords of equal intervals (augmented, quartal)
//   B VI     diminished triads and sevenths
//
// Each section is split by whether the root is the bass (1) or not (2).
//
// The table is built once per process and shared through an `Arc`
// (`SpecificationTable::shared`). Alternative tables can be loaded from
// JSON; they are validated on load.
//
// See also: `analysis.rs` which walks `precedence()`, `rules.rs` which
// evaluates one entry.

use crate::spec::{ChordSpecification, ColumnRequirement, RootRelation};
use crate::{ChordError, GroupNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// The consonant distances: fifth, fourth, thirds and sixths.
const CONSONANT: [u8; 6] = [7, 5, 4, 8, 3, 9];

/// Major second and minor seventh.
const SECONDS_SEVENTHS: [u8; 2] = [2, 10];

/// Minor second and major seventh.
const SHARP_DISSONANCES: [u8; 2] = [1, 11];

static HINDEMITH: LazyLock<Arc<SpecificationTable>> =
    LazyLock::new(|| Arc::new(SpecificationTable::hindemith()));

/// One row as it appears in a JSON rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableEntry {
    group: GroupNumber,
    #[serde(flatten)]
    spec: ChordSpecification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificationTable {
    specs: BTreeMap<GroupNumber, ChordSpecification>,
    /// Groups in the order the classifier tries them.
    precedence: Vec<GroupNumber>,
}

impl SpecificationTable {
    /// Builds a table, rejecting duplicate or zero group numbers and
    /// self-contradictory specifications.
    pub fn new(
        entries: impl IntoIterator<Item = (GroupNumber, ChordSpecification)>,
    ) -> Result<Self, ChordError> {
        let mut specs = BTreeMap::new();
        for (group, spec) in entries {
            if group == 0 {
                return Err(ChordError::InvalidTable("group numbers start at 1".into()));
            }
            if spec.is_contradictory() {
                return Err(ChordError::InvalidTable(format!(
                    "group {group} ({}) requires an interval it also excludes",
                    spec.label
                )));
            }
            if specs.insert(group, spec).is_some() {
                return Err(ChordError::InvalidTable(format!(
                    "group {group} defined twice"
                )));
            }
        }
        if specs.is_empty() {
            return Err(ChordError::InvalidTable("no groups defined".into()));
        }
        let precedence = precedence_of(&specs);
        Ok(SpecificationTable { specs, precedence })
    }

    /// The process-wide Hindemith table.
    pub fn shared() -> Arc<SpecificationTable> {
        Arc::clone(&HINDEMITH)
    }

    /// Hindemith's 16 groups.
    pub fn hindemith() -> Self {
        use ColumnRequirement::{TritoneFree, WithTritone};
        use RootRelation::{EqualsBass, NotEqualsBass};

        let specs = [
            (1, ChordSpecification::new("A) I. 1.")
                .exclude(&[1, 2, 6, 10, 11])
                .root(EqualsBass)
                .column(TritoneFree)),
            (2, ChordSpecification::new("A) I. 2.")
                .exclude(&[1, 2, 6, 10, 11])
                .root(NotEqualsBass)
                .column(TritoneFree)),
            (3, ChordSpecification::new("B) II. a")
                .exclude(&[1, 2, 11])
                .require(&[6, 10])
                .require_any(&CONSONANT)
                .root(EqualsBass)
                .column(WithTritone)),
            (4, ChordSpecification::new("B) II. b1")
                .exclude(&SHARP_DISSONANCES)
                .require(&[2, 6])
                .require_any(&CONSONANT)
                .root(EqualsBass)
                .column(WithTritone)),
            (5, ChordSpecification::new("B) II. b2")
                .exclude(&SHARP_DISSONANCES)
                .require(&[6])
                .require_any(&SECONDS_SEVENTHS)
                .require_any(&CONSONANT)
                .root(NotEqualsBass)
                .column(WithTritone)),
            (6, ChordSpecification::new("B) II. b3")
                .exclude(&SHARP_DISSONANCES)
                .require(&[6])
                .require_any(&SECONDS_SEVENTHS)
                .require_any(&CONSONANT)
                .column(WithTritone)
                .multiple_tritones()),
            (7, ChordSpecification::new("A) III. 1. (M2, m7)")
                .exclude(&[1, 6, 11])
                .require_any(&SECONDS_SEVENTHS)
                .root(EqualsBass)
                .column(TritoneFree)),
            (8, ChordSpecification::new("A) III. 1. (M7)")
                .exclude(&[1, 6])
                .require(&[11])
                .root(EqualsBass)
                .column(TritoneFree)),
            (9, ChordSpecification::new("A) III. 1. (m2)")
                .exclude(&[6])
                .require(&[1])
                .root(EqualsBass)
                .column(TritoneFree)),
            (10, ChordSpecification::new("A) III. 2. (M2, m7)")
                .exclude(&[1, 6, 11])
                .require_any(&SECONDS_SEVENTHS)
                .root(NotEqualsBass)
                .column(TritoneFree)),
            (11, ChordSpecification::new("A) III. 2. (M7)")
                .exclude(&[1, 6])
                .require(&[11])
                .root(NotEqualsBass)
                .column(TritoneFree)),
            (12, ChordSpecification::new("A) III. 2. (m2)")
                .exclude(&[6])
                .require(&[1])
                .root(NotEqualsBass)
                .column(TritoneFree)),
            (13, ChordSpecification::new("B) IV. 1.")
                .require(&[6])
                .require_any(&SHARP_DISSONANCES)
                .root(EqualsBass)
                .column(WithTritone)),
            (14, ChordSpecification::new("B) IV. 2.")
                .require(&[6])
                .require_any(&SHARP_DISSONANCES)
                .root(NotEqualsBass)
                .column(WithTritone)),
            (15, ChordSpecification::new("A) V.")
                .column(TritoneFree)
                .layering()),
            (16, ChordSpecification::new("B) VI.")
                .require(&[6])
                .column(WithTritone)
                .diminished()),
        ];

        let specs: BTreeMap<_, _> = specs.into_iter().collect();
        let precedence = precedence_of(&specs);
        SpecificationTable { specs, precedence }
    }

    /// Parses a JSON list of `{"group": n, ...specification fields}`.
    pub fn from_json(json: &str) -> Result<Self, ChordError> {
        let entries: Vec<TableEntry> =
            serde_json::from_str(json).map_err(|e| ChordError::InvalidTable(e.to_string()))?;
        Self::new(entries.into_iter().map(|e| (e.group, e.spec)))
    }

    /// Load a rule table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        log::info!("loaded {} chord groups from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<TableEntry> = self
            .specs
            .iter()
            .map(|(&group, spec)| TableEntry {
                group,
                spec: spec.clone(),
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }

    pub fn get(&self, group: GroupNumber) -> Option<&ChordSpecification> {
        self.specs.get(&group)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Entries in ascending group order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupNumber, &ChordSpecification)> {
        self.specs.iter().map(|(&g, s)| (g, s))
    }

    /// Entries in classification order.
    pub fn precedence(&self) -> impl Iterator<Item = (GroupNumber, &ChordSpecification)> {
        self.precedence
            .iter()
            .filter_map(|g| self.specs.get(g).map(|s| (*g, s)))
    }
}

/// Multiple-tritone groups first, then diminished-family groups, then
/// layering groups, then everything else; ascending within each tier.
fn precedence_of(specs: &BTreeMap<GroupNumber, ChordSpecification>) -> Vec<GroupNumber> {
    let tier = |spec: &ChordSpecification| {
        if spec.require_multiple_tritones {
            0
        } else if spec.diminished_family {
            1
        } else if spec.layering_major_third_or_fourth {
            2
        } else {
            3
        }
    };
    let mut order: Vec<GroupNumber> = specs.keys().copied().collect();
    order.sort_by_key(|g| (specs.get(g).map_or(3, tier), *g));
    order
}

// Classification of Hindemith's example chords.
//
// Each row is (notes, column, root, group). The chords cover every group of
// the 16-group table, including the cases where precedence or the root
// tie-break decides the outcome. A second set of tests checks that the
// table classifies every enumerable chord in a range.

use tonsatz_theory::combinator::{generate_chords, restrict_span};
use tonsatz_theory::{ChordAnalysis, Column, GroupNumber, Pitch};

const A: Column = Column::TritoneFree;
const B: Column = Column::WithTritone;

fn expect(notes: &[Pitch], column: Column, root: Pitch, group: GroupNumber) {
    let result = ChordAnalysis::default()
        .analyze(notes)
        .unwrap_or_else(|e| panic!("{notes:?}: {e}"));
    assert_eq!(
        (result.column, result.root_note, result.group),
        (column, root, group),
        "{notes:?}"
    );
}

#[test]
fn test_group_1_root_in_bass() {
    expect(&[60, 64, 67], A, 60, 1);
    expect(&[60, 63, 67], A, 60, 1);
}

#[test]
fn test_group_2_inversions() {
    expect(&[60, 63, 68], A, 68, 2);
    expect(&[60, 64, 69], A, 69, 2);
    expect(&[60, 65, 69], A, 65, 2);
    expect(&[60, 65, 68], A, 65, 2);
}

#[test]
fn test_group_3_dominant_sevenths() {
    expect(&[60, 64, 70], B, 60, 3);
    expect(&[60, 64, 67, 70], B, 60, 3);
}

#[test]
fn test_group_4_tritone_with_major_second() {
    expect(&[60, 64, 67, 70, 74], B, 60, 4);
    expect(&[60, 64, 70, 74], B, 60, 4);
    expect(&[60, 63, 67, 69], B, 60, 4);
    expect(&[60, 64, 66], B, 60, 4);
}

#[test]
fn test_group_5_root_above_bass() {
    expect(&[60, 66, 70], B, 66, 5);
    expect(&[60, 63, 66, 68], B, 68, 5);
    expect(&[60, 63, 65, 69], B, 65, 5);
    expect(&[60, 62, 66], B, 62, 5);
}

#[test]
fn test_group_6_multiple_tritones() {
    expect(&[60, 64, 66, 70], B, 60, 6);
    expect(&[60, 62, 64, 68, 70], B, 60, 6);
    expect(&[60, 62, 66, 68], B, 62, 6);
    expect(&[60, 62, 64, 66, 68, 70], B, 60, 6);
}

#[test]
fn test_group_7_seconds_and_sevenths_root_in_bass() {
    for notes in [
        &[60, 62, 67][..],
        &[60, 65, 67],
        &[60, 67, 69],
        &[60, 67, 70],
        &[60, 62, 64, 67],
        &[60, 64, 67, 69],
        &[60, 62, 65, 67],
        &[60, 63, 67, 70],
        &[60, 67, 70, 77],
        &[60, 67, 74],
        &[60, 67, 69, 76],
    ] {
        expect(notes, A, 60, 7);
    }
}

#[test]
fn test_group_8_major_seventh_root_in_bass() {
    for notes in [
        &[60, 67, 71][..],
        &[60, 63, 67, 71],
        &[60, 64, 67, 71],
        &[60, 64, 67, 71, 74],
        &[60, 63, 67, 70, 74],
        &[60, 63, 67, 70, 74, 77],
        &[60, 67, 69, 71, 74],
        &[60, 64, 75],
    ] {
        expect(notes, A, 60, 8);
    }
}

#[test]
fn test_group_9_minor_second_root_in_bass() {
    for notes in [
        &[60, 64, 65, 67][..],
        &[60, 64, 67, 68],
        &[60, 63, 67, 68],
        &[60, 62, 63, 67],
        &[60, 67, 68, 75],
    ] {
        expect(notes, A, 60, 9);
    }
}

#[test]
fn test_group_10_seconds_and_sevenths_root_above_bass() {
    expect(&[60, 62, 65], A, 65, 10);
    expect(&[60, 62, 69], A, 62, 10);
    expect(&[60, 62, 65, 69], A, 62, 10);
    expect(&[60, 63, 70], A, 63, 10);
    expect(&[60, 65, 74], A, 65, 10);
    expect(&[60, 65, 68, 75], A, 68, 10);
}

#[test]
fn test_group_11_major_seventh_root_above_bass() {
    expect(&[60, 62, 69, 71], A, 62, 11);
    expect(&[60, 65, 69, 76], A, 69, 11);
}

#[test]
fn test_group_12_minor_second_root_above_bass() {
    expect(&[60, 61, 65, 68], A, 61, 12);
    expect(&[60, 65, 69, 70], A, 65, 12);
    expect(&[60, 62, 69, 70], A, 62, 12);
    expect(&[60, 65, 69, 70, 74], A, 65, 12);
}

#[test]
fn test_group_13_and_14_sharp_dissonances_with_tritone() {
    expect(&[60, 64, 67, 70, 73], B, 60, 13);
    expect(&[60, 64, 71, 77], B, 64, 14);
    expect(&[60, 64, 70, 75], B, 75, 14);
}

#[test]
fn test_group_15_layered_chords() {
    // Augmented triad and stacked fourths.
    expect(&[60, 64, 68], A, 60, 15);
    expect(&[60, 65, 70], A, 65, 15);
}

#[test]
fn test_fourth_stack_with_tritone_stays_in_column_b() {
    // Group 15 only takes tritone-free stacks. Once a stack of fourths
    // reaches a tritone (60 and 90) it falls through to B IV.
    expect(&[60, 65, 70, 75], A, 65, 15);
    expect(&[60, 65, 70, 75, 80, 85, 90], B, 65, 14);
}

#[test]
fn test_group_16_diminished_family() {
    expect(&[60, 63, 66], B, 60, 16);
    expect(&[61, 64, 67], B, 61, 16);
    expect(&[60, 63, 69], B, 60, 16);
    expect(&[60, 66, 69], B, 66, 16);
    expect(&[60, 63, 66, 69], B, 60, 16);
}

#[test]
fn test_frame_interval_reported() {
    let analysis = ChordAnalysis::default();
    assert_eq!(analysis.analyze(&[60, 64, 67]).unwrap().frame_interval, 7);
    assert_eq!(analysis.analyze(&[60, 66, 69]).unwrap().frame_interval, 9);
}

#[test]
fn test_note_order_is_irrelevant() {
    let analysis = ChordAnalysis::default();
    let sorted = analysis.analyze(&[60, 64, 70, 75]).unwrap();
    let shuffled = analysis.analyze(&[75, 60, 70, 64]).unwrap();
    assert_eq!(sorted, shuffled);
}

#[test]
fn test_transposition_preserves_group_and_column() {
    let analysis = ChordAnalysis::default();
    for notes in generate_chords(3, 60, 71) {
        let base = analysis.analyze(&notes).unwrap();
        let up: Vec<Pitch> = notes.iter().map(|n| n + 5).collect();
        let moved = analysis.analyze(&up).unwrap();
        assert_eq!(base.group, moved.group, "{notes:?}");
        assert_eq!(base.column, moved.column, "{notes:?}");
        assert_eq!(base.root_note + 5, moved.root_note, "{notes:?}");
    }
}

#[test]
fn test_every_triad_in_two_octaves_is_classified() {
    let analysis = ChordAnalysis::default();
    let chords = restrict_span(generate_chords(3, 48, 72), 2);
    assert!(!chords.is_empty());
    for notes in chords {
        let result = analysis
            .analyze(&notes)
            .unwrap_or_else(|e| panic!("{notes:?}: {e}"));
        assert!(notes.contains(&result.root_note), "{notes:?}");
        assert_eq!(result.notes, notes);
    }
}

#[test]
fn test_every_four_note_chord_in_range_is_classified() {
    let analysis = ChordAnalysis::default();
    for notes in generate_chords(4, 55, 72) {
        let result = analysis
            .analyze(&notes)
            .unwrap_or_else(|e| panic!("{notes:?}: {e}"));
        assert!((1..=16).contains(&result.group));
    }
}

// Repository behaviour shared by both adapters, plus file-backed reopening.

use tonsatz_store::{
    ChordId, ChordQuery, ChordRepository, MemoryChordRepository, SqliteChordRepository,
};
use tonsatz_theory::ChordAnalysis;
use tonsatz_theory::combinator::{generate_chords, restrict_span};

fn fill(repo: &mut dyn ChordRepository) -> usize {
    let analysis = ChordAnalysis::default();
    let chords: Vec<_> = restrict_span(generate_chords(3, 55, 67), 1)
        .iter()
        .filter_map(|notes| analysis.analyze(notes).ok())
        .collect();
    repo.save_all(&chords).unwrap();
    chords.len()
}

#[test]
fn test_adapters_agree() {
    let mut memory = MemoryChordRepository::new();
    let mut sqlite = SqliteChordRepository::open_in_memory().unwrap();
    let n = fill(&mut memory);
    assert_eq!(fill(&mut sqlite), n);

    let queries = [
        ChordQuery::default(),
        ChordQuery::root(60),
        ChordQuery::group(16),
        ChordQuery::root(62).with_groups(&[1, 2, 7]).with_sizes(&[3]),
        ChordQuery::root(64).with_max_group(5),
    ];
    for query in &queries {
        let a = memory.find(query).unwrap();
        let b = sqlite.find(query).unwrap();
        assert_eq!(a, b, "{query:?}");
    }
    assert_eq!(memory.count().unwrap(), sqlite.count().unwrap());
}

#[test]
fn test_sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chords.sqlite");
    let saved = {
        let mut repo = SqliteChordRepository::open(&path).unwrap();
        fill(&mut repo)
    };

    let mut repo = SqliteChordRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), saved);
    assert!(repo.delete_by_id(ChordId(1)).unwrap());
    assert_eq!(repo.count().unwrap(), saved - 1);
}

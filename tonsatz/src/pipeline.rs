// Batch pipeline: enumerate → classify → store.
//
// `calculate` enumerates every chord of the configured sizes in the
// configured range (span-limited), then classifies them in parallel with
// rayon. A chord whose analysis fails is logged and skipped; the batch
// never aborts on one chord. Results come back sorted by size, then notes,
// whatever order the workers finished in.
//
// The classified set can be written to a chord repository in one
// transaction, or to a JSON chord table that later runs reload instead of
// recomputing (`load_or_calculate`).
//
// See also: `tonsatz_theory::combinator` for enumeration,
// `tonsatz_store` for the repository and table formats.

use crate::config::TonsatzConfig;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tonsatz_store::{ChordId, ChordRepository, ChordTable, StoreError};
use tonsatz_theory::combinator::{generate_chords, restrict_span};
use tonsatz_theory::{ChordAnalysis, ChordError, ClassificationResult, GroupNumber, Pitch};

/// Outcome of classifying a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub classified: Vec<ClassificationResult>,
    /// Chords the analyzer rejected, with the reason.
    pub skipped: Vec<(Vec<Pitch>, ChordError)>,
}

impl BatchReport {
    /// Number of classified chords per group.
    pub fn group_counts(&self) -> BTreeMap<GroupNumber, usize> {
        let mut counts = BTreeMap::new();
        for chord in &self.classified {
            *counts.entry(chord.group).or_insert(0) += 1;
        }
        counts
    }
}

/// All span-limited note sequences of the configured sizes.
pub fn generate_sequences(config: &TonsatzConfig) -> Vec<Vec<Pitch>> {
    let mut sizes = config.chord_sizes.clone();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
        .into_iter()
        .flat_map(|k| {
            restrict_span(
                generate_chords(k, config.min_note, config.max_note),
                config.max_octaves,
            )
        })
        .collect()
}

/// Classify `sequences` in parallel.
pub fn classify_all(analysis: &ChordAnalysis, sequences: &[Vec<Pitch>]) -> BatchReport {
    let outcomes: Vec<Result<ClassificationResult, (Vec<Pitch>, ChordError)>> = sequences
        .par_iter()
        .map(|notes| analysis.analyze(notes).map_err(|e| (notes.clone(), e)))
        .collect();

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(result) => report.classified.push(result),
            Err((notes, e)) => {
                log::warn!("skipping {notes:?}: {e}");
                report.skipped.push((notes, e));
            }
        }
    }
    report
        .classified
        .sort_by(|a, b| (a.notes.len(), &a.notes).cmp(&(b.notes.len(), &b.notes)));
    report
}

/// Enumerate and classify everything `config` describes.
pub fn calculate(config: &TonsatzConfig, analysis: &ChordAnalysis) -> BatchReport {
    let sequences = generate_sequences(config);
    log::info!(
        "classifying {} chords (sizes {:?}, notes {}..={}, < {} octaves)",
        sequences.len(),
        config.chord_sizes,
        config.min_note,
        config.max_note,
        config.max_octaves
    );
    let report = classify_all(analysis, &sequences);
    log::info!(
        "classified {} chords, skipped {}",
        report.classified.len(),
        report.skipped.len()
    );
    report
}

/// Store every classified chord of `report`.
pub fn persist(
    report: &BatchReport,
    repo: &mut dyn ChordRepository,
) -> Result<Vec<ChordId>, StoreError> {
    let ids = repo.save_all(&report.classified)?;
    log::info!("stored {} chords", ids.len());
    Ok(ids)
}

/// The chord table for the configured range, from the cache directory if
/// a table for it was written before, else freshly calculated and cached.
pub fn load_or_calculate(
    config: &TonsatzConfig,
    analysis: &ChordAnalysis,
) -> Result<ChordTable, StoreError> {
    let path = ChordTable::default_path(&config.cache_dir, config.min_note, config.max_note);
    if let Some(table) = ChordTable::load_if_present(&path)? {
        if table.covers(
            config.min_note,
            config.max_note,
            config.max_octaves,
            &config.chord_sizes,
        ) {
            return Ok(table);
        }
        log::info!(
            "cached table {} was built with a different span limit or chord sizes, recalculating",
            path.display()
        );
    }
    let report = calculate(config, analysis);
    let table = ChordTable::new(
        config.min_note,
        config.max_note,
        config.max_octaves,
        &config.chord_sizes,
        report.classified,
    );
    table.save(&path)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonsatz_store::MemoryChordRepository;

    fn small_config() -> TonsatzConfig {
        TonsatzConfig {
            min_note: 60,
            max_note: 72,
            max_octaves: 1,
            chord_sizes: vec![4, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_sequences_sorted_by_size() {
        let seqs = generate_sequences(&small_config());
        assert!(!seqs.is_empty());
        let sizes: Vec<usize> = seqs.iter().map(|s| s.len()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert!(seqs.iter().all(|s| s[s.len() - 1] - s[0] < 12));
    }

    #[test]
    fn test_classify_all_matches_sequential() {
        let analysis = ChordAnalysis::default();
        let seqs = generate_sequences(&small_config());
        let report = classify_all(&analysis, &seqs);
        assert!(report.skipped.is_empty());
        let sequential: Vec<_> = seqs.iter().map(|n| analysis.analyze(n).unwrap()).collect();
        assert_eq!(report.classified, sequential);
    }

    #[test]
    fn test_failures_are_skipped_not_fatal() {
        let analysis = ChordAnalysis::default();
        let seqs = vec![vec![60, 64, 67], vec![48, 60, 72], vec![60, 64]];
        let report = classify_all(&analysis, &seqs);
        assert_eq!(report.classified.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped[0].1,
            ChordError::RootUnresolvable { .. }
        ));
    }

    #[test]
    fn test_persist_into_repository() {
        let analysis = ChordAnalysis::default();
        let report = calculate(&small_config(), &analysis);
        let mut repo = MemoryChordRepository::new();
        let ids = persist(&report, &mut repo).unwrap();
        assert_eq!(ids.len(), report.classified.len());
        let counts = report.group_counts();
        assert_eq!(counts.values().sum::<usize>(), ids.len());
        assert_eq!(
            repo.find_by_group(1).unwrap().len(),
            counts.get(&1).copied().unwrap_or(0)
        );
    }

    #[test]
    fn test_load_or_calculate_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = TonsatzConfig {
            cache_dir: dir.path().to_path_buf(),
            ..small_config()
        };
        let analysis = ChordAnalysis::default();
        let first = load_or_calculate(&config, &analysis).unwrap();
        let path = ChordTable::default_path(&config.cache_dir, 60, 72);
        assert!(path.exists());

        // A doctored cache file is returned as-is, proving it was read.
        let mut doctored = first.clone();
        doctored.chords.truncate(1);
        doctored.save(&path).unwrap();
        let second = load_or_calculate(&config, &analysis).unwrap();
        assert_eq!(second.chords.len(), 1);
    }

    #[test]
    fn test_load_or_calculate_recalculates_for_new_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = ChordAnalysis::default();
        let triads = TonsatzConfig {
            cache_dir: dir.path().to_path_buf(),
            chord_sizes: vec![3],
            ..small_config()
        };
        let cached = load_or_calculate(&triads, &analysis).unwrap();
        assert!(cached.chords.iter().all(|c| c.notes.len() == 3));

        let wider = TonsatzConfig {
            chord_sizes: vec![3, 4],
            ..triads.clone()
        };
        let table = load_or_calculate(&wider, &analysis).unwrap();
        assert_eq!(table.chords, calculate(&wider, &analysis).classified);
        assert!(table.chords.iter().any(|c| c.notes.len() == 4));
        assert_eq!(table.chord_sizes, vec![3, 4]);

        // The rewritten cache now serves the wider config.
        let path = ChordTable::default_path(&wider.cache_dir, 60, 72);
        assert!(ChordTable::load(&path).unwrap().covers(60, 72, 1, &[4, 3]));
    }
}

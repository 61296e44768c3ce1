//! Ranking a candidate set of documents with a [`Scorer`].
//!
//! Scoring is independent per document, so candidates can be scored on the
//! rayon thread pool. Results are identical to sequential scoring: every
//! candidate is scored, then sorted by descending score with the document id
//! as tiebreak.

use std::cmp::Ordering;
use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::errors::ScoreError;
use crate::index::FrequencyIndex;
use crate::scorer::Scorer;
use crate::stats::CorpusStats;

/// Options for [`rank_documents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Keep only the best `top_k` results. `None` keeps all.
    pub top_k: Option<usize>,
    /// Drop candidates with no length record instead of failing.
    pub skip_missing: bool,
    /// Score candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            skip_missing: false,
            parallel: true,
        }
    }
}

impl From<&RankingConfig> for RankOptions {
    fn from(config: &RankingConfig) -> Self {
        Self {
            top_k: Some(config.top_k),
            skip_missing: config.skip_missing,
            parallel: config.parallel,
        }
    }
}

/// A scored document in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDocument {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub doc_id: String,
    pub score: f64,
}

/// Result of [`rank_documents`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub results: Vec<RankedDocument>,
    /// Candidates dropped because they had no length record.
    pub skipped: Vec<String>,
}

/// Score every candidate and return them best first.
///
/// Duplicate candidate ids are scored once.
///
/// # Errors
///
/// Returns the error of the first failing candidate in input order. With
/// `skip_missing`, [`ScoreError::DocumentNotFound`] is not a failure and the
/// candidate is listed in [`Ranking::skipped`].
pub fn rank_documents<I, D, T, E>(
    scorer: &Scorer<'_, I>,
    doc_ids: &[D],
    terms: &[T],
    entities: &[E],
    stats: &CorpusStats,
    options: &RankOptions,
) -> Result<Ranking, ScoreError>
where
    I: FrequencyIndex + ?Sized,
    D: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
    E: AsRef<str> + Sync,
{
    stats.validate()?;

    let mut seen = HashSet::new();
    let candidates: Vec<&str> = doc_ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|doc_id| seen.insert(*doc_id))
        .collect();

    let score_one = |doc_id: &&str| scorer.score(doc_id, terms, entities, stats);

    let outcomes: Vec<Result<f64, ScoreError>> = if options.parallel {
        candidates.par_iter().map(score_one).collect()
    } else {
        candidates.iter().map(score_one).collect()
    };

    let mut scored = Vec::with_capacity(candidates.len());
    let mut skipped = Vec::new();

    for (doc_id, outcome) in candidates.iter().zip(outcomes) {
        match outcome {
            Ok(score) => scored.push((doc_id.to_string(), score)),
            Err(err) if options.skip_missing && err.is_not_found() => {
                tracing::debug!("Skipping {}: no length record", doc_id);
                skipped.push(doc_id.to_string());
            }
            Err(err) => return Err(err),
        }
    }

    scored.sort_by(|(a_id, a), (b_id, b)| compare_scored(a_id, *a, b_id, *b));

    if let Some(k) = options.top_k {
        scored.truncate(k);
    }

    let results = scored
        .into_iter()
        .enumerate()
        .map(|(i, (doc_id, score))| RankedDocument {
            rank: i + 1,
            doc_id,
            score,
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Ranked {} candidates ({} kept, {} skipped)",
        candidates.len(),
        results.len(),
        skipped.len()
    );

    Ok(Ranking { results, skipped })
}

fn compare_scored(a_id: &str, a: f64, b_id: &str, b: f64) -> Ordering {
    b.total_cmp(&a).then_with(|| a_id.cmp(b_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_adapter::DbFrequencyIndex;
    use entscore_db::FrequencyTables;

    fn corpus(n: usize) -> (DbFrequencyIndex, CorpusStats) {
        let mut tables = FrequencyTables::new();
        for i in 0..n {
            let doc = format!("doc{:03}", i);
            tables.insert_document_length(&doc, 50 + (i as u64 * 7) % 200);
            tables.insert_term_frequency("fever", &doc, (i as u64 % 5) + 1);
            if i % 3 == 0 {
                tables.insert_entity_frequency("wuhan", &doc, 2);
            }
        }
        tables.insert_term_idf("fever", 0.4).unwrap();
        tables.insert_entity_idf("wuhan", 1.7).unwrap();
        let index = DbFrequencyIndex::new(tables);
        let stats = index.corpus_stats().unwrap();
        (index, stats)
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc{:03}", i)).collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (index, stats) = corpus(64);
        let scorer = Scorer::new(&index);
        let doc_ids = ids(64);

        let sequential = RankOptions {
            parallel: false,
            ..Default::default()
        };
        let a = rank_documents(&scorer, &doc_ids, &["fever"], &["wuhan"], &stats, &sequential)
            .unwrap();
        let b = rank_documents(
            &scorer,
            &doc_ids,
            &["fever"],
            &["wuhan"],
            &stats,
            &RankOptions::default(),
        )
        .unwrap();

        assert_eq!(a.results.len(), 64);
        for (x, y) in a.results.iter().zip(&b.results) {
            assert_eq!(x.doc_id, y.doc_id);
            assert_eq!(x.score.to_bits(), y.score.to_bits());
        }
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let (index, stats) = corpus(20);
        let scorer = Scorer::new(&index);
        let ranking = rank_documents(
            &scorer,
            &ids(20),
            &["fever"],
            &["wuhan"],
            &stats,
            &RankOptions::default(),
        )
        .unwrap();

        for pair in ranking.results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
        assert_eq!(ranking.results[0].rank, 1);
    }

    #[test]
    fn test_ties_break_on_doc_id() {
        let mut tables = FrequencyTables::new();
        tables.insert_document_length("b", 10);
        tables.insert_document_length("a", 10);
        let index = DbFrequencyIndex::new(tables);
        let stats = index.corpus_stats().unwrap();
        let scorer = Scorer::new(&index);

        let ranking = rank_documents(
            &scorer,
            &["b", "a"],
            &["x"],
            &[] as &[&str],
            &stats,
            &RankOptions::default(),
        )
        .unwrap();
        let order: Vec<_> = ranking.results.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_top_k_truncates() {
        let (index, stats) = corpus(20);
        let scorer = Scorer::new(&index);
        let options = RankOptions {
            top_k: Some(3),
            ..Default::default()
        };
        let ranking =
            rank_documents(&scorer, &ids(20), &["fever"], &[] as &[&str], &stats, &options)
                .unwrap();
        assert_eq!(ranking.results.len(), 3);
    }

    #[test]
    fn test_missing_document_fails_by_default() {
        let (index, stats) = corpus(5);
        let scorer = Scorer::new(&index);
        let err = rank_documents(
            &scorer,
            &["doc000", "ghost"],
            &["fever"],
            &[] as &[&str],
            &stats,
            &RankOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_skip_missing() {
        let (index, stats) = corpus(5);
        let scorer = Scorer::new(&index);
        let options = RankOptions {
            skip_missing: true,
            ..Default::default()
        };
        let ranking = rank_documents(
            &scorer,
            &["doc000", "ghost", "doc001"],
            &["fever"],
            &[] as &[&str],
            &stats,
            &options,
        )
        .unwrap();
        assert_eq!(ranking.results.len(), 2);
        assert_eq!(ranking.skipped, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_duplicates_scored_once() {
        let (index, stats) = corpus(5);
        let scorer = Scorer::new(&index);
        let ranking = rank_documents(
            &scorer,
            &["doc001", "doc001", "doc002"],
            &["fever"],
            &[] as &[&str],
            &stats,
            &RankOptions::default(),
        )
        .unwrap();
        assert_eq!(ranking.results.len(), 2);
    }

    #[test]
    fn test_options_from_config() {
        let config = RankingConfig {
            parallel: false,
            top_k: 5,
            skip_missing: true,
        };
        let options = RankOptions::from(&config);
        assert_eq!(options.top_k, Some(5));
        assert!(options.skip_missing);
        assert!(!options.parallel);
    }
}

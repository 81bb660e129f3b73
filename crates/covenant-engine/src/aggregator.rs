//! Dataset aggregation
//!
//! Walks datasets → entities → filing types, analyzes every document the
//! [`FilingSource`] returns, and folds the results into an [`Aggregation`].
//! A failing document or pair is logged and recorded; the run continues.
//!
//! The accumulator is an explicit value: each pair produces its own
//! `Aggregation` which is merged into the running one. Merging is
//! commutative over keyword counts, so pairs could be analyzed in parallel
//! and reduced afterwards.

use crate::analyzer::{FilingAnalyzer, FilingContext, FilingOutcome};
use crate::source::FilingSource;
use filing_types::{FilingRecord, FilingType, KeywordCounts};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// A labelled group of entity identifiers (CIKs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub entities: Vec<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, entities: Vec<String>) -> Self {
        Self {
            label: label.into(),
            entities,
        }
    }
}

/// A document or pair that could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub dataset: String,
    pub entity_id: String,
    pub filing_type: FilingType,
    /// `None` when the whole pair failed to load
    pub document: Option<PathBuf>,
    pub reason: String,
}

/// Result table, global keyword frequency, and the failure log of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub records: Vec<FilingRecord>,
    pub keyword_frequency: KeywordCounts,
    pub failures: Vec<FailureRecord>,
    /// Documents left out by the inclusion filter
    pub skipped: usize,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one analyzed document
    pub fn absorb(&mut self, record: FilingRecord, keyword_counts: &KeywordCounts) {
        self.records.push(record);
        self.keyword_frequency.merge(keyword_counts);
    }

    /// Fold another aggregation into this one
    pub fn merge(&mut self, other: Aggregation) {
        self.records.extend(other.records);
        self.keyword_frequency.merge(&other.keyword_frequency);
        self.failures.extend(other.failures);
        self.skipped += other.skipped;
    }

    pub fn violation_records(&self) -> impl Iterator<Item = &FilingRecord> {
        self.records.iter().filter(|r| r.has_violation)
    }
}

/// Position of the entity just finished, for progress and checkpoints
#[derive(Debug, Clone, Copy)]
pub struct EntityProgress<'a> {
    pub dataset: &'a str,
    pub entity_id: &'a str,
    /// 1-based position within the dataset
    pub position: usize,
    pub total: usize,
}

/// Runs a [`FilingAnalyzer`] over every document of every dataset
pub struct DatasetAggregator<S> {
    source: S,
    analyzer: FilingAnalyzer,
}

impl<S: FilingSource> DatasetAggregator<S> {
    pub fn new(source: S, analyzer: FilingAnalyzer) -> Self {
        Self { source, analyzer }
    }

    pub fn run(&self, datasets: &[Dataset], filing_types: &[FilingType]) -> Aggregation {
        self.run_with(datasets, filing_types, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_entity` with the running totals
    /// after each entity
    pub fn run_with<F>(
        &self,
        datasets: &[Dataset],
        filing_types: &[FilingType],
        mut on_entity: F,
    ) -> Aggregation
    where
        F: FnMut(&EntityProgress<'_>, &Aggregation),
    {
        let mut total = Aggregation::new();

        for dataset in datasets {
            info!("*******Processing DataSet={}*******", dataset.label);
            for (i, entity_id) in dataset.entities.iter().enumerate() {
                for &filing_type in filing_types {
                    info!(
                        "{}: Processing cik={} Filing_Type={}",
                        i + 1,
                        entity_id,
                        filing_type
                    );
                    total.merge(self.analyze_pair(&dataset.label, entity_id, filing_type));
                }
                let progress = EntityProgress {
                    dataset: &dataset.label,
                    entity_id,
                    position: i + 1,
                    total: dataset.entities.len(),
                };
                on_entity(&progress, &total);
            }
            info!("*******Processing DataSet={} Finished*******", dataset.label);
        }

        info!(
            records = total.records.len(),
            skipped = total.skipped,
            failures = total.failures.len(),
            "Aggregation complete"
        );
        total
    }

    /// Analyze every document of one (entity, filing type) pair
    pub fn analyze_pair(
        &self,
        dataset: &str,
        entity_id: &str,
        filing_type: FilingType,
    ) -> Aggregation {
        let mut pair = Aggregation::new();

        let documents = match self.source.documents(entity_id, filing_type) {
            Ok(documents) => documents,
            Err(e) => {
                warn!(
                    "Error occurred! Skipping cik={} Filing_Type={}: {}",
                    entity_id, filing_type, e
                );
                pair.failures.push(FailureRecord {
                    dataset: dataset.to_string(),
                    entity_id: entity_id.to_string(),
                    filing_type,
                    document: None,
                    reason: e.to_string(),
                });
                return pair;
            }
        };

        let context = FilingContext {
            dataset,
            entity_id,
            filing_type,
        };
        for document in &documents {
            match self.analyzer.analyze(document, context) {
                Ok(FilingOutcome::Analyzed(analyzed)) => {
                    let analyzed = *analyzed;
                    pair.absorb(analyzed.record, &analyzed.violations.keyword_counts);
                }
                Ok(FilingOutcome::Skipped(_)) => pair.skipped += 1,
                Err(e) => {
                    warn!(
                        "Error occurred! Skipping file={} cik={} Filing_Type={}: {}",
                        document.path.display(),
                        entity_id,
                        filing_type,
                        e
                    );
                    pair.failures.push(FailureRecord {
                        dataset: dataset.to_string(),
                        entity_id: entity_id.to_string(),
                        filing_type,
                        document: Some(document.path.clone()),
                        reason: e.to_string(),
                    });
                }
            }
        }
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use crate::source::FilingDocument;
    use filing_types::Keyword;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory source backed by files in a temp dir
    struct FixtureSource {
        _dir: TempDir,
        pairs: HashMap<(String, FilingType), Vec<FilingDocument>>,
    }

    impl FixtureSource {
        fn new(files: &[(&str, FilingType, &str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut pairs: HashMap<(String, FilingType), Vec<FilingDocument>> = HashMap::new();
            for (n, (entity, filing_type, name, text)) in files.iter().enumerate() {
                let path = dir.path().join(format!("{}-{}", n, name));
                fs::write(&path, text).unwrap();
                pairs
                    .entry((entity.to_string(), *filing_type))
                    .or_default()
                    .push(FilingDocument { path, url: None });
            }
            Self { _dir: dir, pairs }
        }
    }

    impl FilingSource for FixtureSource {
        fn documents(
            &self,
            entity_id: &str,
            filing_type: FilingType,
        ) -> Result<Vec<FilingDocument>, RetrievalError> {
            self.pairs
                .get(&(entity_id.to_string(), filing_type))
                .cloned()
                .ok_or_else(|| RetrievalError::NotCached {
                    entity_id: entity_id.to_string(),
                    filing_type,
                    path: PathBuf::from(entity_id),
                })
        }
    }

    fn filing(date: &str, form_type: &str, body: &str) -> String {
        format!(
            "FILED AS OF DATE: {date}\nCOMPANY CONFORMED NAME: TEST CO\nFORM TYPE: {form_type}\n\
             BUSINESS ADDRESS:\nZIP: 10001\nMAIL ADDRESS:\n{body}"
        )
    }

    #[test]
    fn test_run_collects_records_and_frequencies() {
        let source = FixtureSource::new(&[
            ("1", FilingType::Form10K, "a.txt", &filing("20100101", "10-K", "covenant\nwaiver\n")),
            ("1", FilingType::Form10Q, "b.txt", &filing("20100501", "10-Q", "covenant\n")),
            ("2", FilingType::Form10K, "c.txt", &filing("20110101", "10-K", "violation\n")),
        ]);
        let aggregator = DatasetAggregator::new(source, FilingAnalyzer::default());
        let datasets = vec![Dataset::new("Group", vec!["1".into(), "2".into()])];

        let result = aggregator.run(&datasets, &FilingType::ALL);

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.violation_records().count(), 1);
        assert_eq!(result.keyword_frequency.get(Keyword::Covenant), 2);
        assert_eq!(result.keyword_frequency.get(Keyword::Waiv), 1);
        assert_eq!(result.keyword_frequency.get(Keyword::Viol), 1);
        // Entity 2 has no 10-Q in the cache
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].entity_id, "2");
        assert_eq!(result.failures[0].document, None);
    }

    #[test]
    fn test_bad_document_does_not_stop_the_pair() {
        let source = FixtureSource::new(&[
            ("1", FilingType::Form10K, "broken.txt", "no header here\n"),
            ("1", FilingType::Form10K, "good.txt", &filing("20120101", "10-K", "text\n")),
            ("1", FilingType::Form10K, "old.txt", &filing("20010101", "10-K", "text\n")),
        ]);
        let aggregator = DatasetAggregator::new(source, FilingAnalyzer::default());
        let result = aggregator.analyze_pair("Group", "1", FilingType::Form10K);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].reason.contains("Incomplete header"));
        assert!(result.failures[0].document.is_some());
    }

    #[test]
    fn test_records_carry_dataset_label() {
        let source = FixtureSource::new(&[
            ("1", FilingType::Form10K, "a.txt", &filing("20100101", "10-K", "")),
            ("9", FilingType::Form10K, "b.txt", &filing("20100101", "10-K", "")),
        ]);
        let aggregator = DatasetAggregator::new(source, FilingAnalyzer::default());
        let datasets = vec![
            Dataset::new("Reference", vec!["1".into()]),
            Dataset::new("Sampled", vec!["9".into()]),
        ];
        let result = aggregator.run(&datasets, &[FilingType::Form10K]);
        let labels: Vec<_> = result.records.iter().map(|r| r.dataset.as_str()).collect();
        assert_eq!(labels, vec!["Reference", "Sampled"]);
    }

    #[test]
    fn test_observer_sees_each_entity() {
        let source = FixtureSource::new(&[]);
        let aggregator = DatasetAggregator::new(source, FilingAnalyzer::default());
        let datasets = vec![Dataset::new("G", vec!["1".into(), "2".into(), "3".into()])];

        let mut seen = Vec::new();
        let result = aggregator.run_with(&datasets, &[FilingType::Form10K], |progress, totals| {
            seen.push((progress.position, progress.total, totals.failures.len()));
        });

        assert_eq!(seen, vec![(1, 3, 1), (2, 3, 2), (3, 3, 3)]);
        assert_eq!(result.failures.len(), 3);
    }

    #[test]
    fn test_merge_order_does_not_change_frequencies() {
        let mut a = Aggregation::new();
        let mut counts = KeywordCounts::new();
        counts.set(Keyword::Covenant, 2);
        a.keyword_frequency.merge(&counts);

        let mut b = Aggregation::new();
        let mut counts = KeywordCounts::new();
        counts.set(Keyword::Modif, 5);
        b.keyword_frequency.merge(&counts);
        b.skipped = 1;

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab.keyword_frequency, ba.keyword_frequency);
        assert_eq!(ab.skipped, ba.skipped);
    }
}

//! Intermediate result files for long scans
//!
//! After each entity the running aggregation is written to
//! `result_<n>.json`. Once the final report is out the checkpoints are
//! removed.

use anyhow::Context;
use covenant_engine::Aggregation;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CheckpointWriter {
    dir: PathBuf,
}

impl CheckpointWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, position: usize) -> PathBuf {
        self.dir.join(format!("result_{}.json", position))
    }

    /// Write the running totals after the entity at `position`
    pub fn write(&self, position: usize, totals: &Aggregation) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(position);
        let json = serde_json::to_string(totals)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write checkpoint {}", path.display()))?;
        debug!(path = %path.display(), records = totals.records.len(), "Checkpoint written");
        Ok(path)
    }

    /// Delete every checkpoint file, returning how many were removed.
    ///
    /// A file that cannot be deleted is logged and left behind.
    pub fn cleanup(&self) -> anyhow::Result<usize> {
        let pattern = self.dir.join("result_*.json");
        let pattern = pattern.to_string_lossy();
        let mut removed = 0;
        for entry in glob::glob(&pattern).context("Invalid checkpoint pattern")? {
            match entry {
                Ok(path) => match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Error while deleting file {}: {}", path.display(), e),
                },
                Err(e) => warn!("Error while listing checkpoints: {}", e),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filing_types::{FilingRecord, FilingType, Keyword, KeywordCounts};

    fn totals() -> Aggregation {
        let mut totals = Aggregation::new();
        let mut counts = KeywordCounts::new();
        counts.set(Keyword::Covenant, 3);
        totals.absorb(
            FilingRecord {
                entity_id: "1".to_string(),
                company_name: "A".to_string(),
                address: String::new(),
                postal_code: None,
                year: 2010,
                quarter: None,
                url: None,
                filing_type: FilingType::Form10K,
                dataset: "G".to_string(),
                has_violation: false,
                violation_count: 0,
            },
            &counts,
        );
        totals
    }

    #[test]
    fn test_write_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CheckpointWriter::new(dir.path().join("checkpoints"));

        let first = writer.write(1, &totals()).unwrap();
        writer.write(2, &totals()).unwrap();
        fs::write(writer.dir().join("result.json"), "{}").unwrap();

        let restored: Aggregation =
            serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(restored, totals());

        assert_eq!(writer.cleanup().unwrap(), 2);
        assert!(!first.exists());
        // The final result is not a checkpoint
        assert!(writer.dir().join("result.json").exists());
    }

    #[test]
    fn test_cleanup_without_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CheckpointWriter::new(dir.path());
        assert_eq!(writer.cleanup().unwrap(), 0);
    }
}

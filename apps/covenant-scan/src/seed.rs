//! Sampled dataset selection from a violation-history seed file
//!
//! The seed file is a JSON array of rows such as
//! `{"cik": 12345, "date": "2009-03-31", "form_type": "10-K"}`. Rows are
//! filtered by date and form type, deduplicated per entity keeping the last
//! row, optionally stripped of entities that already appear in a fixed
//! dataset, and then a fixed-size subset is drawn.

use crate::config::SampledConfig;
use anyhow::Context;
use chrono::NaiveDate;
use covenant_engine::patterns::ACCEPTED_FORM_TYPES;
use covenant_engine::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// CIKs show up both as numbers and as strings in exported sheets
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Cik {
    Number(u64),
    Text(String),
}

impl From<Cik> for String {
    fn from(cik: Cik) -> Self {
        match cik {
            Cik::Number(n) => n.to_string(),
            Cik::Text(s) => s.trim().to_string(),
        }
    }
}

/// One row of the violation-history seed file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryRow {
    #[serde(deserialize_with = "deserialize_cik")]
    pub cik: String,
    pub date: NaiveDate,
    #[serde(alias = "formtype")]
    pub form_type: String,
}

fn deserialize_cik<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Cik::deserialize(deserializer).map(String::from)
}

/// Read the seed file
pub fn load_history<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<HistoryRow>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))
}

/// Entities eligible for sampling, in order of their last qualifying row
pub fn eligible_entities(
    rows: &[HistoryRow],
    start_date: NaiveDate,
    exclude: &HashSet<&str>,
) -> Vec<String> {
    let qualifying: Vec<&HistoryRow> = rows
        .iter()
        .filter(|row| row.date >= start_date)
        .filter(|row| ACCEPTED_FORM_TYPES.contains(&row.form_type.as_str()))
        .collect();

    let last_index: HashMap<&str, usize> = qualifying
        .iter()
        .enumerate()
        .map(|(i, row)| (row.cik.as_str(), i))
        .collect();

    qualifying
        .iter()
        .enumerate()
        .filter(|(i, row)| last_index.get(row.cik.as_str()) == Some(i))
        .filter(|(_, row)| !exclude.contains(row.cik.as_str()))
        .map(|(_, row)| row.cik.clone())
        .collect()
}

/// Draw up to `size` distinct entities
pub fn sample_entities<R: Rng + ?Sized>(
    candidates: &[String],
    size: usize,
    rng: &mut R,
) -> Vec<String> {
    candidates.choose_multiple(rng, size).cloned().collect()
}

/// Build the sampled dataset described by `config`
pub fn sampled_dataset(config: &SampledConfig, fixed: &[Dataset]) -> anyhow::Result<Dataset> {
    let rows = load_history(&config.seed_file)?;

    let exclude: HashSet<&str> = if config.exclude_reference {
        fixed
            .iter()
            .flat_map(|d| d.entities.iter().map(String::as_str))
            .collect()
    } else {
        HashSet::new()
    };

    let candidates = eligible_entities(&rows, config.start_date, &exclude);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let entities = sample_entities(&candidates, config.size, &mut rng);

    info!(
        rows = rows.len(),
        candidates = candidates.len(),
        sampled = entities.len(),
        "Built sampled dataset {}",
        config.label
    );
    Ok(Dataset::new(config.label.clone(), entities))
}

//! Configuration parsing for scan runs
//!
//! A scan is described by a TOML file: where the filing cache lives, which
//! filing types to analyze, the fixed datasets, and optionally a sampled
//! dataset drawn from a violation-history seed file.

use anyhow::Context;
use chrono::NaiveDate;
use covenant_engine::patterns::{
    ACCEPTED_FORM_TYPES, HEADER_LINE_BUDGET, MIN_FILING_YEAR,
};
use covenant_engine::{AnalyzerConfig, Dataset};
use filing_types::FilingType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cache location, filing types and inclusion filters
    #[serde(default)]
    pub scan: ScanConfig,
    /// Fixed datasets, analyzed in order
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// Dataset drawn from a violation-history seed file
    #[serde(default)]
    pub sampled: Option<SampledConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Analyzer settings derived from the `[scan]` table
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            min_year: self.scan.min_year,
            accepted_form_types: self.scan.accepted_form_types.clone(),
            header_line_budget: self.scan.header_line_budget,
        }
    }
}

/// The `[scan]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root of the `<cik>_<form>/` filing cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Filing types requested per entity
    #[serde(default = "default_filing_types")]
    pub filing_types: Vec<FilingType>,
    /// Filings from earlier years are skipped (default: 2007)
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Header form types that are analyzed (default: 10-K, 10-Q)
    #[serde(default = "default_accepted_form_types")]
    pub accepted_form_types: Vec<String>,
    /// Lines searched for header fields (default: 100)
    #[serde(default = "default_header_line_budget")]
    pub header_line_budget: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            filing_types: default_filing_types(),
            min_year: default_min_year(),
            accepted_form_types: default_accepted_form_types(),
            header_line_budget: default_header_line_budget(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/company_filings")
}

fn default_filing_types() -> Vec<FilingType> {
    FilingType::ALL.to_vec()
}

fn default_min_year() -> i32 {
    MIN_FILING_YEAR
}

fn default_accepted_form_types() -> Vec<String> {
    ACCEPTED_FORM_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_header_line_budget() -> usize {
    HEADER_LINE_BUDGET
}

/// The `[sampled]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledConfig {
    /// Dataset label for the sampled entities
    #[serde(default = "default_sampled_label")]
    pub label: String,
    /// JSON array of `{cik, date, form_type}` rows
    pub seed_file: PathBuf,
    /// Number of entities drawn (default: 70)
    #[serde(default = "default_sample_size")]
    pub size: usize,
    /// Rows dated before this are ignored (default: 2007-01-01)
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// RNG seed; a fresh seed is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Leave out entities already in a fixed dataset (default: true)
    #[serde(default = "default_exclude_reference")]
    pub exclude_reference: bool,
}

fn default_sampled_label() -> String {
    "Sec Covenant Violation".to_string()
}

fn default_sample_size() -> usize {
    70
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2007, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_exclude_reference() -> bool {
    true
}

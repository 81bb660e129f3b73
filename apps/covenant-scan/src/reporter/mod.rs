//! Scan result reporting
//!
//! Formats the result table, the keyword frequency table and the failure
//! log in one of several formats.
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable, one object for the whole run
//! - **Console**: Human-readable tables and frequency bars
//! - **Markdown**: Tables for sharing in documents

mod console;
mod json;
mod markdown;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use covenant_engine::{Aggregation, Dataset, FailureRecord};
use filing_types::{FilingRecord, FilingType, KeywordCounts};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Per-dataset totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub label: String,
    pub entities: usize,
    pub records: usize,
    pub with_violation: usize,
}

/// Everything a finished scan produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResults {
    pub started_at: String,
    pub finished_at: String,
    pub filing_types: Vec<FilingType>,
    pub datasets: Vec<DatasetSummary>,
    pub records: Vec<FilingRecord>,
    pub keyword_frequency: KeywordCounts,
    pub failures: Vec<FailureRecord>,
    pub skipped: usize,
}

impl ScanResults {
    pub fn new(
        started_at: DateTime<Utc>,
        datasets: &[Dataset],
        filing_types: &[FilingType],
        aggregation: Aggregation,
    ) -> Self {
        let summaries = datasets
            .iter()
            .map(|dataset| {
                let records = aggregation
                    .records
                    .iter()
                    .filter(|r| r.dataset == dataset.label);
                DatasetSummary {
                    label: dataset.label.clone(),
                    entities: dataset.entities.len(),
                    records: records.clone().count(),
                    with_violation: records.filter(|r| r.has_violation).count(),
                }
            })
            .collect();

        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            filing_types: filing_types.to_vec(),
            datasets: summaries,
            records: aggregation.records,
            keyword_frequency: aggregation.keyword_frequency,
            failures: aggregation.failures,
            skipped: aggregation.skipped,
        }
    }
}

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console tables
    #[default]
    Console,
    /// Markdown tables
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "json_pretty" => Ok(OutputFormat::JsonPretty),
            "console" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(anyhow!(
                "Unknown output format: {}. Use json, json-pretty, console or markdown",
                other
            )),
        }
    }
}

/// Reporter for scan results
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report results to stdout
    pub fn report(&self, results: &ScanResults) -> Result<()> {
        let output = self.format_results(results)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, results: &ScanResults, path: P) -> Result<()> {
        let output = self.format_results(results)?;
        fs::write(path, output)?;
        Ok(())
    }

    pub fn format_results(&self, results: &ScanResults) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(results, false),
            OutputFormat::JsonPretty => JsonReporter::format(results, true),
            OutputFormat::Console => ConsoleReporter::format(results),
            OutputFormat::Markdown => MarkdownReporter::format(results),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

//! Console reporter for scan results
//!
//! Plain ASCII tables plus a bar chart of keyword frequencies.

use anyhow::Result;
use filing_types::{FilingRecord, KeywordCounts};
use std::fmt::Write;

use super::ScanResults;

const BAR_WIDTH: u64 = 40;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format(results: &ScanResults) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                  COVENANT VIOLATION SCAN                     ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Started:   {}", results.started_at)?;
        writeln!(output, "Finished:  {}", results.finished_at)?;
        let types: Vec<_> = results.filing_types.iter().map(|t| t.as_str()).collect();
        writeln!(output, "Filings:   {}", types.join(", "))?;
        writeln!(output)?;

        writeln!(output, "Datasets:")?;
        for dataset in &results.datasets {
            writeln!(
                output,
                "  {:<30} {:>4} entities  {:>5} filings  {:>5} with violations",
                dataset.label, dataset.entities, dataset.records, dataset.with_violation
            )?;
        }
        writeln!(output)?;

        Self::format_records(&mut output, &results.records)?;
        Self::format_frequency(&mut output, &results.keyword_frequency)?;

        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Skipped by filter: {}", results.skipped)?;
        if !results.failures.is_empty() {
            writeln!(output)?;
            writeln!(output, "Failures:")?;
            for failure in &results.failures {
                let document = failure
                    .document
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    output,
                    "  • cik={} filing_type={} file={}: {}",
                    failure.entity_id, failure.filing_type, document, failure.reason
                )?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_records(output: &mut String, records: &[FilingRecord]) -> Result<()> {
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(
            output,
            "{:<10} {:<30} {:<6} {:<4} {:<5} {:<8} {:>10}",
            "CIK", "Firm", "Year", "Qtr", "Type", "Zip", "Violations"
        )?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        for record in records {
            writeln!(
                output,
                "{:<10} {:<30} {:<6} {:<4} {:<5} {:<8} {:>10}",
                record.entity_id,
                truncate(&record.company_name, 30),
                record.year,
                record.quarter.map(|q| q.to_string()).unwrap_or_default(),
                record.filing_type.as_str(),
                record.postal_code.as_deref().unwrap_or(""),
                record.violation_count
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_frequency(output: &mut String, frequency: &KeywordCounts) -> Result<()> {
        writeln!(output, "Keyword frequency:")?;
        let max = frequency.iter().map(|(_, v)| v).max().unwrap_or(0).max(1);
        for (keyword, count) in frequency.iter() {
            let bar = "█".repeat((count * BAR_WIDTH / max) as usize);
            writeln!(output, "  {:<18} {:>7} {}", keyword.as_str(), count, bar)?;
        }
        writeln!(output)?;
        Ok(())
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

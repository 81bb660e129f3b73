//! Markdown reporter for scan results

use anyhow::Result;
use std::fmt::Write;

use super::ScanResults;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(results: &ScanResults) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Covenant Violation Scan")?;
        writeln!(output)?;
        writeln!(output, "- **Started:** {}", results.started_at)?;
        writeln!(output, "- **Finished:** {}", results.finished_at)?;
        writeln!(output, "- **Skipped by filter:** {}", results.skipped)?;
        writeln!(output)?;

        writeln!(output, "## Datasets")?;
        writeln!(output)?;
        writeln!(output, "| Dataset | Entities | Filings | With violations |")?;
        writeln!(output, "|---|---:|---:|---:|")?;
        for dataset in &results.datasets {
            writeln!(
                output,
                "| {} | {} | {} | {} |",
                dataset.label, dataset.entities, dataset.records, dataset.with_violation
            )?;
        }
        writeln!(output)?;

        writeln!(output, "## Filings")?;
        writeln!(output)?;
        writeln!(
            output,
            "| cik | firm name | firm address | zip code | year | quarter | url | filing type | dataset | has covenant violation | total violations |"
        )?;
        writeln!(output, "|---|---|---|---|---:|---|---|---|---|---:|---:|")?;
        for record in &results.records {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                record.entity_id,
                escape(&record.company_name),
                escape(&record.address).replace('\n', "<br>"),
                record.postal_code.as_deref().unwrap_or(""),
                record.year,
                record.quarter.map(|q| q.to_string()).unwrap_or_default(),
                record.url.as_deref().unwrap_or(""),
                record.filing_type,
                escape(&record.dataset),
                u8::from(record.has_violation),
                record.violation_count
            )?;
        }
        writeln!(output)?;

        writeln!(output, "## Keyword frequency")?;
        writeln!(output)?;
        writeln!(output, "| Keyword | Lines |")?;
        writeln!(output, "|---|---:|")?;
        for (keyword, count) in results.keyword_frequency.iter() {
            writeln!(output, "| {} | {} |", keyword, count)?;
        }

        if !results.failures.is_empty() {
            writeln!(output)?;
            writeln!(output, "## Failures")?;
            writeln!(output)?;
            for failure in &results.failures {
                writeln!(
                    output,
                    "- cik={} filing_type={}: {}",
                    failure.entity_id,
                    failure.filing_type,
                    escape(&failure.reason)
                )?;
            }
        }

        Ok(output)
    }
}

fn escape(s: &str) -> String {
    s.replace('|', "\\|")
}

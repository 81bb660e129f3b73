//! Per-document analysis: header extraction, inclusion filter, covenant rule
//!
//! [`FilingAnalyzer`] turns one filing into either a [`FilingRecord`] plus the
//! document's keyword counts, or a deliberate skip. Header problems are
//! errors for that document; the caller decides whether the run goes on.

use crate::error::{AnalysisError, HeaderError};
use crate::extractors::HeaderFieldParser;
use crate::patterns::{ACCEPTED_FORM_TYPES, HEADER_LINE_BUDGET, MIN_FILING_YEAR};
use crate::rules::ViolationDetector;
use crate::source::FilingDocument;
use filing_types::{FilingHeader, FilingRecord, FilingType, KeywordCounts, ViolationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Inclusion rules and header scan size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Filings from earlier years are skipped
    pub min_year: i32,
    /// Header form types that are analyzed
    pub accepted_form_types: Vec<String>,
    /// Lines searched for header markers
    pub header_line_budget: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_year: MIN_FILING_YEAR,
            accepted_form_types: ACCEPTED_FORM_TYPES.iter().map(|s| s.to_string()).collect(),
            header_line_budget: HEADER_LINE_BUDGET,
        }
    }
}

/// Where a document came from, carried into its record
#[derive(Debug, Clone, Copy)]
pub struct FilingContext<'a> {
    pub dataset: &'a str,
    pub entity_id: &'a str,
    pub filing_type: FilingType,
}

/// Why a readable document was left out of the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    BeforeMinYear { year: i32, min_year: i32 },
    UnsupportedFormType { form_type: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BeforeMinYear { year, min_year } => {
                write!(f, "year={} is before {}", year, min_year)
            }
            SkipReason::UnsupportedFormType { form_type } => {
                write!(f, "form_type={} is not analyzed", form_type)
            }
        }
    }
}

/// A document that passed the inclusion filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedFiling {
    pub header: FilingHeader,
    pub record: FilingRecord,
    pub violations: ViolationResult,
}

impl AnalyzedFiling {
    /// Per-keyword line counts to fold into a running total
    pub fn keyword_counts(&self) -> &KeywordCounts {
        &self.violations.keyword_counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingOutcome {
    Analyzed(Box<AnalyzedFiling>),
    Skipped(SkipReason),
}

/// Combines header extraction and the covenant rule for single documents
#[derive(Debug, Clone)]
pub struct FilingAnalyzer {
    config: AnalyzerConfig,
    header_parser: HeaderFieldParser,
    detector: ViolationDetector,
}

impl FilingAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let header_parser = HeaderFieldParser::new().with_line_budget(config.header_line_budget);
        Self {
            config,
            header_parser,
            detector: ViolationDetector::new(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Read and analyze a document from disk
    pub fn analyze(
        &self,
        document: &FilingDocument,
        context: FilingContext<'_>,
    ) -> Result<FilingOutcome, AnalysisError> {
        let text = std::fs::read_to_string(&document.path).map_err(|source| AnalysisError::Io {
            path: document.path.clone(),
            source,
        })?;
        debug!(
            path = %document.path.display(),
            bytes = text.len(),
            "Analyzing filing"
        );
        Ok(self.analyze_text(&text, document.url.as_deref(), context)?)
    }

    /// Analyze a document already in memory
    pub fn analyze_text(
        &self,
        text: &str,
        url: Option<&str>,
        context: FilingContext<'_>,
    ) -> Result<FilingOutcome, HeaderError> {
        let header = self.header_parser.parse(text.lines())?;

        if let Some(reason) = self.skip_reason(&header) {
            info!(
                cik = context.entity_id,
                filing_type = %context.filing_type,
                "Skipping file. {}",
                reason
            );
            return Ok(FilingOutcome::Skipped(reason));
        }

        let violations = self.detector.detect(text.lines());
        let record = FilingRecord {
            entity_id: context.entity_id.to_string(),
            company_name: header.company_name.clone(),
            address: header.address_text(),
            postal_code: header.postal_code.clone(),
            year: header.year,
            quarter: context.filing_type.is_quarterly().then_some(header.quarter),
            url: url.map(str::to_string),
            filing_type: context.filing_type,
            dataset: context.dataset.to_string(),
            has_violation: violations.has_violation(),
            violation_count: violations.violation_count,
        };

        Ok(FilingOutcome::Analyzed(Box::new(AnalyzedFiling {
            header,
            record,
            violations,
        })))
    }

    fn skip_reason(&self, header: &FilingHeader) -> Option<SkipReason> {
        if header.year < self.config.min_year {
            return Some(SkipReason::BeforeMinYear {
                year: header.year,
                min_year: self.config.min_year,
            });
        }
        if !self
            .config
            .accepted_form_types
            .iter()
            .any(|accepted| accepted == &header.form_type)
        {
            return Some(SkipReason::UnsupportedFormType {
                form_type: header.form_type.clone(),
            });
        }
        None
    }
}

impl Default for FilingAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

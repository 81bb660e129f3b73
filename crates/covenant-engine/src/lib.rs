//! Covenant Engine - loan-covenant violation scanning for EDGAR filings
//!
//! This crate provides:
//! - Header field extraction from the SEC-HEADER block
//! - Keyword occurrence indexing and the covenant proximity rule
//! - Per-filing analysis with year and form-type inclusion filters
//! - Dataset aggregation into a result table and keyword frequencies
//! - A filing source seam with an on-disk cache reader

pub mod aggregator;
pub mod analyzer;
pub mod calendar;
pub mod error;
pub mod extractors;
pub mod patterns;
pub mod rules;
pub mod source;

// Re-export commonly used types
pub use aggregator::{Aggregation, Dataset, DatasetAggregator, EntityProgress, FailureRecord};
pub use analyzer::{
    AnalyzedFiling, AnalyzerConfig, FilingAnalyzer, FilingContext, FilingOutcome, SkipReason,
};
pub use error::{AnalysisError, HeaderError, HeaderField, RetrievalError};
pub use extractors::{HeaderFieldParser, KeywordIndex};
pub use rules::ViolationDetector;
pub use source::{FilingDocument, FilingSource, LocalCacheSource};

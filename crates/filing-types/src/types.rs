use crate::keyword::{Keyword, KeywordCounts};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Periodic report families the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilingType {
    #[serde(rename = "10-K")]
    Form10K,
    #[serde(rename = "10-Q")]
    Form10Q,
}

impl FilingType {
    pub const ALL: [FilingType; 2] = [FilingType::Form10K, FilingType::Form10Q];

    /// Form type as written in a filing header, e.g. "10-K"
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Form10K => "10-K",
            FilingType::Form10Q => "10-Q",
        }
    }

    /// Quarterly filings carry a quarter in their records
    pub fn is_quarterly(&self) -> bool {
        matches!(self, FilingType::Form10Q)
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filing type: {0}")]
pub struct UnknownFilingType(pub String);

impl FromStr for FilingType {
    type Err = UnknownFilingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "10-K" | "10K" => Ok(FilingType::Form10K),
            "10-Q" | "10Q" => Ok(FilingType::Form10Q),
            _ => Err(UnknownFilingType(s.to_string())),
        }
    }
}

/// Calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Months 1-3 are Q1, 4-6 Q2, 7-9 Q3 and 10-12 Q4
    pub fn from_month(month: u32) -> Option<Quarter> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn of_date(date: NaiveDate) -> Quarter {
        // chrono months are always 1..=12
        Self::from_month(date.month()).unwrap_or(Quarter::Q4)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(s)
    }
}

/// Metadata block at the top of an EDGAR submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingHeader {
    pub filing_date: NaiveDate,
    pub company_name: String,
    pub mailing_address: Vec<String>, // Trimmed lines of the BUSINESS ADDRESS block
    pub form_type: String,
    pub year: i32,
    pub quarter: Quarter,
    pub postal_code: Option<String>,
}

impl FilingHeader {
    /// Address lines joined with newlines
    pub fn address_text(&self) -> String {
        self.mailing_address.join("\n")
    }
}

/// Outcome of running the covenant proximity rule over one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationResult {
    /// Distinct covenant lines with at least one risk term nearby
    pub violation_count: usize,
    /// Lines hit per keyword, all six keywords present
    pub keyword_counts: KeywordCounts,
    /// Flagged covenant line (1-based) -> risk terms found near it
    pub flagged_lines: BTreeMap<usize, BTreeSet<Keyword>>,
}

impl ViolationResult {
    /// Result for a document that never mentions a covenant
    pub fn none(keyword_counts: KeywordCounts) -> Self {
        Self {
            violation_count: 0,
            keyword_counts,
            flagged_lines: BTreeMap::new(),
        }
    }

    pub fn has_violation(&self) -> bool {
        self.violation_count > 0
    }
}

/// One row of the result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub entity_id: String, // CIK
    pub company_name: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub year: i32,
    pub quarter: Option<Quarter>, // Only set for quarterly filings
    pub url: Option<String>,
    pub filing_type: FilingType,
    pub dataset: String,
    pub has_violation: bool,
    pub violation_count: usize,
}

//! Error types for filing analysis and retrieval

use filing_types::FilingType;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Required header fields, named as they appear in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    FilingDate,
    CompanyName,
    MailingAddress,
    FormType,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::FilingDate => "filing_date",
            HeaderField::CompanyName => "company_name",
            HeaderField::MailingAddress => "mailing_address",
            HeaderField::FormType => "form_type",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_fields(fields: &[HeaderField]) -> String {
    fields
        .iter()
        .map(HeaderField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A document whose header cannot be used. Fatal for that document only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Incomplete header, missing: {}", join_fields(.missing))]
    Incomplete { missing: Vec<HeaderField> },

    #[error("Invalid filing date: {value:?}")]
    InvalidFilingDate { value: String },
}

impl HeaderError {
    /// Missing fields for an incomplete header, empty otherwise
    pub fn missing_fields(&self) -> &[HeaderField] {
        match self {
            HeaderError::Incomplete { missing } => missing,
            HeaderError::InvalidFilingDate { .. } => &[],
        }
    }
}

/// Failure to analyze a single document
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Header(#[from] HeaderError),
}

/// Failure to obtain the documents for an (entity, filing type) pair
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("No cached filings for cik={entity_id} filing_type={filing_type} at {}", .path.display())]
    NotCached {
        entity_id: String,
        filing_type: FilingType,
        path: PathBuf,
    },

    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_header_names_missing_fields() {
        let err = HeaderError::Incomplete {
            missing: vec![HeaderField::MailingAddress, HeaderField::FormType],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete header, missing: mailing_address, form_type"
        );
        assert_eq!(err.missing_fields().len(), 2);
    }
}

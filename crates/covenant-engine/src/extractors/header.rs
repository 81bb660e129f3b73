//! Header field extraction from the SEC-HEADER block of a filing
//!
//! The scan is a small state machine over the first lines of a document:
//! it looks for labelled markers, switches into an address read-ahead when
//! it sees `BUSINESS ADDRESS:`, and stops as soon as every required field
//! has been seen or the line budget runs out.

use crate::calendar::{filing_period, parse_filing_date};
use crate::error::{HeaderError, HeaderField};
use crate::patterns::{
    label_value, ADDRESS_READ_AHEAD, BUSINESS_ADDRESS, COMPANY_CONFORMED_NAME, FILED_AS_OF_DATE,
    FORM_TYPE, HEADER_LINE_BUDGET, MAIL_ADDRESS, ZIP_PREFIX,
};
use filing_types::FilingHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingMarker,
    /// Collecting address lines; `remaining` more may be read
    ReadingAddress { remaining: usize },
    Done,
}

#[derive(Debug, Default)]
struct PartialHeader {
    filing_date: Option<String>,
    company_name: Option<String>,
    mailing_address: Option<Vec<String>>,
    form_type: Option<String>,
}

impl PartialHeader {
    fn missing(&self) -> Vec<HeaderField> {
        let mut missing = Vec::new();
        if self.filing_date.is_none() {
            missing.push(HeaderField::FilingDate);
        }
        if self.company_name.is_none() {
            missing.push(HeaderField::CompanyName);
        }
        if self.mailing_address.is_none() {
            missing.push(HeaderField::MailingAddress);
        }
        if self.form_type.is_none() {
            missing.push(HeaderField::FormType);
        }
        missing
    }

    fn is_complete(&self) -> bool {
        self.filing_date.is_some()
            && self.company_name.is_some()
            && self.mailing_address.is_some()
            && self.form_type.is_some()
    }

    fn next_state(&self) -> ScanState {
        if self.is_complete() {
            ScanState::Done
        } else {
            ScanState::SeekingMarker
        }
    }

    fn finish(self) -> Result<FilingHeader, HeaderError> {
        let (Some(date), Some(company_name), Some(mailing_address), Some(form_type)) = (
            self.filing_date.as_deref(),
            self.company_name.clone(),
            self.mailing_address.clone(),
            self.form_type.clone(),
        ) else {
            return Err(HeaderError::Incomplete {
                missing: self.missing(),
            });
        };

        let filing_date = parse_filing_date(date)?;
        let (year, quarter) = filing_period(filing_date);
        let postal_code = postal_code(&mailing_address);

        Ok(FilingHeader {
            filing_date,
            company_name,
            mailing_address,
            form_type,
            year,
            quarter,
            postal_code,
        })
    }
}

/// Postal code from the first address line starting with "ZIP:"
pub fn postal_code(address_lines: &[String]) -> Option<String> {
    address_lines
        .iter()
        .map(|line| line.trim())
        .find(|line| line.starts_with(ZIP_PREFIX))
        .map(|line| label_value(line).to_string())
}

/// Extracts a [`FilingHeader`] from the first lines of a document
#[derive(Debug, Clone)]
pub struct HeaderFieldParser {
    line_budget: usize,
}

impl HeaderFieldParser {
    pub fn new() -> Self {
        Self {
            line_budget: HEADER_LINE_BUDGET,
        }
    }

    /// Override how many lines are searched for markers.
    ///
    /// Lines consumed by the address read-ahead do not count against it.
    pub fn with_line_budget(mut self, line_budget: usize) -> Self {
        self.line_budget = line_budget;
        self
    }

    pub fn line_budget(&self) -> usize {
        self.line_budget
    }

    /// Scan `lines` for the header fields.
    ///
    /// Only as many lines are pulled from the iterator as the scan needs.
    pub fn parse<I, S>(&self, lines: I) -> Result<FilingHeader, HeaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut partial = PartialHeader::default();
        let mut address = Vec::new();
        let mut budget = self.line_budget;
        let mut state = if budget == 0 {
            ScanState::Done
        } else {
            ScanState::SeekingMarker
        };

        for line in lines {
            let line = line.as_ref();
            state = match state {
                ScanState::SeekingMarker => {
                    budget -= 1;
                    let next = Self::observe(line, &mut partial, &mut address);
                    if budget == 0 && next == ScanState::SeekingMarker {
                        ScanState::Done
                    } else {
                        next
                    }
                }
                ScanState::ReadingAddress { remaining } => {
                    let trimmed = line.trim();
                    if trimmed == MAIL_ADDRESS {
                        partial.mailing_address = Some(std::mem::take(&mut address));
                        Self::after_address(&partial, budget)
                    } else {
                        if !trimmed.is_empty() {
                            address.push(trimmed.to_string());
                        }
                        if remaining <= 1 {
                            partial.mailing_address = Some(std::mem::take(&mut address));
                            Self::after_address(&partial, budget)
                        } else {
                            ScanState::ReadingAddress {
                                remaining: remaining - 1,
                            }
                        }
                    }
                }
                ScanState::Done => ScanState::Done,
            };

            if state == ScanState::Done {
                break;
            }
        }

        // Input ended inside the address block: keep what was read
        if let ScanState::ReadingAddress { .. } = state {
            partial.mailing_address = Some(address);
        }

        partial.finish()
    }

    fn observe(line: &str, partial: &mut PartialHeader, address: &mut Vec<String>) -> ScanState {
        if line.contains(FILED_AS_OF_DATE) {
            partial.filing_date = Some(label_value(line).to_string());
        } else if line.contains(COMPANY_CONFORMED_NAME) {
            partial.company_name = Some(label_value(line).to_string());
        } else if line.contains(BUSINESS_ADDRESS) {
            address.clear();
            return ScanState::ReadingAddress {
                remaining: ADDRESS_READ_AHEAD,
            };
        } else if line.contains(FORM_TYPE) {
            partial.form_type = Some(label_value(line).to_string());
        }
        partial.next_state()
    }

    fn after_address(partial: &PartialHeader, budget: usize) -> ScanState {
        match partial.next_state() {
            ScanState::SeekingMarker if budget == 0 => ScanState::Done,
            next => next,
        }
    }
}

impl Default for HeaderFieldParser {
    fn default() -> Self {
        Self::new()
    }
}

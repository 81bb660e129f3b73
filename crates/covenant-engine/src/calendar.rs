use crate::error::HeaderError;
use crate::patterns::FILING_DATE_FORMAT;
use chrono::{Datelike, NaiveDate};
use filing_types::Quarter;

/// Parse a FILED AS OF DATE: value such as "20120315"
pub fn parse_filing_date(value: &str) -> Result<NaiveDate, HeaderError> {
    NaiveDate::parse_from_str(value.trim(), FILING_DATE_FORMAT).map_err(|_| {
        HeaderError::InvalidFilingDate {
            value: value.to_string(),
        }
    })
}

/// Calendar year and quarter a filing falls in
pub fn filing_period(date: NaiveDate) -> (i32, Quarter) {
    (date.year(), Quarter::of_date(date))
}

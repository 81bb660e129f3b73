//! Markers and constants shared by the header extractor and the covenant rule

/// Header label carrying the filing date (YYYYMMDD)
pub const FILED_AS_OF_DATE: &str = "FILED AS OF DATE:";

/// Header label carrying the registrant name
pub const COMPANY_CONFORMED_NAME: &str = "COMPANY CONFORMED NAME:";

/// Header label opening the business address block
pub const BUSINESS_ADDRESS: &str = "BUSINESS ADDRESS:";

/// Header label carrying the form type, e.g. "10-K"
pub const FORM_TYPE: &str = "FORM TYPE:";

/// Line that closes the business address block
pub const MAIL_ADDRESS: &str = "MAIL ADDRESS:";

/// Prefix of the postal code line inside an address block
pub const ZIP_PREFIX: &str = "ZIP:";

/// Lines of a document searched for header fields
pub const HEADER_LINE_BUDGET: usize = 100;

/// Lines read after BUSINESS ADDRESS: before giving up on MAIL ADDRESS:
pub const ADDRESS_READ_AHEAD: usize = 12;

/// Lines either side of a risk term that count as "near" it
pub const PROXIMITY_WINDOW: usize = 3;

/// Filings dated before this year are skipped
pub const MIN_FILING_YEAR: i32 = 2007;

/// Form types the analyzer accepts
pub const ACCEPTED_FORM_TYPES: &[&str] = &["10-K", "10-Q"];

/// Date format used by FILED AS OF DATE:
pub const FILING_DATE_FORMAT: &str = "%Y%m%d";

/// Text after the first colon of a labelled header line, trimmed
pub fn label_value(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_value_takes_text_after_first_colon() {
        assert_eq!(label_value("FILED AS OF DATE:\t\t20120315"), "20120315");
        assert_eq!(
            label_value("\tCOMPANY CONFORMED NAME:\t\t\tACME: HOLDINGS INC"),
            "ACME: HOLDINGS INC"
        );
        assert_eq!(label_value("no label here"), "");
    }
}

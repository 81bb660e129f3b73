pub mod keyword;
pub mod types;

pub use keyword::{Keyword, KeywordCounts};
pub use types::{FilingHeader, FilingRecord, FilingType, Quarter, ViolationResult};

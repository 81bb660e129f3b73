pub mod header;
pub mod keywords;

pub use header::HeaderFieldParser;
pub use keywords::KeywordIndex;

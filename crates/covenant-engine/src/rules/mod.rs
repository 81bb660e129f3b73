//! Detection rules run over a document's lines

pub mod covenant;

pub use covenant::{eligible_neighborhood, ViolationDetector};

//! Covenant scan CLI support
//!
//! Loads a TOML scan configuration, assembles the reference and sampled
//! datasets, and formats the aggregated results. The analysis itself lives
//! in `covenant-engine`.

pub mod checkpoint;
pub mod config;
pub mod reporter;
pub mod seed;

pub use checkpoint::CheckpointWriter;
pub use config::Config;
pub use reporter::{OutputFormat, Reporter, ScanResults};

//! CLI command implementations.

pub mod analyze;

pub use analyze::{handle_analyze, run_analysis, AnalyzeConfig};

//! Input data and configuration shared by the front end and the analyzer.

pub mod config;
pub mod dataset;

pub use config::AnalyzerConfig;
pub use dataset::{ElementId, load_dataset};

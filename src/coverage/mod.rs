//! Coverage analysis core.
//!
//! ## Module Organization
//!
//! - `grid`: Cell identity, grid bounds, and distances
//! - `index`: Single-pass cell → covering-antenna index
//! - `analyzer`: `CoverageAnalyzer` with global, per-station, and point queries
//! - `types`: Structured reports returned to callers
//! - `error`: Typed failures

pub mod analyzer;
pub mod error;
pub mod grid;
pub mod index;
pub mod types;

pub use analyzer::CoverageAnalyzer;
pub use error::CoverageError;
pub use types::{CoverageAnswer, ReportScope, StatsReport};

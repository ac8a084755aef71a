//! Typed failures returned by the coverage analyzer.

use crate::common::dataset::ElementId;

/// Error type for coverage computations.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageError {
    /// Not enough stations, antennas, or touched cells to compute an aggregate.
    InsufficientData(String),
    /// Requested base station id does not exist in the dataset.
    NotFound(ElementId),
    /// Query coordinates cannot be compared against any cell.
    InvalidQuery(String),
    /// Grid bounds or step yield no cells.
    InvalidGrid(String),
    /// More touched cells than the declared grid can hold.
    DataConsistency { total_cells: u64, touched_cells: u64 },
    /// No antenna covers any cell.
    EmptyDataset,
}

impl std::fmt::Display for CoverageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            CoverageError::NotFound(id) => write!(f, "Base station {} not found", id),
            CoverageError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            CoverageError::InvalidGrid(msg) => write!(f, "Invalid grid: {}", msg),
            CoverageError::DataConsistency { total_cells, touched_cells } => write!(
                f,
                "Data consistency error: {} covered cells do not fit in a grid of {} cells",
                touched_cells, total_cells
            ),
            CoverageError::EmptyDataset => write!(f, "No cell is covered by any antenna"),
        }
    }
}

impl std::error::Error for CoverageError {}

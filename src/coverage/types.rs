//! Structured results returned by the analyzer.
//!
//! Rendering to text lives in `crate::report`; these types only carry values.

use serde::Serialize;

use super::grid::Cell;
use super::index::Coverer;
use crate::common::dataset::ElementId;

/// Which antennas a report was computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "station_id", rename_all = "snake_case")]
pub enum ReportScope {
    Global,
    Station(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AntennasPerStation {
    pub max: usize,
    pub min: usize,
    pub avg: f64,
}

/// The antenna with the most coverage points and its owning station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntennaRef {
    pub station_id: ElementId,
    pub antenna_id: ElementId,
    pub num_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub scope: ReportScope,
    pub num_base_stations: usize,
    pub num_antennas: usize,
    pub antennas_per_station: AntennasPerStation,
    /// Cells in the declared bounding rectangle.
    pub total_possible_points: u64,
    pub num_covered_once: u64,
    pub num_covered_multiple: u64,
    pub num_not_covered: u64,
    pub max_antennas_covering_any_point: usize,
    /// Mean over touched cells only.
    pub avg_antennas_covering_any_point: f64,
    /// Touched cells as a percentage of `total_possible_points`.
    pub coverage_percentage: f64,
    pub largest_antenna: AntennaRef,
}

/// Answer to a point-coverage query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum CoverageAnswer {
    /// The queried cell is covered; every covering tuple in ingestion order.
    Exact { cell: Cell, coverers: Vec<Coverer> },
    /// Not covered; first covering tuple of the nearest touched cell.
    Nearest {
        query: Cell,
        cell: Cell,
        /// Euclidean distance in (lat, lon) space.
        distance: f64,
        coverer: Coverer,
    },
}

//! Dataset loading, parsing, and validation logic.
//!
//! Contains the input data model (base stations, antennas, coverage points and
//! grid bounds) and functions for loading and validating a dataset file.

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;

use crate::coverage::grid::{Cell, GridBounds};

/// Error type for dataset loading failures.
#[derive(Debug)]
pub enum DatasetLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            DatasetLoadError::ParseError(msg) => write!(f, "Failed to parse JSON: {}", msg),
            DatasetLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DatasetLoadError {}

/// Identifier of a base station or antenna.
///
/// Datasets use either integers or strings; both are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ElementId {
    Int(i64),
    Text(String),
}

impl ElementId {
    /// Parse a user-supplied id, preferring the integer form.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => ElementId::Int(value),
            Err(_) => ElementId::Text(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementId::Int(value) => write!(f, "{}", value),
            ElementId::Text(value) => write!(f, "{}", value),
        }
    }
}

/// Received power at one grid cell from one antenna.
///
/// Stored in the dataset as a `[lat, lon, power]` array.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f64, f64, f64)")]
pub struct CoveragePoint {
    pub lat: f64,
    pub lon: f64,
    /// Received signal strength in dBm.
    pub power: f64,
}

impl From<(f64, f64, f64)> for CoveragePoint {
    fn from((lat, lon, power): (f64, f64, f64)) -> Self {
        CoveragePoint { lat, lon, power }
    }
}

impl CoveragePoint {
    pub fn cell(&self) -> Cell {
        Cell::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Antenna {
    pub id: ElementId,
    #[serde(default)]
    pub pts: Vec<CoveragePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseStation {
    pub id: ElementId,
    #[serde(default)]
    pub ants: Vec<Antenna>,
}

/// Root structure representing the entire dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    #[serde(rename = "baseStations")]
    pub base_stations: Vec<BaseStation>,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    /// Grid spacing in degrees, shared by both axes.
    pub step: f64,
}

impl Dataset {
    pub fn grid(&self) -> GridBounds {
        GridBounds {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
            step: self.step,
        }
    }

    /// First station with the given id, in dataset order.
    pub fn station(&self, id: &ElementId) -> Option<&BaseStation> {
        self.base_stations.iter().find(|bs| &bs.id == id)
    }

    pub fn num_antennas(&self) -> usize {
        self.base_stations.iter().map(|bs| bs.ants.len()).sum()
    }
}

/// Load and parse a dataset from a file.
///
/// # Parameters
///
/// * `path` - Path to the dataset JSON file
///
/// # Returns
///
/// Parsed and validated Dataset or an error.
pub fn load_dataset(path: &str) -> Result<Dataset, DatasetLoadError> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))
        .map_err(|e| DatasetLoadError::FileReadError(e.to_string()))?;

    parse_dataset(&data)
}

/// Parse and validate a dataset from its JSON text.
pub fn parse_dataset(data: &str) -> Result<Dataset, DatasetLoadError> {
    let dataset: Dataset = serde_json::from_str(data)
        .context("Invalid JSON format")
        .map_err(|e| DatasetLoadError::ParseError(format!("{:#}", e)))?;

    validate_dataset(&dataset).map_err(DatasetLoadError::ValidationError)?;

    Ok(dataset)
}

/// Validate a parsed dataset.
///
/// Only rejects values no computation can work with (non-finite numbers).
/// Conditions that make individual operations fail, such as stations without
/// antennas or cells outside the grid, are logged and left to the analyzer.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), String> {
    let grid = dataset.grid();
    for (name, value) in [
        ("min_lat", grid.min_lat),
        ("max_lat", grid.max_lat),
        ("min_lon", grid.min_lon),
        ("max_lon", grid.max_lon),
        ("step", grid.step),
    ] {
        if !value.is_finite() {
            return Err(format!("Grid field '{}' is not a finite number", name));
        }
    }

    if dataset.base_stations.is_empty() {
        warn!("Dataset contains no base stations");
    }

    let mut station_ids = HashSet::new();
    let mut outside_grid = 0usize;
    for bs in &dataset.base_stations {
        if !station_ids.insert(&bs.id) {
            warn!("Duplicate base station id {}; lookups use the first occurrence", bs.id);
        }
        if bs.ants.is_empty() {
            warn!("Base station {} has no antennas", bs.id);
        }
        for ant in &bs.ants {
            for pt in &ant.pts {
                if !pt.lat.is_finite() || !pt.lon.is_finite() || !pt.power.is_finite() {
                    return Err(format!(
                        "Base station {} antenna {} has a non-finite point ({}, {}, {})",
                        bs.id, ant.id, pt.lat, pt.lon, pt.power
                    ));
                }
                if !grid.contains(&pt.cell()) {
                    outside_grid += 1;
                }
            }
        }
    }

    if outside_grid > 0 {
        warn!("{} coverage points lie outside the declared grid bounds", outside_grid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "baseStations": [
            { "id": 1, "ants": [
                { "id": 10, "pts": [[0.0, 0.0, -70.0], [0.0, 1.0, -71.5]] }
            ]},
            { "id": "north", "ants": [] }
        ],
        "min_lat": 0.0, "max_lat": 0.0,
        "min_lon": 0.0, "max_lon": 2.0,
        "step": 1.0
    }"#;

    #[test]
    fn parses_mixed_ids_and_point_triples() {
        let dataset = parse_dataset(SAMPLE).unwrap();
        assert_eq!(dataset.base_stations.len(), 2);
        assert_eq!(dataset.base_stations[0].id, ElementId::Int(1));
        assert_eq!(dataset.base_stations[1].id, ElementId::Text("north".to_string()));

        let pts = &dataset.base_stations[0].ants[0].pts;
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1], CoveragePoint { lat: 0.0, lon: 1.0, power: -71.5 });
        assert_eq!(dataset.num_antennas(), 1);
    }

    #[test]
    fn station_lookup_by_id() {
        let dataset = parse_dataset(SAMPLE).unwrap();
        assert!(dataset.station(&ElementId::Int(1)).is_some());
        assert!(dataset.station(&ElementId::parse("north")).is_some());
        assert!(dataset.station(&ElementId::Int(2)).is_none());
    }

    #[test]
    fn element_id_parse_prefers_integers() {
        assert_eq!(ElementId::parse(" 42 "), ElementId::Int(42));
        assert_eq!(ElementId::parse("BS-42"), ElementId::Text("BS-42".to_string()));
    }

    #[test]
    fn malformed_point_is_a_parse_error() {
        let json = r#"{
            "baseStations": [{ "id": 1, "ants": [{ "id": 1, "pts": [[0.0, 0.0]] }] }],
            "min_lat": 0.0, "max_lat": 1.0, "min_lon": 0.0, "max_lon": 1.0, "step": 1.0
        }"#;
        assert!(matches!(parse_dataset(json), Err(DatasetLoadError::ParseError(_))));
    }

    #[test]
    fn missing_grid_field_is_a_parse_error() {
        let json = r#"{ "baseStations": [], "min_lat": 0.0, "max_lat": 1.0, "min_lon": 0.0, "max_lon": 1.0 }"#;
        assert!(matches!(parse_dataset(json), Err(DatasetLoadError::ParseError(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_dataset("/nonexistent/coverage-dataset.json");
        assert!(matches!(result, Err(DatasetLoadError::FileReadError(_))));
    }
}

//! Coverage statistics and point queries over an immutable dataset.
//!
//! The global cell index is built on first use and shared read-only by every
//! later query. Per-station statistics build a private index over the one
//! station, so nothing cached is ever mutated after construction.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::slice;
use std::sync::OnceLock;

use super::error::CoverageError;
use super::grid::Cell;
use super::index::CoverageIndex;
use super::types::{AntennaRef, AntennasPerStation, CoverageAnswer, ReportScope, StatsReport};
use crate::common::dataset::{BaseStation, Dataset, ElementId};

pub struct CoverageAnalyzer {
    dataset: Dataset,
    index: OnceLock<CoverageIndex>,
}

impl CoverageAnalyzer {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            index: OnceLock::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Station ids in dataset order.
    pub fn station_ids(&self) -> Vec<&ElementId> {
        self.dataset.base_stations.iter().map(|bs| &bs.id).collect()
    }

    /// Station ids in dataset order, each listed once.
    fn distinct_station_ids(&self) -> Vec<&ElementId> {
        let mut seen = HashSet::new();
        self.station_ids().into_iter().filter(|id| seen.insert(*id)).collect()
    }

    fn index(&self) -> &CoverageIndex {
        self.index.get_or_init(|| CoverageIndex::build(&self.dataset.base_stations))
    }

    /// Statistics over every station and antenna in the dataset.
    pub fn global_statistics(&self) -> Result<StatsReport, CoverageError> {
        self.compute(ReportScope::Global, &self.dataset.base_stations, self.index())
    }

    /// Statistics restricted to one station's antennas.
    ///
    /// With no `station_id`, an id is drawn uniformly at random from `rng` among
    /// the distinct station ids and resolved like an explicit id, so duplicated
    /// ids always report the first station carrying them. Pass a seeded
    /// generator for reproducible selection.
    pub fn station_statistics<R: Rng + ?Sized>(&self, station_id: Option<&ElementId>, rng: &mut R) -> Result<StatsReport, CoverageError> {
        let station = match station_id {
            Some(id) => self.dataset.station(id).ok_or_else(|| CoverageError::NotFound(id.clone()))?,
            None => {
                let picked = self
                    .distinct_station_ids()
                    .choose(rng)
                    .copied()
                    .ok_or_else(|| CoverageError::InsufficientData("no base stations to choose from".to_string()))?;
                debug!("Randomly selected base station {}", picked);
                self.dataset.station(picked).ok_or_else(|| CoverageError::NotFound(picked.clone()))?
            }
        };

        let stations = slice::from_ref(station);
        let index = CoverageIndex::build(stations);
        self.compute(ReportScope::Station(station.id.clone()), stations, &index)
    }

    /// Antennas covering the given coordinate, or the nearest covered cell.
    pub fn point_coverage(&self, lat: f64, lon: f64) -> Result<CoverageAnswer, CoverageError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoverageError::InvalidQuery(format!("coordinates ({}, {}) must be finite", lat, lon)));
        }
        let index = self.index();
        let query = Cell::new(lat, lon);

        if let Some(entry) = index.get(&query) {
            return Ok(CoverageAnswer::Exact {
                cell: entry.cell,
                coverers: entry.coverers.clone(),
            });
        }

        debug!("({}, {}) not covered, searching {} touched cells", lat, lon, index.len());
        let (entry, d2) = index.nearest(&query).ok_or(CoverageError::EmptyDataset)?;
        let coverer = entry.coverers.first().cloned().ok_or(CoverageError::EmptyDataset)?;
        Ok(CoverageAnswer::Nearest {
            query,
            cell: entry.cell,
            distance: d2.sqrt(),
            coverer,
        })
    }

    fn compute(&self, scope: ReportScope, stations: &[BaseStation], index: &CoverageIndex) -> Result<StatsReport, CoverageError> {
        if stations.is_empty() {
            return Err(CoverageError::InsufficientData("dataset contains no base stations".to_string()));
        }

        let antennas_per_station = antennas_per_station(stations);
        let num_antennas: usize = stations.iter().map(|bs| bs.ants.len()).sum();
        let largest_antenna = largest_antenna(stations)
            .ok_or_else(|| CoverageError::InsufficientData(format!("{} has no antennas", scope_label(&scope))))?;

        let total_possible_points = self.dataset.grid().total_cells()?;
        let multiplicity = index
            .multiplicity()
            .ok_or_else(|| CoverageError::InsufficientData(format!("no cell in {} is covered by any antenna", scope_label(&scope))))?;

        let touched = multiplicity.covered_once + multiplicity.covered_multiple;
        let num_not_covered = total_possible_points.checked_sub(touched).ok_or(CoverageError::DataConsistency {
            total_cells: total_possible_points,
            touched_cells: touched,
        })?;

        Ok(StatsReport {
            scope,
            num_base_stations: stations.len(),
            num_antennas,
            antennas_per_station,
            total_possible_points,
            num_covered_once: multiplicity.covered_once,
            num_covered_multiple: multiplicity.covered_multiple,
            num_not_covered,
            max_antennas_covering_any_point: multiplicity.max_antennas,
            avg_antennas_covering_any_point: multiplicity.avg_antennas,
            coverage_percentage: touched as f64 / total_possible_points as f64 * 100.0,
            largest_antenna,
        })
    }
}

fn scope_label(scope: &ReportScope) -> String {
    match scope {
        ReportScope::Global => "dataset".to_string(),
        ReportScope::Station(id) => format!("base station {}", id),
    }
}

/// Callers guarantee `stations` is non-empty.
fn antennas_per_station(stations: &[BaseStation]) -> AntennasPerStation {
    let counts: Vec<usize> = stations.iter().map(|bs| bs.ants.len()).collect();
    let max = counts.iter().copied().max().unwrap_or(0);
    let min = counts.iter().copied().min().unwrap_or(0);
    let avg = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    AntennasPerStation { max, min, avg }
}

/// Antenna with the most points; ties keep the first in station/antenna order.
fn largest_antenna(stations: &[BaseStation]) -> Option<AntennaRef> {
    let mut best: Option<(&BaseStation, usize)> = None;
    let mut best_len = 0usize;
    for bs in stations {
        for (i, ant) in bs.ants.iter().enumerate() {
            if best.is_none() || ant.pts.len() > best_len {
                best = Some((bs, i));
                best_len = ant.pts.len();
            }
        }
    }
    best.map(|(bs, i)| AntennaRef {
        station_id: bs.id.clone(),
        antenna_id: bs.ants[i].id.clone(),
        num_points: best_len,
    })
}

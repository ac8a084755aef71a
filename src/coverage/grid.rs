//! Grid geometry: cell identity, bounding rectangle, and distances.
//!
//! Cells are compared by the exact bit pattern of their coordinates, the same
//! way the dataset generator emits them. No snapping to the grid step happens
//! here; a query for (0.1, 0.2) only matches a cell stored as (0.1, 0.2).

use serde::Serialize;
use std::hash::{Hash, Hasher};

use super::error::CoverageError;

/// A grid location identified by latitude and longitude.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Cell {
    pub lat: f64,
    pub lon: f64,
}

impl Cell {
    pub fn new(lat: f64, lon: f64) -> Self {
        Cell { lat, lon }
    }

    /// Bit patterns used for equality and hashing, with -0.0 folded into 0.0.
    fn key(&self) -> (u64, u64) {
        (normalized_bits(self.lat), normalized_bits(self.lon))
    }
}

fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0_f64.to_bits() } else { value.to_bits() }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Squared Euclidean distance in (lat, lon) space.
///
/// Comparing squared distances gives the same ordering as true distances, so
/// nearest-cell searches never need the square root.
pub fn distance2(a: &Cell, b: &Cell) -> f64 {
    let dlat = a.lat - b.lat;
    let dlon = a.lon - b.lon;
    dlat * dlat + dlon * dlon
}

/// Declared bounding rectangle of the simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub step: f64,
}

impl GridBounds {
    /// Number of (rows, columns) in the grid.
    ///
    /// Each axis count is `round((max - min) / step) + 1`, rounded half to
    /// even, and computed independently before multiplying.
    pub fn dimensions(&self) -> Result<(u64, u64), CoverageError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(CoverageError::InvalidGrid(format!("step {} must be a positive number", self.step)));
        }
        let rows = axis_count("latitude", self.min_lat, self.max_lat, self.step)?;
        let cols = axis_count("longitude", self.min_lon, self.max_lon, self.step)?;
        Ok((rows, cols))
    }

    /// Number of cells in the bounding rectangle.
    pub fn total_cells(&self) -> Result<u64, CoverageError> {
        let (rows, cols) = self.dimensions()?;
        rows.checked_mul(cols)
            .ok_or_else(|| CoverageError::InvalidGrid(format!("{} x {} cells overflows", rows, cols)))
    }

    /// Inclusive bounding-box test.
    pub fn contains(&self, cell: &Cell) -> bool {
        cell.lat >= self.min_lat && cell.lat <= self.max_lat && cell.lon >= self.min_lon && cell.lon <= self.max_lon
    }
}

fn axis_count(axis: &str, min: f64, max: f64, step: f64) -> Result<u64, CoverageError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(CoverageError::InvalidGrid(format!("{} bounds ({}, {}) must be finite", axis, min, max)));
    }
    let count = ((max - min) / step).round_ties_even() + 1.0;
    if !count.is_finite() || count < 1.0 || count > u64::MAX as f64 {
        return Err(CoverageError::InvalidGrid(format!(
            "{} bounds ({}, {}) with step {} give {} cells",
            axis, min, max, step, count
        )));
    }
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bounds(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64, step: f64) -> GridBounds {
        GridBounds { min_lat, max_lat, min_lon, max_lon, step }
    }

    #[test]
    fn dimensions_round_each_axis_independently() {
        // 0.3 / 0.1 is 2.9999999999999996 in floating point
        let grid = bounds(0.0, 0.3, 0.0, 0.2, 0.1);
        assert_eq!(grid.dimensions().unwrap(), (4, 3));
        assert_eq!(grid.total_cells().unwrap(), 12);
    }

    #[test]
    fn dimensions_round_half_to_even() {
        // 2.5 steps rounds to 2, 3.5 steps rounds to 4
        assert_eq!(bounds(0.0, 2.5, 0.0, 3.5, 1.0).dimensions().unwrap(), (3, 5));
    }

    #[test]
    fn single_cell_grid() {
        assert_eq!(bounds(1.0, 1.0, 2.0, 2.0, 0.5).total_cells().unwrap(), 1);
    }

    #[test]
    fn invalid_step_or_bounds_rejected() {
        assert!(matches!(bounds(0.0, 1.0, 0.0, 1.0, 0.0).total_cells(), Err(CoverageError::InvalidGrid(_))));
        assert!(matches!(bounds(0.0, 1.0, 0.0, 1.0, -1.0).total_cells(), Err(CoverageError::InvalidGrid(_))));
        assert!(matches!(bounds(0.0, 1.0, 0.0, 1.0, f64::NAN).total_cells(), Err(CoverageError::InvalidGrid(_))));
        // max below min by more than half a step leaves no rows
        assert!(matches!(bounds(5.0, 0.0, 0.0, 1.0, 1.0).total_cells(), Err(CoverageError::InvalidGrid(_))));
    }

    #[test]
    fn cell_identity_ignores_signed_zero() {
        let mut cells = HashSet::new();
        cells.insert(Cell::new(0.0, 1.0));
        assert!(cells.contains(&Cell::new(-0.0, 1.0)));
        assert!(!cells.contains(&Cell::new(0.0, 1.0000001)));
    }

    #[test]
    fn contains_is_inclusive() {
        let grid = bounds(0.0, 1.0, 0.0, 2.0, 1.0);
        assert!(grid.contains(&Cell::new(0.0, 0.0)));
        assert!(grid.contains(&Cell::new(1.0, 2.0)));
        assert!(!grid.contains(&Cell::new(1.5, 2.0)));
    }

    #[test]
    fn squared_distance() {
        assert_eq!(distance2(&Cell::new(0.0, 0.0), &Cell::new(3.0, 4.0)), 25.0);
    }
}

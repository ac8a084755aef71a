//! Cell → covering-antenna index.
//!
//! Built in a single pass over every coverage point, in station, antenna,
//! then point order. All multiplicity statistics and point queries are derived
//! from it, so no operation rescans antenna point lists per cell.

use log::debug;
use serde::Serialize;
use std::collections::HashMap;

use super::grid::{Cell, distance2};
use crate::common::dataset::{BaseStation, ElementId};

/// One antenna's coverage of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverer {
    pub station_id: ElementId,
    pub antenna_id: ElementId,
    /// Received power in dBm.
    pub power: f64,
}

/// Everything known about a touched cell.
#[derive(Debug, Clone)]
pub struct CellCoverage {
    pub cell: Cell,
    /// One entry per ingested point, in enumeration order.
    pub coverers: Vec<Coverer>,
    /// Distinct antennas covering the cell.
    pub antenna_count: usize,
    // Ordinal of the last antenna counted, to skip repeated points.
    last_antenna: usize,
}

/// Coverage multiplicity over the touched cells of an index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplicityStats {
    pub covered_once: u64,
    pub covered_multiple: u64,
    pub max_antennas: usize,
    pub avg_antennas: f64,
}

#[derive(Debug, Default)]
pub struct CoverageIndex {
    cells: Vec<CellCoverage>,
    positions: HashMap<Cell, usize>,
}

impl CoverageIndex {
    /// Build the index over the given stations.
    pub fn build<'a, I>(stations: I) -> Self
    where
        I: IntoIterator<Item = &'a BaseStation>,
    {
        let mut index = CoverageIndex::default();
        let mut antenna_ordinal = 0usize;
        let mut points = 0usize;

        for bs in stations {
            for ant in &bs.ants {
                for pt in &ant.pts {
                    points += 1;
                    let cell = pt.cell();
                    let position = *index.positions.entry(cell).or_insert_with(|| {
                        index.cells.push(CellCoverage {
                            cell,
                            coverers: Vec::new(),
                            antenna_count: 0,
                            last_antenna: usize::MAX,
                        });
                        index.cells.len() - 1
                    });
                    let entry = &mut index.cells[position];
                    if entry.last_antenna != antenna_ordinal {
                        entry.last_antenna = antenna_ordinal;
                        entry.antenna_count += 1;
                    }
                    entry.coverers.push(Coverer {
                        station_id: bs.id.clone(),
                        antenna_id: ant.id.clone(),
                        power: pt.power,
                    });
                }
                antenna_ordinal += 1;
            }
        }

        debug!(
            "Coverage index built: {} antennas, {} points, {} touched cells",
            antenna_ordinal,
            points,
            index.len()
        );
        index
    }

    pub fn get(&self, cell: &Cell) -> Option<&CellCoverage> {
        self.positions.get(cell).map(|&position| &self.cells[position])
    }

    /// Touched cells in first-encounter order.
    pub fn cells(&self) -> &[CellCoverage] {
        &self.cells
    }

    /// Number of touched cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Once/multiple classification plus max and mean antennas per touched cell.
    ///
    /// Returns `None` when no cell is touched, since the mean is undefined.
    pub fn multiplicity(&self) -> Option<MultiplicityStats> {
        if self.is_empty() {
            return None;
        }
        let mut covered_once = 0u64;
        let mut covered_multiple = 0u64;
        let mut max_antennas = 0usize;
        let mut sum_antennas = 0u64;
        for entry in self.cells() {
            if entry.antenna_count == 1 {
                covered_once += 1;
            } else {
                covered_multiple += 1;
            }
            max_antennas = max_antennas.max(entry.antenna_count);
            sum_antennas += entry.antenna_count as u64;
        }
        Some(MultiplicityStats {
            covered_once,
            covered_multiple,
            max_antennas,
            avg_antennas: sum_antennas as f64 / self.len() as f64,
        })
    }

    /// Touched cell closest to the query point and its squared distance.
    ///
    /// Equidistant cells resolve to the one encountered first.
    pub fn nearest(&self, query: &Cell) -> Option<(&CellCoverage, f64)> {
        let mut best: Option<(&CellCoverage, f64)> = None;
        for entry in self.cells() {
            let d2 = distance2(&entry.cell, query);
            match best {
                Some((_, best_d2)) if d2 >= best_d2 => {}
                _ => best = Some((entry, d2)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dataset::{Antenna, CoveragePoint};

    fn antenna(id: i64, pts: &[(f64, f64, f64)]) -> Antenna {
        Antenna {
            id: ElementId::Int(id),
            pts: pts.iter().map(|&p| CoveragePoint::from(p)).collect(),
        }
    }

    fn station(id: i64, ants: Vec<Antenna>) -> BaseStation {
        BaseStation { id: ElementId::Int(id), ants }
    }

    #[test]
    fn index_preserves_enumeration_order() {
        let stations = vec![
            station(1, vec![antenna(1, &[(0.0, 1.0, -70.0)]), antenna(2, &[(0.0, 0.0, -60.0), (0.0, 1.0, -80.0)])]),
            station(2, vec![antenna(1, &[(0.0, 1.0, -90.0)])]),
        ];
        let index = CoverageIndex::build(&stations);

        let order: Vec<Cell> = index.cells().iter().map(|c| c.cell).collect();
        assert_eq!(order, vec![Cell::new(0.0, 1.0), Cell::new(0.0, 0.0)]);
        assert_eq!(index.len(), 2);

        let shared = index.get(&Cell::new(0.0, 1.0)).unwrap();
        let powers: Vec<f64> = shared.coverers.iter().map(|c| c.power).collect();
        assert_eq!(powers, vec![-70.0, -80.0, -90.0]);
        assert_eq!(shared.antenna_count, 3);
        assert_eq!(shared.coverers[2].station_id, ElementId::Int(2));
    }

    #[test]
    fn repeated_point_in_one_antenna_counts_once() {
        let stations = vec![station(1, vec![antenna(1, &[(0.0, 0.0, -70.0), (0.0, 0.0, -71.0)])])];
        let index = CoverageIndex::build(&stations);
        let entry = index.get(&Cell::new(0.0, 0.0)).unwrap();
        assert_eq!(entry.antenna_count, 1);
        assert_eq!(entry.coverers.len(), 2);

        let stats = index.multiplicity().unwrap();
        assert_eq!((stats.covered_once, stats.covered_multiple), (1, 0));
    }

    #[test]
    fn antennas_sharing_an_id_across_stations_are_distinct() {
        let stations = vec![
            station(1, vec![antenna(1, &[(0.0, 0.0, -70.0)])]),
            station(2, vec![antenna(1, &[(0.0, 0.0, -75.0)])]),
        ];
        let stats = CoverageIndex::build(&stations).multiplicity().unwrap();
        assert_eq!(stats.covered_multiple, 1);
        assert_eq!(stats.max_antennas, 2);
    }

    #[test]
    fn multiplicity_is_order_independent() {
        let a = antenna(1, &[(0.0, 0.0, -70.0), (0.0, 1.0, -70.0)]);
        let b = antenna(2, &[(0.0, 1.0, -80.0), (0.0, 2.0, -80.0)]);
        let c = antenna(3, &[(0.0, 2.0, -85.0), (0.0, 1.0, -85.0)]);

        let forward = vec![station(1, vec![a.clone(), b.clone()]), station(2, vec![c.clone()])];
        let reversed = vec![station(2, vec![c]), station(1, vec![b, a])];

        let lhs = CoverageIndex::build(&forward).multiplicity().unwrap();
        let rhs = CoverageIndex::build(&reversed).multiplicity().unwrap();
        assert_eq!(lhs, rhs);
        assert_eq!((lhs.covered_once, lhs.covered_multiple, lhs.max_antennas), (1, 2, 3));
        assert!((lhs.avg_antennas - 6.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn nearest_breaks_ties_by_first_encounter() {
        let stations = vec![station(1, vec![antenna(1, &[(0.0, 2.0, -70.0), (0.0, 0.0, -60.0)])])];
        let index = CoverageIndex::build(&stations);

        let (entry, d2) = index.nearest(&Cell::new(0.0, 1.0)).unwrap();
        assert_eq!(entry.cell, Cell::new(0.0, 2.0));
        assert_eq!(d2, 1.0);

        let (entry, _) = index.nearest(&Cell::new(0.0, 0.4)).unwrap();
        assert_eq!(entry.cell, Cell::new(0.0, 0.0));
    }

    #[test]
    fn empty_index() {
        let index = CoverageIndex::build(&Vec::<BaseStation>::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.multiplicity().is_none());
        assert!(index.nearest(&Cell::new(0.0, 0.0)).is_none());
    }
}

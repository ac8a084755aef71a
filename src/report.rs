//! Plain-text rendering of analyzer results.
//!
//! Produces the line-oriented summaries printed by the command-line front end.
//! Averages and percentages use a configurable number of decimals.

use crate::coverage::index::Coverer;
use crate::coverage::{CoverageAnswer, ReportScope, StatsReport};

/// Render a statistics report, one fact per line.
///
/// Station reports leave out the per-station antenna distribution and name
/// only the antenna in the largest-coverage line, since the station is implied.
pub fn render_stats(report: &StatsReport, decimals: usize) -> String {
    let mut lines = Vec::new();

    match &report.scope {
        ReportScope::Global => {
            let per_bs = &report.antennas_per_station;
            lines.push(format!("Total number of base stations = {}", report.num_base_stations));
            lines.push(format!("Total number of antennas = {}", report.num_antennas));
            lines.push(format!(
                "Max, min, and average of antennas per BS = {}, {}, {:.*}",
                per_bs.max, per_bs.min, decimals, per_bs.avg
            ));
        }
        ReportScope::Station(id) => {
            lines.push(format!("Base station {} statistics:", id));
            lines.push(format!("Total number of antennas = {}", report.num_antennas));
        }
    }

    lines.push(format!("Total number of points covered by exactly one antenna = {}", report.num_covered_once));
    lines.push(format!("Total number of points covered by more than one antenna = {}", report.num_covered_multiple));
    lines.push(format!("Total number of points not covered by any antenna = {}", report.num_not_covered));
    lines.push(format!("Maximum number of antennas that cover one point = {}", report.max_antennas_covering_any_point));
    lines.push(format!(
        "Average number of antennas covering a point = {:.*}",
        decimals, report.avg_antennas_covering_any_point
    ));
    lines.push(format!("Percentage of the covered area = {:.*}%", decimals, report.coverage_percentage));

    let largest = &report.largest_antenna;
    lines.push(match report.scope {
        ReportScope::Global => format!(
            "ID of the base station and antenna covering the maximum number of points = base station {}, antenna {}",
            largest.station_id, largest.antenna_id
        ),
        ReportScope::Station(_) => format!("ID of the antenna covering the maximum number of points = {}", largest.antenna_id),
    });

    join_lines(lines)
}

/// Render a point-coverage answer.
pub fn render_coverage(lat: f64, lon: f64, answer: &CoverageAnswer) -> String {
    let mut lines = Vec::new();
    match answer {
        CoverageAnswer::Exact { coverers, .. } => {
            lines.push(format!("The point ({}, {}) is covered by the following antennas:", lat, lon));
            lines.extend(coverers.iter().map(coverer_line));
        }
        CoverageAnswer::Nearest { cell, coverer, .. } => {
            lines.push(format!(
                "The point ({}, {}) is not explicitly covered. Nearest antenna information (point ({}, {})):",
                lat, lon, cell.lat, cell.lon
            ));
            lines.push(coverer_line(coverer));
        }
    }
    join_lines(lines)
}

fn coverer_line(coverer: &Coverer) -> String {
    format!(
        "Base station {}, Antenna {}, Received power {}",
        coverer.station_id, coverer.antenna_id, coverer.power
    )
}

/// Newline-terminated text from a list of lines.
fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

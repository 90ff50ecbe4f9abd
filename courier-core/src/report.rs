//! Plain-text rendering of the loaded state and evaluation results.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::evaluate::{DestinationSummary, EvaluationResult};
use crate::graph::NetworkGraph;
use crate::package::{Package, PackageSet};
use crate::vehicle::Vehicle;

/// Which report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ReportView {
    /// Network, packages and vehicle profile.
    #[default]
    Info,
    /// The info view followed by evaluation results.
    Results,
}

/// Error returned when a report view name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report view {0:?} (expected \"info\" or \"results\")")]
pub struct ReportViewError(pub String);

impl FromStr for ReportView {
    type Err = ReportViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "results" => Ok(Self::Results),
            _ => Err(ReportViewError(s.to_owned())),
        }
    }
}

/// Textual summary of a network, package set, vehicle and optional results.
///
/// The results view can only be built from an [`EvaluationResult`], so a
/// report never shows results that were not computed.
///
/// # Examples
///
/// ```
/// use courier_core::format::{parse_map, parse_packages};
/// use courier_core::{ResultReport, Vehicle};
///
/// # fn main() -> Result<(), courier_core::format::MapFormatError> {
/// let map = parse_map("2 1\nA B\n1 2 10.0\n")?;
/// let packages = parse_packages("P1 5 B 0 3\n").packages;
/// let vehicle = Vehicle::default();
///
/// let text = ResultReport::info(&map.graph, &packages, &vehicle).to_string();
/// assert!(text.contains("  - A"));
/// assert!(text.contains("Package P1: weight 5, destination B, arrival 0, deadline 3"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResultReport<'a> {
    graph: &'a NetworkGraph,
    packages: &'a PackageSet,
    vehicle: &'a Vehicle,
    result: Option<&'a EvaluationResult>,
}

impl<'a> ResultReport<'a> {
    /// Report the loaded state without results.
    pub const fn info(
        graph: &'a NetworkGraph,
        packages: &'a PackageSet,
        vehicle: &'a Vehicle,
    ) -> Self {
        Self {
            graph,
            packages,
            vehicle,
            result: None,
        }
    }

    /// Report the loaded state followed by `result`.
    pub const fn results(
        graph: &'a NetworkGraph,
        packages: &'a PackageSet,
        vehicle: &'a Vehicle,
        result: &'a EvaluationResult,
    ) -> Self {
        Self {
            graph,
            packages,
            vehicle,
            result: Some(result),
        }
    }

    fn write_network(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Network ===")?;
        if self.graph.is_empty() {
            return writeln!(f, "No network loaded");
        }
        writeln!(f, "Nodes: {}", self.graph.node_count())?;
        writeln!(f, "Node list:")?;
        for node in self.graph.nodes() {
            writeln!(f, "  - {}", node.name())?;
        }
        Ok(())
    }

    fn write_packages(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Packages ===")?;
        if self.packages.is_empty() {
            return writeln!(f, "No packages loaded");
        }
        writeln!(f, "Packages: {}", self.packages.len())?;
        for package in self.packages {
            writeln!(f, "{}", PackageLine(package))?;
        }
        Ok(())
    }

    fn write_vehicle(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Vehicle ===")?;
        writeln!(
            f,
            "Speed: {}, weight: {}, max load: {}, current load: {}",
            self.vehicle.speed(),
            self.vehicle.weight(),
            self.vehicle.max_load(),
            self.vehicle.current_load()
        )
    }
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_network(f)?;
        writeln!(f)?;
        self.write_packages(f)?;
        writeln!(f)?;
        self.write_vehicle(f)?;
        if let Some(result) = self.result {
            writeln!(f)?;
            write!(f, "{}", ResultsSection(result))?;
        }
        Ok(())
    }
}

struct PackageLine<'a>(&'a Package);

impl fmt::Display for PackageLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let package = self.0;
        write!(
            f,
            "Package {}: weight {}, destination {}, arrival {}, deadline {}",
            package.id, package.weight, package.destination, package.arrival_time, package.deadline
        )
    }
}

struct ResultsSection<'a>(&'a EvaluationResult);

impl fmt::Display for ResultsSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "=== Results ===")?;
        writeln!(f, "Total transport cost: {}", result.total_cost)?;
        writeln!(f, "Late packages: {}", result.late_packages)?;
        writeln!(f, "Packages without a route: {}", result.unreachable_packages)?;
        writeln!(f, "Destinations:")?;
        for summary in &result.destinations {
            writeln!(f, "{}", DestinationLine(summary))?;
        }
        Ok(())
    }
}

struct DestinationLine<'a>(&'a DestinationSummary);

impl fmt::Display for DestinationLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        write!(
            f,
            "  - {}: {} package(s), weight {}",
            summary.destination, summary.package_count, summary.group_weight
        )?;
        match summary.travel_time {
            Some(travel_time) if summary.is_reachable() => write!(
                f,
                ", distance {}, travel time {}, cost {}, late {}",
                summary.distance, travel_time, summary.cost, summary.late_packages
            ),
            _ => write!(f, ", no route"),
        }
    }
}

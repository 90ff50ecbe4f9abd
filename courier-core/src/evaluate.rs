//! Aggregate transport cost and deadline violations for a package set.
//!
//! Packages are grouped by destination. Each group travels from the depot
//! as one load, so the cost of a group is its distance times the combined
//! weight of vehicle and group. Groups without a route contribute nothing.

use std::collections::BTreeMap;

use log::info;
use thiserror::Error;

use crate::cost::{DepotCost, DirectEdge, RoutingMode, ShortestPath};
use crate::graph::{DEPOT, NO_ROUTE, NetworkGraph};
use crate::package::{Package, PackageSet};
use crate::vehicle::Vehicle;

/// Data an operation needed but did not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// No network has been loaded.
    #[error("no network has been loaded; load a map first")]
    NetworkMissing,
    /// No packages have been loaded.
    #[error("no packages have been loaded; load a package list first")]
    PackagesMissing,
    /// Results were requested before an evaluation ran.
    #[error("no evaluation has been run for the current map and packages")]
    EvaluationMissing,
}

/// Cost and lateness for the packages bound to one destination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationSummary {
    /// Destination node name.
    pub destination: String,
    /// Packages in the group.
    pub package_count: usize,
    /// Combined package weight.
    pub group_weight: f64,
    /// Distance from the depot, or [`NO_ROUTE`].
    pub distance: f64,
    /// Travel time from the depot when a route exists.
    pub travel_time: Option<f64>,
    /// Cost contributed by the group.
    pub cost: f64,
    /// Packages in the group arriving after their deadline.
    pub late_packages: usize,
}

impl DestinationSummary {
    /// Whether the group had a route and was costed.
    pub fn is_reachable(&self) -> bool {
        self.distance > NO_ROUTE
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationResult {
    /// Sum of `distance * (vehicle weight + group weight)` over routed groups.
    pub total_cost: f64,
    /// Packages whose travel time exceeds their deadline.
    pub late_packages: usize,
    /// Packages whose destination had no route; neither costed nor late.
    pub unreachable_packages: usize,
    /// Per-destination breakdown ordered by destination name.
    pub destinations: Vec<DestinationSummary>,
}

/// Group packages by exact destination name, keeping load order within each
/// group.
pub fn group_by_destination(packages: &PackageSet) -> BTreeMap<&str, Vec<&Package>> {
    let mut groups: BTreeMap<&str, Vec<&Package>> = BTreeMap::new();
    for package in packages {
        groups
            .entry(package.destination.as_str())
            .or_default()
            .push(package);
    }
    groups
}

/// Evaluates a package set against a network and vehicle profile.
///
/// # Examples
///
/// ```
/// use courier_core::format::{parse_map, parse_packages};
/// use courier_core::{RouteEvaluator, Vehicle};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let map = parse_map("2 1\nA B\n1 2 10.0\n")?;
/// let packages = parse_packages("P1 5 B 0 3\n").packages;
/// let vehicle = Vehicle::default();
///
/// let result = RouteEvaluator::new(&map.graph, &packages, &vehicle).evaluate()?;
/// assert_eq!(result.total_cost, 1050.0);
/// assert_eq!(result.late_packages, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    graph: &'a NetworkGraph,
    packages: &'a PackageSet,
    vehicle: &'a Vehicle,
}

impl<'a> RouteEvaluator<'a> {
    /// Borrow the inputs for evaluation.
    pub const fn new(
        graph: &'a NetworkGraph,
        packages: &'a PackageSet,
        vehicle: &'a Vehicle,
    ) -> Self {
        Self {
            graph,
            packages,
            vehicle,
        }
    }

    /// Evaluate using direct edges from the depot.
    ///
    /// # Errors
    /// Returns [`PreconditionError::NetworkMissing`] or
    /// [`PreconditionError::PackagesMissing`] when either input is empty.
    pub fn evaluate(&self) -> Result<EvaluationResult, PreconditionError> {
        self.evaluate_with_mode(RoutingMode::Direct)
    }

    /// Evaluate using the strategy selected by `mode`.
    ///
    /// # Errors
    /// As for [`RouteEvaluator::evaluate`].
    pub fn evaluate_with_mode(
        &self,
        mode: RoutingMode,
    ) -> Result<EvaluationResult, PreconditionError> {
        self.check_inputs()?;
        match mode {
            RoutingMode::Direct => self.evaluate_with(&DirectEdge::new(self.graph, DEPOT)),
            RoutingMode::ShortestPath => {
                self.evaluate_with(&ShortestPath::from_depot(self.graph, DEPOT))
            }
        }
    }

    /// Evaluate using a caller-supplied distance strategy.
    ///
    /// # Errors
    /// As for [`RouteEvaluator::evaluate`].
    pub fn evaluate_with<C>(&self, cost: &C) -> Result<EvaluationResult, PreconditionError>
    where
        C: DepotCost + ?Sized,
    {
        self.check_inputs()?;

        let mut result = EvaluationResult::default();
        for (destination, group) in group_by_destination(self.packages) {
            let summary = self.summarise(destination, &group, cost.distance_to(destination));
            result.total_cost += summary.cost;
            result.late_packages += summary.late_packages;
            if !summary.is_reachable() {
                result.unreachable_packages += summary.package_count;
            }
            result.destinations.push(summary);
        }

        info!(
            "Evaluated {} packages across {} destinations: total cost {}, {} late, \
             {} without a route",
            self.packages.len(),
            result.destinations.len(),
            result.total_cost,
            result.late_packages,
            result.unreachable_packages
        );
        Ok(result)
    }

    fn check_inputs(&self) -> Result<(), PreconditionError> {
        if self.graph.is_empty() {
            return Err(PreconditionError::NetworkMissing);
        }
        if self.packages.is_empty() {
            return Err(PreconditionError::PackagesMissing);
        }
        Ok(())
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "deadlines are compared against fractional travel times"
    )]
    fn summarise(
        &self,
        destination: &str,
        group: &[&Package],
        distance: f64,
    ) -> DestinationSummary {
        let group_weight = group_weight(group);
        let mut summary = DestinationSummary {
            destination: destination.to_owned(),
            package_count: group.len(),
            group_weight,
            distance,
            travel_time: None,
            cost: 0.0,
            late_packages: 0,
        };
        if distance > NO_ROUTE {
            let travel_time = distance / self.vehicle.speed();
            summary.cost = distance * (self.vehicle.weight() + group_weight);
            summary.travel_time = Some(travel_time);
            summary.late_packages = group
                .iter()
                .filter(|package| travel_time > package.deadline as f64)
                .count();
        }
        summary
    }
}

// Summing in sorted order keeps the total independent of load order.
fn group_weight(group: &[&Package]) -> f64 {
    let mut weights: Vec<f64> = group.iter().map(|package| package.weight).collect();
    weights.sort_by(f64::total_cmp);
    weights.into_iter().sum()
}

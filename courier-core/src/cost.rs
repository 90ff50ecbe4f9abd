//! Strategies for the distance from the depot to a destination.
//!
//! The [`DepotCost`] trait is the seam between the evaluator and the graph.
//! [`DirectEdge`] reads only direct adjacency from the depot and is the
//! default. [`ShortestPath`] runs Dijkstra once from the depot and answers
//! multi-hop queries from the precomputed table.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::graph::{NO_ROUTE, NetworkGraph};

/// Distance from the depot to a named destination.
///
/// Implementations return [`NO_ROUTE`] when the destination is unknown or
/// cannot be reached.
///
/// # Examples
///
/// ```
/// use courier_core::{DepotCost, NO_ROUTE};
///
/// struct Flat;
///
/// impl DepotCost for Flat {
///     fn distance_to(&self, destination: &str) -> f64 {
///         if destination.is_empty() { NO_ROUTE } else { 1.0 }
///     }
/// }
///
/// assert_eq!(Flat.distance_to("B"), 1.0);
/// ```
pub trait DepotCost {
    /// Distance to `destination`, or [`NO_ROUTE`].
    fn distance_to(&self, destination: &str) -> f64;
}

/// Direct-edge lookup from the depot; no intermediate nodes.
#[derive(Debug, Clone, Copy)]
pub struct DirectEdge<'g> {
    graph: &'g NetworkGraph,
    depot: usize,
}

impl<'g> DirectEdge<'g> {
    /// Query direct edges leaving `depot`.
    pub const fn new(graph: &'g NetworkGraph, depot: usize) -> Self {
        Self { graph, depot }
    }
}

impl DepotCost for DirectEdge<'_> {
    fn distance_to(&self, destination: &str) -> f64 {
        self.graph.cost_to(self.depot, destination)
    }
}

/// Single-source shortest distances from the depot.
#[derive(Debug, Clone)]
pub struct ShortestPath<'g> {
    graph: &'g NetworkGraph,
    distances: Vec<Option<f64>>,
}

impl<'g> ShortestPath<'g> {
    /// Run Dijkstra from `depot` over the whole graph.
    ///
    /// An unknown depot leaves every destination unreachable.
    pub fn from_depot(graph: &'g NetworkGraph, depot: usize) -> Self {
        let mut distances = vec![None; graph.node_count()];
        let mut frontier = BinaryHeap::new();
        if let Some(slot) = distances.get_mut(depot) {
            *slot = Some(0.0);
            frontier.push(Frontier {
                distance: 0.0,
                node: depot,
            });
        }

        while let Some(Frontier { distance, node }) = frontier.pop() {
            if distances
                .get(node)
                .copied()
                .flatten()
                .is_some_and(|best| distance > best)
            {
                continue;
            }
            for edge in graph.neighbours(node) {
                let candidate = distance + edge.weight;
                let Some(slot) = distances.get_mut(edge.neighbour) else {
                    continue;
                };
                if slot.is_none_or(|best| candidate < best) {
                    *slot = Some(candidate);
                    frontier.push(Frontier {
                        distance: candidate,
                        node: edge.neighbour,
                    });
                }
            }
        }
        Self { graph, distances }
    }

    /// Shortest distance to the node at `index`, if reachable.
    pub fn distance_to_index(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied().flatten()
    }
}

impl DepotCost for ShortestPath<'_> {
    fn distance_to(&self, destination: &str) -> f64 {
        self.graph
            .index_of(destination)
            .and_then(|index| self.distance_to_index(index))
            .unwrap_or(NO_ROUTE)
    }
}

// Min-heap entry: ordering is reversed so `BinaryHeap` pops the nearest node.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Which [`DepotCost`] strategy an evaluation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RoutingMode {
    /// Direct edges from the depot only.
    #[default]
    Direct,
    /// Shortest paths from the depot through intermediate nodes.
    ShortestPath,
}

impl RoutingMode {
    /// Canonical name used in configuration and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::ShortestPath => "shortest-path",
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a routing mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown routing mode {0:?} (expected \"direct\" or \"shortest-path\")")]
pub struct RoutingModeError(pub String);

impl FromStr for RoutingMode {
    type Err = RoutingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "shortest-path" | "shortest_path" | "shortest" => Ok(Self::ShortestPath),
            _ => Err(RoutingModeError(s.to_owned())),
        }
    }
}

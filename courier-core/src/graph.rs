//! Undirected weighted transport network.
//!
//! Nodes live in an index-stable vector and are looked up by name through a
//! side table. Adjacency is stored per node as `(neighbour, weight)` pairs so
//! cost queries never hash on the inner loop.

use std::collections::HashMap;
use std::fmt;
use std::collections::hash_map::Entry;

use log::warn;
use thiserror::Error;

/// Distance reported when no route exists.
pub const NO_ROUTE: f64 = 0.0;

/// Index of the depot: the first node declared in the map.
pub const DEPOT: usize = 0;

/// A weighted link from one node to a neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Index of the neighbouring node.
    pub neighbour: usize,
    /// Distance to the neighbour.
    pub weight: f64,
}

/// A named location in the network with its adjacency.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    edges: Vec<Edge>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            edges: Vec::new(),
        }
    }

    /// Node name as declared in the map.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Edges leaving this node.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn connect(&mut self, neighbour: usize, weight: f64) {
        match self.edges.iter_mut().find(|edge| edge.neighbour == neighbour) {
            Some(edge) => edge.weight = weight,
            None => self.edges.push(Edge { neighbour, weight }),
        }
    }
}

/// An edge as declared in map input, with 1-based endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpec {
    /// 1-based index of the first endpoint.
    pub from: i64,
    /// 1-based index of the second endpoint.
    pub to: i64,
    /// Declared distance.
    pub weight: f64,
}

/// Why an edge was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// At least one endpoint fell outside `1..=n`.
    EndpointOutOfRange,
    /// The weight was negative, infinite or NaN.
    InvalidWeight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointOutOfRange => f.write_str("endpoint out of range"),
            Self::InvalidWeight => f.write_str("invalid weight"),
        }
    }
}

/// An edge ignored while building the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedEdge {
    /// Zero-based position of the edge in the input.
    pub position: usize,
    /// The edge as declared.
    pub edge: EdgeSpec,
    /// Why the edge was skipped.
    pub reason: SkipReason,
}

/// Errors returned by [`NetworkGraph::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No node names were supplied.
    #[error("network must contain at least one node")]
    Empty,
    /// Two nodes share the same name.
    #[error("node name {name:?} is declared more than once (positions {first} and {second})")]
    DuplicateNodeName {
        /// The repeated name.
        name: String,
        /// Zero-based index of the first declaration.
        first: usize,
        /// Zero-based index of the repeated declaration.
        second: usize,
    },
}

/// A freshly built graph together with the edges it ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBuild {
    /// The constructed network.
    pub graph: NetworkGraph,
    /// Edges skipped during construction, in input order.
    pub skipped: Vec<SkippedEdge>,
}

/// Undirected weighted graph of named nodes.
///
/// # Examples
///
/// ```
/// use courier_core::{EdgeSpec, NetworkGraph};
///
/// # fn main() -> Result<(), courier_core::GraphError> {
/// let names = vec!["A".to_owned(), "B".to_owned()];
/// let edges = [EdgeSpec { from: 1, to: 2, weight: 10.0 }];
/// let build = NetworkGraph::build(names, edges)?;
/// assert_eq!(build.graph.cost_to(0, "B"), 10.0);
/// assert_eq!(build.graph.cost_to(1, "A"), 10.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NetworkGraph {
    /// Build a graph from ordered node names and 1-based edges.
    ///
    /// Edges whose endpoints fall outside `1..=names.len()`, or whose weight
    /// is negative or not finite, are skipped and reported rather than
    /// aborting the build. Repeating an edge overwrites the earlier weight.
    ///
    /// # Errors
    /// Returns [`GraphError::Empty`] without names and
    /// [`GraphError::DuplicateNodeName`] when a name repeats.
    pub fn build<I>(names: Vec<String>, edges: I) -> Result<GraphBuild, GraphError>
    where
        I: IntoIterator<Item = EdgeSpec>,
    {
        if names.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            match index.entry(name.clone()) {
                Entry::Occupied(existing) => {
                    return Err(GraphError::DuplicateNodeName {
                        name: name.clone(),
                        first: *existing.get(),
                        second: position,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }

        let mut graph = Self {
            nodes: names.into_iter().map(Node::new).collect(),
            index,
        };
        let mut skipped = Vec::new();
        for (position, edge) in edges.into_iter().enumerate() {
            if let Some(reason) = graph.insert(edge) {
                warn!(
                    "Skipped edge {}: endpoints {}-{} weight {} ({}, valid endpoints 1..={})",
                    position + 1,
                    edge.from,
                    edge.to,
                    edge.weight,
                    reason,
                    graph.node_count()
                );
                skipped.push(SkippedEdge {
                    position,
                    edge,
                    reason,
                });
            }
        }
        Ok(GraphBuild { graph, skipped })
    }

    fn insert(&mut self, edge: EdgeSpec) -> Option<SkipReason> {
        let n = self.nodes.len();
        let (Some(u), Some(v)) = (zero_based(edge.from, n), zero_based(edge.to, n)) else {
            return Some(SkipReason::EndpointOutOfRange);
        };
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Some(SkipReason::InvalidWeight);
        }
        if let Some(node) = self.nodes.get_mut(u) {
            node.connect(v, edge.weight);
        }
        if let Some(node) = self.nodes.get_mut(v) {
            node.connect(u, edge.weight);
        }
        None
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct undirected edges, self-loops included.
    pub fn edge_count(&self) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| node.edges.iter().filter(|e| e.neighbour >= idx).count())
            .sum()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Name of the node at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(Node::name)
    }

    /// Index of the node called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Edges leaving the node at `index`; empty when the index is unknown.
    pub fn neighbours(&self, index: usize) -> &[Edge] {
        self.nodes.get(index).map(Node::edges).unwrap_or_default()
    }

    /// Weight of the direct edge between `from` and `to`, if any.
    pub fn edge_weight(&self, from: usize, to: usize) -> Option<f64> {
        self.neighbours(from)
            .iter()
            .find(|edge| edge.neighbour == to)
            .map(|edge| edge.weight)
    }

    /// Direct edge weight from node `from` to the node named `destination`.
    ///
    /// Only direct adjacency is considered. Returns [`NO_ROUTE`] when either
    /// node is unknown or the two are not adjacent.
    pub fn cost_to(&self, from: usize, destination: &str) -> f64 {
        self.index_of(destination)
            .and_then(|to| self.edge_weight(from, to))
            .unwrap_or(NO_ROUTE)
    }
}

fn zero_based(raw: i64, len: usize) -> Option<usize> {
    let index = usize::try_from(raw.checked_sub(1)?).ok()?;
    (index < len).then_some(index)
}

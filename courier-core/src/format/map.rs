//! Map files: a node/edge count header, node names, then 1-based edges.
//!
//! ```text
//! <n> <m>
//! <name_1> ... <name_n>
//! <u_1> <v_1> <w_1>
//! ...
//! ```

use std::fmt;
use std::str::SplitWhitespace;

use log::debug;
use thiserror::Error;

use crate::graph::{EdgeSpec, GraphBuild, GraphError, NetworkGraph, SkippedEdge};

/// Upper bound on speculative allocation driven by declared counts.
const PREALLOCATE_LIMIT: usize = 4096;

/// Which header count a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    /// The declared number of nodes.
    Nodes,
    /// The declared number of edges.
    Edges,
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => f.write_str("node"),
            Self::Edges => f.write_str("edge"),
        }
    }
}

/// Errors raised while parsing a map. Nothing from a failed parse is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapFormatError {
    /// The header ended before a count was read.
    #[error("map header is missing the {field} count")]
    MissingCount {
        /// Count that was absent.
        field: CountField,
    },
    /// A header count was not an integer.
    #[error("{field} count {token:?} is not an integer")]
    InvalidCount {
        /// Count that failed to parse.
        field: CountField,
        /// Offending token.
        token: String,
    },
    /// At least one declared count was zero or negative.
    #[error("invalid map data: node count={nodes} edge count={edges} (both must be positive)")]
    NonPositiveCounts {
        /// Declared node count.
        nodes: i64,
        /// Declared edge count.
        edges: i64,
    },
    /// A declared count does not fit in memory on this platform.
    #[error("{field} count {value} is too large")]
    CountOutOfRange {
        /// Count that overflowed.
        field: CountField,
        /// Declared value.
        value: i64,
    },
    /// The input ended before every node name was read.
    #[error("input ended early: missing node names, read {read} of {expected}")]
    TruncatedNodes {
        /// Declared node count.
        expected: usize,
        /// Names read before the input ended.
        read: usize,
    },
    /// The input ended before every edge was read.
    #[error("input ended early: missing edge data, read {read} of {expected} edges")]
    TruncatedEdges {
        /// Declared edge count.
        expected: usize,
        /// Complete edges read before the input ended.
        read: usize,
    },
    /// An edge field was not a number.
    #[error("edge {edge} has invalid {field} {token:?}")]
    InvalidEdgeToken {
        /// 1-based position of the edge.
        edge: usize,
        /// Field that failed to parse.
        field: &'static str,
        /// Offending token.
        token: String,
    },
    /// The map bytes were not valid UTF-8.
    #[error("map is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidEncoding {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
    /// The node list was rejected by the graph builder.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A successfully parsed map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLoad {
    /// The constructed network.
    pub graph: NetworkGraph,
    /// Number of edges declared in the header.
    pub declared_edges: usize,
    /// Edges skipped because of bad endpoints or weights.
    pub skipped: Vec<SkippedEdge>,
}

/// Parse a map from text.
///
/// # Errors
/// Returns [`MapFormatError`] for malformed or non-positive counts, truncated
/// node or edge data, unparsable edge fields, and duplicate node names.
/// Out-of-range edges are not errors; they are listed in
/// [`MapLoad::skipped`].
///
/// # Examples
///
/// ```
/// use courier_core::format::parse_map;
///
/// # fn main() -> Result<(), courier_core::format::MapFormatError> {
/// let load = parse_map("2 1\nA B\n1 2 10.0\n")?;
/// assert_eq!(load.graph.node_count(), 2);
/// assert_eq!(load.graph.cost_to(0, "B"), 10.0);
/// # Ok(())
/// # }
/// ```
pub fn parse_map(input: &str) -> Result<MapLoad, MapFormatError> {
    let mut tokens = input.split_whitespace();
    let nodes = read_count(&mut tokens, CountField::Nodes)?;
    let edges = read_count(&mut tokens, CountField::Edges)?;
    debug!("Reading map: nodes={nodes} edges={edges}");
    if nodes <= 0 || edges <= 0 {
        return Err(MapFormatError::NonPositiveCounts { nodes, edges });
    }
    let node_count = to_len(nodes, CountField::Nodes)?;
    let edge_count = to_len(edges, CountField::Edges)?;

    let mut names = Vec::with_capacity(node_count.min(PREALLOCATE_LIMIT));
    for read in 0..node_count {
        let name = tokens.next().ok_or(MapFormatError::TruncatedNodes {
            expected: node_count,
            read,
        })?;
        debug!("Node {read}: {name}");
        names.push(name.to_owned());
    }

    let mut specs = Vec::with_capacity(edge_count.min(PREALLOCATE_LIMIT));
    for read in 0..edge_count {
        specs.push(read_edge(&mut tokens, read, edge_count)?);
    }

    let trailing = tokens.count();
    if trailing > 0 {
        debug!("Ignored {trailing} tokens after the declared edges");
    }

    let GraphBuild { graph, skipped } = NetworkGraph::build(names, specs)?;
    Ok(MapLoad {
        graph,
        declared_edges: edge_count,
        skipped,
    })
}

/// Decode raw map bytes and parse them.
///
/// # Errors
/// Returns [`MapFormatError::InvalidEncoding`] when the bytes are not UTF-8,
/// otherwise as for [`parse_map`].
pub fn parse_map_bytes(input: &[u8]) -> Result<MapLoad, MapFormatError> {
    let text = std::str::from_utf8(input).map_err(|err| MapFormatError::InvalidEncoding {
        offset: err.valid_up_to(),
    })?;
    parse_map(text)
}

fn read_count(tokens: &mut SplitWhitespace<'_>, field: CountField) -> Result<i64, MapFormatError> {
    let token = tokens.next().ok_or(MapFormatError::MissingCount { field })?;
    token
        .parse()
        .map_err(|_| MapFormatError::InvalidCount {
            field,
            token: token.to_owned(),
        })
}

fn to_len(value: i64, field: CountField) -> Result<usize, MapFormatError> {
    usize::try_from(value).map_err(|_| MapFormatError::CountOutOfRange { field, value })
}

fn read_edge(
    tokens: &mut SplitWhitespace<'_>,
    read: usize,
    expected: usize,
) -> Result<EdgeSpec, MapFormatError> {
    let truncated = MapFormatError::TruncatedEdges { expected, read };
    let (Some(from), Some(to), Some(weight)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(truncated);
    };
    let edge = read + 1;
    let invalid = |field: &'static str, token: &str| MapFormatError::InvalidEdgeToken {
        edge,
        field,
        token: token.to_owned(),
    };
    let spec = EdgeSpec {
        from: from.parse().map_err(|_| invalid("source index", from))?,
        to: to.parse().map_err(|_| invalid("target index", to))?,
        weight: weight.parse().map_err(|_| invalid("weight", weight))?,
    };
    debug!("Edge {edge}: {} {} {}", spec.from, spec.to, spec.weight);
    Ok(spec)
}

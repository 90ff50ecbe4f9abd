//! Core domain logic for the courier delivery evaluator.
//!
//! Responsibilities:
//! - Load a weighted road network and a list of delivery requests from
//!   whitespace-separated text.
//! - Cost every destination group as one trip from the depot and count the
//!   packages that miss their deadline.
//! - Render the loaded state and the latest results as plain text.
//!
//! Boundaries:
//! - No terminal or argument handling (lives in `courier-cli`).
//! - Filesystem access goes through `courier-fs`.
//!
//! Invariants:
//! - The depot is always the first node of the loaded map.
//! - A failed load never replaces state loaded earlier.
//! - No global mutable state.
#![forbid(unsafe_code)]
#![expect(
    clippy::float_arithmetic,
    reason = "costs, weights and travel times are floating-point quantities"
)]

mod cost;
mod evaluate;
pub mod format;
mod graph;
mod package;
mod report;
mod session;
pub mod test_support;
mod vehicle;

pub use cost::{DepotCost, DirectEdge, RoutingMode, RoutingModeError, ShortestPath};
pub use evaluate::{
    DestinationSummary, EvaluationResult, PreconditionError, RouteEvaluator, group_by_destination,
};
pub use graph::{
    DEPOT, Edge, EdgeSpec, GraphBuild, GraphError, NO_ROUTE, NetworkGraph, Node, SkipReason,
    SkippedEdge,
};
pub use package::{Package, PackageSet};
pub use report::{ReportView, ReportViewError, ResultReport};
pub use session::{ErrorKind, MapLoadReport, PackageLoadReport, Session, SessionError};
pub use vehicle::{Vehicle, VehicleError};

//! A single-user evaluation session.
//!
//! [`Session`] owns the loaded network, package set and vehicle profile and
//! exposes the four operations of the tool: load a map, load packages,
//! evaluate, render. Every failure aborts only the current operation; state
//! loaded earlier is left untouched.
//!
//! Sessions are not synchronised. Hosts sharing one across threads must
//! serialise access themselves.

use std::io::{self, Read};

use camino::Utf8Path;
use courier_fs::read_file_bytes;
use log::info;
use thiserror::Error;

use crate::cost::RoutingMode;
use crate::evaluate::{EvaluationResult, PreconditionError, RouteEvaluator};
use crate::format::{
    MapFormatError, MapLoad, PackageFormatIssue, PackageLoad, parse_map_bytes, parse_package_bytes,
};
use crate::graph::{NetworkGraph, SkippedEdge};
use crate::package::PackageSet;
use crate::report::{ReportView, ResultReport};
use crate::vehicle::Vehicle;

const READER_ORIGIN: &str = "<input>";

/// Broad classes of session failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input could not be opened or read.
    Io,
    /// An input was read but its contents were invalid.
    MalformedInput,
    /// The operation needs data that has not been loaded or computed.
    PreconditionUnmet,
}

/// Errors returned by [`Session`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Opening or reading an input failed.
    #[error("failed to read {origin}: {source}")]
    Read {
        /// Path or description of the input.
        origin: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The map contents were invalid.
    #[error("malformed map {origin}: {source}")]
    MalformedMap {
        /// Path or description of the input.
        origin: String,
        /// Parse failure.
        #[source]
        source: MapFormatError,
    },
    /// Required data was missing.
    #[error(transparent)]
    PreconditionUnmet(#[from] PreconditionError),
}

impl SessionError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } => ErrorKind::Io,
            Self::MalformedMap { .. } => ErrorKind::MalformedInput,
            Self::PreconditionUnmet(_) => ErrorKind::PreconditionUnmet,
        }
    }
}

/// Summary of a successful map load.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLoadReport {
    /// Nodes in the new network.
    pub node_count: usize,
    /// Distinct edges in the new network.
    pub edge_count: usize,
    /// Edges declared in the map header.
    pub declared_edges: usize,
    /// Edges skipped because of bad endpoints or weights.
    pub skipped: Vec<SkippedEdge>,
}

/// Summary of a package load.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageLoadReport {
    /// Packages now loaded.
    pub package_count: usize,
    /// Trailing tokens ignored after parsing stopped.
    pub discarded_tokens: usize,
    /// Why parsing stopped early, if it did.
    pub issue: Option<PackageFormatIssue>,
}

/// Owns the state of one evaluation session.
///
/// # Examples
///
/// ```
/// use courier_core::{ReportView, Session};
///
/// # fn main() -> Result<(), courier_core::SessionError> {
/// let mut session = Session::default();
/// session.load_map_from("2 1\nA B\n1 2 10.0\n".as_bytes())?;
/// session.load_packages_from("P2 5 B 0 20\n".as_bytes())?;
///
/// let result = session.evaluate()?;
/// assert_eq!(result.total_cost, 1050.0);
/// assert_eq!(result.late_packages, 0);
/// assert!(session.render(ReportView::Results)?.contains("Late packages: 0"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    graph: NetworkGraph,
    packages: PackageSet,
    vehicle: Vehicle,
    routing: RoutingMode,
    last_result: Option<EvaluationResult>,
}

impl Session {
    /// Start an empty session with the given vehicle profile.
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            ..Self::default()
        }
    }

    /// Select the routing strategy, returning `self` for chaining.
    pub fn with_routing(mut self, routing: RoutingMode) -> Self {
        self.set_routing(routing);
        self
    }

    /// Select the routing strategy. Clears any stored result.
    pub fn set_routing(&mut self, routing: RoutingMode) {
        if self.routing != routing {
            self.routing = routing;
            self.last_result = None;
        }
    }

    /// Current routing strategy.
    pub const fn routing(&self) -> RoutingMode {
        self.routing
    }

    /// Loaded network; empty until a map loads.
    pub const fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    /// Loaded packages.
    pub const fn packages(&self) -> &PackageSet {
        &self.packages
    }

    /// Vehicle profile.
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Result of the last evaluation, if still current.
    pub const fn last_result(&self) -> Option<&EvaluationResult> {
        self.last_result.as_ref()
    }

    /// Load a map file, replacing the current network.
    ///
    /// # Errors
    /// Returns [`SessionError::Read`] when the file cannot be read and
    /// [`SessionError::MalformedMap`] when its contents, including their
    /// encoding, are invalid. The current network is unchanged on error.
    pub fn load_map(&mut self, path: &Utf8Path) -> Result<MapLoadReport, SessionError> {
        let bytes = read_path(path)?;
        self.apply_map(&bytes, path.as_str())
    }

    /// Load a map from any reader, replacing the current network.
    ///
    /// # Errors
    /// As for [`Session::load_map`].
    pub fn load_map_from<R: Read>(&mut self, mut reader: R) -> Result<MapLoadReport, SessionError> {
        let bytes = read_all(&mut reader)?;
        self.apply_map(&bytes, READER_ORIGIN)
    }

    fn apply_map(&mut self, bytes: &[u8], origin: &str) -> Result<MapLoadReport, SessionError> {
        let MapLoad {
            graph,
            declared_edges,
            skipped,
        } = parse_map_bytes(bytes).map_err(|source| SessionError::MalformedMap {
            origin: origin.to_owned(),
            source,
        })?;
        let report = MapLoadReport {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            declared_edges,
            skipped,
        };
        info!(
            "Loaded map {origin}: {} nodes, {} edges, {} skipped",
            report.node_count,
            report.edge_count,
            report.skipped.len()
        );
        self.graph = graph;
        self.last_result = None;
        Ok(report)
    }

    /// Load a package file, replacing the current package set.
    ///
    /// # Errors
    /// Returns [`SessionError::Read`] when the file cannot be read. Malformed
    /// trailing records are reported in the returned summary instead, and
    /// invalid UTF-8 is replaced rather than rejected.
    pub fn load_packages(&mut self, path: &Utf8Path) -> Result<PackageLoadReport, SessionError> {
        let bytes = read_path(path)?;
        Ok(self.apply_packages(&bytes, path.as_str()))
    }

    /// Load packages from any reader, replacing the current package set.
    ///
    /// # Errors
    /// As for [`Session::load_packages`].
    pub fn load_packages_from<R: Read>(
        &mut self,
        mut reader: R,
    ) -> Result<PackageLoadReport, SessionError> {
        let bytes = read_all(&mut reader)?;
        Ok(self.apply_packages(&bytes, READER_ORIGIN))
    }

    fn apply_packages(&mut self, bytes: &[u8], origin: &str) -> PackageLoadReport {
        let PackageLoad {
            packages,
            discarded_tokens,
            issue,
        } = parse_package_bytes(bytes);
        info!("Loaded {} packages from {origin}", packages.len());
        let report = PackageLoadReport {
            package_count: packages.len(),
            discarded_tokens,
            issue,
        };
        self.packages = packages;
        self.last_result = None;
        report
    }

    /// Evaluate the loaded packages and keep the result for rendering.
    ///
    /// # Errors
    /// Returns [`SessionError::PreconditionUnmet`] when no network or no
    /// packages are loaded.
    pub fn evaluate(&mut self) -> Result<&EvaluationResult, SessionError> {
        let result = RouteEvaluator::new(&self.graph, &self.packages, &self.vehicle)
            .evaluate_with_mode(self.routing)?;
        Ok(self.last_result.insert(result))
    }

    /// Render a report of the current state.
    ///
    /// The info view always renders. The results view needs an evaluation
    /// run since the last map or package load.
    ///
    /// # Errors
    /// Returns [`SessionError::PreconditionUnmet`] for the results view when
    /// no current result exists.
    pub fn render(&self, view: ReportView) -> Result<String, SessionError> {
        let report = match view {
            ReportView::Info => ResultReport::info(&self.graph, &self.packages, &self.vehicle),
            ReportView::Results => {
                let result = self
                    .last_result
                    .as_ref()
                    .ok_or(PreconditionError::EvaluationMissing)?;
                ResultReport::results(&self.graph, &self.packages, &self.vehicle, result)
            }
        };
        Ok(report.to_string())
    }
}

fn read_path(path: &Utf8Path) -> Result<Vec<u8>, SessionError> {
    read_file_bytes(path).map_err(|source| SessionError::Read {
        origin: path.to_string(),
        source,
    })
}

fn read_all<R: Read>(reader: &mut R) -> Result<Vec<u8>, SessionError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| SessionError::Read {
            origin: READER_ORIGIN.to_owned(),
            source,
        })?;
    Ok(bytes)
}

//! Facade crate for the courier delivery evaluator.
//!
//! This crate re-exports the core domain types so callers can depend on a
//! single package. The optional `serde` feature forwards to `courier-core`.

#![forbid(unsafe_code)]

pub use courier_core::format;
pub use courier_core::{
    DepotCost, DestinationSummary, ErrorKind, EvaluationResult, NetworkGraph, Package, PackageSet,
    PreconditionError, ReportView, ResultReport, RouteEvaluator, RoutingMode, Session,
    SessionError, Vehicle,
};

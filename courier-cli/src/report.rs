//! Report command: print whatever state the given inputs produce.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::{ReportView, Session, Vehicle};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_MAP, ARG_MAX_LOAD, ARG_PACKAGES, ARG_SPEED, ARG_VEHICLE_WEIGHT, CliError, build_vehicle,
    require_existing, write_load_warnings,
};

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the network, package list and vehicle profile. Both \
                 inputs are optional; missing ones are reported as not loaded.",
    about = "Print the loaded network, packages and vehicle"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct ReportArgs {
    /// Path to the map file.
    #[arg(long = ARG_MAP, value_name = "path")]
    #[serde(default)]
    pub(crate) map: Option<Utf8PathBuf>,
    /// Path to the package file.
    #[arg(long = ARG_PACKAGES, value_name = "path")]
    #[serde(default)]
    pub(crate) packages: Option<Utf8PathBuf>,
    /// Vehicle speed in distance units per time unit.
    #[arg(long = ARG_SPEED, value_name = "speed")]
    #[serde(default)]
    pub(crate) speed: Option<f64>,
    /// Unladen vehicle weight.
    #[arg(long = ARG_VEHICLE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) vehicle_weight: Option<f64>,
    /// Vehicle maximum load.
    #[arg(long = ARG_MAX_LOAD, value_name = "load")]
    #[serde(default)]
    pub(crate) max_load: Option<f64>,
}

impl ReportArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReportConfig::try_from(merged)
    }
}

/// Resolved `report` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportConfig {
    pub(crate) map: Option<Utf8PathBuf>,
    pub(crate) packages: Option<Utf8PathBuf>,
    pub(crate) vehicle: Vehicle,
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = CliError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            vehicle: build_vehicle(args.speed, args.vehicle_weight, args.max_load)?,
            map: args.map,
            packages: args.packages,
        })
    }
}

pub(super) fn run_report_with(args: ReportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut session = Session::new(config.vehicle);
    let map_report = match &config.map {
        Some(map) => {
            require_existing(map, ARG_MAP)?;
            Some(session.load_map(map)?)
        }
        None => None,
    };
    let package_report = match &config.packages {
        Some(packages) => {
            require_existing(packages, ARG_PACKAGES)?;
            Some(session.load_packages(packages)?)
        }
        None => None,
    };
    write_load_warnings(writer, map_report.as_ref(), package_report.as_ref())?;
    let text = session.render(ReportView::Info)?;
    writer
        .write_all(text.as_bytes())
        .map_err(CliError::WriteOutput)
}

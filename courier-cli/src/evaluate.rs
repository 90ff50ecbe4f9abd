//! Evaluate command implementation for the courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::{EvaluationResult, ReportView, RoutingMode, Session, Vehicle};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FORMAT, ARG_MAP, ARG_MAX_LOAD, ARG_PACKAGES, ARG_ROUTING, ARG_SPEED, ARG_VEHICLE_WEIGHT,
    CliError, ENV_EVALUATE_MAP, ENV_EVALUATE_PACKAGES, OutputFormat, build_vehicle,
    require_existing, write_load_warnings,
};

/// CLI arguments for the `evaluate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a map and a package list, cost every destination group \
                 as one trip from the depot and report the total cost and the \
                 packages that miss their deadline. Paths can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Evaluate a package list against a map"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct EvaluateArgs {
    /// Path to the map file.
    #[arg(long = ARG_MAP, value_name = "path")]
    #[serde(default)]
    pub(crate) map: Option<Utf8PathBuf>,
    /// Path to the package file.
    #[arg(long = ARG_PACKAGES, value_name = "path")]
    #[serde(default)]
    pub(crate) packages: Option<Utf8PathBuf>,
    /// Distance strategy: `direct` (default) or `shortest-path`.
    #[arg(long = ARG_ROUTING, value_name = "mode")]
    #[serde(default)]
    pub(crate) routing: Option<RoutingMode>,
    /// Output encoding.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
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

impl EvaluateArgs {
    pub(crate) fn into_config(self) -> Result<EvaluateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        EvaluateConfig::try_from(merged)
    }
}

/// Resolved `evaluate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EvaluateConfig {
    /// Path to the map file.
    pub(crate) map: Utf8PathBuf,
    /// Path to the package file.
    pub(crate) packages: Utf8PathBuf,
    /// Distance strategy.
    pub(crate) routing: RoutingMode,
    /// Output encoding.
    pub(crate) format: OutputFormat,
    /// Validated vehicle profile.
    pub(crate) vehicle: Vehicle,
}

impl EvaluateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.map, ARG_MAP)?;
        require_existing(&self.packages, ARG_PACKAGES)?;
        Ok(())
    }
}

impl TryFrom<EvaluateArgs> for EvaluateConfig {
    type Error = CliError;

    fn try_from(args: EvaluateArgs) -> Result<Self, Self::Error> {
        let map = args.map.ok_or(CliError::MissingArgument {
            field: ARG_MAP,
            env: ENV_EVALUATE_MAP,
        })?;
        let packages = args.packages.ok_or(CliError::MissingArgument {
            field: ARG_PACKAGES,
            env: ENV_EVALUATE_PACKAGES,
        })?;
        let vehicle = build_vehicle(args.speed, args.vehicle_weight, args.max_load)?;
        Ok(Self {
            map,
            packages,
            routing: args.routing.unwrap_or_default(),
            format: args.format.unwrap_or_default(),
            vehicle,
        })
    }
}

pub(super) fn run_evaluate_with(
    args: EvaluateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_evaluate_config(args)?;
    let mut session = Session::new(config.vehicle).with_routing(config.routing);
    let map_report = session.load_map(&config.map)?;
    let package_report = session.load_packages(&config.packages)?;
    let result = session.evaluate()?.clone();
    info!("Evaluated {} using {} routing", config.packages, config.routing);

    match config.format {
        OutputFormat::Text => {
            write_load_warnings(writer, Some(&map_report), Some(&package_report))?;
            let text = session.render(ReportView::Results)?;
            writer
                .write_all(text.as_bytes())
                .map_err(CliError::WriteOutput)
        }
        OutputFormat::Json => write_evaluation_json(writer, &result),
    }
}

fn resolve_evaluate_config(args: EvaluateArgs) -> Result<EvaluateConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_evaluation_json(
    writer: &mut dyn Write,
    result: &EvaluationResult,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerialiseResult)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

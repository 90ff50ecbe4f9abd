//! Command-line interface for the courier delivery evaluator.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use courier_core::{MapLoadReport, PackageLoadReport, Vehicle};
use serde::{Deserialize, Serialize};

mod error;
mod evaluate;
mod report;
mod shell;

pub use error::CliError;

use evaluate::{EvaluateArgs, run_evaluate_with};
use report::{ReportArgs, run_report_with};
use shell::{ShellArgs, run_shell_with};

pub(crate) const ARG_MAP: &str = "map";
pub(crate) const ARG_PACKAGES: &str = "packages";
pub(crate) const ARG_ROUTING: &str = "routing";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_SPEED: &str = "speed";
pub(crate) const ARG_VEHICLE_WEIGHT: &str = "vehicle-weight";
pub(crate) const ARG_MAX_LOAD: &str = "max-load";
pub(crate) const ENV_EVALUATE_MAP: &str = "COURIER_CMDS_EVALUATE_MAP";
pub(crate) const ENV_EVALUATE_PACKAGES: &str = "COURIER_CMDS_EVALUATE_PACKAGES";

/// Run the courier CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ClapErrorKind::DisplayHelp
                    | ClapErrorKind::DisplayVersion
                    | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            return err.print().map_err(CliError::WriteOutput);
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Evaluate(args) => run_evaluate_with(args, &mut stdout),
        Command::Report(args) => run_report_with(args, &mut stdout),
        Command::Shell(args) => run_shell_with(args, std::io::stdin().lock(), &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Evaluate delivery cost and lateness over a weighted road network",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a package list against a map and print the results.
    Evaluate(EvaluateArgs),
    /// Print the loaded network, packages and vehicle profile.
    Report(ReportArgs),
    /// Start an interactive session reading commands from standard input.
    Shell(ShellArgs),
}

/// Output encoding for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Fill unset vehicle options with defaults and validate the profile.
pub(crate) fn build_vehicle(
    speed: Option<f64>,
    weight: Option<f64>,
    max_load: Option<f64>,
) -> Result<Vehicle, CliError> {
    let vehicle = Vehicle::new(
        speed.unwrap_or(Vehicle::DEFAULT_SPEED),
        weight.unwrap_or(Vehicle::DEFAULT_WEIGHT),
        max_load.unwrap_or(Vehicle::DEFAULT_MAX_LOAD),
    )?;
    Ok(vehicle)
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match courier_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Print one warning per skipped edge and one for an early stop in the
/// package list.
pub(crate) fn write_load_warnings(
    writer: &mut dyn Write,
    map: Option<&MapLoadReport>,
    packages: Option<&PackageLoadReport>,
) -> Result<(), CliError> {
    for skip in map.into_iter().flat_map(|report| &report.skipped) {
        writeln!(
            writer,
            "warning: skipped edge {} ({}-{}, weight {}): {}",
            skip.position + 1,
            skip.edge.from,
            skip.edge.to,
            skip.edge.weight,
            skip.reason
        )
        .map_err(CliError::WriteOutput)?;
    }
    if let Some(PackageLoadReport {
        issue: Some(issue),
        discarded_tokens,
        ..
    }) = packages
    {
        writeln!(
            writer,
            "warning: stopped reading packages: {issue}; {discarded_tokens} tokens discarded"
        )
        .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;

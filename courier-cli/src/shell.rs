//! Interactive shell: one session, commands read line by line.
//!
//! A failing command prints its error and leaves the session as it was; only
//! `quit`, end of input, or an IO failure on the terminal ends the loop.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::{
    MapLoadReport, PackageLoadReport, ReportView, ReportViewError, RoutingMode, RoutingModeError,
    Session, Vehicle,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ARG_MAX_LOAD, ARG_ROUTING, ARG_SPEED, ARG_VEHICLE_WEIGHT, CliError, build_vehicle};

const PROMPT: &str = "courier> ";

const HELP: &str = "\
Commands:
  load-map <path>        load a map, replacing the current network
  load-packages <path>   load packages, replacing the current list
  evaluate               cost the loaded packages against the network
  render [info|results]  print the loaded state or the latest results
  routing <mode>         switch between `direct` and `shortest-path`
  help                   show this list
  quit                   leave the shell";

/// CLI arguments for the `shell` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read commands from standard input and run them against a \
                 single session. Errors are printed and the session carries \
                 on with whatever was loaded before.",
    about = "Start an interactive session"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct ShellArgs {
    /// Initial distance strategy.
    #[arg(long = ARG_ROUTING, value_name = "mode")]
    #[serde(default)]
    pub(crate) routing: Option<RoutingMode>,
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

impl ShellArgs {
    pub(crate) fn into_config(self) -> Result<ShellConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShellConfig::try_from(merged)
    }
}

/// Resolved `shell` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShellConfig {
    pub(crate) routing: RoutingMode,
    pub(crate) vehicle: Vehicle,
}

impl TryFrom<ShellArgs> for ShellConfig {
    type Error = CliError;

    fn try_from(args: ShellArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            routing: args.routing.unwrap_or_default(),
            vehicle: build_vehicle(args.speed, args.vehicle_weight, args.max_load)?,
        })
    }
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    LoadMap(Utf8PathBuf),
    LoadPackages(Utf8PathBuf),
    Evaluate,
    Render(ReportView),
    Routing(RoutingMode),
    Help,
    Quit,
}

/// Errors raised while parsing a shell command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ShellCommandError {
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    View(#[from] ReportViewError),
    #[error(transparent)]
    Routing(#[from] RoutingModeError),
    #[error("unknown command {0:?}; type `help` for a list")]
    Unknown(String),
}

impl FromStr for ShellCommand {
    type Err = ShellCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let (word, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(word, rest)| (word, rest.trim()));
        let argument = |command: &'static str, expected: &'static str| {
            if rest.is_empty() {
                Err(ShellCommandError::MissingArgument { command, expected })
            } else {
                Ok(rest)
            }
        };
        match word.to_ascii_lowercase().as_str() {
            "load-map" => Ok(Self::LoadMap(argument("load-map", "a path")?.into())),
            "load-packages" => Ok(Self::LoadPackages(argument("load-packages", "a path")?.into())),
            "evaluate" => Ok(Self::Evaluate),
            "render" if rest.is_empty() => Ok(Self::Render(ReportView::Info)),
            "render" => Ok(Self::Render(rest.parse()?)),
            "routing" => Ok(Self::Routing(argument("routing", "a mode")?.parse()?)),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ShellCommandError::Unknown(word.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub(super) fn run_shell_with<R: BufRead>(
    args: ShellArgs,
    input: R,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut session = Session::new(config.vehicle).with_routing(config.routing);
    run_script(&mut session, input, output)
}

/// Execute commands from `input` until `quit` or end of input.
pub(crate) fn run_script<R: BufRead>(
    session: &mut Session,
    mut input: R,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let mut line = String::new();
    loop {
        output
            .write_all(PROMPT.as_bytes())
            .and_then(|()| output.flush())
            .map_err(CliError::WriteOutput)?;
        line.clear();
        if input.read_line(&mut line).map_err(CliError::ReadInput)? == 0 {
            return say(output, "");
        }
        if line.trim().is_empty() {
            continue;
        }
        let flow = match line.parse::<ShellCommand>() {
            Ok(command) => execute(session, command, output)?,
            Err(err) => {
                say(output, format_args!("error: {err}"))?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

fn execute(
    session: &mut Session,
    command: ShellCommand,
    output: &mut dyn Write,
) -> Result<Flow, CliError> {
    let outcome = match command {
        ShellCommand::LoadMap(path) => session.load_map(&path).map(|report| describe_map(&report)),
        ShellCommand::LoadPackages(path) => session
            .load_packages(&path)
            .map(|report| describe_packages(&report)),
        ShellCommand::Evaluate => session.evaluate().map(|result| {
            format!(
                "Total transport cost: {}\nLate packages: {}\nPackages without a route: {}",
                result.total_cost, result.late_packages, result.unreachable_packages
            )
        }),
        ShellCommand::Render(view) => session
            .render(view)
            .map(|text| text.trim_end().to_owned()),
        ShellCommand::Routing(mode) => {
            session.set_routing(mode);
            Ok(format!("Routing set to {mode}"))
        }
        ShellCommand::Help => Ok(HELP.to_owned()),
        ShellCommand::Quit => return Ok(Flow::Quit),
    };
    match outcome {
        Ok(text) => say(output, text)?,
        Err(err) => say(output, format_args!("error: {err}"))?,
    }
    Ok(Flow::Continue)
}

fn describe_map(report: &MapLoadReport) -> String {
    let mut text = format!(
        "Loaded map: {} nodes, {} edges",
        report.node_count, report.edge_count
    );
    if !report.skipped.is_empty() {
        text.push_str(&format!(
            " ({} of {} declared edges skipped)",
            report.skipped.len(),
            report.declared_edges
        ));
    }
    text
}

fn describe_packages(report: &PackageLoadReport) -> String {
    let mut text = format!("Loaded {} packages", report.package_count);
    if let Some(issue) = &report.issue {
        text.push_str(&format!(
            " (stopped early: {issue}; {} tokens discarded)",
            report.discarded_tokens
        ));
    }
    text
}

fn say(output: &mut dyn Write, line: impl Display) -> Result<(), CliError> {
    writeln!(output, "{line}").map_err(CliError::WriteOutput)
}

//! Operator CLI over the period algebra.
//!
//! # Responsibility
//! - Provide a small executable to verify `caseline_core` linkage.
//! - Evaluate period notation from the command line with deterministic output.
//!
//! # Invariants
//! - Period arguments go through `parse_period_unbounded`, so any line the
//!   CLI prints can be passed back in as an argument.

use caseline_core::{
    fully_covered_by, gaps, parse_period_unbounded, reduce_to_minimal_span, subtract_all,
    CoreConfig, Period,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "caseline", version, about = "Month-aligned period algebra")]
struct Cli {
    /// Log level (trace|debug|info|warn|error); overrides CASELINE_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory; overrides CASELINE_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a liveness check.
    Ping,
    /// Print the core crate version.
    Version,
    /// List the months of a period.
    Months {
        #[arg(value_parser = parse_period_unbounded)]
        period: Period,
    },
    /// Reduce periods to the minimal ordered set covering the same months.
    Reduce {
        #[arg(required = true, value_parser = parse_period_unbounded)]
        periods: Vec<Period>,
    },
    /// Remove periods from a base period.
    Subtract {
        #[arg(value_parser = parse_period_unbounded)]
        base: Period,
        #[arg(required = true, value_parser = parse_period_unbounded)]
        remove: Vec<Period>,
    },
    /// Check whether periods cover a target exactly, listing any gaps.
    Covered {
        #[arg(value_parser = parse_period_unbounded)]
        target: Period,
        #[arg(required = true, value_parser = parse_period_unbounded)]
        periods: Vec<Period>,
    },
    /// Print a period in its JSON wire form.
    Json {
        #[arg(value_parser = parse_period_unbounded)]
        period: Period,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("caseline: {message}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = config.init_logging() {
        eprintln!("caseline: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("caseline: {message}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level).map_err(|err| err.to_string())?;
    }
    if let Some(dir) = &cli.log_dir {
        config = config
            .with_log_dir(dir.clone())
            .map_err(|err| err.to_string())?;
    }
    Ok(config)
}

fn run(command: Command) -> Result<Vec<String>, String> {
    info!("event=cli_command module=cli command={command:?}");
    let lines = match command {
        Command::Ping => vec![format!("caseline_core ping={}", caseline_core::ping())],
        Command::Version => vec![format!(
            "caseline_core version={}",
            caseline_core::core_version()
        )],
        Command::Months { period } => period.months().map(|month| month.to_string()).collect(),
        Command::Reduce { periods } => render(&reduce_to_minimal_span(&periods)),
        Command::Subtract { base, remove } => render(&subtract_all(&[base], &remove)),
        Command::Covered { target, periods } => {
            let mut lines = vec![format!(
                "covered={}",
                fully_covered_by(target, &periods)
            )];
            lines.extend(
                gaps(target, &periods)
                    .iter()
                    .map(|gap| format!("gap={gap}")),
            );
            lines
        }
        Command::Json { period } => {
            vec![serde_json::to_string(&period).map_err(|err| err.to_string())?]
        }
    };
    Ok(lines)
}

fn render(periods: &[Period]) -> Vec<String> {
    periods.iter().map(Period::to_string).collect()
}

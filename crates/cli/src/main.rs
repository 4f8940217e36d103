//! tmsim - traffic manager pipeline driver
//!
//! Runs synthetic agents around a ring road through the localization,
//! collision and planning stages, and reports what the shared registry and
//! the stage links saw.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod error;
mod output;
mod run;
mod stages;
mod world;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trafficmanager_pipeline::TrafficManagerConfig;
use trafficmanager_waypoint::compute_key;

use crate::error::CliError;
use crate::run::SimParams;

#[derive(Parser)]
#[command(name = "tmsim")]
#[command(about = "Drive synthetic traffic through the traffic manager pipeline")]
#[command(version)]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Number of agents
        #[arg(short, long, default_value_t = 16)]
        agents: u32,

        /// Number of ticks
        #[arg(short, long, default_value_t = 200)]
        ticks: u32,

        /// Lanes on the ring road
        #[arg(long, default_value_t = 2)]
        lanes: u8,

        /// Ring length in metres
        #[arg(long, default_value_t = 400.0)]
        ring_length: f64,

        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Session configuration file (JSON)
        #[arg(short, long, env = "TMSIM_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the waypoint key of a road position
    Key {
        /// Road id
        road: u32,
        /// Lane section id
        section: u32,
        /// Signed lane id
        #[arg(allow_negative_numbers = true)]
        lane: i32,
        /// Arc length in metres
        s: f64,
    },

    /// Print the default configuration, or validate a configuration file
    Config {
        /// File to validate
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tmsim={log_level},trafficmanager={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            std::process::exit(i32::from(exit_code));
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run {
            agents,
            ticks,
            lanes,
            ring_length,
            seed,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            if *lanes == 0 {
                return Err(CliError::InvalidArgument("--lanes must be at least 1".into()).into());
            }
            if !ring_length.is_finite() || *ring_length < 20.0 {
                return Err(
                    CliError::InvalidArgument("--ring-length must be at least 20 m".into()).into(),
                );
            }
            let params = SimParams {
                agents: *agents,
                ticks: *ticks,
                lanes: *lanes,
                ring_length_m: *ring_length,
                seed: *seed,
            };
            let report = run::run(params, &config)?;
            output::print_report(&report, cli.json);
            Ok(())
        }
        Commands::Key {
            road,
            section,
            lane,
            s,
        } => {
            let key = compute_key(*road, *section, *lane, *s);
            if cli.json {
                output::print_json(&json!({
                    "success": true,
                    "road": road,
                    "section": section,
                    "lane": lane,
                    "s": s,
                    "key": key,
                    "hex": key.to_string(),
                }));
            } else {
                println!("{key}");
            }
            Ok(())
        }
        Commands::Config { check } => {
            match check {
                Some(path) => {
                    let config =
                        TrafficManagerConfig::load_from_path(path).map_err(CliError::from)?;
                    if cli.json {
                        output::print_json(&json!({ "success": true, "config": config }));
                    } else {
                        println!("{} is valid", path.display());
                    }
                }
                None => output::print_json(&TrafficManagerConfig::default()),
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<TrafficManagerConfig, CliError> {
    match path {
        Some(path) => Ok(TrafficManagerConfig::load_from_path(path)?),
        None => Ok(TrafficManagerConfig::default()),
    }
}

pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tapparelle_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing::Level;

use crate::commands::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(
    name = "tapparelle",
    about = "Shutter quoting assistant CLI",
    long_about = "Estimate shutter weight, price quotes against the product catalog, inspect configuration and check readiness.",
    after_help = "Examples:\n  tapparelle weight --dimension 120x100 --material pvc\n  tapparelle quote --dimension 120x100 --material pvc --color bianco --accessory Zanzariera\n  tapparelle doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Estimate shutter weight and the minimum motor power (offline)")]
    Weight {
        #[arg(long, help = "Width x height in centimetres, e.g. 120x100")]
        dimension: String,
        #[arg(long, help = "Shutter material, e.g. pvc or alluminio coibentato")]
        material: String,
    },
    #[command(about = "Price a full shutter quote against the catalog backend")]
    Quote {
        #[arg(long, help = "Width x height in centimetres, e.g. 120x100")]
        dimension: String,
        #[arg(long)]
        material: String,
        #[arg(long)]
        color: String,
        #[arg(long, help = "Operation type, shown on the quote only")]
        manovra: Option<String>,
        #[arg(long, help = "Motor brand or exact motor name; cheapest suitable motor if omitted")]
        motor: Option<String>,
        #[arg(long)]
        button: Option<String>,
        #[arg(long = "accessory", help = "Accessory name, repeatable")]
        accessories: Vec<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and check catalog reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

/// Installs the global subscriber. Logs go to stderr so command output stays parseable.
pub fn init_logging(logging: &LoggingConfig) {
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!(event_name = "cli.logging_already_initialized", "subscriber already set");
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Weight { dimension, material } => commands::weight::run(&dimension, &material),
        Command::Quote { dimension, material, color, manovra, motor, button, accessories } => {
            commands::quote::run(QuoteArgs {
                dimension,
                material,
                color,
                manovra,
                motor,
                button,
                accessories,
            })
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

//! batch-runner binary entry point.

use std::path::Path;

use batch_runner::Settings;
use batch_runner::cli::commands::{calc, init, run};
use batch_runner::cli::{Cli, Commands, RunArgs};
use batch_runner::logging;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        // Invoked once per record when the binary is its own calculator: no config I/O
        Some(Commands::Calc {
            trip_duration_days,
            miles_traveled,
            total_receipts_amount,
            noise,
        }) => calc::run_calc(
            &trip_duration_days,
            &miles_traveled,
            &total_receipts_amount,
            noise,
        ),
        Some(Commands::Init { force }) => exit_on_error(init::run_init(force)),
        Some(Commands::Config) => exit_on_error(init::run_config(&load_settings(config_path))),
        Some(Commands::Run(args)) => {
            exit_on_error(run::run_batch(&args, &load_settings(config_path)).map(drop))
        }
        None => exit_on_error(
            run::run_batch(&RunArgs::default(), &load_settings(config_path)).map(drop),
        ),
    }
}

/// Load layered settings and start logging from them.
fn load_settings(config_path: Option<&Path>) -> Settings {
    let loaded = match config_path {
        Some(path) if !path.exists() => {
            eprintln!("Configuration error: {} not found", path.display());
            std::process::exit(1);
        }
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    logging::init_with_config(&settings.logging);
    settings
}

/// Report a command failure as a single `Error: ...` line and exit 1.
fn exit_on_error(result: anyhow::Result<()>) {
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

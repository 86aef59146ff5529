//! CLI argument parsing using clap.
//!
//! Contains the Cli struct, Commands enum, and the run overrides.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::config::{FailurePolicy, Settings};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Batch runner for reimbursement test cases
#[derive(Parser, Debug)]
#[command(
    name = "batch-runner",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run every test case through an external calculator",
    long_about = "Reads a JSON array of test cases, invokes the calculator once per case \
                  with (days, miles, receipts) and writes one result line per case.\n\n\
                  With no subcommand, runs the batch using the configured defaults \
                  (private_cases.json -> private_results.txt).",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every case through the calculator (default)
    Run(RunArgs),

    /// Compute one reimbursement with the built-in model
    #[command(allow_negative_numbers = true)]
    Calc {
        /// Trip duration in days (integer)
        trip_duration_days: String,

        /// Miles traveled
        miles_traveled: String,

        /// Total receipts amount
        total_receipts_amount: String,

        /// Scale the result by a random 95-105% factor
        #[arg(long)]
        noise: bool,
    },

    /// Set up .batch-runner/settings.toml
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,
}

/// Per-invocation overrides for the batch run.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// JSON file of test cases (overrides config)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Results file (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to do when the calculator fails for a case
    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Calculator program and leading arguments, e.g. `-- python3 calc.py`
    #[arg(last = true)]
    pub calculator: Vec<String>,
}

impl RunArgs {
    /// Layer these overrides on top of the loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.runner.input = input.clone();
        }
        if let Some(output) = &self.output {
            settings.runner.output = output.clone();
        }
        if let Some(policy) = self.on_failure {
            settings.runner.on_failure = policy;
        }
        if self.no_progress {
            settings.runner.progress = false;
        }
        if !self.calculator.is_empty() {
            settings.calculator.command = self.calculator.clone();
        }
    }
}

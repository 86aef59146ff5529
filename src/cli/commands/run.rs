//! Run command - drive the calculator over every test case.

use anyhow::Result;
use console::style;

use crate::batch::{BatchRunner, ProcessCalculator, RunSummary};
use crate::cli::RunArgs;
use crate::config::Settings;

/// Run the batch with `args` layered over `settings`.
pub fn run_batch(args: &RunArgs, settings: &Settings) -> Result<RunSummary> {
    let mut settings = settings.clone();
    args.apply(&mut settings);

    let calculator = ProcessCalculator::from_config(&settings.calculator)?;
    tracing::debug!(
        target: "cli",
        "calculator: {:?}, input: {}, output: {}",
        settings.calculator.command,
        settings.runner.input.display(),
        settings.runner.output.display()
    );

    let summary = BatchRunner::new(calculator)
        .with_failure_policy(settings.runner.on_failure)
        .with_progress(settings.runner.progress)
        .run(&settings.runner.input, &settings.runner.output)?;

    if summary.failures > 0 {
        eprintln!(
            "{} {} of {} calculator runs failed",
            style("warning:").yellow().bold(),
            summary.failures,
            summary.records
        );
    }
    println!(
        "{} Results written to {}",
        style("✓").green(),
        summary.output.display()
    );

    Ok(summary)
}

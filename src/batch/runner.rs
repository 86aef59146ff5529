//! The batch loop: cases in, one calculator line per case out.

use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use super::calculator::Calculator;
use super::record::Cases;
use crate::config::FailurePolicy;
use crate::error::{RunnerError, RunnerResult};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines written, one per record
    pub records: usize,
    /// Records whose calculator run failed but were kept under `continue`
    pub failures: usize,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Drives a [`Calculator`] over every trip in an input file.
///
/// Execution is strictly sequential: each invocation finishes before the
/// next starts, and line `i` of the output always belongs to record `i`.
pub struct BatchRunner<C> {
    calculator: C,
    on_failure: FailurePolicy,
    progress: bool,
}

impl<C: Calculator> BatchRunner<C> {
    pub fn new(calculator: C) -> Self {
        Self {
            calculator,
            on_failure: FailurePolicy::default(),
            progress: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Run the whole batch.
    ///
    /// The input is checked and parsed before `output` is opened, so a missing
    /// or malformed input file leaves any previous results untouched. Once
    /// processing starts the output is truncated and every line is flushed as
    /// soon as it is written; a fatal error keeps the lines before it.
    pub fn run(&mut self, input: &Path, output: &Path) -> RunnerResult<RunSummary> {
        let start = Instant::now();
        let cases = Cases::load(input)?;
        let total = cases.len();

        tracing::info!(
            target: "runner",
            "Processing {} records from {}",
            total,
            input.display()
        );

        let write_err = |source: std::io::Error| RunnerError::OutputWrite {
            path: output.to_path_buf(),
            source,
        };
        let mut writer = LineWriter::new(File::create(output).map_err(write_err)?);

        let bar = self.progress_bar(total);
        let mut failures = 0;

        for (index, trip) in cases.into_trips().enumerate() {
            let trip = trip?;
            let invocation = self.calculator.invoke(&trip);

            if let Some(reason) = invocation.failure {
                match self.on_failure {
                    FailurePolicy::Abort => {
                        bar.abandon();
                        return Err(RunnerError::CalculatorFailed { index, reason });
                    }
                    FailurePolicy::Continue => {
                        failures += 1;
                        // Keep the warning from tearing the progress bar
                        bar.suspend(|| {
                            tracing::warn!(
                                target: "runner",
                                "Record {} ({}): calculator failed: {}",
                                index,
                                trip.args().join(", "),
                                reason
                            )
                        });
                    }
                }
            }

            writeln!(writer, "{}", invocation.stdout.trim_end_matches(['\r', '\n']))
                .map_err(write_err)?;
            bar.inc(1);
        }

        writer.flush().map_err(write_err)?;
        bar.finish_and_clear();

        let summary = RunSummary {
            records: total,
            failures,
            output: output.to_path_buf(),
            elapsed: start.elapsed(),
        };

        tracing::info!(
            target: "runner",
            "Wrote {} lines to {} ({} failed) in {:?}",
            summary.records,
            output.display(),
            summary.failures,
            summary.elapsed
        );

        Ok(summary)
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template("{bar:28.cyan/blue} {pos}/{len} records {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(total as u64).with_style(style)
    }
}

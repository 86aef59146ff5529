//! Batch execution of test cases against an external calculator.
//!
//! - `record` - input file parsing and trip extraction
//! - `calculator` - the calculator trait and its process-backed implementation
//! - `runner` - the sequential invocation loop and results file

pub mod calculator;
pub mod record;
pub mod runner;

pub use calculator::{Calculator, Invocation, ProcessCalculator};
pub use record::{Cases, Trip, Trips};
pub use runner::{BatchRunner, RunSummary};

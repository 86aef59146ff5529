pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod reimbursement;

pub use batch::{BatchRunner, Calculator, Cases, Invocation, ProcessCalculator, RunSummary, Trip};
pub use config::{FailurePolicy, Settings};
pub use error::{RunnerError, RunnerResult};

//! Calc command - the built-in reimbursement model as a standalone calculator.

use crate::reimbursement::{self, TripInputs};

/// Print the reimbursement for one trip on stdout.
///
/// Bad numbers are reported as `Error: Invalid input format (...)` with exit code 1.
pub fn run_calc(days: &str, miles: &str, receipts: &str, noise: bool) {
    match TripInputs::parse(days, miles, receipts) {
        Ok(trip) => println!("{}", reimbursement::calculate(trip, noise)),
        Err(e) => {
            eprintln!("Error: Invalid input format ({e})");
            std::process::exit(1);
        }
    }
}

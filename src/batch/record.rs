//! Test-case records and the trips extracted from them.
//!
//! The outer array is parsed up front, but each record stays as raw JSON
//! until the iterator reaches it. Numbers keep their source spelling so the
//! calculator sees `45.50` rather than a re-formatted `45.5`.

use serde::Deserialize;
use serde_json::value::RawValue;
use std::path::Path;

use crate::error::{RunnerError, RunnerResult};

/// The three values handed to the calculator for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub days: String,
    pub miles: String,
    pub receipts: String,
}

impl Trip {
    /// Positional arguments in calculator order.
    pub fn args(&self) -> [&str; 3] {
        [&self.days, &self.miles, &self.receipts]
    }
}

/// Only `input` is read; any other key in the record is ignored.
#[derive(Deserialize)]
struct CaseRecord<'a> {
    #[serde(borrow)]
    input: TripInput<'a>,
}

#[derive(Deserialize)]
struct TripInput<'a> {
    #[serde(borrow)]
    trip_duration_days: &'a RawValue,
    #[serde(borrow)]
    miles_traveled: &'a RawValue,
    #[serde(borrow)]
    total_receipts_amount: &'a RawValue,
}

/// A parsed input file: the records in file order, not yet extracted.
#[derive(Debug)]
pub struct Cases {
    records: Vec<Box<RawValue>>,
}

impl Cases {
    /// Read `path` and parse the outer array.
    ///
    /// Fails with [`RunnerError::InputNotFound`] before any I/O when the file
    /// is absent.
    pub fn load(path: &Path) -> RunnerResult<Self> {
        if !path.exists() {
            return Err(RunnerError::InputNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| RunnerError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> RunnerResult<Self> {
        let records: Vec<Box<RawValue>> = serde_json::from_str(text)?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the cases into a single-pass iterator of trips.
    pub fn into_trips(self) -> Trips {
        Trips {
            records: self.records.into_iter(),
            index: 0,
        }
    }
}

/// Lazy iterator over the trips of a [`Cases`] file, in file order.
///
/// A record that lacks one of the three fields, or carries a non-numeric
/// value, yields [`RunnerError::InvalidRecord`] at its position.
pub struct Trips {
    records: std::vec::IntoIter<Box<RawValue>>,
    index: usize,
}

impl Iterator for Trips {
    type Item = RunnerResult<Trip>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.records.next()?;
        let index = self.index;
        self.index += 1;
        Some(extract_trip(index, &raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Trips {}

fn extract_trip(index: usize, raw: &RawValue) -> RunnerResult<Trip> {
    let invalid = |reason: String| RunnerError::InvalidRecord { index, reason };

    let record: CaseRecord<'_> =
        serde_json::from_str(raw.get()).map_err(|e| invalid(e.to_string()))?;
    let input = record.input;

    let days = input.trip_duration_days.get();
    if days.parse::<i64>().is_err() {
        return Err(invalid(format!(
            "trip_duration_days must be an integer, got {days}"
        )));
    }

    Ok(Trip {
        days: days.to_string(),
        miles: number_text(input.miles_traveled, "miles_traveled").map_err(invalid)?,
        receipts: number_text(input.total_receipts_amount, "total_receipts_amount")
            .map_err(invalid)?,
    })
}

/// Source text of a JSON number; strings, nulls and other values are rejected.
fn number_text(raw: &RawValue, field: &str) -> Result<String, String> {
    let text = raw.get();
    serde_json::from_str::<serde_json::Number>(text)
        .map(|_| text.to_string())
        .map_err(|_| format!("{field} must be a number, got {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn trips(json: &str) -> Vec<RunnerResult<Trip>> {
        Cases::parse(json).unwrap().into_trips().collect()
    }

    #[test]
    fn test_preserves_number_spelling() {
        let json = r#"[{"input":{"trip_duration_days":3,"miles_traveled":100,"total_receipts_amount":45.50}}]"#;
        let trip = trips(json).remove(0).unwrap();
        assert_eq!(trip.args(), ["3", "100", "45.50"]);
    }

    #[test]
    fn test_field_order_and_extra_fields_are_irrelevant() {
        let json = r#"[
            {
                "expected_output": 364.51,
                "input": {
                    "total_receipts_amount": 5.86,
                    "note": "ignored",
                    "miles_traveled": 58,
                    "trip_duration_days": 1
                }
            }
        ]"#;
        let trip = trips(json).remove(0).unwrap();
        assert_eq!(trip.args(), ["1", "58", "5.86"]);
    }

    #[test]
    fn test_keeps_file_order() {
        let json = r#"[
            {"input":{"trip_duration_days":1,"miles_traveled":10,"total_receipts_amount":1}},
            {"input":{"trip_duration_days":2,"miles_traveled":20,"total_receipts_amount":2}},
            {"input":{"trip_duration_days":3,"miles_traveled":30,"total_receipts_amount":3}}
        ]"#;
        let days: Vec<String> = trips(json).into_iter().map(|t| t.unwrap().days).collect();
        assert_eq!(days, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_invalid_record_reports_index() {
        let json = r#"[
            {"input":{"trip_duration_days":1,"miles_traveled":10,"total_receipts_amount":1}},
            {"input":{"trip_duration_days":2,"miles_traveled":"far","total_receipts_amount":2}}
        ]"#;
        let results = trips(json);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(RunnerError::InvalidRecord { index, reason }) => {
                assert_eq!(*index, 1);
                assert!(reason.contains("miles_traveled"));
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_and_fractional_days_are_invalid() {
        let json = r#"[
            {"input":{"trip_duration_days":1,"miles_traveled":10}},
            {"input":{"trip_duration_days":1.5,"miles_traveled":10,"total_receipts_amount":1}},
            {"other":{}}
        ]"#;
        assert!(
            trips(json)
                .iter()
                .all(|r| matches!(r, Err(RunnerError::InvalidRecord { .. })))
        );
    }

    #[test]
    fn test_non_array_input_is_malformed() {
        let err = Cases::parse(r#"{"input":{}}"#).unwrap_err();
        assert!(matches!(err, RunnerError::MalformedInput(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("private_cases.json");
        let err = Cases::load(&missing).unwrap_err();
        assert!(matches!(err, RunnerError::InputNotFound(path) if path == missing));
    }

    #[test]
    fn test_load_counts_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"[{"input":{"trip_duration_days":5,"miles_traveled":250,"total_receipts_amount":150.75}},
                {"input":{"trip_duration_days":8,"miles_traveled":900,"total_receipts_amount":1200}}]"#,
        )
        .unwrap();

        let cases = Cases::load(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases.into_trips().len(), 2);
    }
}

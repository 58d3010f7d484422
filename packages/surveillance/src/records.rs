//! CSV payload parsing.
//!
//! `notif_reduced` answers with a small comma-separated table whose first
//! line is the header. Every data row becomes a [`Record`] keyed by the
//! trimmed header names.

use dengue_monitor_surveillance_models::{Record, WeeklyCaseRecord, parse_count};

use crate::SurveillanceError;

/// Column holding the aggregate case count in `chart_type=disease`
/// payloads.
pub const CASE_TOTAL_COLUMN: &str = "casos";

/// Parses CSV text into one [`Record`] per data row.
///
/// Rows shorter than the header map the missing columns to `None`;
/// surplus fields on longer rows are ignored. Blank lines are skipped.
/// Quotes are ordinary characters, so every data line yields exactly one
/// record.
///
/// # Errors
///
/// Returns [`SurveillanceError::Csv`] if the reader rejects the input.
pub fn parse_records(text: &str) -> Result<Vec<Record>, SurveillanceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).map(str::to_owned)))
            .collect();
        records.push(record);
    }

    log::trace!("Parsed {} CSV records", records.len());

    Ok(records)
}

/// Reads the aggregate case count from the first row of a
/// `chart_type=disease` payload.
///
/// # Errors
///
/// Returns [`SurveillanceError::Csv`] if the payload cannot be parsed.
pub fn parse_case_total(text: &str) -> Result<Option<u64>, SurveillanceError> {
    let records = parse_records(text)?;
    Ok(records
        .first()
        .and_then(|r| r.get(CASE_TOTAL_COLUMN))
        .and_then(parse_count))
}

/// Reads the weekly series from a `chart_type=period` payload, dropping
/// rows without a week label.
///
/// # Errors
///
/// Returns [`SurveillanceError::Csv`] if the payload cannot be parsed.
pub fn parse_weekly_cases(text: &str) -> Result<Vec<WeeklyCaseRecord>, SurveillanceError> {
    let records = parse_records(text)?;
    Ok(records
        .iter()
        .filter_map(WeeklyCaseRecord::from_record)
        .collect())
}

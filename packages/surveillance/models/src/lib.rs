#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Epidemiological surveillance types.
//!
//! Shared between the `InfoDengue` client and the API server: alert
//! levels, the time windows used to bound upstream queries, untyped CSV
//! records and the typed rows extracted from them.

pub mod date;

use std::collections::BTreeMap;

use serde::Deserialize;

pub use date::{DateRange, EpiWeekWindow};

/// Surveillance alert level for one municipality over a time window.
///
/// `InfoDengue` publishes levels 1 (green) through 4 (red). Level 0 is
/// local: it stands for "unknown", the value used whenever the upstream
/// call fails or returns no usable record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertLevel {
    /// Level 0: no data or failed lookup
    #[default]
    Unknown = 0,
    /// Level 1: favourable conditions, low transmission
    Green = 1,
    /// Level 2: conditions favourable to transmission
    Yellow = 2,
    /// Level 3: sustained transmission
    Orange = 3,
    /// Level 4: epidemic activity above historical thresholds
    Red = 4,
}

impl AlertLevel {
    /// The highest alert level published by the surveillance service.
    pub const HIGHEST: Self = Self::Red;

    /// Returns the numeric value of this alert level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates an alert level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-4.
    pub const fn from_value(value: i64) -> Result<Self, InvalidAlertLevelError> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Green),
            2 => Ok(Self::Yellow),
            3 => Ok(Self::Orange),
            4 => Ok(Self::Red),
            _ => Err(InvalidAlertLevelError { value }),
        }
    }
}

/// Error returned when a numeric value does not name an [`AlertLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAlertLevelError {
    /// The rejected value.
    pub value: i64,
}

impl std::fmt::Display for InvalidAlertLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid alert level {}: expected 0-4", self.value)
    }
}

impl std::error::Error for InvalidAlertLevelError {}

/// One row of the `alertcity` JSON payload.
///
/// The endpoint returns dozens of columns per epidemiological week; only
/// the ones consumed here are declared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertRecord {
    /// Alert level for the week (1-4).
    #[serde(default)]
    pub nivel: Option<i64>,
    /// Version tag of the nowcasting model that produced the row.
    #[serde(default)]
    pub versao_modelo: Option<String>,
}

impl AlertRecord {
    /// Alert level carried by this row, [`AlertLevel::Unknown`] when the
    /// column is missing or out of range.
    #[must_use]
    pub fn alert_level(&self) -> AlertLevel {
        self.nivel
            .and_then(|n| AlertLevel::from_value(n).ok())
            .unwrap_or_default()
    }
}

/// A CSV row keyed by header name.
///
/// Values are `None` when the row had fewer fields than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    /// Returns the value for `column`, or `None` if the column is absent
    /// from the header or missing from this row.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(Option::as_deref)
    }
}

impl FromIterator<(String, Option<String>)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// One week of a state's case-count time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyCaseRecord {
    /// Week label as published upstream (e.g. `"2024-03-10"`).
    pub week: String,
    /// Notified cases in that week.
    pub cases: u64,
}

impl WeeklyCaseRecord {
    /// Column holding the week label in `chart_type=period` payloads.
    pub const WEEK_COLUMN: &'static str = "dt_week";
    /// Column holding the case count in `chart_type=period` payloads.
    pub const CASES_COLUMN: &'static str = "Casos";

    /// Extracts a typed week from a parsed CSV row.
    ///
    /// Rows without a week label are dropped (`None`). An unparseable
    /// case count is read as zero.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let week = record.get(Self::WEEK_COLUMN)?.trim();
        if week.is_empty() {
            return None;
        }

        let cases = record
            .get(Self::CASES_COLUMN)
            .and_then(parse_count)
            .unwrap_or(0);

        Some(Self {
            week: week.to_string(),
            cases,
        })
    }
}

/// Parses a non-negative count, accepting integral floats such as
/// `"12.0"` which some upstream exports emit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 {
        Some(f.trunc() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn alert_level_from_value_roundtrip() {
        for v in 0..=4i64 {
            let level = AlertLevel::from_value(v).unwrap();
            assert_eq!(i64::from(level.value()), v);
        }
        assert!(AlertLevel::from_value(-1).is_err());
        assert!(AlertLevel::from_value(5).is_err());
    }

    #[test]
    fn alert_level_default_is_unknown() {
        assert_eq!(AlertLevel::default(), AlertLevel::Unknown);
        assert_eq!(AlertLevel::HIGHEST.value(), 4);
    }

    #[test]
    fn alert_record_reads_nivel() {
        let rec: AlertRecord =
            serde_json::from_str(r#"{"nivel": 3, "versao_modelo": "2024-05-01", "SE": 202410}"#)
                .unwrap();
        assert_eq!(rec.alert_level(), AlertLevel::Orange);
        assert_eq!(rec.versao_modelo.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn alert_record_missing_or_invalid_nivel_is_unknown() {
        let rec: AlertRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(rec.alert_level(), AlertLevel::Unknown);

        let rec: AlertRecord = serde_json::from_str(r#"{"nivel": 9}"#).unwrap();
        assert_eq!(rec.alert_level(), AlertLevel::Unknown);
    }

    #[test]
    fn record_get_is_none_for_missing_values() {
        let rec = record(&[("a", Some("1")), ("b", None)]);
        assert_eq!(rec.get("a"), Some("1"));
        assert_eq!(rec.get("b"), None);
        assert_eq!(rec.get("c"), None);
    }

    #[test]
    fn weekly_record_from_row() {
        let rec = record(&[("dt_week", Some("2024-03-10")), ("Casos", Some("152"))]);
        assert_eq!(
            WeeklyCaseRecord::from_record(&rec),
            Some(WeeklyCaseRecord {
                week: "2024-03-10".to_string(),
                cases: 152,
            })
        );
    }

    #[test]
    fn weekly_record_bad_count_is_zero() {
        let rec = record(&[("dt_week", Some("2024-03-10")), ("Casos", Some("n/a"))]);
        assert_eq!(WeeklyCaseRecord::from_record(&rec).unwrap().cases, 0);

        let rec = record(&[("dt_week", Some("2024-03-10")), ("Casos", None)]);
        assert_eq!(WeeklyCaseRecord::from_record(&rec).unwrap().cases, 0);
    }

    #[test]
    fn weekly_record_without_week_is_dropped() {
        let rec = record(&[("dt_week", Some("  ")), ("Casos", Some("3"))]);
        assert!(WeeklyCaseRecord::from_record(&rec).is_none());

        let rec = record(&[("Casos", Some("3"))]);
        assert!(WeeklyCaseRecord::from_record(&rec).is_none());
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("abc"), None);
    }
}

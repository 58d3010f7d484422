#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the dengue monitor server.
//!
//! Field names are part of the contract with the dashboard frontend and
//! stay in Portuguese (`total_casos`, `dt_weeks`, ...).

use dengue_monitor_surveillance_models::{AlertLevel, WeeklyCaseRecord};
use serde::{Deserialize, Serialize};

/// Dengue indicators for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    /// Notified cases over the last year, `None` when the surveillance
    /// service could not provide a count.
    pub total_casos: Option<u64>,
    /// Mean alert level across the state's municipalities, as a
    /// fixed two-decimal string (`"2.50"`).
    pub media_risco: String,
    /// Percentage of municipalities at the highest alert level, as a
    /// fixed two-decimal string (`"50.00"`).
    pub porcentagem_alerta_4: String,
}

impl StateSummary {
    /// Aggregates per-municipality alert levels into a summary.
    ///
    /// Unknown levels count as zero in the mean. An empty slice yields
    /// zeros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_levels(total_casos: Option<u64>, levels: &[AlertLevel]) -> Self {
        if levels.is_empty() {
            return Self {
                total_casos,
                media_risco: fixed2(0.0),
                porcentagem_alerta_4: fixed2(0.0),
            };
        }

        let n = levels.len() as f64;
        let sum: u64 = levels.iter().map(|l| u64::from(l.value())).sum();
        let highest = levels
            .iter()
            .filter(|l| **l == AlertLevel::HIGHEST)
            .count();

        Self {
            total_casos,
            media_risco: fixed2(sum as f64 / n),
            porcentagem_alerta_4: fixed2(highest as f64 * 100.0 / n),
        }
    }
}

/// Weekly case-count series for one state, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Week labels, oldest first.
    pub dt_weeks: Vec<String>,
    /// Cases per week, aligned with `dt_weeks`.
    pub casos: Vec<u64>,
}

impl ChartSeries {
    /// Builds the series, dropping a trailing zero-case week.
    ///
    /// The current week is still being reported and shows up as zero
    /// until notifications arrive, so a final zero is not plotted.
    #[must_use]
    pub fn from_weeks(weeks: Vec<WeeklyCaseRecord>) -> Self {
        let mut series = Self {
            dt_weeks: Vec::with_capacity(weeks.len()),
            casos: Vec::with_capacity(weeks.len()),
        };
        for week in weeks {
            series.dt_weeks.push(week.week);
            series.casos.push(week.cases);
        }

        if series.casos.last() == Some(&0) {
            series.dt_weeks.pop();
            series.casos.pop();
        }

        series
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats `value` rounded to exactly two decimals (`2.5` → `"2.50"`).
#[must_use]
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", round2(value))
}

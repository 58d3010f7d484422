#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dengue surveillance data from the `InfoDengue` REST service.
//!
//! The service answers in two shapes depending on the endpoint family:
//!
//! - `notif_reduced` returns CSV (state-level case counts and weekly
//!   series), parsed by [`records`].
//! - `alertcity` returns a JSON array of per-week rows for one
//!   municipality, from which the alert level and model version are read.
//!
//! [`SurveillanceApi`] is the seam the API server depends on, with
//! [`client::InfoDengueClient`] as the production implementation.
//! [`risk::RiskFetcher`] fans per-municipality alert lookups out in
//! bounded batches.

pub mod client;
pub mod records;
pub mod risk;

use async_trait::async_trait;
use dengue_monitor_surveillance_models::{AlertLevel, DateRange, EpiWeekWindow, WeeklyCaseRecord};
use thiserror::Error;

/// Errors that can occur while talking to the surveillance service.
#[derive(Debug, Error)]
pub enum SurveillanceError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read access to dengue surveillance indicators.
#[async_trait]
pub trait SurveillanceApi: Send + Sync {
    /// Total notified cases for a state over `range`.
    ///
    /// `Ok(None)` means the service answered but carried no usable count.
    ///
    /// # Errors
    ///
    /// Returns [`SurveillanceError`] if the request or parsing fails.
    async fn state_case_total(
        &self,
        uf: &str,
        range: &DateRange,
    ) -> Result<Option<u64>, SurveillanceError>;

    /// Weekly notified cases for a state over `range`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SurveillanceError`] if the request or parsing fails.
    async fn weekly_cases(
        &self,
        uf: &str,
        range: &DateRange,
    ) -> Result<Vec<WeeklyCaseRecord>, SurveillanceError>;

    /// Alert level of one municipality over `window`.
    ///
    /// # Errors
    ///
    /// Returns [`SurveillanceError`] if the request or parsing fails.
    async fn risk_level(
        &self,
        geocode: u64,
        window: &EpiWeekWindow,
    ) -> Result<AlertLevel, SurveillanceError>;

    /// Version tag of the model currently publishing alerts.
    ///
    /// # Errors
    ///
    /// Returns [`SurveillanceError`] if the request or parsing fails.
    async fn model_version(&self) -> Result<Option<String>, SurveillanceError>;
}

/// Fetches a state's case total, degrading any failure to `None`.
///
/// A failed lookup is reported as "unknown" rather than zero so clients
/// can tell it apart from a genuine zero-case count.
pub async fn case_total_or_none<S: SurveillanceApi + ?Sized>(
    api: &S,
    uf: &str,
    range: &DateRange,
) -> Option<u64> {
    match api.state_case_total(uf, range).await {
        Ok(total) => total,
        Err(e) => {
            log::warn!("Failed to fetch case total for {uf}: {e}");
            None
        }
    }
}

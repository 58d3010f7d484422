//! Batched per-municipality alert-level fetching.
//!
//! A state can have several hundred municipalities (Minas Gerais has 853),
//! each needing its own `alertcity` request. Requests are issued in
//! fixed-size batches: every request in a batch runs concurrently and the
//! next batch starts only after the whole batch has finished, so at most
//! `batch_size` requests are ever in flight.

use dengue_monitor_surveillance_models::{AlertLevel, EpiWeekWindow};
use futures::future::join_all;

use crate::SurveillanceApi;

/// Default number of concurrent alert requests.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Fetches alert levels for many municipalities with bounded concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskFetcher {
    batch_size: usize,
}

impl Default for RiskFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl RiskFetcher {
    /// Creates a fetcher issuing at most `batch_size` concurrent requests.
    /// A size of zero is treated as one.
    #[must_use]
    pub const fn new(batch_size: usize) -> Self {
        Self {
            batch_size: if batch_size == 0 { 1 } else { batch_size },
        }
    }

    /// Maximum number of requests in flight at once.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of sequential batches needed for `count` municipalities.
    #[must_use]
    pub const fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.batch_size)
    }

    /// Fetches the alert level of every geocode over `window`.
    ///
    /// The result has one entry per input geocode, in input order. A
    /// failed lookup yields [`AlertLevel::Unknown`] without affecting the
    /// other entries.
    pub async fn fetch<S: SurveillanceApi + ?Sized>(
        &self,
        source: &S,
        geocodes: &[u64],
        window: &EpiWeekWindow,
    ) -> Vec<AlertLevel> {
        let batches = self.batch_count(geocodes.len());
        let mut levels = Vec::with_capacity(geocodes.len());

        for (i, batch) in geocodes.chunks(self.batch_size).enumerate() {
            log::debug!(
                "Fetching alert levels: batch {}/{batches} ({} municipalities)",
                i + 1,
                batch.len()
            );

            let requests = batch.iter().map(|&geocode| async move {
                match source.risk_level(geocode, window).await {
                    Ok(level) => level,
                    Err(e) => {
                        log::debug!("Alert level lookup failed for {geocode}: {e}");
                        AlertLevel::Unknown
                    }
                }
            });

            levels.extend(join_all(requests).await);
        }

        levels
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality lookup via the IBGE localities REST API.
//!
//! `GET /api/v1/localidades/estados/{uf}/municipios` lists every
//! municipality of a state. Unknown state codes come back as an empty
//! array rather than an error status.

use std::time::Duration;

use async_trait::async_trait;
use dengue_monitor_geography_models::Municipality;
use thiserror::Error;

/// Errors that can occur during municipality lookup.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lists the municipalities of a state.
#[async_trait]
pub trait MunicipalityDirectory: Send + Sync {
    /// Municipalities of the state with two-letter code `uf`, in the
    /// order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the request or parsing fails.
    async fn municipalities(&self, uf: &str) -> Result<Vec<Municipality>, GeoError>;
}

/// HTTP client for the IBGE localities API.
#[derive(Debug, Clone)]
pub struct IbgeClient {
    client: reqwest::Client,
    /// API root, e.g. `"https://servicodados.ibge.gov.br/api/v1"`.
    base_url: String,
}

impl IbgeClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn municipalities_url(&self, uf: &str) -> String {
        format!("{}/localidades/estados/{uf}/municipios", self.base_url)
    }
}

#[async_trait]
impl MunicipalityDirectory for IbgeClient {
    async fn municipalities(&self, uf: &str) -> Result<Vec<Municipality>, GeoError> {
        let url = self.municipalities_url(uf);

        let text = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let municipalities: Vec<Municipality> = serde_json::from_str(&text)?;
        log::debug!("{uf}: {} municipalities", municipalities.len());

        Ok(municipalities)
    }
}

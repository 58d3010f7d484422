//! Compile-time registry of upstream service configurations.
//!
//! Each upstream API is defined in a TOML file under `services/`. The
//! registry embeds these at compile time and exposes them via
//! [`all_services`].

use std::time::Duration;

use serde::Deserialize;

/// An upstream service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamService {
    /// Unique identifier (e.g., `"infodengue"`, `"ibge"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// `InfoDengue` epidemiological surveillance API.
    InfoDengue {
        /// API base URL (e.g., `"https://info.dengue.mat.br/api"`).
        base_url: String,
        /// Municipality queried for the model version.
        reference_geocode: u64,
        /// Number of concurrent per-municipality alert requests.
        #[serde(default = "default_risk_batch_size")]
        risk_batch_size: usize,
    },
    /// IBGE localities API.
    Ibge {
        /// API base URL (e.g., `"https://servicodados.ibge.gov.br/api/v1"`).
        base_url: String,
    },
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_risk_batch_size() -> usize {
    dengue_monitor_surveillance::risk::DEFAULT_BATCH_SIZE
}

impl UpstreamService {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the provider's base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::InfoDengue { base_url, .. } | ProviderConfig::Ibge { base_url } => {
                base_url
            }
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("infodengue", include_str!("../services/infodengue.toml")),
    ("ibge", include_str!("../services/ibge.toml")),
];

/// Returns all upstream service configurations.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<UpstreamService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse upstream service '{name}': {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_services() {
        let services = all_services();
        assert_eq!(services.len(), SERVICE_TOMLS.len());
    }

    #[test]
    fn ids_are_unique_and_match_file_keys() {
        let services = all_services();
        let ids: BTreeSet<&str> = services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), services.len());
        for ((key, _), service) in SERVICE_TOMLS.iter().zip(&services) {
            assert_eq!(*key, service.id);
        }
    }

    #[test]
    fn infodengue_defaults() {
        let service = all_services()
            .into_iter()
            .find(|s| s.id == "infodengue")
            .unwrap();
        assert_eq!(service.base_url(), "https://info.dengue.mat.br/api");
        assert_eq!(service.timeout(), Duration::from_secs(30));
        match service.provider {
            ProviderConfig::InfoDengue {
                reference_geocode,
                risk_batch_size,
                ..
            } => {
                assert_eq!(reference_geocode, 3_304_557);
                assert_eq!(risk_batch_size, 100);
            }
            ProviderConfig::Ibge { .. } => panic!("infodengue has the wrong provider type"),
        }
    }

    #[test]
    fn base_urls_use_https() {
        for service in all_services() {
            assert!(
                service.base_url().starts_with("https://"),
                "{} base URL is not HTTPS",
                service.id
            );
        }
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let service: UpstreamService = toml::de::from_str(
            r#"
            id = "x"
            name = "X"

            [provider]
            type = "info_dengue"
            base_url = "http://localhost"
            reference_geocode = 1
            "#,
        )
        .unwrap();
        assert_eq!(service.timeout_secs, 30);
        assert!(matches!(
            service.provider,
            ProviderConfig::InfoDengue {
                risk_batch_size: 100,
                ..
            }
        ));
    }
}

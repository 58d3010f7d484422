#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the dengue monitor dashboard.
//!
//! Serves a small REST API under `/dengue_api` that summarizes dengue
//! indicators per Brazilian state by combining the `InfoDengue`
//! surveillance API with the IBGE localities API. The server is
//! stateless: every request fans out to the upstream services and
//! recombines their answers.

pub mod clock;
pub mod config;
mod handlers;
pub mod service_registry;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware, web};
use dengue_monitor_geography::{GeoError, IbgeClient, MunicipalityDirectory};
use dengue_monitor_surveillance::client::InfoDengueClient;
use dengue_monitor_surveillance::risk::RiskFetcher;
use dengue_monitor_surveillance::{SurveillanceApi, SurveillanceError};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::config::ServerConfig;
use crate::service_registry::ProviderConfig;

/// The only origin allowed to call the API from a browser.
pub const ALLOWED_ORIGIN: &str = "https://monitor-dengue.vercel.app";

/// Errors that can prevent the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Building the surveillance client failed.
    #[error("Surveillance client error: {0}")]
    Surveillance(#[from] SurveillanceError),

    /// Building the geography client failed.
    #[error("Geography client error: {0}")]
    Geography(#[from] GeoError),

    /// No upstream service of the given type is registered.
    #[error("No upstream service configured for {0}")]
    MissingService(&'static str),

    /// Binding or running the HTTP server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Dengue surveillance indicators.
    pub surveillance: Arc<dyn SurveillanceApi>,
    /// Municipality listings per state.
    pub municipalities: Arc<dyn MunicipalityDirectory>,
    /// Bounded fan-out for per-municipality alert lookups.
    pub risk: RiskFetcher,
    /// Source of "today" for query windows.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Builds the production state from the embedded service registry.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if an HTTP client cannot be built or a
    /// required upstream service is missing from the registry.
    pub fn from_registry() -> Result<Self, ServerError> {
        let mut surveillance: Option<Arc<dyn SurveillanceApi>> = None;
        let mut municipalities: Option<Arc<dyn MunicipalityDirectory>> = None;
        let mut risk = RiskFetcher::default();

        for service in service_registry::all_services() {
            let timeout = service.timeout();
            log::info!(
                "Upstream {}: {} (timeout {timeout:?})",
                service.name,
                service.base_url()
            );

            match service.provider {
                ProviderConfig::InfoDengue {
                    base_url,
                    reference_geocode,
                    risk_batch_size,
                } => {
                    let client = InfoDengueClient::new(&base_url, timeout, reference_geocode)?;
                    surveillance = Some(Arc::new(client));
                    risk = RiskFetcher::new(risk_batch_size);
                }
                ProviderConfig::Ibge { base_url } => {
                    municipalities = Some(Arc::new(IbgeClient::new(&base_url, timeout)?));
                }
            }
        }

        Ok(Self {
            surveillance: surveillance.ok_or(ServerError::MissingService("InfoDengue"))?,
            municipalities: municipalities.ok_or(ServerError::MissingService("IBGE"))?,
            risk,
            clock: Arc::new(SystemClock),
        })
    }
}

/// Registers the `/dengue_api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dengue_api")
            .route("/health", web::get().to(handlers::health))
            .route("/version", web::get().to(handlers::version))
            .route("/uf/{uf}", web::get().to(handlers::state_summary))
            .route("/grafico_uf/{estado}", web::get().to(handlers::state_chart)),
    );
}

/// CORS policy: read-only access from the dashboard origin.
#[must_use]
pub fn cors() -> Cors {
    Cors::default()
        .allowed_origin(ALLOWED_ORIGIN)
        .allowed_methods(vec![http::Method::GET])
        .allowed_header(http::header::CONTENT_TYPE)
        .max_age(3600)
}

/// Starts the dengue monitor API server.
///
/// Builds the upstream clients from the service registry, reads the
/// listener address from the environment and runs the Actix-Web HTTP
/// server until shutdown. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the upstream clients cannot be built or the
/// HTTP server fails to bind or encounters a runtime error.
pub async fn run_server() -> Result<(), ServerError> {
    let config = ServerConfig::from_env();
    let state = web::Data::new(AppState::from_registry()?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}

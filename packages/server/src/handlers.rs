//! HTTP handler functions for the dengue monitor API.

use actix_web::{HttpResponse, web};
use dengue_monitor_geography::GeoError;
use dengue_monitor_geography_models::Uf;
use dengue_monitor_server_models::{ApiError, ApiHealth, ChartSeries, StateSummary};
use dengue_monitor_surveillance::case_total_or_none;
use dengue_monitor_surveillance_models::{DateRange, EpiWeekWindow};

use crate::AppState;

const FETCH_ERROR: &str = "Erro ao obter dados";
const STATE_NOT_FOUND: &str = "Estado não encontrado";
const PROCESSING_ERROR: &str = "Erro ao processar dados";
const INVALID_STATE: &str = "Estado inválido. Use a sigla do estado.";

/// `GET /dengue_api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /dengue_api/version`
///
/// Returns the version tag of the model currently publishing alerts.
pub async fn version(state: web::Data<AppState>) -> HttpResponse {
    match state.surveillance.model_version().await {
        Ok(version) => HttpResponse::Ok().json(version),
        Err(e) => {
            log::error!("Failed to fetch model version: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(FETCH_ERROR))
        }
    }
}

/// `GET /dengue_api/uf/{uf}`
///
/// Summarizes cases and alert levels across a state's municipalities.
pub async fn state_summary(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner().to_uppercase();

    let Ok(uf) = code.parse::<Uf>() else {
        return HttpResponse::NotFound().json(ApiError::new(STATE_NOT_FOUND));
    };

    match summarize_state(&state, uf).await {
        Ok(Some(summary)) => HttpResponse::Ok().json(summary),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new(STATE_NOT_FOUND)),
        Err(e) => {
            log::error!("Failed to summarize {uf}: {e}");
            HttpResponse::Forbidden().json(ApiError::new(PROCESSING_ERROR))
        }
    }
}

/// Resolves the state's municipalities, then combines the state case
/// total with every municipality's alert level. `None` when the state
/// has no municipalities.
async fn summarize_state(state: &AppState, uf: Uf) -> Result<Option<StateSummary>, GeoError> {
    let range = DateRange::ending_on(state.clock.today());

    let municipalities = state.municipalities.municipalities(uf.as_ref()).await?;
    if municipalities.is_empty() {
        return Ok(None);
    }

    let total_casos = case_total_or_none(state.surveillance.as_ref(), uf.as_ref(), &range).await;

    let geocodes: Vec<u64> = municipalities.iter().map(|m| m.id).collect();
    let window = EpiWeekWindow::trailing_year(&range);

    log::info!(
        "{uf}: fetching alert levels for {} municipalities in {} batches",
        geocodes.len(),
        state.risk.batch_count(geocodes.len())
    );

    let levels = state
        .risk
        .fetch(state.surveillance.as_ref(), &geocodes, &window)
        .await;

    Ok(Some(StateSummary::from_levels(total_casos, &levels)))
}

/// `GET /dengue_api/grafico_uf/{estado}`
///
/// Returns the state's weekly case series over the last year.
pub async fn state_chart(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Ok(uf) = path.into_inner().to_uppercase().parse::<Uf>() else {
        return HttpResponse::BadRequest().json(ApiError::new(INVALID_STATE));
    };

    let range = DateRange::ending_on(state.clock.today());

    let weeks = match state.surveillance.weekly_cases(uf.as_ref(), &range).await {
        Ok(weeks) => weeks,
        Err(e) => {
            log::error!("Failed to fetch weekly cases for {uf}: {e}");
            Vec::new()
        }
    };

    HttpResponse::Ok().json(ChartSeries::from_weeks(weeks))
}

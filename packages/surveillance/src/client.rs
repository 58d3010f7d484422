//! `InfoDengue` REST client.
//!
//! - `GET /notif_reduced`: notified cases for a state, filtered by age
//!   band, gender, disease and date range. Answers in CSV.
//! - `GET /alertcity`: weekly alert rows for one municipality over an
//!   epidemiological-week range. Answers in JSON.
//!
//! See <https://info.dengue.mat.br/services/api>

use std::time::Duration;

use async_trait::async_trait;
use dengue_monitor_surveillance_models::{
    AlertLevel, AlertRecord, DateRange, EpiWeekWindow, WeeklyCaseRecord,
};
use strum_macros::Display;

use crate::records::{parse_case_total, parse_weekly_cases};
use crate::{SurveillanceApi, SurveillanceError};

/// Age bands sent with every notification query (all of them).
pub const AGE_BANDS: &str =
    "00-04 anos,05-09 anos,10-19 anos,20-29 anos,30-39 anos,40-49 anos,50-59 anos,60+ anos";

/// Genders sent with every notification query (both).
pub const GENDERS: &str = "Mulher,Homem";

/// Disease filter for `notif_reduced`.
pub const NOTIFICATION_DISEASE: &str = "Dengue";

/// Disease filter for `alertcity`.
pub const ALERT_DISEASE: &str = "dengue";

/// User-Agent sent to the surveillance service.
const USER_AGENT: &str = concat!("dengue-monitor/", env!("CARGO_PKG_VERSION"));

/// Aggregation requested from `notif_reduced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChartType {
    /// One row with totals for the whole window.
    Disease,
    /// One row per epidemiological week.
    Period,
}

/// HTTP client for the `InfoDengue` API.
#[derive(Debug, Clone)]
pub struct InfoDengueClient {
    client: reqwest::Client,
    /// API root, e.g. `"https://info.dengue.mat.br/api"`.
    base_url: String,
    /// Municipality whose alert rows carry the model version.
    reference_geocode: u64,
}

impl InfoDengueClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SurveillanceError`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        reference_geocode: u64,
    ) -> Result<Self, SurveillanceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            reference_geocode,
        })
    }

    /// Query parameters for a `notif_reduced` request.
    fn notification_params(
        uf: &str,
        range: &DateRange,
        chart_type: ChartType,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("state_abv", uf.to_string()),
            ("ages", AGE_BANDS.to_string()),
            ("genders", GENDERS.to_string()),
            ("diseases", NOTIFICATION_DISEASE.to_string()),
            ("initial_date", range.last_year_date_param()),
            ("final_date", range.current_date_param()),
            ("chart_type", chart_type.to_string()),
        ]
    }

    /// Query parameters for a windowed `alertcity` request.
    fn alert_params(geocode: u64, window: &EpiWeekWindow) -> Vec<(&'static str, String)> {
        vec![
            ("geocode", geocode.to_string()),
            ("disease", ALERT_DISEASE.to_string()),
            ("format", "json".to_string()),
            ("ew_start", window.ew_start.to_string()),
            ("ew_end", window.ew_end.to_string()),
            ("ey_start", window.ey_start.to_string()),
            ("ey_end", window.ey_end.to_string()),
        ]
    }

    async fn fetch_notifications(
        &self,
        uf: &str,
        range: &DateRange,
        chart_type: ChartType,
    ) -> Result<String, SurveillanceError> {
        let url = format!("{}/notif_reduced", self.base_url);
        let params = Self::notification_params(uf, range, chart_type);

        let text = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        log::debug!(
            "notif_reduced {uf} ({chart_type}): received {} bytes",
            text.len()
        );

        Ok(text)
    }

    async fn fetch_alerts(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Vec<AlertRecord>, SurveillanceError> {
        let url = format!("{}/alertcity", self.base_url);

        let text = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SurveillanceApi for InfoDengueClient {
    async fn state_case_total(
        &self,
        uf: &str,
        range: &DateRange,
    ) -> Result<Option<u64>, SurveillanceError> {
        let text = self.fetch_notifications(uf, range, ChartType::Disease).await?;
        parse_case_total(&text)
    }

    async fn weekly_cases(
        &self,
        uf: &str,
        range: &DateRange,
    ) -> Result<Vec<WeeklyCaseRecord>, SurveillanceError> {
        let text = self.fetch_notifications(uf, range, ChartType::Period).await?;
        parse_weekly_cases(&text)
    }

    async fn risk_level(
        &self,
        geocode: u64,
        window: &EpiWeekWindow,
    ) -> Result<AlertLevel, SurveillanceError> {
        let rows = self.fetch_alerts(&Self::alert_params(geocode, window)).await?;
        Ok(rows.first().map(AlertRecord::alert_level).unwrap_or_default())
    }

    async fn model_version(&self) -> Result<Option<String>, SurveillanceError> {
        let params = [
            ("geocode", self.reference_geocode.to_string()),
            ("disease", ALERT_DISEASE.to_string()),
            ("format", "json".to_string()),
        ];
        let rows = self.fetch_alerts(&params).await?;
        Ok(rows.into_iter().next().and_then(|r| r.versao_modelo))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockito::Matcher;

    use super::*;

    fn range() -> DateRange {
        DateRange::ending_on(NaiveDate::from_ymd_opt(2025, 4, 9).unwrap())
    }

    fn client(server: &mockito::Server) -> InfoDengueClient {
        InfoDengueClient::new(
            &format!("{}/api/", server.url()),
            Duration::from_secs(5),
            3_304_557,
        )
        .unwrap()
    }

    fn q(key: &str, value: &str) -> Matcher {
        Matcher::UrlEncoded(key.to_string(), value.to_string())
    }

    #[test]
    fn chart_type_renders_lowercase() {
        assert_eq!(ChartType::Disease.to_string(), "disease");
        assert_eq!(ChartType::Period.to_string(), "period");
    }

    #[test]
    fn notification_params_cover_all_filters() {
        let params = InfoDengueClient::notification_params("SP", &range(), ChartType::Period);
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("state_abv"), Some("SP"));
        assert_eq!(get("initial_date"), Some("2024-04-09"));
        assert_eq!(get("final_date"), Some("2025-04-09"));
        assert_eq!(get("chart_type"), Some("period"));
        assert_eq!(get("genders"), Some("Mulher,Homem"));
        assert_eq!(get("ages").map(|a| a.split(',').count()), Some(8));
    }

    #[tokio::test]
    async fn fetches_state_case_total() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/notif_reduced")
            .match_query(Matcher::AllOf(vec![
                q("state_abv", "RJ"),
                q("diseases", "Dengue"),
                q("chart_type", "disease"),
                q("initial_date", "2024-04-09"),
                q("final_date", "2025-04-09"),
                q("ages", AGE_BANDS),
            ]))
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("casos\n48213\n")
            .create_async()
            .await;

        let total = client(&server)
            .state_case_total("RJ", &range())
            .await
            .unwrap();

        assert_eq!(total, Some(48213));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetches_weekly_cases() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/notif_reduced")
            .match_query(Matcher::AllOf(vec![
                q("state_abv", "MG"),
                q("chart_type", "period"),
            ]))
            .with_body("dt_week,Casos\n2025-03-02,410\n2025-03-09,0\n")
            .create_async()
            .await;

        let weeks = client(&server).weekly_cases("MG", &range()).await.unwrap();

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].cases, 410);
        assert_eq!(weeks[1].week, "2025-03-09");
    }

    #[tokio::test]
    async fn fetches_risk_level_for_window() {
        let mut server = mockito::Server::new_async().await;
        let window = EpiWeekWindow::trailing_year(&range());
        let mock = server
            .mock("GET", "/api/alertcity")
            .match_query(Matcher::AllOf(vec![
                q("geocode", "3550308"),
                q("disease", "dengue"),
                q("format", "json"),
                q("ew_start", "1"),
                q("ew_end", "50"),
                q("ey_start", "2024"),
                q("ey_end", "2025"),
            ]))
            .with_header("content-type", "application/json")
            .with_body(r#"[{"nivel": 4, "SE": 202514}, {"nivel": 2}]"#)
            .create_async()
            .await;

        let level = client(&server)
            .risk_level(3_550_308, &window)
            .await
            .unwrap();

        assert_eq!(level, AlertLevel::Red);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_alert_payload_is_unknown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/alertcity")
            .match_query(Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let window = EpiWeekWindow::trailing_year(&range());
        let level = client(&server).risk_level(1, &window).await.unwrap();

        assert_eq!(level, AlertLevel::Unknown);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/alertcity")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let window = EpiWeekWindow::trailing_year(&range());
        let result = client(&server).risk_level(1, &window).await;

        assert!(matches!(result, Err(SurveillanceError::Http(_))));
    }

    #[tokio::test]
    async fn malformed_json_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/alertcity")
            .match_query(Matcher::Any)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client(&server).model_version().await;

        assert!(matches!(result, Err(SurveillanceError::Json(_))));
    }

    #[tokio::test]
    async fn fetches_model_version_for_reference_city() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/alertcity")
            .match_query(Matcher::AllOf(vec![
                q("geocode", "3304557"),
                q("disease", "dengue"),
                q("format", "json"),
            ]))
            .with_body(r#"[{"nivel": 1, "versao_modelo": "2025-04-01"}]"#)
            .create_async()
            .await;

        let version = client(&server).model_version().await.unwrap();

        assert_eq!(version.as_deref(), Some("2025-04-01"));
        mock.assert_async().await;
    }
}

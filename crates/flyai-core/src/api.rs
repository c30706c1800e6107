// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::ClientConfig;
use crate::models::{
    Airport, AirportsResponse, AskResponse, FlightSearchResponse, HealthResponse, SaveSearchResponse,
    SearchQuery, SmartAnswer, SmartAskResponse,
};
use crate::FlyAiError;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// Backend routes. Paths are relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Airports,
    SearchFlights,
    SmartAsk,
    Ask,
    Health,
    SaveSearch,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Airports => "airports",
            Route::SearchFlights => "search_flights",
            Route::SmartAsk => "smart_ask",
            Route::Ask => "ask",
            Route::Health => "health",
            Route::SaveSearch => "save_search",
        }
    }
}

/// Builds `{base}/{route}?{params}` with percent-encoded values.
pub fn build_url(base: &str, route: Route, params: &[(&str, &str)]) -> Result<Url, FlyAiError> {
    let mut base = Url::parse(base)?;
    // Url::join would drop the last segment of a base without trailing slash
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let mut url = base.join(route.path())?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

pub fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    vec![
        ("from_airport", query.from_airport.clone()),
        ("to_airport", query.to_airport.clone()),
        ("date", query.date.clone()),
        ("adults", query.adults.to_string()),
    ]
}

/// HTTP client for the FlyAI backend. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, FlyAiError> {
        Self::with_client(base_url, Client::builder().build()?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FlyAiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::with_client(&config.base_url, builder.build()?)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self, FlyAiError> {
        // Fail early on a bad base instead of on the first keystroke
        Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        route: Route,
        params: &[(&str, &str)],
    ) -> Result<T, FlyAiError> {
        let url = build_url(&self.base_url, route, params)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode(route, response).await
    }

    async fn decode<T: DeserializeOwned>(
        route: Route,
        response: reqwest::Response,
    ) -> Result<T, FlyAiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FlyAiError::Status {
                endpoint: route.path().to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn search_airports(&self, query: &str) -> Result<Vec<Airport>, FlyAiError> {
        let resp: AirportsResponse = self.get_json(Route::Airports, &[("q", query)]).await?;
        Ok(resp.airports)
    }

    pub async fn search_flights(
        &self,
        query: &SearchQuery,
    ) -> Result<FlightSearchResponse, FlyAiError> {
        let params = search_params(query);
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.get_json(Route::SearchFlights, &borrowed).await
    }

    pub async fn smart_ask(&self, question: &str) -> Result<SmartAnswer, FlyAiError> {
        let raw: SmartAskResponse = self
            .get_json(Route::SmartAsk, &[("question", question)])
            .await?;
        Ok(raw.into())
    }

    /// Plain question to `/ask`, without intent classification.
    pub async fn ask(&self, question: &str) -> Result<String, FlyAiError> {
        let resp: AskResponse = self.get_json(Route::Ask, &[("question", question)]).await?;
        Ok(resp.answer.unwrap_or_default())
    }

    /// True when the backend answers `/health` with `status == "ok"`.
    pub async fn health(&self) -> Result<bool, FlyAiError> {
        let resp: HealthResponse = self.get_json(Route::Health, &[]).await?;
        Ok(resp.status.as_deref() == Some("ok"))
    }

    /// Records a search in the backend history (POST with query parameters).
    pub async fn save_search(&self, query: &SearchQuery) -> Result<bool, FlyAiError> {
        let url = build_url(
            &self.base_url,
            Route::SaveSearch,
            &[
                ("from_airport", query.from_airport.as_str()),
                ("to_airport", query.to_airport.as_str()),
                ("date", query.date.as_str()),
            ],
        )?;
        debug!("POST {}", url);
        let response = self.client.post(url).send().await?;
        let resp: SaveSearchResponse = Self::decode(Route::SaveSearch, response).await?;
        Ok(resp.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url(
            "http://127.0.0.1:8000",
            Route::SmartAsk,
            &[("question", "Flug von Berlin nach New York & zurück?")],
        )
        .unwrap();
        assert_eq!(url.path(), "/smart_ask");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "question");
        assert_eq!(value, "Flug von Berlin nach New York & zurück?");
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let url = build_url("https://example.com/api", Route::Airports, &[("q", "ber")]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/airports?q=ber");

        let url = build_url("https://example.com/api/", Route::Health, &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/health");
    }

    #[test]
    fn test_search_params_order() {
        let query = SearchQuery {
            from_airport: "BER".into(),
            to_airport: "JFK".into(),
            date: "2026-10-25".into(),
            adults: 2,
        };
        let url = build_url(
            "http://127.0.0.1:8000",
            Route::SearchFlights,
            &search_params(&query)
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        assert_eq!(
            url.query(),
            Some("from_airport=BER&to_airport=JFK&date=2026-10-25&adults=2")
        );
    }

    #[test]
    fn test_ask_route_path() {
        let url = build_url("http://127.0.0.1:8000", Route::Ask, &[("question", "Hallo")]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/ask?question=Hallo");
        assert_ne!(Route::Ask.path(), Route::SmartAsk.path());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        assert!(ApiClient::new("no scheme here").is_err());
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// HTTP tests against an in-process stub of the FlyAI backend.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use flyai_core::api::ApiClient;
use flyai_core::config::ClientConfig;
use flyai_core::controller::{Controller, Effect};
use flyai_core::driver;
use flyai_core::models::{SearchQuery, SmartAnswer};
use flyai_core::render::ResultsView;
use flyai_core::selection::Side;
use flyai_core::FlyAiError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Params = HashMap<String, String>;

/// Every request the stub saw, as `(path, query params)`.
#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<(String, Params)>>>);

impl Recorded {
    fn push(&self, path: &str, params: Params) {
        self.0.lock().unwrap().push((path.to_string(), params));
    }

    fn for_path(&self, path: &str) -> Vec<Params> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .collect()
    }
}

async fn airports(State(rec): State<Recorded>, Query(q): Query<Params>) -> Json<Value> {
    let term = q.get("q").cloned().unwrap_or_default().to_lowercase();
    rec.push("/airports", q);
    let all = [
        ("BER", "Berlin", "Brandenburg", "Germany"),
        ("JFK", "New York", "John F. Kennedy", "USA"),
        ("LHR", "London", "Heathrow", "United Kingdom"),
    ];
    let hits: Vec<Value> = all
        .iter()
        .filter(|(code, city, ..)| {
            code.to_lowercase().contains(&term) || city.to_lowercase().contains(&term)
        })
        .map(|(code, city, name, country)| {
            json!({"code": code, "city": city, "name": name, "country": country})
        })
        .collect();
    Json(json!({ "airports": hits }))
}

async fn search_flights(State(rec): State<Recorded>, Query(q): Query<Params>) -> Json<Value> {
    let to = q.get("to_airport").cloned().unwrap_or_default();
    rec.push("/search_flights", q);
    if to == "XXX" {
        return Json(json!({"success": false, "flights": [], "error": "Unknown airport"}));
    }
    Json(json!({
        "success": true,
        "flights": [{
            "price": {"total": "612.40", "currency": "EUR"},
            "itineraries": [{
                "duration": "PT11H5M",
                "segments": [
                    {
                        "departure": {"iataCode": "BER", "at": "2026-10-25T06:10:00"},
                        "arrival": {"iataCode": "FRA", "at": "2026-10-25T07:20:00"},
                        "carrierCode": "LH",
                        "number": "173"
                    },
                    {
                        "departure": {"iataCode": "FRA", "at": "2026-10-25T10:15:00"},
                        "arrival": {"iataCode": to, "at": "2026-10-25T12:55:00"},
                        "carrierCode": "LH",
                        "number": "400"
                    }
                ]
            }]
        }]
    }))
}

async fn smart_ask(State(rec): State<Recorded>, Query(q): Query<Params>) -> Json<Value> {
    let question = q.get("question").cloned().unwrap_or_default();
    rec.push("/smart_ask", q);
    if question.contains("Flug") {
        Json(json!({
            "type": "flight_search",
            "message": "Ich suche Flüge von BER nach JFK.",
            "from": "BER",
            "to": "JFK",
            "date": "2026-11-01"
        }))
    } else {
        Json(json!({"type": "chat", "answer": "Gern geschehen!"}))
    }
}

async fn ask(State(rec): State<Recorded>, Query(q): Query<Params>) -> Json<Value> {
    let question = q.get("question").cloned().unwrap_or_default();
    rec.push("/ask", q);
    if question.is_empty() {
        return Json(json!({}));
    }
    Json(json!({"answer": format!("Antwort auf: {}", question)}))
}

async fn save_search(State(rec): State<Recorded>, Query(q): Query<Params>) -> Json<Value> {
    rec.push("/save_search", q);
    Json(json!({"success": true}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Starts the stub on an ephemeral port and returns its base URL.
async fn spawn_backend(rec: Recorded) -> String {
    let app = Router::new()
        .route("/airports", get(airports))
        .route("/search_flights", get(search_flights))
        .route("/smart_ask", get(smart_ask))
        .route("/ask", get(ask))
        .route("/save_search", post(save_search))
        .route("/health", get(health))
        .route("/broken/health", get(broken))
        .with_state(rec);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn query(to: &str) -> SearchQuery {
    SearchQuery {
        from_airport: "BER".into(),
        to_airport: to.into(),
        date: "2026-10-25".into(),
        adults: 2,
    }
}

#[tokio::test]
async fn test_airport_lookup_sends_term() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();

    let airports = api.search_airports("ber").await.unwrap();
    assert_eq!(airports.len(), 1);
    assert_eq!(airports[0].code, "BER");
    assert_eq!(rec.for_path("/airports")[0]["q"], "ber");

    assert!(api.search_airports("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_sends_all_parameters() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();

    let resp = api.search_flights(&query("JFK")).await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.flights.len(), 1);

    let sent = &rec.for_path("/search_flights")[0];
    assert_eq!(sent["from_airport"], "BER");
    assert_eq!(sent["to_airport"], "JFK");
    assert_eq!(sent["date"], "2026-10-25");
    assert_eq!(sent["adults"], "2");
}

#[tokio::test]
async fn test_smart_ask_classifies_answer() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();

    let answer = api.smart_ask("Danke & tschüss").await.unwrap();
    assert_eq!(answer, SmartAnswer::Answer("Gern geschehen!".into()));
    assert_eq!(rec.for_path("/smart_ask")[0]["question"], "Danke & tschüss");

    let answer = api.smart_ask("Flug nach New York").await.unwrap();
    assert!(matches!(answer, SmartAnswer::FlightSearch { from: Some(ref f), .. } if f == "BER"));
}

#[tokio::test]
async fn test_plain_ask_returns_answer_text() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();

    let answer = api.ask("Wie viel Gepäck?").await.unwrap();
    assert_eq!(answer, "Antwort auf: Wie viel Gepäck?");
    assert_eq!(rec.for_path("/ask")[0]["question"], "Wie viel Gepäck?");
    assert!(rec.for_path("/smart_ask").is_empty());

    // A payload without an answer decodes to empty text
    assert_eq!(api.ask("").await.unwrap(), "");
}

#[tokio::test]
async fn test_health_and_save_search() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();

    assert!(api.health().await.unwrap());
    assert!(api.save_search(&query("JFK")).await.unwrap());
    let saved = &rec.for_path("/save_search")[0];
    assert_eq!(saved["from_airport"], "BER");
    assert_eq!(saved["to_airport"], "JFK");
    assert!(!saved.contains_key("adults"));
}

#[tokio::test]
async fn test_error_status_and_unreachable_backend() {
    let base = spawn_backend(Recorded::default()).await;
    let api = ApiClient::new(&format!("{}/broken", base)).unwrap();
    match api.health().await {
        Err(FlyAiError::Status { endpoint, status }) => {
            assert_eq!(endpoint, "health");
            assert_eq!(status, 500);
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert!(matches!(
        api.search_airports("ber").await,
        Err(FlyAiError::Status { status: 404, .. })
    ));

    // Port 9 on loopback is reserved for discard and nothing listens there
    let api = ApiClient::new("http://127.0.0.1:9").unwrap();
    assert!(matches!(
        api.search_airports("ber").await,
        Err(FlyAiError::Http(_))
    ));
}

#[tokio::test]
async fn test_drive_autocomplete_and_search() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();
    let mut c = Controller::new(
        &ClientConfig::default(),
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
    );

    let effects = c.input(Side::Origin, "ber");
    driver::drive(&api, &mut c, effects).await;
    assert!(c.select_suggestion(Side::Origin, 0));
    let effects = c.input(Side::Destination, "york");
    driver::drive(&api, &mut c, effects).await;
    assert!(c.select_suggestion(Side::Destination, 0));
    assert_eq!(c.destination.text, "New York (JFK)");

    let effects = c.submit_search();
    driver::drive(&api, &mut c, effects).await;
    let cards = c.results().cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].flight_label, "LH173");
    assert_eq!(cards[0].stops_label(), "1 Stop(s)");
    assert_eq!(cards[0].departure_time, "06:10");
    assert_eq!(cards[0].duration, "11h5m");
    assert!(rec.for_path("/save_search").is_empty());
}

#[tokio::test]
async fn test_drive_backend_failure_message() {
    let api = ApiClient::new(&spawn_backend(Recorded::default()).await).unwrap();
    let mut c = Controller::new(
        &ClientConfig::default(),
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
    );
    c.input(Side::Origin, "BER");
    c.input(Side::Destination, "XXX");
    let effects = c.submit_search();
    driver::drive(&api, &mut c, effects).await;
    assert_eq!(c.results(), &ResultsView::not_found("Unknown airport"));
}

#[tokio::test]
async fn test_drive_chat_intent_runs_search_and_records() {
    let rec = Recorded::default();
    let api = ApiClient::new(&spawn_backend(rec.clone()).await).unwrap();
    let mut config = ClientConfig::default();
    config.search_delay_ms = 10;
    config.record_searches = true;
    let mut c = Controller::new(&config, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

    let effects = c.send_chat("Flug von Berlin nach New York");
    assert!(matches!(effects.as_slice(), [Effect::SmartAsk { .. }]));
    driver::drive(&api, &mut c, effects).await;

    assert_eq!(c.origin.selection.code(), Some("BER"));
    assert_eq!(c.departure_date, "2026-11-01");
    assert_eq!(c.results().cards().len(), 1);
    let searched = &rec.for_path("/search_flights")[0];
    assert_eq!(searched["date"], "2026-11-01");
    assert_eq!(rec.for_path("/save_search").len(), 1);
    assert_eq!(
        c.transcript().last().unwrap().text,
        "Ich suche Flüge von BER nach JFK."
    );
}

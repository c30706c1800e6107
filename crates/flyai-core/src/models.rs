// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Wire types for the FlyAI backend.
//!
//! Every field is optional on decode: the backend proxies a third-party
//! flight API and drops keys freely, so the client renders fallbacks
//! instead of rejecting a payload.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub airports: Vec<Airport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub from_airport: String,
    pub to_airport: String,
    pub date: String,
    pub adults: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flights: Vec<FlightOffer>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Kept as text; the backend forwards Amadeus decimal strings verbatim.
    #[serde(default, deserialize_with = "string_or_number")]
    pub total: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Option<Vec<Segment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub departure: Option<Endpoint>,
    #[serde(default)]
    pub arrival: Option<Endpoint>,
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Accepts `"129.99"` as well as `129.99`.
fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(de)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub const FLIGHT_SEARCH_INTENT: &str = "flight_search";

/// Raw `/smart_ask` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmartAskResponse {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Classified `/smart_ask` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartAnswer {
    FlightSearch {
        message: String,
        from: Option<String>,
        to: Option<String>,
        date: Option<String>,
    },
    Answer(String),
}

impl From<SmartAskResponse> for SmartAnswer {
    fn from(raw: SmartAskResponse) -> Self {
        if raw.kind.as_deref() == Some(FLIGHT_SEARCH_INTENT) {
            SmartAnswer::FlightSearch {
                message: raw.message.unwrap_or_default(),
                from: raw.from.filter(|s| !s.is_empty()),
                to: raw.to.filter(|s| !s.is_empty()),
                date: raw.date.filter(|s| !s.is_empty()),
            }
        } else {
            SmartAnswer::Answer(raw.answer.unwrap_or_default())
        }
    }
}

/// Raw `/ask` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSearchResponse {
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_offer_decodes_amadeus_shape() {
        let json = r#"{
            "success": true,
            "flights": [{
                "price": {"total": "129.99", "currency": "EUR"},
                "itineraries": [{
                    "duration": "PT2H10M",
                    "segments": [{
                        "departure": {"iataCode": "BER", "at": "2026-10-25T07:15:00"},
                        "arrival": {"iataCode": "LHR", "at": "2026-10-25T08:25:00"},
                        "carrierCode": "BA",
                        "number": "983"
                    }]
                }]
            }]
        }"#;
        let resp: FlightSearchResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.flights.len(), 1);
        let seg = &resp.flights[0].itineraries[0].segments.as_ref().unwrap()[0];
        assert_eq!(seg.carrier_code.as_deref(), Some("BA"));
        assert_eq!(
            seg.departure.as_ref().and_then(|d| d.iata_code.as_deref()),
            Some("BER")
        );
    }

    #[test]
    fn test_numeric_price_and_flight_number() {
        let offer: FlightOffer = serde_json::from_str(
            r#"{"price": {"total": 89.5, "currency": "EUR"},
                "itineraries": [{"segments": [{"carrierCode": "FR", "number": 1234}]}]}"#,
        )
        .unwrap();
        assert_eq!(offer.price.unwrap().total.as_deref(), Some("89.5"));
        let seg = &offer.itineraries[0].segments.as_ref().unwrap()[0];
        assert_eq!(seg.number.as_deref(), Some("1234"));
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let resp: FlightSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
        assert!(resp.flights.is_empty());
        assert!(resp.error.is_none());

        let airports: AirportsResponse = serde_json::from_str("{}").unwrap();
        assert!(airports.airports.is_empty());

        let resp: FlightSearchResponse =
            serde_json::from_str(r#"{"success": false, "flights": null, "error": "Amadeus down"}"#)
                .unwrap();
        assert!(resp.flights.is_empty());
        assert_eq!(resp.error.as_deref(), Some("Amadeus down"));
    }

    #[test]
    fn test_smart_answer_classification() {
        let raw: SmartAskResponse = serde_json::from_str(
            r#"{"type":"flight_search","message":"Suche...","from":"BER","to":"","date":"2026-11-01"}"#,
        )
        .unwrap();
        assert_eq!(
            SmartAnswer::from(raw),
            SmartAnswer::FlightSearch {
                message: "Suche...".into(),
                from: Some("BER".into()),
                to: None,
                date: Some("2026-11-01".into()),
            }
        );

        let raw: SmartAskResponse =
            serde_json::from_str(r#"{"type":"chat","answer":"Hallo!"}"#).unwrap();
        assert_eq!(SmartAnswer::from(raw), SmartAnswer::Answer("Hallo!".into()));

        // No type at all is a plain answer
        let raw: SmartAskResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(SmartAnswer::from(raw), SmartAnswer::Answer(String::new()));
    }
}

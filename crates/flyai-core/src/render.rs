// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Display-ready view models. Front ends draw these verbatim.

use crate::models::{Airport, FlightOffer, Segment};
use crate::selection::suggestion_label;

pub const NO_AIRPORTS_TEXT: &str = "Keine Flughäfen gefunden";
pub const NOT_FOUND_TITLE: &str = "Keine Flüge gefunden";
pub const NOT_FOUND_MESSAGE: &str = "Keine Flüge gefunden";
pub const CONNECTION_ERROR_PREFIX: &str = "Verbindungsfehler: ";
pub const MISSING_AIRPORTS_ALERT: &str = "Bitte wähle Abflug- und Zielflughafen aus!";
pub const DIRECT_LABEL: &str = "Direkt";
pub const PRICE_NOTE: &str = "pro Person";
pub const SELECT_LABEL: &str = "Auswählen";
pub const LOADING_TEXT: &str = "Suche Flüge...";

const MISSING_TIME: &str = "--:--";
const MISSING_AIRPORT: &str = "N/A";
const MISSING_DURATION: &str = "N/A";
const MISSING_PRICE: &str = "---";
const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_CARRIER: &str = "XX";
const DEFAULT_FLIGHT_NUMBER: &str = "000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownItem {
    Suggestion { index: usize, label: String, code: String },
    NoResults,
}

impl DropdownItem {
    pub fn label(&self) -> &str {
        match self {
            DropdownItem::Suggestion { label, .. } => label,
            DropdownItem::NoResults => NO_AIRPORTS_TEXT,
        }
    }
}

pub fn dropdown_items(airports: &[Airport]) -> Vec<DropdownItem> {
    if airports.is_empty() {
        return vec![DropdownItem::NoResults];
    }
    airports
        .iter()
        .enumerate()
        .map(|(index, airport)| DropdownItem::Suggestion {
            index,
            label: suggestion_label(airport),
            code: airport.code.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightCard {
    pub flight_label: String,
    pub departure_time: String,
    pub departure_airport: String,
    pub arrival_time: String,
    pub arrival_airport: String,
    pub duration: String,
    pub stops: usize,
    pub price: String,
    pub currency: String,
}

impl FlightCard {
    pub fn from_offer(offer: &FlightOffer) -> Self {
        let itinerary = offer.itineraries.first();
        let segments = itinerary.and_then(|i| i.segments.as_deref());
        let segment = segments.and_then(|s| s.first());

        // An empty segment list counts as one leg
        let leg_count = segments.map(|s| s.len()).filter(|n| *n > 0).unwrap_or(1);

        let price = offer.price.as_ref();

        Self {
            flight_label: format!(
                "{}{}",
                non_empty(segment.and_then(|s| s.carrier_code.as_deref()))
                    .unwrap_or(DEFAULT_CARRIER),
                non_empty(segment.and_then(|s| s.number.as_deref()))
                    .unwrap_or(DEFAULT_FLIGHT_NUMBER)
            ),
            departure_time: clock_time(segment.and_then(departure_at)),
            departure_airport: airport_code(
                segment
                    .and_then(|s| s.departure.as_ref())
                    .and_then(|e| e.iata_code.as_deref()),
            ),
            arrival_time: clock_time(segment.and_then(arrival_at)),
            arrival_airport: airport_code(
                segment
                    .and_then(|s| s.arrival.as_ref())
                    .and_then(|e| e.iata_code.as_deref()),
            ),
            duration: format_duration(itinerary.and_then(|i| i.duration.as_deref())),
            stops: leg_count - 1,
            price: non_empty(price.and_then(|p| p.total.as_deref()))
                .unwrap_or(MISSING_PRICE)
                .to_string(),
            currency: non_empty(price.and_then(|p| p.currency.as_deref()))
                .unwrap_or(DEFAULT_CURRENCY)
                .to_string(),
        }
    }

    pub fn stops_label(&self) -> String {
        stops_label(self.stops)
    }

    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }

    pub fn price_label(&self) -> String {
        format!("{} {}", self.price, self.currency)
    }
}

fn departure_at(segment: &Segment) -> Option<&str> {
    segment.departure.as_ref().and_then(|e| e.at.as_deref())
}

fn arrival_at(segment: &Segment) -> Option<&str> {
    segment.arrival.as_ref().and_then(|e| e.at.as_deref())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn airport_code(code: Option<&str>) -> String {
    non_empty(code).unwrap_or(MISSING_AIRPORT).to_string()
}

/// `HH:MM` from an ISO timestamp (`2026-10-25T07:15:00` → `07:15`).
pub fn clock_time(timestamp: Option<&str>) -> String {
    let slice: String = timestamp
        .unwrap_or_default()
        .chars()
        .skip(11)
        .take(5)
        .collect();
    if slice.is_empty() {
        MISSING_TIME.to_string()
    } else {
        slice
    }
}

/// ISO-8601 duration without the `PT` marker, lowercased (`PT2H10M` → `2h10m`).
pub fn format_duration(duration: Option<&str>) -> String {
    let formatted = duration.unwrap_or_default().replacen("PT", "", 1).to_lowercase();
    if formatted.is_empty() {
        MISSING_DURATION.to_string()
    } else {
        formatted
    }
}

pub fn stops_label(stops: usize) -> String {
    if stops == 0 {
        DIRECT_LABEL.to_string()
    } else {
        format!("{} Stop(s)", stops)
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    #[default]
    Empty,
    Loading,
    Flights(Vec<FlightCard>),
    NotFound { message: String },
}

impl ResultsView {
    pub fn not_found(message: impl Into<String>) -> Self {
        ResultsView::NotFound {
            message: message.into(),
        }
    }

    pub fn connection_error(error: &str) -> Self {
        Self::not_found(format!("{}{}", CONNECTION_ERROR_PREFIX, error))
    }

    pub fn cards(&self) -> &[FlightCard] {
        match self {
            ResultsView::Flights(cards) => cards,
            _ => &[],
        }
    }
}

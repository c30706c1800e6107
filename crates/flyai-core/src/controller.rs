// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! UI state machine for the search page.
//!
//! Handlers mutate state synchronously and return the [`Effect`]s a front
//! end has to run. Each effect comes back as an [`Outcome`] through
//! [`Controller::apply`]. Nothing in here touches the network.

use crate::chat::{EntryId, Sender, Transcript, CHAT_FAILURE_TEXT, THINKING_TEXT};
use crate::config::ClientConfig;
use crate::models::{Airport, FlightSearchResponse, SearchQuery, SmartAnswer};
use crate::render::{
    dropdown_items, DropdownItem, FlightCard, ResultsView, MISSING_AIRPORTS_ALERT,
    NOT_FOUND_MESSAGE,
};
use crate::selection::{selection_label, AirportField, Side};
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use std::time::Duration;

pub const DEPARTURE_OFFSET_DAYS: u64 = 7;
pub const RETURN_OFFSET_DAYS: u64 = 14;

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out tickets and remembers the newest one; anything older is stale.
#[derive(Debug, Clone, Default)]
struct Sequencer {
    latest: u64,
}

impl Sequencer {
    fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Makes every ticket issued so far stale.
    fn invalidate(&mut self) {
        self.latest += 1;
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripType {
    OneWay,
    #[default]
    RoundTrip,
}

#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    pub visible: bool,
    airports: Vec<Airport>,
    items: Vec<DropdownItem>,
}

impl Dropdown {
    pub fn items(&self) -> &[DropdownItem] {
        &self.items
    }

    fn show(&mut self, airports: Vec<Airport>) {
        self.items = dropdown_items(&airports);
        self.airports = airports;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchAirports {
        side: Side,
        query: String,
        ticket: Ticket,
    },
    SearchFlights {
        query: SearchQuery,
        ticket: Ticket,
    },
    SmartAsk {
        question: String,
        placeholder: EntryId,
    },
    /// Submit the form again after `delay`.
    ScheduleSearch {
        delay: Duration,
    },
    RecordSearch {
        query: SearchQuery,
    },
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Airports {
        side: Side,
        ticket: Ticket,
        result: Result<Vec<Airport>, String>,
    },
    Flights {
        ticket: Ticket,
        query: SearchQuery,
        result: Result<FlightSearchResponse, String>,
    },
    SmartAnswer {
        placeholder: EntryId,
        result: Result<SmartAnswer, String>,
    },
    SearchDue,
    SearchRecorded(Result<bool, String>),
}

#[derive(Debug, Clone)]
pub struct Controller {
    pub origin: AirportField,
    pub destination: AirportField,
    pub departure_date: String,
    pub return_date: String,
    pub trip_type: TripType,
    pub adults: u32,
    pub chat_input: String,
    results: ResultsView,
    filters_visible: bool,
    alert: Option<String>,
    transcript: Transcript,
    origin_dropdown: Dropdown,
    destination_dropdown: Dropdown,
    origin_seq: Sequencer,
    destination_seq: Sequencer,
    search_seq: Sequencer,
    min_query_len: usize,
    max_suggestions: usize,
    search_delay: Duration,
    record_searches: bool,
}

impl Controller {
    /// Fresh form with dates one and two weeks after `today`.
    pub fn new(config: &ClientConfig, today: NaiveDate) -> Self {
        Self {
            origin: AirportField::default(),
            destination: AirportField::default(),
            departure_date: iso_date(today, DEPARTURE_OFFSET_DAYS),
            return_date: iso_date(today, RETURN_OFFSET_DAYS),
            trip_type: TripType::default(),
            adults: 1,
            chat_input: String::new(),
            results: ResultsView::Empty,
            filters_visible: false,
            alert: None,
            transcript: Transcript::new(),
            origin_dropdown: Dropdown::default(),
            destination_dropdown: Dropdown::default(),
            origin_seq: Sequencer::default(),
            destination_seq: Sequencer::default(),
            search_seq: Sequencer::default(),
            min_query_len: config.min_query_len,
            max_suggestions: config.max_suggestions,
            search_delay: config.search_delay(),
            record_searches: config.record_searches,
        }
    }

    pub fn with_local_date(config: &ClientConfig) -> Self {
        Self::new(config, chrono::Local::now().date_naive())
    }

    pub fn field(&self, side: Side) -> &AirportField {
        match side {
            Side::Origin => &self.origin,
            Side::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, side: Side) -> &mut AirportField {
        match side {
            Side::Origin => &mut self.origin,
            Side::Destination => &mut self.destination,
        }
    }

    pub fn dropdown(&self, side: Side) -> &Dropdown {
        match side {
            Side::Origin => &self.origin_dropdown,
            Side::Destination => &self.destination_dropdown,
        }
    }

    fn dropdown_mut(&mut self, side: Side) -> &mut Dropdown {
        match side {
            Side::Origin => &mut self.origin_dropdown,
            Side::Destination => &mut self.destination_dropdown,
        }
    }

    fn seq_mut(&mut self, side: Side) -> &mut Sequencer {
        match side {
            Side::Origin => &mut self.origin_seq,
            Side::Destination => &mut self.destination_seq,
        }
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.results == ResultsView::Loading
    }

    pub fn filters_visible(&self) -> bool {
        self.filters_visible
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Returns the pending alert and clears it.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    // ---------------------------------------------------------------------
    // Autocomplete
    // ---------------------------------------------------------------------

    /// Text typed into an airport field.
    pub fn input(&mut self, side: Side, text: &str) -> Vec<Effect> {
        self.field_mut(side).text = text.to_string();
        self.query_airports(side)
    }

    /// Field regained focus: re-open suggestions for what is already typed.
    pub fn focus(&mut self, side: Side) -> Vec<Effect> {
        if self.field(side).text.chars().count() < self.min_query_len {
            return Vec::new();
        }
        self.query_airports(side)
    }

    fn query_airports(&mut self, side: Side) -> Vec<Effect> {
        let query = self.field(side).text.clone();
        if query.chars().count() < self.min_query_len {
            self.dropdown_mut(side).hide();
            // An answer for the longer text must not reopen the list
            self.seq_mut(side).invalidate();
            return Vec::new();
        }
        let ticket = self.seq_mut(side).issue();
        vec![Effect::FetchAirports {
            side,
            query,
            ticket,
        }]
    }

    /// A click landed outside both field groups.
    pub fn click_outside(&mut self) {
        self.origin_dropdown.hide();
        self.destination_dropdown.hide();
    }

    /// Picks the dropdown entry at `index`. Returns false for a closed list,
    /// the placeholder row or an out-of-range index.
    pub fn select_suggestion(&mut self, side: Side, index: usize) -> bool {
        let dropdown = self.dropdown(side);
        if !dropdown.visible {
            return false;
        }
        let Some(airport) = dropdown.airports.get(index).cloned() else {
            return false;
        };
        let label = selection_label(&airport);
        debug!("Selected {} for {:?}", airport.code, side);
        self.field_mut(side).select(&airport.code, label);
        self.dropdown_mut(side).hide();
        self.seq_mut(side).invalidate();
        true
    }

    /// Exchanges text and selection of both fields in one step. Open
    /// suggestion lists and lookups still in flight belong to the old text,
    /// so both are dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
        for side in [Side::Origin, Side::Destination] {
            self.dropdown_mut(side).hide();
            self.seq_mut(side).invalidate();
        }
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    pub fn submit_search(&mut self) -> Vec<Effect> {
        let (Some(from), Some(to)) = (self.origin.resolve(), self.destination.resolve()) else {
            info!("Search blocked: origin or destination unresolved");
            self.alert = Some(MISSING_AIRPORTS_ALERT.to_string());
            return Vec::new();
        };

        let query = SearchQuery {
            from_airport: from,
            to_airport: to,
            date: self.departure_date.clone(),
            adults: self.adults,
        };
        self.results = ResultsView::Loading;
        self.filters_visible = false;
        let ticket = self.search_seq.issue();
        vec![Effect::SearchFlights { query, ticket }]
    }

    // ---------------------------------------------------------------------
    // Chat
    // ---------------------------------------------------------------------

    pub fn send_chat(&mut self, message: &str) -> Vec<Effect> {
        let question = message.trim().to_string();
        if question.is_empty() {
            return Vec::new();
        }
        self.transcript.push(Sender::User, question.clone());
        self.chat_input.clear();
        let placeholder = self.transcript.push(Sender::Assistant, THINKING_TEXT);
        vec![Effect::SmartAsk {
            question,
            placeholder,
        }]
    }

    // ---------------------------------------------------------------------
    // Outcomes
    // ---------------------------------------------------------------------

    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Airports {
                side,
                ticket,
                result,
            } => {
                if !self.seq_mut(side).is_current(ticket) {
                    debug!("Discarding stale airport suggestions for {:?}", side);
                    return Vec::new();
                }
                let mut airports = result.unwrap_or_else(|e| {
                    debug!("Airport lookup failed, showing no suggestions: {}", e);
                    Vec::new()
                });
                airports.truncate(self.max_suggestions);
                self.dropdown_mut(side).show(airports);
                Vec::new()
            }
            Outcome::Flights {
                ticket,
                query,
                result,
            } => {
                if !self.search_seq.is_current(ticket) {
                    debug!(
                        "Discarding stale search result — {}->{}",
                        query.from_airport, query.to_airport
                    );
                    return Vec::new();
                }
                self.show_search_result(query, result)
            }
            Outcome::SmartAnswer {
                placeholder,
                result,
            } => {
                self.transcript.remove(placeholder);
                match result {
                    Ok(SmartAnswer::FlightSearch {
                        message,
                        from,
                        to,
                        date,
                    }) => {
                        self.transcript.push(Sender::Assistant, message);
                        self.fill_from_chat(from, to, date);
                        vec![Effect::ScheduleSearch {
                            delay: self.search_delay,
                        }]
                    }
                    Ok(SmartAnswer::Answer(answer)) => {
                        self.transcript.push(Sender::Assistant, answer);
                        Vec::new()
                    }
                    Err(e) => {
                        warn!("smart_ask failed: {}", e);
                        self.transcript.push(Sender::Assistant, CHAT_FAILURE_TEXT);
                        Vec::new()
                    }
                }
            }
            Outcome::SearchDue => self.submit_search(),
            Outcome::SearchRecorded(result) => {
                match result {
                    Ok(true) => debug!("Search recorded in backend history"),
                    Ok(false) => debug!("Backend declined to record search"),
                    Err(e) => warn!("Could not record search: {}", e),
                }
                Vec::new()
            }
        }
    }

    fn show_search_result(
        &mut self,
        query: SearchQuery,
        result: Result<FlightSearchResponse, String>,
    ) -> Vec<Effect> {
        match result {
            Ok(resp) if resp.success && !resp.flights.is_empty() => {
                info!(
                    "Found {} flights — {}->{} on {}",
                    resp.flights.len(),
                    query.from_airport,
                    query.to_airport,
                    query.date
                );
                self.results =
                    ResultsView::Flights(resp.flights.iter().map(FlightCard::from_offer).collect());
                self.filters_visible = true;
                if self.record_searches {
                    return vec![Effect::RecordSearch { query }];
                }
            }
            Ok(resp) => {
                let message = resp
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
                self.results = ResultsView::not_found(message);
            }
            Err(e) => {
                warn!("Flight search failed: {}", e);
                self.results = ResultsView::connection_error(&e);
            }
        }
        Vec::new()
    }

    fn fill_from_chat(&mut self, from: Option<String>, to: Option<String>, date: Option<String>) {
        if let Some(code) = from {
            self.origin.select(&code, code.clone());
        }
        if let Some(code) = to {
            self.destination.select(&code, code.clone());
        }
        if let Some(date) = date {
            self.departure_date = date;
        }
    }
}

fn iso_date(today: NaiveDate, offset_days: u64) -> String {
    today
        .checked_add_days(Days::new(offset_days))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use flyai_core::api::ApiClient;
use flyai_core::chat::EntryId;
use flyai_core::config::ClientConfig;
use flyai_core::controller::{Controller, Effect, Outcome, TripType};
use flyai_core::driver;
use flyai_core::render::{
    DropdownItem, FlightCard, ResultsView, LOADING_TEXT, NOT_FOUND_TITLE, PRICE_NOTE, SELECT_LABEL,
};
use flyai_core::selection::Side;
use iced::widget::{
    button, column, container, mouse_area, pick_list, row, scrollable, text, text_input, Column,
    Space,
};
use iced::{Alignment, Color, Element, Length, Task, Theme};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

mod chat_panel;
mod style;

const ADULT_CHOICES: [u32; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const DATE_PLACEHOLDER: &str = "JJJJ-MM-TT";

fn main() -> anyhow::Result<()> {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let config = ClientConfig::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default config — error={}", e);
        ClientConfig::default()
    });
    let api = ApiClient::from_config(&config)?;
    log::info!("Starting FlyAI — base_url={}", api.base_url());

    iced::application("FlyAI", App::update, App::view)
        .theme(|_| Theme::Dark)
        .window_size((1200.0, 800.0))
        .run_with(move || App::new(&config, api))?;
    Ok(())
}

#[derive(Debug, Clone)]
enum Message {
    // Search form
    TripTypeSelected(TripType),
    AirportInput(Side, String),
    ReopenSuggestions(Side),
    SuggestionPicked(Side, usize),
    SwapAirports,
    DepartureDateChanged(String),
    ReturnDateChanged(String),
    AdultsSelected(u32),
    Search,
    FieldGroupPressed,
    BackgroundClicked,

    // Chat
    ChatInputChanged(String),
    SendChat,

    // Backend
    Outcome(Outcome),
    HealthChecked(Result<bool, String>),
}

struct App {
    controller: Controller,
    api: ApiClient,
    status: String,
    chat_scroll_id: scrollable::Id,
}

impl App {
    fn new(config: &ClientConfig, api: ApiClient) -> (Self, Task<Message>) {
        let app = Self {
            controller: Controller::with_local_date(config),
            status: format!("Verbinde mit {}...", api.base_url()),
            api: api.clone(),
            chat_scroll_id: scrollable::Id::unique(),
        };
        let health = Task::perform(
            async move { api.health().await.map_err(|e| e.to_string()) },
            Message::HealthChecked,
        );
        (app, health)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let last_entry = self.last_chat_entry();

        let effects = match message {
            Message::TripTypeSelected(trip_type) => {
                self.controller.trip_type = trip_type;
                Vec::new()
            }
            Message::AirportInput(side, value) => self.controller.input(side, &value),
            Message::ReopenSuggestions(side) => self.controller.focus(side),
            Message::SuggestionPicked(side, index) => {
                self.controller.select_suggestion(side, index);
                Vec::new()
            }
            Message::SwapAirports => {
                self.controller.swap();
                Vec::new()
            }
            Message::DepartureDateChanged(date) => {
                self.controller.departure_date = date;
                Vec::new()
            }
            Message::ReturnDateChanged(date) => {
                self.controller.return_date = date;
                Vec::new()
            }
            Message::AdultsSelected(adults) => {
                self.controller.adults = adults;
                Vec::new()
            }
            Message::Search => self.controller.submit_search(),
            // Swallowed so the page-wide handler never sees it
            Message::FieldGroupPressed => Vec::new(),
            Message::BackgroundClicked => {
                self.controller.click_outside();
                Vec::new()
            }
            Message::ChatInputChanged(value) => {
                self.controller.chat_input = value;
                Vec::new()
            }
            Message::SendChat => {
                let input = self.controller.chat_input.clone();
                self.controller.send_chat(&input)
            }
            Message::Outcome(outcome) => self.controller.apply(outcome),
            Message::HealthChecked(result) => {
                self.status = match result {
                    Ok(true) => format!("Verbunden mit {}", self.api.base_url()),
                    Ok(false) => format!("Backend meldet Probleme: {}", self.api.base_url()),
                    Err(e) => {
                        log::warn!("Health check failed — error={}", e);
                        format!("Backend nicht erreichbar: {}", e)
                    }
                };
                Vec::new()
            }
        };

        self.show_alert();

        let scroll = if self.last_chat_entry() != last_entry {
            scrollable::snap_to(self.chat_scroll_id.clone(), scrollable::RelativeOffset::END)
        } else {
            Task::none()
        };
        Task::batch([self.run(effects), scroll])
    }

    fn last_chat_entry(&self) -> Option<EntryId> {
        self.controller.transcript().last().map(|e| e.id)
    }

    /// Spawns one task per effect; each reports back as `Message::Outcome`.
    fn run(&self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| {
            let api = self.api.clone();
            Task::perform(
                async move { driver::execute(&api, effect).await },
                Message::Outcome,
            )
        }))
    }

    fn show_alert(&mut self) {
        if let Some(alert) = self.controller.take_alert() {
            rfd::MessageDialog::new()
                .set_title("FlyAI")
                .set_description(alert)
                .set_level(rfd::MessageLevel::Warning)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("FlyAI").size(28).color(style::palette::TEXT_PRIMARY),
            Space::with_width(Length::Fill),
            text(&self.status)
                .size(12)
                .color(style::palette::TEXT_SECONDARY),
        ]
        .align_y(Alignment::Center);

        let main = scrollable(
            column![header, self.view_form(), self.view_results()]
                .spacing(20)
                .padding(25),
        )
        .height(Length::Fill)
        .width(Length::Fill);

        let main = container(main)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::container_main_content);

        // Any press outside an airport field group closes both dropdowns
        mouse_area(
            row![
                main,
                chat_panel::view(
                    self.controller.transcript(),
                    &self.controller.chat_input,
                    &self.chat_scroll_id
                )
            ]
            .width(Length::Fill)
            .height(Length::Fill),
        )
        .on_press(Message::BackgroundClicked)
        .into()
    }

    fn view_form(&self) -> Element<'_, Message> {
        let c = &self.controller;

        let trip_type = row![
            button(text("Hin- und Rückflug"))
                .on_press(Message::TripTypeSelected(TripType::RoundTrip))
                .style(style::button_toggle(c.trip_type == TripType::RoundTrip))
                .padding([6, 14]),
            button(text("Nur Hinflug"))
                .on_press(Message::TripTypeSelected(TripType::OneWay))
                .style(style::button_toggle(c.trip_type == TripType::OneWay))
                .padding([6, 14]),
        ]
        .spacing(10);

        let airports = row![
            self.view_airport_field(Side::Origin, "Von"),
            column![
                Space::with_height(Length::Fixed(20.0)),
                button(text("⇄"))
                    .on_press(Message::SwapAirports)
                    .style(style::button_secondary)
                    .padding(10),
            ],
            self.view_airport_field(Side::Destination, "Nach"),
        ]
        .spacing(10);

        let return_date = text_input(DATE_PLACEHOLDER, &c.return_date).padding(10);
        let return_date = if c.trip_type == TripType::RoundTrip {
            return_date.on_input(Message::ReturnDateChanged)
        } else {
            return_date
        };

        let details = row![
            labeled(
                "Hinflug",
                text_input(DATE_PLACEHOLDER, &c.departure_date)
                    .on_input(Message::DepartureDateChanged)
                    .padding(10)
            ),
            labeled("Rückflug", return_date),
            labeled(
                "Passagiere",
                pick_list(ADULT_CHOICES, Some(c.adults), Message::AdultsSelected)
                    .padding(10)
                    .width(Length::Fill)
            ),
        ]
        .spacing(15);

        let search = button(text("Flüge suchen").size(16))
            .on_press(Message::Search)
            .style(style::button_primary)
            .padding([10, 30]);

        container(column![trip_type, airports, details, search].spacing(20))
            .padding(20)
            .width(Length::Fill)
            .style(style::container_card)
            .into()
    }

    fn view_airport_field(&self, side: Side, label: &'static str) -> Element<'_, Message> {
        let field = self.controller.field(side);
        let input = row![
            text_input("Stadt oder Flughafen", &field.text)
                .on_input(move |value| Message::AirportInput(side, value))
                .padding(10),
            button(text("▾"))
                .on_press(Message::ReopenSuggestions(side))
                .style(style::button_secondary)
                .padding(10),
        ]
        .spacing(4);

        let mut group = column![
            text(label).size(12).color(style::palette::TEXT_SECONDARY),
            input
        ]
        .spacing(6)
        .width(Length::Fill);

        let dropdown = self.controller.dropdown(side);
        if dropdown.visible {
            let items = Column::with_children(
                dropdown
                    .items()
                    .iter()
                    .map(|item| dropdown_row(side, item)),
            )
            .spacing(2);
            group = group.push(
                container(items)
                    .padding(4)
                    .width(Length::Fill)
                    .style(style::container_dropdown),
            );
        }
        mouse_area(group)
            .on_press(Message::FieldGroupPressed)
            .into()
    }

    fn view_results(&self) -> Element<'_, Message> {
        match self.controller.results() {
            ResultsView::Empty => Space::with_height(Length::Shrink).into(),
            ResultsView::Loading => container(text(LOADING_TEXT).size(16))
                .padding(20)
                .into(),
            ResultsView::Flights(cards) => {
                let mut list = Column::new().spacing(12);
                if self.controller.filters_visible() {
                    list = list.push(
                        row![
                            text(format!("{} Flüge gefunden", cards.len())).size(14),
                            Space::with_width(Length::Fill),
                        ]
                        .padding([0, 5]),
                    );
                }
                cards
                    .iter()
                    .fold(list, |list, card| list.push(view_card(card)))
                    .into()
            }
            ResultsView::NotFound { message } => container(
                column![
                    text(NOT_FOUND_TITLE).size(18),
                    text(message.as_str())
                        .size(14)
                        .color(style::palette::TEXT_SECONDARY),
                ]
                .spacing(6),
            )
            .padding(20)
            .width(Length::Fill)
            .style(style::container_card)
            .into(),
        }
    }
}

fn labeled<'a>(label: &'a str, field: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![
        text(label).size(12).color(style::palette::TEXT_SECONDARY),
        field.into()
    ]
    .spacing(6)
    .width(Length::Fill)
    .into()
}

fn dropdown_row(side: Side, item: &DropdownItem) -> Element<'_, Message> {
    match item {
        DropdownItem::Suggestion { index, label, .. } => button(text(label.as_str()).size(14))
            .on_press(Message::SuggestionPicked(side, *index))
            .style(style::button_suggestion)
            .width(Length::Fill)
            .padding([6, 10])
            .into(),
        DropdownItem::NoResults => container(
            text(item.label())
                .size(14)
                .color(style::palette::TEXT_SECONDARY),
        )
        .padding([6, 10])
        .into(),
    }
}

fn endpoint_column<'a>(time: &'a str, airport: &'a str) -> Column<'a, Message> {
    column![
        text(time).size(20),
        text(airport)
            .size(12)
            .color(style::palette::TEXT_SECONDARY),
    ]
    .spacing(2)
    .align_x(Alignment::Center)
}

fn view_card(card: &FlightCard) -> Element<'_, Message> {
    let stops = container(text(card.stops_label()).size(10).color(Color::WHITE))
        .padding([2, 6])
        .style(style::container_tag(card.is_direct()));

    let route = row![
        endpoint_column(&card.departure_time, &card.departure_airport),
        column![
            text(&card.duration)
                .size(12)
                .color(style::palette::TEXT_SECONDARY),
            stops
        ]
        .spacing(4)
        .align_x(Alignment::Center)
        .width(Length::Fill),
        endpoint_column(&card.arrival_time, &card.arrival_airport),
    ]
    .spacing(20)
    .align_y(Alignment::Center)
    .width(Length::Fill);

    let price = column![
        text(card.price_label()).size(20),
        text(PRICE_NOTE)
            .size(11)
            .color(style::palette::TEXT_SECONDARY),
        button(text(SELECT_LABEL).size(12))
            .style(style::button_primary)
            .padding([6, 16]),
    ]
    .spacing(4)
    .align_x(Alignment::End);

    container(
        row![
            text(&card.flight_label)
                .size(14)
                .width(Length::Fixed(80.0)),
            route,
            price
        ]
        .spacing(25)
        .align_y(Alignment::Center),
    )
    .padding(15)
    .width(Length::Fill)
    .style(style::container_card)
    .into()
}

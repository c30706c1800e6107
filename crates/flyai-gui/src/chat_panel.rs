// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::style;
use crate::Message;
use flyai_core::chat::{ChatEntry, Transcript};
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{Element, Length};

const GREETING: &str =
    "Hallo! Frag mich nach Flügen, z.B. \"Flug von Berlin nach New York am 1. November\".";

pub fn view<'a>(
    transcript: &'a Transcript,
    input: &'a str,
    scroll_id: &scrollable::Id,
) -> Element<'a, Message> {
    let greeting = container(text(GREETING).size(14).color(style::palette::TEXT_SECONDARY))
        .padding(10)
        .style(style::container_bubble(false));

    let history = Column::with_children(
        std::iter::once(Element::from(greeting))
            .chain(transcript.entries().iter().map(entry_view)),
    )
    .spacing(10)
    .padding([0, 10]);

    let chat_history = scrollable(history)
        .id(scroll_id.clone())
        .height(Length::Fill)
        .width(Length::Fill);

    let input_area = row![
        text_input("Nachricht eingeben...", input)
            .on_input(Message::ChatInputChanged)
            .on_submit(Message::SendChat)
            .padding(10),
        button("Senden")
            .on_press(Message::SendChat)
            .style(style::button_primary)
            .padding(10)
    ]
    .spacing(10);

    container(
        column![
            text("FlyAI Assistent")
                .size(18)
                .color(style::palette::TEXT_PRIMARY),
            chat_history,
            input_area
        ]
        .spacing(15)
        .padding(20),
    )
    .width(Length::Fixed(360.0))
    .height(Length::Fill)
    .style(style::container_sidebar)
    .into()
}

fn entry_view(entry: &ChatEntry) -> Element<'_, Message> {
    let sender = if entry.is_user() { "Du" } else { "FlyAI" };
    container(column![
        text(sender).size(12).color(style::palette::TEXT_SECONDARY),
        text(&entry.text).size(15)
    ])
    .padding(10)
    .width(Length::Fill)
    .style(style::container_bubble(entry.is_user()))
    .into()
}

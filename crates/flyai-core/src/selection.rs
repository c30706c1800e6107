// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::models::Airport;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Origin,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AirportSelection {
    #[default]
    Unselected,
    Selected { code: String, label: String },
}

impl AirportSelection {
    pub fn code(&self) -> Option<&str> {
        match self {
            AirportSelection::Unselected => None,
            AirportSelection::Selected { code, .. } => Some(code),
        }
    }
}

/// One airport input: what the user sees plus what was picked.
///
/// Typing does not reset the selection; only a new pick, a swap or a chat
/// fill replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AirportField {
    pub text: String,
    pub selection: AirportSelection,
}

impl AirportField {
    pub fn select(&mut self, code: &str, label: String) {
        self.text = label.clone();
        self.selection = AirportSelection::Selected {
            code: code.to_string(),
            label,
        };
    }

    /// Selected code, else a code parsed from the visible text.
    pub fn resolve(&self) -> Option<String> {
        match self.selection.code() {
            Some(code) if !code.is_empty() => Some(code.to_string()),
            _ => extract_code(&self.text),
        }
    }
}

fn paren_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Z]{3})\)").unwrap())
}

/// Pulls an IATA code out of free text: `"Berlin (BER)"` or a bare `"BER"`.
pub fn extract_code(value: &str) -> Option<String> {
    if let Some(cap) = paren_code_regex().captures(value) {
        return Some(cap[1].to_string());
    }
    if value.chars().count() == 3 && value == value.to_uppercase() {
        return Some(value.to_string());
    }
    None
}

/// Text written into the field after picking a suggestion.
pub fn selection_label(airport: &Airport) -> String {
    format!("{} ({})", airport.city, airport.code)
}

/// One dropdown line: city, name with code, country.
pub fn suggestion_label(airport: &Airport) -> String {
    format!(
        "{} / {} ({}) / {}",
        airport.city, airport.name, airport.code, airport.country
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_parenthesized() {
        assert_eq!(extract_code("Berlin (BER)"), Some("BER".to_string()));
        assert_eq!(extract_code("New York (JFK) Intl"), Some("JFK".to_string()));
        // Lowercase inside parens is not a code
        assert_eq!(extract_code("Berlin (ber)"), None);
        assert_eq!(extract_code("Berlin (BERL)"), None);
    }

    #[test]
    fn test_extract_code_bare() {
        assert_eq!(extract_code("LHR"), Some("LHR".to_string()));
        assert_eq!(extract_code("lhr"), None);
        assert_eq!(extract_code("LH"), None);
        assert_eq!(extract_code("LHRX"), None);
        assert_eq!(extract_code(""), None);
    }

    #[test]
    fn test_resolve_prefers_selection() {
        let mut field = AirportField::default();
        field.select("BER", "Berlin (BER)".to_string());
        field.text = "Paris (CDG)".to_string();
        assert_eq!(field.resolve(), Some("BER".to_string()));

        let typed = AirportField {
            text: "Paris (CDG)".to_string(),
            selection: AirportSelection::Unselected,
        };
        assert_eq!(typed.resolve(), Some("CDG".to_string()));
    }

    #[test]
    fn test_labels() {
        let ber = Airport {
            code: "BER".into(),
            city: "Berlin".into(),
            name: "Brandenburg".into(),
            country: "Germany".into(),
        };
        assert_eq!(selection_label(&ber), "Berlin (BER)");
        assert_eq!(suggestion_label(&ber), "Berlin / Brandenburg (BER) / Germany");
    }
}

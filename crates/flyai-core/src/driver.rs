// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::api::ApiClient;
use crate::controller::{Controller, Effect, Outcome};
use std::collections::VecDeque;

/// Runs one effect against the backend.
pub async fn execute(api: &ApiClient, effect: Effect) -> Outcome {
    match effect {
        Effect::FetchAirports {
            side,
            query,
            ticket,
        } => Outcome::Airports {
            side,
            ticket,
            result: api.search_airports(&query).await.map_err(|e| e.to_string()),
        },
        Effect::SearchFlights { query, ticket } => {
            let result = api.search_flights(&query).await.map_err(|e| e.to_string());
            Outcome::Flights {
                ticket,
                query,
                result,
            }
        }
        Effect::SmartAsk {
            question,
            placeholder,
        } => Outcome::SmartAnswer {
            placeholder,
            result: api.smart_ask(&question).await.map_err(|e| e.to_string()),
        },
        Effect::ScheduleSearch { delay } => {
            tokio::time::sleep(delay).await;
            Outcome::SearchDue
        }
        Effect::RecordSearch { query } => {
            Outcome::SearchRecorded(api.save_search(&query).await.map_err(|e| e.to_string()))
        }
    }
}

/// Executes `effects` one at a time, feeding every outcome back into the
/// controller, until nothing is left to do. Used by front ends without an
/// event loop of their own.
pub async fn drive(api: &ApiClient, controller: &mut Controller, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let outcome = execute(api, effect).await;
        queue.extend(controller.apply(outcome));
    }
}

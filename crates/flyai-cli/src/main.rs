// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flyai_core::api::ApiClient;
use flyai_core::chat::Sender;
use flyai_core::config::ClientConfig;
use flyai_core::controller::Controller;
use flyai_core::driver;
use flyai_core::render::{DropdownItem, FlightCard, ResultsView, PRICE_NOTE};
use flyai_core::selection::Side;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the FlyAI backend
    #[arg(long, env = "FLYAI_API_URL")]
    api_url: Option<String>,

    /// Log requests and state changes to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up airports by city, name or code
    Airports { query: String },
    /// Search flights between two airports (codes or city names)
    Search {
        from: String,
        to: String,
        /// Departure date (YYYY-MM-DD), defaults to one week from today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=9))]
        adults: u32,
        /// Store the search in the backend history
        #[arg(long)]
        remember: bool,
    },
    /// Ask the assistant a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Ask the plain question endpoint, never start a flight search
        #[arg(long)]
        plain: bool,
    },
    /// Chat with the assistant interactively
    Chat,
    /// Check that the backend is reachable
    Health,
    /// Show or change the stored client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Store a new backend base URL
    SetUrl { url: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if let Commands::Config { action } = &cli.command {
        return run_config(action);
    }

    let mut config = ClientConfig::load()?;
    if let Some(url) = &cli.api_url {
        config.set_base_url(url)?;
    }
    if let Commands::Search { remember: true, .. } = &cli.command {
        config.record_searches = true;
    }
    let api = ApiClient::from_config(&config)?;
    let mut controller = Controller::with_local_date(&config);
    log::debug!("Using backend — base_url={}", api.base_url());

    match cli.command {
        Commands::Airports { query } => {
            let effects = controller.input(Side::Origin, &query);
            if effects.is_empty() {
                return Err(anyhow!(
                    "Query too short, type at least {} characters",
                    config.min_query_len
                ));
            }
            driver::drive(&api, &mut controller, effects).await;
            for item in controller.dropdown(Side::Origin).items() {
                match item {
                    DropdownItem::Suggestion { code, label, .. } => {
                        println!("{}  {}", code, label)
                    }
                    DropdownItem::NoResults => println!("{}", item.label()),
                }
            }
        }
        Commands::Search {
            from,
            to,
            date,
            adults,
            ..
        } => {
            resolve_airport(&api, &mut controller, Side::Origin, &from).await;
            resolve_airport(&api, &mut controller, Side::Destination, &to).await;
            if let Some(date) = date {
                NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
                controller.departure_date = date;
            }
            controller.adults = adults;

            let effects = controller.submit_search();
            if let Some(alert) = controller.take_alert() {
                return Err(anyhow!("{}", alert));
            }
            println!(
                "{} → {} am {}",
                controller.origin.text, controller.destination.text, controller.departure_date
            );
            driver::drive(&api, &mut controller, effects).await;
            print_results(controller.results());
        }
        Commands::Ask {
            question,
            plain: true,
        } => {
            println!("FlyAI: {}", api.ask(&question.join(" ")).await?);
        }
        Commands::Ask { question, .. } => {
            let effects = controller.send_chat(&question.join(" "));
            driver::drive(&api, &mut controller, effects).await;
            print_replies(&controller, 1);
            if let Some(alert) = controller.take_alert() {
                return Err(anyhow!("{}", alert));
            }
            print_results(controller.results());
        }
        Commands::Chat => run_chat(&api, &mut controller).await?,
        Commands::Health => {
            if api.health().await? {
                println!("Backend OK — {}", api.base_url());
            } else {
                return Err(anyhow!("Backend at {} is not healthy", api.base_url()));
            }
        }
        Commands::Config { action } => run_config(&action)?,
    }

    Ok(())
}

fn run_config(action: &ConfigAction) -> Result<()> {
    let path = ClientConfig::default_path();
    match action {
        ConfigAction::Show => {
            let config = ClientConfig::load()?;
            println!("# {}", path.display());
            println!("{}", describe_config(&config));
        }
        ConfigAction::SetUrl { url } => {
            // The env override must not end up in the file
            let mut config = ClientConfig::load_from(&path)?;
            config.set_base_url(url)?;
            config.save()?;
            println!("Saved base_url={} to {}", config.base_url, path.display());
        }
    }
    Ok(())
}

fn describe_config(config: &ClientConfig) -> String {
    format!(
        "base_url = {}\nmax_suggestions = {}\nmin_query_len = {}\nsearch_delay_ms = {}\nrequest_timeout_secs = {}\nrecord_searches = {}",
        config.base_url,
        config.max_suggestions,
        config.min_query_len,
        config.search_delay_ms,
        config
            .request_timeout_secs
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string()),
        config.record_searches
    )
}

/// Types `input` into the field. Text that is not a code on its own gets
/// the first suggestion picked for it.
async fn resolve_airport(api: &ApiClient, controller: &mut Controller, side: Side, input: &str) {
    let effects = controller.input(side, input);
    if controller.field(side).resolve().is_some() || effects.is_empty() {
        return;
    }
    driver::drive(api, controller, effects).await;
    if controller.select_suggestion(side, 0) {
        println!("{} → {}", input, controller.field(side).text);
    }
}

async fn run_chat(api: &ApiClient, controller: &mut Controller) -> Result<()> {
    println!("FlyAI Assistent. Leere Zeile oder 'exit' zum Beenden.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() || line == "exit" || line == "quit" {
            break;
        }

        let before = controller.results().clone();
        let seen = controller.transcript().len();
        let effects = controller.send_chat(line);
        driver::drive(api, controller, effects).await;

        // The user line is already on screen
        print_replies(controller, seen + 1);
        if let Some(alert) = controller.take_alert() {
            eprintln!("{}", alert);
        }
        if *controller.results() != before {
            print_results(controller.results());
        }
    }
    Ok(())
}

/// Prints assistant entries from `start` on.
fn print_replies(controller: &Controller, start: usize) {
    for entry in controller.transcript().entries().iter().skip(start) {
        if entry.sender == Sender::Assistant {
            println!("FlyAI: {}", entry.text);
        }
    }
}

fn print_results(results: &ResultsView) {
    match results {
        ResultsView::Flights(cards) => {
            println!("{} Flüge gefunden", cards.len());
            for card in cards {
                println!("{}", card_line(card));
            }
        }
        ResultsView::NotFound { message } => println!("{}", message),
        ResultsView::Empty | ResultsView::Loading => {}
    }
}

fn card_line(card: &FlightCard) -> String {
    format!(
        "{:<8} {} {} → {} {}  {:<8} {:<10} {} {}",
        card.flight_label,
        card.departure_time,
        card.departure_airport,
        card.arrival_time,
        card.arrival_airport,
        card.duration,
        card.stops_label(),
        card.price_label(),
        PRICE_NOTE
    )
}

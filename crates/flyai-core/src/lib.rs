// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod api;
pub mod chat;
pub mod config;
pub mod controller;
pub mod driver;
pub mod models;
pub mod render;
pub mod selection;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlyAiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory holding `config.json`. Falls back to the working directory
/// when the platform has no notion of a config dir.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "flyai", "FlyAI")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

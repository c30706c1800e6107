// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::FlyAiError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const API_URL_ENV: &str = "FLYAI_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Pause between a chat-driven form fill and the search it triggers.
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    /// Unset means no client-side timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub record_searches: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_suggestions() -> usize {
    10
}

fn default_min_query_len() -> usize {
    2
}

fn default_search_delay_ms() -> u64 {
    500
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_suggestions: default_max_suggestions(),
            min_query_len: default_min_query_len(),
            search_delay_ms: default_search_delay_ms(),
            request_timeout_secs: None,
            record_searches: false,
        }
    }
}

impl ClientConfig {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join("config.json")
    }

    /// Loads the user config and applies the `FLYAI_API_URL` override.
    pub fn load() -> Result<Self, FlyAiError> {
        let mut config = Self::load_from(&Self::default_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("Using {} override — base_url={}", API_URL_ENV, url);
                config.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, FlyAiError> {
        if !path.exists() {
            log::info!(
                "No config file found; using defaults — path={}",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            log::warn!("Config parse error — path={} error={}", path.display(), e);
            FlyAiError::Config(format!("{}: {}", path.display(), e))
        })?;
        log::info!(
            "Loaded config — path={} base_url={}",
            path.display(),
            config.base_url
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), FlyAiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), FlyAiError> {
        self.save_to(&Self::default_path())
    }

    /// Replaces the base URL after checking that it parses as an http(s) URL.
    pub fn set_base_url(&mut self, url: &str) -> Result<(), FlyAiError> {
        let parsed = url::Url::parse(url.trim())?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FlyAiError::Config(format!(
                "Unsupported scheme '{}' in {}",
                parsed.scheme(),
                url
            )));
        }
        self.base_url = url.trim().trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

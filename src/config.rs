//! # Bot Configuration Module
//!
//! This module defines the runtime configuration: the Telegram token,
//! log file rotation settings and the search page used for rate lookups.
//! Everything is read from the process environment once at startup.

use anyhow::{anyhow, Context, Result};

// Constants for bot configuration
pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_LOG_MAX_BYTES: u64 = 1024 * 1024; // 1MB per log file
pub const DEFAULT_LOG_BACKUPS: usize = 3;
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_RATE_SELECTOR: &str = "div.BNeawe.iBp4i.AP7Wnd";

/// Log file settings
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Path of the active log file
    pub file_path: String,
    /// Size at which the active file is rotated
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub backups: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: DEFAULT_LOG_FILE.to_string(),
            max_bytes: DEFAULT_LOG_MAX_BYTES,
            backups: DEFAULT_LOG_BACKUPS,
        }
    }
}

/// Search page settings for the rate scraper
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// Search endpoint, the query is appended as the `q` parameter
    pub search_url: String,
    /// CSS selector of the element holding the answer snippet
    pub result_selector: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            result_selector: DEFAULT_RATE_SELECTOR.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot access token
    pub bot_token: String,
    /// Logging configuration
    pub log: LogConfig,
    /// Rate scraper configuration
    pub scraper: ScraperConfig,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// `TELEGRAM_BOT_TOKEN` is required (`API_TOKEN` is accepted as a fallback).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .or_else(|| lookup("API_TOKEN"))
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let defaults = LogConfig::default();
        let log = LogConfig {
            file_path: lookup("LOG_FILE").unwrap_or(defaults.file_path),
            max_bytes: parse_or("LOG_MAX_BYTES", &lookup, defaults.max_bytes)?,
            backups: parse_or("LOG_BACKUPS", &lookup, defaults.backups)?,
        };

        let defaults = ScraperConfig::default();
        let scraper = ScraperConfig {
            search_url: lookup("SEARCH_URL").unwrap_or(defaults.search_url),
            result_selector: lookup("RATE_SELECTOR").unwrap_or(defaults.result_selector),
        };

        Ok(Self {
            bot_token,
            log,
            scraper,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}

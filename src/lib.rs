//! # Exchange Rate Telegram Bot
//!
//! A Telegram bot that walks the user through choosing a currency pair and an
//! amount, then scrapes the conversion snippet from a search results page.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod localization;
pub mod logging;
pub mod lookup_errors;
pub mod rate_lookup;

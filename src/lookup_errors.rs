//! # Lookup Error Types Module
//!
//! This module defines the error types produced by the rate lookup.
//! "No result on the page" is not an error; it is `Ok(None)` from the lookup.

/// Custom error types for rate lookups
#[derive(Debug)]
pub enum LookupError {
    /// The query contains content that is not plain text (emoji, pictographs)
    InvalidQuery(String),
    /// Network, HTTP status, or body read failure
    Transport(reqwest::Error),
    /// The configured result selector could not be parsed
    Selector(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::InvalidQuery(query) => write!(f, "Invalid query: {query:?} is not plain text"),
            LookupError::Transport(err) => write!(f, "Transport error: {err}"),
            LookupError::Selector(msg) => write!(f, "Selector error: {msg}"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err)
    }
}

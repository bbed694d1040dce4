//! # Rate Lookup Module
//!
//! Fetches a search results page for a free-text query and extracts the
//! snippet the search engine shows for currency conversions.
//!
//! The lookup is a trait so the conversation logic can be driven by a fake
//! source in tests; [`SearchRateScraper`] is the production implementation.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::lookup_errors::LookupError;

/// Currency signs accepted in otherwise plain-text queries
pub const CURRENCY_SIGNS: &[char] = &['€', '£', '¥', '₽', '₴', '₸', '₹', '₺', '₩'];

/// Source of exchange rate snippets
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Look up a rate for the query.
    ///
    /// `Ok(None)` means the page had no answer; it is not a fault.
    async fn lookup(&self, query: &str) -> Result<Option<String>, LookupError>;
}

/// Whether a query only contains plain text.
///
/// Letters and digits of any script, whitespace, ASCII punctuation and common
/// currency signs pass. Emoji, pictographs and control characters do not.
pub fn is_plain_text(query: &str) -> bool {
    query.chars().all(|c| {
        c.is_alphanumeric()
            || c.is_whitespace()
            || c.is_ascii_punctuation()
            || CURRENCY_SIGNS.contains(&c)
    })
}

/// Text of the first element matching `selector`, trimmed; `None` when the
/// element is missing or blank.
pub fn extract_rate_snippet(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Scrapes the configured search page with a shared HTTP client
pub struct SearchRateScraper {
    client: reqwest::Client,
    search_url: String,
    selector: Selector,
}

impl SearchRateScraper {
    /// Create a scraper; fails when the configured selector is not valid CSS
    pub fn new(client: reqwest::Client, config: &ScraperConfig) -> Result<Self, LookupError> {
        let selector = Selector::parse(&config.result_selector)
            .map_err(|e| LookupError::Selector(format!("{}: {}", config.result_selector, e)))?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            selector,
        })
    }

    async fn fetch_page(&self, query: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl RateSource for SearchRateScraper {
    async fn lookup(&self, query: &str) -> Result<Option<String>, LookupError> {
        if !is_plain_text(query) {
            debug!(query = %query, "Rejected query that is not plain text");
            return Err(LookupError::InvalidQuery(query.to_string()));
        }

        let html = self.fetch_page(query).await?;
        debug!(query = %query, page_length = html.len(), "Fetched search page");

        let snippet = extract_rate_snippet(&html, &self.selector);
        info!(query = %query, found = snippet.is_some(), "Rate lookup completed");

        Ok(snippet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RATE_SELECTOR;

    fn default_selector() -> Selector {
        Selector::parse(DEFAULT_RATE_SELECTOR).unwrap()
    }

    #[test]
    fn test_plain_text_accepts_latin_and_cyrillic() {
        assert!(is_plain_text("100 USD to RUB"));
        assert!(is_plain_text("доллары в рубли"));
        assert!(is_plain_text("USD/RUB, 1.5"));
        assert!(is_plain_text("100€ to ₽"));
        assert!(is_plain_text("USD\nto RUB"));
    }

    #[test]
    fn test_plain_text_rejects_symbols() {
        assert!(!is_plain_text("USD 💵"));
        assert!(!is_plain_text("🇺🇸 to 🇷🇺"));
        assert!(!is_plain_text("rate ★"));
        assert!(!is_plain_text("usd\u{0007}"));
    }

    #[test]
    fn test_extracts_first_matching_element() {
        let html = r#"
            <html><body>
              <div class="BNeawe s3v9rd AP7Wnd">1 US Dollar equals</div>
              <div class="BNeawe iBp4i AP7Wnd"><div class="BNeawe iBp4i AP7Wnd">92,50 Russian Ruble</div></div>
              <div class="BNeawe iBp4i AP7Wnd">second</div>
            </body></html>
        "#;
        assert_eq!(
            extract_rate_snippet(html, &default_selector()),
            Some("92,50 Russian Ruble".to_string())
        );
    }

    #[test]
    fn test_missing_element_is_none() {
        let html = "<html><body><div class=\"BNeawe\">nothing here</div></body></html>";
        assert_eq!(extract_rate_snippet(html, &default_selector()), None);
        assert_eq!(extract_rate_snippet("", &default_selector()), None);
    }

    #[test]
    fn test_blank_element_is_none() {
        let html = "<div class=\"BNeawe iBp4i AP7Wnd\">   </div>";
        assert_eq!(extract_rate_snippet(html, &default_selector()), None);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = ScraperConfig {
            result_selector: "div[".to_string(),
            ..ScraperConfig::default()
        };
        let err = SearchRateScraper::new(reqwest::Client::new(), &config)
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Selector(_)));
    }

    #[tokio::test]
    async fn test_symbolic_query_fails_before_network() {
        let config = ScraperConfig {
            // Unroutable; the request must never be sent
            search_url: "http://127.0.0.1:9/search".to_string(),
            ..ScraperConfig::default()
        };
        let scraper = SearchRateScraper::new(reqwest::Client::new(), &config).unwrap();
        let err = scraper.lookup("100 💶 to RUB").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidQuery(_)));
    }
}

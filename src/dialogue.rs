//! Conversion dialogue module: per-chat conversation state and the input
//! normalization the amount step relies on.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Button tag that opens free-form currency entry
pub const CUSTOM_TAG: &str = "CUSTOM";

/// Represents the conversation state for currency conversion
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingAmount {
        /// Pair query text, e.g. "USD to RUB"
        pair: String,
    },
    AwaitingCustomCurrency,
}

/// Type alias for our conversion dialogue
pub type ConvertDialogue = Dialogue<ConversationState, InMemStorage<ConversationState>>;

/// Preset currency pairs offered as inline buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrencyPair {
    UsdRub,
    EurRub,
}

impl CurrencyPair {
    pub const ALL: [CurrencyPair; 2] = [CurrencyPair::UsdRub, CurrencyPair::EurRub];

    /// Callback data carried by the button
    pub fn tag(self) -> &'static str {
        match self {
            CurrencyPair::UsdRub => "USD_RUB",
            CurrencyPair::EurRub => "EUR_RUB",
        }
    }

    /// Text appended to the amount when querying the search page
    pub fn query(self) -> &'static str {
        match self {
            CurrencyPair::UsdRub => "USD to RUB",
            CurrencyPair::EurRub => "EUR to RUB",
        }
    }

    /// Localization key of the button label
    pub fn label_key(self) -> &'static str {
        match self {
            CurrencyPair::UsdRub => "button-usd-rub",
            CurrencyPair::EurRub => "button-eur-rub",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pair| pair.tag() == tag)
    }
}

/// Normalizes an amount: spaces and periods are removed, the rest must be
/// ASCII digits.
///
/// "12.5" becomes "125"; this is not float parsing.
pub fn normalize_amount(input: &str) -> Result<String, &'static str> {
    let digits: String = input.chars().filter(|c| *c != ' ' && *c != '.').collect();

    if digits.is_empty() {
        return Err("empty");
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("not_a_number");
    }

    Ok(digits)
}

/// Query sent to the rate lookup for a preset pair
pub fn compose_amount_query(amount: &str, pair: &str) -> String {
    format!("{amount} {pair}")
}

//! UI Builder module for creating keyboards and reply payloads

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::t_lang;

// Import dialogue types
use crate::dialogue::{CurrencyPair, CUSTOM_TAG};

/// One outbound message: text plus an optional inline keyboard
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Create the currency selection keyboard: both presets on the first row,
/// free-form entry on the second
pub fn create_currency_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    let presets = CurrencyPair::ALL
        .iter()
        .map(|pair| InlineKeyboardButton::callback(t_lang(pair.label_key(), language_code), pair.tag()))
        .collect::<Vec<_>>();

    let custom = vec![InlineKeyboardButton::callback(
        t_lang("button-custom", language_code),
        CUSTOM_TAG,
    )];

    InlineKeyboardMarkup::new(vec![presets, custom])
}

//! Command Router module: turns inbound updates into [`BotEvent`]s and hands
//! them to the dialogue manager for the chat's current state

use teloxide::types::User;
use tracing::info;

use crate::dialogue::ConversationState;
use crate::rate_lookup::RateSource;

use super::dialogue_manager::{
    handle_amount_input, handle_button, handle_convert, handle_custom_currency_input,
    handle_idle_text, handle_start, handle_unsupported_input, Transition,
};

/// Inbound event, independent of the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotEvent {
    Start,
    Convert,
    Button(String),
    Text(String),
    /// A message without text (sticker, photo, voice, ...)
    Unsupported,
}

/// The user behind an event
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
    pub language_code: Option<String>,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            language_code: user.language_code.clone(),
        }
    }

    /// Name used when addressing the user
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

/// Classify a text message. `/start` and `/convert` are commands in every
/// state, with or without a `@botname` suffix; arguments after the command
/// (e.g. a deep-link payload) are ignored.
pub fn route_text(text: &str) -> BotEvent {
    let first_token = text.split_whitespace().next().unwrap_or("");
    let command = first_token.split('@').next().unwrap_or(first_token);

    match command {
        "/start" => BotEvent::Start,
        "/convert" => BotEvent::Convert,
        _ => BotEvent::Text(text.to_string()),
    }
}

/// Compute the transition for an event in the given state
pub async fn dispatch_event(
    rates: &dyn RateSource,
    actor: &Actor,
    state: ConversationState,
    event: BotEvent,
) -> Transition {
    info!(
        user_id = actor.id,
        username = ?actor.username,
        event = ?event,
        state = ?state,
        "Received event from user"
    );

    match (state, event) {
        (_, BotEvent::Start) => handle_start(actor),
        (_, BotEvent::Convert) => handle_convert(actor),
        (state, BotEvent::Button(tag)) => handle_button(actor, state, &tag),
        (state, BotEvent::Unsupported) => handle_unsupported_input(actor, state),
        (ConversationState::Idle, BotEvent::Text(_)) => handle_idle_text(actor),
        (ConversationState::AwaitingAmount { pair }, BotEvent::Text(text)) => {
            handle_amount_input(rates, actor, pair, &text).await
        }
        (ConversationState::AwaitingCustomCurrency, BotEvent::Text(text)) => {
            handle_custom_currency_input(rates, actor, &text).await
        }
    }
}

//! Dialogue Manager module for computing conversation state transitions
//!
//! Every handler here returns a [`Transition`]: the reply to send and the
//! state the chat moves to. Nothing in this module talks to Telegram, so the
//! whole flow can be exercised with a fake [`RateSource`].

use tracing::{error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import dialogue types
use crate::dialogue::{
    compose_amount_query, normalize_amount, ConversationState, CurrencyPair, CUSTOM_TAG,
};

// Import lookup types
use crate::lookup_errors::LookupError;
use crate::rate_lookup::RateSource;

// Import router and UI types
use super::command_router::Actor;
use super::ui_builder::{create_currency_keyboard, Reply};

/// Outcome of handling one event
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Reply to deliver; `None` for ignored events
    pub reply: Option<Reply>,
    /// State the chat is in after the reply
    pub next: ConversationState,
}

impl Transition {
    fn to(next: ConversationState, reply: Reply) -> Self {
        Self {
            reply: Some(reply),
            next,
        }
    }

    /// Reply and return the chat to `Idle`
    fn finish(reply: Reply) -> Self {
        Self::to(ConversationState::Idle, reply)
    }

    /// Keep the current state without replying
    fn ignore(state: ConversationState) -> Self {
        Self { reply: None, next: state }
    }
}

/// Handle /start: greet the user
pub fn handle_start(actor: &Actor) -> Transition {
    let greeting = t_args_lang(
        "welcome",
        &[("username", actor.display_name())],
        actor.language_code(),
    );
    Transition::finish(Reply::text(greeting))
}

/// Handle /convert: offer the currency keyboard
pub fn handle_convert(actor: &Actor) -> Transition {
    let language_code = actor.language_code();
    Transition::finish(Reply::with_keyboard(
        t_lang("choose-currency", language_code),
        create_currency_keyboard(language_code),
    ))
}

/// Handle an inline button press
pub fn handle_button(actor: &Actor, state: ConversationState, tag: &str) -> Transition {
    let language_code = actor.language_code();

    if let Some(pair) = CurrencyPair::from_tag(tag) {
        return Transition::to(
            ConversationState::AwaitingAmount {
                pair: pair.query().to_string(),
            },
            Reply::text(t_lang("enter-amount", language_code)),
        );
    }

    if tag == CUSTOM_TAG {
        return Transition::to(
            ConversationState::AwaitingCustomCurrency,
            Reply::text(t_lang("custom-currency-prompt", language_code)),
        );
    }

    warn!(user_id = actor.id, tag = %tag, "Ignoring unknown button tag");
    Transition::ignore(state)
}

/// Handle free text while no input is expected
pub fn handle_idle_text(actor: &Actor) -> Transition {
    Transition::finish(Reply::text(t_lang("idle-hint", actor.language_code())))
}

/// Handle a message that carries no text
pub fn handle_unsupported_input(actor: &Actor, state: ConversationState) -> Transition {
    let language_code = actor.language_code();
    let key = match &state {
        ConversationState::Idle => "idle-hint",
        ConversationState::AwaitingAmount { .. } => "invalid-amount",
        ConversationState::AwaitingCustomCurrency => "invalid-input-format",
    };
    info!(user_id = actor.id, username = ?actor.username, "User sent a message without text");
    Transition::to(state, Reply::text(t_lang(key, language_code)))
}

/// Handle the amount for a preset pair
pub async fn handle_amount_input(
    rates: &dyn RateSource,
    actor: &Actor,
    pair: String,
    text: &str,
) -> Transition {
    let language_code = actor.language_code();
    let retry_state = ConversationState::AwaitingAmount { pair: pair.clone() };

    // The amount is validated before the pair, so a session that lost its pair
    // gets the same reprompt as a bad amount
    let amount = match normalize_amount(text) {
        Ok(amount) if !pair.trim().is_empty() => amount,
        _ => {
            info!(user_id = actor.id, username = ?actor.username, input = %text, "Invalid amount entered");
            return Transition::to(
                retry_state,
                Reply::text(t_lang("invalid-amount", language_code)),
            );
        }
    };

    let query = compose_amount_query(&amount, &pair);
    lookup_and_reply(rates, actor, &query, retry_state).await
}

/// Handle a free-form currency description
pub async fn handle_custom_currency_input(
    rates: &dyn RateSource,
    actor: &Actor,
    text: &str,
) -> Transition {
    let query = text.trim();

    if query.is_empty() {
        return Transition::to(
            ConversationState::AwaitingCustomCurrency,
            Reply::text(t_lang("rate-unavailable", actor.language_code())),
        );
    }

    lookup_and_reply(rates, actor, query, ConversationState::AwaitingCustomCurrency).await
}

/// Run the lookup; on success finish the conversation, otherwise stay in
/// `retry_state` with a reprompt
async fn lookup_and_reply(
    rates: &dyn RateSource,
    actor: &Actor,
    query: &str,
    retry_state: ConversationState,
) -> Transition {
    let language_code = actor.language_code();

    match rates.lookup(query).await {
        Ok(Some(rate)) => {
            info!(
                user_id = actor.id,
                username = ?actor.username,
                query = %query,
                rate = %rate,
                "Exchange rate sent to user"
            );
            Transition::finish(Reply::text(rate))
        }
        Ok(None) => {
            error!(
                user_id = actor.id,
                username = ?actor.username,
                query = %query,
                "Failed to get exchange rate"
            );
            Transition::to(retry_state, Reply::text(t_lang("rate-unavailable", language_code)))
        }
        Err(LookupError::InvalidQuery(_)) => {
            info!(user_id = actor.id, username = ?actor.username, "User used an invalid input format");
            Transition::to(
                retry_state,
                Reply::text(t_lang("invalid-input-format", language_code)),
            )
        }
        Err(e) => {
            error!(
                user_id = actor.id,
                username = ?actor.username,
                query = %query,
                error = %e,
                "Rate lookup failed"
            );
            Transition::to(
                retry_state,
                Reply::text(t_lang("service-unavailable", language_code)),
            )
        }
    }
}

//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import dialogue types
use crate::dialogue::{ConversationState, ConvertDialogue};

// Import lookup types
use crate::rate_lookup::RateSource;

// Import router and delivery helpers
use super::command_router::{dispatch_event, Actor, BotEvent};
use super::message_handler::deliver_transition;

/// Handle callback queries from the currency keyboard
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: ConvertDialogue,
    state: ConversationState,
    rates: Arc<dyn RateSource>,
) -> Result<()> {
    debug!(user_id = %q.from.id, dialogue_state = ?state, "Received callback query from user");

    let actor = Actor::from_user(&q.from);
    let tag = q.data.clone().unwrap_or_default();

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    let transition = dispatch_event(rates.as_ref(), &actor, state, BotEvent::Button(tag)).await;
    deliver_transition(&bot, &dialogue, transition).await
}

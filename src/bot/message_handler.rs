//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import dialogue types
use crate::dialogue::{ConversationState, ConvertDialogue};

// Import lookup types
use crate::rate_lookup::RateSource;

// Import router and dialogue manager
use super::command_router::{dispatch_event, route_text, Actor, BotEvent};
use super::dialogue_manager::Transition;
use super::ui_builder::Reply;

/// Send a reply, with its keyboard if it has one
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

/// Store the next state. Returning to `Idle` drops the session entirely.
pub async fn apply_state(dialogue: &ConvertDialogue, next: ConversationState) -> Result<()> {
    if next == ConversationState::Idle {
        dialogue.exit().await?;
    } else {
        dialogue.update(next).await?;
    }
    Ok(())
}

/// Deliver a transition: reply first, then persist the state
pub async fn deliver_transition(
    bot: &Bot,
    dialogue: &ConvertDialogue,
    transition: Transition,
) -> Result<()> {
    if let Some(reply) = transition.reply {
        send_reply(bot, dialogue.chat_id(), reply).await?;
    }
    apply_state(dialogue, transition.next).await
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: ConvertDialogue,
    state: ConversationState,
    rates: Arc<dyn RateSource>,
) -> Result<()> {
    let actor = msg.from.as_ref().map(Actor::from_user).unwrap_or_default();

    let event = match msg.text() {
        Some(text) => {
            debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");
            route_text(text)
        }
        None => {
            debug!(user_id = %msg.chat.id, "Received message without text from user");
            BotEvent::Unsupported
        }
    };

    let transition = dispatch_event(rates.as_ref(), &actor, state, event).await;
    deliver_transition(&bot, &dialogue, transition).await
}

//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `command_router`: Turns updates into events and routes them by state
//! - `dialogue_manager`: Computes state transitions and replies
//! - `message_handler`: Handles incoming messages and delivers transitions
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and reply payloads

pub mod callback_handler;
pub mod command_router;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::dialogue::ConversationState;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export the transport-independent flow
pub use command_router::{dispatch_event, route_text, Actor, BotEvent};
pub use dialogue_manager::Transition;
pub use ui_builder::{create_currency_keyboard, Reply};

/// Update handler tree: messages and callback queries both enter the chat's
/// dialogue before reaching their endpoint
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<ConversationState>, ConversationState>()
                .endpoint(message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<ConversationState>, ConversationState>()
                .endpoint(callback_handler),
        )
}

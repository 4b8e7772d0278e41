//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles /start, /help and plain chat messages
//! - `inline_handler`: Answers inline queries page by page and records chosen results
//! - `callback_handler`: Handles the "Details" button under posted results
//! - `ui_builder`: Creates inline articles, keyboards and formats detail messages

pub mod callback_handler;
pub mod inline_handler;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use inline_handler::{chosen_inline_result_handler, inline_query_handler};
pub use message_handler::{command_handler, message_handler, wants_inline_hint, Command};

/// The bot's `@username`, used in help texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotHandle(pub String);

impl BotHandle {
    pub fn from_username(username: &str) -> Self {
        Self(format!("@{}", username.trim_start_matches('@')))
    }
}

/// Route every update kind the bot cares about to its handler
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let commands = teloxide::filter_command::<Command, _>().endpoint(command_handler);

    let hint = dptree::filter(|msg: Message| wants_inline_hint(&msg)).endpoint(message_handler);

    let messages = Update::filter_message().branch(commands).branch(hint);

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_inline_query().endpoint(inline_query_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_chosen_inline_result().endpoint(chosen_inline_result_handler))
}

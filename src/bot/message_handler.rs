//! Message Handler module for commands and plain chat messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::localization::LocalizationManager;

use super::BotHandle;

/// Commands understood in private chats
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "explain how to search taxa.")]
    Help,
}

fn user_language(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str())
}

/// Only plain text typed in a private chat gets the inline-mode hint
pub fn wants_inline_hint(msg: &Message) -> bool {
    msg.chat.is_private() && msg.text().is_some() && msg.via_bot.is_none()
}

/// Welcome text sent on /start
pub fn welcome_message(
    handle: &str,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> String {
    let args = [("bot_handle", handle)];
    format!(
        "👋 {}\n\n{}\n\n{}\n\n{}",
        l10n.t_lang("welcome-title", language_code),
        l10n.t_lang("welcome-description", language_code),
        l10n.t_args_lang("welcome-usage", &args, language_code),
        l10n.t_lang("welcome-help", language_code),
    )
}

/// Help text sent on /help
pub fn help_message(
    handle: &str,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> String {
    let args = [("bot_handle", handle)];
    [
        l10n.t_lang("help-title", language_code),
        [
            l10n.t_args_lang("help-step1", &args, language_code),
            l10n.t_lang("help-step2", language_code),
            l10n.t_lang("help-step3", language_code),
        ]
        .join("\n"),
        [
            l10n.t_lang("help-commands", language_code),
            l10n.t_lang("help-start", language_code),
            l10n.t_lang("help-help", language_code),
        ]
        .join("\n"),
    ]
    .join("\n\n")
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    handle: BotHandle,
    l10n: Arc<LocalizationManager>,
) -> Result<()> {
    let language_code = user_language(&msg);
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command");

    let text = match cmd {
        Command::Start => welcome_message(&handle.0, language_code, &l10n),
        Command::Help => help_message(&handle.0, language_code, &l10n),
    };
    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}

/// Private text that is not a command gets a pointer to inline mode.
/// Routed here only when [`wants_inline_hint`] holds.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    handle: BotHandle,
    l10n: Arc<LocalizationManager>,
) -> Result<()> {
    let language_code = user_language(&msg);
    debug!(user_id = %msg.chat.id, "Received non-command message from user");

    bot.send_message(
        msg.chat.id,
        l10n.t_args_lang("text-hint", &[("bot_handle", &handle.0)], language_code),
    )
    .await?;

    Ok(())
}

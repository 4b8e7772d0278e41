//! Callback Handler module for the "Details" button under inline results

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InputFile, ParseMode};
use tracing::{debug, error, warn};

use crate::db::{
    log_interaction, ActionKind, InteractionLogRecord, InteractionLogSink, UserSnapshot,
};
use crate::formatter::TaxonDetail;
use crate::inline_search::{Detail, InlineSearch};
use crate::localization::LocalizationManager;

use super::ui_builder::{
    format_taxon_detail, parse_taxon_callback, MAX_CAPTION_LEN, MAX_MESSAGE_LEN,
};

/// Handle callback queries from the "Details" button
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    search: Arc<InlineSearch>,
    log_sink: Arc<dyn InteractionLogSink>,
    l10n: Arc<LocalizationManager>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");
    let language_code = q.from.language_code.as_deref();

    let Some(taxon_id) = q.data.as_deref().and_then(parse_taxon_callback) else {
        // Not one of ours, just stop the loading indicator
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    log_interaction(
        &log_sink,
        InteractionLogRecord::new(
            ActionKind::Selection,
            UserSnapshot::from(&q.from),
            taxon_id.to_string(),
        ),
    );

    match search.fetch_detail(taxon_id).await {
        Ok(Detail::Found(detail)) => {
            if let Err(e) = show_detail(&bot, &q, &detail, language_code, &l10n).await {
                error!(user_id = %q.from.id, taxon_id, error = %e, "Failed to send taxon detail");
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Ok(Detail::NotFound) => {
            warn!(user_id = %q.from.id, taxon_id, "Selected taxon not found upstream");
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Err(e) => {
            error!(user_id = %q.from.id, taxon_id, error = %e, "Taxon detail lookup failed");
            bot.answer_callback_query(q.id.clone())
                .text(l10n.t_lang("detail-unavailable", language_code))
                .await?;
        }
    }

    Ok(())
}

/// Replace the posted inline message with the detail view, or reply in the chat
/// when the button sits under a regular message
async fn show_detail(
    bot: &Bot,
    q: &CallbackQuery,
    detail: &TaxonDetail,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> Result<()> {
    if let Some(inline_message_id) = &q.inline_message_id {
        let text = format_taxon_detail(detail, language_code, l10n, MAX_MESSAGE_LEN);
        bot.edit_message_text_inline(inline_message_id.clone(), text)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    let Some(msg) = &q.message else {
        warn!(
            user_id = %q.from.id,
            taxon_id = detail.id,
            "Callback query has no message to answer"
        );
        return Ok(());
    };
    let chat_id = msg.chat().id;

    if let Some(photo) = detail
        .photo_url
        .as_deref()
        .and_then(|u| reqwest::Url::parse(u).ok())
    {
        let caption = format_taxon_detail(detail, language_code, l10n, MAX_CAPTION_LEN);
        bot.send_photo(chat_id, InputFile::url(photo))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
    } else {
        let text = format_taxon_detail(detail, language_code, l10n, MAX_MESSAGE_LEN);
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
    }

    Ok(())
}

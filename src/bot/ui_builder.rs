//! UI Builder module for inline results, keyboards and detail messages

use regex::Regex;
use std::sync::LazyLock;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InputMessageContent, InputMessageContentText, ParseMode,
};
use teloxide::utils::html;

use crate::formatter::{TaxonDetail, TaxonSummary};
use crate::localization::LocalizationManager;

/// Prefix of the callback data attached to the "Details" button
pub const CALLBACK_PREFIX: &str = "taxon:";

/// Telegram limit for photo captions
pub const MAX_CAPTION_LEN: usize = 1024;
/// Telegram limit for message text
pub const MAX_MESSAGE_LEN: usize = 4096;
/// Below this many characters a cut summary is not worth showing
const MIN_SUMMARY_LEN: usize = 32;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern should be valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Whitespace pattern should be valid"));

/// Callback data carrying a taxon id
pub fn taxon_callback_data(id: u64) -> String {
    format!("{CALLBACK_PREFIX}{id}")
}

/// Extract the taxon id from callback data produced by [`taxon_callback_data`]
pub fn parse_taxon_callback(data: &str) -> Option<u64> {
    data.strip_prefix(CALLBACK_PREFIX)?.trim().parse().ok()
}

/// Keyboard with the single "Details" button under an inline result
pub fn create_details_keyboard(
    id: u64,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        format!("🔎 {}", l10n.t_lang("details-button", language_code)),
        taxon_callback_data(id),
    )]])
}

/// Short description line under the result title: "Species · Jaguar"
pub fn format_result_description(
    summary: &TaxonSummary,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> String {
    let rank = summary
        .rank
        .clone()
        .unwrap_or_else(|| l10n.t_lang("result-rank-unknown", language_code));

    match &summary.common_name {
        Some(common) => format!("{rank} · {common}"),
        None => rank,
    }
}

/// Message posted to the chat when an inline result is picked
pub fn format_result_message(summary: &TaxonSummary) -> String {
    let mut text = format!("🌿 {}", html::bold(&html::escape(&summary.display_name)));
    if let Some(rank) = &summary.rank {
        text.push_str(&format!(" ({})", html::italic(&html::escape(rank))));
    }
    if let Some(common) = &summary.common_name {
        text.push_str(&format!("\n{}", html::escape(common)));
    }
    text
}

/// Build the inline article for one search result
pub fn build_inline_article(
    summary: &TaxonSummary,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
) -> InlineQueryResult {
    let content = InputMessageContent::Text(
        InputMessageContentText::new(format_result_message(summary)).parse_mode(ParseMode::Html),
    );

    let mut article = InlineQueryResultArticle::new(
        summary.id.to_string(),
        summary.display_name.clone(),
        content,
    )
    .description(format_result_description(summary, language_code, l10n))
    .reply_markup(create_details_keyboard(summary.id, language_code, l10n));

    // Invalid thumbnail URLs are skipped rather than failing the whole answer
    if let Some(url) = summary
        .thumbnail_url
        .as_deref()
        .and_then(|u| reqwest::Url::parse(u).ok())
    {
        article = article.thumbnail_url(url);
    }

    InlineQueryResult::Article(article)
}

/// Turn upstream HTML into plain text: drop tags, decode basic entities
pub fn html_to_plain_text(source: &str) -> String {
    let without_tags = HTML_TAG.replace_all(source, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    let collapsed = WHITESPACE_RUN.replace_all(&decoded, " ");

    // Tags replaced by a space can leave gaps before punctuation
    collapsed
        .trim()
        .replace(" .", ".")
        .replace(" ,", ",")
        .replace("( ", "(")
        .replace(" )", ")")
}

/// Cut `text` to at most `max_chars` characters, ending with an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// HTML detail message for a selected taxon.
///
/// The summary is the only unbounded part, so it is the part that gets cut
/// to keep the message under `max_len` characters.
pub fn format_taxon_detail(
    detail: &TaxonDetail,
    language_code: Option<&str>,
    l10n: &LocalizationManager,
    max_len: usize,
) -> String {
    let mut header = format!("🌿 {}", html::bold(&html::escape(&detail.display_name)));
    if let Some(rank) = &detail.rank {
        header.push_str(&format!(" ({})", html::italic(&html::escape(rank))));
    }
    if let Some(common) = &detail.common_name {
        header.push('\n');
        header.push_str(&html::escape(&l10n.t_args_lang(
            "detail-common-name",
            &[("name", common)],
            language_code,
        )));
    }

    let mut links = Vec::new();
    if let Some(url) = &detail.reference_url {
        links.push(html::link(url, &html::escape(&l10n.t_lang("detail-read-more", language_code))));
    }
    if let Some(url) = &detail.photo_url {
        links.push(html::link(url, &html::escape(&l10n.t_lang("detail-photo", language_code))));
    }
    let footer = links.join(" · ");

    let mut text = header;
    if let Some(summary) = &detail.summary_text {
        let plain = html_to_plain_text(summary);
        // Escaping can only grow the text, so reserve room for the fixed parts first
        let reserved = text.chars().count() + footer.chars().count() + 4;
        let budget = max_len.saturating_sub(reserved);
        if !plain.is_empty() && budget > MIN_SUMMARY_LEN {
            let mut cut = truncate_chars(&plain, budget);
            let mut escaped = html::escape(&cut);
            while escaped.chars().count() > budget && !cut.is_empty() {
                let shorter = cut.chars().count().saturating_sub(16);
                cut = truncate_chars(&plain, shorter);
                escaped = html::escape(&cut);
            }
            text.push_str("\n\n");
            text.push_str(&escaped);
        }
    }

    if !footer.is_empty() {
        text.push_str("\n\n");
        text.push_str(&footer);
    }

    text
}

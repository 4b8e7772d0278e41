//! Inline Handler module for inline queries and chosen inline results

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChosenInlineResult, InlineQuery, InlineQueryResult};
use tracing::{debug, error, info};

use crate::db::{
    log_interaction, ActionKind, InteractionLogRecord, InteractionLogSink, UserSnapshot,
};
use crate::inline_search::{InlineSearch, Page};
use crate::localization::LocalizationManager;

use super::ui_builder::build_inline_article;

/// Seconds Telegram may cache an inline answer
pub const INLINE_CACHE_TIME_SECS: u32 = 300;

/// Page index encoded in Telegram's inline `offset`. Empty or garbage means the first page.
pub fn parse_offset(offset: &str) -> u32 {
    offset.trim().parse().unwrap_or(0)
}

/// `next_offset` to send back: the following page, or empty to stop paginating
pub fn next_offset(page_index: u32, page: &Page) -> String {
    match page {
        Page::Results(_) => page_index.saturating_add(1).to_string(),
        Page::EndOfResults => String::new(),
    }
}

/// Handle an inline query: one page of taxa per call, the page index comes from the offset
pub async fn inline_query_handler(
    bot: Bot,
    q: InlineQuery,
    search: Arc<InlineSearch>,
    log_sink: Arc<dyn InteractionLogSink>,
    l10n: Arc<LocalizationManager>,
) -> Result<()> {
    let page_index = parse_offset(&q.offset);
    let language_code = q.from.language_code.as_deref();
    debug!(user_id = %q.from.id, query = %q.query, page_index, "Received inline query");

    if page_index == 0 && !q.query.trim().is_empty() {
        log_interaction(
            &log_sink,
            InteractionLogRecord::new(
                ActionKind::Search,
                UserSnapshot::from(&q.from),
                q.query.trim(),
            ),
        );
    }

    let page = match search.fetch_page(&q.query, page_index).await {
        Ok(page) => page,
        Err(e) => {
            // Hide the outage from the chat: answer with nothing and stop paginating
            error!(
                user_id = %q.from.id,
                query = %q.query,
                page_index,
                error = %e,
                "Inline search failed"
            );
            bot.answer_inline_query(q.id.clone(), Vec::<InlineQueryResult>::new())
                .next_offset(String::new())
                .cache_time(0)
                .is_personal(true)
                .await?;
            return Ok(());
        }
    };

    let offset = next_offset(page_index, &page);
    let results: Vec<InlineQueryResult> = page
        .into_results()
        .iter()
        .map(|summary| build_inline_article(summary, language_code, &l10n))
        .collect();

    info!(
        user_id = %q.from.id,
        page_index,
        results_count = results.len(),
        "Answering inline query"
    );

    bot.answer_inline_query(q.id.clone(), results)
        .next_offset(offset)
        .cache_time(INLINE_CACHE_TIME_SECS)
        .is_personal(true)
        .await?;

    Ok(())
}

/// Chosen inline results are only recorded in the logs; the "Details" button drives lookups
pub async fn chosen_inline_result_handler(r: ChosenInlineResult) -> Result<()> {
    info!(
        user_id = %r.from.id,
        result_id = ?r.result_id,
        query = %r.query,
        has_inline_message = r.inline_message_id.is_some(),
        "User picked an inline result"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::TaxonSummary;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(""), 0);
        assert_eq!(parse_offset("3"), 3);
        assert_eq!(parse_offset(" 7 "), 7);
        assert_eq!(parse_offset("-1"), 0);
        assert_eq!(parse_offset("next"), 0);
    }

    #[test]
    fn test_next_offset() {
        let page = Page::Results(vec![TaxonSummary {
            id: 1,
            display_name: "Panthera Leo".to_string(),
            rank: None,
            common_name: None,
            thumbnail_url: None,
        }]);
        assert_eq!(next_offset(0, &page), "1");
        assert_eq!(next_offset(4, &page), "5");
        assert_eq!(next_offset(4, &Page::EndOfResults), "");
    }
}

use inaturalist_bot::bot::inline_handler::{next_offset, parse_offset};
use inaturalist_bot::bot::ui_builder::{
    build_inline_article, create_details_keyboard, format_taxon_detail, parse_taxon_callback,
    MAX_MESSAGE_LEN,
};
use inaturalist_bot::formatter::{TaxonDetail, TaxonSummary};
use inaturalist_bot::inline_search::Page;
use inaturalist_bot::localization::LocalizationManager;
use teloxide::types::{InlineKeyboardButtonKind, InlineQueryResult};

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    fn onca_summary() -> TaxonSummary {
        TaxonSummary {
            id: 41970,
            display_name: "Panthera Onca".to_string(),
            rank: Some("Species".to_string()),
            common_name: Some("Jaguar".to_string()),
            thumbnail_url: Some("https://static.example/onca.jpg".to_string()),
        }
    }

    /// Test that an inline article carries title, description, thumbnail and details button
    #[test]
    fn test_inline_article_fields() {
        let l10n = setup_localization();
        let result = build_inline_article(&onca_summary(), Some("en"), &l10n);

        let InlineQueryResult::Article(article) = result else {
            panic!("expected an article result");
        };
        assert_eq!(article.title, "Panthera Onca");
        assert_eq!(article.description.as_deref(), Some("Species · Jaguar"));
        assert_eq!(
            article.thumbnail_url.map(|u| u.to_string()),
            Some("https://static.example/onca.jpg".to_string())
        );

        let markup = article.reply_markup.expect("details keyboard");
        let button = &markup.inline_keyboard[0][0];
        assert!(button.text.ends_with("Details"));
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(parse_taxon_callback(data), Some(41970));
            }
            other => panic!("unexpected button kind: {other:?}"),
        }
    }

    /// Test that a missing or invalid thumbnail is left out instead of synthesized
    #[test]
    fn test_inline_article_without_thumbnail() {
        let l10n = setup_localization();

        let mut summary = onca_summary();
        summary.thumbnail_url = None;
        let InlineQueryResult::Article(article) = build_inline_article(&summary, None, &l10n) else {
            panic!("expected an article result");
        };
        assert!(article.thumbnail_url.is_none());

        summary.thumbnail_url = Some("not a url".to_string());
        let InlineQueryResult::Article(article) = build_inline_article(&summary, None, &l10n) else {
            panic!("expected an article result");
        };
        assert!(article.thumbnail_url.is_none());
    }

    /// Test the details button label follows the user's language
    #[test]
    fn test_details_keyboard_localized() {
        let l10n = setup_localization();
        let markup = create_details_keyboard(7, Some("fr-FR"), &l10n);
        assert!(markup.inline_keyboard[0][0].text.ends_with("Détails"));
    }

    /// Test offsets drive pagination: the next page while results exist, empty once exhausted
    #[test]
    fn test_offset_pagination_cycle() {
        let mut page_index = parse_offset("");
        assert_eq!(page_index, 0);

        let page = Page::Results(vec![onca_summary()]);
        let offset = next_offset(page_index, &page);
        page_index = parse_offset(&offset);
        assert_eq!(page_index, 1);

        assert_eq!(next_offset(page_index, &Page::EndOfResults), "");
    }

    /// Test the French detail view
    #[test]
    fn test_detail_message_french() {
        let l10n = setup_localization();
        let detail = TaxonDetail {
            id: 41970,
            display_name: "Panthera Onca".to_string(),
            rank: Some("Species".to_string()),
            common_name: Some("Jaguar".to_string()),
            summary_text: Some("<p>Le jaguar est un félin.</p>".to_string()),
            photo_url: None,
            reference_url: Some("https://fr.wikipedia.org/wiki/Jaguar".to_string()),
        };

        let text = format_taxon_detail(&detail, Some("fr"), &l10n, MAX_MESSAGE_LEN);
        assert!(text.contains("Nom commun : Jaguar"));
        assert!(text.contains("Le jaguar est un félin."));
        assert!(text.contains(">En savoir plus</a>"));
        assert!(!text.contains("<p>"));
    }
}

//! # iNaturalist Telegram Bot
//!
//! An inline-mode Telegram bot that searches the iNaturalist taxonomy page by
//! page and shows a taxon's photo and summary when a result is selected.
//! User actions can be logged to a Postgres interaction log.

pub mod bot;
pub mod config;
pub mod db;
pub mod formatter;
pub mod inline_search;
pub mod localization;
pub mod taxonomy_client;
pub mod taxonomy_errors;

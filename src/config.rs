//! # Bot Configuration Module
//!
//! Runtime settings read from the environment (optionally through a `.env`
//! file), with defaults for everything except the bot token.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

// Constants for bot configuration
pub const DEFAULT_API_URL: &str = "https://api.inaturalist.org/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MIN_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 15;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Where the bot receives its updates from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateSource {
    /// getUpdates long polling
    Polling,
    /// Telegram pushes updates to `url`, we listen on `0.0.0.0:port`
    Webhook { url: String, port: u16 },
}

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings for the taxonomy API client
#[derive(Debug, Clone)]
pub struct TaxonomyConfig {
    /// Base URL of the taxa API, without trailing slash
    pub api_url: String,
    /// Number of results requested per upstream call
    pub page_size: u32,
    /// Timeout applied to every upstream request
    pub timeout: Duration,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Configuration structure for the whole bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Postgres URL for the interaction log; `None` disables logging to a store
    pub database_url: Option<String>,
    pub taxonomy: TaxonomyConfig,
    pub update_source: UpdateSource,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = non_empty("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let page_size = match non_empty("SEARCH_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("SEARCH_PAGE_SIZE is not a number: {raw}"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let api_url = non_empty("INATURALIST_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let update_source = match (non_empty("WEBHOOK_URL"), non_empty("PORT")) {
            (Some(url), Some(port)) => UpdateSource::Webhook {
                url,
                port: port
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port: {port}"))?,
            },
            _ => UpdateSource::Polling,
        };

        let log_format = match non_empty("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            bot_token,
            database_url: non_empty("DATABASE_URL"),
            taxonomy: TaxonomyConfig {
                api_url,
                page_size: clamp_page_size(page_size),
                timeout: Duration::from_secs(timeout_secs.max(1)),
            },
            update_source,
            log_format,
        })
    }
}

/// Keep the page size inside the range the inline result list is tuned for
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_token() {
        let config =
            BotConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.database_url, None);
        assert_eq!(config.taxonomy.api_url, DEFAULT_API_URL);
        assert_eq!(config.taxonomy.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.taxonomy.timeout, Duration::from_secs(10));
        assert_eq!(config.update_source, UpdateSource::Polling);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(BotConfig::from_lookup(lookup_from(&[])).is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(clamp_page_size(1), MIN_PAGE_SIZE);
        assert_eq!(clamp_page_size(12), 12);
        assert_eq!(clamp_page_size(50), MAX_PAGE_SIZE);

        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("SEARCH_PAGE_SIZE", "100"),
        ]))
        .unwrap();
        assert_eq!(config.taxonomy.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_webhook_requires_url_and_port() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_URL", "https://bot.example.org/hook"),
        ]))
        .unwrap();
        assert_eq!(config.update_source, UpdateSource::Polling);

        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_URL", "https://bot.example.org/hook"),
            ("PORT", "8443"),
        ]))
        .unwrap();
        assert_eq!(
            config.update_source,
            UpdateSource::Webhook {
                url: "https://bot.example.org/hook".to_string(),
                port: 8443
            }
        );
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("INATURALIST_API_URL", "http://localhost:4000/v1/"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.taxonomy.api_url, "http://localhost:4000/v1");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("SEARCH_PAGE_SIZE", "ten"),
        ]))
        .is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_URL", "https://x"),
            ("PORT", "99999"),
        ]))
        .is_err());
    }
}

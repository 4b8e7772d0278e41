use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inaturalist_bot::bot::{self, BotHandle};
use inaturalist_bot::config::{BotConfig, LogFormat, UpdateSource};
use inaturalist_bot::db::{InteractionLogSink, NoopInteractionLog, PgInteractionLog};
use inaturalist_bot::inline_search::InlineSearch;
use inaturalist_bot::localization::LocalizationManager;
use inaturalist_bot::taxonomy_client::INaturalistClient;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting iNaturalist Telegram Bot");

    let client = INaturalistClient::new(&config.taxonomy)?;
    let search = Arc::new(InlineSearch::new(Arc::new(client), config.taxonomy.page_size));
    info!(
        api_url = %config.taxonomy.api_url,
        page_size = search.page_size(),
        "Taxonomy client initialized"
    );

    let log_sink: Arc<dyn InteractionLogSink> = match &config.database_url {
        Some(database_url) => {
            info!("Interaction log enabled");
            Arc::new(PgInteractionLog::connect(database_url).await?)
        }
        None => {
            warn!("DATABASE_URL not set, interactions will not be stored");
            Arc::new(NoopInteractionLog)
        }
    };

    let l10n = Arc::new(LocalizationManager::new().context("Failed to load translations")?);

    let bot = Bot::new(config.bot_token.clone());
    let me = bot.get_me().await.context("Failed to fetch bot identity")?;
    let handle = BotHandle::from_username(me.username());
    info!(bot = %handle.0, "Bot initialized, starting dispatcher");

    let mut dispatcher = Dispatcher::builder(bot.clone(), bot::schema())
        .dependencies(dptree::deps![search, log_sink, l10n, handle])
        .enable_ctrlc_handler()
        .build();

    match config.update_source {
        UpdateSource::Polling => {
            info!("Receiving updates with long polling");
            dispatcher.dispatch().await;
        }
        UpdateSource::Webhook { url, port } => {
            let address = SocketAddr::from(([0, 0, 0, 0], port));
            let url: reqwest::Url = url
                .parse()
                .with_context(|| format!("WEBHOOK_URL is not a valid URL: {url}"))?;
            info!(%address, "Receiving updates through webhook");

            let listener = webhooks::axum(bot, webhooks::Options::new(address, url))
                .await
                .context("Failed to set up webhook listener")?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
    }

    Ok(())
}

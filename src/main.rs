use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::info;

use exchange_bot::bot;
use exchange_bot::config::BotConfig;
use exchange_bot::dialogue::ConversationState;
use exchange_bot::localization::init_localization;
use exchange_bot::logging::init_tracing;
use exchange_bot::rate_lookup::{RateSource, SearchRateScraper};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.log)?;
    init_localization()?;

    info!("Starting exchange rate bot");

    // One HTTP client for the lifetime of the process
    let client = reqwest::Client::new();
    let rates: Arc<dyn RateSource> = Arc::new(SearchRateScraper::new(client, &config.scraper)?);
    info!(search_url = %config.scraper.search_url, "Rate scraper initialized");

    let bot = Bot::new(config.bot_token);

    // Updates queued while the bot was offline are skipped
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    info!("Bot initialized, starting dispatcher");

    // Default distribution key is the chat id: updates from one chat run sequentially.
    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![InMemStorage::<ConversationState>::new(), rates])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    info!("Stopping exchange rate bot");

    Ok(())
}

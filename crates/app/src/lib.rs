//! Recap application composition root
//!
//! Composes the conversation store, digest engine, and webhook routes
//! into a single application.

use axum::Router;
use recap_common::config::Config;
use recap_conversations::{
    ConversationStore, MemoryConversationStore, PgConversationStore, RetryingStore,
};
use recap_digests::{DigestEngine, LlmSummarizer};
use recap_llm::{LlmConfig, LlmServiceFactory};
use recap_messaging::{MessagingConfig, MessagingServiceFactory};
use recap_webhooks::api::WebhooksState;
use recap_webhooks::Dispatcher;
use sqlx::PgPool;
use std::sync::Arc;

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: Option<PgPool>) -> Result<Router, anyhow::Error> {
    // Conversation store, wrapped in the bounded-retry decorator
    let store: Arc<dyn ConversationStore> = match config.store_provider.as_str() {
        "postgres" => {
            let pool = pool
                .ok_or_else(|| anyhow::anyhow!("postgres store requires a database pool"))?;
            Arc::new(RetryingStore::new(PgConversationStore::new(pool)))
        }
        "memory" => Arc::new(RetryingStore::new(MemoryConversationStore::new())),
        other => anyhow::bail!("Unknown store provider: {}", other),
    };

    // LLM-backed summarizer from environment
    let llm_config = LlmConfig::from_env()?;
    let llm_service = LlmServiceFactory::create(llm_config)?;
    let summarizer = Arc::new(LlmSummarizer::new(Arc::from(llm_service)));

    // Outbound messenger from environment
    let messaging_config = MessagingConfig::from_env()?;
    let messenger: Arc<dyn recap_messaging::MessengerService> =
        Arc::from(MessagingServiceFactory::create(messaging_config)?);

    let engine = Arc::new(DigestEngine::new(
        store.clone(),
        summarizer,
        messenger.clone(),
    ));
    let dispatcher = Arc::new(Dispatcher::new(store, engine, messenger));

    let webhooks_state = WebhooksState {
        dispatcher,
        channel_secret: config.channel_secret.clone(),
    };

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route(
            "/",
            axum::routing::get(|| async { "Recap API v0.0.1-SNAPSHOT" }),
        )
        .merge(recap_webhooks::api::routes().with_state(webhooks_state));

    Ok(app)
}

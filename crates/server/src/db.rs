use axum::extract::FromRef;
use shared_types::{AppConfig, AppError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::config::env_var;
use crate::error_convert::SqlxErrorExt;
use crate::identity::IdentityProvider;
use crate::intake::IntakeController;
use crate::notify::{DiscordWebhook, NoopSink, NotificationSink};
use crate::store::{CaseStore, MemoryStore, PgStore};
use crate::summarize::SummarizationClient;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract individual parts directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<dyn CaseStore>,
    pub identity: IdentityProvider,
    pub intake: Arc<IntakeController>,
    pub summarizer: Option<Arc<SummarizationClient>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CaseStore>,
        identity: IdentityProvider,
        notifier: Arc<dyn NotificationSink>,
        summarizer: Option<SummarizationClient>,
    ) -> Self {
        let intake = Arc::new(IntakeController::new(store.clone(), notifier));
        Self {
            store,
            identity,
            intake,
            summarizer: summarizer.map(Arc::new),
        }
    }
}

/// Create a database connection pool from environment variables.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool(database_url: &str) -> Result<Pool<Postgres>, AppError> {
    let max_connections: u32 = env_var("DATABASE_MAX_CONNECTIONS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(database_url)
        .map_err(SqlxErrorExt::into_app_error)
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Pick the store backend. PostgreSQL when the `postgres` flag is on and
/// `DATABASE_URL` is set, otherwise the in-process store.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn CaseStore>, AppError> {
    if config.features.postgres {
        match env_var("DATABASE_URL") {
            Some(url) => {
                let pool = create_pool(&url)?;
                run_migrations(&pool).await?;
                tracing::info!("Using PostgreSQL case store");
                return Ok(Arc::new(PgStore::new(pool)));
            }
            None => tracing::warn!("postgres feature on but DATABASE_URL not set"),
        }
    }
    tracing::info!("Using in-memory case store");
    Ok(Arc::new(MemoryStore::new()))
}

fn build_notifier(config: &AppConfig) -> Arc<dyn NotificationSink> {
    if config.features.webhook {
        if let Some(url) = env_var("DISCORD_WEBHOOK_URL") {
            tracing::info!("Webhook notifications enabled");
            return Arc::new(DiscordWebhook::new(url, config.webhook.clone()));
        }
        tracing::warn!("webhook feature on but DISCORD_WEBHOOK_URL not set");
    }
    Arc::new(NoopSink)
}

fn build_summarizer(config: &AppConfig) -> Option<SummarizationClient> {
    if !config.features.summarizer {
        return None;
    }
    match env_var("GEMINI_API_KEY") {
        Some(key) => Some(SummarizationClient::new(&config.summarizer, key)),
        None => {
            tracing::warn!("summarizer feature on but GEMINI_API_KEY not set");
            None
        }
    }
}

/// Wire every collaborator from config and environment.
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let store = build_store(config).await?;
    let identity = IdentityProvider::from_env(config.app.session_ttl_hours);
    Ok(AppState::new(
        store,
        identity,
        build_notifier(config),
        build_summarizer(config),
    ))
}

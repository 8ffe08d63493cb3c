//! Serves the taskchat HTTP API.
//!
//! Usage:
//!
//! ```text
//! TASKCHAT__AUTH__JWT_SECRET=... GEMINI_API_KEY=... taskchat-server
//! ```
//!
//! Further settings are read from `taskchat.toml` (or the file named by
//! `TASKCHAT_CONFIG`) and `TASKCHAT__*` environment variables. Without
//! `storage.database_url` conversations are kept in memory only.
//!
//! The server does not create its tables. Before pointing it at a fresh
//! `PostgreSQL` database, apply the SQL under `migrations/`:
//!
//! ```text
//! DATABASE_URL=postgres://... diesel migration run
//! ```

use std::sync::Arc;

use mockable::DefaultClock;
use taskchat::{
    auth::{JwtTokenVerifier, TokenVerifier},
    config::{AppConfig, SettingsError, StorageSettings},
    conversation::{
        adapters::{
            gemini::GeminiAgentClient,
            memory::{InMemoryConversationStore, InMemoryMessageStore},
            postgres::{PostgresConversationStore, PostgresMessageStore, build_pool},
        },
        error::StoreError,
        ports::{AgentClient, AgentError, ConversationStore, MessageStore},
        services::ChatOrchestrator,
    },
    http::{ApiState, router},
    telemetry::init_tracing,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Errors that abort server start-up.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Stores = (Arc<dyn ConversationStore>, Arc<dyn MessageStore>);

fn build_stores(settings: &StorageSettings) -> Result<Stores, StoreError> {
    if let Some(url) = settings.database_url.as_deref() {
        let pool = build_pool(url, settings.pool_size)?;
        info!(pool_size = settings.pool_size, "using PostgreSQL stores");
        return Ok((
            Arc::new(PostgresConversationStore::new(pool.clone())),
            Arc::new(PostgresMessageStore::new(pool)),
        ));
    }

    warn!("storage.database_url is unset; conversations will not survive a restart");
    Ok((
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(InMemoryMessageStore::new()),
    ))
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires.
///
/// If the listener cannot be installed this never resolves, and the server
/// runs until it is killed.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let settings = AppConfig::load()?;
    init_tracing(&settings.logging.filter)?;

    let (conversations, messages) = build_stores(&settings.storage)?;
    let gemini = GeminiAgentClient::new(settings.agent.to_gemini_settings())?;
    if !gemini.has_api_key() {
        warn!("no Gemini API key configured; chat turns will fail with a configuration error");
    }
    let agent: Arc<dyn AgentClient> = Arc::new(gemini);
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(JwtTokenVerifier::new(&settings.auth.jwt_secret));

    let orchestrator = ChatOrchestrator::new(conversations, messages, agent, Arc::new(DefaultClock));
    let app = router(ApiState::new(orchestrator, verifier));

    let listener = TcpListener::bind(settings.server.bind_addr).await?;
    info!(addr = %settings.server.bind_addr, "taskchat server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

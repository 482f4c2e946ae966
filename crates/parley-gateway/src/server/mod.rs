//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::connection::ConnectionManager;
use axum::{routing::get, Router};
use parley_cache::{RedisNotificationQueue, RedisPool, RedisPoolConfig, RedisPresenceStore};
use parley_common::{AppConfig, AppError};
use parley_service::ServiceContextBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    // Create database pool
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = parley_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = parley_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    // Create Redis pool
    tracing::info!("Connecting to Redis...");
    let redis_config = RedisPoolConfig::from(&config.redis);
    let redis_pool = RedisPool::new(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    tracing::info!("Redis connection established");

    // Create Snowflake generator
    let snowflake_generator = Arc::new(parley_core::SnowflakeGenerator::new(
        config.snowflake.worker_id,
    ));

    // Create repositories
    let user_repo = Arc::new(parley_db::PgUserRepository::new(pool.clone()));
    let conversation_repo = Arc::new(parley_db::PgConversationRepository::new(pool.clone()));
    let participant_repo = Arc::new(parley_db::PgParticipantRepository::new(pool.clone()));
    let message_repo = Arc::new(parley_db::PgMessageRepository::new(pool.clone()));
    let reaction_repo = Arc::new(parley_db::PgReactionRepository::new(pool.clone()));

    // Create the presence store and the notification job producer
    let presence_store = Arc::new(RedisPresenceStore::new((*shared_redis).clone()));
    let notification_queue = Arc::new(RedisNotificationQueue::new((*shared_redis).clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .redis_pool(shared_redis)
        .user_repo(user_repo)
        .conversation_repo(conversation_repo)
        .participant_repo(participant_repo)
        .message_repo(message_repo)
        .reaction_repo(reaction_repo)
        .presence_store(presence_store)
        .notification_queue(notification_queue)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Create connection manager
    let connection_manager = ConnectionManager::new_shared();

    Ok(GatewayState::new(
        service_context,
        connection_manager,
        config,
    ))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));

    // Create gateway state
    let state = create_gateway_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}

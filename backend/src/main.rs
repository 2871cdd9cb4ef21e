//! SimpleCRM entry-point: loads settings, wires the user store, the event
//! channel and its consumer, then serves the REST API until shutdown.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use simplecrm::domain::ports::UserStore;
use simplecrm::domain::{UserCreationService, WelcomeNotificationHandler};
use simplecrm::inbound::http::health::HealthState;
use simplecrm::inbound::http::state::HttpState;
use simplecrm::outbound::events::{UserCreatedEventChannel, spawn_user_created_consumer};
use simplecrm::outbound::memory::InMemoryUserStore;
use simplecrm::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
use simplecrm::settings::AppSettings;

async fn build_store(settings: &AppSettings) -> std::io::Result<Arc<dyn UserStore>> {
    let Some(url) = settings.database_url() else {
        warn!("no database configured; users are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryUserStore::new()));
    };
    let config = PoolConfig::new(url).with_max_size(settings.db_max_connections);
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
    info!(
        max_connections = settings.db_max_connections,
        "connected to postgres"
    );
    Ok(Arc::new(DieselUserStore::new(pool)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let store = build_store(&settings).await?;
    let channel = Arc::new(UserCreatedEventChannel::new(
        settings.event_channel_capacity,
        settings.publish_timeout(),
    ));
    let service = UserCreationService::new(store, Arc::clone(&channel));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer = spawn_user_created_consumer(
        Arc::clone(&channel),
        Arc::new(WelcomeNotificationHandler),
        shutdown_rx,
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(
            settings.bind_addr(),
            HttpState::from_service(Arc::new(service)),
        ),
    )?;
    health_state.mark_ready();

    let served = server.await;

    health_state.mark_unhealthy();
    if shutdown_tx.send(true).is_err() {
        warn!("event consumer already stopped");
    }
    if let Err(error) = consumer.await {
        warn!(%error, "event consumer task failed");
    }
    info!("shutdown complete");
    served
}

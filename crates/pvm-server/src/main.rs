//! # Plugin Version Manager server
//!
//! Product release metadata for the storefront: the admin version panel,
//! the public latest-version API, the customer "My Products" page and the
//! release archive download relay.

mod api;
mod services;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pvm_common::plugin::{self, PluginInfo};
use services::file_host::{FileHost, HttpFileHost};
use services::pg_store::PgStore;
use services::store::{ProductMetaStore, Storefront};

/// Shared application state available to all handlers.
pub struct AppState {
    pub meta: Arc<dyn ProductMetaStore>,
    pub shop: Arc<dyn Storefront>,
    pub files: Arc<dyn FileHost>,
    pub config: pvm_common::AppConfig,
}

/// Full HTTP application for `state`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = pvm_common::AppConfig::load().context("Failed to load configuration")?;

    plugin::init(PluginInfo::new(config.plugin.asset_base_url.as_str()));
    let version = plugin::info().version;
    tracing::info!(version, "Starting plugin version manager...");

    // Connect to PostgreSQL
    let db = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    // Run migrations
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new("./migrations")).await?;
    migrator.run(&db).await?;
    tracing::info!("Database migrations applied");

    services::options::record_activation(&db, version).await?;

    let store = Arc::new(PgStore::new(db.clone()));
    let state = Arc::new(AppState {
        meta: store.clone(),
        shop: store,
        files: Arc::new(HttpFileHost::new()?),
        config: config.clone(),
    });

    let app = app(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host '{}'", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services::options::record_deactivation(&db).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

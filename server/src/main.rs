use actix_web::{middleware as actix_middleware, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use tracker_sessions::config::{ServerConfig, StoreBackend, DEFAULT_CONFIG_PATH};
use tracker_sessions::db::{InMemorySessionStore, MongoSessionStore, SessionStore};
use tracker_sessions::handlers;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting tracker sessions server...");

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from '{}'", config_path))?;
    log::debug!("Loaded configuration: {:?}", config);
    log::info!("Session store backend: {}", config.store.backend.as_str());

    // One store client for the whole process; the MongoDB driver pools
    // connections behind it.
    let store: Arc<dyn SessionStore> = match config.store.backend {
        StoreBackend::Mongo => Arc::new(
            MongoSessionStore::connect(&config.store)
                .await
                .context("Failed to set up MongoDB client")?,
        ),
        StoreBackend::Memory => {
            log::warn!("Using in-memory session store; sessions are lost on restart");
            Arc::new(InMemorySessionStore::new())
        }
    };

    if let Err(err) = store.ping().await {
        log::warn!("Session store is not reachable yet: {}", err);
    }

    let max_body_bytes = config.http.max_body_bytes;
    let server_host = config.http.host.clone();
    let server_port = config.http.port;

    log::info!("Starting HTTP server at {}:{}...", server_host, server_port);

    HttpServer::new(move || {
        let store = store.clone();
        App::new()
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            .configure(|cfg| handlers::configure(cfg, store, max_body_bytes))
    })
    .bind((server_host, server_port))?
    .run()
    .await?;

    Ok(())
}

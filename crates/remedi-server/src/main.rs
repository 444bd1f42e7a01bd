//! remedi-server
//!
//! HTTP entry point for the Remedi online pharmacy backend: drug catalog,
//! per-user shopping carts, purchase history, and user accounts, backed by
//! MongoDB and external identity/push providers.

mod cart;
mod config;
mod drugs;
mod error;
mod middleware;
mod routes;
mod state;
mod users;

use clap::Parser;
use config::Config;
use remedi_auth::AuthClient;
use remedi_db::Mongo;
use remedi_push::{HttpPushSender, PushSender};
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remedi_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let mongo = Mongo::connect(&config.mongodb_uri, &config.mongodb_db).await?;
    mongo.ensure_indexes().await?;

    let auth = AuthClient::new(&config.identity_base_url, &config.identity_api_key);
    let push: Arc<dyn PushSender> = Arc::new(HttpPushSender::new(
        &config.push_endpoint,
        &config.push_server_key,
    ));
    let state = AppState::new(&mongo, auth, push);

    let app = routes::router(state, config.debug_routes);

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}

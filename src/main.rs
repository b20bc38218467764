use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actors;
mod api;
mod config;
mod domain;
mod metrics;
mod store;

use actors::{BroadcasterHandle, NotificationBroadcaster};
use config::AppConfig;
use domain::identity::IdentityResolver;
use domain::order::OrderIntake;
use store::Storage;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,print_order_intake=debug")),
        )
        .init();

    tracing::info!("🚀 Starting print order intake service");

    let config = AppConfig::from_env()?;

    // === 1. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 2. Storage (ScyllaDB or in-memory) ===
    let storage = Storage::connect(&config).await?;

    // === 3. Live notification fan-out ===
    let broadcaster_addr = NotificationBroadcaster::new(
        config.subscriber_buffer,
        config.broadcast_mailbox,
        metrics.clone(),
    )
    .spawn();
    let broadcaster = BroadcasterHandle::new(broadcaster_addr, metrics.clone());

    // === 4. Intake pipeline, collaborators injected ===
    let intake = web::Data::new(OrderIntake::new(
        IdentityResolver::new(storage.identities),
        storage.orders,
        Arc::new(broadcaster.clone()),
        metrics.clone(),
    ));

    // === 5. HTTP servers ===
    let broadcaster_data = web::Data::new(broadcaster.clone());
    let client_url = config.client_url.clone();

    tracing::info!("🌐 Starting API server on http://0.0.0.0:{}", config.port);
    let api_server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors(&client_url))
            .app_data(intake.clone())
            .app_data(broadcaster_data.clone())
            .configure(api::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run();

    let metrics_server = metrics::metrics_server(metrics.registry().clone(), config.metrics_port)?;

    let result = serve_until_first_exit(api_server, metrics_server).await;

    if let Ok(remaining) = broadcaster.subscriber_count().await {
        tracing::info!(subscribers = remaining, "Closing live order feed");
    }
    broadcaster.shutdown();
    tracing::info!("🛑 Servers stopped");

    result?;
    Ok(())
}

/// Run both servers; when either one exits, stop the other.
async fn serve_until_first_exit(api_server: Server, metrics_server: Server) -> std::io::Result<()> {
    let api_handle = api_server.handle();
    let metrics_handle = metrics_server.handle();

    tokio::select! {
        result = api_server => {
            tracing::info!("API server exited, stopping metrics server");
            metrics_handle.stop(true).await;
            result
        }
        result = metrics_server => {
            tracing::warn!("Metrics server exited, stopping API server");
            api_handle.stop(true).await;
            result
        }
    }
}

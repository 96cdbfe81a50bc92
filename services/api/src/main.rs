mod config;
mod envelope;
mod routes;

use crate::config::Config;
use crate::routes::{AppState, create_router};
use anyhow::{Context, Result};
use calclearn_core::ExerciseGenerator;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    info!("Configuration loaded successfully. Starting CalcLearn API...");

    // --- 3. Exercise Source ---
    let generator = match config.seed {
        Some(seed) => {
            info!("Seeding exercise generator with {}", seed);
            ExerciseGenerator::seeded(seed)
        }
        None => ExerciseGenerator::from_entropy(),
    };

    // --- 4. Router ---
    let app = create_router(AppState::new(generator)).layer(TraceLayer::new_for_http());

    info!("Listening for voice platform requests on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {:?}", e);
            }
            info!("Received Ctrl-C, shutting down...");
        })
        .await?;

    Ok(())
}

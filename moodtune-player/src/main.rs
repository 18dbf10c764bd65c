//! moodtune-player - Main entry point
//!
//! The playback orchestration service: detects the user's mood via the
//! expression model sidecar, maps it to a curated track, resolves a
//! playable source through the audio resolution service, and drives the
//! play/pause UI over REST + SSE.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use moodtune_common::catalog::EmotionCatalog;
use moodtune_common::config::{resolve_config, ConfigOverrides};
use moodtune_common::events::EventBus;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodtune_player::api;
use moodtune_player::controller::PlaybackController;
use moodtune_player::detector::{Detector, HttpExpressionModel};
use moodtune_player::resolver::HttpTrackResolver;
use moodtune_player::session::PlaybackSession;
use moodtune_player::sink::EventSink;

/// Command-line arguments for moodtune-player
#[derive(Parser, Debug)]
#[command(name = "moodtune-player")]
#[command(about = "Mood-driven playback orchestration service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL of the audio resolution service
    #[arg(long)]
    resolver_url: Option<String>,

    /// Base URL of the expression model service
    #[arg(long)]
    model_url: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog override file (TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for track selection (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodtune_player=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = resolve_config(&ConfigOverrides {
        port: args.port,
        resolver_url: args.resolver_url,
        model_url: args.model_url,
        config_file: args.config,
        catalog_path: args.catalog,
    })
    .context("Failed to resolve configuration")?;

    info!("Starting moodtune player on port {}", config.port);
    info!("Resolution service: {}", config.resolver_url);
    info!("Expression model: {}", config.model_url);

    let catalog = match &config.catalog_path {
        Some(path) => EmotionCatalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => EmotionCatalog::builtin(),
    };

    let events = EventBus::new(100);
    let session = Arc::new(PlaybackSession::new(events.clone()));

    let timeout = Duration::from_millis(config.request_timeout_ms);
    let model = HttpExpressionModel::new(&config.model_url, timeout)
        .context("Failed to build expression model client")?;

    // Model readiness probe: failure disables the Detect control but
    // leaves the rest of the service running.
    let detector_ready = Arc::new(AtomicBool::new(false));
    match model.probe_ready().await {
        Ok(()) => {
            detector_ready.store(true, Ordering::Relaxed);
            info!("Expression model ready");
        }
        Err(e) => {
            error!("Expression model unavailable, detection disabled: {}", e);
        }
    }

    let resolver = Arc::new(
        HttpTrackResolver::new(&config.resolver_url, timeout)
            .context("Failed to build resolver client")?,
    );
    let sink = Arc::new(EventSink::new(events.clone()));

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let controller = Arc::new(PlaybackController::new(
        Arc::clone(&session),
        catalog,
        Detector::new(Arc::new(model)),
        resolver,
        sink,
        rng,
    ));

    let app_state = api::AppState {
        controller,
        session,
        detector_ready,
        port: config.port,
    };
    let app = api::create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumina_api::config::ServerConfig;
use lumina_api::state::AppState;
use lumina_pipeline::config::{gemini_backfill, open_caches};
use lumina_pipeline::{BackfillConfig, LoadingFlag};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumina_api=debug,lumina_pipeline=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let (config, backfill_config) = match ServerConfig::from_env()
        .and_then(|server| BackfillConfig::from_env().map(|backfill| (server, backfill)))
    {
        Ok(configs) => configs,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Caches ---
    let (categories, products) = open_caches(backfill_config.store()).await;
    tracing::info!(
        cache_dir = %backfill_config.cache_dir.display(),
        categories = categories.len().await,
        products = products.len().await,
        "Image caches loaded",
    );

    // --- Background backfill ---
    let loading = Arc::new(LoadingFlag::new());
    let backfill = gemini_backfill(&backfill_config, Arc::clone(&categories), Arc::clone(&products))
        .spawn(Arc::clone(&loading));

    // --- Router ---
    let state = AppState {
        categories,
        products,
        loading,
    };
    let app = lumina_api::build_app(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Cached slots are already persisted; an unfinished walk resumes next start.
    if !backfill.is_finished() {
        backfill.abort();
        tracing::info!("Image backfill cancelled");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

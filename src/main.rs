use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use email_finder_relay::app::build_router;
use email_finder_relay::config::Config;
use email_finder_relay::handlers::AppState;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the shared state
/// (upstream client and verification ledger) and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "email_finder_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let port = config.port;

    let app_state = Arc::new(AppState::new(config)?);
    tracing::info!(
        "✓ Prospeo client initialized: {}",
        app_state.client.endpoint()
    );

    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Email finder relay listening on {}", addr);
    tracing::info!("📱 Frontend available at: http://localhost:{}", port);
    tracing::info!("🔧 API endpoint: http://localhost:{}/api/email-finder", port);
    tracing::info!(
        "📊 Verification endpoint: http://localhost:{}/api/verification-report",
        port
    );

    axum::serve(listener, app).await?;

    Ok(())
}

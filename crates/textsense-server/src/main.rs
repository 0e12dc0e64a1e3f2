mod api;
mod middleware;

use std::sync::Arc;

use textsense_analytics::TextAnalyticsClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = textsense_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.uses_placeholder_credentials() {
        tracing::warn!(
            "ENDPOINT or TEXT_ANALYTICS_API_KEY not set; sentiment requests will fail until both are configured"
        );
    }

    let analytics = TextAnalyticsClient::new(
        &config.endpoint,
        &config.api_key,
        config.analytics_timeout_secs,
    )?
    .with_language(&config.language);
    tracing::debug!(
        endpoint = analytics.endpoint(),
        language = %config.language,
        "sentiment client ready"
    );

    let app = build_app(AppState {
        analytics: Arc::new(analytics),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "textsense listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

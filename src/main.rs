//! Library catalog backend - entry point
//!
//! All operations are exposed via GraphQL at /graphql.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use catalog::db::seed::seed_sample_data;
use catalog::services::{AuthConfig, AuthService, SharedPasswordVerifier, init_tracing};
use catalog::{AppState, Config, Database, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = Config::from_env()?;
    tracing::info!("Starting catalog backend");

    let db = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;
    tracing::info!(max_connections = config.database_max_connections, "Database connected");

    if config.seed_sample_data {
        seed_sample_data(&db).await.context("Failed to seed sample data")?;
    }

    let auth = AuthService::new(
        db.clone(),
        AuthConfig::from_config(&config),
        Arc::new(SharedPasswordVerifier::new(config.shared_password.clone())),
    );

    let app = build_app(AppState::new(db.clone(), auth));
    tracing::info!("GraphQL schema built");

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum::serve")?;

    db.close().await;
    tracing::info!("Catalog backend stopped");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use version_reporter::app::{create_router, AppState};
use version_reporter::models::settings::Settings;
use version_reporter::services::logging::init_tracing;
use version_reporter::services::openapi::{document_path, SWAGGER_UI_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_tracing();

    let state = AppState::from_settings(settings).context("build route table")?;
    let settings = state.settings.clone();

    let versions: Vec<String> = state
        .routes
        .versions()
        .iter()
        .map(ToString::to_string)
        .collect();
    tracing::info!(
        environment = %settings.environment,
        selector = ?settings.version_selector,
        fallback = ?settings.fallback,
        versions = ?versions,
        "Route table ready"
    );

    if settings.environment.is_development() {
        for version in state.routes.versions() {
            tracing::info!(document = %document_path(version), "Serving OpenAPI document");
        }
        tracing::info!(path = SWAGGER_UI_PATH, "Serving Swagger UI");
    }

    match settings.https_port {
        Some(port) => tracing::info!(https_port = port, "Redirecting plain HTTP to HTTPS"),
        None => tracing::warn!("No HTTPS port configured, HTTPS redirection is disabled"),
    }

    let app = create_router(state);

    let listener = TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("bind TcpListener on {}", settings.bind))?;

    tracing::info!(
        "version-reporter v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        settings.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("run server")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}

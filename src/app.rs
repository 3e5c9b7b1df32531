// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::AppError;
use crate::models::settings::{Settings, VersionSelector};
use crate::routes::version::{dispatch_media_type, dispatch_path, not_found, version_group};
use crate::services::https_redirect::{https_redirect, HttpsRedirect};
use crate::services::openapi;
use crate::services::route_table::{RouteTable, RouteTableError};
use crate::services::version_reader::VersionReader;
use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
///
/// Everything in here is built once at start-up and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub reader: Arc<VersionReader>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build the route table for every route group and wrap the settings.
    pub fn from_settings(settings: Settings) -> Result<Self, RouteTableError> {
        let routes = RouteTable::builder(settings.fallback)
            .group(version_group())?
            .build();

        Ok(Self {
            routes: Arc::new(routes),
            reader: Arc::new(VersionReader::from_settings(&settings)),
            settings: Arc::new(settings),
        })
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
///
/// Versioned routes are mounted as `/{version}/{route}` or `/{route}` depending on
/// the version selector. API documentation is only mounted in development, and
/// HTTPS redirection only when an HTTPS port is configured.
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let mut app = match settings.version_selector {
        VersionSelector::Path => Router::new().route("/{version}/{route}", any(dispatch_path)),
        VersionSelector::MediaType => Router::new().route("/{route}", any(dispatch_media_type)),
    };

    if settings.environment.is_development() {
        app = app.merge(openapi::swagger_ui(
            &state.routes,
            settings.version_selector,
        ));
    }

    let mut app = app.fallback(not_found).with_state(state);

    if let Some(port) = settings.https_port {
        app = app.layer(middleware::from_fn_with_state(
            HttpsRedirect::new(port),
            https_redirect,
        ));
    }

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Turn a handler panic into a 500 problem document.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %message, "Handler panicked");
    AppError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! The `version` route group and the HTTP handlers that dispatch into the route
//! table.

use crate::app::AppState;
use crate::error::AppError;
use crate::models::version::{VersionResponse, V1, V2};
use crate::services::route_table::RouteGroup;
use crate::services::version_reader::VersionReader;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};

pub const VERSION_ROUTE: &str = "version";

fn report_v1() -> VersionResponse {
    VersionResponse::for_version(V1)
}

fn report_v2() -> VersionResponse {
    VersionResponse::for_version(V2)
}

/// `GET version`, available in v1 and v2.
pub fn version_group() -> RouteGroup {
    RouteGroup::new(VERSION_ROUTE)
        .has_api_version(V1)
        .has_api_version(V2)
        .map_get(V1, "VersionReporterV1", "Report API version 1", report_v1)
        .map_get(V2, "VersionReporterV2", "Report API version 2", report_v2)
}

/// `/{version}/{route}`: version taken from the first path segment.
pub async fn dispatch_path(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Path((segment, route)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let requested = VersionReader::from_segment(&segment, &route, uri.path())?;
    let body = state.routes.dispatch(&method, &route, requested)?;
    Ok(respond(&method, body))
}

/// `/{route}`: version taken from the Accept header.
pub async fn dispatch_media_type(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Path(route): Path<String>,
) -> Result<Response, AppError> {
    let requested = state.reader.from_headers(&headers, &route)?;
    let body = state.routes.dispatch(&method, &route, requested)?;
    Ok(respond(&method, body))
}

// HEAD carries the GET headers, including content-type, but no body.
fn respond(method: &Method, body: VersionResponse) -> Response {
    let response = Json(body).into_response();
    if *method == Method::HEAD {
        let (parts, _) = response.into_parts();
        return Response::from_parts(parts, Body::empty());
    }
    response
}

/// Catch-all for paths no pattern matches.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

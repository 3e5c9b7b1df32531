// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Redirects plain-HTTP requests to their HTTPS equivalent.
//!
//! The listener itself speaks plain HTTP and is expected to sit behind a TLS
//! terminator that sets `X-Forwarded-Proto`. Requests that did not arrive over
//! HTTPS are answered with `308 Permanent Redirect` to the configured HTTPS port.

use axum::{
    extract::{Request, State},
    http::{header, uri::Authority, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpsRedirect {
    pub https_port: u16,
}

impl HttpsRedirect {
    pub fn new(https_port: u16) -> Self {
        Self { https_port }
    }

    /// HTTPS URL for `request`, or `None` when the request names no usable host.
    pub fn location(&self, request: &Request) -> Option<String> {
        let host_header = request
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| request.uri().authority().map(|a| a.to_string()))?;
        let authority: Authority = host_header.parse().ok()?;

        let path_and_query = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Some(if self.https_port == 443 {
            format!("https://{}{}", authority.host(), path_and_query)
        } else {
            format!(
                "https://{}:{}{}",
                authority.host(),
                self.https_port,
                path_and_query
            )
        })
    }
}

fn is_secure(request: &Request) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }
    forwarded_proto(request.headers()).is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

// Proxies may append their own hop; the first entry is the client-facing one.
fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
}

pub async fn https_redirect(
    State(config): State<HttpsRedirect>,
    request: Request,
    next: Next,
) -> Response {
    if is_secure(&request) {
        return next.run(request).await;
    }

    match config.location(&request) {
        Some(location) => {
            tracing::debug!(
                from = %request.uri(),
                to = %location,
                "Redirecting plain HTTP request to HTTPS"
            );
            (StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response()
        }
        None => {
            tracing::warn!(uri = %request.uri(), "Cannot redirect request without a host");
            next.run(request).await
        }
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Request errors and their HTTP rendering.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The version token is well-formed but no handler serves it.
    #[error("The resource '{route}' does not support API version '{requested}'")]
    UnsupportedVersion { route: String, requested: String },

    /// Media-type selection is active and the request carried no version.
    #[error("An API version is required for '{route}', but was not specified")]
    UnspecifiedVersion { route: String },

    #[error("No route matches '{0}'")]
    NotFound(String),

    #[error("Method '{method}' is not allowed on '{route}'")]
    MethodNotAllowed {
        method: String,
        route: String,
        /// Methods the route does answer, sent back in `Allow`
        allowed: Vec<String>,
    },

    #[error("An unexpected error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error body, shaped after RFC 9457 problem details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedVersion { .. } | AppError::UnspecifiedVersion { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::UnsupportedVersion { .. } => "Unsupported API version",
            AppError::UnspecifiedVersion { .. } => "Unspecified API version",
            AppError::NotFound(_) => "Not Found",
            AppError::MethodNotAllowed { .. } => "Method Not Allowed",
            AppError::Internal(_) => "Internal Server Error",
        }
    }

    fn problem_type(&self) -> &'static str {
        match self {
            AppError::UnsupportedVersion { .. } => "urn:problem-type:unsupported-api-version",
            AppError::UnspecifiedVersion { .. } => "urn:problem-type:unspecified-api-version",
            _ => "about:blank",
        }
    }

    pub fn to_problem(&self) -> ProblemDetails {
        let detail = match self {
            // Internal causes stay in the log.
            AppError::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        };
        ProblemDetails {
            problem_type: self.problem_type().to_string(),
            title: self.title().to_string(),
            status: self.status().as_u16(),
            detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, status_code = %status, "Request error");
            if let AppError::Internal(e) = &self {
                for cause in e.chain().skip(1) {
                    tracing::error!("  Caused by: {}", cause);
                }
            }
        } else {
            tracing::warn!(error = %self, status_code = %status, "Request rejected");
        }

        let mut response = (status, Json(self.to_problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_JSON),
        );
        if let AppError::MethodNotAllowed { allowed, .. } = &self {
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

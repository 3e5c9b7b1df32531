// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Extracts the requested API version from a request.

use crate::error::AppError;
use crate::models::settings::Settings;
use crate::models::version::{ApiVersion, VersionParseError};
use axum::http::{header, HeaderMap};

#[derive(Debug, Clone)]
pub struct VersionReader {
    /// Accept-header parameter name, compared case-insensitively
    pub parameter: String,
    pub default_version: Option<ApiVersion>,
}

impl VersionReader {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            parameter: settings.media_type_parameter.clone(),
            default_version: settings.default_version,
        }
    }

    /// Read the version from a `v{version}` path segment.
    ///
    /// A malformed segment means the path does not match the `/v{version}/{route}`
    /// pattern at all, so it is reported as not found. A well-formed version whose
    /// numbers overflow can never be registered, so it is unsupported.
    pub fn from_segment(segment: &str, route: &str, path: &str) -> Result<ApiVersion, AppError> {
        ApiVersion::from_segment(segment).map_err(|e| match e {
            VersionParseError::Malformed(_) => AppError::NotFound(path.to_string()),
            VersionParseError::OutOfRange(requested) => AppError::UnsupportedVersion {
                route: route.to_string(),
                requested,
            },
        })
    }

    /// Read the version from the media-type parameter of the Accept header(s).
    ///
    /// The first media range carrying the parameter wins. Without one, the default
    /// version is assumed if configured.
    pub fn from_headers(&self, headers: &HeaderMap, route: &str) -> Result<ApiVersion, AppError> {
        let requested = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .find_map(|media_range| self.parameter_value(media_range));

        match requested {
            Some(raw) => {
                ApiVersion::from_parameter(raw).map_err(|_| AppError::UnsupportedVersion {
                    route: route.to_string(),
                    requested: raw.trim().to_string(),
                })
            }
            None => self.default_version.ok_or_else(|| AppError::UnspecifiedVersion {
                route: route.to_string(),
            }),
        }
    }

    fn parameter_value<'a>(&self, media_range: &'a str) -> Option<&'a str> {
        media_range.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case(&self.parameter)
                .then_some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::version::{V1, V2};
    use axum::http::HeaderValue;

    fn reader(default_version: Option<ApiVersion>) -> VersionReader {
        VersionReader {
            parameter: "v".to_string(),
            default_version,
        }
    }

    fn accept(values: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(header::ACCEPT, HeaderValue::from_static(*value));
        }
        headers
    }

    #[test]
    fn test_from_segment() {
        assert_eq!(VersionReader::from_segment("v2", "version", "/v2/version").unwrap(), V2);
    }

    #[test]
    fn test_malformed_segment_is_not_found() {
        let err = VersionReader::from_segment("vx", "version", "/vx/version").unwrap_err();
        assert!(matches!(err, AppError::NotFound(path) if path == "/vx/version"));
    }

    #[test]
    fn test_overflowing_segment_is_unsupported() {
        let err =
            VersionReader::from_segment("v4294967296", "version", "/v4294967296/version")
                .unwrap_err();
        assert!(matches!(
            err,
            AppError::UnsupportedVersion { requested, .. } if requested == "v4294967296"
        ));
    }

    #[test]
    fn test_reads_parameter() {
        let headers = accept(&["application/json; v=2"]);
        assert_eq!(reader(None).from_headers(&headers, "version").unwrap(), V2);
    }

    #[test]
    fn test_parameter_name_is_case_insensitive_and_configurable() {
        let reader = VersionReader {
            parameter: "api-version".to_string(),
            ..reader(None)
        };
        let headers = accept(&["application/json;charset=utf-8;API-Version=1.0"]);
        assert_eq!(reader.from_headers(&headers, "version").unwrap(), V1);
    }

    #[test]
    fn test_first_media_range_with_parameter_wins() {
        let headers = accept(&["text/html", "application/json;v=1, application/json;v=2"]);
        assert_eq!(reader(None).from_headers(&headers, "version").unwrap(), V1);
    }

    #[test]
    fn test_missing_parameter_uses_default() {
        let headers = accept(&["application/json"]);
        assert_eq!(
            reader(Some(V1)).from_headers(&headers, "version").unwrap(),
            V1
        );
    }

    #[test]
    fn test_missing_parameter_without_default_is_unspecified() {
        let err = reader(None)
            .from_headers(&HeaderMap::new(), "version")
            .unwrap_err();
        assert!(matches!(err, AppError::UnspecifiedVersion { .. }));
    }

    #[test]
    fn test_malformed_parameter_is_unsupported() {
        let headers = accept(&["application/json; v=latest"]);
        let err = reader(Some(V1)).from_headers(&headers, "version").unwrap_err();
        assert!(matches!(
            err,
            AppError::UnsupportedVersion { requested, .. } if requested == "latest"
        ));
    }
}

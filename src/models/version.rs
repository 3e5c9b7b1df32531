// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Body returned by every `version` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    /// API version that served the request, e.g. `v1`
    #[schema(example = "v1")]
    pub version: String,
}

impl VersionResponse {
    pub fn for_version(version: ApiVersion) -> Self {
        Self {
            version: version.to_string(),
        }
    }
}

/// An API version in `major[.minor]` form.
///
/// Ordering compares the major number first, then the minor one. A missing
/// minor is zero, so `v1` and `v1.0` are the same version. The textual form is
/// `v{major}` when the minor is zero and `v{major}.{minor}` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
}

pub const V1: ApiVersion = ApiVersion::new(1, 0);
pub const V2: ApiVersion = ApiVersion::new(2, 0);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("malformed API version '{0}'")]
    Malformed(String),

    /// Syntactically valid, but a component does not fit in a `u32`.
    #[error("API version '{0}' is out of range")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invalid {
    Syntax,
    Range,
}

impl Invalid {
    fn into_error(self, raw: &str) -> VersionParseError {
        match self {
            Invalid::Syntax => VersionParseError::Malformed(raw.to_string()),
            Invalid::Range => VersionParseError::OutOfRange(raw.to_string()),
        }
    }
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Parse a path segment such as `v1` or `v2.0`. The leading `v` is required.
    pub fn from_segment(segment: &str) -> Result<Self, VersionParseError> {
        let number = segment
            .strip_prefix('v')
            .ok_or_else(|| VersionParseError::Malformed(segment.to_string()))?;
        Self::parse_number(number).map_err(|invalid| invalid.into_error(segment))
    }

    /// Parse a media-type parameter value such as `2` or `2.0`.
    /// A leading `v` is tolerated.
    pub fn from_parameter(value: &str) -> Result<Self, VersionParseError> {
        let trimmed = value.trim().trim_matches('"');
        let number = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Self::parse_number(number).map_err(|invalid| invalid.into_error(value))
    }

    fn parse_number(number: &str) -> Result<Self, Invalid> {
        let mut parts = number.split('.');
        let major = parts.next().ok_or(Invalid::Syntax)?;
        let minor = parts.next();
        if parts.next().is_some() {
            return Err(Invalid::Syntax);
        }

        let major = parse_component(major);
        let minor = minor.map(parse_component).unwrap_or(Ok(0));
        // A syntax error anywhere wins over an overflow.
        match (major, minor) {
            (Ok(major), Ok(minor)) => Ok(Self::new(major, minor)),
            (Err(Invalid::Syntax), _) | (_, Err(Invalid::Syntax)) => Err(Invalid::Syntax),
            _ => Err(Invalid::Range),
        }
    }
}

// `u32::from_str` accepts a leading '+', which is not part of the format.
fn parse_component(part: &str) -> Result<u32, Invalid> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Invalid::Syntax);
    }
    part.parse().map_err(|_| Invalid::Range)
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            write!(f, "v{}", self.major)
        } else {
            write!(f, "v{}.{}", self.major, self.minor)
        }
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_parameter(s)
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::environment::Environment;
use crate::models::version::ApiVersion;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

/// Where the requested API version is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VersionSelector {
    /// First path segment: `/v1/version`
    #[default]
    Path,
    /// Media-type parameter of the Accept header: `application/json; v=1`
    MediaType,
}

/// What to do when the requested version has no handler of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FallbackPolicy {
    /// Only exact matches are served.
    #[default]
    None,
    /// Serve the lowest registered version at or above the requested one.
    NextHigher,
}

/// Process configuration. Every flag can also be set through its environment
/// variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "version-reporter", version, about = "Versioned version-reporting API")]
pub struct Settings {
    /// Address the HTTP listener binds to
    #[arg(long, env = "APP_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Hosting environment; `development` mounts the API documentation
    #[arg(long, env = "APP_ENVIRONMENT", value_enum, default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Public HTTPS port; plain HTTP requests are redirected to it when set
    #[arg(long, env = "APP_HTTPS_PORT")]
    pub https_port: Option<u16>,

    /// How clients select the API version
    #[arg(long, env = "APP_VERSION_SELECTOR", value_enum, default_value_t = VersionSelector::Path)]
    pub version_selector: VersionSelector,

    /// Accept-header parameter carrying the version in media-type mode
    #[arg(long, env = "APP_MEDIA_TYPE_PARAMETER", default_value = "v")]
    pub media_type_parameter: String,

    /// Version assumed when a media-type request carries none
    #[arg(long, env = "APP_DEFAULT_VERSION")]
    pub default_version: Option<ApiVersion>,

    /// Policy for requested versions without their own handler
    #[arg(long, env = "APP_FALLBACK", value_enum, default_value_t = FallbackPolicy::None)]
    pub fallback: FallbackPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            environment: Environment::default(),
            https_port: None,
            version_selector: VersionSelector::default(),
            media_type_parameter: "v".to_string(),
            default_version: None,
            fallback: FallbackPolicy::default(),
        }
    }
}

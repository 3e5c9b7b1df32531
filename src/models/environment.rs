// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::ValueEnum;

/// Hosting environment the service runs in.
///
/// Development: API documentation (per-version OpenAPI documents and Swagger UI)
/// is mounted next to the versioned routes.
///
/// Production: only the versioned routes are served. This is the default when
/// nothing is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    /// Local development, documentation endpoints enabled.
    Development,
    /// Deployed service, documentation endpoints disabled.
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

// Rust enums have no default Display. Manual impl needed to print "development"/"production"
// rather than the Debug form "Development"/"Production".
impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_development() {
        assert_eq!(
            Environment::from_str("development", false),
            Ok(Environment::Development)
        );
    }

    #[test]
    fn test_parse_production() {
        assert_eq!(
            Environment::from_str("production", false),
            Ok(Environment::Production)
        );
    }

    #[test]
    fn test_parse_invalid_is_rejected() {
        assert!(Environment::from_str("staging", false).is_err());
    }

    #[test]
    fn test_default_is_production() {
        assert_eq!(Environment::default(), Environment::Production);
        assert!(!Environment::default().is_development());
    }

    #[test]
    fn test_display_produces_lowercase() {
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Production.to_string(), "production");
    }
}

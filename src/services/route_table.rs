// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Explicit route table mapping `(method, route, API version)` to a handler.
//!
//! The table is assembled once at start-up from [`RouteGroup`]s and is read-only
//! afterwards, so it can be shared behind an `Arc` and consulted from any number of
//! requests without locking.

use crate::error::AppError;
use crate::models::settings::FallbackPolicy;
use crate::models::version::{ApiVersion, VersionResponse};
use axum::http::Method;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub type Handler = fn() -> VersionResponse;

/// A single handler registration.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    /// Route name, also the last path segment (`version`)
    pub name: &'static str,
    pub version: ApiVersion,
    /// Stable operation id exposed in the API documentation
    pub operation_id: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("route group '{0}' is registered twice")]
    DuplicateGroup(&'static str),

    #[error("route group '{route}' maps a handler to {version}, which it does not declare")]
    UndeclaredVersion {
        route: &'static str,
        version: ApiVersion,
    },

    #[error("route group '{route}' maps {method} to {version} more than once")]
    DuplicateHandler {
        route: &'static str,
        method: Method,
        version: ApiVersion,
    },
}

/// Endpoints sharing one route name, registered across several API versions.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    name: &'static str,
    declared: BTreeSet<ApiVersion>,
    routes: Vec<Route>,
}

impl RouteGroup {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            declared: BTreeSet::new(),
            routes: Vec::new(),
        }
    }

    pub fn has_api_version(mut self, version: ApiVersion) -> Self {
        self.declared.insert(version);
        self
    }

    pub fn map(
        mut self,
        method: Method,
        version: ApiVersion,
        operation_id: &'static str,
        summary: &'static str,
        handler: Handler,
    ) -> Self {
        self.routes.push(Route {
            method,
            name: self.name,
            version,
            operation_id,
            summary,
            handler,
        });
        self
    }

    pub fn map_get(
        self,
        version: ApiVersion,
        operation_id: &'static str,
        summary: &'static str,
        handler: Handler,
    ) -> Self {
        self.map(Method::GET, version, operation_id, summary, handler)
    }
}

#[derive(Debug, Default)]
struct RouteEntry {
    declared: BTreeSet<ApiVersion>,
    handlers: HashMap<Method, BTreeMap<ApiVersion, Route>>,
}

impl RouteEntry {
    /// Methods this route answers, sorted, for the `Allow` header.
    fn allowed_methods(&self) -> Vec<String> {
        let mut allowed: Vec<String> = self.handlers.keys().map(Method::to_string).collect();
        if self.handlers.contains_key(&Method::GET) && !self.handlers.contains_key(&Method::HEAD) {
            allowed.push(Method::HEAD.to_string());
        }
        allowed.sort();
        allowed
    }
}

#[derive(Debug)]
pub struct RouteTable {
    entries: HashMap<&'static str, RouteEntry>,
    fallback: FallbackPolicy,
}

pub struct RouteTableBuilder {
    entries: HashMap<&'static str, RouteEntry>,
    fallback: FallbackPolicy,
}

impl RouteTableBuilder {
    pub fn group(mut self, group: RouteGroup) -> Result<Self, RouteTableError> {
        if self.entries.contains_key(group.name) {
            return Err(RouteTableError::DuplicateGroup(group.name));
        }

        let mut entry = RouteEntry {
            declared: group.declared,
            handlers: HashMap::new(),
        };

        for route in group.routes {
            if !entry.declared.contains(&route.version) {
                return Err(RouteTableError::UndeclaredVersion {
                    route: route.name,
                    version: route.version,
                });
            }
            let by_version = entry.handlers.entry(route.method.clone()).or_default();
            if by_version.contains_key(&route.version) {
                return Err(RouteTableError::DuplicateHandler {
                    route: route.name,
                    method: route.method,
                    version: route.version,
                });
            }
            by_version.insert(route.version, route);
        }

        self.entries.insert(group.name, entry);
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            entries: self.entries,
            fallback: self.fallback,
        }
    }
}

impl RouteTable {
    pub fn builder(fallback: FallbackPolicy) -> RouteTableBuilder {
        RouteTableBuilder {
            entries: HashMap::new(),
            fallback,
        }
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Every version declared by at least one route group, ascending.
    pub fn versions(&self) -> BTreeSet<ApiVersion> {
        self.entries
            .values()
            .flat_map(|entry| entry.declared.iter().copied())
            .collect()
    }

    /// Routes with a handler registered for exactly `version`, ordered by route
    /// name and then method.
    pub fn routes_for(&self, version: ApiVersion) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self
            .entries
            .values()
            .flat_map(|entry| entry.handlers.values())
            .filter_map(|by_version| by_version.get(&version))
            .collect();
        routes.sort_by(|a, b| (a.name, a.method.as_str()).cmp(&(b.name, b.method.as_str())));
        routes
    }

    /// Select the route serving `requested`, applying the fallback policy.
    pub fn resolve(
        &self,
        method: &Method,
        route: &str,
        requested: ApiVersion,
    ) -> Result<&Route, AppError> {
        let entry = self
            .entries
            .get(route)
            .ok_or_else(|| AppError::NotFound(route.to_string()))?;

        // HEAD is answered by the GET handler unless one is registered for it.
        let by_version = entry
            .handlers
            .get(method)
            .or_else(|| {
                (*method == Method::HEAD)
                    .then(|| entry.handlers.get(&Method::GET))
                    .flatten()
            })
            .ok_or_else(|| AppError::MethodNotAllowed {
                method: method.to_string(),
                route: route.to_string(),
                allowed: entry.allowed_methods(),
            })?;

        if let Some(found) = by_version.get(&requested) {
            return Ok(found);
        }

        let fallback = match self.fallback {
            FallbackPolicy::None => None,
            FallbackPolicy::NextHigher => by_version.range(requested..).next().map(|(_, r)| r),
        };

        fallback.ok_or_else(|| AppError::UnsupportedVersion {
            route: route.to_string(),
            requested: requested.to_string(),
        })
    }

    /// Resolve and invoke the handler.
    pub fn dispatch(
        &self,
        method: &Method,
        route: &str,
        requested: ApiVersion,
    ) -> Result<VersionResponse, AppError> {
        let found = self.resolve(method, route, requested)?;
        tracing::debug!(
            route = found.name,
            requested = %requested,
            served = %found.version,
            operation_id = found.operation_id,
            "Dispatching versioned route"
        );
        Ok((found.handler)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::version::{V1, V2};

    fn report_v1() -> VersionResponse {
        VersionResponse::for_version(V1)
    }

    fn report_v2() -> VersionResponse {
        VersionResponse::for_version(V2)
    }

    fn group() -> RouteGroup {
        RouteGroup::new("version")
            .has_api_version(V1)
            .has_api_version(V2)
            .map_get(V1, "ReportV1", "v1", report_v1)
            .map_get(V2, "ReportV2", "v2", report_v2)
    }

    fn table(fallback: FallbackPolicy) -> RouteTable {
        RouteTable::builder(fallback).group(group()).unwrap().build()
    }

    #[test]
    fn test_exact_match_dispatches_matching_handler() {
        let table = table(FallbackPolicy::None);

        let v1 = table.dispatch(&Method::GET, "version", V1).unwrap();
        let v2 = table.dispatch(&Method::GET, "version", V2).unwrap();

        assert_eq!(v1.version, "v1");
        assert_eq!(v2.version, "v2");
    }

    #[test]
    fn test_unregistered_version_without_fallback_is_unsupported() {
        let table = table(FallbackPolicy::None);

        let err = table
            .resolve(&Method::GET, "version", ApiVersion::new(1, 5))
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_next_higher_picks_lowest_version_at_or_above() {
        let table = table(FallbackPolicy::NextHigher);

        let route = table
            .resolve(&Method::GET, "version", ApiVersion::new(1, 5))
            .unwrap();
        assert_eq!(route.version, V2);

        let route = table
            .resolve(&Method::GET, "version", ApiVersion::new(0, 9))
            .unwrap();
        assert_eq!(route.version, V1);
    }

    #[test]
    fn test_next_higher_fails_above_highest_version() {
        let table = table(FallbackPolicy::NextHigher);

        let err = table
            .resolve(&Method::GET, "version", ApiVersion::new(3, 0))
            .unwrap_err();

        match err {
            AppError::UnsupportedVersion { route, requested } => {
                assert_eq!(route, "version");
                assert_eq!(requested, "v3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let table = table(FallbackPolicy::None);

        let err = table.resolve(&Method::GET, "status", V1).unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unregistered_method_is_not_allowed() {
        let table = table(FallbackPolicy::None);

        let err = table.resolve(&Method::POST, "version", V1).unwrap_err();

        match err {
            AppError::MethodNotAllowed { allowed, .. } => {
                assert_eq!(allowed, vec!["GET".to_string(), "HEAD".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_head_is_served_by_get_handler() {
        let table = table(FallbackPolicy::None);

        let route = table.resolve(&Method::HEAD, "version", V2).unwrap();

        assert_eq!(route.method, Method::GET);
        assert_eq!(route.version, V2);
    }

    #[test]
    fn test_undeclared_version_is_rejected() {
        let group = RouteGroup::new("version")
            .has_api_version(V1)
            .map_get(V2, "ReportV2", "v2", report_v2);

        let result = RouteTable::builder(FallbackPolicy::None).group(group);

        assert!(matches!(
            result,
            Err(RouteTableError::UndeclaredVersion { version, .. }) if version == V2
        ));
    }

    #[test]
    fn test_duplicate_handler_is_rejected() {
        let group = group().map_get(V1, "ReportV1Again", "v1", report_v1);

        let result = RouteTable::builder(FallbackPolicy::None).group(group);

        assert!(matches!(
            result,
            Err(RouteTableError::DuplicateHandler { .. })
        ));
    }

    #[test]
    fn test_duplicate_group_is_rejected() {
        let result = RouteTable::builder(FallbackPolicy::None)
            .group(group())
            .and_then(|builder| builder.group(group()));

        assert!(matches!(result, Err(RouteTableError::DuplicateGroup("version"))));
    }

    #[test]
    fn test_versions_and_routes_for() {
        let table = table(FallbackPolicy::None);

        assert_eq!(table.versions().into_iter().collect::<Vec<_>>(), vec![V1, V2]);

        let v2_routes = table.routes_for(V2);
        assert_eq!(v2_routes.len(), 1);
        assert_eq!(v2_routes[0].operation_id, "ReportV2");
        assert!(table.routes_for(ApiVersion::new(3, 0)).is_empty());
    }
}

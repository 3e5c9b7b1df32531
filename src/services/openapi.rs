// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Per-version OpenAPI documents generated from the route table.
//!
//! Each registered API version gets its own document named after the version
//! (`v1`, `v2`) and served at `/openapi/{name}.json`. Paths are rendered with the
//! version already substituted, so the v1 document lists `/v1/version` rather than
//! a `/{version}/version` template.

use crate::error::ProblemDetails;
use crate::models::settings::VersionSelector;
use crate::models::version::{ApiVersion, VersionResponse};
use crate::services::route_table::{Route, RouteTable};
use axum::http::Method;
use utoipa::openapi::path::{HttpMethod, OperationBuilder, PathItem};
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Ref,
    Response, ResponseBuilder,
};
use utoipa::ToSchema;
use utoipa_swagger_ui::SwaggerUi;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const VERSION_TAG: &str = "Version";

pub fn document_name(version: ApiVersion) -> String {
    version.to_string()
}

pub fn document_path(version: ApiVersion) -> String {
    format!("/openapi/{}.json", document_name(version))
}

/// Concrete request path of `route` as clients call it.
pub fn route_path(route: &Route, selector: VersionSelector) -> String {
    match selector {
        VersionSelector::Path => format!("/{}/{}", route.version, route.name),
        VersionSelector::MediaType => format!("/{}", route.name),
    }
}

fn http_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        Method::PUT => Some(HttpMethod::Put),
        Method::DELETE => Some(HttpMethod::Delete),
        Method::PATCH => Some(HttpMethod::Patch),
        Method::HEAD => Some(HttpMethod::Head),
        Method::OPTIONS => Some(HttpMethod::Options),
        Method::TRACE => Some(HttpMethod::Trace),
        _ => None,
    }
}

fn json_response(description: &str, content_type: &str, schema_name: String) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            content_type,
            ContentBuilder::new()
                .schema(Some(Ref::from_schema_name(schema_name)))
                .build(),
        )
        .build()
}

fn path_item(route: &Route, method: HttpMethod, selector: VersionSelector) -> PathItem {
    let description = match selector {
        VersionSelector::Path => None,
        VersionSelector::MediaType => Some(format!(
            "Select this version with a media-type parameter, e.g. `Accept: application/json; v={}`",
            route.version.to_string().trim_start_matches('v')
        )),
    };

    let operation = OperationBuilder::new()
        .operation_id(Some(route.operation_id))
        .summary(Some(route.summary))
        .description(description)
        .tag(VERSION_TAG)
        .response(
            "200",
            json_response(
                "Version that served the request",
                "application/json",
                VersionResponse::name().into_owned(),
            ),
        )
        .response(
            "400",
            json_response(
                "Unsupported or unspecified API version",
                crate::error::PROBLEM_JSON,
                ProblemDetails::name().into_owned(),
            ),
        );

    PathItem::new(method, operation)
}

/// Build the document describing every route registered for `version`.
pub fn build_document(table: &RouteTable, version: ApiVersion, selector: VersionSelector) -> OpenApi {
    let mut paths = PathsBuilder::new();
    for route in table.routes_for(version) {
        let Some(method) = http_method(&route.method) else {
            tracing::warn!(method = %route.method, route = route.name, "Method cannot be documented");
            continue;
        };
        paths = paths.path(route_path(route, selector), path_item(route, method, selector));
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Version Reporter API")
                .version(document_name(version))
                .description(Some(format!("API version {}", version)))
                .build(),
        )
        .paths(paths.build())
        .components(Some(
            ComponentsBuilder::new()
                .schema_from::<VersionResponse>()
                .schema_from::<ProblemDetails>()
                .build(),
        ))
        .tags(Some(vec![TagBuilder::new()
            .name(VERSION_TAG)
            .description(Some("Reports the API version that served the request"))
            .build()]))
        .build()
}

/// Swagger UI listing one document per registered version, each also served as
/// JSON at [`document_path`].
pub fn swagger_ui(table: &RouteTable, selector: VersionSelector) -> SwaggerUi {
    table
        .versions()
        .into_iter()
        .fold(SwaggerUi::new(SWAGGER_UI_PATH), |ui, version| {
            ui.url(document_path(version), build_document(table, version, selector))
        })
}

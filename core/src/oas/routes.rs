#![deny(missing_docs)]

//! # Route Assembly
//!
//! Builds one operation per route: path rewriting, tags, summary and
//! description selection, request shape, success response and security.

use crate::error::ResolveError;
use crate::oas::context::ResolutionContext;
use crate::oas::models::{external_docs, json_response};
use crate::oas::resolver::request::build_request_shape;
use crate::oas::resolver::responses::{resolve_response, SUCCESS_DESCRIPTION};
use crate::parser::{Group, Route, Service};
use indexmap::IndexMap;
use openapiv3::{Operation, PathItem, ReferenceOr, SecurityRequirement, StatusCode};
use regex::Regex;
use std::sync::OnceLock;

/// Name of the JWT security scheme in `components.securitySchemes`.
pub const JWT_SCHEME: &str = "jwt";

/// Rewrites `/:name` path variables to `/{name}`.
pub fn convert_path(path: &str) -> String {
    static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();
    PATH_PARAM_RE
        .get_or_init(|| Regex::new(r"/:([^/]+)").expect("Invalid regex"))
        .replace_all(path, "/{$1}")
        .into_owned()
}

/// Joins a group prefix and a route path with exactly one slash.
pub fn join_prefix(prefix: Option<&str>, path: &str) -> String {
    let path = path.trim();
    match prefix.map(|p| p.trim().trim_end_matches('/')) {
        Some(prefix) if !prefix.is_empty() => {
            let prefix = prefix.trim_start_matches('/');
            format!("/{}/{}", prefix, path.trim_start_matches('/'))
                .trim_end_matches('/')
                .to_string()
        }
        _ if path.starts_with('/') => path.to_string(),
        _ => format!("/{}", path),
    }
}

/// Whether any group is protected with JWT.
pub fn uses_jwt(service: &Service) -> bool {
    service.groups.iter().any(|g| g.annotation("jwt").is_some())
}

/// Builds the `paths` object for every route of the service.
pub fn build_paths(
    service: &Service,
    ctx: &mut ResolutionContext<'_>,
) -> IndexMap<String, PathItem> {
    let mut paths: IndexMap<String, PathItem> = IndexMap::new();
    for group in &service.groups {
        for route in &group.routes {
            let method = route.method.trim().to_uppercase();
            let path = convert_path(&join_prefix(group.annotation("prefix").as_deref(), &route.path));
            let location = format!("{} {}", method, path);

            let item = paths.entry(path.clone()).or_default();
            let Some(slot) = operation_slot(item, &method) else {
                ctx.warn(&location, ResolveError::UnsupportedMethod(route.method.clone()));
                continue;
            };
            if slot.is_some() {
                tracing::warn!(%location, "duplicate route replaces the earlier operation");
            }
            *slot = Some(build_operation(&service.name, group, route, &method, &location, ctx));
        }
    }
    paths.retain(|_, item| has_operations(item));
    paths
}

fn operation_slot<'p>(item: &'p mut PathItem, method: &str) -> Option<&'p mut Option<Operation>> {
    match method {
        "GET" => Some(&mut item.get),
        "PUT" => Some(&mut item.put),
        "POST" => Some(&mut item.post),
        "DELETE" => Some(&mut item.delete),
        "OPTIONS" => Some(&mut item.options),
        "HEAD" => Some(&mut item.head),
        "PATCH" => Some(&mut item.patch),
        "TRACE" => Some(&mut item.trace),
        _ => None,
    }
}

fn has_operations(item: &PathItem) -> bool {
    [
        &item.get,
        &item.put,
        &item.post,
        &item.delete,
        &item.options,
        &item.head,
        &item.patch,
        &item.trace,
    ]
    .iter()
    .any(|operation| operation.is_some())
}

fn build_operation(
    service_name: &str,
    group: &Group,
    route: &Route,
    method: &str,
    location: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Operation {
    let mut operation = Operation {
        tags: route_tags(service_name, group, route),
        summary: route
            .at_doc
            .property("summary")
            .or_else(|| non_blank(&route.at_doc.text)),
        description: route
            .at_doc
            .property("description")
            .or_else(|| non_blank(&route.docs.join(" "))),
        operation_id: non_blank(&route.handler),
        external_docs: route
            .at_doc
            .property("externalDocs")
            .map(external_docs),
        ..Default::default()
    };

    if let Some(request_type) = route.request_type() {
        match ctx.record(request_type) {
            Some(record) => {
                let shape = build_request_shape(record, ctx);
                operation.parameters = shape
                    .parameters
                    .iter()
                    .map(|param| ReferenceOr::Item(param.to_parameter()))
                    .collect();
                if has_body(method) {
                    operation.request_body = shape.body;
                }
            }
            None => ctx.warn(location, ResolveError::UnknownType(request_type.to_string())),
        }
    }

    let response = route
        .response_type()
        .and_then(|response_type| resolve_response(location, response_type, ctx))
        .unwrap_or_else(|| ReferenceOr::Item(json_response(SUCCESS_DESCRIPTION, None)));
    operation
        .responses
        .responses
        .insert(StatusCode::Code(200), response);

    if group.annotation("jwt").is_some() {
        let requirement: SecurityRequirement =
            IndexMap::from([(JWT_SCHEME.to_string(), Vec::new())]);
        operation.security = Some(vec![requirement]);
    }
    operation
}

/// `@doc` tags, else the service name plus the group annotation.
fn route_tags(service_name: &str, group: &Group, route: &Route) -> Vec<String> {
    let tags: Vec<String> = route
        .at_doc
        .property("tags")
        .map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    if !tags.is_empty() {
        return tags;
    }
    std::iter::once(service_name.to_string())
        .chain(group.annotation("group"))
        .filter(|t| !t.is_empty())
        .collect()
}

fn has_body(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

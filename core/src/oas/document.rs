#![deny(missing_docs)]

//! # Document Assembly
//!
//! Runs one resolution pass over an interface description and wraps the
//! result in an OpenAPI 3.0 document.

use crate::oas::context::{ResolutionContext, Warning};
use crate::oas::models::{external_docs, jwt_scheme};
use crate::oas::routes::{build_paths, uses_jwt, JWT_SCHEME};
use crate::parser::ApiSpec;
use openapiv3::{Contact, Info, OpenAPI, Paths, ReferenceOr, Server};

/// OpenAPI version written to every document.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// A generated document and the problems found while building it.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// The OpenAPI document.
    pub document: OpenAPI,
    /// Non-fatal problems, in discovery order.
    pub warnings: Vec<Warning>,
}

/// Builds the OpenAPI document for `spec`. Never fails; unresolvable parts
/// are skipped and reported as warnings.
pub fn build_document(spec: &ApiSpec) -> GeneratedDocument {
    let types = spec.type_table();
    let mut ctx = ResolutionContext::new(&types);
    let paths = build_paths(&spec.service, &mut ctx);
    let (mut components, warnings) = ctx.finish();

    if uses_jwt(&spec.service) {
        components
            .security_schemes
            .insert(JWT_SCHEME.to_string(), ReferenceOr::Item(jwt_scheme()));
    }

    tracing::debug!(
        paths = paths.len(),
        schemas = components.schemas.len(),
        warnings = warnings.len(),
        "document assembled"
    );

    GeneratedDocument {
        document: OpenAPI {
            openapi: OPENAPI_VERSION.to_string(),
            info: build_info(spec),
            servers: build_servers(spec),
            paths: Paths {
                paths: paths
                    .into_iter()
                    .map(|(path, item)| (path, ReferenceOr::Item(item)))
                    .collect(),
                ..Default::default()
            },
            components: Some(components),
            external_docs: spec.property("externalDocs").map(external_docs),
            ..Default::default()
        },
        warnings,
    }
}

fn build_info(spec: &ApiSpec) -> Info {
    let author = spec.property("author");
    let email = spec.property("email");
    let contact = (author.is_some() || email.is_some()).then(|| Contact {
        name: author,
        email,
        ..Default::default()
    });
    Info {
        title: spec.property("title").unwrap_or_default(),
        description: spec.property("desc"),
        version: spec.property("version").unwrap_or_default(),
        contact,
        ..Default::default()
    }
}

/// `servers` is a comma separated list of URLs.
fn build_servers(spec: &ApiSpec) -> Vec<Server> {
    spec.property("servers")
        .map(|urls| {
            urls.split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(|url| Server {
                    url: url.to_string(),
                    ..Default::default()
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_api_spec;

    #[test]
    fn test_info_servers_and_docs() {
        let spec = parse_api_spec(
            r#"
info:
  title: '"Demo"'
  version: "2.1"
  author: Ops
  servers: "https://a.example, https://b.example"
  externalDocs: https://docs.example
service:
  name: demo
"#,
        )
        .unwrap();
        let doc = build_document(&spec).document;
        assert_eq!(doc.openapi, OPENAPI_VERSION);
        assert_eq!(doc.info.title, "Demo");
        assert_eq!(doc.info.version, "2.1");
        assert_eq!(doc.info.contact.unwrap().name.as_deref(), Some("Ops"));
        let urls: Vec<_> = doc.servers.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
        assert_eq!(doc.external_docs.unwrap().url, "https://docs.example");
        assert!(doc.components.unwrap().security_schemes.is_empty());
    }

    #[test]
    fn test_no_contact_without_author_or_email() {
        let spec = parse_api_spec("service:\n  name: demo\n").unwrap();
        let doc = build_document(&spec).document;
        assert!(doc.info.contact.is_none());
        assert!(doc.servers.is_empty());
        assert!(doc.paths.paths.is_empty());
    }

    #[test]
    fn test_jwt_scheme_registered_when_used() {
        let spec = parse_api_spec(
            r#"
service:
  name: demo
  groups:
    - annotation:
        jwt: Auth
      routes:
        - method: get
          path: /me
          handler: Me
"#,
        )
        .unwrap();
        let doc = build_document(&spec).document;
        let schemes = doc.components.unwrap().security_schemes;
        assert_eq!(schemes.keys().collect::<Vec<_>>(), vec![JWT_SCHEME]);
        assert!(doc.paths.paths.contains_key("/me"));
    }
}

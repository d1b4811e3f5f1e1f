//! # Responses
//!
//! Success responses, registered under their type name when that name is a
//! valid component key and inlined otherwise (`[]User`, `*User`, maps).

use crate::oas::context::ResolutionContext;
use crate::oas::descriptor::TypeDescriptor;
use crate::oas::models::{json_response, response_ref};
use crate::oas::resolver::types::resolve_descriptor;
use openapiv3::{ReferenceOr, Response};
use regex::Regex;
use std::sync::OnceLock;

/// Description of every generated success response.
pub const SUCCESS_DESCRIPTION: &str = "A successful response.";

/// Resolves the response for `type_name`. Problems are recorded against
/// `location` and yield `None`.
pub fn resolve_response(
    location: &str,
    type_name: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Option<ReferenceOr<Response>> {
    let name = type_name.trim();
    if ctx.responses.contains_key(name) {
        tracing::debug!(response = %name, "response cache hit");
        return Some(response_ref(name));
    }

    let schema = TypeDescriptor::parse(name).and_then(|d| resolve_descriptor(&d, ctx));
    let schema = match schema {
        Ok(schema) => schema,
        Err(error) => {
            ctx.warn(location, error);
            return None;
        }
    };

    let response = json_response(SUCCESS_DESCRIPTION, Some(schema));
    if is_component_name(name) {
        ctx.responses.insert(name.to_string(), response);
        Some(response_ref(name))
    } else {
        Some(ReferenceOr::Item(response))
    }
}

fn is_component_name(name: &str) -> bool {
    static COMPONENT_RE: OnceLock<Regex> = OnceLock::new();
    COMPONENT_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("Invalid regex"))
        .is_match(name)
}

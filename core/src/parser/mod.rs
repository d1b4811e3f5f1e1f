#![deny(missing_docs)]

//! # Parser Module
//!
//! Loads the interface description (routes, record types, member tags) from
//! JSON or YAML into the input model consumed by the resolver.

pub mod attributes;
pub mod models;

use crate::error::AppResult;

pub use attributes::{parse_tags, Tag, TagKey};
pub use models::{
    check_deprecated, ApiSpec, AtDoc, Group, Member, Properties, RecordType, Route, Service,
    TypeTable,
};

/// Parses an interface description from JSON text.
pub fn parse_api_json(content: &str) -> AppResult<ApiSpec> {
    Ok(serde_json::from_str(content)?)
}

/// Parses an interface description from YAML text.
pub fn parse_api_yaml(content: &str) -> AppResult<ApiSpec> {
    Ok(serde_yaml::from_str(content)?)
}

/// Parses an interface description, choosing JSON when the text starts with
/// `{` and YAML otherwise.
pub fn parse_api_spec(content: &str) -> AppResult<ApiSpec> {
    if content.trim_start().starts_with('{') {
        parse_api_json(content)
    } else {
        parse_api_yaml(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_parse_json_description() {
        let json = r#"{
            "service": { "name": "demo", "groups": [] },
            "types": [
                { "name": "Pair", "members": [
                    { "name": "Left", "type": "int", "tag": "json:\"left\"" }
                ] }
            ]
        }"#;
        let spec = parse_api_spec(json).unwrap();
        assert_eq!(spec.service.name, "demo");
        assert_eq!(spec.types[0].members[0].field_name(), "left");
    }

    #[test]
    fn test_parse_yaml_description() {
        let spec = parse_api_spec("service:\n  name: demo\n").unwrap();
        assert_eq!(spec.service.name, "demo");
        assert!(spec.types.is_empty());
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        assert!(matches!(
            parse_api_spec("{ not json"),
            Err(AppError::Json(_))
        ));
        assert!(matches!(
            parse_api_spec("types: 3"),
            Err(AppError::Yaml(_))
        ));
    }
}

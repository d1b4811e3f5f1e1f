#![deny(missing_docs)]

//! # Struct Tags
//!
//! Parsing of member declaration tags such as
//! `` `json:"name,optional" validate:"required,min=1"` ``.

use crate::oas::models::ParameterIn;
use regex::Regex;
use std::sync::OnceLock;

/// The key of a declaration tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// `json:"..."`: body field.
    Json,
    /// `form:"..."`: query string field.
    Form,
    /// `header:"..."`: header field.
    Header,
    /// `path:"..."`: path segment field.
    Path,
    /// `validate:"..."`: validator constraints.
    Validate,
    /// Anything else; ignored by the resolver.
    Other(String),
}

impl TagKey {
    /// Maps a raw key to its variant.
    pub fn parse(key: &str) -> Self {
        match key {
            "json" => TagKey::Json,
            "form" => TagKey::Form,
            "header" => TagKey::Header,
            "path" => TagKey::Path,
            "validate" => TagKey::Validate,
            other => TagKey::Other(other.to_string()),
        }
    }

    /// Whether the tag names the field on the wire (and carries transport options).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TagKey::Json | TagKey::Form | TagKey::Header | TagKey::Path
        )
    }

    /// The parameter location this key selects. `json` and non-transport keys
    /// select the body and return `None`.
    pub fn location(&self) -> Option<ParameterIn> {
        match self {
            TagKey::Form => Some(ParameterIn::Query),
            TagKey::Header => Some(ParameterIn::Header),
            TagKey::Path => Some(ParameterIn::Path),
            _ => None,
        }
    }
}

/// A single parsed declaration tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag key.
    pub key: TagKey,
    /// First comma separated token of the value (the field name for transport tags).
    pub name: String,
    /// Remaining tokens.
    pub options: Vec<String>,
}

impl Tag {
    /// Builds a tag from its key and unquoted value.
    pub fn new(key: &str, value: &str) -> Self {
        let mut tokens = split_tag_value(value).into_iter();
        let name = tokens.next().unwrap_or_default();
        Tag {
            key: TagKey::parse(key),
            name,
            options: tokens.collect(),
        }
    }

    /// Name followed by all options, in declaration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.options.iter().map(String::as_str))
    }

    /// Re-assembles the tag value, used in diagnostics.
    pub fn value(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(",")
    }
}

/// Parses a whole tag string into its tags, in order.
///
/// Accepts the string with or without surrounding backticks. Malformed
/// fragments between well-formed `key:"value"` pairs are ignored.
pub fn parse_tags(raw: &str) -> Vec<Tag> {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE
        .get_or_init(|| Regex::new(r#"([\w-]+):"((?:[^"\\]|\\.)*)""#).expect("Invalid regex"));

    let raw = raw.trim().trim_matches('`');
    tag_re
        .captures_iter(raw)
        .map(|caps| {
            let value = caps[2].replace("\\\"", "\"").replace("\\\\", "\\");
            Tag::new(&caps[1], &value)
        })
        .collect()
}

/// Splits a tag value on commas that are not nested in `[]` or `()`.
///
/// Keeps `options=[a,b]` and `range=[1:10)` together as single tokens.
fn split_tag_value(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in value.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tokens.push(current);
    tokens
}

//! The `validate` tag: `required`, `dive`, `oneof`, length and numeric
//! bounds, `len`/`eq`.

use super::values::{
    is_numeric, max_length_slot, min_length_slot, parse_bound, parse_scalar, set_enum,
    tighten_maximum, tighten_minimum, unescape, Bound,
};
use super::FieldRequirement;
use crate::error::ResolveError;
use crate::oas::models::{label, RefOrExt};
use crate::parser::Tag;
use openapiv3::{AdditionalProperties, ObjectType, ReferenceOr, Schema, SchemaKind, Type};
use serde_json::Value;

/// Applies a validate tag to `target`. Tokens between `keys` and `endkeys`
/// describe map keys and are ignored.
pub(crate) fn apply_validate_tag(
    target: &mut ReferenceOr<Schema>,
    tag: &Tag,
    requirement: &mut FieldRequirement,
    problems: &mut Vec<ResolveError>,
) {
    let mut in_keys = false;
    let mut tokens = Vec::new();
    for token in tag.tokens() {
        match token {
            "keys" => in_keys = true,
            "endkeys" => in_keys = false,
            _ if in_keys || token.is_empty() => {}
            _ => tokens.push(token),
        }
    }

    if tokens.iter().any(|t| t.contains('|')) {
        problems.push(ResolveError::UnsupportedConstraintGroup(tag.value()));
        return;
    }
    apply_tokens(target.as_inline_mut(), &tokens, requirement, problems);
}

fn apply_tokens(
    node: Option<&mut Schema>,
    tokens: &[&str],
    requirement: &mut FieldRequirement,
    problems: &mut Vec<ResolveError>,
) {
    let Some(node) = node else {
        tracing::debug!(?tokens, "validate constraints on a shared schema are ignored");
        return;
    };

    for (i, token) in tokens.iter().enumerate() {
        match *token {
            "required" => {
                if node.schema_data.nullable {
                    node.schema_data.nullable = false;
                } else {
                    requirement.allow_empty = false;
                }
            }
            "dive" => {
                let rest = &tokens[i + 1..];
                if rest.is_empty() {
                    problems.push(ResolveError::TrailingDive);
                    return;
                }
                let label = label(node);
                match &mut node.schema_kind {
                    SchemaKind::Type(Type::Array(array)) => {
                        let items = array
                            .items
                            .as_mut()
                            .and_then(|items| items.as_inline_mut())
                            .map(|items| &mut **items);
                        apply_tokens(items, rest, requirement, problems);
                    }
                    SchemaKind::Type(Type::Object(ObjectType {
                        additional_properties: Some(AdditionalProperties::Schema(value)),
                        ..
                    })) => apply_tokens(value.as_inline_mut(), rest, requirement, problems),
                    _ => problems.push(ResolveError::IncompatibleDive(label)),
                }
                return;
            }
            option => {
                if let Err(reason) = apply_option(node, option) {
                    problems.push(ResolveError::constraint(option, reason));
                }
            }
        }
    }
}

/// Applies a single `key=value` validator. Unknown validators are ignored.
fn apply_option(node: &mut Schema, option: &str) -> Result<(), String> {
    let Some((key, value)) = option.split_once('=') else {
        return Ok(());
    };
    match key {
        "oneof" => {
            let values = split_oneof(value)
                .iter()
                .map(|item| parse_scalar(node, item))
                .collect::<Result<Vec<_>, _>>()?;
            set_enum(node, &values);
        }
        "min" | "gte" | "gt" => {
            let exclusive = key == "gt";
            if is_numeric(node) {
                let bound = parse_bound(node, value)?;
                tighten_minimum(node, bound, exclusive);
            } else if let Some(slot) = min_length_slot(node) {
                let bound = parse_length(value)?;
                let bound = if exclusive {
                    bound.checked_add(1).ok_or("length bound overflows")?
                } else {
                    bound
                };
                *slot = Some(slot.map_or(bound, |current| current.max(bound)));
            }
        }
        "max" | "lte" | "lt" => {
            let exclusive = key == "lt";
            if is_numeric(node) {
                let bound = parse_bound(node, value)?;
                tighten_maximum(node, bound, exclusive);
            } else if let Some(slot) = max_length_slot(node) {
                let bound = parse_length(value)?;
                let bound = if exclusive {
                    bound.checked_sub(1).ok_or("length bound is below zero")?
                } else {
                    bound
                };
                *slot = Some(slot.map_or(bound, |current| current.min(bound)));
            }
        }
        "len" | "eq" => {
            let string = matches!(node.schema_kind, SchemaKind::Type(Type::String(_)));
            if is_numeric(node) {
                let bound = parse_bound(node, value)?;
                set_enum(node, &[Bound::into_value(bound)]);
            } else if string && key == "eq" {
                set_enum(node, &[Value::String(value.to_string())]);
            } else if min_length_slot(node).is_some() {
                let length = parse_length(value)?;
                if let Some(slot) = min_length_slot(node) {
                    *slot = Some(length);
                }
                if let Some(slot) = max_length_slot(node) {
                    *slot = Some(length);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_length(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("\"{}\" is not a length", value))
}

/// Splits `'a b' 'c'` on quoted items, or `a b c` on spaces, unescaping each.
fn split_oneof(value: &str) -> Vec<String> {
    if value.contains('\'') {
        let trimmed = value.strip_prefix('\'').unwrap_or(value);
        let trimmed = trimmed.strip_suffix('\'').unwrap_or(trimmed);
        trimmed.split("' '").map(unescape).collect()
    } else {
        value
            .split(' ')
            .filter(|item| !item.is_empty())
            .map(unescape)
            .collect()
    }
}

//! Options of transport tags (`json`, `form`, `header`, `path`):
//! `optional`, `omitempty`, `default=`, `options=` and `range=`.

use super::values::{
    has_enum, parse_bound, parse_value, set_enum, tighten_maximum, tighten_minimum,
};
use super::FieldRequirement;
use crate::error::ResolveError;
use crate::oas::models::RefOrExt;
use openapiv3::{ReferenceOr, Schema};

const DEFAULT: &str = "default=";
const OPTIONS: &str = "options=";
const RANGE: &str = "range=";

/// Applies a single transport option. Referenced schemas only see the
/// required-ness effect.
pub(crate) fn apply_transport_option(
    target: &mut ReferenceOr<Schema>,
    option: &str,
    requirement: &mut FieldRequirement,
) -> Result<(), ResolveError> {
    let option = option.trim();
    if option == "optional" || option == "omitempty" {
        requirement.required = false;
        return Ok(());
    }

    if let Some(value) = option.strip_prefix(DEFAULT) {
        requirement.required = false;
        if let Some(node) = target.as_inline_mut() {
            match parse_value(node, value) {
                Ok(default) => node.schema_data.default = Some(default),
                Err(reason) => tracing::debug!(option, %reason, "dropping default value"),
            }
        }
        return Ok(());
    }

    let Some(node) = target.as_inline_mut() else {
        return Ok(());
    };
    if let Some(value) = option.strip_prefix(OPTIONS) {
        return fill_enum(node, value).map_err(|reason| ResolveError::constraint(option, reason));
    }
    if let Some(value) = option.strip_prefix(RANGE) {
        return fill_range(node, value).map_err(|reason| ResolveError::constraint(option, reason));
    }
    Ok(())
}

/// Sets the enum from `[a,b]`, `(a,b)` or `a|b`, unless one is already set.
fn fill_enum(node: &mut Schema, list: &str) -> Result<(), String> {
    if has_enum(node) {
        return Ok(());
    }
    let bracketed = (list.starts_with('[') && list.ends_with(']'))
        || (list.starts_with('(') && list.ends_with(')'));
    let items: Vec<&str> = if bracketed && list.len() >= 2 {
        list[1..list.len() - 1].split(',').collect()
    } else {
        list.split('|').collect()
    };
    let items: Vec<&str> = items
        .into_iter()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        return Err("empty options list".to_string());
    }

    let values = items
        .into_iter()
        .map(|item| parse_value(node, item))
        .collect::<Result<Vec<_>, _>>()?;
    set_enum(node, &values);
    Ok(())
}

/// Merges `[lo:hi]` bounds; `(`/`)` mark exclusive ends, either side may
/// be empty.
fn fill_range(node: &mut Schema, range: &str) -> Result<(), String> {
    let invalid = || format!("invalid range \"{}\"", range);
    if range.len() < 2 {
        return Err(invalid());
    }
    let exclusive_min = match range.as_bytes()[0] {
        b'[' => false,
        b'(' => true,
        _ => return Err(invalid()),
    };
    let exclusive_max = match range.as_bytes()[range.len() - 1] {
        b']' => false,
        b')' => true,
        _ => return Err(invalid()),
    };
    let (low, high) = range[1..range.len() - 1]
        .split_once(':')
        .ok_or_else(invalid)?;
    if high.contains(':') {
        return Err(invalid());
    }

    let low = low.trim();
    let high = high.trim();
    let low = (!low.is_empty()).then(|| parse_bound(node, low)).transpose()?;
    let high = (!high.is_empty()).then(|| parse_bound(node, high)).transpose()?;
    if let Some(low) = low {
        tighten_minimum(node, low, exclusive_min);
    }
    if let Some(high) = high {
        tighten_maximum(node, high, exclusive_max);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::descriptor::Primitive;
    use crate::oas::models::{as_integer, as_number, as_string, schema_ref};
    use serde_json::json;

    fn apply(node: Schema, option: &str) -> (Schema, FieldRequirement, Result<(), ResolveError>) {
        let mut target = ReferenceOr::Item(node);
        let mut requirement = FieldRequirement::default();
        let result = apply_transport_option(&mut target, option, &mut requirement);
        match target {
            ReferenceOr::Item(node) => (node, requirement, result),
            ReferenceOr::Reference { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_default_parses_per_kind() {
        let (node, req, _) = apply(Primitive::Int.schema(), "default=7");
        assert!(!req.required);
        assert_eq!(node.schema_data.default, Some(json!(7)));

        let (node, req, result) = apply(Primitive::Bool.schema(), "default=maybe");
        assert!(!req.required);
        assert!(result.is_ok());
        assert_eq!(node.schema_data.default, None);

        let (node, _, _) = apply(Primitive::String.schema(), "default=abc");
        assert_eq!(node.schema_data.default, Some(json!("abc")));
    }

    #[test]
    fn test_options_forms_and_first_writer_wins() {
        let (node, _, _) = apply(Primitive::String.schema(), "options=[a,b]");
        assert_eq!(
            as_string(&node).unwrap().enumeration,
            vec![Some("a".to_string()), Some("b".to_string())]
        );

        let (node, _, _) = apply(Primitive::Int.schema(), "options=1|2|3");
        assert_eq!(as_integer(&node).unwrap().enumeration, vec![Some(1), Some(2), Some(3)]);

        let (node, _, _) = apply(node, "options=(4,5)");
        assert_eq!(as_integer(&node).unwrap().enumeration, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_options_parse_failure() {
        let (node, _, result) = apply(Primitive::Int.schema(), "options=[1,x]");
        assert!(matches!(result, Err(ResolveError::ConstraintParseFailure { .. })));
        assert!(as_integer(&node).unwrap().enumeration.is_empty());
    }

    #[test]
    fn test_half_open_range() {
        let (node, _, result) = apply(Primitive::Int.schema(), "range=[1:10)");
        assert!(result.is_ok());
        let integer = as_integer(&node).unwrap();
        assert_eq!(integer.minimum, Some(1));
        assert!(!integer.exclusive_minimum);
        assert_eq!(integer.maximum, Some(10));
        assert!(integer.exclusive_maximum);

        let (node, _, _) = apply(Primitive::Float64.schema(), "range=(0:]");
        let number = as_number(&node).unwrap();
        assert_eq!(number.minimum, Some(0.0));
        assert!(number.exclusive_minimum);
        assert_eq!(number.maximum, None);
    }

    #[test]
    fn test_range_rejected_for_strings() {
        let (node, _, result) = apply(Primitive::String.schema(), "range=[1:2]");
        assert!(result.is_err());
        assert_eq!(node, Primitive::String.schema());
        let (_, _, result) = apply(Primitive::Int.schema(), "range=1:2");
        assert!(result.is_err());
    }

    #[test]
    fn test_reference_only_sees_required_ness() {
        let mut target = schema_ref("User");
        let mut requirement = FieldRequirement::default();
        apply_transport_option(&mut target, "default=x", &mut requirement).unwrap();
        apply_transport_option(&mut target, "range=[1:2]", &mut requirement).unwrap();
        assert!(!requirement.required);
        assert_eq!(target.ref_name(), Some("User"));
    }
}

#![deny(missing_docs)]

//! # Constraint Tags
//!
//! Turns the tags of a member into schema constraints (bounds, enum,
//! default, nullability) and decides whether the member is required and
//! whether it may be sent empty.

mod options;
mod validate;
mod values;

use crate::error::ResolveError;
use crate::parser::{Tag, TagKey};
use openapiv3::{ReferenceOr, Schema};

/// Outcome of applying a member's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRequirement {
    /// Whether the member must be present.
    pub required: bool,
    /// Whether an empty value is accepted.
    pub allow_empty: bool,
}

impl Default for FieldRequirement {
    fn default() -> Self {
        FieldRequirement {
            required: true,
            allow_empty: true,
        }
    }
}

/// Applies every tag of a member to its schema, in declaration order.
///
/// A referenced (shared) schema is never mutated; only options affecting
/// required-ness apply to it. Problems drop the offending token and are
/// pushed to `problems`.
pub fn apply_constraints(
    target: &mut ReferenceOr<Schema>,
    tags: &[Tag],
    problems: &mut Vec<ResolveError>,
) -> FieldRequirement {
    let mut requirement = FieldRequirement::default();
    for tag in tags {
        match &tag.key {
            key if key.is_transport() => {
                for option in &tag.options {
                    if let Err(error) =
                        options::apply_transport_option(target, option, &mut requirement)
                    {
                        problems.push(error);
                    }
                }
            }
            TagKey::Validate => {
                validate::apply_validate_tag(target, tag, &mut requirement, problems)
            }
            _ => {}
        }
    }
    requirement
}

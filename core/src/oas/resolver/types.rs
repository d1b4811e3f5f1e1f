#![deny(missing_docs)]

//! # Type Resolution
//!
//! Maps a [`TypeDescriptor`] to a schema. Named records resolve to
//! references into the schema registry; everything else is inline.

use crate::error::ResolveError;
use crate::oas::context::ResolutionContext;
use crate::oas::descriptor::TypeDescriptor;
use crate::oas::models::{array_of, map_of, nullable_ref, typed};
use crate::oas::resolver::structs::build_struct;
use openapiv3::{ReferenceOr, Schema, SchemaData, SchemaKind, Type};

/// Parses and resolves a textual descriptor.
pub fn resolve_schema(
    text: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Result<ReferenceOr<Schema>, ResolveError> {
    let descriptor = TypeDescriptor::parse(text)?;
    resolve_descriptor(&descriptor, ctx)
}

/// Resolves an already parsed descriptor.
///
/// # Arguments
///
/// * `descriptor` - The parsed descriptor.
/// * `ctx` - The pass state; named records are registered here.
pub fn resolve_descriptor(
    descriptor: &TypeDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<ReferenceOr<Schema>, ResolveError> {
    match descriptor {
        TypeDescriptor::Map { value } => {
            let object = map_of(resolve_descriptor(value, ctx)?);
            Ok(ReferenceOr::Item(nullable(Type::Object(object))))
        }
        TypeDescriptor::Slice(elem) => {
            let array = array_of(resolve_descriptor(elem, ctx)?);
            Ok(ReferenceOr::Item(nullable(Type::Array(array))))
        }
        TypeDescriptor::Array { len, elem } => {
            let mut array = array_of(resolve_descriptor(elem, ctx)?);
            array.min_items = Some(*len as usize);
            array.max_items = Some(*len as usize);
            Ok(ReferenceOr::Item(typed(Type::Array(array))))
        }
        TypeDescriptor::Pointer(inner) => {
            let mut resolved = resolve_descriptor(inner, ctx)?;
            if let Some(node) = ctx.make_mut(&mut resolved) {
                node.schema_data.nullable = true;
                return Ok(resolved);
            }
            // A record under construction cannot be copied yet.
            Ok(ReferenceOr::Item(nullable_ref(resolved)))
        }
        TypeDescriptor::Primitive(primitive) => Ok(ReferenceOr::Item(primitive.schema())),
        TypeDescriptor::Named(name) => match ctx.record(name) {
            Some(record) => Ok(build_struct(record, ctx)),
            None => Err(ResolveError::UnknownType(name.clone())),
        },
    }
}

fn nullable(kind: Type) -> Schema {
    Schema {
        schema_data: SchemaData {
            nullable: true,
            ..Default::default()
        },
        schema_kind: SchemaKind::Type(kind),
    }
}

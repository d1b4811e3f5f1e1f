#![deny(missing_docs)]

//! # Record Schemas
//!
//! Builds the schema of a named record type. Each record is registered once
//! under its name; every use site receives a reference.

use crate::oas::constraints::apply_constraints;
use crate::oas::context::ResolutionContext;
use crate::oas::models::{as_object, boxed, object_schema, require, schema_ref};
use crate::oas::resolver::types::resolve_schema;
use crate::parser::{Member, RecordType};
use openapiv3::{ObjectType, ReferenceOr, Schema, SchemaData};
use std::collections::HashSet;

/// Builds (or reuses) the schema of `record` and returns a reference to it.
///
/// The placeholder is registered before any member is resolved, so
/// self-referencing records terminate.
pub fn build_struct(record: &RecordType, ctx: &mut ResolutionContext<'_>) -> ReferenceOr<Schema> {
    let reference = schema_ref(&record.name);
    if ctx.schemas.contains(&record.name) {
        tracing::debug!(schema = %record.name, "schema cache hit");
        return reference;
    }

    let metadata = SchemaData {
        title: Some(record.name.clone()),
        description: record.description(),
        deprecated: record.is_deprecated(),
        ..Default::default()
    };
    ctx.schemas.reserve(
        &record.name,
        object_schema(metadata.clone(), ObjectType::default()),
    );

    let mut object = ObjectType::default();
    // Names of direct members that made it into the schema.
    let mut direct = HashSet::new();
    for member in &record.members {
        let location = member_location(record, member);
        if member.is_anonymous() {
            match ctx.embedded_record(member) {
                Ok(embedded) => merge_embedded(&mut object, embedded, &direct, ctx),
                Err(error) => ctx.warn(&location, error),
            }
            continue;
        }

        let Some(mut field) = resolve_member(&location, member, ctx) else {
            continue;
        };
        let mut problems = Vec::new();
        let requirement = apply_constraints(&mut field, &member.tags, &mut problems);
        ctx.report(&location, problems);

        let name = member.field_name();
        if requirement.required {
            require(&mut object, &name);
        } else {
            object.required.retain(|n| n != &name);
        }
        object.properties.shift_remove(&name);
        object.properties.insert(name.clone(), boxed(field));
        direct.insert(name);
    }

    ctx.schemas.complete(&record.name, object_schema(metadata, object));
    reference
}

/// Flattens an embedded record into `object`. Direct members are never
/// overwritten; among embedded records the later one wins.
fn merge_embedded(
    object: &mut ObjectType,
    embedded: &RecordType,
    direct: &HashSet<String>,
    ctx: &mut ResolutionContext<'_>,
) {
    build_struct(embedded, ctx);
    let Some(source) = ctx.schemas.get(&embedded.name).and_then(as_object) else {
        return;
    };
    for (name, property) in &source.properties {
        if !direct.contains(name) {
            object.properties.insert(name.clone(), property.clone());
        }
    }
    for name in &source.required {
        if !direct.contains(name) {
            require(object, name);
        }
    }
}

/// Resolves a named member and decorates it with its description and
/// deprecation flag. Problems are recorded against `location`.
pub(crate) fn resolve_member(
    location: &str,
    member: &Member,
    ctx: &mut ResolutionContext<'_>,
) -> Option<ReferenceOr<Schema>> {
    let mut field = match resolve_schema(&member.ty, ctx) {
        Ok(field) => field,
        Err(error) => {
            ctx.warn(location, error);
            return None;
        }
    };

    let description = member.description();
    let deprecated = member.is_deprecated();
    if description.is_some() || deprecated {
        if let Some(node) = ctx.make_mut(&mut field) {
            if description.is_some() {
                node.schema_data.description = description;
            }
            node.schema_data.deprecated |= deprecated;
        }
    }
    Some(field)
}

/// `Record.Member`, or `Record.<embedded Type>` for anonymous members.
pub(crate) fn member_location(record: &RecordType, member: &Member) -> String {
    if member.is_anonymous() {
        format!("{}.<embedded {}>", record.name, member.ty.trim())
    } else {
        format!("{}.{}", record.name, member.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::oas::models::{kind_name, numeric_format, RefOrExt};
    use crate::parser::TypeTable;
    use serde_json::json;

    fn table(records: Vec<RecordType>) -> TypeTable {
        records.into_iter().map(|r| (r.name.clone(), r)).collect()
    }

    fn object<'n>(ctx: &'n ResolutionContext<'_>, name: &str) -> &'n ObjectType {
        ctx.schemas().get(name).and_then(as_object).unwrap()
    }

    fn inline<'n>(object: &'n ObjectType, name: &str) -> &'n Schema {
        object.properties[name].as_inline().unwrap()
    }

    #[test]
    fn test_same_record_registered_once() {
        let types = table(vec![RecordType::new("User")
            .doc("A user.")
            .member(Member::new("Id", "int64").tag(r#"json:"id""#))]);
        let mut ctx = ResolutionContext::new(&types);
        let first = build_struct(&types["User"], &mut ctx);
        let second = build_struct(&types["User"], &mut ctx);
        assert_eq!(first, second);
        assert_eq!(ctx.schemas().len(), 1);

        let user = ctx.schemas().get("User").unwrap();
        assert_eq!(user.schema_data.title.as_deref(), Some("User"));
        assert_eq!(user.schema_data.description.as_deref(), Some("A user."));
        assert_eq!(object(&ctx, "User").required, vec!["id"]);
    }

    #[test]
    fn test_pointer_self_reference_terminates() {
        let types = table(vec![RecordType::new("Node")
            .member(Member::new("Value", "int").tag(r#"json:"value""#))
            .member(Member::new("Next", "*Node").tag(r#"json:"next,optional""#))]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["Node"], &mut ctx);

        let node = object(&ctx, "Node");
        assert_eq!(
            serde_json::to_value(&node.properties["next"]).unwrap(),
            json!({"nullable": true, "allOf": [{"$ref": "#/components/schemas/Node"}]})
        );
        assert_eq!(node.required, vec!["value"]);
    }

    #[test]
    fn test_mutually_recursive_records() {
        let types = table(vec![
            RecordType::new("A").member(Member::new("B", "*B").tag(r#"json:"b""#)),
            RecordType::new("B").member(Member::new("A", "*A").tag(r#"json:"a""#)),
        ]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["A"], &mut ctx);

        assert_eq!(ctx.schemas().len(), 2);
        assert!(ctx.schemas().is_complete("A"));
        assert!(ctx.schemas().is_complete("B"));

        let back_reference = json!({"nullable": true, "allOf": [{"$ref": "#/components/schemas/A"}]});
        assert_eq!(
            serde_json::to_value(&object(&ctx, "B").properties["a"]).unwrap(),
            back_reference
        );

        let b = inline(object(&ctx, "A"), "b");
        assert!(b.schema_data.nullable);
        assert_eq!(b.schema_data.title.as_deref(), Some("B"));
        assert_eq!(
            serde_json::to_value(&as_object(b).unwrap().properties["a"]).unwrap(),
            back_reference
        );
    }

    #[test]
    fn test_direct_member_shadows_embedded() {
        let types = table(vec![
            RecordType::new("A")
                .member(Member::embedded("B"))
                .member(Member::new("X", "int").tag(r#"json:"x,optional""#)),
            RecordType::new("B")
                .member(Member::new("X", "string").tag(r#"json:"x""#))
                .member(Member::new("Y", "bool").tag(r#"json:"y""#)),
        ]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["A"], &mut ctx);

        let a = object(&ctx, "A");
        assert_eq!(kind_name(inline(a, "x")), "integer");
        assert_eq!(kind_name(inline(a, "y")), "boolean");
        assert_eq!(a.required, vec!["y"]);
        assert_eq!(a.properties.keys().collect::<Vec<_>>(), vec!["y", "x"]);
    }

    #[test]
    fn test_failed_direct_member_keeps_embedded_field() {
        let types = table(vec![
            RecordType::new("A")
                .member(Member::embedded("B"))
                .member(Member::new("X", "Missing").tag(r#"json:"x""#)),
            RecordType::new("B").member(Member::new("X", "string").tag(r#"json:"x""#)),
        ]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["A"], &mut ctx);

        let a = object(&ctx, "A");
        assert_eq!(kind_name(inline(a, "x")), "string");
        assert_eq!(a.required, vec!["x"]);
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].error, ResolveError::UnknownType("Missing".into()));
    }

    #[test]
    fn test_later_embedded_overwrites_earlier() {
        let types = table(vec![
            RecordType::new("C")
                .member(Member::embedded("A"))
                .member(Member::embedded("*B")),
            RecordType::new("A").member(Member::new("V", "string").tag(r#"json:"v""#)),
            RecordType::new("B").member(Member::new("V", "float64").tag(r#"json:"v""#)),
        ]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["C"], &mut ctx);
        let c = object(&ctx, "C");
        assert_eq!(numeric_format(inline(c, "v")), Some("double"));
        assert_eq!(c.required, vec!["v"]);
    }

    #[test]
    fn test_unknown_member_type_is_skipped_with_warning() {
        let types = table(vec![RecordType::new("Req")
            .member(Member::new("Bad", "Missing").tag(r#"json:"bad""#))
            .member(Member::new("Good", "string").tag(r#"json:"good""#))
            .member(Member::embedded("int"))]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["Req"], &mut ctx);

        let req = object(&ctx, "Req");
        assert!(!req.properties.contains_key("bad"));
        assert!(req.properties.contains_key("good"));
        let warnings = ctx.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].location, "Req.Bad");
        assert_eq!(warnings[0].error, ResolveError::UnknownType("Missing".into()));
        assert_eq!(warnings[1].error, ResolveError::NotARecord("int".into()));
    }

    #[test]
    fn test_member_docs_clone_shared_schema() {
        let types = table(vec![
            RecordType::new("Outer")
                .member(Member::new("Inner", "Inner").tag(r#"json:"inner""#).comment("wrapped"))
                .member(Member::new("Plain", "Inner").tag(r#"json:"plain""#)),
            RecordType::new("Inner").member(Member::new("N", "int").tag(r#"json:"n""#)),
        ]);
        let mut ctx = ResolutionContext::new(&types);
        build_struct(&types["Outer"], &mut ctx);

        let outer = object(&ctx, "Outer");
        assert_eq!(
            inline(outer, "inner").schema_data.description.as_deref(),
            Some("wrapped")
        );
        assert_eq!(outer.properties["plain"].ref_name(), Some("Inner"));
        assert_eq!(
            ctx.schemas().get("Inner").unwrap().schema_data.description,
            None
        );
    }
}

#![deny(missing_docs)]

//! # Request Shapes
//!
//! Splits a request record into transport parameters (query, header, path)
//! and body fields, flattens embedded records, and decides between a JSON
//! and a form encoded body.

use crate::oas::constraints::apply_constraints;
use crate::oas::context::ResolutionContext;
use crate::oas::models::{
    boxed, object_schema, request_body, request_body_ref, require, BodyFormat, ParameterIn,
    RefOrExt,
};
use crate::oas::resolver::structs::{member_location, resolve_member};
use crate::parser::RecordType;
use indexmap::IndexMap;
use openapiv3::{
    CookieStyle, HeaderStyle, ObjectType, Parameter, ParameterData, ParameterSchemaOrContent,
    PathStyle, QueryStyle, ReferenceOr, RequestBody, Schema, SchemaData,
};

/// A transport parameter before it is placed into an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParam {
    /// Wire name.
    pub name: String,
    /// Where the parameter travels.
    pub location: ParameterIn,
    /// Member description.
    pub description: Option<String>,
    /// Whether the parameter must be sent.
    pub required: bool,
    /// Whether the member is deprecated.
    pub deprecated: bool,
    /// Whether an empty value is accepted. Only emitted for query parameters.
    pub allow_empty_value: bool,
    /// Parameter schema.
    pub schema: ReferenceOr<Schema>,
}

impl RequestParam {
    /// The OpenAPI parameter object.
    pub fn to_parameter(&self) -> Parameter {
        let parameter_data = ParameterData {
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            deprecated: self.deprecated.then_some(true),
            format: ParameterSchemaOrContent::Schema(self.schema.clone()),
            example: None,
            examples: IndexMap::new(),
            explode: None,
            extensions: IndexMap::new(),
        };
        match self.location {
            ParameterIn::Query => Parameter::Query {
                parameter_data,
                allow_reserved: false,
                style: QueryStyle::Form,
                allow_empty_value: self.allow_empty_value.then_some(true),
            },
            ParameterIn::Header => Parameter::Header {
                parameter_data,
                style: HeaderStyle::Simple,
            },
            ParameterIn::Path => Parameter::Path {
                parameter_data,
                style: PathStyle::Simple,
            },
            ParameterIn::Cookie => Parameter::Cookie {
                parameter_data,
                style: CookieStyle::Form,
            },
        }
    }
}

/// Parameters and body fields of a request record, before the encoding
/// decision. Cached per record name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequestShape {
    /// Transport parameters, unique by name.
    pub params: Vec<RequestParam>,
    /// Body fields.
    pub body: ObjectType,
}

impl RawRequestShape {
    /// Merges `other` into `self`. Parameters replace earlier ones of the
    /// same name in place; body fields replace by name; required names are
    /// unioned.
    fn merge(&mut self, other: RawRequestShape) {
        for param in other.params {
            match self.params.iter_mut().find(|p| p.name == param.name) {
                Some(existing) => *existing = param,
                None => self.params.push(param),
            }
        }
        self.body.properties.extend(other.body.properties);
        for name in &other.body.required {
            require(&mut self.body, name);
        }
    }
}

/// The final request of a route: parameters plus an optional body reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestShape {
    /// Parameters in declaration order.
    pub parameters: Vec<RequestParam>,
    /// Reference into `components.requestBodies`, if there is a body.
    pub body: Option<ReferenceOr<RequestBody>>,
    /// Encoding of the body, if there is one.
    pub format: Option<BodyFormat>,
}

/// Builds (or reuses) the request shape of `record`.
///
/// A record without body fields but with query parameters becomes a form
/// body carrying those fields; required query parameters are then demoted
/// to optional since they may arrive through either channel.
pub fn build_request_shape(record: &RecordType, ctx: &mut ResolutionContext<'_>) -> RequestShape {
    if let Some(shape) = ctx.requests.get(&record.name) {
        tracing::debug!(request = %record.name, "request cache hit");
        return shape.clone();
    }

    let raw = build_raw_shape(record, ctx);
    let mut parameters = raw.params;
    let metadata = SchemaData {
        title: Some(record.name.clone()),
        description: record.description(),
        deprecated: record.is_deprecated(),
        ..Default::default()
    };
    let mut body = ObjectType::default();

    let has_query = parameters.iter().any(|p| p.location == ParameterIn::Query);
    let format = if raw.body.properties.is_empty() && has_query {
        for param in parameters
            .iter_mut()
            .filter(|p| p.location == ParameterIn::Query)
        {
            body.properties
                .insert(param.name.clone(), boxed(param.schema.clone()));
            if param.required {
                param.required = false;
                param.allow_empty_value = true;
            }
        }
        Some(BodyFormat::Form)
    } else if !raw.body.properties.is_empty() {
        body = raw.body;
        Some(BodyFormat::Json)
    } else {
        None
    };

    let body = format.map(|format| {
        let schema = object_schema(metadata, body);
        ctx.request_bodies
            .insert(record.name.clone(), request_body(format, schema));
        request_body_ref(&record.name)
    });

    let shape = RequestShape {
        parameters,
        body,
        format,
    };
    ctx.requests.insert(record.name.clone(), shape.clone());
    shape
}

/// Collects parameters and body fields: embedded records first, in
/// declaration order, then direct members.
fn build_raw_shape(record: &RecordType, ctx: &mut ResolutionContext<'_>) -> RawRequestShape {
    if let Some(shape) = ctx.raw_requests.get(&record.name) {
        return shape.clone();
    }
    if !ctx.pending_requests.insert(record.name.clone()) {
        tracing::debug!(request = %record.name, "request record embeds itself, skipping");
        return RawRequestShape::default();
    }

    let mut embedded = Vec::new();
    let mut local = RawRequestShape::default();
    for member in &record.members {
        let location = member_location(record, member);
        if member.is_anonymous() {
            match ctx.embedded_record(member) {
                Ok(inner) => embedded.push(build_raw_shape(inner, ctx)),
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
        match member.location() {
            Some(param_in) => {
                let inline = field.as_inline();
                let param = RequestParam {
                    description: inline.and_then(|n| n.schema_data.description.clone()),
                    deprecated: inline.is_some_and(|n| n.schema_data.deprecated),
                    required: requirement.required || param_in == ParameterIn::Path,
                    allow_empty_value: param_in == ParameterIn::Query && requirement.allow_empty,
                    name,
                    location: param_in,
                    schema: field,
                };
                local.merge(RawRequestShape {
                    params: vec![param],
                    body: ObjectType::default(),
                });
            }
            None => {
                if requirement.required {
                    require(&mut local.body, &name);
                }
                local.body.properties.insert(name, boxed(field));
            }
        }
    }

    let mut shape = RawRequestShape::default();
    for inner in embedded {
        shape.merge(inner);
    }
    shape.merge(local);

    ctx.pending_requests.remove(&record.name);
    ctx.raw_requests.insert(record.name.clone(), shape.clone());
    shape
}

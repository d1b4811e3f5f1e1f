#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Documents are built from `openapiv3` types. This module holds the few
//! concepts it has no type for (parameter locations, body encodings) and
//! small helpers for building and inspecting schemas.

use indexmap::IndexMap;
use openapiv3::{
    AdditionalProperties, ArrayType, ExternalDocumentation, IntegerFormat, IntegerType,
    MediaType, NumberFormat, NumberType, ObjectType, Parameter, ParameterData, ReferenceOr,
    RequestBody, Response, Schema, SchemaData, SchemaKind, SecurityScheme, StringType, Type,
    VariantOrUnknownOrEmpty,
};

/// Media type of JSON bodies.
pub const MEDIA_JSON: &str = "application/json";
/// Media type of multipart form bodies.
pub const MEDIA_MULTIPART: &str = "multipart/form-data";
/// Media type of url-encoded form bodies.
pub const MEDIA_FORM: &str = "application/x-www-form-urlencoded";

/// Inline access to a [`ReferenceOr`] without resolving references.
pub trait RefOrExt<T> {
    /// The inline value, if this is not a reference.
    fn as_inline(&self) -> Option<&T>;
    /// Mutable access to the inline value, if this is not a reference.
    fn as_inline_mut(&mut self) -> Option<&mut T>;
    /// The component name a reference points at (last pointer segment).
    fn ref_name(&self) -> Option<&str>;
}

impl<T> RefOrExt<T> for ReferenceOr<T> {
    fn as_inline(&self) -> Option<&T> {
        match self {
            ReferenceOr::Item(value) => Some(value),
            ReferenceOr::Reference { .. } => None,
        }
    }

    fn as_inline_mut(&mut self) -> Option<&mut T> {
        match self {
            ReferenceOr::Item(value) => Some(value),
            ReferenceOr::Reference { .. } => None,
        }
    }

    fn ref_name(&self) -> Option<&str> {
        match self {
            ReferenceOr::Reference { reference } => reference.rsplit('/').next(),
            ReferenceOr::Item(_) => None,
        }
    }
}

fn component_ref<T>(section: &str, name: &str) -> ReferenceOr<T> {
    ReferenceOr::Reference {
        reference: format!("#/components/{}/{}", section, name),
    }
}

/// Reference to `#/components/schemas/{name}`.
pub fn schema_ref<T>(name: &str) -> ReferenceOr<T> {
    component_ref("schemas", name)
}

/// Reference to `#/components/requestBodies/{name}`.
pub fn request_body_ref<T>(name: &str) -> ReferenceOr<T> {
    component_ref("requestBodies", name)
}

/// Reference to `#/components/responses/{name}`.
pub fn response_ref<T>(name: &str) -> ReferenceOr<T> {
    component_ref("responses", name)
}

/// Moves a schema into the boxed form used by properties and items.
pub fn boxed(schema: ReferenceOr<Schema>) -> ReferenceOr<Box<Schema>> {
    match schema {
        ReferenceOr::Reference { reference } => ReferenceOr::Reference { reference },
        ReferenceOr::Item(schema) => ReferenceOr::Item(Box::new(schema)),
    }
}

/// A schema of the given type without metadata.
pub fn typed(kind: Type) -> Schema {
    Schema {
        schema_data: SchemaData::default(),
        schema_kind: SchemaKind::Type(kind),
    }
}

/// An object schema carrying `schema_data`.
pub fn object_schema(schema_data: SchemaData, object: ObjectType) -> Schema {
    Schema {
        schema_data,
        schema_kind: SchemaKind::Type(Type::Object(object)),
    }
}

/// An array of `items` without length bounds.
pub fn array_of(items: ReferenceOr<Schema>) -> ArrayType {
    ArrayType {
        items: Some(boxed(items)),
        min_items: None,
        max_items: None,
        unique_items: false,
    }
}

/// A map: an object whose values follow `value`.
pub fn map_of(value: ReferenceOr<Schema>) -> ObjectType {
    ObjectType {
        additional_properties: Some(AdditionalProperties::Schema(Box::new(value))),
        ..Default::default()
    }
}

/// `allOf: [reference]` marked nullable. Used where a reference cannot be
/// copied but must still accept `null`.
pub fn nullable_ref(reference: ReferenceOr<Schema>) -> Schema {
    Schema {
        schema_data: SchemaData {
            nullable: true,
            ..Default::default()
        },
        schema_kind: SchemaKind::AllOf {
            all_of: vec![reference],
        },
    }
}

/// The schema kind as written in `type`, or `untyped` for compositions.
pub fn kind_name(schema: &Schema) -> &'static str {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(_)) => "string",
        SchemaKind::Type(Type::Number(_)) => "number",
        SchemaKind::Type(Type::Integer(_)) => "integer",
        SchemaKind::Type(Type::Object(_)) => "object",
        SchemaKind::Type(Type::Array(_)) => "array",
        SchemaKind::Type(Type::Boolean(_)) => "boolean",
        _ => "untyped",
    }
}

/// Short human readable label used in diagnostics: the title, else the kind.
pub fn label(schema: &Schema) -> String {
    schema
        .schema_data
        .title
        .clone()
        .unwrap_or_else(|| kind_name(schema).to_string())
}

fn format_name<T>(format: &VariantOrUnknownOrEmpty<T>, name: fn(&T) -> &'static str) -> Option<&str> {
    match format {
        VariantOrUnknownOrEmpty::Item(item) => Some(name(item)),
        VariantOrUnknownOrEmpty::Unknown(custom) => Some(custom.as_str()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

/// The `format` of an integer or number schema.
pub fn numeric_format(schema: &Schema) -> Option<&str> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Integer(integer)) => format_name(&integer.format, |f| match f {
            IntegerFormat::Int32 => "int32",
            IntegerFormat::Int64 => "int64",
        }),
        SchemaKind::Type(Type::Number(number)) => format_name(&number.format, |f| match f {
            NumberFormat::Float => "float",
            NumberFormat::Double => "double",
        }),
        _ => None,
    }
}

/// The object part of a schema.
pub fn as_object(schema: &Schema) -> Option<&ObjectType> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Object(object)) => Some(object),
        _ => None,
    }
}

/// The array part of a schema.
pub fn as_array(schema: &Schema) -> Option<&ArrayType> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Array(array)) => Some(array),
        _ => None,
    }
}

/// The string part of a schema.
pub fn as_string(schema: &Schema) -> Option<&StringType> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(string)) => Some(string),
        _ => None,
    }
}

/// The integer part of a schema.
pub fn as_integer(schema: &Schema) -> Option<&IntegerType> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Integer(integer)) => Some(integer),
        _ => None,
    }
}

/// The number part of a schema.
pub fn as_number(schema: &Schema) -> Option<&NumberType> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Number(number)) => Some(number),
        _ => None,
    }
}

/// Adds a name to `required` unless it is already present.
pub fn require(object: &mut ObjectType, name: &str) {
    if !object.required.iter().any(|n| n == name) {
        object.required.push(name.to_string());
    }
}

/// The data shared by every parameter location.
pub fn parameter_data(parameter: &Parameter) -> &ParameterData {
    match parameter {
        Parameter::Query { parameter_data, .. }
        | Parameter::Header { parameter_data, .. }
        | Parameter::Path { parameter_data, .. }
        | Parameter::Cookie { parameter_data, .. } => parameter_data,
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterIn {
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Path segment.
    Path,
    /// Cookie.
    Cookie,
}

/// Supported request body encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    /// `application/json`
    Json,
    /// `multipart/form-data` and `application/x-www-form-urlencoded`
    Form,
}

impl BodyFormat {
    /// Media types emitted for this format.
    pub fn media_types(self) -> &'static [&'static str] {
        match self {
            BodyFormat::Json => &[MEDIA_JSON],
            BodyFormat::Form => &[MEDIA_MULTIPART, MEDIA_FORM],
        }
    }
}

/// Builds a body carrying `schema` under every media type of `format`.
/// Only JSON bodies are required.
pub fn request_body(format: BodyFormat, schema: Schema) -> RequestBody {
    let description = schema.schema_data.description.clone();
    let content = format
        .media_types()
        .iter()
        .map(|media| {
            (
                media.to_string(),
                MediaType {
                    schema: Some(ReferenceOr::Item(schema.clone())),
                    ..Default::default()
                },
            )
        })
        .collect();
    RequestBody {
        description,
        content,
        required: format == BodyFormat::Json,
        ..Default::default()
    }
}

/// A response with an optional JSON body.
pub fn json_response(description: &str, schema: Option<ReferenceOr<Schema>>) -> Response {
    let mut response = Response {
        description: description.to_string(),
        ..Default::default()
    };
    if let Some(schema) = schema {
        response.content.insert(
            MEDIA_JSON.to_string(),
            MediaType {
                schema: Some(schema),
                ..Default::default()
            },
        );
    }
    response
}

/// HTTP bearer authentication with JWT tokens.
pub fn jwt_scheme() -> SecurityScheme {
    SecurityScheme::HTTP {
        scheme: "bearer".to_string(),
        bearer_format: Some("JWT".to_string()),
        description: None,
        extensions: IndexMap::new(),
    }
}

/// A link to external documentation.
pub fn external_docs(url: String) -> ExternalDocumentation {
    ExternalDocumentation {
        url,
        ..Default::default()
    }
}

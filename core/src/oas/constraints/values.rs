//! Literal parsing and bound tightening shared by the option and validate
//! parsers.

use crate::oas::models::{label, numeric_format};
use openapiv3::{Schema, SchemaKind, Type};
use serde_json::Value;

/// Accepts the same spellings as Go's `strconv.ParseBool`.
pub(crate) fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("\"{}\" is not a boolean", text)),
    }
}

fn integer_bits(format: Option<&str>) -> u32 {
    match format {
        Some("int8" | "uint8") => 8,
        Some("int16" | "uint16") => 16,
        Some("int32" | "uint32") => 32,
        _ => 64,
    }
}

fn is_unsigned(format: Option<&str>) -> bool {
    matches!(
        format,
        Some("uint" | "uint8" | "uint16" | "uint32" | "uint64")
    )
}

/// Parses an integer literal within the range of the schema format.
/// Integer schemas hold `i64`, so unsigned literals above `i64::MAX` are
/// out of range too.
pub(crate) fn parse_integer(format: Option<&str>, text: &str) -> Result<i64, String> {
    let bits = integer_bits(format);
    let out_of_range = || format!("\"{}\" is out of range for {}", text, format.unwrap_or("int64"));
    if is_unsigned(format) {
        let value = text
            .parse::<u64>()
            .map_err(|_| format!("\"{}\" is not an unsigned integer", text))?;
        if bits < 64 && value >= 1u64 << bits {
            return Err(out_of_range());
        }
        i64::try_from(value).map_err(|_| out_of_range())
    } else {
        let value = text
            .parse::<i64>()
            .map_err(|_| format!("\"{}\" is not an integer", text))?;
        if bits < 64 {
            let limit = 1i64 << (bits - 1);
            if value < -limit || value >= limit {
                return Err(out_of_range());
            }
        }
        Ok(value)
    }
}

/// Parses a float literal; `float` formats must fit in 32 bits.
pub(crate) fn parse_float(format: Option<&str>, text: &str) -> Result<f64, String> {
    let value = text
        .parse::<f64>()
        .map_err(|_| format!("\"{}\" is not a number", text))?;
    if !value.is_finite() {
        return Err(format!("\"{}\" is not a finite number", text));
    }
    if format == Some("float") && (value as f32).is_infinite() {
        return Err(format!("\"{}\" is out of range for float", text));
    }
    Ok(value)
}

/// A numeric literal typed like the schema it was parsed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    Integer(i64),
    Number(f64),
}

impl Bound {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Bound::Integer(value) => Value::from(value),
            Bound::Number(value) => Value::from(value),
        }
    }
}

/// Parses a numeric literal for an integer or number schema.
pub(crate) fn parse_bound(node: &Schema, text: &str) -> Result<Bound, String> {
    let format = numeric_format(node);
    match &node.schema_kind {
        SchemaKind::Type(Type::Integer(_)) => parse_integer(format, text).map(Bound::Integer),
        SchemaKind::Type(Type::Number(_)) => parse_float(format, text).map(Bound::Number),
        _ => Err(format!("bound is not valid for {} schema", label(node))),
    }
}

/// Parses a literal according to the schema kind; non-scalar kinds keep the
/// text as a string.
pub(crate) fn parse_value(node: &Schema, text: &str) -> Result<Value, String> {
    match &node.schema_kind {
        SchemaKind::Type(Type::Boolean(_)) => parse_bool(text).map(Value::Bool),
        SchemaKind::Type(Type::Integer(_) | Type::Number(_)) => {
            parse_bound(node, text).map(Bound::into_value)
        }
        _ => Ok(Value::String(text.to_string())),
    }
}

/// Like [`parse_value`], but rejects everything that is not a scalar.
pub(crate) fn parse_scalar(node: &Schema, text: &str) -> Result<Value, String> {
    match &node.schema_kind {
        SchemaKind::Type(Type::String(_) | Type::Integer(_) | Type::Number(_) | Type::Boolean(_)) => {
            parse_value(node, text)
        }
        _ => Err(format!("cannot enumerate values of {} schema", label(node))),
    }
}

pub(crate) fn is_numeric(node: &Schema) -> bool {
    matches!(
        node.schema_kind,
        SchemaKind::Type(Type::Integer(_) | Type::Number(_))
    )
}

/// Whether the schema already lists allowed values.
pub(crate) fn has_enum(node: &Schema) -> bool {
    match &node.schema_kind {
        SchemaKind::Type(Type::String(t)) => !t.enumeration.is_empty(),
        SchemaKind::Type(Type::Integer(t)) => !t.enumeration.is_empty(),
        SchemaKind::Type(Type::Number(t)) => !t.enumeration.is_empty(),
        SchemaKind::Type(Type::Boolean(t)) => !t.enumeration.is_empty(),
        _ => false,
    }
}

/// Replaces the allowed values. Values come from [`parse_value`] on the
/// same schema, so they already have its kind. Other kinds carry no enum.
pub(crate) fn set_enum(node: &mut Schema, values: &[Value]) {
    match &mut node.schema_kind {
        SchemaKind::Type(Type::String(t)) => {
            t.enumeration = values.iter().map(|v| v.as_str().map(String::from)).collect()
        }
        SchemaKind::Type(Type::Integer(t)) => {
            t.enumeration = values.iter().map(Value::as_i64).collect()
        }
        SchemaKind::Type(Type::Number(t)) => {
            t.enumeration = values.iter().map(Value::as_f64).collect()
        }
        SchemaKind::Type(Type::Boolean(t)) => {
            t.enumeration = values.iter().map(Value::as_bool).collect()
        }
        _ => tracing::debug!("enum ignored for non-scalar schema"),
    }
}

fn raise<T: PartialOrd + Copy>(slot: &mut Option<T>, exclusive_slot: &mut bool, bound: T, exclusive: bool) {
    match *slot {
        Some(current) if current > bound => {}
        Some(current) if current == bound => *exclusive_slot |= exclusive,
        _ => {
            *slot = Some(bound);
            *exclusive_slot = exclusive;
        }
    }
}

fn lower<T: PartialOrd + Copy>(slot: &mut Option<T>, exclusive_slot: &mut bool, bound: T, exclusive: bool) {
    match *slot {
        Some(current) if current < bound => {}
        Some(current) if current == bound => *exclusive_slot |= exclusive,
        _ => {
            *slot = Some(bound);
            *exclusive_slot = exclusive;
        }
    }
}

/// Raises the minimum only if `bound` is strictly higher; an equal bound can
/// only make it exclusive.
pub(crate) fn tighten_minimum(node: &mut Schema, bound: Bound, exclusive: bool) {
    match (&mut node.schema_kind, bound) {
        (SchemaKind::Type(Type::Integer(t)), Bound::Integer(b)) => {
            raise(&mut t.minimum, &mut t.exclusive_minimum, b, exclusive)
        }
        (SchemaKind::Type(Type::Number(t)), Bound::Number(b)) => {
            raise(&mut t.minimum, &mut t.exclusive_minimum, b, exclusive)
        }
        _ => {}
    }
}

/// Lowers the maximum only if `bound` is strictly lower; an equal bound can
/// only make it exclusive.
pub(crate) fn tighten_maximum(node: &mut Schema, bound: Bound, exclusive: bool) {
    match (&mut node.schema_kind, bound) {
        (SchemaKind::Type(Type::Integer(t)), Bound::Integer(b)) => {
            lower(&mut t.maximum, &mut t.exclusive_maximum, b, exclusive)
        }
        (SchemaKind::Type(Type::Number(t)), Bound::Number(b)) => {
            lower(&mut t.maximum, &mut t.exclusive_maximum, b, exclusive)
        }
        _ => {}
    }
}

/// The minimum length slot for the node kind (string length, array items,
/// object properties).
pub(crate) fn min_length_slot(node: &mut Schema) -> Option<&mut Option<usize>> {
    match &mut node.schema_kind {
        SchemaKind::Type(Type::String(t)) => Some(&mut t.min_length),
        SchemaKind::Type(Type::Array(t)) => Some(&mut t.min_items),
        SchemaKind::Type(Type::Object(t)) => Some(&mut t.min_properties),
        _ => None,
    }
}

/// The maximum length slot for the node kind.
pub(crate) fn max_length_slot(node: &mut Schema) -> Option<&mut Option<usize>> {
    match &mut node.schema_kind {
        SchemaKind::Type(Type::String(t)) => Some(&mut t.max_length),
        SchemaKind::Type(Type::Array(t)) => Some(&mut t.max_items),
        SchemaKind::Type(Type::Object(t)) => Some(&mut t.max_properties),
        _ => None,
    }
}

/// Unescapes the validator's `0x2C` and `0x7C` sequences.
pub(crate) fn unescape(text: &str) -> String {
    text.replace("0x2C", ",").replace("0x7C", "|")
}

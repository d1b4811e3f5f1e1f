#![deny(missing_docs)]

//! # Type Descriptors
//!
//! Parses textual type descriptors (`map[string][]*User`, `[4]byte`, `int64`)
//! once into a [`TypeDescriptor`] tree, and maps primitive keywords to their
//! schema kind and format.

use crate::error::ResolveError;
use crate::oas::models::typed;
use openapiv3::{
    BooleanType, IntegerFormat, IntegerType, NumberFormat, NumberType, Schema, StringFormat,
    StringType, Type, VariantOrUnknownOrEmpty,
};

/// A parsed type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// `map[K]V`. Keys are not represented in the output.
    Map {
        /// The value type `V`.
        value: Box<TypeDescriptor>,
    },
    /// `[]T`.
    Slice(Box<TypeDescriptor>),
    /// `[N]T`.
    Array {
        /// The dimension `N`.
        len: u64,
        /// The element type `T`.
        elem: Box<TypeDescriptor>,
    },
    /// `*T`.
    Pointer(Box<TypeDescriptor>),
    /// A primitive keyword.
    Primitive(Primitive),
    /// Any other identifier, looked up in the type table.
    Named(String),
}

impl TypeDescriptor {
    /// Parses a descriptor, outermost wrapper first.
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        parse_at(text.trim(), text)
    }

    /// Whether the descriptor is a slice or fixed array.
    pub fn is_collection(&self) -> bool {
        matches!(self, TypeDescriptor::Slice(_) | TypeDescriptor::Array { .. })
    }

    /// The record name behind an optional pointer (`T` or `*T`).
    pub fn record_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Named(name) => Some(name),
            TypeDescriptor::Pointer(inner) => match inner.as_ref() {
                TypeDescriptor::Named(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

fn parse_at(text: &str, full: &str) -> Result<TypeDescriptor, ResolveError> {
    if text.is_empty() {
        return Err(ResolveError::malformed(full, "missing type"));
    }

    if let Some(rest) = text.strip_prefix("map[") {
        let close = matching_bracket(rest)
            .ok_or_else(|| ResolveError::malformed(full, "unterminated map key"))?;
        if rest[..close].trim().is_empty() {
            return Err(ResolveError::malformed(full, "missing map key type"));
        }
        let value = parse_at(rest[close + 1..].trim(), full)?;
        return Ok(TypeDescriptor::Map {
            value: Box::new(value),
        });
    }

    if let Some(rest) = text.strip_prefix("[]") {
        return Ok(TypeDescriptor::Slice(Box::new(parse_at(rest.trim(), full)?)));
    }

    if let Some(rest) = text.strip_prefix('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| ResolveError::malformed(full, "unterminated array dimension"))?;
        let len = rest[..close]
            .trim()
            .parse::<u64>()
            .map_err(|_| ResolveError::malformed(full, "invalid array dimension"))?;
        let elem = parse_at(rest[close + 1..].trim(), full)?;
        return Ok(TypeDescriptor::Array {
            len,
            elem: Box::new(elem),
        });
    }

    if let Some(rest) = text.strip_prefix('*') {
        return Ok(TypeDescriptor::Pointer(Box::new(parse_at(rest.trim(), full)?)));
    }

    if let Some(primitive) = Primitive::from_keyword(text) {
        return Ok(TypeDescriptor::Primitive(primitive));
    }

    Ok(TypeDescriptor::Named(text.to_string()))
}

/// Finds the `]` closing an already opened bracket, honoring nesting.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut level = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => level += 1,
            ']' => {
                level -= 1;
                if level == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Primitive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `string`
    String,
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32` and `rune`
    Int32,
    /// `int64`
    Int64,
    /// `uint` and `uintptr`
    Uint,
    /// `uint8` and `byte`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
    /// `any` and `interface{}`
    Any,
}

impl Primitive {
    /// Maps a keyword to its primitive, if it is one.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let primitive = match keyword {
            "string" => Primitive::String,
            "bool" => Primitive::Bool,
            "int" => Primitive::Int,
            "int8" => Primitive::Int8,
            "int16" => Primitive::Int16,
            "int32" | "rune" => Primitive::Int32,
            "int64" => Primitive::Int64,
            "uint" | "uintptr" => Primitive::Uint,
            "uint8" | "byte" => Primitive::Uint8,
            "uint16" => Primitive::Uint16,
            "uint32" => Primitive::Uint32,
            "uint64" => Primitive::Uint64,
            "float32" => Primitive::Float32,
            "float64" => Primitive::Float64,
            "any" | "interface{}" => Primitive::Any,
            _ => return None,
        };
        Some(primitive)
    }

    /// The format string emitted for this primitive.
    pub fn format(self) -> Option<&'static str> {
        match self {
            Primitive::String | Primitive::Bool => None,
            Primitive::Int => Some("int"),
            Primitive::Int8 => Some("int8"),
            Primitive::Int16 => Some("int16"),
            Primitive::Int32 => Some("int32"),
            Primitive::Int64 => Some("int64"),
            Primitive::Uint => Some("uint"),
            Primitive::Uint8 => Some("uint8"),
            Primitive::Uint16 => Some("uint16"),
            Primitive::Uint32 => Some("uint32"),
            Primitive::Uint64 => Some("uint64"),
            Primitive::Float32 => Some("float"),
            Primitive::Float64 => Some("double"),
            Primitive::Any => Some("binary"),
        }
    }

    /// A fresh schema for this primitive. Formats `openapiv3` has no
    /// variant for (`int`, `int8`, `uint`, ...) are kept as custom strings.
    pub fn schema(self) -> Schema {
        let kind = match self {
            Primitive::String => Type::String(StringType::default()),
            Primitive::Any => Type::String(StringType {
                format: VariantOrUnknownOrEmpty::Item(StringFormat::Binary),
                ..Default::default()
            }),
            Primitive::Bool => Type::Boolean(BooleanType::default()),
            Primitive::Float32 => number(NumberFormat::Float),
            Primitive::Float64 => number(NumberFormat::Double),
            Primitive::Int32 => integer(VariantOrUnknownOrEmpty::Item(IntegerFormat::Int32)),
            Primitive::Int64 => integer(VariantOrUnknownOrEmpty::Item(IntegerFormat::Int64)),
            other => integer(VariantOrUnknownOrEmpty::Unknown(
                other.format().unwrap_or_default().to_string(),
            )),
        };
        typed(kind)
    }
}

fn integer(format: VariantOrUnknownOrEmpty<IntegerFormat>) -> Type {
    Type::Integer(IntegerType {
        format,
        ..Default::default()
    })
}

fn number(format: NumberFormat) -> Type {
    Type::Number(NumberType {
        format: VariantOrUnknownOrEmpty::Item(format),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Box<TypeDescriptor> {
        Box::new(TypeDescriptor::Named(name.to_string()))
    }

    #[test]
    fn test_parse_wrappers() {
        assert_eq!(
            TypeDescriptor::parse("[]*User").unwrap(),
            TypeDescriptor::Slice(Box::new(TypeDescriptor::Pointer(named("User"))))
        );
        assert_eq!(
            TypeDescriptor::parse("[4]byte").unwrap(),
            TypeDescriptor::Array {
                len: 4,
                elem: Box::new(TypeDescriptor::Primitive(Primitive::Uint8)),
            }
        );
        assert_eq!(
            TypeDescriptor::parse("map[string]User").unwrap(),
            TypeDescriptor::Map { value: named("User") }
        );
    }

    #[test]
    fn test_map_key_brackets_are_nested() {
        assert_eq!(
            TypeDescriptor::parse("map[[2]string]int").unwrap(),
            TypeDescriptor::Map {
                value: Box::new(TypeDescriptor::Primitive(Primitive::Int)),
            }
        );
        assert_eq!(
            TypeDescriptor::parse("map[string]map[string][]int").unwrap(),
            TypeDescriptor::Map {
                value: Box::new(TypeDescriptor::Map {
                    value: Box::new(TypeDescriptor::Slice(Box::new(
                        TypeDescriptor::Primitive(Primitive::Int)
                    ))),
                }),
            }
        );
    }

    #[test]
    fn test_malformed_descriptors() {
        for text in ["", "map[string", "[x]int", "[3", "[]", "*", "map[]int"] {
            assert!(
                matches!(
                    TypeDescriptor::parse(text),
                    Err(ResolveError::MalformedDescriptor { .. })
                ),
                "expected {:?} to be malformed",
                text
            );
        }
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(Primitive::from_keyword("rune"), Some(Primitive::Int32));
        assert_eq!(Primitive::from_keyword("uintptr"), Some(Primitive::Uint));
        assert_eq!(Primitive::from_keyword("interface{}"), Some(Primitive::Any));
        assert_eq!(Primitive::from_keyword("User"), None);

        assert_eq!(
            serde_json::to_value(Primitive::Any.schema()).unwrap(),
            serde_json::json!({"type": "string", "format": "binary"})
        );
        assert_eq!(
            serde_json::to_value(Primitive::Uint16.schema()).unwrap(),
            serde_json::json!({"type": "integer", "format": "uint16"})
        );
        assert_eq!(
            crate::oas::models::numeric_format(&Primitive::Float32.schema()),
            Some("float")
        );
        assert_eq!(
            serde_json::to_value(Primitive::Bool.schema()).unwrap(),
            serde_json::json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_record_name() {
        let ptr = TypeDescriptor::parse("*Base").unwrap();
        assert_eq!(ptr.record_name(), Some("Base"));
        assert_eq!(TypeDescriptor::parse("[]Base").unwrap().record_name(), None);
        assert!(TypeDescriptor::parse("[2]int").unwrap().is_collection());
    }
}

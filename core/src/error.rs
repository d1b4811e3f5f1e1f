//! # Error Handling
//!
//! Provides the fatal `AppError` used by loading and rendering, and the
//! non-fatal `ResolveError` taxonomy recorded while resolving schemas.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Only input loading and output rendering produce these; a resolution pass
/// itself never fails.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// JSON decoding or encoding failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// YAML decoding or encoding failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Problems found while resolving a single field, constraint or route.
///
/// None of these abort the pass: the offending field or constraint is
/// dropped and the problem is reported as a [`crate::oas::Warning`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResolveError {
    /// The descriptor names neither a primitive nor a known record type.
    #[display("unknown type \"{_0}\"")]
    UnknownType(String),

    /// The descriptor does not follow the descriptor grammar.
    #[display("malformed type descriptor \"{descriptor}\": {reason}")]
    MalformedDescriptor {
        /// The offending descriptor text.
        descriptor: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A literal in a bound, default or enum token could not be parsed.
    #[display("cannot apply constraint \"{token}\": {reason}")]
    ConstraintParseFailure {
        /// The constraint token as written.
        token: String,
        /// Why it was dropped.
        reason: String,
    },

    /// The validation tag uses the `|` alternation operator.
    #[display("validate tag \"{_0}\" contains \"|\", which is not supported")]
    UnsupportedConstraintGroup(String),

    /// `dive` was used on a value that is neither an array nor a map.
    #[display("invalid \"dive\" for non array/map type \"{_0}\"")]
    IncompatibleDive(String),

    /// `dive` is the last token of a validate tag.
    #[display("\"dive\" is not followed by any constraint")]
    TrailingDive,

    /// An anonymous member whose type is not a record.
    #[display("anonymous member of type \"{_0}\" is not a record type")]
    NotARecord(String),

    /// A route uses a method with no OpenAPI operation slot.
    #[display("unsupported HTTP method \"{_0}\"")]
    UnsupportedMethod(String),
}

impl ResolveError {
    /// Shorthand for [`ResolveError::MalformedDescriptor`].
    pub fn malformed(descriptor: &str, reason: impl Into<String>) -> Self {
        ResolveError::MalformedDescriptor {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ResolveError::ConstraintParseFailure`].
    pub fn constraint(token: &str, reason: impl Into<String>) -> Self {
        ResolveError::ConstraintParseFailure {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::error::Error for ResolveError {}

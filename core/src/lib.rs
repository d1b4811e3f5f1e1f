#![deny(missing_docs)]

//! # apidoc Core
//!
//! Resolves API interface descriptions (routes, record types, member tags)
//! into OpenAPI 3.0 documents.

/// Shared error types.
pub mod error;

/// Interface description model and struct tag parsing.
pub mod parser;

/// OpenAPI models, resolver and document assembly.
pub mod oas;

/// JSON and YAML rendering.
pub mod output;

pub use error::{AppError, AppResult, ResolveError};
pub use oas::{build_document, GeneratedDocument, Warning};
pub use openapiv3::OpenAPI;
pub use output::{render, OutputFormat};
pub use parser::{parse_api_json, parse_api_spec, parse_api_yaml, ApiSpec};

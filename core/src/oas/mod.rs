#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **models**: Helpers over the `openapiv3` document model.
//! - **descriptor**: Type descriptor parsing.
//! - **constraints**: Tag driven schema constraints.
//! - **resolver**: Descriptor, record, request and response resolution.
//! - **routes** / **document**: Operation and document assembly.

pub mod constraints;
pub mod context;
pub mod descriptor;
pub mod document;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod routes;

pub use context::{ResolutionContext, Warning};
pub use descriptor::{Primitive, TypeDescriptor};
pub use document::{build_document, GeneratedDocument, OPENAPI_VERSION};
pub use models::{BodyFormat, ParameterIn, RefOrExt};
pub use registry::SchemaRegistry;
pub use resolver::{
    build_request_shape, build_struct, resolve_response, resolve_schema, RequestParam, RequestShape,
};

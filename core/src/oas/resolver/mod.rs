#![deny(missing_docs)]

//! # Resolver Module
//!
//! Turns type descriptors and record types into schemas.
//!
//! Handles:
//! - Descriptor resolution (maps, slices, arrays, pointers, primitives).
//! - Named record schemas, registered once and referenced everywhere.
//! - Request shapes: parameters vs body, JSON vs form encoding.
//! - Response bodies, cached by type name.

pub mod request;
pub mod responses;
pub mod structs;
pub mod types;

pub use request::{build_request_shape, RequestParam, RequestShape};
pub use responses::resolve_response;
pub use structs::build_struct;
pub use types::{resolve_descriptor, resolve_schema};

#![deny(missing_docs)]

//! # Resolution Context
//!
//! All mutable state of a single resolution pass: the schema registry, the
//! request shape caches, the request body and response caches, and the
//! collected warnings. Independent passes use independent contexts.

use crate::error::ResolveError;
use crate::oas::descriptor::TypeDescriptor;
use crate::oas::models::RefOrExt;
use crate::oas::registry::SchemaRegistry;
use crate::oas::resolver::request::{RawRequestShape, RequestShape};
use crate::parser::{Member, RecordType, TypeTable};
use indexmap::IndexMap;
use openapiv3::{Components, ReferenceOr, RequestBody, Response, Schema};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A non-fatal problem, attached to the record/field or route it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Where the problem was found, e.g. `CreateUserReq.Age`.
    pub location: String,
    /// What went wrong.
    pub error: ResolveError,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// State threaded through the resolver.
#[derive(Debug)]
pub struct ResolutionContext<'a> {
    types: &'a TypeTable,
    pub(crate) schemas: SchemaRegistry,
    pub(crate) request_bodies: IndexMap<String, RequestBody>,
    pub(crate) responses: IndexMap<String, Response>,
    pub(crate) raw_requests: HashMap<String, RawRequestShape>,
    pub(crate) requests: HashMap<String, RequestShape>,
    pub(crate) pending_requests: HashSet<String>,
    warnings: Vec<Warning>,
}

impl<'a> ResolutionContext<'a> {
    /// Starts a pass over the given type table.
    pub fn new(types: &'a TypeTable) -> Self {
        ResolutionContext {
            types,
            schemas: SchemaRegistry::new(),
            request_bodies: IndexMap::new(),
            responses: IndexMap::new(),
            raw_requests: HashMap::new(),
            requests: HashMap::new(),
            pending_requests: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Looks up a record type by name.
    pub fn record(&self, name: &str) -> Option<&'a RecordType> {
        self.types.get(name)
    }

    /// The record type behind an anonymous member (`T` or `*T`).
    pub fn embedded_record(&self, member: &Member) -> Result<&'a RecordType, ResolveError> {
        let descriptor = TypeDescriptor::parse(&member.ty)?;
        descriptor
            .record_name()
            .and_then(|name| self.record(name))
            .ok_or_else(|| ResolveError::NotARecord(member.ty.trim().to_string()))
    }

    /// The schema registry.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Records and logs a non-fatal problem.
    pub fn warn(&mut self, location: &str, error: ResolveError) {
        tracing::warn!(location, %error, "skipping unresolvable declaration");
        self.warnings.push(Warning {
            location: location.to_string(),
            error,
        });
    }

    /// Records every problem collected for one location.
    pub fn report(&mut self, location: &str, problems: Vec<ResolveError>) {
        for error in problems {
            self.warn(location, error);
        }
    }

    /// Returns a mutable inline schema, cloning a referenced complete schema
    /// into `node` first. Shared registered schemas are never mutated.
    ///
    /// Returns `None` when `node` references a schema that is still under
    /// construction; the reference is left untouched.
    pub fn make_mut<'n>(&self, node: &'n mut ReferenceOr<Schema>) -> Option<&'n mut Schema> {
        if let Some(name) = node.ref_name() {
            let name = name.to_string();
            if !self.schemas.is_complete(&name) {
                tracing::debug!(schema = %name, "keeping reference to schema under construction");
                return None;
            }
            let copy = self.schemas.get(&name)?.clone();
            tracing::debug!(schema = %name, "cloning shared schema before mutation");
            *node = ReferenceOr::Item(copy);
        }
        node.as_inline_mut()
    }

    /// Ends the pass, handing out the registered components and warnings.
    pub fn finish(self) -> (Components, Vec<Warning>) {
        let components = Components {
            schemas: items(self.schemas.into_schemas()),
            request_bodies: items(self.request_bodies),
            responses: items(self.responses),
            ..Default::default()
        };
        (components, self.warnings)
    }
}

fn items<T>(map: IndexMap<String, T>) -> IndexMap<String, ReferenceOr<T>> {
    map.into_iter()
        .map(|(name, value)| (name, ReferenceOr::Item(value)))
        .collect()
}

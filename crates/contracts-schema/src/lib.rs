//! # contracts-schema — Schema Registry & Validation
//!
//! Loads the JSON Schema (Draft 2020-12) contracts from a directory once at
//! process start and validates documents against them.
//!
//! ## Schema Registry (`registry`)
//!
//! [`SchemaRegistry::load`] reads every `*.json` file in the schema
//! directory, names each schema by the first dot-separated segment of its
//! file name (`context.pack.schema.json` registers as `context`), and
//! compiles it with the `jsonschema` engine. Cross-file `$ref`s resolve
//! against the other files in the directory; nothing is fetched over the
//! network.
//!
//! ## Validation (`validate`)
//!
//! [`validate`] runs the engine and normalizes its errors into
//! [`Violation`] records sorted by document path, so the same document
//! always produces the same report.
//!
//! ## Crate Policy
//!
//! - The registry is immutable after `load`; share it behind an `Arc`.
//! - A schema that fails to parse or compile is a startup error, never a
//!   validation violation.

pub mod registry;
pub mod validate;

pub use registry::{RegistryError, Schema, SchemaRegistry};
pub use validate::{validate, PathSegment, ValidationOutcome, Violation};

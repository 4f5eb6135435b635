//! Declarative channel schema for binary sensor telemetry.
//!
//! Sensor records arrive tagged with hexadecimal type IDs. This crate
//! owns the schema describing the known instrument channels, resolves a
//! raw type ID to a named output variable with CF metadata
//! (standard_name / long_name / units), and expands templated ID ranges
//! (a 3-axis sensor spanning 0x111–0x113) into individually named
//! variables (`Ax`, `Ay`, `Az`).
//!
//! The registry is loaded once, validated fail-fast, and shared
//! read-only across any number of assembly sessions.

pub mod entry;
pub mod error;
pub mod expand;
pub mod registry;
pub mod resolver;

// Re-exports
pub use entry::{ChannelAttributes, ChannelEntry, Orientation, TypeIdRange};
pub use error::{ResolveError, Result, SchemaError};
pub use expand::{Expansion, DIGIT_CAPACITY};
pub use registry::Registry;
pub use resolver::{ResolvedVariable, Resolver};

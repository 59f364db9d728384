//! Schema model for the data tree
//!
//! The schema declares which children each node may have, how lists are keyed
//! and how leaf values are restricted. It is consumed once, when the
//! modification strategies are built; the engine never consults it per call.
//!
//! # Design Principles
//!
//! - Schema models are immutable once loaded
//! - Structural problems are rejected at load time
//! - Deep validation depth is fixed by `TreeType` when strategies are built

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{ChoiceCase, LeafType, Range, SchemaContext, SchemaNode, SchemaNodeKind, TreeType};

//! datatree - A schema-aware, copy-on-write transactional data tree
//!
//! Clients stage write, merge and delete operations against a snapshot; the
//! engine validates them against the snapshot current at commit time and
//! produces a new immutable snapshot that shares every untouched subtree with
//! the previous one.

pub mod data;
pub mod modification;
pub mod observability;
pub mod schema;
pub mod store;
pub mod tree;

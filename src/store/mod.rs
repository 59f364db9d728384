//! Data tree front-end
//!
//! `InMemoryDataTree` owns the current snapshot and sequences
//! begin/validate/prepare/commit over the modification engine.

mod config;
mod data_tree;

pub use config::{ConfigError, ConfigResult, DataTreeConfig};
pub use data_tree::InMemoryDataTree;

//! Versioned tree nodes
//!
//! This module provides:
//! - `Version` - totally ordered, opaque version token
//! - `TreeNode` - immutable snapshot of one document node
//! - `MutableTreeNode` - transient builder view of a `TreeNode`
//! - `TreeNodeFactory` - materializes fresh `TreeNode`s from document values
//!
//! # Invariants
//!
//! - A `TreeNode` never changes after construction
//! - Changes produce new nodes that share unmodified children with their predecessor
//! - A `MutableTreeNode` is consumed by `seal()` and cannot be observed as a snapshot before

mod factory;
mod mutable;
mod node;
mod version;

pub use factory::TreeNodeFactory;
pub use mutable::MutableTreeNode;
pub use node::TreeNode;
pub use version::Version;

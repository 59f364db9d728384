//! Modification engine
//!
//! A transaction stages write, merge and delete operations in a
//! `DataTreeModification`, building a tree of `ModifiedNode`s against a base
//! snapshot. Committing it is two passes over that tree:
//!
//! 1. validate: read-only, checks every staged node against the snapshot that
//!    is current now, which may be newer than the base
//! 2. apply: builds the new snapshot, sharing every untouched subtree with the
//!    current one
//!
//! Apply never starts unless validation of the whole tree succeeded.
//!
//! Per-node behaviour lives in `ModificationApplyOperation`, a strategy tree
//! built once from the schema.

mod candidate;
mod container;
mod errors;
mod handle;
mod leaf;
mod modified_node;
mod operation;

pub use candidate::DataTreeCandidate;
pub use container::NodeContainerStrategy;
pub use errors::{ModificationError, ModificationResult};
pub use handle::DataTreeModification;
pub use leaf::LeafStrategy;
pub use modified_node::{LogicalOperation, ModificationType, ModifiedNode};
pub use operation::ModificationApplyOperation;

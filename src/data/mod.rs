//! Document values
//!
//! The data a tree node carries, independent of versions and history:
//! - `QName` - node name
//! - `PathArgument` - identifier of a node within its parent
//! - `InstancePath` - address of a node from the root
//! - `LeafValue` - terminal payload
//! - `DataNode` - immutable document value, possibly a container of child values
//!
//! Values are immutable. Containers share their children by `Arc`, so rebuilding
//! a container through `DataNodeBuilder` never copies untouched subtrees.

mod identifier;
mod node;
mod value;

pub use identifier::{InstancePath, PathArgument, QName};
pub use node::{ChildMap, DataNode, DataNodeBuilder, NodeKind};
pub use value::LeafValue;

/// Name of the implicit root container of every data tree.
pub const ROOT_NAME: &str = "data";

/// Identifier carried by the root node of every data tree.
pub fn root_identifier() -> PathArgument {
    PathArgument::node(ROOT_NAME)
}

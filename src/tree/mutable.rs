//! MutableTreeNode - Transient builder view of a TreeNode
//!
//! - Exclusively owned by the modification being applied
//! - Child add/remove/replace, value and subtree version updates
//! - `seal()` consumes the builder and yields a new immutable `TreeNode`

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::{DataNode, PathArgument};

use super::node::lookup_child;
use super::{TreeNode, Version};

/// A mutable view of a `TreeNode` under construction.
///
/// There is no way to read a `MutableTreeNode` as a snapshot: the only exit is
/// `seal()`, which takes it by value.
#[derive(Debug)]
pub struct MutableTreeNode {
    data: Arc<DataNode>,
    version: Version,
    subtree_version: Version,
    children: BTreeMap<PathArgument, Arc<TreeNode>>,
}

impl MutableTreeNode {
    pub(crate) fn new(
        data: Arc<DataNode>,
        version: Version,
        subtree_version: Version,
        children: BTreeMap<PathArgument, Arc<TreeNode>>,
    ) -> Self {
        Self {
            data,
            version,
            subtree_version,
            children,
        }
    }

    /// Looks up a child of the node being built.
    ///
    /// Children are resolved against the value the builder was seeded with until
    /// `set_data` replaces it.
    pub fn child(&self, id: &PathArgument) -> Option<Arc<TreeNode>> {
        lookup_child(&self.data, self.version, &self.children, id)
    }

    /// Adds or replaces a child node.
    pub fn add_child(&mut self, child: Arc<TreeNode>) {
        self.children.insert(child.identifier().clone(), child);
    }

    /// Removes a child node, returning it if it was materialized.
    pub fn remove_child(&mut self, id: &PathArgument) -> Option<Arc<TreeNode>> {
        self.children.remove(id)
    }

    /// Sets the subtree version.
    pub fn set_subtree_version(&mut self, version: Version) {
        self.subtree_version = version;
    }

    /// Replaces the document value.
    pub fn set_data(&mut self, data: Arc<DataNode>) {
        self.data = data;
    }

    /// Freezes the builder into an immutable node.
    pub fn seal(self) -> Arc<TreeNode> {
        debug_assert!(
            self.children.keys().all(|id| self.data.child(id).is_some()),
            "materialized children must be present in the sealed value"
        );
        Arc::new(TreeNode::from_parts(
            self.data,
            self.version,
            self.subtree_version,
            self.children,
        ))
    }
}

//! TreeNode - Immutable snapshot node
//!
//! - Holds one document value plus its version and subtree version
//! - Children are materialized lazily from the value and shared by `Arc`
//! - Never mutated after construction

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::{DataNode, InstancePath, PathArgument};

use super::{MutableTreeNode, TreeNodeFactory, Version};

/// An immutable node of a data tree snapshot.
///
/// `version` is the version at which this node's own value was last replaced;
/// `subtree_version` is the version at which anything at or below it last
/// changed, so `subtree_version >= version`.
///
/// Children that have been touched by a modification are held as explicit
/// `TreeNode`s. Every other child exists only inside `data` and is materialized
/// on lookup at this node's `version`.
#[derive(Debug)]
pub struct TreeNode {
    data: Arc<DataNode>,
    version: Version,
    subtree_version: Version,
    children: BTreeMap<PathArgument, Arc<TreeNode>>,
}

impl TreeNode {
    pub(crate) fn from_parts(
        data: Arc<DataNode>,
        version: Version,
        subtree_version: Version,
        children: BTreeMap<PathArgument, Arc<TreeNode>>,
    ) -> Self {
        debug_assert!(subtree_version >= version);
        Self {
            data,
            version,
            subtree_version,
            children,
        }
    }

    /// Returns the identifier of this node within its parent.
    #[inline]
    pub fn identifier(&self) -> &PathArgument {
        self.data.identifier()
    }

    /// Returns the document value.
    #[inline]
    pub fn data(&self) -> &Arc<DataNode> {
        &self.data
    }

    /// Returns the version at which this node's value was last replaced.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the version at which this subtree last changed.
    #[inline]
    pub fn subtree_version(&self) -> Version {
        self.subtree_version
    }

    /// Looks up a direct child.
    pub fn child(&self, id: &PathArgument) -> Option<Arc<TreeNode>> {
        lookup_child(&self.data, self.version, &self.children, id)
    }

    /// Iterates children in identifier order.
    pub fn children(&self) -> impl Iterator<Item = Arc<TreeNode>> + '_ {
        self.data
            .children()
            .filter_map(move |child| self.child(child.identifier()))
    }

    /// Resolves a descendant by path. The root path resolves to `self`.
    pub fn find(self: &Arc<Self>, path: &InstancePath) -> Option<Arc<TreeNode>> {
        let mut node = Arc::clone(self);
        for arg in path.args() {
            node = node.child(arg)?;
        }
        Some(node)
    }

    /// Returns the number of children held as explicit tree nodes.
    pub fn materialized_child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a mutable view seeded from this node.
    pub fn mutable(&self) -> MutableTreeNode {
        MutableTreeNode::new(
            Arc::clone(&self.data),
            self.version,
            self.subtree_version,
            self.children.clone(),
        )
    }
}

/// Child lookup shared by `TreeNode` and `MutableTreeNode`.
pub(crate) fn lookup_child(
    data: &DataNode,
    version: Version,
    materialized: &BTreeMap<PathArgument, Arc<TreeNode>>,
    id: &PathArgument,
) -> Option<Arc<TreeNode>> {
    if let Some(child) = materialized.get(id) {
        return Some(Arc::clone(child));
    }
    data.child(id)
        .map(|value| TreeNodeFactory::create(Arc::clone(value), version))
}

//! ModifiedNode - one entry of a staged modification tree
//!
//! - Mirrors the addressed document tree
//! - Records the snapshot node it was staged against
//! - Carries a write-once outcome, resolved by the apply pass

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::data::{DataNode, PathArgument};
use crate::tree::TreeNode;

/// Operation requested on a node, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOperation {
    /// Nothing staged.
    None,
    /// Only children are modified.
    Touch,
    /// Replace the node wholesale.
    Write,
    /// Merge a value into the node.
    Merge,
    /// Remove the node.
    Delete,
}

impl LogicalOperation {
    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperation::None => "none",
            LogicalOperation::Touch => "touch",
            LogicalOperation::Write => "write",
            LogicalOperation::Merge => "merge",
            LogicalOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for LogicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of applying a modification to one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModificationType {
    /// Node left as it was; the snapshot node is reused.
    Unmodified,
    /// Node value replaced.
    Write,
    /// Node removed.
    Delete,
    /// One or more descendants changed.
    SubtreeModified,
    /// Structural node created because a child appeared.
    Appeared,
    /// Structural node removed because its last child went away.
    Disappeared,
}

impl ModificationType {
    /// Returns the outcome name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationType::Unmodified => "unmodified",
            ModificationType::Write => "write",
            ModificationType::Delete => "delete",
            ModificationType::SubtreeModified => "subtree-modified",
            ModificationType::Appeared => "appeared",
            ModificationType::Disappeared => "disappeared",
        }
    }
}

impl fmt::Display for ModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Operation {
    None,
    Touch,
    Write(Arc<DataNode>),
    Merge(Arc<DataNode>),
    Delete,
}

impl Operation {
    fn logical(&self) -> LogicalOperation {
        match self {
            Operation::None => LogicalOperation::None,
            Operation::Touch => LogicalOperation::Touch,
            Operation::Write(_) => LogicalOperation::Write,
            Operation::Merge(_) => LogicalOperation::Merge,
            Operation::Delete => LogicalOperation::Delete,
        }
    }
}

/// A node of a staged modification tree.
#[derive(Debug)]
pub struct ModifiedNode {
    identifier: PathArgument,
    operation: Operation,
    original: Option<Arc<TreeNode>>,
    children: BTreeMap<PathArgument, ModifiedNode>,
    resolved: Option<ModificationType>,
}

impl ModifiedNode {
    pub(crate) fn new(identifier: PathArgument, original: Option<Arc<TreeNode>>) -> Self {
        Self {
            identifier,
            operation: Operation::None,
            original,
            children: BTreeMap::new(),
            resolved: None,
        }
    }

    /// Returns the identifier of the modified node.
    pub fn identifier(&self) -> &PathArgument {
        &self.identifier
    }

    /// Returns the staged operation.
    pub fn operation(&self) -> LogicalOperation {
        self.operation.logical()
    }

    /// Returns the written or merged value, if any.
    pub fn value(&self) -> Option<&Arc<DataNode>> {
        match &self.operation {
            Operation::Write(value) | Operation::Merge(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the snapshot node this modification was staged against.
    pub fn original(&self) -> Option<&Arc<TreeNode>> {
        self.original.as_ref()
    }

    /// Looks up a staged child.
    pub fn child(&self, id: &PathArgument) -> Option<&ModifiedNode> {
        self.children.get(id)
    }

    /// Iterates staged children in identifier order.
    pub fn children(&self) -> impl Iterator<Item = &ModifiedNode> + '_ {
        self.children.values()
    }

    /// Returns true if any child modification is staged.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the resolved outcome, `None` until the apply pass reached this node.
    pub fn modification_type(&self) -> Option<ModificationType> {
        self.resolved
    }

    pub(crate) fn op(&self) -> &Operation {
        &self.operation
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut ModifiedNode> + '_ {
        self.children.values_mut()
    }

    pub(crate) fn contains_child(&self, id: &PathArgument) -> bool {
        self.children.contains_key(id)
    }

    /// Returns the staged child, creating an empty one staged against the
    /// matching child of `original`.
    pub(crate) fn modified_child(&mut self, id: &PathArgument) -> &mut ModifiedNode {
        let original = self.original.as_ref().and_then(|node| node.child(id));
        self.children
            .entry(id.clone())
            .or_insert_with(|| ModifiedNode::new(id.clone(), original))
    }

    pub(crate) fn write(&mut self, value: Arc<DataNode>) {
        self.children.clear();
        self.operation = Operation::Write(value);
    }

    /// Replaces the written value and keeps staged children as an overlay.
    pub(crate) fn rewrite(&mut self, value: Arc<DataNode>) {
        self.operation = Operation::Write(value);
    }

    pub(crate) fn merge(&mut self, value: Arc<DataNode>) {
        self.operation = Operation::Merge(value);
    }

    pub(crate) fn touch(&mut self) {
        if matches!(self.operation, Operation::None) {
            self.operation = Operation::Touch;
        }
    }

    pub(crate) fn delete(&mut self) {
        self.children.clear();
        self.operation = Operation::Delete;
    }

    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.operation = Operation::None;
    }

    /// Records the outcome of the apply pass. Resolving twice is a defect.
    pub(crate) fn resolve(&mut self, outcome: ModificationType) {
        debug_assert!(
            self.resolved.is_none(),
            "modification of {} resolved twice",
            self.identifier
        );
        self.resolved = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TreeNodeFactory, Version};

    fn original() -> Arc<TreeNode> {
        TreeNodeFactory::create(
            Arc::new(DataNode::container("c", [DataNode::leaf("x", true)])),
            Version::initial(),
        )
    }

    #[test]
    fn test_new_node_is_unstaged_and_unresolved() {
        let node = ModifiedNode::new(PathArgument::node("c"), None);
        assert_eq!(node.operation(), LogicalOperation::None);
        assert!(node.value().is_none());
        assert!(node.modification_type().is_none());
    }

    #[test]
    fn test_modified_child_tracks_original() {
        let mut node = ModifiedNode::new(PathArgument::node("c"), Some(original()));

        let x = node.modified_child(&PathArgument::node("x"));
        assert!(x.original().is_some());

        let y = node.modified_child(&PathArgument::node("y"));
        assert!(y.original().is_none());

        assert_eq!(node.children().count(), 2);
    }

    #[test]
    fn test_write_and_delete_clear_children() {
        let mut node = ModifiedNode::new(PathArgument::node("c"), Some(original()));
        node.touch();
        node.modified_child(&PathArgument::node("x")).delete();
        assert!(node.has_children());

        node.write(Arc::new(DataNode::container("c", [])));
        assert_eq!(node.operation(), LogicalOperation::Write);
        assert!(!node.has_children());

        node.modified_child(&PathArgument::node("x")).touch();
        node.delete();
        assert_eq!(node.operation(), LogicalOperation::Delete);
        assert!(!node.has_children());
    }

    #[test]
    fn test_touch_does_not_downgrade() {
        let mut node = ModifiedNode::new(PathArgument::node("x"), None);
        node.merge(Arc::new(DataNode::leaf("x", true)));
        node.touch();
        assert_eq!(node.operation(), LogicalOperation::Merge);
    }

    #[test]
    fn test_resolve_records_outcome() {
        let mut node = ModifiedNode::new(PathArgument::node("c"), None);
        node.resolve(ModificationType::Unmodified);
        assert_eq!(node.modification_type(), Some(ModificationType::Unmodified));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "resolved twice")]
    fn test_resolve_twice_is_caught() {
        let mut node = ModifiedNode::new(PathArgument::node("c"), None);
        node.resolve(ModificationType::Write);
        node.resolve(ModificationType::Write);
    }
}

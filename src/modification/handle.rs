//! DataTreeModification - staging handle for one transaction
//!
//! Operations are staged against the base snapshot the handle was opened on.
//! `validate` checks them against whatever snapshot is current at that time;
//! `apply` validates and then builds the new snapshot.

use std::sync::Arc;

use uuid::Uuid;

use crate::data::{root_identifier, DataNode, InstancePath, PathArgument};
use crate::tree::{TreeNode, Version};

use super::candidate::DataTreeCandidate;
use super::errors::{ModificationError, ModificationResult};
use super::modified_node::{LogicalOperation, ModifiedNode, Operation};
use super::operation::ModificationApplyOperation;

/// Target of a staging operation.
struct Staged<'a> {
    node: &'a mut ModifiedNode,
    strategy: &'a ModificationApplyOperation,
    /// Value written at the parent in this modification, if any.
    parent_value: Option<Arc<DataNode>>,
}

impl Staged<'_> {
    /// Returns true if the target exists before this modification applies.
    fn exists(&self) -> bool {
        match &self.parent_value {
            Some(value) => value.child(self.node.identifier()).is_some(),
            None => self.node.original().is_some(),
        }
    }
}

/// A transaction's staged modification tree.
#[derive(Debug)]
pub struct DataTreeModification {
    id: Uuid,
    base: Arc<TreeNode>,
    strategy: Arc<ModificationApplyOperation>,
    root: ModifiedNode,
}

impl DataTreeModification {
    /// Opens a modification on `base`.
    pub fn new(base: Arc<TreeNode>, strategy: Arc<ModificationApplyOperation>) -> Self {
        let root = ModifiedNode::new(root_identifier(), Some(Arc::clone(&base)));
        Self {
            id: Uuid::new_v4(),
            base,
            strategy,
            root,
        }
    }

    /// Returns the modification identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the snapshot this modification was opened on.
    pub fn base(&self) -> &Arc<TreeNode> {
        &self.base
    }

    /// Returns the staged modification tree.
    pub fn root(&self) -> &ModifiedNode {
        &self.root
    }

    /// Returns true if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.root.operation() == LogicalOperation::None
    }

    /// Stages replacing the node at `path` with `value`.
    pub fn write(&mut self, path: &InstancePath, value: DataNode) -> ModificationResult<()> {
        check_identifier(path, &value)?;
        let Staged { node, strategy, .. } = self.resolve_for(path)?;
        strategy.verify_structure(&value, false)?;
        node.write(Arc::new(value));
        Ok(())
    }

    /// Stages merging `value` into the node at `path`.
    ///
    /// Children of a container value are staged one by one: as merges where
    /// the child already exists, as writes otherwise.
    pub fn merge(&mut self, path: &InstancePath, value: DataNode) -> ModificationResult<()> {
        check_identifier(path, &value)?;
        let staged = self.resolve_for(path)?;
        staged.strategy.verify_structure(&value, false)?;
        let created = staged.parent_value.is_some() && !staged.exists();
        stage_merge(staged.node, staged.strategy, Arc::new(value), created)
    }

    /// Stages removing the node at `path`.
    pub fn delete(&mut self, path: &InstancePath) -> ModificationResult<()> {
        if path.is_root() {
            return Err(ModificationError::IllegalArgument(
                "The root node cannot be deleted".to_string(),
            ));
        }
        let staged = self.resolve_for(path)?;
        let exists = staged.exists();
        let created_here = matches!(
            staged.node.operation(),
            LogicalOperation::Write | LogicalOperation::Merge | LogicalOperation::Touch
        );
        let Staged {
            node, parent_value, ..
        } = staged;
        if !exists && (parent_value.is_some() || created_here) {
            // Cancels only what this modification staged. A node another
            // transaction creates meanwhile is neither deleted nor a conflict.
            node.clear();
        } else {
            node.delete();
        }
        Ok(())
    }

    /// Validate pass against the current snapshot root. Nothing is modified.
    pub fn validate(&self, current: &Arc<TreeNode>) -> ModificationResult<()> {
        self.strategy
            .check_applicable(&InstancePath::root(), &self.root, Some(current))
    }

    /// Validates against `current`, then builds the new snapshot at `version`.
    pub fn apply(self, current: &Arc<TreeNode>, version: Version) -> ModificationResult<DataTreeCandidate> {
        self.validate(current)?;

        let mut root = self.root;
        let after = self
            .strategy
            .apply(&mut root, Some(current), version)?
            .ok_or_else(|| ModificationError::Internal("Root node was removed".to_string()))?;
        Ok(DataTreeCandidate::new(Arc::clone(current), after, version, root))
    }

    /// Walks to the staged node for `path`, creating touch nodes on the way.
    fn resolve_for(&mut self, path: &InstancePath) -> ModificationResult<Staged<'_>> {
        let mut strategy: &ModificationApplyOperation = &self.strategy;
        let mut node = &mut self.root;
        let mut parent_value = None;

        for arg in path.args() {
            let child_strategy = strategy.resolve_child(arg)?;
            match node.operation() {
                LogicalOperation::None => node.touch(),
                LogicalOperation::Delete => {
                    let empty = strategy.empty_value(node.identifier())?;
                    node.write(empty);
                }
                _ => {}
            }
            parent_value = match node.op() {
                Operation::Write(value) => Some(Arc::clone(value)),
                _ => None,
            };
            node = node.modified_child(arg);
            strategy = child_strategy;
        }

        Ok(Staged {
            node,
            strategy,
            parent_value,
        })
    }
}

fn check_identifier(path: &InstancePath, value: &DataNode) -> ModificationResult<()> {
    let expected = match path.last() {
        Some(arg) => arg.clone(),
        None => root_identifier(),
    };
    if value.identifier() != &expected {
        return Err(ModificationError::IllegalArgument(format!(
            "Value identifier {} does not match path {}",
            value.identifier(),
            path
        )));
    }
    Ok(())
}

/// Folds a merged value into a staged node.
///
/// `created` is set when the node is absent from a value written at its parent
/// in this modification, so merging into it creates it.
fn stage_merge(
    node: &mut ModifiedNode,
    strategy: &ModificationApplyOperation,
    value: Arc<DataNode>,
    created: bool,
) -> ModificationResult<()> {
    if value.kind().is_terminal() {
        match node.operation() {
            LogicalOperation::Write | LogicalOperation::Delete => node.write(value),
            _ if created => node.write(value),
            _ => node.merge(value),
        }
        return Ok(());
    }

    match node.operation() {
        LogicalOperation::Delete => {
            node.write(value);
            return Ok(());
        }
        LogicalOperation::Write => {}
        LogicalOperation::None | LogicalOperation::Touch if created => {
            let empty = strategy.empty_value(node.identifier())?;
            node.rewrite(empty);
        }
        _ => node.merge(Arc::clone(&value)),
    }

    for child in value.children() {
        stage_child_merge(node, strategy, Arc::clone(child))?;
    }
    Ok(())
}

fn stage_child_merge(
    parent: &mut ModifiedNode,
    parent_strategy: &ModificationApplyOperation,
    value: Arc<DataNode>,
) -> ModificationResult<()> {
    let id: PathArgument = value.identifier().clone();
    let strategy = parent_strategy.resolve_child(&id)?;
    strategy.verify_structure(&value, false)?;

    let exists = match parent.op() {
        Operation::Write(written) => written.child(&id).is_some(),
        _ => parent.original().map_or(false, |original| original.child(&id).is_some()),
    };
    let staged = parent.contains_child(&id);
    let child = parent.modified_child(&id);

    if !exists && !staged {
        child.write(value);
        return Ok(());
    }
    stage_merge(child, strategy, value, !exists)
}

//! DataTreeCandidate - result of applying a modification

use std::sync::Arc;

use crate::data::InstancePath;
use crate::tree::{TreeNode, Version};

use super::modified_node::{ModificationType, ModifiedNode};

/// A prepared, not yet committed, new snapshot.
///
/// Holds the root it was prepared against, the new root and the modification
/// tree with every visited node's outcome resolved.
#[derive(Debug)]
pub struct DataTreeCandidate {
    before: Arc<TreeNode>,
    after: Arc<TreeNode>,
    version: Version,
    root: ModifiedNode,
}

impl DataTreeCandidate {
    pub(crate) fn new(
        before: Arc<TreeNode>,
        after: Arc<TreeNode>,
        version: Version,
        root: ModifiedNode,
    ) -> Self {
        Self {
            before,
            after,
            version,
            root,
        }
    }

    /// Root the modification was applied to.
    pub fn before(&self) -> &Arc<TreeNode> {
        &self.before
    }

    /// Root of the new snapshot.
    pub fn after(&self) -> &Arc<TreeNode> {
        &self.after
    }

    /// Version the candidate was prepared at.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Resolved modification tree.
    pub fn root_modification(&self) -> &ModifiedNode {
        &self.root
    }

    /// Outcome at the root.
    pub fn root_modification_type(&self) -> ModificationType {
        self.root
            .modification_type()
            .unwrap_or(ModificationType::Unmodified)
    }

    /// Outcome at `path`, `None` if nothing was staged there.
    pub fn modification_type(&self, path: &InstancePath) -> Option<ModificationType> {
        let mut node = &self.root;
        for arg in path.args() {
            node = node.child(arg)?;
        }
        node.modification_type()
    }

    /// Returns true if applying the modification changed nothing.
    pub fn is_unmodified(&self) -> bool {
        self.root_modification_type() == ModificationType::Unmodified
    }
}

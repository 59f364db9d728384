//! TreeNodeFactory - Fresh TreeNode materialization

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::DataNode;

use super::{TreeNode, Version};

/// Builds immutable tree nodes from document values.
pub struct TreeNodeFactory;

impl TreeNodeFactory {
    /// Creates a node for `data` with both version and subtree version set to `version`.
    ///
    /// Children of a container value are not materialized up front; they are
    /// created on lookup and inherit `version`.
    pub fn create(data: Arc<DataNode>, version: Version) -> Arc<TreeNode> {
        Arc::new(TreeNode::from_parts(data, version, version, BTreeMap::new()))
    }
}

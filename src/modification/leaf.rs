//! Strategy for terminal nodes (leaves and leaf-list entries)

use std::sync::Arc;

use crate::data::{DataNode, InstancePath, NodeKind, PathArgument};
use crate::schema::LeafType;
use crate::tree::TreeNode;

use super::errors::{ModificationError, ModificationResult};
use super::modified_node::ModifiedNode;

/// Strategy for a leaf or leaf-list entry.
#[derive(Debug)]
pub struct LeafStrategy {
    kind: NodeKind,
    leaf_type: LeafType,
    verify: bool,
}

impl LeafStrategy {
    pub(crate) fn new(kind: NodeKind, leaf_type: LeafType, verify: bool) -> Self {
        Self {
            kind,
            leaf_type,
            verify,
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn verifies_children(&self) -> bool {
        self.verify
    }

    /// Returns the declared type.
    pub fn leaf_type(&self) -> &LeafType {
        &self.leaf_type
    }

    pub(crate) fn verify_structure(
        &self,
        value: &DataNode,
        verify_children: bool,
    ) -> ModificationResult<()> {
        let id = value.identifier();
        if value.kind() != self.kind {
            return Err(ModificationError::type_mismatch(
                id,
                self.kind.as_str(),
                value.kind().as_str(),
            ));
        }
        if !(verify_children && self.verify) {
            return Ok(());
        }

        let payload = value.value().ok_or_else(|| {
            ModificationError::type_mismatch(id, self.leaf_type.type_name(), value.kind().as_str())
        })?;
        if !self.leaf_type.accepts(payload) {
            return Err(ModificationError::type_mismatch(
                id,
                self.leaf_type.type_name(),
                payload.type_name(),
            ));
        }
        self.leaf_type
            .check_restrictions(payload)
            .map_err(|reason| ModificationError::schema(id, format!("Invalid value of {}: {}", id, reason)))?;

        if let PathArgument::Value { value: expected, .. } = id {
            if expected != payload {
                return Err(ModificationError::schema(
                    id,
                    format!("Leaf-list entry holds {} but is identified by {}", payload, expected),
                ));
            }
        }
        Ok(())
    }

    /// A merge into a leaf replaces its value, so it must still be the value
    /// the modification was staged against.
    pub(crate) fn check_merge_applicable(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        current: Option<&Arc<TreeNode>>,
    ) -> ModificationResult<()> {
        match (modification.original(), current) {
            (None, None) => Err(ModificationError::does_not_exist(
                path,
                "Node does not exist. Cannot merge into it.",
            )),
            (Some(_), None) => Err(ModificationError::conflict(
                path,
                "Node was deleted by other transaction.",
            )),
            (Some(original), Some(current)) if original.version() != current.version() => {
                Err(ModificationError::conflict(
                    path,
                    "Node was replaced by other transaction.",
                ))
            }
            _ => Ok(()),
        }
    }
}

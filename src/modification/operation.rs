//! ModificationApplyOperation - per-node-kind strategy
//!
//! The strategy tree mirrors the schema and is built once per data tree. Each
//! node knows how to verify a value of its kind, how to check a staged
//! modification against the current snapshot, and how to apply it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::data::{DataNode, InstancePath, NodeKind, PathArgument, QName};
use crate::schema::{SchemaContext, SchemaNode, SchemaNodeKind, TreeType};
use crate::tree::{TreeNode, TreeNodeFactory, Version};

use super::container::{ChildResolver, NodeContainerStrategy};
use super::errors::{ModificationError, ModificationResult};
use super::leaf::LeafStrategy;
use super::modified_node::{LogicalOperation, ModificationType, ModifiedNode, Operation};

/// Strategy for one schema node kind.
#[derive(Debug)]
pub enum ModificationApplyOperation {
    /// Container, keyed list entry or unkeyed list entry.
    Container(NodeContainerStrategy),
    /// Keyed list (map of entries).
    KeyedList(NodeContainerStrategy),
    /// Unkeyed list (sequence of entries).
    UnkeyedList(NodeContainerStrategy),
    /// Leaf-list.
    LeafList(NodeContainerStrategy),
    /// Choice.
    Choice(NodeContainerStrategy),
    /// Leaf or leaf-list entry.
    Leaf(LeafStrategy),
}

enum Handler<'a> {
    Container(&'a NodeContainerStrategy),
    Leaf(&'a LeafStrategy),
}

impl ModificationApplyOperation {
    /// Builds the strategy tree for a schema.
    ///
    /// Deep validation is enabled for configuration trees and fixed for the
    /// lifetime of the returned strategies.
    pub fn from_schema(schema: &SchemaContext, tree_type: TreeType) -> Self {
        Self::from_node(schema.root(), tree_type)
    }

    fn from_node(node: &SchemaNode, tree_type: TreeType) -> Self {
        let verify = tree_type == TreeType::Configuration;
        match &node.kind {
            SchemaNodeKind::Container { presence, children } => {
                Self::Container(NodeContainerStrategy::new(
                    NodeKind::Container,
                    verify,
                    !presence,
                    ChildResolver::Named(Self::named(children.iter(), tree_type)),
                ))
            }
            SchemaNodeKind::List { children, .. } if !node.key_definition_present() => {
                let entry = NodeContainerStrategy::new(
                    NodeKind::UnkeyedEntry,
                    verify,
                    false,
                    ChildResolver::Named(Self::named(children.iter(), tree_type)),
                );
                Self::UnkeyedList(NodeContainerStrategy::new(
                    NodeKind::UnkeyedList,
                    verify,
                    true,
                    ChildResolver::Position {
                        name: node.name.clone(),
                        entry: Box::new(Self::Container(entry)),
                    },
                ))
            }
            SchemaNodeKind::List { keys, children } => {
                let entry = NodeContainerStrategy::new(
                    NodeKind::ListEntry,
                    verify,
                    false,
                    ChildResolver::Named(Self::named(children.iter(), tree_type)),
                )
                .with_keys(keys.clone());
                Self::KeyedList(NodeContainerStrategy::new(
                    NodeKind::KeyedList,
                    verify,
                    true,
                    ChildResolver::Entry {
                        name: node.name.clone(),
                        keys: keys.iter().cloned().collect(),
                        entry: Box::new(Self::Container(entry)),
                    },
                ))
            }
            SchemaNodeKind::LeafList { leaf_type } => {
                let entry = LeafStrategy::new(NodeKind::LeafListEntry, leaf_type.clone(), verify);
                Self::LeafList(NodeContainerStrategy::new(
                    NodeKind::LeafList,
                    verify,
                    true,
                    ChildResolver::Value {
                        name: node.name.clone(),
                        entry: Box::new(Self::Leaf(entry)),
                    },
                ))
            }
            SchemaNodeKind::Leaf { leaf_type } => {
                Self::Leaf(LeafStrategy::new(NodeKind::Leaf, leaf_type.clone(), verify))
            }
            SchemaNodeKind::Choice { cases } => {
                let members = cases
                    .iter()
                    .map(|case| {
                        let names: BTreeSet<QName> =
                            case.children.iter().map(|child| child.name.clone()).collect();
                        (case.name.clone(), names)
                    })
                    .collect();
                let children = cases.iter().flat_map(|case| case.children.iter());
                Self::Choice(
                    NodeContainerStrategy::new(
                        NodeKind::Choice,
                        verify,
                        true,
                        ChildResolver::Named(Self::named(children, tree_type)),
                    )
                    .with_cases(members),
                )
            }
        }
    }

    fn named<'a>(
        children: impl Iterator<Item = &'a SchemaNode>,
        tree_type: TreeType,
    ) -> BTreeMap<QName, ModificationApplyOperation> {
        children
            .map(|child| (child.name.clone(), Self::from_node(child, tree_type)))
            .collect()
    }

    fn handler(&self) -> Handler<'_> {
        match self {
            Self::Leaf(leaf) => Handler::Leaf(leaf),
            Self::Container(container)
            | Self::KeyedList(container)
            | Self::UnkeyedList(container)
            | Self::LeafList(container)
            | Self::Choice(container) => Handler::Container(container),
        }
    }

    /// Returns the runtime kind of values this strategy handles.
    pub fn kind(&self) -> NodeKind {
        match self.handler() {
            Handler::Container(container) => container.kind(),
            Handler::Leaf(leaf) => leaf.kind(),
        }
    }

    /// Returns true for nodes that exist only while they have children.
    pub fn is_structural(&self) -> bool {
        match self.handler() {
            Handler::Container(container) => container.is_structural(),
            Handler::Leaf(_) => false,
        }
    }

    /// Returns true if deep validation runs for this strategy.
    pub fn verifies_children(&self) -> bool {
        match self.handler() {
            Handler::Container(container) => container.verifies_children(),
            Handler::Leaf(leaf) => leaf.verifies_children(),
        }
    }

    /// Looks up the strategy for a child identifier.
    pub fn child(&self, id: &PathArgument) -> Option<&ModificationApplyOperation> {
        match self.handler() {
            Handler::Container(container) => container.child(id),
            Handler::Leaf(_) => None,
        }
    }

    /// Looks up the strategy for a child identifier, failing if the schema has none.
    pub fn resolve_child(&self, id: &PathArgument) -> ModificationResult<&ModificationApplyOperation> {
        self.child(id).ok_or_else(|| {
            ModificationError::schema(id, format!("Child {} is not valid child according to schema.", id))
        })
    }

    /// Checks that `value` has the shape this strategy expects.
    ///
    /// The runtime kind is always checked. With `verify_children`, and only in
    /// configuration trees, children and leaf payloads are checked against the
    /// schema recursively.
    pub fn verify_structure(&self, value: &DataNode, verify_children: bool) -> ModificationResult<()> {
        match self.handler() {
            Handler::Container(container) => container.verify_structure(value, verify_children),
            Handler::Leaf(leaf) => leaf.verify_structure(value, verify_children),
        }
    }

    /// Validate pass: checks `modification`, staged at `path`, against the current node.
    pub(crate) fn check_applicable(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        current: Option<&Arc<TreeNode>>,
    ) -> ModificationResult<()> {
        match modification.op() {
            Operation::None => Ok(()),
            Operation::Touch => match self.handler() {
                Handler::Container(container) => {
                    container.check_touch_applicable(path, modification, current)
                }
                Handler::Leaf(_) => Ok(()),
            },
            Operation::Merge(value) => {
                self.verify_structure(value, true)?;
                match self.handler() {
                    Handler::Container(container) => {
                        container.check_touch_applicable(path, modification, current)
                    }
                    Handler::Leaf(leaf) => leaf.check_merge_applicable(path, modification, current),
                }
            }
            Operation::Write(value) => {
                self.verify_structure(value, true)?;
                check_write_applicable(path, modification, current)?;
                match self.handler() {
                    Handler::Container(container) if modification.has_children() => {
                        container.check_overlay_children(path, modification, Some(value))
                    }
                    _ => Ok(()),
                }
            }
            Operation::Delete => check_delete_applicable(path, modification, current),
        }
    }

    /// Validate pass for modifications staged below a written value.
    ///
    /// `base` is the matching part of the written value rather than a snapshot
    /// node, since none of it exists before the write is applied.
    pub(crate) fn check_overlay_applicable(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        base: Option<&Arc<DataNode>>,
    ) -> ModificationResult<()> {
        match modification.op() {
            Operation::None => Ok(()),
            Operation::Delete => match base {
                Some(_) => Ok(()),
                None => Err(ModificationError::does_not_exist(
                    path,
                    "Node does not exist. Cannot delete it.",
                )),
            },
            Operation::Write(value) => {
                self.verify_structure(value, true)?;
                match self.handler() {
                    Handler::Container(container) => {
                        container.check_overlay_children(path, modification, Some(value))
                    }
                    Handler::Leaf(_) => Ok(()),
                }
            }
            Operation::Merge(_) | Operation::Touch => {
                if let Some(value) = modification.value() {
                    self.verify_structure(value, true)?;
                }
                if base.is_none() && !self.is_structural() {
                    return Err(ModificationError::does_not_exist(
                        path,
                        "Node does not exist. Cannot apply modification to its children.",
                    ));
                }
                match self.handler() {
                    Handler::Container(container) => {
                        container.check_overlay_children(path, modification, base)
                    }
                    Handler::Leaf(_) => Ok(()),
                }
            }
        }
    }

    /// Apply pass: produces the node replacing `current`, `None` if it is removed.
    ///
    /// Resolves the outcome of `modification` and of every staged descendant.
    pub(crate) fn apply(
        &self,
        modification: &mut ModifiedNode,
        current: Option<&Arc<TreeNode>>,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        match modification.operation() {
            LogicalOperation::None => {
                modification.resolve(ModificationType::Unmodified);
                Ok(current.cloned())
            }
            LogicalOperation::Delete => {
                modification.resolve(if current.is_some() {
                    ModificationType::Delete
                } else {
                    ModificationType::Unmodified
                });
                Ok(None)
            }
            LogicalOperation::Write => {
                let node = self.apply_write(modification, version)?;
                if self.is_structural() && node.data().is_empty_container() {
                    modification.resolve(if current.is_some() {
                        ModificationType::Disappeared
                    } else {
                        ModificationType::Unmodified
                    });
                    return Ok(None);
                }
                modification.resolve(ModificationType::Write);
                Ok(Some(node))
            }
            LogicalOperation::Touch => match current {
                Some(current) => self.apply_touch(modification, current, version),
                None => self.apply_appeared(modification, version),
            },
            LogicalOperation::Merge => match current {
                Some(current) => self.apply_merge(modification, current, version),
                None if self.is_structural() => self.apply_appeared(modification, version),
                None => {
                    modification.resolve(ModificationType::Write);
                    self.apply_write(modification, version).map(Some)
                }
            },
        }
    }

    /// Materializes the written value, then overlays any staged children.
    fn apply_write(
        &self,
        modification: &mut ModifiedNode,
        version: Version,
    ) -> ModificationResult<Arc<TreeNode>> {
        let value = modification.value().cloned().ok_or_else(|| {
            ModificationError::Internal(format!(
                "Modification of {} carries no value",
                modification.identifier()
            ))
        })?;
        let node = TreeNodeFactory::create(value, version);
        if !modification.has_children() {
            return Ok(node);
        }

        match self.handler() {
            Handler::Container(container) => {
                let (overlaid, _) = container.mutate_children(modification, &node, version)?;
                // Drop the children materialized by the overlay.
                Ok(TreeNodeFactory::create(Arc::clone(overlaid.data()), version))
            }
            Handler::Leaf(_) => Err(ModificationError::Internal(format!(
                "Leaf {} has staged children",
                modification.identifier()
            ))),
        }
    }

    fn apply_touch(
        &self,
        modification: &mut ModifiedNode,
        current: &Arc<TreeNode>,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        match self.handler() {
            Handler::Container(container) => container.apply_touch(modification, current, version),
            Handler::Leaf(_) if modification.has_children() => Err(ModificationError::Internal(
                format!("Leaf {} has staged children", modification.identifier()),
            )),
            Handler::Leaf(_) => {
                modification.resolve(ModificationType::Unmodified);
                Ok(Some(Arc::clone(current)))
            }
        }
    }

    fn apply_merge(
        &self,
        modification: &mut ModifiedNode,
        current: &Arc<TreeNode>,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        match self.handler() {
            Handler::Container(container) => container.apply_touch(modification, current, version),
            Handler::Leaf(_) => {
                modification.resolve(ModificationType::Write);
                self.apply_write(modification, version).map(Some)
            }
        }
    }

    fn apply_appeared(
        &self,
        modification: &mut ModifiedNode,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        match self.handler() {
            Handler::Container(container) if container.is_structural() => {
                container.apply_appeared(modification, version)
            }
            _ => Err(ModificationError::Internal(format!(
                "Node {} does not exist",
                modification.identifier()
            ))),
        }
    }

    /// Returns an empty value of this strategy's kind. Keyed entries keep their key leaves.
    pub(crate) fn empty_value(&self, identifier: &PathArgument) -> ModificationResult<Arc<DataNode>> {
        match self.handler() {
            Handler::Container(container) => container.empty_value(identifier),
            Handler::Leaf(_) => Err(ModificationError::IllegalArgument(format!(
                "{} has no children",
                identifier
            ))),
        }
    }
}

fn check_write_applicable(
    path: &InstancePath,
    modification: &ModifiedNode,
    current: Option<&Arc<TreeNode>>,
) -> ModificationResult<()> {
    match (modification.original(), current) {
        (Some(_), None) => Err(ModificationError::conflict(
            path,
            "Node was deleted by other transaction.",
        )),
        (None, Some(_)) => Err(ModificationError::conflict(
            path,
            "Node was created by other transaction.",
        )),
        (Some(original), Some(current)) if !Arc::ptr_eq(original, current) => {
            if original.version() != current.version() {
                Err(ModificationError::conflict(
                    path,
                    "Node was replaced by other transaction.",
                ))
            } else if original.subtree_version() != current.subtree_version() {
                Err(ModificationError::conflict(
                    path,
                    "Node children was modified by other transaction.",
                ))
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

fn check_delete_applicable(
    path: &InstancePath,
    modification: &ModifiedNode,
    current: Option<&Arc<TreeNode>>,
) -> ModificationResult<()> {
    match (modification.original(), current) {
        (None, None) => Err(ModificationError::does_not_exist(
            path,
            "Node does not exist. Cannot delete it.",
        )),
        (Some(_), None) => Err(ModificationError::conflict(
            path,
            "Node was deleted by other transaction.",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{root_identifier, LeafValue};
    use crate::schema::{ChoiceCase, LeafType};

    fn schema() -> SchemaContext {
        SchemaContext::new(vec![
            SchemaNode::container(
                "c",
                vec![
                    SchemaNode::leaf("x", LeafType::uint8()),
                    SchemaNode::leaf("y", LeafType::uint8()),
                ],
            ),
            SchemaNode::list(
                "user",
                ["name"],
                vec![
                    SchemaNode::leaf("name", LeafType::string()),
                    SchemaNode::leaf("uid", LeafType::uint()),
                ],
            ),
            SchemaNode::list::<&str>("hop", [], vec![SchemaNode::leaf("address", LeafType::string())]),
            SchemaNode::leaf_list("dns", LeafType::string()),
            SchemaNode::choice(
                "transport",
                vec![
                    ChoiceCase::new("tcp", vec![SchemaNode::leaf("port", LeafType::uint())]),
                    ChoiceCase::new("unix", vec![SchemaNode::leaf("socket", LeafType::string())]),
                ],
            ),
        ])
    }

    fn config() -> ModificationApplyOperation {
        ModificationApplyOperation::from_schema(&schema(), TreeType::Configuration)
    }

    fn c_node(version: Version) -> Arc<TreeNode> {
        TreeNodeFactory::create(
            Arc::new(DataNode::container(
                "c",
                [
                    DataNode::leaf("x", LeafValue::uint(1)),
                    DataNode::leaf("y", LeafValue::uint(2)),
                ],
            )),
            version,
        )
    }

    fn c_strategy(root: &ModificationApplyOperation) -> &ModificationApplyOperation {
        root.child(&PathArgument::node("c")).unwrap()
    }

    #[test]
    fn test_strategy_variants_follow_schema() {
        let root = config();
        assert!(matches!(root, ModificationApplyOperation::Container(_)));
        assert!(matches!(
            root.child(&PathArgument::node("user")),
            Some(ModificationApplyOperation::KeyedList(_))
        ));
        assert!(matches!(
            root.child(&PathArgument::node("hop")),
            Some(ModificationApplyOperation::UnkeyedList(_))
        ));
        assert!(matches!(
            root.child(&PathArgument::node("dns")),
            Some(ModificationApplyOperation::LeafList(_))
        ));
        assert!(matches!(
            root.child(&PathArgument::node("transport")),
            Some(ModificationApplyOperation::Choice(_))
        ));
        assert!(root.child(&PathArgument::node("missing")).is_none());
    }

    #[test]
    fn test_list_children_resolve_by_entry_shape() {
        let root = config();
        let users = root.child(&PathArgument::node("user")).unwrap();

        assert!(users.child(&PathArgument::entry("user", [("name", "alice")])).is_some());
        assert!(users.child(&PathArgument::entry("user", [("uid", LeafValue::uint(1))])).is_none());
        assert!(users.child(&PathArgument::node("user")).is_none());

        let hops = root.child(&PathArgument::node("hop")).unwrap();
        assert!(hops.child(&PathArgument::position("hop", 0)).is_some());

        let dns = root.child(&PathArgument::node("dns")).unwrap();
        let entry = dns.child(&PathArgument::value("dns", "10.0.0.1")).unwrap();
        assert_eq!(entry.kind(), NodeKind::LeafListEntry);
    }

    #[test]
    fn test_verify_structure_rejects_wrong_kind() {
        let root = config();
        let err = c_strategy(&root)
            .verify_structure(&DataNode::leaf("c", true), false)
            .unwrap_err();
        assert!(matches!(err, ModificationError::StructuralTypeMismatch { .. }));
    }

    #[test]
    fn test_verify_structure_names_unknown_child() {
        let root = config();
        let value = DataNode::container(
            "c",
            [
                DataNode::leaf("x", LeafValue::uint(1)),
                DataNode::leaf("z", LeafValue::uint(9)),
            ],
        );

        assert!(c_strategy(&root).verify_structure(&value, false).is_ok());
        match c_strategy(&root).verify_structure(&value, true).unwrap_err() {
            ModificationError::SchemaValidation { identifier, .. } => {
                assert_eq!(identifier, PathArgument::node("z"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_operational_skips_deep_validation() {
        let root = ModificationApplyOperation::from_schema(&schema(), TreeType::Operational);
        let value = DataNode::container("c", [DataNode::leaf("z", LeafValue::uint(9))]);
        assert!(c_strategy(&root).verify_structure(&value, true).is_ok());
        assert!(c_strategy(&root)
            .verify_structure(&DataNode::leaf("c", true), true)
            .is_err());
    }

    #[test]
    fn test_leaf_range_and_type() {
        let root = config();
        let value = DataNode::container("c", [DataNode::leaf("x", LeafValue::uint(300))]);
        assert!(matches!(
            c_strategy(&root).verify_structure(&value, true),
            Err(ModificationError::SchemaValidation { .. })
        ));

        let value = DataNode::container("c", [DataNode::leaf("x", "one")]);
        assert!(matches!(
            c_strategy(&root).verify_structure(&value, true),
            Err(ModificationError::StructuralTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_keyed_entry_keys_must_match_identifier() {
        let root = config();
        let users = root.child(&PathArgument::node("user")).unwrap();
        let id = PathArgument::entry("user", [("name", "alice")]);
        let entry = users.child(&id).unwrap();

        let good = DataNode::list_entry(id.clone(), [DataNode::leaf("name", "alice")]);
        assert!(entry.verify_structure(&good, true).is_ok());

        let wrong = DataNode::list_entry(id.clone(), [DataNode::leaf("name", "bob")]);
        assert!(entry.verify_structure(&wrong, true).is_err());

        let missing = DataNode::list_entry(id, [DataNode::leaf("uid", LeafValue::uint(1))]);
        assert!(entry.verify_structure(&missing, true).is_err());
    }

    #[test]
    fn test_choice_value_from_two_cases_rejected() {
        let root = config();
        let choice = root.child(&PathArgument::node("transport")).unwrap();
        let value = DataNode::choice(
            "transport",
            [
                DataNode::leaf("port", LeafValue::uint(22)),
                DataNode::leaf("socket", "/run/ssh"),
            ],
        );
        assert!(matches!(
            choice.verify_structure(&value, true),
            Err(ModificationError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_touch_without_children_preserves_identity() {
        let root = config();
        let current = c_node(Version::initial());

        let mut modification = ModifiedNode::new(PathArgument::node("c"), Some(Arc::clone(&current)));
        modification.touch();

        let result = c_strategy(&root)
            .apply(&mut modification, Some(&current), Version::initial().next())
            .unwrap()
            .unwrap();

        assert!(Arc::ptr_eq(&result, &current));
        assert_eq!(modification.modification_type(), Some(ModificationType::Unmodified));
    }

    #[test]
    fn test_merge_without_children_preserves_identity() {
        let root = config();
        let current = c_node(Version::initial());

        let mut modification = ModifiedNode::new(PathArgument::node("c"), Some(Arc::clone(&current)));
        modification.merge(Arc::new(DataNode::container("c", [])));

        let result = c_strategy(&root)
            .apply(&mut modification, Some(&current), Version::initial().next())
            .unwrap()
            .unwrap();

        assert!(Arc::ptr_eq(&result, &current));
        assert_eq!(modification.modification_type(), Some(ModificationType::Unmodified));
    }

    #[test]
    fn test_unmodified_children_collapse() {
        let root = config();
        let current = c_node(Version::initial());

        let mut modification = ModifiedNode::new(PathArgument::node("c"), Some(Arc::clone(&current)));
        modification.touch();
        modification.modified_child(&PathArgument::node("x"));

        let result = c_strategy(&root)
            .apply(&mut modification, Some(&current), Version::initial().next())
            .unwrap()
            .unwrap();

        assert!(Arc::ptr_eq(&result, &current));
        assert_eq!(modification.modification_type(), Some(ModificationType::Unmodified));
        assert_eq!(
            modification.child(&PathArgument::node("x")).unwrap().modification_type(),
            Some(ModificationType::Unmodified)
        );
    }

    #[test]
    fn test_touch_shares_untouched_children() {
        let root = config();
        let v0 = Version::initial();
        let v1 = v0.next();
        let current = c_node(v0);

        let mut modification = ModifiedNode::new(PathArgument::node("c"), Some(Arc::clone(&current)));
        modification.touch();
        modification
            .modified_child(&PathArgument::node("x"))
            .write(Arc::new(DataNode::leaf("x", LeafValue::uint(5))));

        let result = c_strategy(&root)
            .apply(&mut modification, Some(&current), v1)
            .unwrap()
            .unwrap();

        assert_eq!(modification.modification_type(), Some(ModificationType::SubtreeModified));
        assert_eq!(result.version(), v0);
        assert_eq!(result.subtree_version(), v1);
        assert_eq!(
            result.child(&PathArgument::node("x")).unwrap().data().value(),
            Some(&LeafValue::uint(5))
        );

        let y_before = current.data().child(&PathArgument::node("y")).unwrap();
        let y_after = result.data().child(&PathArgument::node("y")).unwrap();
        assert!(Arc::ptr_eq(y_before, y_after));
    }

    #[test]
    fn test_write_with_overlay_is_rematerialized() {
        let root = config();
        let v1 = Version::initial().next();

        let mut modification = ModifiedNode::new(PathArgument::node("c"), None);
        modification.write(Arc::new(DataNode::container(
            "c",
            [DataNode::leaf("x", LeafValue::uint(1))],
        )));
        modification
            .modified_child(&PathArgument::node("y"))
            .write(Arc::new(DataNode::leaf("y", LeafValue::uint(3))));

        let result = c_strategy(&root).apply(&mut modification, None, v1).unwrap().unwrap();

        assert_eq!(result.materialized_child_count(), 0);
        assert_eq!(result.version(), v1);
        assert_eq!(result.subtree_version(), v1);
        assert_eq!(result.data().child_count(), 2);
        assert_eq!(modification.modification_type(), Some(ModificationType::Write));
    }

    #[test]
    fn test_check_touch_on_missing_node() {
        let root = config();
        let path = InstancePath::new(vec![PathArgument::node("c")]);
        let mut modification = ModifiedNode::new(PathArgument::node("c"), None);
        modification.touch();

        let err = c_strategy(&root).check_applicable(&path, &modification, None).unwrap_err();
        assert!(matches!(err, ModificationError::NodeDoesNotExist { .. }));
    }

    #[test]
    fn test_check_touch_on_concurrently_deleted_node() {
        let root = config();
        let path = InstancePath::new(vec![PathArgument::node("c")]);
        let mut modification =
            ModifiedNode::new(PathArgument::node("c"), Some(c_node(Version::initial())));
        modification.touch();

        let err = c_strategy(&root).check_applicable(&path, &modification, None).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_check_write_on_concurrently_replaced_node() {
        let root = config();
        let path = InstancePath::new(vec![PathArgument::node("c")]);
        let mut modification =
            ModifiedNode::new(PathArgument::node("c"), Some(c_node(Version::initial())));
        modification.write(Arc::new(DataNode::container("c", [])));

        let replaced = c_node(Version::initial().next());
        let err = c_strategy(&root)
            .check_applicable(&path, &modification, Some(&replaced))
            .unwrap_err();
        assert!(err.is_conflict());

        let same_version = c_node(Version::initial());
        assert!(c_strategy(&root)
            .check_applicable(&path, &modification, Some(&same_version))
            .is_ok());
    }

    #[test]
    fn test_root_identifier_strategy_kind() {
        let root = config();
        assert_eq!(root.kind(), NodeKind::Container);
        let empty = root.empty_value(&root_identifier()).unwrap();
        assert!(empty.is_empty_container());
    }
}

//! Strategy for node kinds that own a collection of children
//!
//! Containers, keyed and unkeyed lists, list entries, leaf-lists and choices
//! share one algorithm; they differ only in how a child identifier resolves to
//! a child strategy and in a few kind-specific value checks.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::data::{DataNode, DataNodeBuilder, InstancePath, NodeKind, PathArgument, QName};
use crate::tree::{MutableTreeNode, TreeNode, TreeNodeFactory, Version};

use super::errors::{ModificationError, ModificationResult};
use super::modified_node::{LogicalOperation, ModificationType, ModifiedNode, Operation};
use super::operation::ModificationApplyOperation;

/// How child identifiers map to child strategies.
#[derive(Debug)]
pub(crate) enum ChildResolver {
    /// `Node(name)` children, one strategy per schema child.
    Named(BTreeMap<QName, ModificationApplyOperation>),
    /// Keyed list entries carrying exactly the declared keys.
    Entry {
        name: QName,
        keys: BTreeSet<QName>,
        entry: Box<ModificationApplyOperation>,
    },
    /// Unkeyed list entries.
    Position {
        name: QName,
        entry: Box<ModificationApplyOperation>,
    },
    /// Leaf-list entries.
    Value {
        name: QName,
        entry: Box<ModificationApplyOperation>,
    },
}

/// Strategy shared by every container-like node kind.
#[derive(Debug)]
pub struct NodeContainerStrategy {
    kind: NodeKind,
    verify_children: bool,
    structural: bool,
    resolver: ChildResolver,
    keys: Vec<QName>,
    cases: Vec<(QName, BTreeSet<QName>)>,
}

impl NodeContainerStrategy {
    pub(crate) fn new(
        kind: NodeKind,
        verify_children: bool,
        structural: bool,
        resolver: ChildResolver,
    ) -> Self {
        Self {
            kind,
            verify_children,
            structural,
            resolver,
            keys: Vec::new(),
            cases: Vec::new(),
        }
    }

    /// Key leaves of a keyed list entry.
    pub(crate) fn with_keys(mut self, keys: Vec<QName>) -> Self {
        self.keys = keys;
        self
    }

    /// Member names of each case of a choice.
    pub(crate) fn with_cases(mut self, cases: Vec<(QName, BTreeSet<QName>)>) -> Self {
        self.cases = cases;
        self
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn is_structural(&self) -> bool {
        self.structural
    }

    pub(crate) fn verifies_children(&self) -> bool {
        self.verify_children
    }

    pub(crate) fn child(&self, id: &PathArgument) -> Option<&ModificationApplyOperation> {
        match (&self.resolver, id) {
            (ChildResolver::Named(children), PathArgument::Node(name)) => children.get(name),
            (
                ChildResolver::Entry { name, keys, entry },
                PathArgument::Entry {
                    name: entry_name,
                    keys: entry_keys,
                },
            ) if name == entry_name && entry_keys.keys().eq(keys.iter()) => Some(entry.as_ref()),
            (ChildResolver::Position { name, entry }, PathArgument::Position { name: entry_name, .. })
                if name == entry_name =>
            {
                Some(entry.as_ref())
            }
            (ChildResolver::Value { name, entry }, PathArgument::Value { name: entry_name, .. })
                if name == entry_name =>
            {
                Some(entry.as_ref())
            }
            _ => None,
        }
    }

    fn resolve_child(&self, id: &PathArgument) -> ModificationResult<&ModificationApplyOperation> {
        self.child(id).ok_or_else(|| {
            ModificationError::schema(id, format!("Child {} is not valid child according to schema.", id))
        })
    }

    pub(crate) fn verify_structure(
        &self,
        value: &DataNode,
        verify_children: bool,
    ) -> ModificationResult<()> {
        if value.kind() != self.kind {
            return Err(ModificationError::type_mismatch(
                value.identifier(),
                self.kind.as_str(),
                value.kind().as_str(),
            ));
        }
        if verify_children && self.verify_children {
            self.verify_value_children(value)?;
        }
        Ok(())
    }

    fn verify_value_children(&self, value: &DataNode) -> ModificationResult<()> {
        for child in value.children() {
            self.resolve_child(child.identifier())?
                .verify_structure(child, true)?;
        }
        self.verify_keys(value)?;
        self.verify_single_case(value.children().map(|child| child.identifier()))
    }

    fn verify_keys(&self, value: &DataNode) -> ModificationResult<()> {
        if self.keys.is_empty() {
            return Ok(());
        }
        let PathArgument::Entry { keys, .. } = value.identifier() else {
            return Ok(());
        };
        for (key, expected) in keys {
            let actual = value
                .child(&PathArgument::Node(key.clone()))
                .and_then(|leaf| leaf.value());
            match actual {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(ModificationError::schema(
                        value.identifier(),
                        format!("Key leaf {} is {} but the entry is identified by {}", key, actual, expected),
                    ))
                }
                None => {
                    return Err(ModificationError::schema(
                        value.identifier(),
                        format!("Key leaf {} is missing", key),
                    ))
                }
            }
        }
        Ok(())
    }

    fn case_of(&self, name: &QName) -> Option<&QName> {
        self.cases
            .iter()
            .find(|(_, members)| members.contains(name))
            .map(|(case, _)| case)
    }

    fn verify_single_case<'a>(
        &self,
        ids: impl Iterator<Item = &'a PathArgument>,
    ) -> ModificationResult<()> {
        if self.cases.is_empty() {
            return Ok(());
        }
        let mut active: Option<&QName> = None;
        for id in ids {
            let Some(case) = self.case_of(id.node_type()) else {
                continue;
            };
            match active {
                None => active = Some(case),
                Some(present) if present == case => {}
                Some(present) => {
                    return Err(ModificationError::schema(
                        id,
                        format!("Child {} belongs to case {} but case {} is already present", id, case, present),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Staged children that leave a node in place.
    fn present_children<'a>(
        modification: &'a ModifiedNode,
    ) -> impl Iterator<Item = &'a PathArgument> + 'a {
        modification
            .children()
            .filter(|child| {
                matches!(
                    child.operation(),
                    LogicalOperation::Touch | LogicalOperation::Write | LogicalOperation::Merge
                )
            })
            .map(|child| child.identifier())
    }

    /// Rejects staged changes that would make an entry disagree with its identifier.
    fn check_key_modifications(&self, modification: &ModifiedNode) -> ModificationResult<()> {
        if self.keys.is_empty() {
            return Ok(());
        }
        let PathArgument::Entry { keys, .. } = modification.identifier() else {
            return Ok(());
        };
        for key in &self.keys {
            let Some(child) = modification.child(&PathArgument::Node(key.clone())) else {
                continue;
            };
            match child.op() {
                Operation::Delete => {
                    return Err(ModificationError::schema(
                        child.identifier(),
                        format!("Key leaf {} of {} cannot be deleted", key, modification.identifier()),
                    ))
                }
                Operation::Write(value) | Operation::Merge(value)
                    if value.value() != keys.get(key) =>
                {
                    return Err(ModificationError::schema(
                        child.identifier(),
                        format!("Key leaf {} of {} cannot change its value", key, modification.identifier()),
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn check_touch_applicable(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        current: Option<&Arc<TreeNode>>,
    ) -> ModificationResult<()> {
        if current.is_none() && !self.structural {
            return Err(match modification.original() {
                Some(_) => ModificationError::conflict(path, "Node was deleted by other transaction."),
                None => ModificationError::does_not_exist(
                    path,
                    "Node does not exist. Cannot apply modification to its children.",
                ),
            });
        }
        self.check_children_applicable(path, modification, current)
    }

    fn check_children_applicable(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        current: Option<&Arc<TreeNode>>,
    ) -> ModificationResult<()> {
        if self.verify_children {
            self.verify_single_case(Self::present_children(modification))?;
        }
        self.check_key_modifications(modification)?;
        for child in modification.children() {
            let id = child.identifier();
            let strategy = self.resolve_child(id)?;
            let child_current = current.and_then(|node| node.child(id));
            strategy.check_applicable(&path.child(id.clone()), child, child_current.as_ref())?;
        }
        Ok(())
    }

    /// Checks children staged below a written value against that value.
    pub(crate) fn check_overlay_children(
        &self,
        path: &InstancePath,
        modification: &ModifiedNode,
        base: Option<&Arc<DataNode>>,
    ) -> ModificationResult<()> {
        if self.verify_children {
            self.verify_single_case(Self::present_children(modification))?;
        }
        self.check_key_modifications(modification)?;
        for child in modification.children() {
            let id = child.identifier();
            let strategy = self.resolve_child(id)?;
            let child_base = base.and_then(|value| value.child(id));
            strategy.check_overlay_applicable(&path.child(id.clone()), child, child_base)?;
        }
        Ok(())
    }

    pub(crate) fn apply_touch(
        &self,
        modification: &mut ModifiedNode,
        current: &Arc<TreeNode>,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        if !modification.has_children() {
            modification.resolve(ModificationType::Unmodified);
            return Ok(Some(Arc::clone(current)));
        }

        let (node, changed) = self.mutate_children(modification, current, version)?;
        if !changed {
            modification.resolve(ModificationType::Unmodified);
            return Ok(Some(Arc::clone(current)));
        }
        if self.structural && node.data().is_empty_container() {
            modification.resolve(ModificationType::Disappeared);
            return Ok(None);
        }
        modification.resolve(ModificationType::SubtreeModified);
        Ok(Some(node))
    }

    /// Applies children to an absent structural node, creating it if any remain.
    pub(crate) fn apply_appeared(
        &self,
        modification: &mut ModifiedNode,
        version: Version,
    ) -> ModificationResult<Option<Arc<TreeNode>>> {
        let base = TreeNodeFactory::create(self.empty_value(modification.identifier())?, version);
        let (node, changed) = self.mutate_children(modification, &base, version)?;
        if !changed || node.data().is_empty_container() {
            modification.resolve(ModificationType::Unmodified);
            return Ok(None);
        }
        modification.resolve(ModificationType::Appeared);
        Ok(Some(node))
    }

    /// Applies every staged child on top of `base`.
    ///
    /// Returns the sealed node and whether any child changed.
    pub(crate) fn mutate_children(
        &self,
        modification: &mut ModifiedNode,
        base: &Arc<TreeNode>,
        version: Version,
    ) -> ModificationResult<(Arc<TreeNode>, bool)> {
        let mut data = DataNodeBuilder::from_node(base.data()).ok_or_else(|| {
            ModificationError::Internal(format!("{} does not hold children", base.identifier()))
        })?;
        let mut meta = base.mutable();
        meta.set_subtree_version(version);

        let mut changed = self.exclude_other_cases(modification, base.data(), &mut data, &mut meta);

        for child in modification.children_mut() {
            let id = child.identifier().clone();
            let strategy = self.resolve_child(&id)?;
            let current = meta.child(&id);
            match strategy.apply(child, current.as_ref(), version)? {
                Some(node) => {
                    data.add_child(Arc::clone(node.data()));
                    meta.add_child(node);
                }
                None => {
                    data.remove_child(&id);
                    meta.remove_child(&id);
                }
            }
            changed |= child.modification_type() != Some(ModificationType::Unmodified);
        }

        meta.set_data(data.build());
        Ok((meta.seal(), changed))
    }

    /// Removes children of every case other than the one being populated.
    fn exclude_other_cases(
        &self,
        modification: &ModifiedNode,
        value: &DataNode,
        data: &mut DataNodeBuilder,
        meta: &mut MutableTreeNode,
    ) -> bool {
        if self.cases.is_empty() {
            return false;
        }
        let Some(active) = Self::present_children(modification)
            .find_map(|id| self.case_of(id.node_type()))
        else {
            return false;
        };

        let mut removed = false;
        for child in value.children() {
            let id = child.identifier();
            if matches!(self.case_of(id.node_type()), Some(case) if case != active) {
                data.remove_child(id);
                meta.remove_child(id);
                removed = true;
            }
        }
        removed
    }

    pub(crate) fn empty_value(&self, identifier: &PathArgument) -> ModificationResult<Arc<DataNode>> {
        let mut builder = DataNodeBuilder::new(self.kind, identifier.clone()).ok_or_else(|| {
            ModificationError::Internal(format!("{} cannot hold children", self.kind))
        })?;
        if let PathArgument::Entry { keys, .. } = identifier {
            for (key, value) in keys {
                builder.add_child(Arc::new(DataNode::leaf(key.clone(), value.clone())));
            }
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LeafValue;
    use crate::schema::{ChoiceCase, LeafType, SchemaContext, SchemaNode, TreeType};

    fn root() -> ModificationApplyOperation {
        root_for(TreeType::Configuration)
    }

    fn root_for(tree_type: TreeType) -> ModificationApplyOperation {
        let schema = SchemaContext::new(vec![
            SchemaNode::structural_container(
                "settings",
                vec![SchemaNode::leaf("verbose", LeafType::Boolean)],
            ),
            SchemaNode::choice(
                "transport",
                vec![
                    ChoiceCase::new("tcp", vec![SchemaNode::leaf("port", LeafType::uint())]),
                    ChoiceCase::new("unix", vec![SchemaNode::leaf("socket", LeafType::string())]),
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
            SchemaNode::leaf_list("tag", LeafType::string()),
        ]);
        ModificationApplyOperation::from_schema(&schema, tree_type)
    }

    #[test]
    fn test_structural_touch_appears_and_disappears() {
        let root = root();
        let settings = root.child(&PathArgument::node("settings")).unwrap();
        let v1 = Version::initial().next();

        let mut appear = ModifiedNode::new(PathArgument::node("settings"), None);
        appear.touch();
        appear
            .modified_child(&PathArgument::node("verbose"))
            .write(Arc::new(DataNode::leaf("verbose", true)));

        let path = InstancePath::new(vec![PathArgument::node("settings")]);
        assert!(settings.check_applicable(&path, &appear, None).is_ok());

        let created = settings.apply(&mut appear, None, v1).unwrap().unwrap();
        assert_eq!(appear.modification_type(), Some(ModificationType::Appeared));
        assert_eq!(created.data().child_count(), 1);

        let mut disappear = ModifiedNode::new(PathArgument::node("settings"), Some(Arc::clone(&created)));
        disappear.touch();
        disappear.modified_child(&PathArgument::node("verbose")).delete();

        let result = settings.apply(&mut disappear, Some(&created), v1.next()).unwrap();
        assert!(result.is_none());
        assert_eq!(disappear.modification_type(), Some(ModificationType::Disappeared));
    }

    #[test]
    fn test_choice_case_exclusion_on_apply() {
        let root = root();
        let transport = root.child(&PathArgument::node("transport")).unwrap();
        let current = TreeNodeFactory::create(
            Arc::new(DataNode::choice("transport", [DataNode::leaf("port", LeafValue::uint(22))])),
            Version::initial(),
        );

        let mut modification =
            ModifiedNode::new(PathArgument::node("transport"), Some(Arc::clone(&current)));
        modification.touch();
        modification
            .modified_child(&PathArgument::node("socket"))
            .write(Arc::new(DataNode::leaf("socket", "/run/app.sock")));

        let result = transport
            .apply(&mut modification, Some(&current), Version::initial().next())
            .unwrap()
            .unwrap();

        assert!(result.child(&PathArgument::node("port")).is_none());
        assert!(result.child(&PathArgument::node("socket")).is_some());
    }

    #[test]
    fn test_staging_two_cases_rejected() {
        let root = root();
        let transport = root.child(&PathArgument::node("transport")).unwrap();

        let mut modification = ModifiedNode::new(PathArgument::node("transport"), None);
        modification.touch();
        modification
            .modified_child(&PathArgument::node("socket"))
            .write(Arc::new(DataNode::leaf("socket", "/run/app.sock")));
        modification
            .modified_child(&PathArgument::node("port"))
            .write(Arc::new(DataNode::leaf("port", LeafValue::uint(80))));

        let path = InstancePath::new(vec![PathArgument::node("transport")]);
        assert!(matches!(
            transport.check_applicable(&path, &modification, None),
            Err(ModificationError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_operational_staging_two_cases_accepted() {
        let root = root_for(TreeType::Operational);
        let transport = root.child(&PathArgument::node("transport")).unwrap();

        let mut modification = ModifiedNode::new(PathArgument::node("transport"), None);
        modification.touch();
        modification
            .modified_child(&PathArgument::node("socket"))
            .write(Arc::new(DataNode::leaf("socket", "/run/app.sock")));
        modification
            .modified_child(&PathArgument::node("port"))
            .write(Arc::new(DataNode::leaf("port", LeafValue::uint(80))));

        let path = InstancePath::new(vec![PathArgument::node("transport")]);
        assert!(transport.check_applicable(&path, &modification, None).is_ok());

        let written = DataNode::choice(
            "transport",
            [
                DataNode::leaf("port", LeafValue::uint(80)),
                DataNode::leaf("socket", "/run/app.sock"),
            ],
        );
        assert!(transport.verify_structure(&written, true).is_ok());
    }

    #[test]
    fn test_empty_structural_write_is_removed() {
        let root = root();
        let v1 = Version::initial().next();
        let empties = [
            DataNode::container("settings", []),
            DataNode::keyed_list("user", []),
            DataNode::leaf_list("tag", []),
        ];

        for empty in empties {
            let id = empty.identifier().clone();
            let strategy = root.child(&id).unwrap();
            let path = InstancePath::new(vec![id.clone()]);

            let mut modification = ModifiedNode::new(id.clone(), None);
            modification.write(Arc::new(empty));
            assert!(strategy.check_applicable(&path, &modification, None).is_ok());

            let result = strategy.apply(&mut modification, None, v1).unwrap();
            assert!(result.is_none(), "{} should not be created empty", id);
            assert_eq!(modification.modification_type(), Some(ModificationType::Unmodified));
        }
    }

    #[test]
    fn test_empty_structural_write_removes_existing() {
        let root = root();
        let settings = root.child(&PathArgument::node("settings")).unwrap();
        let current = TreeNodeFactory::create(
            Arc::new(DataNode::container("settings", [DataNode::leaf("verbose", true)])),
            Version::initial(),
        );

        let mut modification =
            ModifiedNode::new(PathArgument::node("settings"), Some(Arc::clone(&current)));
        modification.write(Arc::new(DataNode::container("settings", [])));

        let result = settings
            .apply(&mut modification, Some(&current), Version::initial().next())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(modification.modification_type(), Some(ModificationType::Disappeared));
    }

    #[test]
    fn test_structural_write_emptied_by_overlay_is_removed() {
        let root = root();
        let settings = root.child(&PathArgument::node("settings")).unwrap();

        let mut modification = ModifiedNode::new(PathArgument::node("settings"), None);
        modification.write(Arc::new(DataNode::container(
            "settings",
            [DataNode::leaf("verbose", true)],
        )));
        modification.modified_child(&PathArgument::node("verbose")).delete();

        let path = InstancePath::new(vec![PathArgument::node("settings")]);
        assert!(settings.check_applicable(&path, &modification, None).is_ok());

        let result = settings
            .apply(&mut modification, None, Version::initial().next())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(modification.modification_type(), Some(ModificationType::Unmodified));
    }

    #[test]
    fn test_key_leaf_cannot_change() {
        let root = root();
        let id = PathArgument::entry("user", [("name", "alice")]);
        let entry = root
            .child(&PathArgument::node("user"))
            .and_then(|list| list.child(&id))
            .unwrap();
        let current = TreeNodeFactory::create(
            Arc::new(DataNode::list_entry(id.clone(), [DataNode::leaf("name", "alice")])),
            Version::initial(),
        );
        let path = InstancePath::new(vec![PathArgument::node("user"), id.clone()]);

        let mut modification = ModifiedNode::new(id.clone(), Some(Arc::clone(&current)));
        modification.touch();
        modification
            .modified_child(&PathArgument::node("name"))
            .write(Arc::new(DataNode::leaf("name", "bob")));
        assert!(entry.check_applicable(&path, &modification, Some(&current)).is_err());

        let mut modification = ModifiedNode::new(id, Some(Arc::clone(&current)));
        modification.touch();
        modification
            .modified_child(&PathArgument::node("uid"))
            .write(Arc::new(DataNode::leaf("uid", LeafValue::uint(1000))));
        assert!(entry.check_applicable(&path, &modification, Some(&current)).is_ok());
    }

    #[test]
    fn test_empty_entry_keeps_keys() {
        let root = root();
        let id = PathArgument::entry("user", [("name", "alice")]);
        let entry = root
            .child(&PathArgument::node("user"))
            .and_then(|list| list.child(&id))
            .unwrap();

        let empty = entry.empty_value(&id).unwrap();
        assert_eq!(empty.kind(), NodeKind::ListEntry);
        assert_eq!(
            empty.child(&PathArgument::node("name")).and_then(|leaf| leaf.value()),
            Some(&LeafValue::string("alice"))
        );
    }
}

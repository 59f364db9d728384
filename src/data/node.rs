//! DataNode - immutable document value
//!
//! A data node is either terminal (leaf, leaf-list entry) and carries a
//! `LeafValue`, or a container of child values ordered by identifier.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{LeafValue, PathArgument, QName};

/// Children of a container value, ordered by identifier.
pub type ChildMap = BTreeMap<PathArgument, Arc<DataNode>>;

/// Runtime shape of a data node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Container (also the tree root).
    Container,
    /// Choice holding the children of one case.
    Choice,
    /// Keyed list; children are `ListEntry` values.
    KeyedList,
    /// Keyed list entry.
    ListEntry,
    /// Unkeyed list; children are `UnkeyedEntry` values.
    UnkeyedList,
    /// Unkeyed list entry.
    UnkeyedEntry,
    /// Leaf-list; children are `LeafListEntry` values.
    LeafList,
    /// Leaf-list entry.
    LeafListEntry,
    /// Leaf.
    Leaf,
}

impl NodeKind {
    /// Returns true for kinds that carry a `LeafValue` instead of children.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::LeafListEntry)
    }

    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Choice => "choice",
            NodeKind::KeyedList => "keyed-list",
            NodeKind::ListEntry => "list-entry",
            NodeKind::UnkeyedList => "unkeyed-list",
            NodeKind::UnkeyedEntry => "unkeyed-entry",
            NodeKind::LeafList => "leaf-list",
            NodeKind::LeafListEntry => "leaf-list-entry",
            NodeKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Body {
    Value(LeafValue),
    Children(ChildMap),
}

/// An immutable document value.
///
/// Fields are private; values are built through the kind-specific constructors
/// or `DataNodeBuilder`, which keep terminal kinds and container kinds apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataNode {
    identifier: PathArgument,
    kind: NodeKind,
    body: Body,
}

impl DataNode {
    /// Creates a leaf.
    pub fn leaf(name: impl Into<QName>, value: impl Into<LeafValue>) -> Self {
        Self {
            identifier: PathArgument::node(name),
            kind: NodeKind::Leaf,
            body: Body::Value(value.into()),
        }
    }

    /// Creates a leaf-list entry. The entry is identified by its value.
    pub fn leaf_list_entry(name: impl Into<QName>, value: impl Into<LeafValue>) -> Self {
        let value = value.into();
        Self {
            identifier: PathArgument::value(name, value.clone()),
            kind: NodeKind::LeafListEntry,
            body: Body::Value(value),
        }
    }

    /// Creates a container.
    pub fn container(name: impl Into<QName>, children: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::Container, PathArgument::node(name), children)
    }

    /// Creates a choice holding the given case children.
    pub fn choice(name: impl Into<QName>, children: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::Choice, PathArgument::node(name), children)
    }

    /// Creates a keyed list.
    pub fn keyed_list(name: impl Into<QName>, entries: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::KeyedList, PathArgument::node(name), entries)
    }

    /// Creates a keyed list entry. `identifier` should be a `PathArgument::Entry`.
    pub fn list_entry(identifier: PathArgument, children: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::ListEntry, identifier, children)
    }

    /// Creates an unkeyed list.
    pub fn unkeyed_list(name: impl Into<QName>, entries: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::UnkeyedList, PathArgument::node(name), entries)
    }

    /// Creates an unkeyed list entry at the given position.
    pub fn unkeyed_entry(
        name: impl Into<QName>,
        index: u32,
        children: impl IntoIterator<Item = DataNode>,
    ) -> Self {
        Self::with_children(NodeKind::UnkeyedEntry, PathArgument::position(name, index), children)
    }

    /// Creates a leaf-list.
    pub fn leaf_list(name: impl Into<QName>, entries: impl IntoIterator<Item = DataNode>) -> Self {
        Self::with_children(NodeKind::LeafList, PathArgument::node(name), entries)
    }

    /// Creates a container-like value of any non-terminal kind.
    ///
    /// A terminal `kind` yields a value of that kind with an `Empty` payload and
    /// the children are dropped.
    pub fn with_children(
        kind: NodeKind,
        identifier: PathArgument,
        children: impl IntoIterator<Item = DataNode>,
    ) -> Self {
        let body = if kind.is_terminal() {
            Body::Value(LeafValue::Empty)
        } else {
            Body::Children(
                children
                    .into_iter()
                    .map(|child| (child.identifier.clone(), Arc::new(child)))
                    .collect(),
            )
        };
        Self {
            identifier,
            kind,
            body,
        }
    }

    /// Returns the identifier.
    #[inline]
    pub fn identifier(&self) -> &PathArgument {
        &self.identifier
    }

    /// Returns the runtime kind.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the payload of a terminal node.
    pub fn value(&self) -> Option<&LeafValue> {
        match &self.body {
            Body::Value(value) => Some(value),
            Body::Children(_) => None,
        }
    }

    /// Returns the children of a container-like node.
    pub fn child_map(&self) -> Option<&ChildMap> {
        match &self.body {
            Body::Value(_) => None,
            Body::Children(children) => Some(children),
        }
    }

    /// Iterates children in identifier order. Terminal nodes have none.
    pub fn children(&self) -> impl Iterator<Item = &Arc<DataNode>> + '_ {
        self.child_map().into_iter().flat_map(|map| map.values())
    }

    /// Looks up a direct child.
    pub fn child(&self, id: &PathArgument) -> Option<&Arc<DataNode>> {
        self.child_map().and_then(|map| map.get(id))
    }

    /// Returns the number of direct children.
    pub fn child_count(&self) -> usize {
        self.child_map().map_or(0, |map| map.len())
    }

    /// Returns true for a container-like node with no children.
    pub fn is_empty_container(&self) -> bool {
        self.child_map().map_or(false, |map| map.is_empty())
    }
}

/// Builder for container-like values.
///
/// Seeded from an existing value, the builder copies only the child map: child
/// values themselves stay shared.
#[derive(Debug)]
pub struct DataNodeBuilder {
    identifier: PathArgument,
    kind: NodeKind,
    children: ChildMap,
}

impl DataNodeBuilder {
    /// Creates an empty builder. Returns `None` for terminal kinds.
    pub fn new(kind: NodeKind, identifier: PathArgument) -> Option<Self> {
        if kind.is_terminal() {
            return None;
        }
        Some(Self {
            identifier,
            kind,
            children: ChildMap::new(),
        })
    }

    /// Creates a builder holding the children of `node`. Returns `None` for terminal nodes.
    pub fn from_node(node: &DataNode) -> Option<Self> {
        let children = node.child_map()?.clone();
        Some(Self {
            identifier: node.identifier.clone(),
            kind: node.kind,
            children,
        })
    }

    /// Adds or replaces a child.
    pub fn add_child(&mut self, child: Arc<DataNode>) -> &mut Self {
        self.children.insert(child.identifier.clone(), child);
        self
    }

    /// Removes a child if present.
    pub fn remove_child(&mut self, id: &PathArgument) -> &mut Self {
        self.children.remove(id);
        self
    }

    /// Finalizes the value.
    pub fn build(self) -> Arc<DataNode> {
        Arc::new(DataNode {
            identifier: self.identifier,
            kind: self.kind,
            body: Body::Children(self.children),
        })
    }
}

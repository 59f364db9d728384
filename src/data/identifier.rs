//! Node identifiers and instance paths

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::LeafValue;

/// Name of a schema or data node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QName(String);

impl QName {
    /// Creates a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for QName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier of a node within its parent.
///
/// The derived ordering is the iteration order of children everywhere in the
/// crate: by variant, then name, then keys, value or position.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathArgument {
    /// Container, choice, leaf, list, leaf-list or unkeyed-list node.
    Node(QName),
    /// Keyed list entry.
    Entry {
        name: QName,
        keys: BTreeMap<QName, LeafValue>,
    },
    /// Leaf-list entry.
    Value { name: QName, value: LeafValue },
    /// Unkeyed list entry.
    Position { name: QName, index: u32 },
}

impl PathArgument {
    /// Identifier of a plain named node.
    pub fn node(name: impl Into<QName>) -> Self {
        PathArgument::Node(name.into())
    }

    /// Identifier of a keyed list entry.
    pub fn entry<K, V>(name: impl Into<QName>, keys: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<QName>,
        V: Into<LeafValue>,
    {
        PathArgument::Entry {
            name: name.into(),
            keys: keys
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Identifier of a leaf-list entry.
    pub fn value(name: impl Into<QName>, value: impl Into<LeafValue>) -> Self {
        PathArgument::Value {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Identifier of an unkeyed list entry.
    pub fn position(name: impl Into<QName>, index: u32) -> Self {
        PathArgument::Position {
            name: name.into(),
            index,
        }
    }

    /// Returns the schema name this identifier addresses.
    pub fn node_type(&self) -> &QName {
        match self {
            PathArgument::Node(name) => name,
            PathArgument::Entry { name, .. } => name,
            PathArgument::Value { name, .. } => name,
            PathArgument::Position { name, .. } => name,
        }
    }
}

impl fmt::Display for PathArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathArgument::Node(name) => write!(f, "{}", name),
            PathArgument::Entry { name, keys } => {
                write!(f, "{}[", name)?;
                for (i, (k, v)) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "]")
            }
            PathArgument::Value { name, value } => write!(f, "{}[.={}]", name, value),
            PathArgument::Position { name, index } => write!(f, "{}[{}]", name, index),
        }
    }
}

/// Address of a node, as the identifiers leading to it from (excluding) the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InstancePath(Vec<PathArgument>);

impl InstancePath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from its arguments.
    pub fn new(args: Vec<PathArgument>) -> Self {
        Self(args)
    }

    /// Returns a new path extended by one argument.
    pub fn child(&self, arg: PathArgument) -> Self {
        let mut args = Vec::with_capacity(self.0.len() + 1);
        args.extend(self.0.iter().cloned());
        args.push(arg);
        Self(args)
    }

    /// Returns the path arguments.
    #[inline]
    pub fn args(&self) -> &[PathArgument] {
        &self.0
    }

    /// Returns the last argument, `None` for the root.
    pub fn last(&self) -> Option<&PathArgument> {
        self.0.last()
    }

    /// Returns the parent path, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Returns true if this is the root path.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this path has no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PathArgument>> for InstancePath {
    fn from(args: Vec<PathArgument>) -> Self {
        Self(args)
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for arg in &self.0 {
            write!(f, "/{}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = InstancePath::root()
            .child(PathArgument::node("interfaces"))
            .child(PathArgument::entry("interface", [("name", "eth0")]))
            .child(PathArgument::node("mtu"));

        assert_eq!(path.to_string(), "/interfaces/interface[name=eth0]/mtu");
        assert_eq!(InstancePath::root().to_string(), "/");
    }

    #[test]
    fn test_leaf_list_and_position_display() {
        assert_eq!(PathArgument::value("dns", "10.0.0.1").to_string(), "dns[.=10.0.0.1]");
        assert_eq!(PathArgument::position("hops", 2).to_string(), "hops[2]");
    }

    #[test]
    fn test_node_type() {
        let entry = PathArgument::entry("user", [("id", LeafValue::uint(3))]);
        assert_eq!(entry.node_type(), &QName::new("user"));
    }

    #[test]
    fn test_parent_and_last() {
        let path = InstancePath::new(vec![PathArgument::node("a"), PathArgument::node("b")]);
        assert_eq!(path.last(), Some(&PathArgument::node("b")));
        assert_eq!(path.parent(), Some(InstancePath::new(vec![PathArgument::node("a")])));
        assert_eq!(InstancePath::root().parent(), None);
    }

    #[test]
    fn test_ordering_groups_by_name() {
        let mut ids = vec![
            PathArgument::position("b", 1),
            PathArgument::node("a"),
            PathArgument::position("b", 0),
        ];
        ids.sort();
        assert_eq!(ids[0], PathArgument::node("a"));
        assert_eq!(ids[1], PathArgument::position("b", 0));
    }
}

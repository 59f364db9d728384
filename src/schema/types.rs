//! Schema model types
//!
//! Supported node kinds:
//! - container: presence or structural (non-presence) container
//! - list: keyed list, or unkeyed list when no keys are declared
//! - leaf-list: set of terminal values
//! - leaf: terminal value with a restricted type
//! - choice: mutually exclusive cases

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{LeafValue, QName};

/// Kind of data tree a schema is instantiated for.
///
/// Configuration trees validate written values deeply against the schema;
/// operational trees only check the shape of the node being written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    /// Intended configuration.
    #[default]
    Configuration,
    /// Operational state.
    Operational,
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeType::Configuration => write!(f, "configuration"),
            TreeType::Operational => write!(f, "operational"),
        }
    }
}

/// Inclusive bounds of a range or length restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    /// Creates a range.
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the bounds.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Restricted type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "base", rename_all = "lowercase")]
pub enum LeafType {
    /// String with optional length restriction (in characters).
    String {
        #[serde(default)]
        length: Option<Range<u64>>,
    },
    /// Boolean.
    Boolean,
    /// Presence-only.
    Empty,
    /// Signed integer with optional range restriction.
    Int {
        #[serde(default)]
        range: Option<Range<i64>>,
    },
    /// Unsigned integer with optional range restriction.
    Uint {
        #[serde(default)]
        range: Option<Range<u64>>,
    },
}

impl LeafType {
    /// Unrestricted string.
    pub fn string() -> Self {
        LeafType::String { length: None }
    }

    /// Unrestricted signed integer.
    pub fn int() -> Self {
        LeafType::Int { range: None }
    }

    /// Unrestricted unsigned integer.
    pub fn uint() -> Self {
        LeafType::Uint { range: None }
    }

    /// Unsigned 8-bit integer.
    pub fn uint8() -> Self {
        LeafType::Uint {
            range: Some(Range::new(0, u64::from(u8::MAX))),
        }
    }

    /// Returns the base type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            LeafType::String { .. } => "string",
            LeafType::Boolean => "boolean",
            LeafType::Empty => "empty",
            LeafType::Int { .. } => "int",
            LeafType::Uint { .. } => "uint",
        }
    }

    /// Returns true if the runtime representation of `value` matches this type.
    pub fn accepts(&self, value: &LeafValue) -> bool {
        matches!(
            (self, value),
            (LeafType::String { .. }, LeafValue::String(_))
                | (LeafType::Boolean, LeafValue::Boolean(_))
                | (LeafType::Empty, LeafValue::Empty)
                | (LeafType::Int { .. }, LeafValue::Int(_))
                | (LeafType::Uint { .. }, LeafValue::Uint(_))
        )
    }

    /// Checks range and length restrictions.
    ///
    /// Returns a description of the violated restriction. Values of the wrong
    /// runtime type are not checked here.
    pub fn check_restrictions(&self, value: &LeafValue) -> Result<(), String> {
        match (self, value) {
            (LeafType::String { length: Some(length) }, LeafValue::String(s)) => {
                let chars = s.chars().count() as u64;
                if !length.contains(chars) {
                    return Err(format!("length {} outside {}", chars, length));
                }
            }
            (LeafType::Int { range: Some(range) }, LeafValue::Int(i)) => {
                if !range.contains(*i) {
                    return Err(format!("value {} outside {}", i, range));
                }
            }
            (LeafType::Uint { range: Some(range) }, LeafValue::Uint(u)) => {
                if !range.contains(*u) {
                    return Err(format!("value {} outside {}", u, range));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn default_presence() -> bool {
    true
}

/// One case of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCase {
    /// Case name.
    pub name: QName,
    /// Data nodes belonging to this case.
    #[serde(default)]
    pub children: Vec<SchemaNode>,
}

impl ChoiceCase {
    /// Creates a case.
    pub fn new(name: impl Into<QName>, children: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Declared constraints of one schema node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SchemaNodeKind {
    /// Container. Non-presence containers exist only while they have children.
    Container {
        #[serde(default = "default_presence")]
        presence: bool,
        #[serde(default)]
        children: Vec<SchemaNode>,
    },
    /// List. Empty `keys` declares an unkeyed list.
    List {
        #[serde(default)]
        keys: Vec<QName>,
        #[serde(default)]
        children: Vec<SchemaNode>,
    },
    /// Leaf-list.
    LeafList {
        #[serde(rename = "type")]
        leaf_type: LeafType,
    },
    /// Leaf.
    Leaf {
        #[serde(rename = "type")]
        leaf_type: LeafType,
    },
    /// Choice.
    Choice { cases: Vec<ChoiceCase> },
}

/// A schema node: a name plus the constraints of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Node name.
    pub name: QName,
    /// Kind-specific constraints.
    #[serde(flatten)]
    pub kind: SchemaNodeKind,
}

impl SchemaNode {
    /// Creates a presence container.
    pub fn container(name: impl Into<QName>, children: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::Container {
                presence: true,
                children,
            },
        }
    }

    /// Creates a non-presence container.
    pub fn structural_container(name: impl Into<QName>, children: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::Container {
                presence: false,
                children,
            },
        }
    }

    /// Creates a list. Pass no keys for an unkeyed list.
    pub fn list<K: Into<QName>>(
        name: impl Into<QName>,
        keys: impl IntoIterator<Item = K>,
        children: Vec<SchemaNode>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::List {
                keys: keys.into_iter().map(Into::into).collect(),
                children,
            },
        }
    }

    /// Creates a leaf-list.
    pub fn leaf_list(name: impl Into<QName>, leaf_type: LeafType) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::LeafList { leaf_type },
        }
    }

    /// Creates a leaf.
    pub fn leaf(name: impl Into<QName>, leaf_type: LeafType) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::Leaf { leaf_type },
        }
    }

    /// Creates a choice.
    pub fn choice(name: impl Into<QName>, cases: Vec<ChoiceCase>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaNodeKind::Choice { cases },
        }
    }

    /// Returns the directly declared data children.
    ///
    /// For a choice these are the children of all cases.
    pub fn children(&self) -> Vec<&SchemaNode> {
        match &self.kind {
            SchemaNodeKind::Container { children, .. } | SchemaNodeKind::List { children, .. } => {
                children.iter().collect()
            }
            SchemaNodeKind::Choice { cases } => {
                cases.iter().flat_map(|case| case.children.iter()).collect()
            }
            SchemaNodeKind::LeafList { .. } | SchemaNodeKind::Leaf { .. } => Vec::new(),
        }
    }

    /// Looks up a data child by name.
    pub fn child(&self, name: &QName) -> Option<&SchemaNode> {
        self.children().into_iter().find(|child| &child.name == name)
    }

    /// Returns true for a list with a key definition.
    pub fn key_definition_present(&self) -> bool {
        matches!(&self.kind, SchemaNodeKind::List { keys, .. } if !keys.is_empty())
    }
}

/// Root of a schema model.
///
/// The root is a presence container named `data::ROOT_NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContext {
    root: SchemaNode,
}

impl SchemaContext {
    /// Creates a context from the top-level schema nodes.
    pub fn new(children: Vec<SchemaNode>) -> Self {
        Self {
            root: SchemaNode::container(crate::data::ROOT_NAME, children),
        }
    }

    /// Returns the root container.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }
}

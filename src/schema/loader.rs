//! Schema loader for reading a schema model from JSON
//!
//! The model document is an object with a `nodes` array of top-level schema
//! nodes. Loading validates the structure before a `SchemaContext` is handed out:
//! - sibling names are unique (choice cases share one namespace)
//! - list keys name leaf children
//! - choices declare at least one case

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{SchemaError, SchemaResult};
use super::types::{SchemaContext, SchemaNode, SchemaNodeKind};

#[derive(Debug, Deserialize)]
struct ModelDocument {
    nodes: Vec<SchemaNode>,
}

/// Loads and validates schema models.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a schema model file.
    pub fn load_file(path: &Path) -> SchemaResult<SchemaContext> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::unreadable(path.display().to_string(), e.to_string())
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Loads a schema model from a JSON string.
    pub fn from_json_str(content: &str) -> SchemaResult<SchemaContext> {
        Self::parse("<in-memory>", content)
    }

    /// Validates programmatically built top-level nodes.
    pub fn from_nodes(nodes: Vec<SchemaNode>) -> SchemaResult<SchemaContext> {
        let context = SchemaContext::new(nodes);
        validate_node(context.root())?;
        Ok(context)
    }

    fn parse(source: &str, content: &str) -> SchemaResult<SchemaContext> {
        let document: ModelDocument = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(source, format!("Invalid JSON: {}", e)))?;
        let top_level = document.nodes.len().to_string();
        let context = Self::from_nodes(document.nodes)?;
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("nodes", top_level.as_str()), ("source", source)],
        );
        Ok(context)
    }
}

fn validate_node(node: &SchemaNode) -> SchemaResult<()> {
    let children = node.children();

    let mut seen = HashSet::new();
    for child in &children {
        if !seen.insert(&child.name) {
            return Err(SchemaError::duplicate_child(node.name.as_str(), child.name.as_str()));
        }
    }

    match &node.kind {
        SchemaNodeKind::List { keys, .. } => {
            for key in keys {
                let is_leaf = children
                    .iter()
                    .any(|c| &c.name == key && matches!(c.kind, SchemaNodeKind::Leaf { .. }));
                if !is_leaf {
                    return Err(SchemaError::invalid_key(node.name.as_str(), key.as_str()));
                }
            }
        }
        SchemaNodeKind::Choice { cases } if cases.is_empty() => {
            return Err(SchemaError::empty_choice(node.name.as_str()));
        }
        _ => {}
    }

    for child in children {
        validate_node(child)?;
    }
    Ok(())
}

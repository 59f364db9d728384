//! # Modification Errors
//!
//! Raised while staging a modification or during the validate pass. The apply
//! pass only ever reports `Internal`, which indicates a defect rather than a
//! caller error.

use thiserror::Error;

use crate::data::{InstancePath, PathArgument};

/// Result type for modification operations
pub type ModificationResult<T> = Result<T, ModificationError>;

/// Modification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModificationError {
    #[error("Schema validation failed for {identifier}: {message}")]
    SchemaValidation {
        identifier: PathArgument,
        message: String,
    },

    #[error("Node {identifier} has unexpected type: expected {expected}, found {found}")]
    StructuralTypeMismatch {
        identifier: PathArgument,
        expected: String,
        found: String,
    },

    #[error("Node {path} does not exist: {message}")]
    NodeDoesNotExist { path: InstancePath, message: String },

    #[error("Conflicting modification for {path}: {message}")]
    ConflictingModification { path: InstancePath, message: String },

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ModificationError {
    pub(crate) fn schema(identifier: &PathArgument, message: impl Into<String>) -> Self {
        ModificationError::SchemaValidation {
            identifier: identifier.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(
        identifier: &PathArgument,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ModificationError::StructuralTypeMismatch {
            identifier: identifier.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn does_not_exist(path: &InstancePath, message: impl Into<String>) -> Self {
        ModificationError::NodeDoesNotExist {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn conflict(path: &InstancePath, message: impl Into<String>) -> Self {
        ModificationError::ConflictingModification {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModificationError::SchemaValidation { .. } => "DT_SCHEMA_VALIDATION",
            ModificationError::StructuralTypeMismatch { .. } => "DT_TYPE_MISMATCH",
            ModificationError::NodeDoesNotExist { .. } => "DT_NODE_DOES_NOT_EXIST",
            ModificationError::ConflictingModification { .. } => "DT_CONFLICT",
            ModificationError::IllegalArgument(_) => "DT_ILLEGAL_ARGUMENT",
            ModificationError::Internal(_) => "DT_INTERNAL",
        }
    }

    /// Returns true if rebasing and restaging may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModificationError::ConflictingModification { .. })
    }

    /// Returns true for the optimistic-concurrency failure
    pub fn is_conflict(&self) -> bool {
        self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_conflicts_are_retryable() {
        let path = InstancePath::new(vec![PathArgument::node("c")]);

        assert!(ModificationError::conflict(&path, "deleted").is_retryable());
        assert!(!ModificationError::does_not_exist(&path, "missing").is_retryable());
        assert!(!ModificationError::schema(&PathArgument::node("z"), "unknown").is_retryable());
        assert!(!ModificationError::Internal("bug".into()).is_retryable());
    }

    #[test]
    fn test_display_names_the_node() {
        let err = ModificationError::schema(&PathArgument::node("z"), "not in schema");
        assert_eq!(err.code(), "DT_SCHEMA_VALIDATION");
        assert!(err.to_string().contains('z'));

        let err = ModificationError::conflict(
            &InstancePath::new(vec![PathArgument::node("c"), PathArgument::node("y")]),
            "Node was deleted by other transaction.",
        );
        assert!(err.to_string().contains("/c/y"));
    }
}

//! Schema model error types
//!
//! Error codes:
//! - DT_SCHEMA_UNREADABLE
//! - DT_SCHEMA_MALFORMED
//! - DT_SCHEMA_DUPLICATE_CHILD
//! - DT_SCHEMA_INVALID_KEY
//! - DT_SCHEMA_EMPTY_CHOICE

use std::fmt;

/// Schema model error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Model file could not be read
    Unreadable,
    /// Model document is not valid JSON or not a valid model
    Malformed,
    /// Two siblings share a name
    DuplicateChild,
    /// List key does not name a leaf child
    InvalidKey,
    /// Choice declares no cases
    EmptyChoice,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::Unreadable => "DT_SCHEMA_UNREADABLE",
            SchemaErrorCode::Malformed => "DT_SCHEMA_MALFORMED",
            SchemaErrorCode::DuplicateChild => "DT_SCHEMA_DUPLICATE_CHILD",
            SchemaErrorCode::InvalidKey => "DT_SCHEMA_INVALID_KEY",
            SchemaErrorCode::EmptyChoice => "DT_SCHEMA_EMPTY_CHOICE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema model error with context
#[derive(Debug)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Schema node the error refers to, if any
    node: Option<String>,
}

impl SchemaError {
    /// Create an unreadable model error
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Unreadable,
            message: format!("Cannot read schema model '{}': {}", path.into(), reason.into()),
            node: None,
        }
    }

    /// Create a malformed model error
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Malformed,
            message: format!("Malformed schema model '{}': {}", source.into(), reason.into()),
            node: None,
        }
    }

    /// Create a duplicate child error
    pub fn duplicate_child(parent: impl Into<String>, child: impl Into<String>) -> Self {
        let parent = parent.into();
        Self {
            code: SchemaErrorCode::DuplicateChild,
            message: format!("'{}' declares child '{}' more than once", parent, child.into()),
            node: Some(parent),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(list: impl Into<String>, key: impl Into<String>) -> Self {
        let list = list.into();
        Self {
            code: SchemaErrorCode::InvalidKey,
            message: format!("List '{}' key '{}' is not a leaf child", list, key.into()),
            node: Some(list),
        }
    }

    /// Create an empty choice error
    pub fn empty_choice(choice: impl Into<String>) -> Self {
        let choice = choice.into();
        Self {
            code: SchemaErrorCode::EmptyChoice,
            message: format!("Choice '{}' declares no cases", choice),
            node: Some(choice),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema node name if applicable
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::Unreadable.code(), "DT_SCHEMA_UNREADABLE");
        assert_eq!(SchemaErrorCode::Malformed.code(), "DT_SCHEMA_MALFORMED");
        assert_eq!(SchemaErrorCode::DuplicateChild.code(), "DT_SCHEMA_DUPLICATE_CHILD");
        assert_eq!(SchemaErrorCode::InvalidKey.code(), "DT_SCHEMA_INVALID_KEY");
        assert_eq!(SchemaErrorCode::EmptyChoice.code(), "DT_SCHEMA_EMPTY_CHOICE");
    }

    #[test]
    fn test_display_includes_code_and_node() {
        let err = SchemaError::invalid_key("user", "id");
        let display = format!("{}", err);
        assert!(display.contains("DT_SCHEMA_INVALID_KEY"));
        assert!(display.contains("user"));
        assert_eq!(err.node(), Some("user"));
    }
}

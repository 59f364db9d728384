//! Version - Totally ordered version token
//!
//! - Stamped on tree nodes (own value and subtree) and on transactions
//! - Supports equality and ordering only
//! - Has no representation visible to callers

use std::fmt;

/// An opaque, totally ordered version token.
///
/// Versions are issued in sequence starting from `Version::initial()`.
/// No `Default` implementation exists to prevent accidental construction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version(u64);

impl Version {
    /// Returns the version of an empty, never-modified tree.
    #[inline]
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version following this one.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

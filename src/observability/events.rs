//! Observability events for the data tree
//!
//! Events are explicit and typed; each maps to one stable event name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the data tree lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// Configuration loaded
    ConfigLoaded,
    /// Schema model loaded
    SchemaLoaded,
    /// Data tree created with an empty root
    TreeCreated,

    // Validate pass
    /// Modification validated against the current snapshot
    ValidationPassed,
    /// Modification rejected by schema or existence checks
    ValidationFailed,
    /// Modification conflicts with a concurrently committed one
    ConflictDetected,

    // Apply pass
    /// Modification applied, candidate root built
    CandidatePrepared,
    /// Candidate installed as the current snapshot
    CommitApplied,
    /// Candidate no longer applies to the current snapshot
    CommitRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::TreeCreated => "DATA_TREE_CREATED",
            Event::ValidationPassed => "MODIFICATION_VALIDATED",
            Event::ValidationFailed => "MODIFICATION_REJECTED",
            Event::ConflictDetected => "MODIFICATION_CONFLICT",
            Event::CandidatePrepared => "CANDIDATE_PREPARED",
            Event::CommitApplied => "COMMIT_APPLIED",
            Event::CommitRejected => "COMMIT_REJECTED",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ValidationPassed | Event::CandidatePrepared => Severity::Trace,
            Event::ValidationFailed | Event::ConflictDetected | Event::CommitRejected => {
                Severity::Warn
            }
            Event::ConfigLoaded | Event::SchemaLoaded | Event::TreeCreated | Event::CommitApplied => {
                Severity::Info
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Metrics registry for the data tree
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of modification counters
///
/// All counters use Relaxed atomics; a snapshot is not a consistent cut across
/// counters, each value is exact on its own.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Modifications that passed validation
    validations: AtomicU64,
    /// Modifications rejected by schema or existence checks
    validation_failures: AtomicU64,
    /// Modifications rejected as conflicting
    conflicts: AtomicU64,
    /// Candidates built by the apply pass
    candidates_prepared: AtomicU64,
    /// Candidates installed as the current snapshot
    commits: AtomicU64,
    /// Commits that left the tree unchanged
    unmodified_commits: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment successful validations
    pub fn increment_validations(&self) {
        self.validations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed validations
    pub fn increment_validation_failures(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment conflicts
    pub fn increment_conflicts(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment prepared candidates
    pub fn increment_candidates_prepared(&self) {
        self.candidates_prepared.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment commits
    pub fn increment_commits(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment commits that changed nothing
    pub fn increment_unmodified_commits(&self) {
        self.unmodified_commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            validations: self.validations.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            candidates_prepared: self.candidates_prepared.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            unmodified_commits: self.unmodified_commits.load(Ordering::Relaxed),
        }
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub validations: u64,
    pub validation_failures: u64,
    pub conflicts: u64,
    pub candidates_prepared: u64,
    pub commits: u64,
    pub unmodified_commits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();

        assert_eq!(snapshot.validations, 0);
        assert_eq!(snapshot.conflicts, 0);
        assert_eq!(snapshot.commits, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_validations();
        registry.increment_validations();
        registry.increment_validation_failures();
        registry.increment_conflicts();
        registry.increment_candidates_prepared();
        registry.increment_commits();
        registry.increment_unmodified_commits();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.validations, 2);
        assert_eq!(snapshot.validation_failures, 1);
        assert_eq!(snapshot.conflicts, 1);
        assert_eq!(snapshot.candidates_prepared, 1);
        assert_eq!(snapshot.commits, 1);
        assert_eq!(snapshot.unmodified_commits, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_conflicts();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["conflicts"], 1);
        assert_eq!(parsed["commits"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_validations();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().validations, 1000);
    }
}

//! InMemoryDataTree - front-end sequencing snapshots and commits
//!
//! - Holds the current root snapshot
//! - Hands out modifications opened on that snapshot
//! - Allocates one version per prepared candidate
//! - Installs a candidate only if it was prepared against the current root

use std::sync::{Arc, Mutex, RwLock};

use crate::data::{DataNode, InstancePath, ROOT_NAME};
use crate::modification::{
    DataTreeCandidate, DataTreeModification, ModificationApplyOperation, ModificationError,
    ModificationResult,
};
use crate::observability::{log_event_above, Event, Logger, MetricsRegistry, Severity};
use crate::schema::SchemaContext;
use crate::tree::{TreeNode, TreeNodeFactory, Version};

use super::config::DataTreeConfig;

/// An in-memory, schema-aware data tree.
///
/// Readers take snapshots without blocking each other; any number of
/// modifications may be prepared concurrently against the same snapshot. The
/// first one committed wins and the others fail validation or commit with a
/// conflict.
#[derive(Debug)]
pub struct InMemoryDataTree {
    config: DataTreeConfig,
    strategy: Arc<ModificationApplyOperation>,
    root: RwLock<Arc<TreeNode>>,
    last_version: Mutex<Version>,
    metrics: MetricsRegistry,
}

impl InMemoryDataTree {
    /// Creates an empty tree for `schema`.
    ///
    /// The tree logs against `config.log_level`; the process-wide logger level
    /// is left untouched.
    pub fn new(schema: &SchemaContext, config: DataTreeConfig) -> Self {
        let strategy = Arc::new(ModificationApplyOperation::from_schema(schema, config.tree_type));
        let version = Version::initial();
        let root = TreeNodeFactory::create(Arc::new(DataNode::container(ROOT_NAME, [])), version);

        let tree = Self {
            config,
            strategy,
            root: RwLock::new(root),
            last_version: Mutex::new(version),
            metrics: MetricsRegistry::new(),
        };
        let tree_type = tree.config.tree_type.to_string();
        tree.log(Event::TreeCreated, &[("tree_type", tree_type.as_str())]);
        tree
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DataTreeConfig {
        &self.config
    }

    /// Returns the strategy tree built from the schema.
    pub fn strategy(&self) -> &Arc<ModificationApplyOperation> {
        &self.strategy
    }

    /// Returns the counters.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Returns the current root snapshot.
    pub fn take_snapshot(&self) -> ModificationResult<Arc<TreeNode>> {
        let root = self
            .root
            .read()
            .map_err(|_| ModificationError::Internal("Lock poisoned".into()))?;
        Ok(Arc::clone(&root))
    }

    /// Returns the version of the last change to the current snapshot.
    pub fn current_version(&self) -> ModificationResult<Version> {
        Ok(self.take_snapshot()?.subtree_version())
    }

    /// Opens a modification on the current snapshot.
    pub fn new_modification(&self) -> ModificationResult<DataTreeModification> {
        Ok(DataTreeModification::new(
            self.take_snapshot()?,
            Arc::clone(&self.strategy),
        ))
    }

    /// Validates `modification` against the current snapshot.
    pub fn validate(&self, modification: &DataTreeModification) -> ModificationResult<()> {
        let current = self.take_snapshot()?;
        match modification.validate(&current) {
            Ok(()) => {
                self.record(MetricsRegistry::increment_validations);
                let id = modification.id().to_string();
                self.log(Event::ValidationPassed, &[("modification", id.as_str())]);
                Ok(())
            }
            Err(err) => {
                self.rejected(&modification.id().to_string(), &err);
                Err(err)
            }
        }
    }

    /// Validates `modification` and applies it to the current snapshot at a
    /// newly allocated version.
    pub fn prepare(&self, modification: DataTreeModification) -> ModificationResult<DataTreeCandidate> {
        let current = self.take_snapshot()?;
        let version = self.allocate_version()?;
        let id = modification.id().to_string();
        let version_field = version.to_string();

        match modification.apply(&current, version) {
            Ok(candidate) => {
                self.record(|metrics| {
                    metrics.increment_validations();
                    metrics.increment_candidates_prepared();
                });
                self.log(
                    Event::CandidatePrepared,
                    &[
                        ("modification", id.as_str()),
                        ("outcome", candidate.root_modification_type().as_str()),
                        ("version", version_field.as_str()),
                    ],
                );
                Ok(candidate)
            }
            Err(err) => {
                self.rejected(&id, &err);
                Err(err)
            }
        }
    }

    /// Installs `candidate` as the current snapshot.
    ///
    /// Fails with a conflict if another candidate was committed after this one
    /// was prepared. A candidate that changed nothing always commits.
    pub fn commit(&self, candidate: DataTreeCandidate) -> ModificationResult<()> {
        let mut root = self
            .root
            .write()
            .map_err(|_| ModificationError::Internal("Lock poisoned".into()))?;
        let version = candidate.version().to_string();

        if candidate.is_unmodified() {
            self.record(|metrics| {
                metrics.increment_commits();
                metrics.increment_unmodified_commits();
            });
            self.log(
                Event::CommitApplied,
                &[("outcome", "unmodified"), ("version", version.as_str())],
            );
            return Ok(());
        }

        if !Arc::ptr_eq(&root, candidate.before()) {
            self.record(MetricsRegistry::increment_conflicts);
            self.log(Event::CommitRejected, &[("version", version.as_str())]);
            return Err(ModificationError::ConflictingModification {
                path: InstancePath::root(),
                message: "Data tree was modified after the candidate was prepared.".to_string(),
            });
        }

        *root = Arc::clone(candidate.after());
        self.record(MetricsRegistry::increment_commits);
        self.log(
            Event::CommitApplied,
            &[
                ("outcome", candidate.root_modification_type().as_str()),
                ("version", version.as_str()),
            ],
        );
        Ok(())
    }

    fn allocate_version(&self) -> ModificationResult<Version> {
        let mut last = self
            .last_version
            .lock()
            .map_err(|_| ModificationError::Internal("Lock poisoned".into()))?;
        *last = last.next();
        Ok(*last)
    }

    fn rejected(&self, modification: &str, err: &ModificationError) {
        let message = err.to_string();
        let fields = [
            ("code", err.code()),
            ("error", message.as_str()),
            ("modification", modification),
        ];
        match err {
            ModificationError::ConflictingModification { .. } => {
                self.record(MetricsRegistry::increment_conflicts);
                self.log(Event::ConflictDetected, &fields);
            }
            ModificationError::Internal(_) => {
                if self.logs(Severity::Error) {
                    Logger::emit(Severity::Error, "MODIFICATION_APPLY_FAILED", &fields);
                }
            }
            _ => {
                self.record(MetricsRegistry::increment_validation_failures);
                self.log(Event::ValidationFailed, &fields);
            }
        }
    }

    /// Returns true if this tree writes lines of `severity`.
    fn logs(&self, severity: Severity) -> bool {
        severity >= self.config.log_level
    }

    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        log_event_above(self.config.log_level, event, fields);
    }

    fn record(&self, update: impl FnOnce(&MetricsRegistry)) {
        if self.config.metrics_enabled {
            update(&self.metrics);
        }
    }
}

//! Workflow run registry.
//!
//! An explicitly owned, lifecycle-scoped store for run status: constructed
//! at process start, injected into the service, and substituted with an
//! isolated instance per test. Replaces the implicit module-level map the
//! original pipeline grew around.

use crate::{RunId, RunSnapshot};
use hogarth_error::{HogarthResult, WorkflowError, WorkflowErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Tracks in-flight and completed workflow runs by id.
///
/// Writers publish complete replacement snapshots under a short write lock,
/// so a concurrent reader never observes a phase paired with a score or
/// result from a different transition. Reads of distinct runs proceed
/// concurrently. The engine never deletes records; expiry belongs to an
/// external collaborator.
///
/// Cloning is cheap and shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    runs: Arc<RwLock<HashMap<RunId, RunSnapshot>>>,
}

impl RunRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly submitted run.
    pub async fn create(&self, snapshot: RunSnapshot) {
        let mut runs = self.runs.write().await;
        tracing::debug!(run_id = %snapshot.run_id, kind = %snapshot.kind, "Registering run");
        runs.insert(snapshot.run_id, snapshot);
    }

    /// Publish a state transition as a whole-snapshot replacement.
    pub async fn publish(&self, snapshot: RunSnapshot) {
        let mut runs = self.runs.write().await;
        tracing::debug!(
            run_id = %snapshot.run_id,
            phase = %snapshot.phase,
            attempts = snapshot.attempts,
            "Publishing run transition"
        );
        runs.insert(snapshot.run_id, snapshot);
    }

    /// Fetch the current snapshot for a run.
    ///
    /// # Errors
    ///
    /// Returns a run-not-found [`WorkflowError`] for unknown ids.
    pub async fn status(&self, run_id: &RunId) -> HogarthResult<RunSnapshot> {
        let runs = self.runs.read().await;
        runs.get(run_id).cloned().ok_or_else(|| {
            WorkflowError::new(WorkflowErrorKind::RunNotFound(run_id.to_string())).into()
        })
    }

    /// Number of tracked runs.
    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Whether the registry tracks no runs.
    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkflowKind;

    #[tokio::test]
    async fn unknown_run_is_not_found() {
        let registry = RunRegistry::new();
        let missing = RunId::generate();
        assert!(registry.status(&missing).await.is_err());
    }

    #[tokio::test]
    async fn publish_replaces_snapshot() {
        let registry = RunRegistry::new();
        let run_id = RunId::generate();
        let pending = RunSnapshot::pending(run_id, WorkflowKind::Story);
        registry.create(pending.clone()).await;

        let mut done = pending;
        done.phase = crate::Phase::Done;
        done.attempts = 1;
        done.score = Some(7.5);
        registry.publish(done).await;

        let status = registry.status(&run_id).await.unwrap();
        assert_eq!(status.phase, crate::Phase::Done);
        assert_eq!(status.attempts, 1);
        assert_eq!(status.score, Some(7.5));
    }
}

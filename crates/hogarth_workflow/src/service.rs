//! Workflow submission and status service.
//!
//! The asynchronous seam between callers (HTTP/CLI, out of scope) and the
//! revision engine: submission registers a pending run and spawns its
//! state machine onto the runtime; callers poll status by run id.

use crate::engine::{RevisionEngine, RunHandle};
use crate::script::{ScriptInput, ScriptSteps};
use crate::story::{StoryInput, StorySteps};
use crate::{RunId, RunRegistry, RunSnapshot, WorkflowKind, WorkflowSettings};
use hogarth_core::{ScriptGenre, SourcePost, StoryMood};
use hogarth_error::HogarthResult;
use hogarth_interface::Driver;
use std::sync::Arc;

/// Entry point for submitting generation workflows and polling their runs.
///
/// Independent runs execute concurrently; within one run the steps are
/// strictly sequential. Submission never blocks on generation; it returns
/// as soon as the pending snapshot is registered. There is no cancellation:
/// an abandoned run finishes on its own, bounded by the attempt budget.
pub struct WorkflowService {
    driver: Arc<dyn Driver>,
    registry: RunRegistry,
    settings: WorkflowSettings,
}

impl WorkflowService {
    /// Create a service with a fresh registry.
    pub fn new(driver: Arc<dyn Driver>, settings: WorkflowSettings) -> Self {
        Self::with_registry(driver, settings, RunRegistry::new())
    }

    /// Create a service over an externally owned registry.
    pub fn with_registry(
        driver: Arc<dyn Driver>,
        settings: WorkflowSettings,
        registry: RunRegistry,
    ) -> Self {
        Self {
            driver,
            registry,
            settings,
        }
    }

    /// The registry this service publishes to.
    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// Submit a story generation run.
    ///
    /// Returns once the run is registered; generation proceeds in the
    /// background.
    #[tracing::instrument(skip(self, post), fields(post_id = %post.id, mood = %mood))]
    pub async fn submit_story(&self, post: SourcePost, mood: StoryMood) -> RunId {
        let run_id = RunId::generate();
        let input = StoryInput { post, mood };
        let mut handle =
            RunHandle::create_with_input(self.registry.clone(), run_id, WorkflowKind::Story, &input)
                .await;
        let engine = RevisionEngine::new(
            StorySteps::new(self.driver.clone(), self.settings.clone()),
            self.settings.story_policy(),
        );

        tracing::info!(run_id = %run_id, "Story workflow submitted");
        tokio::spawn(async move {
            // The failed snapshot is already published; nothing left to do
            // with the error here but log it.
            if let Err(e) = engine.run(&input, &mut handle).await {
                tracing::error!(run_id = %run_id, error = %e, "Story run ended in failure");
            }
        });

        run_id
    }

    /// Submit a webtoon script generation run.
    ///
    /// Returns once the run is registered; generation proceeds in the
    /// background.
    #[tracing::instrument(skip(self, story), fields(genre = %genre, story_chars = story.len()))]
    pub async fn submit_script(&self, story: String, genre: ScriptGenre) -> RunId {
        let run_id = RunId::generate();
        let input = ScriptInput { story, genre };
        let mut handle = RunHandle::create_with_input(
            self.registry.clone(),
            run_id,
            WorkflowKind::Script,
            &input,
        )
        .await;
        let engine = RevisionEngine::new(
            ScriptSteps::new(self.driver.clone(), self.settings.clone()),
            self.settings.script_policy(),
        );

        tracing::info!(run_id = %run_id, "Script workflow submitted");
        tokio::spawn(async move {
            if let Err(e) = engine.run(&input, &mut handle).await {
                tracing::error!(run_id = %run_id, error = %e, "Script run ended in failure");
            }
        });

        run_id
    }

    /// Current status of a run.
    ///
    /// # Errors
    ///
    /// Returns a run-not-found error for unknown ids.
    pub async fn status(&self, run_id: &RunId) -> HogarthResult<RunSnapshot> {
        self.registry.status(run_id).await
    }
}

//! Revision engine state machine tests.
//!
//! The step set is scripted so every transition path of the engine can be
//! exercised without a live driver: fixed score sequences, step failures at
//! chosen points, and call counters for the termination-bound checks.

use async_trait::async_trait;
use hogarth_core::Evaluation;
use hogarth_error::{
    EvaluationError, EvaluationErrorKind, GenerationError, GenerationErrorKind, HogarthResult,
};
use hogarth_workflow::{
    Phase, RevisionEngine, RevisionPolicy, RevisionSteps, RunHandle, RunId, RunRegistry,
    RunSnapshot, WorkflowKind,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Counters {
    writes: AtomicU32,
    evaluates: AtomicU32,
    rewrites: AtomicU32,
}

impl Counters {
    fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
    fn evaluates(&self) -> u32 {
        self.evaluates.load(Ordering::SeqCst)
    }
    fn rewrites(&self) -> u32 {
        self.rewrites.load(Ordering::SeqCst)
    }
}

/// Steps with a scripted score sequence and optional failure injection.
struct ScriptedSteps {
    scores: Mutex<Vec<f32>>,
    counters: Arc<Counters>,
    fail_write: bool,
    fail_rewrite: bool,
    fail_evaluate_after_scores: bool,
}

impl ScriptedSteps {
    fn with_scores(scores: Vec<f32>) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let steps = Self {
            scores: Mutex::new(scores),
            counters: counters.clone(),
            fail_write: false,
            fail_rewrite: false,
            fail_evaluate_after_scores: false,
        };
        (steps, counters)
    }
}

#[async_trait]
impl RevisionSteps for ScriptedSteps {
    type Input = String;
    type Artifact = String;

    async fn write(&self, input: &String) -> HogarthResult<String> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_write {
            return Err(GenerationError::new(GenerationErrorKind::Timeout(30)).into());
        }
        Ok(format!("{input}-draft-0"))
    }

    async fn evaluate(&self, _artifact: &String) -> HogarthResult<Evaluation> {
        self.counters.evaluates.fetch_add(1, Ordering::SeqCst);
        let mut scores = self.scores.lock().unwrap();
        if scores.is_empty() {
            if self.fail_evaluate_after_scores {
                return Err(EvaluationError::new(EvaluationErrorKind::Parse(
                    "no Score line".into(),
                ))
                .into());
            }
            panic!("evaluate called more times than scripted");
        }
        let score = scores.remove(0);
        Ok(Evaluation::new(score, "scripted feedback"))
    }

    async fn rewrite(
        &self,
        _input: &String,
        artifact: &String,
        _evaluation: &Evaluation,
    ) -> HogarthResult<String> {
        let n = self.counters.rewrites.fetch_add(1, Ordering::SeqCst);
        if self.fail_rewrite {
            return Err(GenerationError::new(GenerationErrorKind::Provider(
                "provider went away".into(),
            ))
            .into());
        }
        Ok(format!("{artifact}+rev{}", n + 1))
    }
}

async fn run_engine(
    steps: ScriptedSteps,
    policy: RevisionPolicy,
) -> (
    HogarthResult<hogarth_workflow::RevisionOutcome<String>>,
    RunSnapshot,
) {
    let registry = RunRegistry::new();
    let run_id = RunId::generate();
    let mut handle = RunHandle::create(registry.clone(), run_id, WorkflowKind::Story).await;
    let engine = RevisionEngine::new(steps, policy);
    let result = engine.run(&"post".to_string(), &mut handle).await;
    let snapshot = registry.status(&run_id).await.unwrap();
    (result, snapshot)
}

#[tokio::test]
async fn first_pass_acceptance_skips_rewriter() {
    let (steps, counters) = ScriptedSteps::with_scores(vec![8.5]);
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 1)).await;

    let outcome = result.unwrap();
    assert_eq!(outcome.attempts, 0);
    assert_eq!(outcome.evaluation.score, 8.5);
    assert_eq!(outcome.artifact, "post-draft-0");

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 0);
    assert_eq!(snapshot.score, Some(8.5));
    assert_eq!(counters.writes(), 1);
    assert_eq!(counters.evaluates(), 1);
    assert_eq!(counters.rewrites(), 0);
}

#[tokio::test]
async fn below_threshold_then_accepted_after_one_rewrite() {
    let (steps, _) = ScriptedSteps::with_scores(vec![5.0, 7.5]);
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 1)).await;

    let outcome = result.unwrap();
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.evaluation.score, 7.5);
    assert_eq!(outcome.artifact, "post-draft-0+rev1");

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 1);
    assert_eq!(snapshot.score, Some(7.5));
}

#[tokio::test]
async fn exhaustion_accepts_best_effort_not_failure() {
    let (steps, counters) = ScriptedSteps::with_scores(vec![4.0, 4.0]);
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 1)).await;

    // Sub-threshold after exhausting the budget is accepted, never an error.
    let outcome = result.unwrap();
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.artifact, "post-draft-0+rev1");

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 1);
    assert_eq!(snapshot.score, Some(4.0));
    assert!(snapshot.error.is_none());
    assert_eq!(counters.rewrites(), 1);
}

#[tokio::test]
async fn writer_timeout_fails_without_evaluator_call() {
    let (mut steps, counters) = ScriptedSteps::with_scores(vec![]);
    steps.fail_write = true;
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 1)).await;

    assert!(result.is_err());
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.attempts, 0);
    assert_eq!(snapshot.error.as_ref().unwrap().category, "generation");
    assert!(snapshot.result.is_none());
    assert_eq!(counters.evaluates(), 0);
}

#[tokio::test]
async fn rewriter_failure_preserves_pre_rewrite_artifact() {
    let (mut steps, _) = ScriptedSteps::with_scores(vec![5.0]);
    steps.fail_rewrite = true;
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 2)).await;

    assert!(result.is_err());
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.attempts, 0);
    assert_eq!(snapshot.score, Some(5.0));
    // The last good artifact survives as the best-effort result.
    assert_eq!(
        snapshot.result,
        Some(serde_json::Value::String("post-draft-0".into()))
    );
}

#[tokio::test]
async fn evaluator_failure_after_rewrite_preserves_artifact() {
    let (mut steps, counters) = ScriptedSteps::with_scores(vec![5.0]);
    steps.fail_evaluate_after_scores = true;
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 2)).await;

    assert!(result.is_err());
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.attempts, 1);
    assert_eq!(snapshot.error.as_ref().unwrap().category, "evaluation");
    assert_eq!(
        snapshot.result,
        Some(serde_json::Value::String("post-draft-0+rev1".into()))
    );
    assert_eq!(counters.evaluates(), 2);
}

#[tokio::test]
async fn termination_bound_holds_for_hostile_scores() {
    // An evaluator that never approves anything.
    let (steps, counters) = ScriptedSteps::with_scores(vec![0.0, 0.0, 0.0]);
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 2)).await;

    let outcome = result.unwrap();
    assert_eq!(outcome.attempts, 2);
    assert_eq!(snapshot.phase, Phase::Done);

    // Exactly write + (max_attempts + 1) evaluations + max_attempts rewrites.
    assert_eq!(counters.writes(), 1);
    assert_eq!(counters.evaluates(), 3);
    assert_eq!(counters.rewrites(), 2);
}

#[tokio::test]
async fn zero_attempt_budget_accepts_first_draft() {
    let (steps, counters) = ScriptedSteps::with_scores(vec![2.0]);
    let (result, snapshot) = run_engine(steps, RevisionPolicy::new(7.0, 0)).await;

    let outcome = result.unwrap();
    assert_eq!(outcome.attempts, 0);
    assert_eq!(outcome.artifact, "post-draft-0");
    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(counters.rewrites(), 0);
}

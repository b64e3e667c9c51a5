//! End-to-end service tests over a scripted mock driver.

use async_trait::async_trait;
use hogarth_core::{
    GenerateRequest, GenerateResponse, ScriptGenre, SourcePost, StoryMood, WebtoonScript,
};
use hogarth_error::{GenerationError, GenerationErrorKind, HogarthResult};
use hogarth_interface::Driver;
use hogarth_workflow::{Phase, RunId, WorkflowService, WorkflowSettings, WorkflowSettingsBuilder};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Driver that pops scripted replies in order.
struct MockDriver {
    replies: Mutex<VecDeque<HogarthResult<String>>>,
}

impl MockDriver {
    fn new(replies: Vec<HogarthResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn generate(&self, _req: &GenerateRequest) -> HogarthResult<GenerateResponse> {
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("driver called more times than scripted");
        next.map(|text| GenerateResponse { text })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-1"
    }
}

async fn poll_terminal(service: &WorkflowService, run_id: RunId) -> hogarth_workflow::RunSnapshot {
    for _ in 0..200 {
        let snapshot = service.status(&run_id).await.unwrap();
        if snapshot.phase.is_terminal() {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run did not reach a terminal phase");
}

fn post() -> SourcePost {
    SourcePost::new("t3_x1", "My roommate labels her eggs", "Every single one.")
}

/// A script reply that scores a clean 10 on the rubric: 8 panels, full
/// dialogue coverage, long prompts, defined characters, varied shots.
fn strong_script_reply() -> String {
    let shot_types = [
        "Wide Shot",
        "Medium Shot",
        "Close-Up",
        "Extreme Close-Up",
        "Medium Shot",
        "Close-Up",
        "Wide Shot",
        "Medium Shot",
    ];
    let panels: Vec<serde_json::Value> = (0..8)
        .map(|i| {
            serde_json::json!({
                "panel_number": i + 1,
                "shot_type": shot_types[i],
                "active_character_names": ["Mina"],
                "visual_prompt": format!(
                    "{} of Mina in the shared kitchen, morning light through blinds, \
                     egg carton with tiny ink initials in the foreground, pastel palette, \
                     clean manhwa lineart, beat {}",
                    shot_types[i], i + 1
                ),
                "dialogue": [{"character": "Mina", "text": format!("Line {}", i + 1)}],
            })
        })
        .collect();
    serde_json::json!({
        "characters": [{
            "name": "Mina",
            "gender": "female",
            "age": "20s",
            "face": "round face, tired eyes",
            "hair": "messy bun",
            "body": "petite",
            "outfit": "oversized hoodie",
            "mood": "deadpan",
            "visual_description": "petite woman in her 20s, round face, messy bun, oversized hoodie",
        }],
        "panels": panels,
    })
    .to_string()
}

fn fast_settings() -> WorkflowSettings {
    WorkflowSettingsBuilder::default()
        .step_timeout_secs(5u64)
        .build()
        .unwrap()
}

#[tokio::test]
async fn story_run_completes_on_first_pass() {
    let driver = MockDriver::new(vec![
        Ok("The Egg Ledger\n\nMina counted her eggs the way other people counted debts.".into()),
        Ok("Score: 8.2\nCoherence: 8\nEngagement: 9\nLength Appropriate: yes\nFeedback: Works well.".into()),
    ]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service.submit_story(post(), StoryMood::SliceOfLife).await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 0);
    assert_eq!(snapshot.score, Some(8.2));
    // The submission payload stays on the record for the run's lifetime.
    let input = snapshot.input.as_ref().unwrap();
    assert_eq!(input["post"]["id"], "t3_x1");
    assert_eq!(input["mood"], "slice_of_life");
    let result = snapshot.result.unwrap();
    assert!(
        result["content"]
            .as_str()
            .unwrap()
            .contains("The Egg Ledger")
    );
    assert_eq!(result["revision"], 0);
}

#[tokio::test]
async fn story_run_rewrites_once_then_accepts() {
    let driver = MockDriver::new(vec![
        Ok("Draft one.".into()),
        Ok("Score: 5.0\nFeedback: Flat characters, rushed ending.".into()),
        Ok("Draft two, now with an actual ending.".into()),
        Ok("Score: 7.5\nFeedback: Much better.".into()),
    ]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service.submit_story(post(), StoryMood::ModernRomance).await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 1);
    assert_eq!(snapshot.score, Some(7.5));
    let result = snapshot.result.unwrap();
    assert!(result["content"].as_str().unwrap().contains("Draft two"));
    assert_eq!(result["revision"], 1);
}

#[tokio::test]
async fn story_run_fails_when_writer_times_out() {
    let driver = MockDriver::new(vec![Err(GenerationError::new(
        GenerationErrorKind::Timeout(30),
    )
    .into())]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service.submit_story(post(), StoryMood::Revenge).await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.attempts, 0);
    let error = snapshot.error.unwrap();
    assert_eq!(error.category, "generation");
    assert!(error.message.contains("timed out"));
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn story_run_fails_on_unparseable_evaluation() {
    let driver = MockDriver::new(vec![
        Ok("A fine draft.".into()),
        Ok("I'd give it an eight, maybe a nine on a good day.".into()),
    ]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service.submit_story(post(), StoryMood::HighTeen).await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.error.unwrap().category, "evaluation");
    // The draft survives as the best-effort result.
    assert!(snapshot.result.is_some());
}

#[tokio::test]
async fn script_run_completes_with_fenced_reply() {
    let reply = format!("Here's your script:\n```json\n{}\n```", strong_script_reply());
    let driver = MockDriver::new(vec![Ok(reply)]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service
        .submit_script(
            "Mina counted her eggs.".into(),
            ScriptGenre::ModernRomanceDramaManhwa,
        )
        .await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 0);
    assert_eq!(snapshot.score, Some(10.0));

    let script: WebtoonScript = serde_json::from_value(snapshot.result.unwrap()).unwrap();
    assert_eq!(script.panels.len(), 8);
    assert_eq!(script.characters[0].name, "Mina");
}

#[tokio::test]
async fn script_run_repairs_gaps_then_rewrites_to_acceptance() {
    // First reply: 3 sparse panels. The repair layer fills the gaps, the
    // rubric scores it below threshold, and the rewriter gets one shot.
    let sparse = serde_json::json!({
        "characters": [{"name": "Mina", "visual_description": "a woman in a hoodie"}],
        "panels": [
            {"active_character_names": ["Mina"]},
            {"shot_type": "Close-Up"},
            {},
        ],
    })
    .to_string();
    let driver = MockDriver::new(vec![Ok(sparse), Ok(strong_script_reply())]);
    let settings = WorkflowSettingsBuilder::default()
        .step_timeout_secs(5u64)
        .script_max_attempts(1u32)
        .build()
        .unwrap();
    let service = WorkflowService::new(driver, settings);

    let run_id = service
        .submit_script("Mina's story.".into(), ScriptGenre::AcademySchoolLife)
        .await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 1);
    assert_eq!(snapshot.score, Some(10.0));
}

#[tokio::test]
async fn script_run_exhausts_attempts_and_accepts_sub_threshold() {
    // Every reply is the same sparse script; with a budget of one rewrite
    // the run must still end Done with the low score on record.
    let sparse = serde_json::json!({
        "characters": [],
        "panels": [{}, {}],
    })
    .to_string();
    let driver = MockDriver::new(vec![Ok(sparse.clone()), Ok(sparse)]);
    let settings = WorkflowSettingsBuilder::default()
        .step_timeout_secs(5u64)
        .script_max_attempts(1u32)
        .build()
        .unwrap();
    let service = WorkflowService::new(driver, settings);

    let run_id = service
        .submit_script("Thin story.".into(), ScriptGenre::FantasyRomanceManhwa)
        .await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Done);
    assert_eq!(snapshot.attempts, 1);
    let score = snapshot.score.unwrap();
    assert!(score < 7.0, "sparse script scored {score}, expected sub-threshold");
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn script_run_fails_on_prose_reply() {
    let driver = MockDriver::new(vec![Ok("I cannot produce JSON today.".into())]);
    let service = WorkflowService::new(driver, fast_settings());

    let run_id = service
        .submit_script("A story.".into(), ScriptGenre::HistorySageukRomance)
        .await;
    let snapshot = poll_terminal(&service, run_id).await;

    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.error.unwrap().category, "script");
}

#[tokio::test]
async fn unknown_run_id_is_not_found() {
    let driver = MockDriver::new(vec![]);
    let service = WorkflowService::new(driver, WorkflowSettings::default());
    assert!(service.status(&RunId::generate()).await.is_err());
}

#[tokio::test]
async fn independent_runs_progress_concurrently() {
    // Two runs share the driver and interleave nondeterministically, so
    // every scripted reply must be valid as either a draft or an
    // evaluation.
    let reply = "Score: 9\nFeedback: Good.";
    let driver = MockDriver::new(vec![
        Ok(reply.into()),
        Ok(reply.into()),
        Ok(reply.into()),
        Ok(reply.into()),
    ]);
    let service = WorkflowService::new(driver, fast_settings());

    let a = service.submit_story(post(), StoryMood::Rofan).await;
    let b = service.submit_story(post(), StoryMood::Revenge).await;
    assert_ne!(a, b);

    let snap_a = poll_terminal(&service, a).await;
    let snap_b = poll_terminal(&service, b).await;
    assert_eq!(snap_a.phase, Phase::Done);
    assert_eq!(snap_b.phase, Phase::Done);
}

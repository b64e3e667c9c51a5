//! Run registry concurrency tests.

use hogarth_workflow::{Phase, RunId, RunRegistry, RunSnapshot, WorkflowKind};
use serde_json::json;

#[tokio::test]
async fn distinct_runs_do_not_interfere() {
    let registry = RunRegistry::new();
    let a = RunId::generate();
    let b = RunId::generate();
    registry
        .create(RunSnapshot::pending(a, WorkflowKind::Story))
        .await;
    registry
        .create(RunSnapshot::pending(b, WorkflowKind::Script))
        .await;

    let mut done = registry.status(&a).await.unwrap();
    done.phase = Phase::Done;
    done.score = Some(9.0);
    registry.publish(done).await;

    assert_eq!(registry.status(&a).await.unwrap().phase, Phase::Done);
    assert_eq!(registry.status(&b).await.unwrap().phase, Phase::Pending);
    assert_eq!(registry.len().await, 2);
}

/// A concurrent poller must never see a phase paired with a score/result
/// from a different transition. Transitions publish whole snapshots, so
/// every observed (phase, score, result) triple must be one of the
/// combinations that was actually published.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn status_reads_are_never_torn() {
    let registry = RunRegistry::new();
    let run_id = RunId::generate();
    let pending = RunSnapshot::pending(run_id, WorkflowKind::Story);
    registry.create(pending.clone()).await;

    let writer_registry = registry.clone();
    let base = pending.clone();
    let writer = tokio::spawn(async move {
        for round in 0u32..200 {
            let mut writing = base.clone();
            writing.phase = Phase::Writing;
            writer_registry.publish(writing).await;

            let mut evaluating = base.clone();
            evaluating.phase = Phase::Evaluating;
            evaluating.attempts = round % 3;
            writer_registry.publish(evaluating).await;

            let mut done = base.clone();
            done.phase = Phase::Done;
            done.attempts = round % 3;
            done.score = Some(8.0);
            done.result = Some(json!({"content": "final", "round": round}));
            writer_registry.publish(done).await;
        }
    });

    let reader_registry = registry.clone();
    let reader = tokio::spawn(async move {
        for _ in 0..500 {
            let snapshot = reader_registry.status(&run_id).await.unwrap();
            match snapshot.phase {
                Phase::Pending | Phase::Writing | Phase::Evaluating => {
                    assert!(snapshot.score.is_none(), "score without a scoring phase");
                    assert!(snapshot.result.is_none(), "result before terminal phase");
                }
                Phase::Done => {
                    assert_eq!(snapshot.score, Some(8.0), "done without its score");
                    assert!(snapshot.result.is_some(), "done without its result");
                }
                Phase::Rewriting | Phase::Failed => {
                    panic!("phase never published");
                }
            }
            tokio::task::yield_now().await;
        }
    });

    writer.await.unwrap();
    reader.await.unwrap();
}

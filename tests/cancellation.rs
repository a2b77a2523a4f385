//! Cancellation and Reset Integration Tests
//!
//! Cooperative cancellation at the runner's two check-points, and the
//! reset operation mid-run and after completion.

mod common;

use std::sync::Arc;

use common::{orchestrator, test_catalog, ScriptedAnalysis, ScriptedDecision};
use govflow::domain::OutcomeStatus;
use govflow::RunMode;
use serde_json::json;

#[tokio::test]
async fn test_cancel_stops_before_the_next_dispatch() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision.clone(), analysis);

    // Cancel lands right after the 10th response, before the runner
    // moves on, the moment a stop button would be pressed.
    decision.on_call(10, {
        let orch = Arc::downgrade(&orch);
        move || {
            if let Some(orch) = orch.upgrade() {
                orch.cancel();
            }
        }
    });

    let catalog = test_catalog(7);
    let report = orch
        .run(&catalog, RunMode::Extended { total: 100 })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.dispatched, 10);
    assert!(!orch.is_running());

    // No record was ever created for events 11..100, and the in-flight
    // event still reached a terminal state.
    let outcomes = orch.outcomes();
    assert_eq!(outcomes.len(), 10);
    assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Approved));
    assert_eq!(orch.stats().approved, 10);
    assert_eq!(decision.call_count(), 10);
}

#[tokio::test]
async fn test_cancel_never_rolls_back_outcomes() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision.clone(), analysis);

    decision.on_call(3, {
        let orch = Arc::downgrade(&orch);
        move || {
            if let Some(orch) = orch.upgrade() {
                orch.cancel();
            }
        }
    });

    let catalog = test_catalog(7);
    orch.run(&catalog, RunMode::Bounded).await.unwrap();

    let outcomes = orch.outcomes();
    assert_eq!(outcomes.len(), 3);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.label, format!("event-{i}"));
        assert!(outcome.is_terminal());
    }
}

#[tokio::test]
async fn test_a_new_run_clears_a_stale_cancel_flag() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision, analysis);

    // Cancelling with no run active must not poison the next run
    orch.cancel();

    let catalog = test_catalog(3);
    let report = orch.run(&catalog, RunMode::Bounded).await.unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.dispatched, 3);
}

#[tokio::test]
async fn test_reset_mid_run_clears_everything() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision.clone(), analysis);

    // Reset fires while the 3rd event's response is being applied
    decision.on_call(3, {
        let orch = Arc::downgrade(&orch);
        move || {
            if let Some(orch) = orch.upgrade() {
                orch.reset();
            }
        }
    });

    let catalog = test_catalog(7);
    let report = orch.run(&catalog, RunMode::Bounded).await.unwrap();

    // The run stopped with nothing left behind; the in-flight event's
    // verdict did not leak into the fresh counters.
    assert!(report.cancelled);
    assert_eq!(report.dispatched, 3);
    assert!(orch.outcomes().is_empty());
    assert_eq!(orch.stats().total(), 0);
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision, analysis);

    let catalog = test_catalog(3);
    orch.run(&catalog, RunMode::Bounded).await.unwrap();

    orch.reset();
    orch.reset();

    assert!(orch.outcomes().is_empty());
    assert_eq!(orch.stats().total(), 0);
}

#[tokio::test]
async fn test_run_after_reset_starts_clean() {
    let decision = ScriptedDecision::approve_all();
    let analysis = ScriptedAnalysis::new(json!({"analysis": []}));
    let orch = orchestrator(decision, analysis);

    let catalog = test_catalog(4);
    orch.run(&catalog, RunMode::Bounded).await.unwrap();
    orch.reset();

    let report = orch.run(&catalog, RunMode::Bounded).await.unwrap();
    assert!(!report.cancelled);
    assert_eq!(orch.outcomes().len(), 4);
    assert_eq!(orch.stats().approved, 4);
}

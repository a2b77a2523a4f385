//! Scripted in-process services shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use govflow::adapters::{AnalysisError, AnalysisService, DecisionError, DecisionService};
use govflow::core::DecisionSummary;
use govflow::domain::{EventDefinition, VerdictResponse};
use govflow::Orchestrator;

/// Build a small catalog of distinct definitions
pub fn test_catalog(len: usize) -> Vec<EventDefinition> {
    (0..len)
        .map(|i| {
            EventDefinition::new(
                format!("event-{i}"),
                "Test",
                "TEST-SYSTEM",
                serde_json::json!({
                    "specversion": "1.0",
                    "type": format!("test.event.v{i}"),
                    "data": {"index": i}
                }),
            )
        })
        .collect()
}

/// Shorthand for a minimal verdict response
pub fn verdict(raw: &str) -> VerdictResponse {
    VerdictResponse {
        verdict: raw.to_string(),
        ..Default::default()
    }
}

type CallHook = Box<dyn Fn() + Send + Sync>;

/// Decision service answering call *n* with `script[n % script.len()]`.
///
/// `Err(status)` entries simulate a failing service. An optional hook
/// fires after a given call completes, before the runner applies the
/// result, at the point where a UI-side cancel or reset would land.
pub struct ScriptedDecision {
    script: Vec<Result<VerdictResponse, u16>>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Value>>,
    delay: Option<Duration>,
    hook: Mutex<Option<(usize, CallHook)>>,
}

impl ScriptedDecision {
    pub fn new(script: Vec<Result<VerdictResponse, u16>>) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            delay: None,
            hook: Mutex::new(None),
        })
    }

    /// Approve every call
    pub fn approve_all() -> Arc<Self> {
        Self::new(vec![Ok(verdict("APPROVE"))])
    }

    /// Approve every call, taking `delay` per call
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: vec![Ok(verdict("APPROVE"))],
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            delay: Some(delay),
            hook: Mutex::new(None),
        })
    }

    /// Fire `f` once, after the `nth` call (1-based) completes
    pub fn on_call(&self, nth: usize, f: impl Fn() + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some((nth, Box::new(f)));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payloads received so far, in call order
    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionService for ScriptedDecision {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn evaluate(&self, payload: &Value) -> Result<VerdictResponse, DecisionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());

        let result = self.script[call % self.script.len()]
            .clone()
            .map_err(|status| DecisionError::Status { status });

        if let Some((nth, hook)) = &*self.hook.lock().unwrap() {
            if call + 1 == *nth {
                hook();
            }
        }

        result
    }
}

/// Analysis service returning a fixed response and capturing requests
pub struct ScriptedAnalysis {
    response: Mutex<Result<Value, u16>>,
    requests: Mutex<Vec<Vec<DecisionSummary>>>,
}

impl ScriptedAnalysis {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Ok(response)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Err(status)),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Summaries captured so far, one entry per request
    pub fn requests(&self) -> Vec<Vec<DecisionSummary>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisService for ScriptedAnalysis {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn narrate(&self, summaries: &[DecisionSummary]) -> Result<Value, AnalysisError> {
        self.requests.lock().unwrap().push(summaries.to_vec());
        self.response
            .lock()
            .unwrap()
            .clone()
            .map_err(|status| AnalysisError::Status { status })
    }
}

/// Orchestrator wired to the given services, with no pacing delay
pub fn orchestrator(
    decision: Arc<ScriptedDecision>,
    analysis: Arc<ScriptedAnalysis>,
) -> Arc<Orchestrator> {
    Arc::new(
        Orchestrator::new(decision, analysis)
            .with_pacing(Duration::from_millis(0), Duration::from_millis(0)),
    )
}

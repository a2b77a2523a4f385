//! Main orchestrator for the evaluation demo.
//!
//! Owns the result store, the running statistics and the cancellation
//! flag, and drives sequential submission of events to the decision
//! service, one in flight at a time, with inter-event pacing. Ad-hoc
//! playground submissions and batch analysis requests go through the
//! same object so every producer shares one store and one set of rules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::adapters::{AnalysisError, AnalysisService, DecisionService};
use crate::domain::{EventDefinition, EventOutcome, RunStats};

use super::analysis::{build_summaries, extract_analysis_array, pair_narratives, AnalyzedOutcome};
use super::playground::parse_submission;
use super::store::{generate_outcome_id, ResultStore};

/// Default pacing between bounded-run dispatches
const DEFAULT_PACE: Duration = Duration::from_millis(500);

/// Default pacing between extended-run dispatches
const DEFAULT_LIVE_PACE: Duration = Duration::from_millis(3000);

/// Run configuration: the catalog once through, or cycled into a long run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// The literal catalog, once through
    Bounded,

    /// The catalog cycled with wraparound to `total` dispatches
    Extended { total: usize },
}

impl RunMode {
    fn total(self, catalog_len: usize) -> usize {
        match self {
            Self::Bounded => catalog_len,
            Self::Extended { total } => total,
        }
    }
}

/// Summary of a finished (or cancelled) run
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    /// Number of events dispatched before the run ended
    pub dispatched: usize,

    /// Whether the run ended by cancellation
    pub cancelled: bool,

    /// Final counters
    pub stats: RunStats,
}

/// Demo orchestrator: dispatch runner, playground evaluator and batch
/// analysis requester behind one interface.
pub struct Orchestrator {
    decision: Arc<dyn DecisionService>,
    analysis: Arc<dyn AnalysisService>,
    store: ResultStore,
    stats: Mutex<RunStats>,

    /// Advisory cancellation flag, checked before each dispatch and
    /// after each pacing delay. In-flight calls are never aborted.
    cancelled: AtomicBool,

    /// Whether a dispatch run is active
    running: AtomicBool,

    pace: Duration,
    live_pace: Duration,
}

impl Orchestrator {
    /// Create an orchestrator with default pacing
    pub fn new(decision: Arc<dyn DecisionService>, analysis: Arc<dyn AnalysisService>) -> Self {
        Self {
            decision,
            analysis,
            store: ResultStore::new(),
            stats: Mutex::new(RunStats::default()),
            cancelled: AtomicBool::new(false),
            running: AtomicBool::new(false),
            pace: DEFAULT_PACE,
            live_pace: DEFAULT_LIVE_PACE,
        }
    }

    /// Override the pacing delays
    pub fn with_pacing(mut self, pace: Duration, live_pace: Duration) -> Self {
        self.pace = pace;
        self.live_pace = live_pace;
        self
    }

    /// Drive a full dispatch run to completion.
    ///
    /// Clears the store, the stats and the cancellation flag, then
    /// submits the sequence one event at a time. A per-event failure is
    /// recorded on that outcome and the loop proceeds; only cancellation
    /// or sequence exhaustion ends the run. Returns once the runner is
    /// no longer active, which is the caller's cue to offer the report
    /// view.
    #[instrument(skip(self, catalog), fields(mode = ?mode))]
    pub async fn run(&self, catalog: &[EventDefinition], mode: RunMode) -> Result<RunReport> {
        anyhow::ensure!(!catalog.is_empty(), "Cannot run an empty event catalog");

        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| anyhow::anyhow!("A dispatch run is already active"))?;

        self.store.clear();
        *self.stats.lock().expect("stats lock poisoned") = RunStats::default();
        self.cancelled.store(false, Ordering::SeqCst);

        let total = mode.total(catalog.len());
        let pace = match mode {
            RunMode::Bounded => self.pace,
            RunMode::Extended { .. } => self.live_pace,
        };
        info!(total, "Starting dispatch run");

        let mut dispatched = 0;
        for index in 0..total {
            if self.cancelled.load(Ordering::SeqCst) {
                break;
            }

            let definition = &catalog[index % catalog.len()];
            if let Err(e) = self.dispatch(definition, "evt").await {
                // Internal bookkeeping failure, not a service error; the
                // sequence still proceeds.
                warn!(error = %e, "Dispatch bookkeeping failed");
            }
            dispatched += 1;

            if index + 1 < total {
                tokio::time::sleep(pace).await;
                if self.cancelled.load(Ordering::SeqCst) {
                    break;
                }
            }
        }

        let cancelled = self.cancelled.load(Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);

        let report = RunReport {
            dispatched,
            cancelled,
            stats: self.stats(),
        };
        info!(dispatched, cancelled, "Dispatch run finished");
        Ok(report)
    }

    /// Request cancellation of the active run.
    ///
    /// Advisory: the event currently in flight completes and records its
    /// own terminal state; no further events are dispatched and nothing
    /// already produced is rolled back.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        info!("Cancellation requested");
    }

    /// Stop any active run and clear all state.
    ///
    /// Always yields an empty store and zeroed stats, including mid-run.
    /// A playground call in flight is not cancelled; its outcome appends
    /// as a fresh record once it resolves.
    pub fn reset(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.store.clear();
        *self.stats.lock().expect("stats lock poisoned") = RunStats::default();
        info!("Orchestrator reset");
    }

    /// Validate and submit a single ad-hoc event outside the runner's
    /// pacing and cancellation discipline.
    ///
    /// A parse failure is a local validation error: no network call, no
    /// store mutation. A decision-service failure is an `error` outcome
    /// that still lands in the shared store.
    pub async fn submit_ad_hoc(&self, raw: &str) -> Result<EventOutcome> {
        let definition = parse_submission(raw)?;
        self.dispatch(&definition, "pg").await
    }

    /// Request a narrative report for the current terminal snapshot.
    ///
    /// Independent of the runner's cancellation flag: once issued, the
    /// batched request runs to completion or failure on its own. Any
    /// failure is a whole-batch error; no partial report is synthesized.
    pub async fn request_analysis(&self) -> Result<Vec<AnalyzedOutcome>, AnalysisError> {
        let snapshot = self.store.terminal_snapshot();
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = build_summaries(&snapshot);
        info!(
            events = summaries.len(),
            service = self.analysis.name(),
            "Requesting batch analysis"
        );

        let response = self.analysis.narrate(&summaries).await?;
        let elements = extract_analysis_array(&response);
        if elements.len() < snapshot.len() {
            warn!(
                narratives = elements.len(),
                outcomes = snapshot.len(),
                "Analysis returned fewer narratives than outcomes; tail left bare"
            );
        }

        Ok(pair_narratives(snapshot, elements))
    }

    /// Whether a dispatch run is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of all outcome records in insertion order
    pub fn outcomes(&self) -> Vec<EventOutcome> {
        self.store.snapshot()
    }

    /// Current counters
    pub fn stats(&self) -> RunStats {
        *self.stats.lock().expect("stats lock poisoned")
    }

    /// Submit one definition and see its record through to a terminal
    /// state. Shared by the runner and the playground.
    async fn dispatch(&self, definition: &EventDefinition, prefix: &str) -> Result<EventOutcome> {
        let id = generate_outcome_id(prefix);

        // The record is visible as pending/running before the network
        // call resolves.
        let mut outcome = EventOutcome::pending(&id, definition);
        self.store
            .append(outcome.clone())
            .context("Failed to append outcome record")?;

        outcome.mark_running()?;
        self.store.with_record(&id, |r| *r = outcome.clone());

        let payload = definition.payload_with_id(&id);
        let verdict = match self.decision.evaluate(&payload).await {
            Ok(response) => {
                let verdict = outcome.complete(&response)?;
                info!(%id, verdict = ?verdict, "Event decided");
                Some(verdict)
            }
            Err(e) => {
                warn!(%id, error = %e, "Decision call failed");
                outcome.fail(e.to_string())?;
                None
            }
        };

        // A reset may have cleared the store while the call was in
        // flight. A runner record that is gone stays gone and its
        // verdict must not leak into the fresh counters; a playground
        // outcome re-appends as a new record.
        let recorded = self
            .store
            .with_record(&id, |r| *r = outcome.clone())
            .is_some()
            || (prefix == "pg" && self.store.append(outcome.clone()).is_ok());

        if recorded {
            if let Some(verdict) = verdict {
                self.stats
                    .lock()
                    .expect("stats lock poisoned")
                    .record(verdict);
            }
        }

        Ok(outcome)
    }
}

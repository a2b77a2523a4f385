//! govflow - event-simulation and evaluation orchestrator
//!
//! Drives the interactive demo of an enterprise agent-governance
//! platform: synthetic SAP-style events are streamed through an external
//! decision service one at a time, each event's lifecycle is tracked in a
//! shared result store, running statistics are aggregated, and a batched
//! narrative analysis of completed decisions can be requested from a
//! separate chat-completion service.
//!
//! # Architecture
//!
//! - Every dispatched or submitted event produces exactly one outcome
//!   record; records move monotonically through
//!   `pending → running → {approved | blocked | escalated | error}`
//! - The runner submits events strictly sequentially with inter-event
//!   pacing and advisory cancellation checked at safe suspension points
//! - Ad-hoc playground submissions share the store and the
//!   classification rules but not the runner's pacing or cancellation
//!
//! # Modules
//!
//! - `adapters`: External service clients (governance, narrative, registry)
//! - `core`: Orchestration logic (Orchestrator, ResultStore, analysis)
//! - `domain`: Data structures (EventDefinition, EventOutcome, RunStats)
//! - `catalog`: Static demo events, agents and policies
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run the demo catalog once through
//! govflow run --seed --analyze
//!
//! # Continuous high-volume mode
//! govflow run --live --count 100
//!
//! # Evaluate an ad-hoc event
//! echo '{"type": "po.created", "data": {"NetAmount": 45000}}' | govflow submit
//! ```

pub mod adapters;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{AnalyzedOutcome, Orchestrator, RunMode, RunReport};
pub use crate::domain::{
    EventDefinition, EventOutcome, OutcomeStatus, RunStats, Verdict, VerdictResponse,
};

//! Adapter interfaces for external services.
//!
//! Adapters provide a unified interface to the decision and analysis
//! services so the orchestrator can run against scripted in-process
//! implementations in tests.

pub mod governance;
pub mod narrative;
pub mod registry;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::analysis::DecisionSummary;
use crate::domain::VerdictResponse;

pub use governance::{DecisionError, GovernanceClient};
pub use narrative::{AnalysisError, NarrativeClient};
pub use registry::{RegistryClient, SeedReport};

/// External system returning an approve/block/escalate verdict for a
/// submitted event payload.
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Human-readable service name
    fn name(&self) -> &str;

    /// Evaluate one event payload (id already injected)
    async fn evaluate(&self, payload: &Value) -> Result<VerdictResponse, DecisionError>;
}

/// External system returning narrative explanations for a batch of
/// already-decided events.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Human-readable service name
    fn name(&self) -> &str;

    /// Request narratives for a batch of decision summaries.
    ///
    /// Returns the decoded JSON document; locating the analysis array
    /// inside it is the caller's concern.
    async fn narrate(&self, summaries: &[DecisionSummary]) -> Result<Value, AnalysisError>;
}

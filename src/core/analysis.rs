//! Batch analysis summaries, response decoding and pairing.
//!
//! The requester sends one batched request describing every terminal
//! outcome and expects a JSON object with an `analysis` array back. The
//! decode is deliberately lenient about the container shape (upstream
//! services drift); pairing is strictly positional.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::EventOutcome;

/// Rationale used when the decision service recorded none
const ZERO_TRUST_REASONING: &str =
    "No policy rationale recorded; zero-trust posture defaults to deny.";

/// Verdict assumed when a terminal outcome carries none
const DEFAULT_VERDICT: &str = "BLOCK";

/// Compact per-event summary sent to the analysis service
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSummary {
    /// 1-based position in the snapshot
    pub event_number: usize,
    pub label: String,
    pub category: String,
    pub verdict: String,
    pub reasoning: String,
    pub violations: String,
    pub requires_human_review: bool,
}

impl DecisionSummary {
    /// Build a summary from a terminal outcome at snapshot position `index`
    pub fn from_outcome(index: usize, outcome: &EventOutcome) -> Self {
        Self {
            event_number: index + 1,
            label: outcome.label.clone(),
            category: outcome.tag.clone(),
            verdict: outcome
                .verdict
                .clone()
                .unwrap_or_else(|| DEFAULT_VERDICT.to_string()),
            reasoning: outcome
                .reasoning
                .clone()
                .unwrap_or_else(|| ZERO_TRUST_REASONING.to_string()),
            violations: outcome.violations.join(", "),
            requires_human_review: outcome.requires_human_review.unwrap_or(false),
        }
    }
}

/// Build summaries for a terminal snapshot, in snapshot order
pub fn build_summaries(snapshot: &[EventOutcome]) -> Vec<DecisionSummary> {
    snapshot
        .iter()
        .enumerate()
        .map(|(i, outcome)| DecisionSummary::from_outcome(i, outcome))
        .collect()
}

/// One narrative element from the analysis response.
///
/// All fields are defaulted; the service is not trusted to send a
/// complete object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventNarrative {
    #[serde(default)]
    pub event_number: Option<u64>,

    #[serde(default)]
    pub verdict: String,

    #[serde(default)]
    pub what_happened: String,

    #[serde(default)]
    pub why_verdict: String,

    #[serde(default)]
    pub business_impact: String,

    #[serde(default)]
    pub next_steps: String,
}

/// A terminal outcome paired with its narrative, if the service sent one
#[derive(Debug, Clone)]
pub struct AnalyzedOutcome {
    pub outcome: EventOutcome,
    pub narrative: Option<EventNarrative>,
}

/// Locate the analysis array inside a decoded response.
///
/// Two-step strategy: the named `analysis` field wins; failing that, the
/// first sequence-valued field in iteration order is taken (ambiguity is
/// logged). A response with no sequence at all yields an empty list
/// rather than an error.
pub fn extract_analysis_array(response: &Value) -> Vec<Value> {
    if let Some(array) = response.get("analysis").and_then(Value::as_array) {
        return array.clone();
    }

    if let Value::Array(array) = response {
        return array.clone();
    }

    if let Value::Object(map) = response {
        let mut arrays = map.iter().filter(|(_, v)| v.is_array());
        if let Some((key, Value::Array(array))) = arrays.next() {
            if arrays.next().is_some() {
                warn!(field = %key, "Multiple sequence fields in analysis response; using the first");
            }
            return array.clone();
        }
    }

    Vec::new()
}

/// Pair narrative elements with outcomes by position.
///
/// Element *i* belongs to outcome *i*; ids are not consulted. When the
/// service returns fewer elements than outcomes, the tail is paired with
/// nothing instead of failing the batch.
pub fn pair_narratives(snapshot: Vec<EventOutcome>, elements: Vec<Value>) -> Vec<AnalyzedOutcome> {
    let mut narratives = elements
        .into_iter()
        .map(|el| serde_json::from_value::<EventNarrative>(el).ok());

    snapshot
        .into_iter()
        .map(|outcome| AnalyzedOutcome {
            narrative: narratives.next().flatten(),
            outcome,
        })
        .collect()
}

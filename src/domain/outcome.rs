//! Per-event outcome records and their lifecycle state machine.
//!
//! Every dispatched or submitted event produces exactly one
//! [`EventOutcome`]. Its status moves monotonically through
//! `pending → running → {approved | blocked | escalated | error}`;
//! terminal states are final for that record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::event::EventDefinition;

/// Decision-service response for a single evaluated event.
///
/// Field names match the governance adapter's wire format. Everything but
/// the verdict itself is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub verdict: String,

    #[serde(default)]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub reasoning: Option<String>,

    #[serde(default)]
    pub policy_violations: Vec<String>,

    #[serde(default)]
    pub workflow_decision: Option<String>,

    #[serde(default)]
    pub requires_human_review: Option<bool>,
}

/// Three-way classification of a verdict string.
///
/// Classification is total: `APPROVE` and `BLOCK` are matched
/// case-insensitively and anything else counts as an escalation, never as
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Block,
    Escalate,
}

impl Verdict {
    /// Classify a raw verdict string
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("APPROVE") {
            Self::Approve
        } else if raw.eq_ignore_ascii_case("BLOCK") {
            Self::Block
        } else {
            Self::Escalate
        }
    }

    /// The terminal outcome status this verdict maps to
    pub fn status(self) -> OutcomeStatus {
        match self {
            Self::Approve => OutcomeStatus::Approved,
            Self::Block => OutcomeStatus::Blocked,
            Self::Escalate => OutcomeStatus::Escalated,
        }
    }
}

/// Lifecycle status of an outcome record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Record created, request not yet sent (instantaneous)
    Pending,

    /// Request in flight
    Running,

    /// Verdict was APPROVE
    Approved,

    /// Verdict was BLOCK
    Blocked,

    /// Verdict was present but neither APPROVE nor BLOCK
    Escalated,

    /// The call failed, timed out, or the response could not be decoded
    Error,
}

impl OutcomeStatus {
    /// Whether this status is final for the record
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    fn can_transition(self, next: Self) -> bool {
        match self {
            Self::Pending => next == Self::Running,
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }
}

/// Errors from illegal lifecycle use
#[derive(Debug, Clone, Error)]
pub enum OutcomeError {
    #[error("Invalid status transition: {from:?} → {to:?}")]
    InvalidTransition {
        from: OutcomeStatus,
        to: OutcomeStatus,
    },
}

/// One outcome record per dispatched or submitted event.
///
/// Verdict fields are populated only once the status leaves `running`
/// successfully; they stay absent while pending/running and on error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOutcome {
    /// Unique id, generated at submission time
    pub id: String,

    /// Copied from the definition at creation
    pub label: String,

    /// Copied from the definition at creation
    pub tag: String,

    /// Copied from the definition at creation
    pub source: String,

    /// Current lifecycle status
    pub status: OutcomeStatus,

    /// Raw verdict string from the decision service
    #[serde(default)]
    pub verdict: Option<String>,

    /// Confidence in the verdict, 0..1
    #[serde(default)]
    pub confidence: Option<f64>,

    /// Supporting rationale from the decision service
    #[serde(default)]
    pub reasoning: Option<String>,

    /// Violated policy codes, in service order
    #[serde(default)]
    pub violations: Vec<String>,

    /// Downstream workflow decision (APPROVE / REJECT / DELEGATE)
    #[serde(default)]
    pub workflow_decision: Option<String>,

    /// Whether a human must review this decision
    #[serde(default)]
    pub requires_human_review: Option<bool>,

    /// Error message when the call itself failed
    #[serde(default)]
    pub error: Option<String>,

    /// Creation time, display-only
    pub timestamp: DateTime<Utc>,
}

impl EventOutcome {
    /// Create a pending record for a definition
    pub fn pending(id: impl Into<String>, definition: &EventDefinition) -> Self {
        Self::pending_parts(id, &definition.label, &definition.tag, &definition.source)
    }

    /// Create a pending record from bare display fields
    pub fn pending_parts(id: impl Into<String>, label: &str, tag: &str, source: &str) -> Self {
        Self {
            id: id.into(),
            label: label.to_string(),
            tag: tag.to_string(),
            source: source.to_string(),
            status: OutcomeStatus::Pending,
            verdict: None,
            confidence: None,
            reasoning: None,
            violations: Vec::new(),
            workflow_decision: None,
            requires_human_review: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Advance the status, enforcing monotonicity
    pub fn advance(&mut self, next: OutcomeStatus) -> Result<(), OutcomeError> {
        if !self.status.can_transition(next) {
            return Err(OutcomeError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Mark the request as in flight
    pub fn mark_running(&mut self) -> Result<(), OutcomeError> {
        self.advance(OutcomeStatus::Running)
    }

    /// Apply a successful decision-service response.
    ///
    /// Returns the classified verdict so callers can fold it into running
    /// statistics.
    pub fn complete(&mut self, response: &VerdictResponse) -> Result<Verdict, OutcomeError> {
        let verdict = Verdict::classify(&response.verdict);
        self.advance(verdict.status())?;

        self.verdict = Some(response.verdict.clone());
        self.confidence = response.confidence;
        self.reasoning = response.reasoning.clone();
        self.violations = response.policy_violations.clone();
        self.workflow_decision = response.workflow_decision.clone();
        self.requires_human_review = response.requires_human_review;

        Ok(verdict)
    }

    /// Record a decision-service failure.
    ///
    /// Verdict fields stay absent; the record is terminal and excluded
    /// from statistics.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), OutcomeError> {
        self.advance(OutcomeStatus::Error)?;
        self.error = Some(error.into());
        Ok(())
    }

    /// Whether this record has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_outcome() -> EventOutcome {
        let mut outcome = EventOutcome::pending_parts("evt-1", "label", "tag", "src");
        outcome.mark_running().unwrap();
        outcome
    }

    #[test]
    fn test_classification_is_total_and_case_insensitive() {
        for raw in ["approve", "APPROVE", "Approve"] {
            assert_eq!(Verdict::classify(raw), Verdict::Approve);
        }
        for raw in ["block", "BLOCK", "Block"] {
            assert_eq!(Verdict::classify(raw), Verdict::Block);
        }
        // Anything else escalates, including unrecognized strings
        for raw in ["ESCALATE", "escalate", "DEFER", "garbage", ""] {
            assert_eq!(Verdict::classify(raw), Verdict::Escalate);
        }
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut outcome = EventOutcome::pending_parts("evt-1", "label", "tag", "src");
        assert_eq!(outcome.status, OutcomeStatus::Pending);

        outcome.mark_running().unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Running);

        let response = VerdictResponse {
            verdict: "APPROVE".to_string(),
            confidence: Some(0.92),
            ..Default::default()
        };
        let verdict = outcome.complete(&response).unwrap();

        assert_eq!(verdict, Verdict::Approve);
        assert_eq!(outcome.status, OutcomeStatus::Approved);
        assert_eq!(outcome.verdict.as_deref(), Some("APPROVE"));
        assert_eq!(outcome.confidence, Some(0.92));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut outcome = running_outcome();
        outcome
            .complete(&VerdictResponse {
                verdict: "BLOCK".to_string(),
                ..Default::default()
            })
            .unwrap();

        // No second terminal transition
        let err = outcome.fail("late failure");
        assert!(matches!(err, Err(OutcomeError::InvalidTransition { .. })));
        assert_eq!(outcome.status, OutcomeStatus::Blocked);
    }

    #[test]
    fn test_no_regression_from_running() {
        let mut outcome = running_outcome();
        let err = outcome.advance(OutcomeStatus::Pending);
        assert!(matches!(err, Err(OutcomeError::InvalidTransition { .. })));
    }

    #[test]
    fn test_skipping_running_is_rejected() {
        let mut outcome = EventOutcome::pending_parts("evt-1", "label", "tag", "src");
        let err = outcome.advance(OutcomeStatus::Approved);
        assert!(matches!(err, Err(OutcomeError::InvalidTransition { .. })));
    }

    #[test]
    fn test_failure_leaves_verdict_fields_absent() {
        let mut outcome = running_outcome();
        outcome.fail("connection refused").unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(outcome.verdict.is_none());
        assert!(outcome.confidence.is_none());
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_unrecognized_verdict_escalates() {
        let mut outcome = running_outcome();
        let verdict = outcome
            .complete(&VerdictResponse {
                verdict: "DEFER_TO_COMMITTEE".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(verdict, Verdict::Escalate);
        assert_eq!(outcome.status, OutcomeStatus::Escalated);
    }
}

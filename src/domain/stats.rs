//! Running verdict counters.

use serde::{Deserialize, Serialize};

use super::outcome::{EventOutcome, Verdict};

/// Running counts of classified verdicts.
///
/// Updated incrementally as outcomes turn terminal; `error` terminations
/// update no counter. At any point the counts equal a full fold of the
/// classification rule over the store's terminal, non-error outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub approved: u64,
    pub blocked: u64,
    pub escalated: u64,
}

impl RunStats {
    /// Fold one classified verdict into the counters
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Approve => self.approved += 1,
            Verdict::Block => self.blocked += 1,
            Verdict::Escalate => self.escalated += 1,
        }
    }

    /// Reconstruct the counters from a store snapshot.
    ///
    /// Used to check the incremental counts against a full replay.
    pub fn replay<'a>(outcomes: impl IntoIterator<Item = &'a EventOutcome>) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            if let Some(raw) = outcome.verdict.as_deref() {
                if outcome.is_terminal() {
                    stats.record(Verdict::classify(raw));
                }
            }
        }
        stats
    }

    /// Total decided events (errors excluded)
    pub fn total(&self) -> u64 {
        self.approved + self.blocked + self.escalated
    }
}

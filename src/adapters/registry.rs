//! Best-effort seeding of demo agents and policies.
//!
//! Seeding is not part of the orchestrator's correctness contract: a 2xx
//! or a conflict (already exists) counts as success, every other outcome
//! is tolerated and logged, and only an aggregate count is reported.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

/// HTTP conflict, returned when a record already exists
const STATUS_CONFLICT: u16 = 409;

/// Aggregate result of a bulk seeding pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedReport {
    /// Newly created records
    pub created: usize,

    /// Records that already existed (conflict responses)
    pub existing: usize,

    /// Records the service rejected or that never reached it
    pub failed: usize,
}

impl SeedReport {
    /// Records that count as successfully seeded
    pub fn succeeded(&self) -> usize {
        self.created + self.existing
    }
}

/// Client for the governance registry API
pub struct RegistryClient {
    /// Base URL of the governance API (e.g. "http://localhost:8000")
    base_url: String,

    /// Per-request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl RegistryClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Check that the governance API answers its health route
    pub async fn health(&self) -> Result<(), reqwest::Error> {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Seed demo agents into the registry
    pub async fn seed_agents(&self, agents: &[Value]) -> SeedReport {
        self.seed_records("/api/v1/agents/", "agent", agents).await
    }

    /// Seed governance policies
    pub async fn seed_policies(&self, policies: &[Value]) -> SeedReport {
        self.seed_records("/api/v1/policies/", "policy", policies)
            .await
    }

    async fn seed_records(&self, path: &str, kind: &str, records: &[Value]) -> SeedReport {
        let url = format!("{}{}", self.base_url, path);
        let mut report = SeedReport::default();

        for record in records {
            let code = record
                .get("agent_code")
                .or_else(|| record.get("policy_code"))
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>");

            match self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(record)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    info!(kind, code, "Registered");
                    report.created += 1;
                }
                Ok(response) if response.status().as_u16() == STATUS_CONFLICT => {
                    info!(kind, code, "Already exists");
                    report.existing += 1;
                }
                Ok(response) => {
                    warn!(kind, code, status = response.status().as_u16(), "Seeding rejected");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(kind, code, error = %e, "Seeding request failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            kind,
            succeeded = report.succeeded(),
            failed = report.failed,
            "Seeding pass finished"
        );
        report
    }
}

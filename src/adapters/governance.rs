//! HTTP client for the governance decision endpoint.
//!
//! Events are POSTed to the SAP adapter's evaluate route; any non-2xx
//! status or undecodable body is a service error that the runner records
//! as the `error` terminal state on that one outcome.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::DecisionService;
use crate::domain::VerdictResponse;

/// Errors from the decision service boundary
#[derive(Debug, Error)]
pub enum DecisionError {
    /// Network failure, timeout, or undecodable response body
    #[error("Decision request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Decision service returned HTTP {status}")]
    Status { status: u16 },
}

/// Client for the SAP governance adapter
pub struct GovernanceClient {
    /// Base URL of the adapter (e.g. "http://localhost:8002")
    base_url: String,

    /// Per-request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl GovernanceClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn evaluate_url(&self) -> String {
        format!("{}/sap/governance/evaluate", self.base_url)
    }

    /// Check that the adapter answers its health route
    pub async fn health(&self) -> Result<(), DecisionError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecisionError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DecisionService for GovernanceClient {
    fn name(&self) -> &str {
        "governance"
    }

    async fn evaluate(&self, payload: &Value) -> Result<VerdictResponse, DecisionError> {
        let url = self.evaluate_url();
        debug!(%url, "Submitting event for evaluation");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecisionError::Status {
                status: status.as_u16(),
            });
        }

        let verdict: VerdictResponse = response.json().await?;
        debug!(verdict = %verdict.verdict, "Received decision");

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_url() {
        let client = GovernanceClient::new("http://localhost:8002", Duration::from_secs(15));
        assert_eq!(
            client.evaluate_url(),
            "http://localhost:8002/sap/governance/evaluate"
        );
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let client = GovernanceClient::new("http://localhost:8002/", Duration::from_secs(15));
        assert_eq!(
            client.evaluate_url(),
            "http://localhost:8002/sap/governance/evaluate"
        );
    }
}

//! Chat-completion client for batched decision narratives.
//!
//! One request covers the whole batch: a system instruction demands a
//! single JSON object with an `analysis` array, and the user message
//! embeds the per-event summaries. The message content is parsed back
//! into JSON and handed to the analysis module for array extraction.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::AnalysisService;
use crate::core::analysis::DecisionSummary;

const SYSTEM_INSTRUCTION: &str = "You are a governance analyst for an enterprise AI-agent \
platform. Respond with exactly one JSON object of the form {\"analysis\": [{\"event_number\": n, \
\"verdict\": \"...\", \"what_happened\": \"...\", \"why_verdict\": \"...\", \"business_impact\": \
\"...\", \"next_steps\": \"...\"}, ...]} with one element per event, in the order given. \
Do not write anything outside the JSON object.";

/// Errors from the analysis service boundary.
///
/// Any of these fails the whole batch; no partial report is synthesized.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Analysis service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Analysis response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for a chat-completion style analysis service
pub struct NarrativeClient {
    /// API base URL (e.g. "https://api.openai.com/v1")
    base_url: String,

    /// Model identifier
    model: String,

    /// Bearer token
    api_key: String,

    /// Per-request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl NarrativeClient {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn user_message(summaries: &[DecisionSummary]) -> String {
        let body = serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string());
        format!(
            "Explain each of the following {} governed events:\n\n{}",
            summaries.len(),
            body
        )
    }
}

#[async_trait]
impl AnalysisService for NarrativeClient {
    fn name(&self) -> &str {
        "narrative"
    }

    async fn narrate(&self, summaries: &[DecisionSummary]) -> Result<Value, AnalysisError> {
        let url = self.completions_url();
        debug!(%url, events = summaries.len(), "Requesting batch analysis");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_message(summaries),
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
            });
        }

        let completion: ChatResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AnalysisError::Decode("response contained no choices".to_string()))?;

        // The message content is itself expected to be a JSON document
        serde_json::from_str(content)
            .map_err(|e| AnalysisError::Decode(format!("message content is not JSON: {e}")))
    }
}

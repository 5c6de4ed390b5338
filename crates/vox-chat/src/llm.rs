//! Language-model collaborator.
//!
//! [`VertexGeminiClient`] calls Gemini through the Vertex AI
//! `generateContent` REST method.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use vox_core::config::LlmConfig;
use vox_core::error::ServiceError;
use vox_core::google::{self, GoogleAuth};

use crate::prompt::{PromptMessage, PromptRole};

/// Text generation service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply for `prompt`. `session_id` identifies the conversation
    /// the call belongs to.
    async fn generate(
        &self,
        prompt: &[PromptMessage],
        session_id: &str,
    ) -> Result<String, ServiceError>;
}

/// Gemini on Vertex AI.
pub struct VertexGeminiClient {
    config: LlmConfig,
    auth: GoogleAuth,
    http: reqwest::Client,
}

impl VertexGeminiClient {
    pub fn new(config: LlmConfig, auth: GoogleAuth) -> Self {
        let http = google::http_client(Duration::from_secs(config.timeout_secs));
        Self { config, auth, http }
    }

    fn api_url(&self) -> Result<String, ServiceError> {
        let project = self
            .config
            .project_id
            .as_deref()
            .ok_or_else(|| ServiceError::NotConfigured("GCP project id".to_string()))?;
        Ok(format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.config.endpoint(),
            project,
            self.config.location,
            self.config.model
        ))
    }

    /// Build the JSON request body for `generateContent`.
    pub(crate) fn build_request_body(&self, prompt: &[PromptMessage]) -> serde_json::Value {
        let mut contents = Vec::new();

        for msg in prompt {
            let role = match msg.role {
                PromptRole::User => "user",
                PromptRole::Assistant => "model",
                PromptRole::System => continue, // sent as systemInstruction
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content }]
            }));
        }

        let mut generation_config = serde_json::json!({
            "temperature": self.config.temperature,
        });
        if let Some(max) = self.config.max_output_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max);
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(system) = prompt.iter().find(|m| m.role == PromptRole::System) {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.content }]
            });
        }

        body
    }

    /// Extract the reply text from a `generateContent` response.
    pub(crate) fn parse_response(json: &serde_json::Value) -> Result<String, ServiceError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| ServiceError::Parse("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| ServiceError::Parse("empty candidates".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                let reason = first["finishReason"].as_str().unwrap_or("unknown");
                ServiceError::Parse(format!("candidate has no content (finishReason: {reason})"))
            })?;

        Ok(parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect())
    }
}

#[async_trait]
impl LanguageModel for VertexGeminiClient {
    async fn generate(
        &self,
        prompt: &[PromptMessage],
        session_id: &str,
    ) -> Result<String, ServiceError> {
        let url = self.api_url()?;
        let body = self.build_request_body(prompt);

        debug!(
            model = %self.config.model,
            session_id,
            messages = prompt.len(),
            "Vertex AI generateContent request"
        );

        let request = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);
        let response = self.auth.authorize(request).send().await?;
        let response = google::check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let reply = Self::parse_response(&json)?;
        debug!(session_id, reply_len = reply.len(), "Vertex AI reply received");
        Ok(reply)
    }
}

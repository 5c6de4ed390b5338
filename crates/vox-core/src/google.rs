//! Shared plumbing for talking to Google Cloud REST endpoints.
//!
//! Both collaborators (Vertex AI and Cloud Text-to-Speech) accept either an
//! OAuth2 access token or an API key, and report failures the same way.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ServiceError;

/// Google Cloud credentials.
///
/// Secrets are never written back to disk by `VoxConfig::save`; supply them
/// through `GOOGLE_ACCESS_TOKEN` / `GOOGLE_API_KEY` instead.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleAuth {
    /// API key sent as `x-goog-api-key`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// OAuth2 bearer token (e.g. from `gcloud auth print-access-token`).
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("GoogleAuth")
            .field("api_key", &redact(&self.api_key))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

impl GoogleAuth {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }

    /// Attach credentials to an outgoing request. A bearer token wins over
    /// an API key when both are present.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.access_token {
            request.bearer_auth(token)
        } else if let Some(ref key) = self.api_key {
            request.header("x-goog-api-key", key)
        } else {
            request
        }
    }
}

/// Build the HTTP client used for collaborator calls.
pub fn http_client(request_timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(request_timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build tuned HTTP client, using defaults");
            reqwest::Client::new()
        }
    }
}

/// Map a non-success response to a [`ServiceError`], passing successes through.
pub async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::RateLimited);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

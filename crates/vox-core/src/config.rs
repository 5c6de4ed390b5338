use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::google::GoogleAuth;

/// Top-level configuration for the Vox backend.
///
/// Loaded from `~/.vox/config.toml` by default, then overlaid with
/// environment variables (see [`VoxConfig::apply_env_overrides`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub google: GoogleAuth,
}

impl VoxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Overlay values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary key lookup.
    ///
    /// Recognized keys: `GCP_PROJECT_ID`, `GCP_LOCATION`, `GOOGLE_API_KEY`,
    /// `GOOGLE_ACCESS_TOKEN`, `VOX_HOST`, `VOX_PORT`, `VOX_LOG_LEVEL`.
    /// Empty values are ignored, as are ports that do not parse.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GCP_PROJECT_ID") {
            self.llm.project_id = Some(v);
        }
        if let Some(v) = get("GCP_LOCATION") {
            self.llm.location = v;
        }
        if let Some(v) = get("GOOGLE_API_KEY") {
            self.google.api_key = Some(v);
        }
        if let Some(v) = get("GOOGLE_ACCESS_TOKEN") {
            self.google.access_token = Some(v);
        }
        if let Some(v) = get("VOX_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("VOX_PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %v, "Ignoring invalid VOX_PORT"),
            }
        }
        if let Some(v) = get("VOX_LOG_LEVEL") {
            self.server.log_level = v;
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Session handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session used when a request does not name one.
    pub default_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_id: "default_session".to_string(),
        }
    }
}

/// Vertex AI Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Override for the Vertex AI endpoint root. Derived from `location`
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// GCP project hosting the model. Usually supplied via `GCP_PROJECT_ID`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Vertex AI location, e.g. "global" or "us-central1".
    pub location: String,
    /// Publisher model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Cap on generated tokens. The service default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            project_id: None,
            location: "global".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Endpoint root for the configured location.
    pub fn endpoint(&self) -> String {
        if let Some(ref url) = self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        if self.location == "global" {
            "https://aiplatform.googleapis.com".to_string()
        } else {
            format!("https://{}-aiplatform.googleapis.com", self.location)
        }
    }
}

/// Cloud Text-to-Speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Text-to-Speech endpoint root.
    pub base_url: String,
    /// Locale used when a request asks for plain "en" or nothing at all.
    pub default_locale: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com".to_string(),
            default_locale: "en-US".to_string(),
            timeout_secs: 60,
        }
    }
}

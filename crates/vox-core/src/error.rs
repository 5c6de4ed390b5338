use thiserror::Error;

/// Failure reported by an external collaborator (language model or speech
/// synthesis service).
///
/// This is the only error kind the conversation and speech layers surface;
/// the HTTP gateway decides how each route translates it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by upstream service")]
    RateLimited,

    #[error("upstream returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse upstream response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Top-level error type for the Vox process.
///
/// Startup and configuration paths return this; request paths stay on
/// [`ServiceError`] and the HTTP gateway maps it per route.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(String),
}

impl From<toml::de::Error> for VoxError {
    fn from(err: toml::de::Error) -> Self {
        VoxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoxError {
    fn from(err: toml::ser::Error) -> Self {
        VoxError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Vox operations.
pub type Result<T> = std::result::Result<T, VoxError>;

use async_trait::async_trait;
use serde::Serialize;

use vox_core::error::ServiceError;

/// Voice profile requested from the synthesis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Female,
    Male,
}

impl VoiceGender {
    /// Map a free-form selector to a voice. `"female"` in any case picks the
    /// female voice; every other value picks the male one.
    pub fn from_selector(voice: &str) -> Self {
        if voice.trim().eq_ignore_ascii_case("female") {
            VoiceGender::Female
        } else {
            VoiceGender::Male
        }
    }
}

/// Encoded audio format of the synthesis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AudioEncoding {
    #[default]
    #[serde(rename = "MP3")]
    Mp3,
}

impl AudioEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "audio/mpeg",
        }
    }
}

/// A fully resolved synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    /// BCP-47 locale, e.g. "en-US".
    pub locale: String,
    pub gender: VoiceGender,
    pub encoding: AudioEncoding,
}

/// Speech synthesis service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `request` to encoded audio bytes.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, ServiceError>;
}

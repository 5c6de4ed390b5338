use std::sync::Arc;

use tracing::debug;

use vox_core::error::ServiceError;

use crate::types::{AudioEncoding, SpeechSynthesizer, SynthesisRequest, VoiceGender};

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_VOICE: &str = "female";

/// Converts text to MP3 audio through a [`SpeechSynthesizer`].
pub struct SpeechAdapter {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    default_locale: String,
}

impl SpeechAdapter {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            default_locale: "en-US".to_string(),
        }
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Synthesize `text` in the default locale. `lang` is accepted from
    /// callers but only logged. Empty or whitespace-only text yields no audio
    /// and never reaches the service.
    pub async fn text_to_speech(
        &self,
        text: &str,
        lang: &str,
        voice: &str,
    ) -> Result<Vec<u8>, ServiceError> {
        if text.trim().is_empty() {
            debug!("Skipping synthesis of blank text");
            return Ok(Vec::new());
        }

        let request = SynthesisRequest {
            text: text.to_string(),
            locale: self.default_locale.clone(),
            gender: VoiceGender::from_selector(voice),
            encoding: AudioEncoding::Mp3,
        };
        debug!(
            requested_lang = lang,
            locale = %request.locale,
            gender = ?request.gender,
            text_len = text.len(),
            "Synthesizing speech"
        );

        self.synthesizer.synthesize(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Records every request and returns fixed bytes.
    #[derive(Default)]
    struct RecordingSynthesizer {
        requests: Mutex<Vec<SynthesisRequest>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynthesizer {
        async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, ServiceError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(b"ABC".to_vec())
        }
    }

    struct FailingSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for FailingSynthesizer {
        async fn synthesize(&self, _request: &SynthesisRequest) -> Result<Vec<u8>, ServiceError> {
            Err(ServiceError::Api {
                status: 400,
                body: "bad voice".to_string(),
            })
        }
    }

    fn adapter() -> (SpeechAdapter, Arc<RecordingSynthesizer>) {
        let synth = Arc::new(RecordingSynthesizer::default());
        (SpeechAdapter::new(synth.clone()), synth)
    }

    #[tokio::test]
    async fn test_empty_text_skips_service() {
        let (adapter, synth) = adapter();
        assert!(adapter.text_to_speech("", "en", "female").await.unwrap().is_empty());
        assert!(adapter
            .text_to_speech("  \n\t ", "en", "female")
            .await
            .unwrap()
            .is_empty());
        assert!(synth.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_returns_service_bytes() {
        let (adapter, synth) = adapter();
        let audio = adapter.text_to_speech("hello", "en", "female").await.unwrap();
        assert_eq!(audio, b"ABC");

        let requests = synth.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            SynthesisRequest {
                text: "hello".to_string(),
                locale: "en-US".to_string(),
                gender: VoiceGender::Female,
                encoding: AudioEncoding::Mp3,
            }
        );
    }

    #[tokio::test]
    async fn test_voice_selection_case_insensitive() {
        let (adapter, synth) = adapter();
        adapter.text_to_speech("hi", "en", "MALE").await.unwrap();
        adapter.text_to_speech("hi", "en", "male").await.unwrap();

        let requests = synth.requests.lock().unwrap();
        assert_eq!(requests[0].gender, VoiceGender::Male);
        assert_eq!(requests[0].gender, requests[1].gender);
    }

    #[tokio::test]
    async fn test_lang_does_not_change_locale() {
        let (adapter, synth) = adapter();
        for lang in ["en", "en-US", "de-DE", "english", "xx", ""] {
            adapter.text_to_speech("hi", lang, "female").await.unwrap();
        }

        let requests = synth.requests.lock().unwrap();
        assert_eq!(requests.len(), 6);
        assert!(requests.iter().all(|r| r.locale == "en-US"));
    }

    #[tokio::test]
    async fn test_custom_default_locale() {
        let synth = Arc::new(RecordingSynthesizer::default());
        let adapter = SpeechAdapter::new(synth.clone()).with_default_locale("en-GB");
        assert_eq!(adapter.default_locale(), "en-GB");

        adapter.text_to_speech("hi", "fr-FR", "female").await.unwrap();
        assert_eq!(synth.requests.lock().unwrap()[0].locale, "en-GB");
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let adapter = SpeechAdapter::new(Arc::new(FailingSynthesizer));
        let err = adapter.text_to_speech("hi", "en", "female").await.unwrap_err();
        assert!(matches!(err, ServiceError::Api { status: 400, .. }));
    }
}

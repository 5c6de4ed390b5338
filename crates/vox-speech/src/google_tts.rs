//! Google Cloud Text-to-Speech client (`text:synthesize` REST method).

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use tracing::debug;

use vox_core::config::SpeechConfig;
use vox_core::error::ServiceError;
use vox_core::google::{self, GoogleAuth};

use crate::types::{SpeechSynthesizer, SynthesisRequest};

pub struct GoogleTtsClient {
    base_url: String,
    auth: GoogleAuth,
    http: reqwest::Client,
}

impl GoogleTtsClient {
    pub fn new(config: &SpeechConfig, auth: GoogleAuth) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            http: google::http_client(Duration::from_secs(config.timeout_secs)),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.base_url)
    }

    pub(crate) fn build_request_body(request: &SynthesisRequest) -> serde_json::Value {
        serde_json::json!({
            "input": { "text": request.text },
            "voice": {
                "languageCode": request.locale,
                "ssmlGender": request.gender,
            },
            "audioConfig": { "audioEncoding": request.encoding },
        })
    }

    pub(crate) fn decode_audio(json: &serde_json::Value) -> Result<Vec<u8>, ServiceError> {
        let encoded = json["audioContent"]
            .as_str()
            .ok_or_else(|| ServiceError::Parse("no audioContent in response".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ServiceError::Parse(format!("invalid audioContent: {e}")))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, ServiceError> {
        let body = Self::build_request_body(request);

        debug!(locale = %request.locale, "Cloud TTS synthesize request");

        let http_request = self.http.post(self.api_url()).json(&body);
        let response = self.auth.authorize(http_request).send().await?;
        let response = google::check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let audio = Self::decode_audio(&json)?;
        debug!(bytes = audio.len(), "Cloud TTS audio received");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AudioEncoding, VoiceGender};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn request(text: &str, gender: VoiceGender) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            locale: "en-US".to_string(),
            gender,
            encoding: AudioEncoding::Mp3,
        }
    }

    fn client_for(base_url: String, auth: GoogleAuth) -> GoogleTtsClient {
        let config = SpeechConfig {
            base_url,
            ..SpeechConfig::default()
        };
        GoogleTtsClient::new(&config, auth)
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_request_body_shape() {
        let body = GoogleTtsClient::build_request_body(&request("hello", VoiceGender::Male));
        assert_eq!(
            body,
            serde_json::json!({
                "input": {"text": "hello"},
                "voice": {"languageCode": "en-US", "ssmlGender": "MALE"},
                "audioConfig": {"audioEncoding": "MP3"}
            })
        );
    }

    #[test]
    fn test_decode_audio() {
        let json = serde_json::json!({"audioContent": "QUJD"});
        assert_eq!(GoogleTtsClient::decode_audio(&json).unwrap(), b"ABC");

        let missing = serde_json::json!({});
        assert!(matches!(
            GoogleTtsClient::decode_audio(&missing),
            Err(ServiceError::Parse(_))
        ));

        let garbage = serde_json::json!({"audioContent": "not base64!"});
        assert!(matches!(
            GoogleTtsClient::decode_audio(&garbage),
            Err(ServiceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_synthesize_against_local_endpoint() {
        let router = Router::new().route(
            "/v1/text:synthesize",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "key");
                assert_eq!(body["voice"]["ssmlGender"], "FEMALE");
                Json(serde_json::json!({"audioContent": "QUJD"}))
            }),
        );
        let base = serve(router).await;
        let auth = GoogleAuth {
            api_key: Some("key".to_string()),
            ..GoogleAuth::default()
        };
        let client = client_for(base, auth);

        let audio = client
            .synthesize(&request("hello", VoiceGender::Female))
            .await
            .unwrap();
        assert_eq!(audio, b"ABC");
    }

    #[tokio::test]
    async fn test_synthesize_upstream_error() {
        let router = Router::new().route(
            "/v1/text:synthesize",
            post(|| async { (StatusCode::UNAUTHORIZED, "missing credentials") }),
        );
        let base = serve(router).await;
        let client = client_for(base, GoogleAuth::default());

        match client.synthesize(&request("hello", VoiceGender::Female)).await {
            Err(ServiceError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "missing credentials");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}

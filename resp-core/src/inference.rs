//! # Inference Client Adapter
//!
//! The boundary to the external classifier. Flows depend on the
//! [`InferenceClient`] trait; [`HttpInferenceClient`] is the production
//! implementation that talks to the analysis service over HTTP.
//!
//! There is no retry: a failed call is reported once, with the service's
//! own message when it sent one.

use crate::InferenceResult;
use crate::config::AppConfig;
use crate::error::TransportError;
use crate::upload::AcceptedUpload;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Sends a validated recording for classification.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn submit(&self, upload: &AcceptedUpload) -> Result<InferenceResult, TransportError>;
}

/// Client for the analysis service's `/predict` and `/health` endpoints.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    http: reqwest::Client,
    api_base: String,
}

/// Error body the service returns on a rejected request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

impl HttpInferenceClient {
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Checks that the service is up and reports `"ok"`.
    pub async fn health(&self) -> Result<(), TransportError> {
        let response = self.http.get(self.endpoint("health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::new(failure_message(status, &body)));
        }
        let health: HealthBody = response.json().await?;
        if health.status != "ok" {
            return Err(TransportError::new(format!(
                "Analysis service reported status \"{}\"",
                health.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn submit(&self, upload: &AcceptedUpload) -> Result<InferenceResult, TransportError> {
        let file = upload.file();
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| TransportError::new(format!("Could not read {}: {}", file.name, e)))?;

        tracing::info!(name = %file.name, size = bytes.len(), url = %self.endpoint("predict"), "submitting recording");

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(upload.format().mime_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("predict"))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let outcome = decode_prediction(status, &body);
        match &outcome {
            Ok(result) => tracing::info!(label = %result.predicted_label, "prediction received"),
            Err(err) => tracing::warn!(%status, error = %err, "prediction failed"),
        }
        outcome
    }
}

/// Turns a `/predict` response into a result or a user-facing failure.
fn decode_prediction(status: StatusCode, body: &str) -> Result<InferenceResult, TransportError> {
    if !status.is_success() {
        return Err(TransportError::new(failure_message(status, body)));
    }
    serde_json::from_str(body).map_err(|e| {
        TransportError::new(format!("Invalid response from analysis service: {e}"))
    })
}

/// The service's `detail` text when present, otherwise the status line.
fn failure_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) if !detail.is_null() => detail.to_string(),
        _ => format!("Request failed with status {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{AudioFile, validate};

    const PREDICTION: &str = r#"{
        "predicted_disease": "Pneumonia",
        "confidence": 72.5,
        "probabilities": {"Normal": 10.0, "Asthma": 5.0, "Pneumonia": 72.5, "Bronchitis": 7.5, "COPD": 5.0},
        "visualizations": {
            "sample_rate": 16000,
            "waveform": [0.0, 0.25, -0.25],
            "mel_spectrogram": [[-80.0, -40.0], [-20.0, 0.0]]
        }
    }"#;

    #[test]
    fn decodes_successful_prediction() {
        let result = decode_prediction(StatusCode::OK, PREDICTION).unwrap();
        assert_eq!(result.predicted_label, "Pneumonia");
        assert_eq!(result.confidence, 72.5);
        assert_eq!(result.probabilities.len(), 5);
        assert_eq!(result.visualizations.sample_rate, Some(16000));
        assert_eq!(result.mel_spectrogram().len(), 2);
    }

    #[test]
    fn service_detail_is_reported_verbatim() {
        let body = r#"{"detail": "Only WAV or MP3 files are supported."}"#;
        let err = decode_prediction(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(err.message(), "Only WAV or MP3 files are supported.");
    }

    #[test]
    fn structured_detail_is_serialized() {
        let body = r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#;
        let err = decode_prediction(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        assert!(err.message().contains("field required"));
    }

    #[test]
    fn opaque_failure_uses_status_code() {
        let err = decode_prediction(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert_eq!(err.message(), "Request failed with status 502");
    }

    #[test]
    fn malformed_success_body_is_a_transport_error() {
        let err = decode_prediction(StatusCode::OK, r#"{"label": "x"}"#).unwrap_err();
        assert!(err.message().starts_with("Invalid response from analysis service"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_base() {
        let config = AppConfig {
            api_base: "http://localhost:8000/".to_string(),
            ..AppConfig::default()
        };
        let client = HttpInferenceClient::new(&config).unwrap();
        assert_eq!(client.api_base(), "http://localhost:8000");
        assert_eq!(client.endpoint("predict"), "http://localhost:8000/predict");
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_any_request() {
        let client = HttpInferenceClient::new(&AppConfig::default()).unwrap();
        let upload = validate(AudioFile::new("/definitely/not/here.wav", "here.wav", 10)).unwrap();
        let err = client.submit(&upload).await.unwrap_err();
        assert!(err.message().starts_with("Could not read here.wav"));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = AppConfig {
            api_base: format!("http://127.0.0.1:{port}"),
            request_timeout_secs: 5,
        };
        let client = HttpInferenceClient::new(&config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breath.wav");
        std::fs::write(&path, b"RIFF").unwrap();
        let upload = validate(AudioFile::from_path(&path).unwrap()).unwrap();

        assert!(client.submit(&upload).await.is_err());
        assert!(client.health().await.is_err());
    }
}

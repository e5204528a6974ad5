//! End-to-end tests for the upload → inference → handoff → report pipeline.
//!
//! The inference service is replaced by an in-process fake so the tests run
//! without a network.

use async_trait::async_trait;
use resp_core::inference::InferenceClient;
use resp_core::report::AnalysisReport;
use resp_core::session::{RESULT_KEY, SessionScope};
use resp_core::upload::{AcceptedUpload, AudioFile, MAX_UPLOAD_BYTES, validate};
use resp_core::{InferenceResult, RetrievalError, TransportError, UploadError};
use std::sync::Mutex;

const PAYLOAD: &str = r#"{
    "predicted_disease": "Bronchitis",
    "confidence": 64.31,
    "probabilities": {
        "Normal": 12.5,
        "Asthma": 12.5,
        "Pneumonia": 4.2,
        "Bronchitis": 64.31,
        "COPD": 6.49
    },
    "visualizations": {
        "sample_rate": 16000,
        "waveform": [0.0, 0.42, -0.37, 0.11],
        "mel_spectrogram": [
            [-80.0, -75.0, -70.0],
            [-40.0, -35.0, -30.0],
            [-5.0, -2.5, 0.0]
        ]
    }
}"#;

/// Returns a canned payload and records which files it was sent.
struct FakeService {
    payload: Option<&'static str>,
    seen: Mutex<Vec<String>>,
}

impl FakeService {
    fn answering(payload: &'static str) -> Self {
        Self {
            payload: Some(payload),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            payload: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InferenceClient for FakeService {
    async fn submit(&self, upload: &AcceptedUpload) -> Result<InferenceResult, TransportError> {
        self.seen.lock().unwrap().push(upload.file().name.clone());
        match self.payload {
            Some(payload) => Ok(serde_json::from_str(payload).unwrap()),
            None => Err(TransportError::new("Prediction failed: could not decode audio")),
        }
    }
}

fn recording(dir: &tempfile::TempDir, name: &str, bytes: usize) -> AudioFile {
    let path = dir.path().join(name);
    std::fs::write(&path, vec![0u8; bytes]).unwrap();
    AudioFile::from_path(path).unwrap()
}

#[tokio::test]
async fn upload_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::answering(PAYLOAD);
    let scope = SessionScope::new();
    let upload_flow = scope.handoff();
    let results_flow = scope.handoff();

    // Upload flow.
    let accepted = validate(recording(&dir, "patient.01.WAV", 4096)).unwrap();
    let result = service.submit(&accepted).await.unwrap();
    upload_flow.put(&result).unwrap();
    assert_eq!(*service.seen.lock().unwrap(), vec!["patient.01.WAV".to_string()]);

    // Results flow.
    let handed_off = results_flow.take().unwrap();
    assert_eq!(handed_off, result);
    let report = AnalysisReport::build(&handed_off);

    assert_eq!(report.predicted_label, "Bronchitis");
    assert_eq!(report.top_label, "Bronchitis");
    assert_eq!(report.confidence, "64.31");

    // Normal and Asthma tie; service order decides.
    let labels: Vec<&str> = report.probabilities.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Bronchitis", "Normal", "Asthma", "COPD", "Pneumonia"]);

    assert_eq!(report.waveform.len(), 4);
    assert_eq!(report.waveform[2].index, 2);

    let heatmap = report.heatmap.as_ref().unwrap();
    assert_eq!((heatmap.width(), heatmap.height()), (3, 3));
    // Loudest bin (last grid row) is drawn at the top.
    assert_eq!(heatmap.pixel(2, 0), Some([80, 200, 240, 255]));
    // Quietest cell (first grid row) is drawn at the bottom.
    assert_eq!(heatmap.pixel(0, 2), Some([20, 60, 140, 255]));

    // The handoff is read once.
    assert_eq!(results_flow.get(), Err(RetrievalError::Absent));
}

#[tokio::test]
async fn rejected_upload_never_reaches_the_service() {
    let service = FakeService::answering(PAYLOAD);
    let oversized = AudioFile::new("big.mp3", "big.mp3", MAX_UPLOAD_BYTES + 1);
    let video = AudioFile::new("clip.mp4", "clip.mp4", 0);

    assert!(matches!(validate(oversized), Err(UploadError::FileTooLarge { .. })));
    assert!(matches!(validate(video), Err(UploadError::UnsupportedFormat { .. })));
    assert!(service.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn transport_failure_leaves_no_result_behind() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::failing();
    let scope = SessionScope::new();
    let handoff = scope.handoff();

    let accepted = validate(recording(&dir, "wheeze.mp3", 128)).unwrap();
    let err = service.submit(&accepted).await.unwrap_err();
    assert_eq!(err.to_string(), "Prediction failed: could not decode audio");
    assert_eq!(handoff.get(), Err(RetrievalError::Absent));
}

#[test]
fn results_flow_distinguishes_absent_from_corrupt() {
    let scope = SessionScope::new();
    let handoff = scope.handoff();
    assert_eq!(
        handoff.get().unwrap_err().to_string(),
        "No analysis found. Please upload an audio file first."
    );

    scope.storage().set_item(RESULT_KEY, "undefined".to_string());
    assert_eq!(
        handoff.get().unwrap_err().to_string(),
        "Failed to load analysis result."
    );
}

#[test]
fn degenerate_payload_renders_without_panicking() {
    let raw = r#"{
        "predicted_disease": "Normal",
        "confidence": null,
        "probabilities": {},
        "visualizations": {"waveform": [], "mel_spectrogram": [[]]}
    }"#;
    let result: InferenceResult = serde_json::from_str(raw).unwrap();
    let report = AnalysisReport::build(&result);

    assert_eq!(report.confidence, "0.00");
    assert_eq!(report.top_label, "Normal");
    assert!(report.probabilities.is_empty());
    assert!(report.waveform.is_empty());
    assert!(report.heatmap.is_none());
}

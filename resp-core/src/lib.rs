// resp-core/src/lib.rs

//! The core logic for the respiratory sound analyzer.
//! This crate validates uploads, talks to the inference service, hands the
//! result from the upload flow to the results flow, and turns the raw
//! prediction into display-ready structures. It is completely headless
//! and contains no GUI code.

pub mod config;
pub mod error;
pub mod format;
pub mod inference;
mod lenient;
pub mod probabilities;
pub mod ranking;
pub mod report;
pub mod session;
pub mod spectrogram;
pub mod upload;
pub mod waveform;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use error::{RetrievalError, TransportError, UploadError};
pub use probabilities::Probabilities;

/// The structured output of the classifier for one submitted recording.
///
/// Field names on the wire follow the inference service; the same JSON is
/// what the session handoff stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// The top class as reported by the classifier. Not necessarily the
    /// arg-max of `probabilities`.
    #[serde(rename = "predicted_disease")]
    pub predicted_label: String,
    /// Percentage in `[0, 100]`. NaN when the service sent `null`.
    #[serde(deserialize_with = "lenient::number")]
    pub confidence: f64,
    /// Per-class percentages in service order.
    pub probabilities: Probabilities,
    pub visualizations: Visualizations,
}

/// Precomputed visualization data shipped alongside the prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visualizations {
    #[serde(default)]
    pub sample_rate: Option<u32>,
    /// Amplitude samples, nominally in `[-1, 1]`.
    #[serde(deserialize_with = "lenient::samples")]
    pub waveform: Vec<f32>,
    /// Decibel magnitudes, outer index = mel bin, inner index = time frame.
    #[serde(deserialize_with = "lenient::grid")]
    pub mel_spectrogram: Vec<Vec<f32>>,
}

impl InferenceResult {
    pub fn waveform(&self) -> &[f32] {
        &self.visualizations.waveform
    }

    pub fn mel_spectrogram(&self) -> &[Vec<f32>] {
        &self.visualizations.mel_spectrogram
    }

    /// Builds the validated grid the heatmap renderer consumes.
    pub fn mel_grid(&self) -> spectrogram::MelGrid {
        spectrogram::MelGrid::from_rows(self.mel_spectrogram())
    }
}

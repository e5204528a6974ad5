//! Error types surfaced to the user.
//!
//! The `Display` text of each variant is the message shown in the UI.

use thiserror::Error;

/// Rejection reasons from the upload validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please upload a WAV or MP3 file.")]
    UnsupportedFormat { extension: Option<String> },
    #[error("File too large (max 25MB).")]
    FileTooLarge { size: u64, limit: u64 },
}

/// A failed call to the inference service. The message is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Why the results flow could not pick up a handed-off result.
///
/// The two cases need different remediation: `Absent` means the user never
/// uploaded, `Corrupt` means they should try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("No analysis found. Please upload an audio file first.")]
    Absent,
    #[error("Failed to load analysis result.")]
    Corrupt,
}

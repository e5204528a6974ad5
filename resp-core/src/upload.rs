//! # Upload Validator
//!
//! Gatekeeps a selected recording before it is sent for inference.
//! Validation looks only at the file's name and size; the contents are
//! never read here.
//!
//! ## Rules (first failure wins)
//! 1. The extension after the last `.` of the lowercased name must be
//!    `wav` or `mp3`.
//! 2. The size must not exceed 25 MiB. A file of exactly 25 MiB passes.

use crate::error::UploadError;
use crate::format;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Audio container formats the inference service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

/// Lowercase extension → format.
static EXTENSIONS: Lazy<BTreeMap<&'static str, AudioFormat>> = Lazy::new(|| {
    BTreeMap::from([("wav", AudioFormat::Wav), ("mp3", AudioFormat::Mp3)])
});

impl AudioFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSIONS.get(extension.to_ascii_lowercase().as_str()).copied()
    }

    /// The MIME type sent with the multipart upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// A recording the user picked, described by name and size only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl AudioFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
        }
    }

    /// Describes a file on disk from its metadata.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(path, name, metadata.len()))
    }

    /// Size for the file details card, e.g. `"3.20 MB"`.
    pub fn size_label(&self) -> String {
        format!("{} MB", format::megabytes(self.size))
    }
}

/// Proof that a file passed validation. Only [`validate`] creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    file: AudioFile,
    format: AudioFormat,
}

impl AcceptedUpload {
    pub fn file(&self) -> &AudioFile {
        &self.file
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

/// Returns the lowercased text after the last `.`, if the name has one.
pub fn extension_of(name: &str) -> Option<String> {
    name.to_lowercase()
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_string())
}

/// Validates a picked file against the accepted formats and size limit.
pub fn validate(file: AudioFile) -> Result<AcceptedUpload, UploadError> {
    let extension = extension_of(&file.name);
    let format = extension
        .as_deref()
        .and_then(AudioFormat::from_extension)
        .ok_or_else(|| UploadError::UnsupportedFormat {
            extension: extension.clone(),
        })?;

    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadError::FileTooLarge {
            size: file.size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    tracing::debug!(name = %file.name, size = file.size, ?format, "upload accepted");
    Ok(AcceptedUpload { file, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> AudioFile {
        AudioFile::new(name, name, size)
    }

    #[test]
    fn size_at_limit_passes() {
        let accepted = validate(file("x.wav", MAX_UPLOAD_BYTES)).unwrap();
        assert_eq!(accepted.format(), AudioFormat::Wav);
    }

    #[test]
    fn size_over_limit_fails() {
        let err = validate(file("x.wav", MAX_UPLOAD_BYTES + 1)).unwrap_err();
        assert_eq!(
            err,
            UploadError::FileTooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES
            }
        );
        assert_eq!(err.to_string(), "File too large (max 25MB).");
    }

    #[test]
    fn mp4_is_unsupported() {
        let err = validate(file("x.mp4", 0)).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
        assert_eq!(err.to_string(), "Please upload a WAV or MP3 file.");
    }

    #[test]
    fn format_is_checked_before_size() {
        let err = validate(file("huge.flac", MAX_UPLOAD_BYTES * 4)).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_uses_last_dot_and_ignores_case() {
        assert_eq!(extension_of("a.b.wav").as_deref(), Some("wav"));
        assert_eq!(extension_of("BREATH.MP3").as_deref(), Some("mp3"));
        assert_eq!(extension_of("recording"), None);
        assert!(validate(file("a.b.WAV", 10)).is_ok());
        assert_eq!(
            validate(file("recording", 10)).unwrap_err(),
            UploadError::UnsupportedFormat { extension: None }
        );
        assert!(validate(file("trailing.", 10)).is_err());
    }

    #[test]
    fn outbound_mime_types() {
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }

    #[test]
    fn describes_file_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cough.wav");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let described = AudioFile::from_path(&path).unwrap();
        assert_eq!(described.name, "cough.wav");
        assert_eq!(described.size, 2048);
        assert!(AudioFile::from_path(dir.path()).is_err());
    }

    #[test]
    fn size_label_is_megabytes_with_two_decimals() {
        assert_eq!(file("x.wav", 3 * 1024 * 1024 + 512 * 1024).size_label(), "3.50 MB");
    }
}

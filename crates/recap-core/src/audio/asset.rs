//! Input validation and audio asset metadata.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// One loaded audio recording. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub duration_ms: u64,
    pub size_bytes: u64,
}

/// Validate an input path before any audio work happens.
///
/// Checks existence, extension against the supported format list, and that
/// the file is not empty. Returns the file size in bytes.
pub fn check_input(path: &Path, supported_formats: &[String]) -> Result<u64, PipelineError> {
    let input_error = |reason: String| PipelineError::Input {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_file() {
        return Err(input_error("file does not exist".to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    if !supported_formats.contains(&extension) {
        return Err(input_error(format!(
            "unsupported format '{}' (supported: {})",
            extension,
            supported_formats.join(", ")
        )));
    }

    let size_bytes = std::fs::metadata(path)
        .map_err(|e| input_error(format!("cannot read metadata: {e}")))?
        .len();
    if size_bytes == 0 {
        return Err(input_error("file is empty".to_string()));
    }

    Ok(size_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        vec![".mp3".to_string(), ".wav".to_string()]
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = check_input(Path::new("/nonexistent/meeting.mp3"), &formats()).unwrap_err();
        assert!(matches!(err, PipelineError::Input { .. }));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.ogg");
        std::fs::write(&path, b"data").unwrap();
        let err = check_input(&path, &formats()).unwrap_err();
        assert!(err.to_string().contains("unsupported format"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.mp3");
        std::fs::write(&path, b"").unwrap();
        let err = check_input(&path, &formats()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_valid_file_returns_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.MP3");
        std::fs::write(&path, b"audio bytes").unwrap();
        assert_eq!(check_input(&path, &formats()).unwrap(), 11);
    }
}

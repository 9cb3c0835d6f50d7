//! Environment-driven configuration.
//!
//! All knobs can be set through `RECAP_*` environment variables (a `.env`
//! file is honored). Unset or unparseable values fall back to the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default instruction block for summarization calls.
pub const DEFAULT_SUMMARY_PROMPT: &str = "Turn the following meeting content into structured minutes covering:\n\
1. Meeting topic\n\
2. Key discussion points\n\
3. Decisions made\n\
4. Follow-up action items\n\
\n\
Keep the minutes clear and concise, and highlight the important information.";

/// Runtime configuration for the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where transcript documents are written.
    pub output_dir: PathBuf,
    /// Where summary documents are written.
    pub summary_dir: PathBuf,
    /// Where chunk artifacts live while a run is in flight.
    pub temp_dir: PathBuf,
    /// Accepted input extensions (with leading dot).
    pub supported_formats: Vec<String>,
    /// Per-chunk size ceiling in MB; assets above it are split.
    pub max_file_size_mb: f64,
    /// Duration of each planned chunk, in minutes.
    pub chunk_minutes: u32,
    /// Fixed transcription language hint (ISO 639-1); `None` lets the
    /// service decide.
    pub language: Option<String>,
    /// Instruction block prepended to every summarization call.
    pub summary_prompt: String,
    /// Transcripts at or below this many characters are summarized in a
    /// single call.
    pub direct_summary_threshold: usize,
    /// Character budget of one summary segment when splitting is needed.
    pub segment_char_budget: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("transcripts"),
            summary_dir: PathBuf::from("summaries"),
            temp_dir: PathBuf::from("temp_chunks"),
            supported_formats: [".mp3", ".wav", ".m4a", ".flac"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size_mb: 25.0,
            chunk_minutes: 10,
            language: None,
            summary_prompt: DEFAULT_SUMMARY_PROMPT.to_string(),
            direct_summary_threshold: 2000,
            segment_char_budget: 1000,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut settings = Self::default();
        if let Some(dir) = env_var("RECAP_OUTPUT_DIR") {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var("RECAP_SUMMARY_DIR") {
            settings.summary_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var("RECAP_TEMP_DIR") {
            settings.temp_dir = PathBuf::from(dir);
        }
        if let Some(formats) = env_var("RECAP_FORMATS") {
            settings.supported_formats = formats
                .split(',')
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect();
        }
        if let Some(mb) = env_var("RECAP_MAX_FILE_SIZE_MB").and_then(|v| v.parse().ok()) {
            settings.max_file_size_mb = mb;
        }
        if let Some(minutes) = env_var("RECAP_CHUNK_MINUTES").and_then(|v| v.parse().ok()) {
            settings.chunk_minutes = minutes;
        }
        if let Some(language) = env_var("RECAP_LANGUAGE") {
            settings.language = Some(language);
        }
        if let Some(prompt) = env_var("RECAP_SUMMARY_PROMPT") {
            settings.summary_prompt = prompt;
        }
        if let Some(chars) = env_var("RECAP_DIRECT_SUMMARY_THRESHOLD").and_then(|v| v.parse().ok())
        {
            settings.direct_summary_threshold = chars;
        }
        if let Some(chars) = env_var("RECAP_SEGMENT_CHAR_BUDGET").and_then(|v| v.parse().ok()) {
            settings.segment_char_budget = chars;
        }
        settings
    }

    /// The per-chunk size ceiling in bytes.
    pub fn ceiling_bytes(&self) -> u64 {
        (self.max_file_size_mb * 1024.0 * 1024.0) as u64
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_limits() {
        let settings = Settings::default();
        assert_eq!(settings.max_file_size_mb, 25.0);
        assert_eq!(settings.ceiling_bytes(), 25 * 1024 * 1024);
        assert_eq!(settings.chunk_minutes, 10);
        assert!(settings.direct_summary_threshold > settings.segment_char_budget);
    }

    #[test]
    fn test_supported_formats_have_leading_dot() {
        let settings = Settings::default();
        assert!(settings.supported_formats.iter().all(|f| f.starts_with('.')));
    }
}

//! Remote service client boundary.
//!
//! The pipeline talks to two remote capabilities: speech-to-text and text
//! generation. Both live behind one [`SpeechClient`] trait so any vendor
//! backend can satisfy it, and so tests can substitute fakes. Clients are
//! constructed explicitly and passed into the processor; there is no shared
//! process-wide instance.

mod openai;

pub use openai::OpenAiClient;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Timeout for a single transcription upload.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Absolute upload ceiling imposed by the transcription service.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// One audio upload bound for speech-to-text.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio_data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub language: Option<String>,
    pub timeout: Duration,
}

/// One text-generation call bound for summarization.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A backend that turns speech into text and text into summaries.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Transcribe one audio blob to plain text.
    ///
    /// An empty transcript is an error; callers treat it the same as a
    /// failed remote call.
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String>;

    /// Generate a summary for the prompt pair in `request`.
    async fn summarize(&self, request: SummaryRequest) -> Result<String>;
}

//! OpenAI-backed implementation of the speech/summary client.
//!
//! Transcription goes through the Whisper transcriptions endpoint as a
//! multipart form upload; summarization goes through the chat completions
//! endpoint. Request and response shapes follow the OpenAI API format:
//! - Multipart form with `model` and `file` fields, plain-text response
//! - JSON chat body with system/user messages, bearer auth
//! - Non-2xx responses surface the status and body text

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{SpeechClient, SummaryRequest, TranscriptionRequest};

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const TRANSCRIPTION_MODEL: &str = "whisper-1";
const CHAT_MODEL: &str = "gpt-4";

/// Timeout for one chat completion call.
const SUMMARY_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Client for the OpenAI transcription and chat completion APIs.
///
/// Owns its HTTP client for connection pooling across the sequential calls
/// of one run.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            anyhow::bail!("OpenAI API key is empty. Set OPENAI_API_KEY.");
        }
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl SpeechClient for OpenAiClient {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String> {
        let mut form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL.to_string())
            .text("response_format", "text")
            .part(
                "file",
                reqwest::multipart::Part::bytes(request.audio_data)
                    .file_name(request.filename)
                    .mime_str(&request.mime_type)?,
            );

        if let Some(lang) = request.language {
            form = form.text("language", lang);
        }

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .timeout(request.timeout)
            .send()
            .await
            .context("Failed to send transcription request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Transcription API error ({status}): {error_text}");
        }

        // response_format=text returns the transcript as the response body
        let text = response
            .text()
            .await
            .context("Failed to read transcription response")?;
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("Transcription API returned an empty transcript");
        }
        Ok(text.to_string())
    }

    async fn summarize(&self, request: SummaryRequest) -> Result<String> {
        let response = self
            .client
            .post(CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": CHAT_MODEL,
                "messages": [
                    {"role": "system", "content": request.system_prompt},
                    {"role": "user", "content": request.user_prompt}
                ],
                "temperature": request.temperature,
                "max_tokens": request.max_tokens
            }))
            .timeout(std::time::Duration::from_secs(SUMMARY_TIMEOUT_SECS))
            .send()
            .await
            .context("Failed to send summarization request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Chat API error ({status}): {error_text}");
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat response")?;
        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            anyhow::bail!("Chat API returned an empty summary");
        }
        Ok(content)
    }
}

//! Hierarchical summarization over one transcript.
//!
//! A transcript short enough for one call is summarized directly. Anything
//! longer is segmented, each segment summarized independently (a failed
//! segment is skipped), and the surviving segment summaries are unified by
//! one final reduction call with its own prompt framing. The two-tier shape
//! exists because a single call has a token ceiling; summarizing summaries
//! trades some quality for bounded calls.

use tracing::{info, warn};

use crate::error::PipelineError;
use crate::provider::{SpeechClient, SummaryRequest};

use super::segment::segment_lines;

const SYSTEM_PROMPT: &str = "You are a professional meeting-minutes writer. \
Summarize meeting content accurately and objectively.";

const REDUCE_SYSTEM_PROMPT: &str = "You are a professional meeting-minutes writer. \
You will be given several partial summaries of one meeting; unify them into \
a single coherent set of minutes.";

const TEMPERATURE: f32 = 0.7;
const SEGMENT_MAX_TOKENS: u32 = 300;
const FINAL_MAX_TOKENS: u32 = 800;

/// Thresholds and prompt for one summarization run.
///
/// The direct threshold and the per-segment budget are independent knobs;
/// no relationship between them is assumed.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub user_prompt: String,
    pub direct_threshold: usize,
    pub segment_char_budget: usize,
}

/// Drives the direct/segmented summarization of transcripts.
pub struct Summarizer<'a> {
    client: &'a dyn SpeechClient,
    config: SummarizerConfig,
}

impl<'a> Summarizer<'a> {
    pub fn new(client: &'a dyn SpeechClient, config: SummarizerConfig) -> Self {
        Self { client, config }
    }

    /// Produce the final summary for `transcript`.
    pub async fn summarize(&self, transcript: &str) -> Result<String, PipelineError> {
        if transcript.chars().count() <= self.config.direct_threshold {
            return self
                .call(
                    SYSTEM_PROMPT,
                    format!(
                        "{}\n\nMeeting content:\n{transcript}",
                        self.config.user_prompt
                    ),
                    FINAL_MAX_TOKENS,
                )
                .await
                .map_err(|cause| PipelineError::Remote {
                    operation: "summarization",
                    cause,
                });
        }

        let segments = segment_lines(transcript, self.config.segment_char_budget);
        info!(
            segments = segments.len(),
            "transcript over direct threshold, summarizing in segments"
        );

        let mut segment_summaries = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            let prompt = format!(
                "{}\n\nMeeting content:\n{segment}",
                self.config.user_prompt
            );
            match self.call(SYSTEM_PROMPT, prompt, SEGMENT_MAX_TOKENS).await {
                Ok(summary) => {
                    info!(segment = index + 1, total = segments.len(), "segment summarized");
                    segment_summaries.push(summary);
                }
                Err(err) => warn!(
                    segment = index + 1,
                    total = segments.len(),
                    error = %err,
                    "segment summarization failed, skipping"
                ),
            }
        }

        if segment_summaries.is_empty() {
            return Err(PipelineError::NoSegmentSummaries);
        }

        let combined = segment_summaries.join("\n\n");
        self.call(
            REDUCE_SYSTEM_PROMPT,
            format!(
                "{}\n\nPartial summaries:\n{combined}",
                self.config.user_prompt
            ),
            FINAL_MAX_TOKENS,
        )
        .await
        .map_err(|cause| PipelineError::Remote {
            operation: "final summarization",
            cause,
        })
    }

    async fn call(
        &self,
        system_prompt: &str,
        user_prompt: String,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        self.client
            .summarize(SummaryRequest {
                system_prompt: system_prompt.to_string(),
                user_prompt,
                temperature: TEMPERATURE,
                max_tokens,
            })
            .await
    }
}

//! End-to-end processing of one audio asset.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::audio::{AudioAsset, AudioEncoder, ChunkPlan, check_input, plan_chunks};
use crate::error::PipelineError;
use crate::provider::{DEFAULT_TIMEOUT_SECS, SpeechClient};
use crate::settings::Settings;
use crate::summary::{Summarizer, SummarizerConfig};
use crate::transcription::{TranscribeOptions, merge_fragments, transcribe_plan};

/// What one successful run produced.
#[derive(Debug)]
pub struct ProcessReport {
    pub transcript_path: PathBuf,
    pub summary_path: PathBuf,
    pub chunks_attempted: usize,
    pub chunks_transcribed: usize,
    /// Chunks whose audio was lost to the size ceiling. A non-zero count
    /// means the transcript has silent gaps.
    pub chunks_dropped: usize,
}

/// Owns one run's collaborators and drives an asset through transcription
/// and summarization.
///
/// The service client and encoder are injected at construction so callers
/// (and tests) choose the backends explicitly.
pub struct AssetProcessor {
    settings: Settings,
    client: Arc<dyn SpeechClient>,
    encoder: Box<dyn AudioEncoder>,
}

impl AssetProcessor {
    pub fn new(
        settings: Settings,
        client: Arc<dyn SpeechClient>,
        encoder: Box<dyn AudioEncoder>,
    ) -> Result<Self, PipelineError> {
        for dir in [
            &settings.output_dir,
            &settings.summary_dir,
            &settings.temp_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            settings,
            client,
            encoder,
        })
    }

    /// Process one recording end to end.
    ///
    /// On success both the transcript document and the summary document
    /// exist under their configured directories, keyed by the source base
    /// name and overwriting earlier runs. On failure neither file is
    /// written.
    pub async fn process_asset(&self, path: &Path) -> Result<ProcessReport, PipelineError> {
        let started = Instant::now();
        info!(path = %path.display(), "processing audio asset");

        let size_bytes = check_input(path, &self.settings.supported_formats)?;
        let duration_ms =
            self.encoder
                .probe_duration_ms(path)
                .map_err(|err| PipelineError::Input {
                    path: path.to_path_buf(),
                    reason: format!("unreadable as audio: {err}"),
                })?;
        let asset = AudioAsset {
            path: path.to_path_buf(),
            duration_ms,
            size_bytes,
        };

        let plan = plan_chunks(
            &asset,
            self.settings.max_file_size_mb,
            self.settings.chunk_minutes,
        );
        let size_mb = size_bytes as f64 / 1024.0 / 1024.0;
        match &plan {
            ChunkPlan::Single => {
                info!(size_mb, "asset fits under the ceiling, transcribing whole")
            }
            ChunkPlan::Split(descriptors) => info!(
                size_mb,
                chunks = descriptors.len(),
                bitrate_kbps = descriptors.first().map(|d| d.bitrate_kbps).unwrap_or(0),
                "asset over the ceiling, splitting"
            ),
        }

        let outcome = transcribe_plan(
            self.client.as_ref(),
            self.encoder.as_ref(),
            &asset,
            &plan,
            &TranscribeOptions {
                temp_dir: self.settings.temp_dir.clone(),
                ceiling_bytes: self.settings.ceiling_bytes(),
                language: self.settings.language.clone(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        )
        .await;

        let chunks_transcribed = outcome.fragments.len();
        let chunks_attempted = outcome.chunks_attempted;
        let chunks_dropped = outcome.chunks_dropped;
        let transcript =
            merge_fragments(outcome.fragments).ok_or_else(|| PipelineError::NoFragments {
                path: path.to_path_buf(),
            })?;
        if chunks_transcribed < chunks_attempted {
            warn!(
                transcribed = chunks_transcribed,
                attempted = chunks_attempted,
                dropped = chunks_dropped,
                "proceeding with a partial transcript"
            );
        }

        let summarizer = Summarizer::new(
            self.client.as_ref(),
            SummarizerConfig {
                user_prompt: self.settings.summary_prompt.clone(),
                direct_threshold: self.settings.direct_summary_threshold,
                segment_char_budget: self.settings.segment_char_budget,
            },
        );
        let summary = summarizer.summarize(&transcript).await?;

        let (transcript_path, summary_path) = self.persist(path, &transcript, &summary)?;
        info!(
            path = %path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            transcript = %transcript_path.display(),
            summary = %summary_path.display(),
            "asset processed"
        );
        Ok(ProcessReport {
            transcript_path,
            summary_path,
            chunks_attempted,
            chunks_transcribed,
            chunks_dropped,
        })
    }

    /// Write both documents, or neither.
    fn persist(
        &self,
        path: &Path,
        transcript: &str,
        summary: &str,
    ) -> Result<(PathBuf, PathBuf), PipelineError> {
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let transcript_path = self
            .settings
            .output_dir
            .join(format!("{base}_transcript.txt"));
        let summary_path = self.settings.summary_dir.join(format!("{base}_summary.txt"));

        std::fs::write(&transcript_path, transcript)?;
        if let Err(err) = std::fs::write(&summary_path, summary) {
            // Do not leave a transcript behind without its summary.
            let _ = std::fs::remove_file(&transcript_path);
            return Err(err.into());
        }

        Ok((transcript_path, summary_path))
    }
}

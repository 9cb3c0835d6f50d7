//! Sequential chunk transcription with partial-failure tolerance.
//!
//! Chunks are processed strictly one at a time: encode, upload, delete the
//! artifact, move on. A failed chunk costs its own transcript and nothing
//! else; the run only fails outright when every chunk failed, which the
//! caller detects from an empty fragment set. At most one chunk artifact
//! exists on disk at any moment.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::audio::{AudioAsset, AudioEncoder, ChunkDescriptor, ChunkOutcome, ChunkPlan, realize_chunk};
use crate::provider::{MAX_UPLOAD_BYTES, SpeechClient, TranscriptionRequest};

use super::merge::TranscriptFragment;

/// Knobs for one transcription run.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Directory holding in-flight chunk artifacts.
    pub temp_dir: PathBuf,
    /// Per-chunk size ceiling in bytes.
    pub ceiling_bytes: u64,
    /// Fixed language hint forwarded to the service.
    pub language: Option<String>,
    /// Timeout for each transcription upload.
    pub timeout: Duration,
}

/// What the chunk loop produced.
#[derive(Debug, Default)]
pub struct TranscriptionOutcome {
    pub fragments: Vec<TranscriptFragment>,
    pub chunks_attempted: usize,
    pub chunks_dropped: usize,
}

/// Run a chunk plan through the transcription service.
pub async fn transcribe_plan(
    client: &dyn SpeechClient,
    encoder: &dyn AudioEncoder,
    asset: &AudioAsset,
    plan: &ChunkPlan,
    options: &TranscribeOptions,
) -> TranscriptionOutcome {
    match plan {
        ChunkPlan::Single => transcribe_whole(client, asset, options).await,
        ChunkPlan::Split(descriptors) => {
            transcribe_chunks(client, encoder, asset, descriptors, options).await
        }
    }
}

/// Upload the whole asset as a cohort of one.
async fn transcribe_whole(
    client: &dyn SpeechClient,
    asset: &AudioAsset,
    options: &TranscribeOptions,
) -> TranscriptionOutcome {
    let mut outcome = TranscriptionOutcome {
        chunks_attempted: 1,
        ..Default::default()
    };
    match attempt(client, &asset.path, mime_for(&asset.path), options).await {
        Ok(text) => outcome.fragments.push(TranscriptFragment { ordinal: 1, text }),
        Err(err) => warn!(
            path = %asset.path.display(),
            error = %err,
            "transcription failed"
        ),
    }
    outcome
}

/// Encode and upload each chunk in order, deleting every artifact after its
/// attempt regardless of the result.
async fn transcribe_chunks(
    client: &dyn SpeechClient,
    encoder: &dyn AudioEncoder,
    asset: &AudioAsset,
    descriptors: &[ChunkDescriptor],
    options: &TranscribeOptions,
) -> TranscriptionOutcome {
    let mut outcome = TranscriptionOutcome {
        chunks_attempted: descriptors.len(),
        ..Default::default()
    };
    let base = asset
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let total = descriptors.len();

    for descriptor in descriptors {
        let artifact = options
            .temp_dir
            .join(format!("{base}_part{}.mp3", descriptor.ordinal));

        match realize_chunk(
            encoder,
            &asset.path,
            descriptor,
            options.ceiling_bytes,
            &artifact,
        ) {
            ChunkOutcome::Accepted { encoded_bytes } => {
                info!(
                    chunk = descriptor.ordinal,
                    total, encoded_bytes, "chunk encoded"
                );
                match attempt(client, &artifact, "audio/mpeg", options).await {
                    Ok(text) => outcome.fragments.push(TranscriptFragment {
                        ordinal: descriptor.ordinal,
                        text,
                    }),
                    Err(err) => warn!(
                        chunk = descriptor.ordinal,
                        total,
                        error = %err,
                        "chunk transcription failed, continuing"
                    ),
                }
                // No artifact may outlive its transcription attempt.
                let _ = std::fs::remove_file(&artifact);
            }
            ChunkOutcome::Dropped => outcome.chunks_dropped += 1,
            ChunkOutcome::Failed(err) => warn!(
                chunk = descriptor.ordinal,
                total,
                error = %err,
                "chunk encoding failed, continuing"
            ),
        }
    }

    outcome
}

/// One bounded transcription attempt for the artifact at `path`.
async fn attempt(
    client: &dyn SpeechClient,
    path: &Path,
    mime_type: &str,
    options: &TranscribeOptions,
) -> Result<String> {
    let audio_data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if audio_data.len() as u64 > MAX_UPLOAD_BYTES {
        anyhow::bail!(
            "{} is {:.2} MB, over the {} MB service limit",
            path.display(),
            audio_data.len() as f64 / 1024.0 / 1024.0,
            MAX_UPLOAD_BYTES / 1024 / 1024
        );
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let started = Instant::now();
    let text = client
        .transcribe(TranscriptionRequest {
            audio_data,
            filename,
            mime_type: mime_type.to_string(),
            language: options.language.clone(),
            timeout: options.timeout,
        })
        .await?;
    info!(
        path = %path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "transcribed"
    );
    Ok(text)
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::ops::Range;
    use std::sync::Mutex;

    /// Client whose transcribe calls succeed or fail per a script.
    struct FakeClient {
        responses: Mutex<Vec<Option<String>>>,
        requests: Mutex<Vec<TranscriptionRequest>>,
    }

    impl FakeClient {
        fn scripted(responses: Vec<Option<&str>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(|s| s.to_string()))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpeechClient for FakeClient {
        async fn transcribe(&self, request: TranscriptionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            match self.responses.lock().unwrap().remove(0) {
                Some(text) => Ok(text),
                None => anyhow::bail!("service error"),
            }
        }

        async fn summarize(&self, _request: crate::provider::SummaryRequest) -> Result<String> {
            unreachable!("orchestrator never summarizes")
        }
    }

    /// Encoder writing fixed-size artifacts, with one optional oversized ordinal.
    struct FakeEncoder {
        oversized_range_start: Option<u64>,
    }

    impl AudioEncoder for FakeEncoder {
        fn probe_duration_ms(&self, _src: &Path) -> Result<u64> {
            Ok(0)
        }

        fn export_range(
            &self,
            _src: &Path,
            range_ms: Range<u64>,
            _bitrate_kbps: u32,
            dest: &Path,
        ) -> Result<()> {
            let size = if self.oversized_range_start == Some(range_ms.start) {
                10_000
            } else {
                64
            };
            std::fs::write(dest, vec![0u8; size])?;
            Ok(())
        }
    }

    fn options(temp_dir: &Path) -> TranscribeOptions {
        TranscribeOptions {
            temp_dir: temp_dir.to_path_buf(),
            ceiling_bytes: 1000,
            language: Some("en".to_string()),
            timeout: Duration::from_secs(300),
        }
    }

    fn descriptors(count: u64) -> Vec<ChunkDescriptor> {
        (0..count)
            .map(|i| ChunkDescriptor {
                ordinal: i as usize + 1,
                start_ms: i * 1000,
                end_ms: (i + 1) * 1000,
                bitrate_kbps: 64,
            })
            .collect()
    }

    fn asset_in(dir: &Path) -> AudioAsset {
        let path = dir.join("meeting.mp3");
        std::fs::write(&path, b"mp3 bytes").unwrap();
        AudioAsset {
            path,
            duration_ms: 3000,
            size_bytes: 9,
        }
    }

    #[tokio::test]
    async fn test_single_plan_uploads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        let client = FakeClient::scripted(vec![Some("full transcript")]);
        let outcome = transcribe_plan(
            &client,
            &FakeEncoder {
                oversized_range_start: None,
            },
            &asset,
            &ChunkPlan::Single,
            &options(dir.path()),
        )
        .await;

        assert_eq!(outcome.fragments.len(), 1);
        assert_eq!(outcome.fragments[0].ordinal, 1);
        assert_eq!(outcome.fragments[0].text, "full transcript");
        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].filename, "meeting.mp3");
        assert_eq!(requests[0].mime_type, "audio/mpeg");
        assert_eq!(requests[0].language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_failed_chunk_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        let client = FakeClient::scripted(vec![Some("one"), None, Some("three")]);
        let outcome = transcribe_plan(
            &client,
            &FakeEncoder {
                oversized_range_start: None,
            },
            &asset,
            &ChunkPlan::Split(descriptors(3)),
            &options(temp.path()),
        )
        .await;

        assert_eq!(outcome.chunks_attempted, 3);
        let ordinals: Vec<usize> = outcome.fragments.iter().map(|f| f.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_artifacts_never_outlive_their_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        let client = FakeClient::scripted(vec![Some("one"), None]);
        transcribe_plan(
            &client,
            &FakeEncoder {
                oversized_range_start: None,
            },
            &asset,
            &ChunkPlan::Split(descriptors(2)),
            &options(temp.path()),
        )
        .await;

        let leftovers: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "temp dir must be clean after the run");
    }

    #[tokio::test]
    async fn test_oversized_chunk_is_dropped_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        // chunk 2 stays oversized even at the floor bitrate
        let client = FakeClient::scripted(vec![Some("one"), Some("three")]);
        let outcome = transcribe_plan(
            &client,
            &FakeEncoder {
                oversized_range_start: Some(1000),
            },
            &asset,
            &ChunkPlan::Split(descriptors(3)),
            &options(temp.path()),
        )
        .await;

        assert_eq!(outcome.chunks_dropped, 1);
        let ordinals: Vec<usize> = outcome.fragments.iter().map(|f| f.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_cohort() {
        let dir = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        let client = FakeClient::scripted(vec![None, None]);
        let outcome = transcribe_plan(
            &client,
            &FakeEncoder {
                oversized_range_start: None,
            },
            &asset,
            &ChunkPlan::Split(descriptors(2)),
            &options(temp.path()),
        )
        .await;

        assert!(outcome.fragments.is_empty());
        assert_eq!(outcome.chunks_attempted, 2);
    }
}

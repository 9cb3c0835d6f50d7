//! Chunk planning and size-ceiling adaptation for oversized assets.
//!
//! An asset over the size ceiling is cut into fixed-duration chunks encoded
//! at a bitrate derived from the ceiling. Each chunk then runs through a
//! small state machine: encode, check the resulting size, re-encode at the
//! floor bitrate if still over, and drop the chunk if even that does not
//! fit. Dropping loses that time range's audio but lets the rest of the
//! asset proceed.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use super::asset::AudioAsset;
use super::encoder::AudioEncoder;

/// Floor bitrate; output below this stops being intelligible.
pub const MIN_BITRATE_KBPS: u32 = 32;
/// Ceiling bitrate; anything above is wasted on speech.
pub const MAX_BITRATE_KBPS: u32 = 192;

/// One planned slice of an asset. Ordinals are 1-based and define merge
/// order; descriptors are never mutated after planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub ordinal: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub bitrate_kbps: u32,
}

/// Outcome of planning one asset against the size ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPlan {
    /// Asset fits under the ceiling; transcribe it whole.
    Single,
    /// Asset must be split into the given ordered descriptors.
    Split(Vec<ChunkDescriptor>),
}

/// Terminal state of one chunk's encode attempt.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The encoded artifact fits under the ceiling and is ready to upload.
    Accepted { encoded_bytes: u64 },
    /// Still over the ceiling at the floor bitrate; the time range is lost.
    Dropped,
    /// The encode/export step itself failed.
    Failed(anyhow::Error),
}

/// Derive the target bitrate for chunk encoding.
///
/// Budget is 80% of the ceiling spread over one chunk's duration; the
/// remaining 20% absorbs container and encoding overhead.
pub fn derive_bitrate(max_size_mb: f64, chunk_minutes: u32) -> u32 {
    let chunk_minutes = chunk_minutes.max(1);
    let target_mb = max_size_mb * 0.8;
    let kbps = (target_mb * 1024.0 * 8.0) / (chunk_minutes as f64 * 60.0);
    (kbps as u32).clamp(MIN_BITRATE_KBPS, MAX_BITRATE_KBPS)
}

/// Decide whether `asset` needs splitting and plan the chunks if so.
///
/// Chunk ranges are half-open `[start, end)` and partition the asset's
/// duration without gaps or overlaps; the last chunk is truncated to the
/// total duration.
pub fn plan_chunks(asset: &AudioAsset, max_size_mb: f64, chunk_minutes: u32) -> ChunkPlan {
    let ceiling_bytes = (max_size_mb * 1024.0 * 1024.0) as u64;
    if asset.size_bytes <= ceiling_bytes {
        return ChunkPlan::Single;
    }

    let chunk_ms = u64::from(chunk_minutes.max(1)) * 60 * 1000;
    let bitrate_kbps = derive_bitrate(max_size_mb, chunk_minutes);
    let count = asset.duration_ms.div_ceil(chunk_ms);

    let descriptors = (0..count)
        .map(|i| ChunkDescriptor {
            ordinal: i as usize + 1,
            start_ms: i * chunk_ms,
            end_ms: ((i + 1) * chunk_ms).min(asset.duration_ms),
            bitrate_kbps,
        })
        .collect();
    ChunkPlan::Split(descriptors)
}

/// Drive one descriptor through encode, size check, and floor-bitrate retry.
///
/// Invariant: a `Dropped` or `Failed` outcome leaves no artifact at `dest`.
pub fn realize_chunk(
    encoder: &dyn AudioEncoder,
    src: &Path,
    descriptor: &ChunkDescriptor,
    ceiling_bytes: u64,
    dest: &Path,
) -> ChunkOutcome {
    let range = descriptor.start_ms..descriptor.end_ms;

    match export_and_measure(encoder, src, range.clone(), descriptor.bitrate_kbps, dest) {
        Ok(encoded_bytes) if encoded_bytes <= ceiling_bytes => {
            return ChunkOutcome::Accepted { encoded_bytes };
        }
        Ok(encoded_bytes) => {
            warn!(
                ordinal = descriptor.ordinal,
                encoded_bytes, "chunk over size ceiling, re-encoding at floor bitrate"
            );
        }
        Err(err) => {
            let _ = std::fs::remove_file(dest);
            return ChunkOutcome::Failed(err);
        }
    }

    let _ = std::fs::remove_file(dest);
    match export_and_measure(encoder, src, range, MIN_BITRATE_KBPS, dest) {
        Ok(encoded_bytes) if encoded_bytes <= ceiling_bytes => {
            ChunkOutcome::Accepted { encoded_bytes }
        }
        Ok(encoded_bytes) => {
            warn!(
                ordinal = descriptor.ordinal,
                encoded_bytes, "chunk still over size ceiling at floor bitrate, dropping"
            );
            let _ = std::fs::remove_file(dest);
            ChunkOutcome::Dropped
        }
        Err(err) => {
            let _ = std::fs::remove_file(dest);
            ChunkOutcome::Failed(err)
        }
    }
}

fn export_and_measure(
    encoder: &dyn AudioEncoder,
    src: &Path,
    range_ms: std::ops::Range<u64>,
    bitrate_kbps: u32,
    dest: &Path,
) -> Result<u64> {
    encoder.export_range(src, range_ms, bitrate_kbps, dest)?;
    Ok(std::fs::metadata(dest)?.len())
}

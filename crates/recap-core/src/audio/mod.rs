//! Audio asset probing, encoding, and chunk planning.

mod asset;
mod chunker;
mod encoder;

pub use asset::{AudioAsset, check_input};
pub use chunker::{
    ChunkDescriptor, ChunkOutcome, ChunkPlan, MAX_BITRATE_KBPS, MIN_BITRATE_KBPS, derive_bitrate,
    plan_chunks, realize_chunk,
};
pub use encoder::{AudioEncoder, FfmpegEncoder};

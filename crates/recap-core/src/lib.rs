pub mod audio;
pub mod error;
pub mod processor;
pub mod provider;
pub mod settings;
pub mod summary;
pub mod transcription;

pub use audio::{AudioAsset, AudioEncoder, ChunkDescriptor, ChunkPlan, FfmpegEncoder};
pub use error::PipelineError;
pub use processor::{AssetProcessor, ProcessReport};
pub use provider::{
    DEFAULT_TIMEOUT_SECS, MAX_UPLOAD_BYTES, OpenAiClient, SpeechClient, SummaryRequest,
    TranscriptionRequest,
};
pub use settings::Settings;

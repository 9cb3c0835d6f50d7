//! Two-tier (map-reduce) summarization of merged transcripts.

mod segment;
mod summarizer;

pub use segment::segment_lines;
pub use summarizer::{Summarizer, SummarizerConfig};

//! The `recap process` command: run assets through the pipeline.

use anyhow::Result;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use recap_core::{AssetProcessor, FfmpegEncoder, OpenAiClient, Settings};

use crate::app;

pub async fn run(paths: Vec<PathBuf>) -> Result<()> {
    app::ensure_ffmpeg_installed();
    let api_key = app::load_api_key();

    let settings = Settings::from_env();
    let client = Arc::new(OpenAiClient::new(api_key)?);
    let processor = AssetProcessor::new(settings, client, Box::new(FfmpegEncoder::new()))?;

    let total = paths.len();
    let mut failures = 0usize;
    for path in &paths {
        match processor.process_asset(path).await {
            Ok(report) => {
                println!("{} {}", style("ok").green().bold(), path.display());
                println!("   transcript: {}", report.transcript_path.display());
                println!("   summary:    {}", report.summary_path.display());
                if report.chunks_dropped > 0 {
                    println!(
                        "   {} {} chunk(s) dropped for size; the transcript has gaps",
                        style("warning:").yellow(),
                        report.chunks_dropped
                    );
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{} {}: {err}", style("failed").red().bold(), path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {total} file(s) failed");
    }
    Ok(())
}

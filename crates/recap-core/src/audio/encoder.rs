//! Audio export boundary, backed by the ffmpeg CLI.

use anyhow::{Context, Result};
use std::ops::Range;
use std::path::Path;
use std::process::Command;

/// Probes source assets and exports time ranges as mono MP3.
///
/// All audio I/O of the pipeline goes through this trait; the planner and
/// orchestrator never touch samples themselves. Tests substitute fakes.
pub trait AudioEncoder: Send + Sync {
    /// Total duration of the asset at `src`, in milliseconds.
    fn probe_duration_ms(&self, src: &Path) -> Result<u64>;

    /// Encode `range_ms` of `src` to `dest` at `bitrate_kbps`, downmixed to
    /// mono.
    fn export_range(
        &self,
        src: &Path,
        range_ms: Range<u64>,
        bitrate_kbps: u32,
        dest: &Path,
    ) -> Result<()>;
}

/// Production encoder shelling out to ffmpeg/ffprobe.
#[derive(Debug, Default, Clone)]
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Check that ffmpeg is on PATH before a run starts.
    pub fn ensure_available() -> Result<()> {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .context("Failed to execute ffmpeg. Make sure ffmpeg is installed and in PATH.")?;
        Ok(())
    }
}

impl AudioEncoder for FfmpegEncoder {
    fn probe_duration_ms(&self, src: &Path) -> Result<u64> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(src)
            .output()
            .context("Failed to execute ffprobe. Make sure ffmpeg is installed.")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffprobe failed for {}: {stderr}", src.display());
        }

        let seconds: f64 = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .with_context(|| format!("ffprobe returned no duration for {}", src.display()))?;
        Ok((seconds * 1000.0) as u64)
    }

    fn export_range(
        &self,
        src: &Path,
        range_ms: Range<u64>,
        bitrate_kbps: u32,
        dest: &Path,
    ) -> Result<()> {
        let start = format_seconds(range_ms.start);
        let duration = format_seconds(range_ms.end.saturating_sub(range_ms.start));

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-ss", &start, "-t", &duration])
            .arg("-i")
            .arg(src)
            .args(["-codec:a", "libmp3lame"])
            .args(["-b:a", &format!("{bitrate_kbps}k")])
            .args(["-ac", "1"])
            .arg("-y")
            .arg(dest)
            .output()
            .context("Failed to execute ffmpeg. Make sure ffmpeg is installed.")?;

        if !output.status.success() {
            let _ = std::fs::remove_file(dest);
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("FFmpeg export failed: {stderr}");
        }

        Ok(())
    }
}

fn format_seconds(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0.000");
        assert_eq!(format_seconds(1500), "1.500");
        assert_eq!(format_seconds(600_042), "600.042");
    }
}

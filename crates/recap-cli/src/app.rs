use recap_core::FfmpegEncoder;

/// Exit early with installation guidance when ffmpeg is missing.
pub fn ensure_ffmpeg_installed() {
    if FfmpegEncoder::ensure_available().is_err() {
        eprintln!("Error: FFmpeg is not installed or not in PATH.");
        eprintln!("\nrecap requires FFmpeg for audio probing and chunk encoding.");
        eprintln!("Please install FFmpeg:");
        eprintln!("  - Ubuntu/Debian: sudo apt install ffmpeg");
        eprintln!("  - macOS: brew install ffmpeg");
        eprintln!("  - Or visit: https://ffmpeg.org/download.html\n");
        std::process::exit(1);
    }
}

/// Read the OpenAI API key, exiting with guidance when it is not set.
pub fn load_api_key() -> String {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: No OpenAI API key configured.");
            eprintln!("\nSet the OPENAI_API_KEY environment variable (a .env file works too).");
            std::process::exit(1);
        }
    }
}

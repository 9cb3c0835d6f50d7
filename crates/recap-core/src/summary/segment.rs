//! Line-preserving segmentation of long transcripts.

/// Partition transcript lines into maximal runs of at most `char_budget`
/// characters.
///
/// Lines are never split across segments; a single line longer than the
/// budget forms its own one-line segment. Budgets count Unicode scalar
/// values, not bytes, since transcripts are frequently CJK text.
pub fn segment_lines(transcript: &str, char_budget: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for line in transcript.lines() {
        let line_chars = line.chars().count();
        if current_chars > 0 && current_chars + line_chars > char_budget {
            segments.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push_str(line);
        current.push('\n');
        current_chars += line_chars;
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

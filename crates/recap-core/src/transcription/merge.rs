//! Ordered merging of per-chunk transcript fragments.

/// Transcript text produced from one chunk, keyed by its 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub ordinal: usize,
    pub text: String,
}

/// Merge fragments into one transcript, ordered by ordinal.
///
/// Fragments may arrive in any order; the ordinal alone decides placement.
/// Returns `None` when no fragments survived transcription.
pub fn merge_fragments(mut fragments: Vec<TranscriptFragment>) -> Option<String> {
    if fragments.is_empty() {
        return None;
    }
    fragments.sort_by_key(|f| f.ordinal);
    Some(
        fragments
            .iter()
            .map(|f| f.text.trim())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(ordinal: usize, text: &str) -> TranscriptFragment {
        TranscriptFragment {
            ordinal,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_input_yields_no_transcript() {
        assert_eq!(merge_fragments(Vec::new()), None);
    }

    #[test]
    fn test_merge_is_order_preserving() {
        let merged = merge_fragments(vec![fragment(2, "b"), fragment(1, "a")]);
        assert_eq!(merged.as_deref(), Some("a b"));
    }

    #[test]
    fn test_merge_skips_missing_ordinals() {
        // chunk 2 failed; 1 and 3 still merge in order
        let merged = merge_fragments(vec![fragment(3, "end"), fragment(1, "start")]);
        assert_eq!(merged.as_deref(), Some("start end"));
    }

    #[test]
    fn test_merge_trims_fragment_whitespace() {
        let merged = merge_fragments(vec![fragment(1, "  hello \n"), fragment(2, " world ")]);
        assert_eq!(merged.as_deref(), Some("hello world"));
    }
}

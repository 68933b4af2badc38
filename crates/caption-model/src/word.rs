//! Timestamped words.

use serde::{Deserialize, Serialize};

/// A single transcribed word with its timing.
///
/// Produced by an external transcriber and never mutated afterwards.
/// Sequences are ordered non-decreasing by `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    /// Word text. Accepts `word` as an alternate key in JSON input.
    #[serde(alias = "word")]
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl WordTimestamp {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Duration in seconds (never negative).
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Normalized copy of this word, or `None` if nothing printable remains.
    pub fn normalized(&self) -> Option<WordTimestamp> {
        let text = normalize_word(&self.text);
        if text.is_empty() {
            return None;
        }
        Some(WordTimestamp {
            text,
            start: self.start,
            end: self.end.max(self.start),
        })
    }
}

/// Strip leading/trailing punctuation and whitespace, then upper-case.
///
/// Interior punctuation survives, so contractions keep their apostrophe.
pub fn normalize_word(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || is_edge_punctuation(c))
        .to_uppercase()
}

/// Normalize a whole sequence, dropping words that end up empty.
///
/// Must run before grouping: pixel widths depend on the final glyphs.
pub fn normalize_words(words: &[WordTimestamp]) -> Vec<WordTimestamp> {
    words.iter().filter_map(WordTimestamp::normalized).collect()
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2026}' | '\u{00BF}' | '\u{00A1}'
        )
}

/// Parse a JSON array of words.
pub fn parse_words(json: &str) -> Result<Vec<WordTimestamp>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_edges_and_uppercases() {
        assert_eq!(normalize_word("hello,"), "HELLO");
        assert_eq!(normalize_word("  \"Wow!\" "), "WOW");
        assert_eq!(normalize_word("don't"), "DON'T");
        assert_eq!(normalize_word("\u{201C}quoted\u{201D}"), "QUOTED");
        assert_eq!(normalize_word("wait\u{2026}"), "WAIT");
    }

    #[test]
    fn test_normalize_words_drops_empty() {
        let words = vec![
            WordTimestamp::new("Hi", 0.0, 0.2),
            WordTimestamp::new("...", 0.2, 0.3),
            WordTimestamp::new("   ", 0.3, 0.4),
            WordTimestamp::new("there.", 0.4, 0.6),
        ];
        let normalized = normalize_words(&words);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].text, "HI");
        assert_eq!(normalized[1].text, "THERE");
        assert_eq!(normalized[1].start, 0.4);
    }

    #[test]
    fn test_parse_accepts_word_alias_and_extra_fields() {
        let json = r#"[
            {"word": "hello", "start_offset": 0, "end_offset": 5, "start": 0.0, "end": 0.4},
            {"text": "world", "start": 0.4, "end": 0.9}
        ]"#;
        let words = parse_words(json).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "hello");
        assert_eq!(words[1].end, 0.9);
    }

    #[test]
    fn test_inverted_timing_is_clamped() {
        let word = WordTimestamp::new("x", 1.0, 0.5).normalized().unwrap();
        assert_eq!(word.end, 1.0);
        assert_eq!(word.duration(), 0.0);
    }
}

//! Caption groups: words rendered together as one on-screen block.

use serde::{Deserialize, Serialize};

use crate::word::WordTimestamp;

/// A cluster of consecutive words shown for one time interval.
///
/// `start` is the first word's start and `end` the last word's end.
/// A group always holds at least one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionGroup {
    pub words: Vec<WordTimestamp>,
    pub start: f64,
    pub end: f64,
    /// Words joined by single spaces.
    pub text: String,
}

impl CaptionGroup {
    /// Build a group from a non-empty run of words.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_words(words: Vec<WordTimestamp>) -> Option<Self> {
        let start = words.first()?.start;
        let end = words.last()?.end;
        let text = join_words(&words);
        Some(Self {
            words,
            start,
            end,
            text,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Time span covered by the group in seconds.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Join word texts with single spaces.
pub fn join_words(words: &[WordTimestamp]) -> String {
    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&word.text);
    }
    text
}

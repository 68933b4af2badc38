//! Temporal grouping of words into caption groups.
//!
//! # Algorithm
//!
//! A greedy single pass, left to right. Each word either joins the open
//! group or closes it and opens a new one. A word joins only if all hold:
//!
//! 1. the group has fewer than `max_words` words,
//! 2. the silence since the group's last word is at most `max_gap_secs`,
//! 3. the joined text measures at most `max_width_px`,
//! 4. the group would span at most `max_duration_secs`
//!    (`word.end - first.start`).
//!
//! Grouping is a pure function of its inputs, and the concatenation of all
//! emitted groups reproduces the (non-blank) input sequence exactly.

use reelcap_caption_model::config::{GroupingConfig, GroupingStrategy};
use reelcap_caption_model::group::{join_words, CaptionGroup};
use reelcap_caption_model::word::WordTimestamp;

use crate::metrics::TextMeasure;
use crate::scaling::scale_px;

/// Thresholds for adaptive grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingThresholds {
    pub max_gap_secs: f64,
    pub max_width_px: f32,
    pub max_words: usize,
    /// `None` disables the duration guard.
    pub max_duration_secs: Option<f64>,
}

impl GroupingThresholds {
    pub fn from_config(config: &GroupingConfig, max_width_px: u32) -> Self {
        Self {
            max_gap_secs: config.max_gap_seconds,
            max_width_px: max_width_px as f32,
            max_words: config.max_words_per_group.max(1),
            max_duration_secs: config
                .split_long_captions
                .then_some(config.max_duration_seconds),
        }
    }
}

/// Partitions words into caption groups.
#[derive(Debug, Clone, Copy)]
pub struct WordGrouper {
    strategy: GroupingStrategy,
    thresholds: GroupingThresholds,
    words_per_group: usize,
}

impl WordGrouper {
    /// Adaptive grouper with explicit thresholds.
    pub fn adaptive(thresholds: GroupingThresholds) -> Self {
        Self {
            strategy: GroupingStrategy::Adaptive,
            thresholds,
            words_per_group: thresholds.max_words,
        }
    }

    /// Fixed-size runs of `words_per_group` words.
    pub fn fixed(words_per_group: usize) -> Self {
        let n = words_per_group.max(1);
        Self {
            strategy: GroupingStrategy::Fixed,
            thresholds: GroupingThresholds {
                max_gap_secs: f64::INFINITY,
                max_width_px: f32::INFINITY,
                max_words: n,
                max_duration_secs: None,
            },
            words_per_group: n,
        }
    }

    pub fn from_config(config: &GroupingConfig, max_width_px: u32) -> Self {
        match config.strategy {
            GroupingStrategy::Adaptive => {
                Self::adaptive(GroupingThresholds::from_config(config, max_width_px))
            }
            GroupingStrategy::Fixed => Self::fixed(config.words_per_group),
        }
    }

    pub fn thresholds(&self) -> &GroupingThresholds {
        &self.thresholds
    }

    /// Group `words`, measuring candidate text with `measure`.
    pub fn group<M>(&self, words: &[WordTimestamp], measure: &M) -> Vec<CaptionGroup>
    where
        M: TextMeasure + ?Sized,
    {
        let groups = match self.strategy {
            GroupingStrategy::Adaptive => {
                group_words(words, &self.thresholds, |text| measure.text_width(text))
            }
            GroupingStrategy::Fixed => group_fixed(words, self.words_per_group),
        };
        tracing::debug!(
            words = words.len(),
            groups = groups.len(),
            strategy = ?self.strategy,
            "Grouped words"
        );
        groups
    }
}

/// Greedy adaptive grouping.
///
/// `width_fn` measures a candidate text (words joined by single spaces).
/// Blank words are discarded first and never affect gaps or widths.
pub fn group_words<F>(
    words: &[WordTimestamp],
    thresholds: &GroupingThresholds,
    width_fn: F,
) -> Vec<CaptionGroup>
where
    F: Fn(&str) -> f32,
{
    let mut groups = Vec::new();
    let mut current: Vec<WordTimestamp> = Vec::new();

    for word in words.iter().filter(|w| !w.text.trim().is_empty()) {
        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let gap = word.start - last.end;
            let span = word.end - first.start;

            let admit = current.len() < thresholds.max_words
                && gap <= thresholds.max_gap_secs
                && thresholds
                    .max_duration_secs
                    .map_or(true, |max| span <= max)
                && {
                    let candidate = candidate_text(&current, word);
                    width_fn(&candidate) <= thresholds.max_width_px
                };

            if !admit {
                groups.extend(CaptionGroup::from_words(std::mem::take(&mut current)));
            }
        }
        current.push(word.clone());
    }

    groups.extend(CaptionGroup::from_words(current));
    groups
}

/// Consecutive runs of `n` words; the last run may be shorter.
pub fn group_fixed(words: &[WordTimestamp], n: usize) -> Vec<CaptionGroup> {
    let kept: Vec<WordTimestamp> = words
        .iter()
        .filter(|w| !w.text.trim().is_empty())
        .cloned()
        .collect();
    kept.chunks(n.max(1))
        .filter_map(|chunk| CaptionGroup::from_words(chunk.to_vec()))
        .collect()
}

fn candidate_text(current: &[WordTimestamp], next: &WordTimestamp) -> String {
    let mut text = join_words(current);
    text.push(' ');
    text.push_str(&next.text);
    text
}

/// Pixel width available to one caption line on a `frame_width` frame.
///
/// Either a fraction of the frame, or the frame minus left/right paddings
/// defined at `reference_width` and scaled proportionally.
pub fn width_budget(frame_width: u32, config: &GroupingConfig, reference_width: u32) -> u32 {
    let budget = if config.use_safe_zone_for_width {
        let factor = if reference_width == 0 {
            1.0
        } else {
            frame_width as f64 / reference_width as f64
        };
        let padding = scale_px(config.left_padding, factor) + scale_px(config.right_padding, factor);
        frame_width.saturating_sub(padding)
    } else {
        (frame_width as f64 * config.caption_width_ratio) as u32
    };
    budget.max(1)
}

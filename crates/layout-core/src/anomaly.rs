//! Recoverable anomalies reported by a caption run.

use std::fmt;

use serde::Serialize;

/// A condition handled by a local fallback instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptionAnomaly {
    /// No words survived normalization; the run yields no captions.
    EmptyWordSequence,

    /// A single word is wider than the whole width budget. It gets a line
    /// of its own and is never dropped or truncated.
    DegenerateGroup {
        group_index: usize,
        word: String,
        width: f32,
        budget: u32,
    },

    /// A clip starts at or after the end of the video, or is empty once
    /// clamped to it. The clip is skipped.
    OutOfRangeTiming {
        group_index: usize,
        start: f64,
        end: f64,
        duration: f64,
    },

    /// A caption is taller than the safe band and was placed partly
    /// outside it. The position is not corrected.
    OutsideSafeBand {
        group_index: usize,
        y: i32,
        caption_height: u32,
    },
}

impl CaptionAnomaly {
    /// Emit the anomaly as a structured warning.
    pub fn log(&self) {
        match self {
            CaptionAnomaly::EmptyWordSequence => {
                tracing::warn!("No words to caption; producing no caption images");
            }
            CaptionAnomaly::DegenerateGroup {
                group_index,
                word,
                width,
                budget,
            } => {
                tracing::warn!(
                    group = group_index,
                    word = %word,
                    width = *width as f64,
                    budget,
                    "Word wider than caption width; placed on its own line"
                );
            }
            CaptionAnomaly::OutOfRangeTiming {
                group_index,
                start,
                end,
                duration,
            } => {
                tracing::warn!(
                    group = group_index,
                    start,
                    end,
                    duration,
                    "Caption outside video duration; skipped"
                );
            }
            CaptionAnomaly::OutsideSafeBand {
                group_index,
                y,
                caption_height,
            } => {
                tracing::warn!(
                    group = group_index,
                    y,
                    caption_height,
                    "Caption taller than the safe band; placed partly outside it"
                );
            }
        }
    }
}

impl fmt::Display for CaptionAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionAnomaly::EmptyWordSequence => write!(f, "no words to caption"),
            CaptionAnomaly::DegenerateGroup {
                group_index,
                word,
                width,
                budget,
            } => write!(
                f,
                "group {group_index}: \"{word}\" is {width:.0}px wide, budget {budget}px"
            ),
            CaptionAnomaly::OutOfRangeTiming {
                group_index,
                start,
                end,
                duration,
            } => write!(
                f,
                "group {group_index}: {start:.3}s-{end:.3}s outside a {duration:.3}s video"
            ),
            CaptionAnomaly::OutsideSafeBand {
                group_index,
                y,
                caption_height,
            } => write!(
                f,
                "group {group_index}: {caption_height}px caption at y={y} exceeds the safe band"
            ),
        }
    }
}

//! SRT and WebVTT sidecars for caption groups.
//!
//! Lets players that do not burn captions in reuse the same timing.

use std::fmt::Write as _;
use std::path::Path;

use reelcap_caption_model::group::CaptionGroup;
use serde::Serialize;

/// A timed block of subtitle text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<&CaptionGroup> for SubtitleCue {
    fn from(group: &CaptionGroup) -> Self {
        Self {
            start: group.start,
            end: group.end,
            text: group.text.clone(),
        }
    }
}

/// Cues for groups that start before `video_duration`, ends clamped to it.
pub fn cues_for_groups(groups: &[CaptionGroup], video_duration: f64) -> Vec<SubtitleCue> {
    groups
        .iter()
        .filter(|g| g.start < video_duration)
        .map(|g| SubtitleCue {
            end: g.end.min(video_duration),
            ..SubtitleCue::from(g)
        })
        .filter(|cue| cue.end > cue.start)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// `.vtt` selects WebVTT; anything else SRT.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("vtt") => SubtitleFormat::Vtt,
            _ => SubtitleFormat::Srt,
        }
    }

    pub fn render(self, cues: &[SubtitleCue]) -> String {
        match self {
            SubtitleFormat::Srt => generate_srt(cues),
            SubtitleFormat::Vtt => generate_vtt(cues),
        }
    }
}

pub fn generate_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            timestamp(cue.start, ','),
            timestamp(cue.end, ','),
            cue.text
        );
    }
    out
}

pub fn generate_vtt(cues: &[SubtitleCue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in cues {
        let _ = write!(
            out,
            "{} --> {}\n{}\n\n",
            timestamp(cue.start, '.'),
            timestamp(cue.end, '.'),
            cue.text
        );
    }
    out
}

/// `HH:MM:SS<sep>mmm`, rounded to the nearest millisecond.
fn timestamp(secs: f64, separator: char) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}{separator}{millis:03}")
}

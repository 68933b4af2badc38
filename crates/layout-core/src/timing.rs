//! Display intervals for caption images.
//!
//! One frame per group, or one per word when highlighting is on. Every
//! interval is clamped to the video duration; intervals that start at or
//! after the end, or end up empty, are skipped and reported.

use reelcap_caption_model::group::CaptionGroup;
use serde::Serialize;

use crate::anomaly::CaptionAnomaly;

/// One caption image to render and the interval it is shown for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptionFrame {
    pub group_index: usize,
    /// Word highlighted within the group, if any.
    pub highlight: Option<usize>,
    pub start: f64,
    pub end: f64,
}

impl CaptionFrame {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Expand groups into frames ordered by start time.
///
/// In highlight mode a word is shown until the next word starts (in the
/// following group too), and the final word until its own end.
pub fn plan_frames(
    groups: &[CaptionGroup],
    highlight_words: bool,
    video_duration: f64,
) -> (Vec<CaptionFrame>, Vec<CaptionAnomaly>) {
    let mut frames = Vec::new();
    let mut anomalies = Vec::new();

    let mut push = |group_index: usize, highlight: Option<usize>, start: f64, end: f64| {
        let clamped = end.min(video_duration);
        if start >= video_duration || clamped - start <= 0.0 {
            anomalies.push(CaptionAnomaly::OutOfRangeTiming {
                group_index,
                start,
                end,
                duration: video_duration,
            });
            return;
        }
        frames.push(CaptionFrame {
            group_index,
            highlight,
            start,
            end: clamped,
        });
    };

    if highlight_words {
        let starts: Vec<f64> = groups
            .iter()
            .flat_map(|g| g.words.iter().map(|w| w.start))
            .collect();
        let mut flat = 0usize;
        for (group_index, group) in groups.iter().enumerate() {
            for (word_index, word) in group.words.iter().enumerate() {
                flat += 1;
                let end = starts.get(flat).copied().unwrap_or(word.end);
                push(group_index, Some(word_index), word.start, end);
            }
        }
    } else {
        for (group_index, group) in groups.iter().enumerate() {
            push(group_index, None, group.start, group.end);
        }
    }

    (frames, anomalies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcap_caption_model::word::WordTimestamp;

    fn groups() -> Vec<CaptionGroup> {
        vec![
            CaptionGroup::from_words(vec![
                WordTimestamp::new("I", 0.0, 0.3),
                WordTimestamp::new("LOVE", 0.35, 0.7),
            ])
            .unwrap(),
            CaptionGroup::from_words(vec![WordTimestamp::new("CODING", 1.0, 1.6)]).unwrap(),
        ]
    }

    #[test]
    fn test_group_frames() {
        let (frames, anomalies) = plan_frames(&groups(), false, 10.0);
        assert!(anomalies.is_empty());
        assert_eq!(frames.len(), 2);
        assert_eq!((frames[0].start, frames[0].end), (0.0, 0.7));
        assert_eq!(frames[1].group_index, 1);
        assert_eq!(frames[1].highlight, None);
    }

    #[test]
    fn test_highlight_frames_are_continuous() {
        let (frames, _) = plan_frames(&groups(), true, 10.0);
        let spans: Vec<(usize, Option<usize>, f64, f64)> = frames
            .iter()
            .map(|f| (f.group_index, f.highlight, f.start, f.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                (0, Some(0), 0.0, 0.35),
                (0, Some(1), 0.35, 1.0),
                (1, Some(0), 1.0, 1.6),
            ]
        );
    }

    #[test]
    fn test_end_clamped_to_duration() {
        let (frames, anomalies) = plan_frames(&groups(), false, 1.2);
        assert!(anomalies.is_empty());
        assert_eq!(frames[1].end, 1.2);
        assert!((frames[1].duration() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_groups_past_the_end_are_skipped() {
        let (frames, anomalies) = plan_frames(&groups(), false, 1.0);
        assert_eq!(frames.len(), 1);
        assert_eq!(
            anomalies,
            vec![CaptionAnomaly::OutOfRangeTiming {
                group_index: 1,
                start: 1.0,
                end: 1.6,
                duration: 1.0,
            }]
        );
    }

    #[test]
    fn test_zero_length_interval_is_skipped() {
        let group = CaptionGroup::from_words(vec![WordTimestamp::new("X", 0.5, 0.5)]).unwrap();
        let (frames, anomalies) = plan_frames(&[group], false, 10.0);
        assert!(frames.is_empty());
        assert_eq!(anomalies.len(), 1);
    }
}

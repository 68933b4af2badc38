//! Caption run orchestration.
//!
//! ```text
//! SourceVideo ── AspectFitPlanner ── DynamicScaler ── ActiveStyle
//!                                                        │
//! words ── normalize ── WordGrouper ── plan_frames ──────┤
//!                                                        ▼
//!                          rayon: layout ─ rasterize ─ position (per frame)
//!                                                        │
//!                                                        ▼
//!                                   CaptionImage sequence (start order)
//! ```
//!
//! Planning, scaling, and grouping run once, in order. Per-frame work has no
//! cross-frame state and runs on the rayon pool; results are collected by
//! frame index, so emission order never depends on scheduling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use rayon::prelude::*;
use reelcap_caption_model::config::CaptionConfig;
use reelcap_caption_model::geometry::{AspectPlan, SafeAreaBounds};
use reelcap_caption_model::group::CaptionGroup;
use reelcap_caption_model::style::ActiveStyle;
use reelcap_caption_model::video::SourceVideo;
use reelcap_caption_model::word::{normalize_words, WordTimestamp};
use reelcap_common::error::{ReelcapError, ReelcapResult};
use reelcap_layout_core::grouping::width_budget;
use reelcap_layout_core::timing::plan_frames;
use reelcap_layout_core::{
    AspectFitPlanner, CaptionAnimation, CaptionAnomaly, CaptionFrame, DynamicScaler, Placement,
    SafeZonePositioner, TextLayoutEngine, WordGrouper,
};
use serde::Serialize;

use crate::font::{FontFace, GlyphSource};
use crate::rasterizer::StrokeShadowRasterizer;

/// One rendered caption, ready for compositing.
#[derive(Debug, Clone)]
pub struct CaptionImage {
    /// Position in the emitted sequence.
    pub index: usize,
    pub group_index: usize,
    pub highlight: Option<usize>,
    pub image: RgbaImage,
    pub placement: Placement,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub animation: CaptionAnimation,
}

impl CaptionImage {
    /// Serializable description without pixel data.
    pub fn overlay(&self) -> OverlayEntry {
        OverlayEntry {
            index: self.index,
            group_index: self.group_index,
            highlight: self.highlight,
            text: self.text.clone(),
            x: self.placement.x,
            y: self.placement.y,
            width: self.image.width(),
            height: self.image.height(),
            start: self.start,
            end: self.end,
            within_safe_band: self.placement.within_safe_band,
            animation: self.animation,
        }
    }
}

/// Metadata of a caption image, as written to overlay manifests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayEntry {
    pub index: usize,
    pub group_index: usize,
    pub highlight: Option<usize>,
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub start: f64,
    pub end: f64,
    pub within_safe_band: bool,
    pub animation: CaptionAnimation,
}

/// Everything a caption run produces.
#[derive(Debug, Clone)]
pub struct CaptionRun {
    pub plan: AspectPlan,
    pub style: ActiveStyle,
    pub safe_area: SafeAreaBounds,
    pub width_budget: u32,
    pub groups: Vec<CaptionGroup>,
    /// Ordered by start time.
    pub images: Vec<CaptionImage>,
    pub anomalies: Vec<CaptionAnomaly>,
}

impl CaptionRun {
    pub fn output_size(&self) -> (u32, u32) {
        self.plan.output_size()
    }
}

/// Drives one caption run for a video.
pub struct CaptionPipeline<'f> {
    config: CaptionConfig,
    font: &'f dyn FontFace,
    cancel: Arc<AtomicBool>,
}

impl<'f> CaptionPipeline<'f> {
    pub fn new(config: CaptionConfig, font: &'f dyn FontFace) -> Self {
        Self {
            config,
            font,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag with the caller.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// Plan, group, and render captions for `words` over `video`.
    ///
    /// Fails only on fatal conditions (bad dimensions, rejected aspect,
    /// unusable font, cancellation). Everything else is recovered and
    /// listed in [`CaptionRun::anomalies`].
    pub fn run(&self, video: &SourceVideo, words: &[WordTimestamp]) -> ReelcapResult<CaptionRun> {
        let config = &self.config;
        tracing::info!(
            width = video.width,
            height = video.height,
            duration = video.duration_secs,
            words = words.len(),
            font = self.font.name(),
            "Starting caption run"
        );

        if video.is_variable_frame_rate() {
            tracing::warn!(
                nominal = ?video.frame_rate.map(|r| r.fps()),
                average = ?video.avg_frame_rate.map(|r| r.fps()),
                "Variable frame rate source; caption timing assumes constant frame rate"
            );
        }

        let plan = AspectFitPlanner::from_config(&config.aspect)
            .plan(video.width as i64, video.height as i64)?;
        let (out_w, out_h) = plan.output_size();

        let style = DynamicScaler::from_config(&config.scaling).scale(&config.style, out_w);
        let glyphs = self.font.at_size(style.font_size);
        if !(glyphs.line_height() > 0.0) {
            return Err(ReelcapError::font_unavailable(format!(
                "{} has no usable metrics at {}px",
                self.font.name(),
                style.font_size
            )));
        }

        let positioner = SafeZonePositioner::from_config(&config.placement);
        let safe_area = positioner.safe_area_bounds(out_w, out_h);
        let budget = width_budget(out_w, &config.grouping, config.scaling.reference_width);

        let words = normalize_words(words);
        let mut anomalies = Vec::new();
        if words.is_empty() {
            anomalies.push(CaptionAnomaly::EmptyWordSequence);
        }

        let groups = WordGrouper::from_config(&config.grouping, budget).group(&words, &*glyphs);
        let (frames, timing_anomalies) =
            plan_frames(&groups, config.highlight.enabled, video.duration_secs);
        anomalies.extend(timing_anomalies);

        tracing::info!(
            output_width = out_w,
            output_height = out_h,
            font_size = style.font_size,
            width_budget = budget,
            groups = groups.len(),
            frames = frames.len(),
            "Caption plan ready"
        );

        let renderer = FrameRenderer {
            config,
            style: &style,
            glyphs: &*glyphs,
            positioner: &positioner,
            groups: &groups,
            budget,
            output: (out_w, out_h),
        };

        let rendered: Vec<Option<(CaptionImage, Vec<CaptionAnomaly>)>> = frames
            .par_iter()
            .enumerate()
            .map(|(index, frame)| {
                if self.cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some(renderer.render(index, frame))
            })
            .collect();

        if self.cancel.load(Ordering::Relaxed) {
            tracing::warn!("Caption run cancelled; discarding unrendered captions");
            return Err(ReelcapError::Cancelled);
        }

        let mut images = Vec::with_capacity(rendered.len());
        for (image, frame_anomalies) in rendered.into_iter().flatten() {
            images.push(image);
            anomalies.extend(frame_anomalies);
        }

        for anomaly in &anomalies {
            anomaly.log();
        }
        tracing::info!(
            images = images.len(),
            anomalies = anomalies.len(),
            "Caption run complete"
        );

        Ok(CaptionRun {
            plan,
            style,
            safe_area,
            width_budget: budget,
            groups,
            images,
            anomalies,
        })
    }
}

/// Read-only state shared by the per-frame workers.
struct FrameRenderer<'a> {
    config: &'a CaptionConfig,
    style: &'a ActiveStyle,
    glyphs: &'a dyn GlyphSource,
    positioner: &'a SafeZonePositioner,
    groups: &'a [CaptionGroup],
    budget: u32,
    output: (u32, u32),
}

impl FrameRenderer<'_> {
    fn render(&self, index: usize, frame: &CaptionFrame) -> (CaptionImage, Vec<CaptionAnomaly>) {
        let group = &self.groups[frame.group_index];
        let layout = TextLayoutEngine::new(self.style).layout(
            &group.words,
            self.budget,
            self.glyphs,
            frame.highlight,
        );
        let image = StrokeShadowRasterizer::new(self.style).rasterize(&layout, self.glyphs);

        let placement = self.positioner.position(
            self.output.0,
            self.output.1,
            layout.width,
            layout.height,
            self.config.placement.vertical_position,
            self.config.placement.padding,
        );

        // Per-group findings are reported once, by the group's first frame.
        let mut anomalies = Vec::new();
        if frame.highlight.unwrap_or(0) == 0 {
            anomalies.extend(layout.overlong_words().map(|w| CaptionAnomaly::DegenerateGroup {
                group_index: frame.group_index,
                word: w.text.clone(),
                width: w.width,
                budget: self.budget,
            }));
            if !placement.within_safe_band {
                anomalies.push(CaptionAnomaly::OutsideSafeBand {
                    group_index: frame.group_index,
                    y: placement.y,
                    caption_height: layout.height,
                });
            }
        }

        tracing::debug!(
            index,
            group = frame.group_index,
            lines = layout.lines.len(),
            x = placement.x,
            y = placement.y,
            "Rendered caption"
        );

        let image = CaptionImage {
            index,
            group_index: frame.group_index,
            highlight: frame.highlight,
            image,
            placement,
            start: frame.start,
            end: frame.end,
            text: group.text.clone(),
            animation: CaptionAnimation::for_clip(&self.config.animation, frame.duration()),
        };
        (image, anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BlockFont;
    use reelcap_caption_model::config::FitMode;
    use reelcap_caption_model::geometry::AspectFitResult;

    fn words() -> Vec<WordTimestamp> {
        vec![
            WordTimestamp::new("I", 0.0, 0.3),
            WordTimestamp::new("love", 0.3, 0.7),
            WordTimestamp::new("coding!", 0.7, 1.2),
        ]
    }

    fn config() -> CaptionConfig {
        let mut config = CaptionConfig::default();
        config.grouping.max_duration_seconds = 5.0;
        config
    }

    #[test]
    fn test_run_on_reference_frame() {
        let pipeline = CaptionPipeline::new(config(), &BlockFont);
        let run = pipeline
            .run(&SourceVideo::new(1080, 1920, 5.0), &words())
            .unwrap();

        assert!(run.plan.fit.is_unchanged());
        assert_eq!(run.style.font_size, 80);
        assert_eq!(run.width_budget, 900);
        assert_eq!(run.groups.len(), 1);
        assert_eq!(run.groups[0].text, "I LOVE CODING");
        assert_eq!(run.images.len(), 1);
        assert!(run.anomalies.is_empty());

        let image = &run.images[0];
        assert_eq!((image.start, image.end), (0.0, 1.2));
        assert!(image.placement.within_safe_band);
        assert_eq!(
            image.placement.y,
            1920 - 756 - image.image.height() as i32 - 20
        );
        assert!(image.animation.zoom.is_some());
    }

    #[test]
    fn test_landscape_source_is_cropped_and_scaled() {
        let mut config = config();
        config.aspect.fit_mode = FitMode::Crop;
        let pipeline = CaptionPipeline::new(config, &BlockFont);
        let run = pipeline
            .run(&SourceVideo::new(1920, 1080, 5.0), &words())
            .unwrap();

        assert!(matches!(run.plan.fit, AspectFitResult::Crop { x1: 656, .. }));
        assert_eq!(run.output_size(), (607, 1080));
        // 607 / 1080 of the reference sizes
        assert_eq!(run.style.font_size, 44);
    }

    #[test]
    fn test_highlight_mode_emits_per_word_in_order() {
        let mut config = config();
        config.highlight.enabled = true;
        let pipeline = CaptionPipeline::new(config, &BlockFont);
        let run = pipeline
            .run(&SourceVideo::new(1080, 1920, 5.0), &words())
            .unwrap();

        let order: Vec<(usize, Option<usize>)> = run
            .images
            .iter()
            .map(|i| (i.index, i.highlight))
            .collect();
        assert_eq!(order, vec![(0, Some(0)), (1, Some(1)), (2, Some(2))]);
        assert!(run.images.windows(2).all(|w| w[0].start <= w[1].start));
        // Same block, different highlight: identical canvas size.
        assert!(run
            .images
            .iter()
            .all(|i| i.image.dimensions() == run.images[0].image.dimensions()));
    }

    #[test]
    fn test_empty_words_are_not_fatal() {
        let pipeline = CaptionPipeline::new(config(), &BlockFont);
        let run = pipeline
            .run(&SourceVideo::new(1080, 1920, 5.0), &[WordTimestamp::new("...", 0.0, 1.0)])
            .unwrap();
        assert!(run.images.is_empty());
        assert_eq!(run.anomalies, vec![CaptionAnomaly::EmptyWordSequence]);
    }

    #[test]
    fn test_invalid_dimensions_are_fatal() {
        let pipeline = CaptionPipeline::new(config(), &BlockFont);
        let err = pipeline
            .run(&SourceVideo::new(0, 1920, 5.0), &words())
            .unwrap_err();
        assert!(matches!(err, ReelcapError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_out_of_range_groups_are_skipped() {
        let pipeline = CaptionPipeline::new(config(), &BlockFont);
        let mut late = words();
        late.push(WordTimestamp::new("LATE", 9.0, 9.5));
        let run = pipeline
            .run(&SourceVideo::new(1080, 1920, 5.0), &late)
            .unwrap();
        assert_eq!(run.images.len(), 1);
        assert!(matches!(
            run.anomalies.as_slice(),
            [CaptionAnomaly::OutOfRangeTiming { group_index: 1, .. }]
        ));
    }

    #[test]
    fn test_cancelled_run_returns_cancelled() {
        let cancel = Arc::new(AtomicBool::new(true));
        let pipeline =
            CaptionPipeline::new(config(), &BlockFont).with_cancel_flag(cancel);
        let err = pipeline
            .run(&SourceVideo::new(1080, 1920, 5.0), &words())
            .unwrap_err();
        assert!(matches!(err, ReelcapError::Cancelled));
        assert!(!err.is_fatal());
    }
}

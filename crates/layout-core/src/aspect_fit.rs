//! Aspect-ratio fit planning.
//!
//! Decides once per video how the source frame reaches the target ratio:
//! untouched, center-cropped, or scaled onto a canvas with bars.
//!
//! Crop coordinates and fitted sizes use integer truncation, so the output
//! ratio matches the target within one pixel of rounding.

use reelcap_caption_model::color::Color;
use reelcap_caption_model::config::{AspectConfig, CanvasSize, FitMode};
use reelcap_caption_model::geometry::{AspectFitResult, AspectPlan, Orientation};
use reelcap_common::error::{ReelcapError, ReelcapResult};

/// Plans the crop or pad transform for a source frame.
#[derive(Debug, Clone)]
pub struct AspectFitPlanner {
    target_ratio: f64,
    tolerance: f64,
    mode: FitMode,
    enforce: bool,
    reject_invalid: bool,
    pad_canvas: Option<CanvasSize>,
    pad_color: Color,
}

impl AspectFitPlanner {
    /// Create a planner for `target_ratio` (width/height).
    pub fn new(target_ratio: f64, tolerance: f64, mode: FitMode) -> Self {
        Self {
            target_ratio,
            tolerance,
            mode,
            enforce: true,
            reject_invalid: false,
            pad_canvas: None,
            pad_color: Color::BLACK,
        }
    }

    /// Build a planner from the aspect section of a caption config.
    pub fn from_config(config: &AspectConfig) -> Self {
        Self {
            target_ratio: config.target_ratio,
            tolerance: config.tolerance,
            mode: config.fit_mode,
            enforce: config.enforce,
            reject_invalid: config.reject_invalid,
            pad_canvas: config.pad_canvas,
            pad_color: config.pad_color,
        }
    }

    /// Use an explicit canvas for pad mode instead of deriving one.
    pub fn with_pad_canvas(mut self, canvas: CanvasSize) -> Self {
        self.pad_canvas = Some(canvas);
        self
    }

    /// Bar color for pad mode.
    pub fn with_pad_color(mut self, color: Color) -> Self {
        self.pad_color = color;
        self
    }

    /// Fail on mismatching sources instead of transforming them.
    pub fn rejecting_invalid(mut self) -> Self {
        self.reject_invalid = true;
        self
    }

    /// Plan the transform for a `width x height` source.
    ///
    /// Zero or negative dimensions fail fast with `InvalidDimensions`.
    pub fn plan(&self, width: i64, height: i64) -> ReelcapResult<AspectPlan> {
        if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
            return Err(ReelcapError::invalid_dimensions(width, height));
        }
        let (width, height) = (width as u32, height as u32);

        let ratio = width as f64 / height as f64;
        let orientation = Orientation::classify(ratio);
        let within_tolerance = (ratio - self.target_ratio).abs() <= self.tolerance;

        tracing::info!(
            width,
            height,
            ratio,
            orientation = ?orientation,
            within_tolerance,
            "Planning aspect fit"
        );

        let fit = if within_tolerance || !self.enforce {
            AspectFitResult::Unchanged { width, height }
        } else {
            tracing::warn!(
                ratio,
                target = self.target_ratio,
                "Source does not match the target aspect ratio"
            );
            if self.reject_invalid {
                return Err(ReelcapError::AspectRejected {
                    width,
                    height,
                    ratio,
                });
            }
            match self.mode {
                FitMode::Crop => center_crop(width, height, self.target_ratio),
                FitMode::Pad => {
                    let canvas = self
                        .pad_canvas
                        .unwrap_or_else(|| crop_canvas(width, height, self.target_ratio));
                    fit_with_bars(width, height, canvas.width, canvas.height)
                }
                FitMode::Keep => AspectFitResult::Unchanged { width, height },
            }
        };

        tracing::debug!(fit = ?fit, "Aspect fit planned");

        let bar_color =
            matches!(fit, AspectFitResult::FitWithBars { .. }).then_some(self.pad_color);

        Ok(AspectPlan {
            source_width: width,
            source_height: height,
            ratio,
            target_ratio: self.target_ratio,
            orientation,
            within_tolerance,
            fit,
            bar_color,
        })
    }
}

/// Largest centered rectangle of `target_ratio` inside the source.
pub fn center_crop(width: u32, height: u32, target_ratio: f64) -> AspectFitResult {
    let ratio = width as f64 / height as f64;
    if ratio > target_ratio {
        // Too wide: keep full height, trim the sides.
        let new_width = ((height as f64 * target_ratio) as u32).clamp(1, width);
        let x1 = (width - new_width) / 2;
        AspectFitResult::Crop {
            x1,
            y1: 0,
            x2: x1 + new_width,
            y2: height,
        }
    } else {
        // Too tall: keep full width, trim top and bottom.
        let new_height = ((width as f64 / target_ratio) as u32).clamp(1, height);
        let y1 = (height - new_height) / 2;
        AspectFitResult::Crop {
            x1: 0,
            y1,
            x2: width,
            y2: y1 + new_height,
        }
    }
}

/// Scale the source to fit inside `target_width x target_height`,
/// centering it with equal bars on the shorter axis.
pub fn fit_with_bars(
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> AspectFitResult {
    let ratio = width as f64 / height as f64;
    let target_ratio = target_width as f64 / target_height as f64;

    let (content_width, content_height) = if ratio > target_ratio {
        // Letterbox: full width, bars above and below.
        let h = ((target_width as f64 / ratio) as u32).clamp(1, target_height);
        (target_width, h)
    } else {
        // Pillarbox: full height, bars left and right.
        let w = ((target_height as f64 * ratio) as u32).clamp(1, target_width);
        (w, target_height)
    };

    AspectFitResult::FitWithBars {
        content_width,
        content_height,
        x_offset: (target_width - content_width) / 2,
        y_offset: (target_height - content_height) / 2,
        target_width,
        target_height,
    }
}

/// Size of the center-crop rectangle, used as the default pad canvas.
fn crop_canvas(width: u32, height: u32, target_ratio: f64) -> CanvasSize {
    let (width, height) = center_crop(width, height, target_ratio).output_size();
    CanvasSize { width, height }
}

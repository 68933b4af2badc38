//! Resolution-proportional style scaling.

use reelcap_caption_model::config::ScalingConfig;
use reelcap_caption_model::style::{ActiveStyle, BaseStyle, Padding, ShadowOffset};

/// Derives the active style for a video from the configured base style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicScaler {
    reference_width: u32,
    enabled: bool,
}

impl DynamicScaler {
    pub fn new(reference_width: u32) -> Self {
        Self {
            reference_width,
            enabled: true,
        }
    }

    /// A scaler that always returns the base style verbatim.
    pub fn disabled() -> Self {
        Self {
            reference_width: 0,
            enabled: false,
        }
    }

    pub fn from_config(config: &ScalingConfig) -> Self {
        Self {
            reference_width: config.reference_width,
            enabled: config.dynamic,
        }
    }

    /// Factor applied to every linear size for a video `actual_width` wide.
    pub fn factor(&self, actual_width: u32) -> f64 {
        if !self.enabled || self.reference_width == 0 {
            return 1.0;
        }
        actual_width as f64 / self.reference_width as f64
    }

    /// Resolve `base` for a video `actual_width` pixels wide.
    pub fn scale(&self, base: &BaseStyle, actual_width: u32) -> ActiveStyle {
        let factor = self.factor(actual_width);
        let style = scale_style(base, factor);
        tracing::debug!(
            factor,
            font_size = style.font_size,
            stroke_width = style.stroke_width,
            "Resolved active style"
        );
        style
    }
}

/// Multiply every linear size in `base` by `factor`.
///
/// Sizes truncate toward zero and never go negative; shadow offsets keep
/// their sign. The font size never drops below one pixel.
pub fn scale_style(base: &BaseStyle, factor: f64) -> ActiveStyle {
    if factor == 1.0 {
        return ActiveStyle::unscaled(base);
    }
    let size = |v: u32| (v as f64 * factor).max(0.0) as u32;
    let offset = |v: i32| (v as f64 * factor) as i32;

    ActiveStyle {
        scale_factor: factor,
        font_size: size(base.font_size).max(1),
        stroke_width: size(base.stroke_width),
        corner_radius: size(base.corner_radius),
        line_spacing: size(base.line_spacing),
        shadow_offset: ShadowOffset::new(
            offset(base.shadow_offset.x),
            offset(base.shadow_offset.y),
        ),
        shadow_blur_radius: size(base.shadow_blur_radius),
        shadow_style: base.shadow_style,
        highlight_padding: Padding::new(
            size(base.highlight_padding.horizontal),
            size(base.highlight_padding.vertical),
        ),
        highlight_corner_radius: size(base.highlight_corner_radius),
        align: base.align,
        palette: base.palette,
    }
}

/// Scale a single reference-width pixel value by the same rule.
pub fn scale_px(value: u32, factor: f64) -> u32 {
    (value as f64 * factor).max(0.0) as u32
}

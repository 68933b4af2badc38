//! Caption configuration.
//!
//! Every section deserializes with defaults, so a JSON document only needs
//! the keys it wants to change. Unknown keys are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::SafeZoneMargins;
use crate::style::{BaseStyle, VerticalIntent};

/// Complete configuration for one caption run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub aspect: AspectConfig,
    pub scaling: ScalingConfig,
    pub style: BaseStyle,
    pub grouping: GroupingConfig,
    pub placement: PlacementConfig,
    pub highlight: HighlightConfig,
    pub animation: AnimationConfig,
}

/// How a mismatching source is brought to the target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Center crop.
    Crop,
    /// Scale to fit and fill the rest with bars.
    #[default]
    Pad,
    /// Report the mismatch but leave the frame alone.
    Keep,
}

/// Explicit output canvas for pad mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Aspect ratio enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    /// When false the source frame is always used unchanged.
    pub enforce: bool,
    /// Target width/height ratio.
    pub target_ratio: f64,
    /// Allowed absolute deviation from `target_ratio`.
    pub tolerance: f64,
    pub fit_mode: FitMode,
    /// Fail the run instead of transforming a mismatching source.
    pub reject_invalid: bool,
    /// Bar color in pad mode.
    pub pad_color: Color,
    /// Pad canvas size. When unset, the largest target-ratio rectangle
    /// inside the source frame is used.
    pub pad_canvas: Option<CanvasSize>,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            enforce: true,
            target_ratio: 9.0 / 16.0,
            tolerance: 0.02,
            fit_mode: FitMode::Pad,
            reject_invalid: false,
            pad_color: Color::BLACK,
            pad_canvas: None,
        }
    }
}

/// Resolution-proportional scaling of style sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub dynamic: bool,
    /// Width at which the base style values were designed.
    pub reference_width: u32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            dynamic: true,
            reference_width: 1080,
        }
    }
}

/// Strategy for splitting the word stream into caption groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Greedy grouping bounded by gap, width, word count, and duration.
    #[default]
    Adaptive,
    /// Consecutive runs of `words_per_group` words.
    Fixed,
}

/// Grouping thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub strategy: GroupingStrategy,
    /// Largest silence between two words of the same group.
    pub max_gap_seconds: f64,
    pub max_words_per_group: usize,
    pub max_duration_seconds: f64,
    /// When false the duration guard is skipped.
    pub split_long_captions: bool,
    /// Run length for the fixed strategy.
    pub words_per_group: usize,
    /// Width budget as a fraction of the frame width.
    pub caption_width_ratio: f64,
    /// Derive the width budget from left/right paddings instead of the ratio.
    pub use_safe_zone_for_width: bool,
    /// Left padding at the reference width.
    pub left_padding: u32,
    /// Right padding at the reference width.
    pub right_padding: u32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            strategy: GroupingStrategy::Adaptive,
            max_gap_seconds: 0.2,
            max_words_per_group: 3,
            max_duration_seconds: 1.0,
            split_long_captions: true,
            words_per_group: 1,
            caption_width_ratio: 0.9,
            use_safe_zone_for_width: true,
            left_padding: 60,
            right_padding: 120,
        }
    }
}

/// Vertical placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// When false, margins are zero and captions hug the frame edges.
    pub use_safe_zones: bool,
    pub vertical_position: VerticalIntent,
    /// Extra distance from the safe band edge, in pixels.
    pub padding: u32,
    pub margins: SafeZoneMargins,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            use_safe_zones: true,
            vertical_position: VerticalIntent::Bottom,
            padding: 20,
            margins: SafeZoneMargins::VERTICAL_1080,
        }
    }
}

impl PlacementConfig {
    /// Margins actually in effect.
    pub fn effective_margins(&self) -> SafeZoneMargins {
        if self.use_safe_zones {
            self.margins
        } else {
            SafeZoneMargins::NONE
        }
    }
}

/// Word-by-word highlighting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Emit one image per word, highlighting the word being spoken.
    pub enabled: bool,
}

/// Animation hints attached to each emitted caption image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub zoom: bool,
    pub zoom_start_scale: f64,
    pub zoom_end_scale: f64,
    pub zoom_duration: f64,
    pub fade_and_scale: bool,
    pub fade_duration: f64,
    pub scale_effect_intensity: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            zoom: true,
            zoom_start_scale: 0.8,
            zoom_end_scale: 1.0,
            zoom_duration: 0.3,
            fade_and_scale: false,
            fade_duration: 0.2,
            scale_effect_intensity: 0.15,
        }
    }
}

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for {field}: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl CaptionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: CaptionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let aspect = &self.aspect;
        if !(aspect.target_ratio.is_finite() && aspect.target_ratio > 0.0) {
            return Err(ConfigError::new("aspect.target_ratio", "must be positive"));
        }
        if !(aspect.tolerance.is_finite() && aspect.tolerance >= 0.0) {
            return Err(ConfigError::new("aspect.tolerance", "must be non-negative"));
        }
        if let Some(canvas) = aspect.pad_canvas {
            if canvas.width == 0 || canvas.height == 0 {
                return Err(ConfigError::new("aspect.pad_canvas", "must be non-empty"));
            }
        }
        if self.scaling.reference_width == 0 {
            return Err(ConfigError::new("scaling.reference_width", "must be positive"));
        }
        if self.style.font_size == 0 {
            return Err(ConfigError::new("style.font_size", "must be positive"));
        }

        let grouping = &self.grouping;
        if grouping.max_words_per_group == 0 {
            return Err(ConfigError::new("grouping.max_words_per_group", "must be at least 1"));
        }
        if grouping.words_per_group == 0 {
            return Err(ConfigError::new("grouping.words_per_group", "must be at least 1"));
        }
        if grouping.max_gap_seconds < 0.0 {
            return Err(ConfigError::new("grouping.max_gap_seconds", "must be non-negative"));
        }
        if grouping.max_duration_seconds <= 0.0 {
            return Err(ConfigError::new("grouping.max_duration_seconds", "must be positive"));
        }
        if !(grouping.caption_width_ratio > 0.0 && grouping.caption_width_ratio <= 1.0) {
            return Err(ConfigError::new(
                "grouping.caption_width_ratio",
                "must be in (0, 1]",
            ));
        }

        let margins = &self.placement.margins;
        if margins.reference_width == 0 || margins.reference_height == 0 {
            return Err(ConfigError::new(
                "placement.margins",
                "reference dimensions must be positive",
            ));
        }

        let anim = &self.animation;
        if anim.zoom_duration < 0.0 || anim.fade_duration < 0.0 {
            return Err(ConfigError::new("animation", "durations must be non-negative"));
        }
        Ok(())
    }
}

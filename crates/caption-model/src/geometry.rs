//! Frame geometry: aspect-fit transforms and safe-area bounds.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Coarse orientation of a source frame, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Square,
    Landscape,
}

impl Orientation {
    /// Classify a width/height ratio: below 0.7 is portrait, above 1.3
    /// landscape, anything in between square.
    pub fn classify(ratio: f64) -> Self {
        if ratio < 0.7 {
            Orientation::Portrait
        } else if ratio > 1.3 {
            Orientation::Landscape
        } else {
            Orientation::Square
        }
    }
}

/// Transform that brings a source frame to the target aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AspectFitResult {
    /// Source is used as-is.
    Unchanged { width: u32, height: u32 },

    /// Center crop to the pixel rectangle `[x1, x2) x [y1, y2)`.
    Crop { x1: u32, y1: u32, x2: u32, y2: u32 },

    /// Scale content to `content_width x content_height` and place it at
    /// `(x_offset, y_offset)` on a `target_width x target_height` canvas.
    FitWithBars {
        content_width: u32,
        content_height: u32,
        x_offset: u32,
        y_offset: u32,
        target_width: u32,
        target_height: u32,
    },
}

impl AspectFitResult {
    /// Dimensions of the frame after the transform is applied.
    pub fn output_size(&self) -> (u32, u32) {
        match *self {
            AspectFitResult::Unchanged { width, height } => (width, height),
            AspectFitResult::Crop { x1, y1, x2, y2 } => (x2 - x1, y2 - y1),
            AspectFitResult::FitWithBars {
                target_width,
                target_height,
                ..
            } => (target_width, target_height),
        }
    }

    /// Width/height ratio of the output frame.
    pub fn output_ratio(&self) -> f64 {
        let (w, h) = self.output_size();
        w as f64 / h.max(1) as f64
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, AspectFitResult::Unchanged { .. })
    }
}

/// Result of aspect planning for one video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPlan {
    pub source_width: u32,
    pub source_height: u32,
    /// Source width/height ratio.
    pub ratio: f64,
    pub target_ratio: f64,
    pub orientation: Orientation,
    /// Whether the source already matched the target within tolerance.
    pub within_tolerance: bool,
    pub fit: AspectFitResult,
    /// Fill color for the bars; set only when the fit adds bars.
    #[serde(default)]
    pub bar_color: Option<Color>,
}

impl AspectPlan {
    pub fn output_size(&self) -> (u32, u32) {
        self.fit.output_size()
    }
}

/// Safe margins defined at a reference resolution.
///
/// Platform UI (titles, buttons, comment bars) covers these bands on short
/// form video players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZoneMargins {
    pub reference_width: u32,
    pub reference_height: u32,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl SafeZoneMargins {
    /// Margins measured on a 1080x1920 vertical frame.
    pub const VERTICAL_1080: SafeZoneMargins = SafeZoneMargins {
        reference_width: 1080,
        reference_height: 1920,
        top: 252,
        bottom: 756,
        left: 120,
        right: 240,
    };

    /// No margins: captions are positioned against the raw frame edges.
    pub const NONE: SafeZoneMargins = SafeZoneMargins {
        reference_width: 1080,
        reference_height: 1920,
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };
}

impl Default for SafeZoneMargins {
    fn default() -> Self {
        Self::VERTICAL_1080
    }
}

/// Safe area of a concrete frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeAreaBounds {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    pub width: u32,
    pub height: u32,
}

impl SafeAreaBounds {
    /// Whether a vertical span `[y, y + h)` lies fully inside the band.
    pub fn contains_span(&self, y: i32, h: u32) -> bool {
        y >= self.top as i32 && y as i64 + h as i64 <= self.bottom as i64
    }
}

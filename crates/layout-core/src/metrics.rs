//! Glyph metrics seam.
//!
//! Grouping and layout only need widths and vertical metrics; the render
//! engine supplies them from a real font, tests from a fixed-advance stub.

/// Text measurement at one font size.
///
/// Implementations must be safe for concurrent reads: per-group layout runs
/// on worker threads that share one measurer.
pub trait TextMeasure: Send + Sync {
    /// Advance width of `text` in pixels, kerning included.
    fn text_width(&self, text: &str) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of the line box (positive).
    fn descent(&self) -> f32;

    /// Height of one line, from font metrics rather than glyph bounds, so
    /// lines stack uniformly whatever characters they hold.
    fn line_height(&self) -> f32 {
        self.ascent() + self.descent()
    }

    fn space_width(&self) -> f32 {
        self.text_width(" ")
    }
}

/// Every character advances by the same amount.
///
/// Deterministic stand-in for a font; used for dry runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasure {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl FixedAdvanceMeasure {
    /// Proportions loosely matching a bold display face at `font_size`.
    pub fn for_font_size(font_size: u32) -> Self {
        let size = font_size as f32;
        Self {
            advance: (size * 0.6).round(),
            ascent: (size * 0.8).round(),
            descent: (size * 0.2).round(),
        }
    }
}

impl TextMeasure for FixedAdvanceMeasure {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }
}

//! Glyph sources: measurement plus coverage drawing at one pixel size.
//!
//! - [`TrueTypeFont`]: TrueType/OpenType outlines through `rusttype`
//! - [`BlockFont`]: every glyph a solid block, for dry runs and tests

use std::path::Path;

use reelcap_common::error::{ReelcapError, ReelcapResult};
use reelcap_layout_core::metrics::{FixedAdvanceMeasure, TextMeasure};
use rusttype::{point, Font, Scale, VMetrics};

/// A face sized to one pixel size, able to draw its glyphs.
pub trait GlyphSource: TextMeasure + Sync {
    /// Draw `text` with its pen starting at `(x, baseline)`.
    ///
    /// `plot` receives canvas coordinates and coverage in `[0, 1]`.
    /// Coordinates may fall outside the canvas.
    fn draw_text(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// A font face that can be instantiated at any pixel size.
pub trait FontFace: Send + Sync {
    fn at_size(&self, px: u32) -> Box<dyn GlyphSource + '_>;

    fn name(&self) -> &str;
}

/// An outline font loaded from TrueType/OpenType data.
pub struct TrueTypeFont {
    font: Font<'static>,
    name: String,
}

impl TrueTypeFont {
    pub fn from_bytes(bytes: Vec<u8>) -> ReelcapResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| ReelcapError::font_unavailable("data is not a TrueType/OpenType font"))?;
        if font.glyph_count() == 0 {
            return Err(ReelcapError::font_unavailable("font has no glyphs"));
        }
        Ok(Self {
            font,
            name: "embedded".to_string(),
        })
    }

    pub fn from_file(path: &Path) -> ReelcapResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelcapError::font_unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut font = Self::from_bytes(bytes)?;
        font.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("font")
            .to_string();
        tracing::info!(path = %path.display(), glyphs = font.font.glyph_count(), "Loaded font");
        Ok(font)
    }
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("name", &self.name)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace for TrueTypeFont {
    fn at_size(&self, px: u32) -> Box<dyn GlyphSource + '_> {
        let scale = Scale::uniform(px.max(1) as f32);
        Box::new(SizedTrueType {
            font: &self.font,
            scale,
            metrics: self.font.v_metrics(scale),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct SizedTrueType<'a> {
    font: &'a Font<'static>,
    scale: Scale,
    metrics: VMetrics,
}

impl TextMeasure for SizedTrueType<'_> {
    fn text_width(&self, text: &str) -> f32 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn ascent(&self) -> f32 {
        self.metrics.ascent
    }

    fn descent(&self) -> f32 {
        -self.metrics.descent
    }
}

impl GlyphSource for SizedTrueType<'_> {
    fn draw_text(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        for glyph in self.font.layout(text, self.scale, point(x, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| plot(bb.min.x + gx as i32, bb.min.y + gy as i32, v));
            }
        }
    }
}

/// Synthetic face: each non-space glyph is a solid rectangle.
///
/// Metrics follow [`FixedAdvanceMeasure::for_font_size`]. A glyph block
/// spans its advance minus a one-pixel gap on each side, from the baseline
/// up to three quarters of the ascent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl FontFace for BlockFont {
    fn at_size(&self, px: u32) -> Box<dyn GlyphSource + '_> {
        Box::new(BlockGlyphs(FixedAdvanceMeasure::for_font_size(px.max(1))))
    }

    fn name(&self) -> &str {
        "block"
    }
}

struct BlockGlyphs(FixedAdvanceMeasure);

impl TextMeasure for BlockGlyphs {
    fn text_width(&self, text: &str) -> f32 {
        self.0.text_width(text)
    }

    fn ascent(&self) -> f32 {
        self.0.ascent
    }

    fn descent(&self) -> f32 {
        self.0.descent
    }
}

impl GlyphSource for BlockGlyphs {
    fn draw_text(&self, text: &str, x: f32, baseline: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let advance = self.0.advance;
        let height = (self.0.ascent * 0.75).round() as i32;
        let bottom = baseline.round() as i32;
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = (x + i as f32 * advance).round() as i32 + 1;
            let right = (x + (i + 1) as f32 * advance).round() as i32 - 1;
            for py in bottom - height..bottom {
                for px in left..right {
                    plot(px, py, 1.0);
                }
            }
        }
    }
}

//! Caption styling: configured base values and the resolved active style.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Horizontal alignment of lines inside a caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Where a caption block sits vertically in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalIntent {
    Top,
    Center,
    #[default]
    Bottom,
}

/// How the shadow layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowStyle {
    /// No shadow layer.
    None,
    /// Hard-edged offset copy of the stroke silhouette.
    #[default]
    Block,
    /// Offset copy softened with a Gaussian blur.
    Drop,
}

/// Signed shadow displacement in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShadowOffset {
    pub x: i32,
    pub y: i32,
}

impl ShadowOffset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Largest absolute component.
    pub fn magnitude(&self) -> u32 {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }
}

/// Horizontal and vertical padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Padding {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Padding {
    pub const fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Colors used by every layer of a caption image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub text: Color,
    pub stroke: Color,
    pub shadow: Color,
    pub highlight_text: Color,
    pub highlight_background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color::WHITE,
            stroke: Color::BLACK,
            shadow: Color::rgba(0, 0, 0, 0xE6),
            highlight_text: Color::WHITE,
            highlight_background: Color::rgb(0x58, 0x46, 0xDD),
        }
    }
}

/// Configured styling values, expressed at the reference width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStyle {
    pub font_size: u32,
    pub stroke_width: u32,
    /// Radius used to round stroke corners.
    pub corner_radius: u32,
    pub line_spacing: u32,
    pub shadow_offset: ShadowOffset,
    pub shadow_blur_radius: u32,
    pub shadow_style: ShadowStyle,
    pub highlight_padding: Padding,
    pub highlight_corner_radius: u32,
    pub align: HorizontalAlign,
    pub palette: Palette,
}

impl Default for BaseStyle {
    fn default() -> Self {
        Self {
            font_size: 80,
            stroke_width: 10,
            corner_radius: 6,
            line_spacing: 10,
            shadow_offset: ShadowOffset::new(6, 6),
            shadow_blur_radius: 20,
            shadow_style: ShadowStyle::Block,
            highlight_padding: Padding::new(10, 5),
            highlight_corner_radius: 15,
            align: HorizontalAlign::Center,
            palette: Palette::default(),
        }
    }
}

/// Styling resolved for one video.
///
/// Computed once from a [`BaseStyle`] and the output width, then shared
/// read-only by every grouping, layout, and rasterization step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStyle {
    /// Factor applied to every linear size (1.0 when scaling is off).
    pub scale_factor: f64,
    pub font_size: u32,
    pub stroke_width: u32,
    pub corner_radius: u32,
    pub line_spacing: u32,
    pub shadow_offset: ShadowOffset,
    pub shadow_blur_radius: u32,
    pub shadow_style: ShadowStyle,
    pub highlight_padding: Padding,
    pub highlight_corner_radius: u32,
    pub align: HorizontalAlign,
    pub palette: Palette,
}

impl ActiveStyle {
    /// The base style taken verbatim (factor 1).
    pub fn unscaled(base: &BaseStyle) -> Self {
        Self {
            scale_factor: 1.0,
            font_size: base.font_size,
            stroke_width: base.stroke_width,
            corner_radius: base.corner_radius,
            line_spacing: base.line_spacing,
            shadow_offset: base.shadow_offset,
            shadow_blur_radius: base.shadow_blur_radius,
            shadow_style: base.shadow_style,
            highlight_padding: base.highlight_padding,
            highlight_corner_radius: base.highlight_corner_radius,
            align: base.align,
            palette: base.palette,
        }
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow_style != ShadowStyle::None
    }

    /// Padding kept around the text block so stroke, shadow, and highlight
    /// pills never clip at the canvas edge.
    pub fn outer_padding(&self) -> u32 {
        let stroke = self.stroke_width + self.corner_radius;
        let shadow = if self.has_shadow() {
            self.shadow_offset.magnitude()
                + match self.shadow_style {
                    ShadowStyle::Drop => self.shadow_blur_radius,
                    _ => 0,
                }
        } else {
            0
        };
        let pill = self
            .highlight_padding
            .horizontal
            .max(self.highlight_padding.vertical);
        stroke.max(pill) + shadow
    }
}

impl Default for ActiveStyle {
    fn default() -> Self {
        Self::unscaled(&BaseStyle::default())
    }
}

//! Caption rasterization: rounded stroke, shadow, and highlight pill.
//!
//! # Layers
//!
//! Every layer is a single-channel mask on the layout canvas, composited
//! back to front with straight alpha:
//!
//! 1. shadow: the stroke silhouette shifted by the shadow offset, blurred
//!    for drop shadows
//! 2. highlight pill: rounded rectangle behind the highlighted word
//! 3. stroke: ink dilated by `corner_radius + stroke_width`, then eroded by
//!    `corner_radius`
//! 4. fill: glyph coverage in each word's color
//!
//! The stroke pass is a morphological closing of the stroke-dilated ink:
//! concave notches up to the corner radius fill in, convex corners come out
//! round from the disc dilation, and the mask only grows as the corner
//! radius grows.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use imageproc::rect::Rect;
use reelcap_caption_model::style::{ActiveStyle, ShadowOffset, ShadowStyle};
use reelcap_layout_core::text_layout::LayoutResult;

use crate::font::GlyphSource;

/// Coverage at or above which an ink pixel seeds the stroke.
const INK_THRESHOLD: u8 = 64;

/// Intermediate masks for one caption image.
#[derive(Debug, Clone)]
pub struct CaptionLayers {
    /// Glyph coverage, independent of color.
    pub ink: GrayImage,
    /// Glyph coverage in per-word colors.
    pub fill: RgbaImage,
    pub stroke: Option<GrayImage>,
    pub shadow: Option<GrayImage>,
    pub pill: Option<GrayImage>,
}

pub struct StrokeShadowRasterizer<'a> {
    style: &'a ActiveStyle,
}

impl<'a> StrokeShadowRasterizer<'a> {
    pub fn new(style: &'a ActiveStyle) -> Self {
        Self { style }
    }

    /// Render `layout` to a transparent RGBA image of the layout's canvas size.
    pub fn rasterize<G>(&self, layout: &LayoutResult, glyphs: &G) -> RgbaImage
    where
        G: GlyphSource + ?Sized,
    {
        let layers = self.layers(layout, glyphs);
        self.composite(&layers)
    }

    /// Build every mask without compositing.
    pub fn layers<G>(&self, layout: &LayoutResult, glyphs: &G) -> CaptionLayers
    where
        G: GlyphSource + ?Sized,
    {
        let style = self.style;
        let (ink, fill) = ink_layers(layout, glyphs);

        let stroke = (style.stroke_width > 0)
            .then(|| stroke_mask(&ink, style.stroke_width, style.corner_radius));

        let shadow = style.has_shadow().then(|| {
            let silhouette = stroke.clone().unwrap_or_else(|| binarize(&ink));
            shadow_mask(
                &silhouette,
                style.shadow_offset,
                style.shadow_style,
                style.shadow_blur_radius,
            )
        });

        let pill = layout.highlighted().map(|(word, top)| {
            let pad = style.highlight_padding;
            let x0 = (word.x - pad.horizontal as f32).floor() as i32;
            let x1 = (word.x + word.width + pad.horizontal as f32).ceil() as i32;
            let y0 = (top - pad.vertical as f32).floor() as i32;
            let y1 = (top + layout.line_height + pad.vertical as f32).ceil() as i32;
            pill_mask(
                layout.width,
                layout.height,
                (x0, y0, x1, y1),
                style.highlight_corner_radius,
            )
        });

        CaptionLayers {
            ink,
            fill,
            stroke,
            shadow,
            pill,
        }
    }

    /// Composite layers back to front onto a transparent canvas.
    pub fn composite(&self, layers: &CaptionLayers) -> RgbaImage {
        let palette = &self.style.palette;
        let (width, height) = layers.ink.dimensions();
        let mut out = RgbaImage::new(width, height);

        let masked = [
            (layers.shadow.as_ref(), palette.shadow),
            (layers.pill.as_ref(), palette.highlight_background),
            (layers.stroke.as_ref(), palette.stroke),
        ];
        for (mask, color) in masked {
            if let Some(mask) = mask {
                for (dst, m) in out.pixels_mut().zip(mask.pixels()) {
                    if m[0] > 0 {
                        blend_over(dst, color.to_array(), m[0] as f32 / 255.0);
                    }
                }
            }
        }
        for (dst, src) in out.pixels_mut().zip(layers.fill.pixels()) {
            if src[3] > 0 {
                blend_over(dst, src.0, 1.0);
            }
        }
        out
    }
}

/// Glyph coverage mask and colored fill layer for a layout.
pub fn ink_layers<G>(layout: &LayoutResult, glyphs: &G) -> (GrayImage, RgbaImage)
where
    G: GlyphSource + ?Sized,
{
    let (width, height) = (layout.width, layout.height);
    let mut ink = GrayImage::new(width, height);
    let mut fill = RgbaImage::new(width, height);

    for line in &layout.lines {
        let baseline = line.baseline(layout.ascent);
        for word in &line.words {
            let [r, g, b, a] = word.color.to_array();
            glyphs.draw_text(&word.text, word.x, baseline, &mut |x, y, v| {
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return;
                }
                let coverage = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                let (x, y) = (x as u32, y as u32);
                let cell = ink.get_pixel_mut(x, y);
                cell[0] = cell[0].max(coverage);
                let alpha = (coverage as f32 * a as f32 / 255.0).round() as u8;
                let px = fill.get_pixel_mut(x, y);
                if alpha >= px[3] {
                    *px = Rgba([r, g, b, alpha]);
                }
            });
        }
    }
    (ink, fill)
}

/// Rounded stroke silhouette around `ink`.
///
/// Dilates by `corner_radius + stroke_width` with a Euclidean disc, then
/// erodes by `corner_radius`. Radii saturate at 255 pixels.
pub fn stroke_mask(ink: &GrayImage, stroke_width: u32, corner_radius: u32) -> GrayImage {
    let seed = binarize(ink);
    let grown = dilate(&seed, Norm::L2, radius_u8(corner_radius + stroke_width));
    if corner_radius == 0 {
        grown
    } else {
        erode(&grown, Norm::L2, radius_u8(corner_radius))
    }
}

/// `silhouette` shifted by `offset`, blurred for drop shadows.
pub fn shadow_mask(
    silhouette: &GrayImage,
    offset: ShadowOffset,
    style: ShadowStyle,
    blur_radius: u32,
) -> GrayImage {
    let (width, height) = silhouette.dimensions();
    let mut shifted = GrayImage::new(width, height);
    for (x, y, px) in silhouette.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        let tx = x as i64 + offset.x as i64;
        let ty = y as i64 + offset.y as i64;
        if tx >= 0 && ty >= 0 && (tx as u32) < width && (ty as u32) < height {
            shifted.put_pixel(tx as u32, ty as u32, *px);
        }
    }

    let sigma = blur_radius as f32 / 2.0;
    if style == ShadowStyle::Drop && sigma > 0.0 {
        gaussian_blur_f32(&shifted, sigma)
    } else {
        shifted
    }
}

/// Filled rounded rectangle covering `[x0, x1) x [y0, y1)`.
///
/// The corner radius is clamped to half the shorter side.
pub fn pill_mask(width: u32, height: u32, bounds: (i32, i32, i32, i32), radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let (x0, y0, x1, y1) = bounds;
    let (w, h) = (x1 - x0, y1 - y0);
    if w <= 0 || h <= 0 {
        return mask;
    }
    let on = Luma([255u8]);
    let r = (radius as i32).min(w / 2).min(h / 2);

    if r == 0 {
        draw_filled_rect_mut(&mut mask, Rect::at(x0, y0).of_size(w as u32, h as u32), on);
        return mask;
    }
    if w - 2 * r > 0 {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(x0 + r, y0).of_size((w - 2 * r) as u32, h as u32),
            on,
        );
    }
    if h - 2 * r > 0 {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(x0, y0 + r).of_size(w as u32, (h - 2 * r) as u32),
            on,
        );
    }
    for (cx, cy) in [
        (x0 + r, y0 + r),
        (x1 - 1 - r, y0 + r),
        (x0 + r, y1 - 1 - r),
        (x1 - 1 - r, y1 - 1 - r),
    ] {
        draw_filled_circle_mut(&mut mask, (cx, cy), r, on);
    }
    mask
}

/// Number of covered pixels in a mask.
pub fn mask_area(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

/// Straight-alpha "over": `src` scaled by `coverage` onto `dst`.
pub fn blend_over(dst: &mut Rgba<u8>, src: [u8; 4], coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn binarize(ink: &GrayImage) -> GrayImage {
    let mut mask = ink.clone();
    for px in mask.pixels_mut() {
        px[0] = if px[0] >= INK_THRESHOLD { 255 } else { 0 };
    }
    mask
}

fn radius_u8(r: u32) -> u8 {
    r.min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{BlockFont, FontFace};
    use proptest::prelude::*;
    use reelcap_caption_model::style::Padding;
    use reelcap_caption_model::word::WordTimestamp;
    use reelcap_layout_core::text_layout::TextLayoutEngine;

    fn rect_ink(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut ink = GrayImage::new(width, height);
        for &(x0, y0, x1, y1) in rects {
            for y in y0..y1 {
                for x in x0..x1 {
                    ink.put_pixel(x, y, Luma([255]));
                }
            }
        }
        ink
    }

    fn small_style() -> ActiveStyle {
        ActiveStyle {
            font_size: 20,
            stroke_width: 4,
            corner_radius: 0,
            shadow_style: ShadowStyle::None,
            highlight_padding: Padding::new(10, 5),
            ..ActiveStyle::default()
        }
    }

    fn layout_for(style: &ActiveStyle, text: &str, highlight: Option<usize>) -> LayoutResult {
        let glyphs = BlockFont.at_size(style.font_size);
        let words = vec![WordTimestamp::new(text, 0.0, 1.0)];
        TextLayoutEngine::new(style).layout(&words, 12, &*glyphs, highlight)
    }

    #[test]
    fn test_stroke_grows_by_stroke_width() {
        let ink = rect_ink(60, 60, &[(20, 20, 40, 40)]);
        let stroke = stroke_mask(&ink, 4, 0);
        assert_eq!(stroke.get_pixel(16, 30)[0], 255);
        assert_eq!(stroke.get_pixel(43, 30)[0], 255);
        assert_eq!(stroke.get_pixel(15, 30)[0], 0);
        assert_eq!(stroke.get_pixel(44, 30)[0], 0);
    }

    #[test]
    fn test_stroke_has_no_sharp_corners() {
        let ink = rect_ink(60, 60, &[(20, 20, 40, 40)]);
        for radius in [0, 3] {
            let stroke = stroke_mask(&ink, 4, radius);
            // The square corner of the stroke's bounding box stays empty.
            assert_eq!(stroke.get_pixel(16, 16)[0], 0, "radius {radius}");
            assert_eq!(stroke.get_pixel(43, 43)[0], 0, "radius {radius}");
            assert_eq!(stroke.get_pixel(16, 30)[0], 255, "radius {radius}");
            assert_eq!(stroke.get_pixel(30, 16)[0], 255, "radius {radius}");
        }
    }

    #[test]
    fn test_corner_radius_fills_gaps_between_glyphs() {
        let ink = rect_ink(90, 50, &[(10, 15, 30, 35), (44, 15, 64, 35)]);
        let areas: Vec<usize> = [0, 3, 6]
            .into_iter()
            .map(|r| mask_area(&stroke_mask(&ink, 2, r)))
            .collect();
        assert!(areas[0] <= areas[1], "{areas:?}");
        assert!(areas[1] < areas[2], "{areas:?}");

        // Gap center is closed once 2 * (radius + stroke) spans the gap.
        assert_eq!(stroke_mask(&ink, 2, 0).get_pixel(37, 25)[0], 0);
        assert_eq!(stroke_mask(&ink, 2, 6).get_pixel(37, 25)[0], 255);
    }

    #[test]
    fn test_composite_is_transparent_outside_ink() {
        let style = small_style();
        let layout = layout_for(&style, "A", None);
        let glyphs = BlockFont.at_size(style.font_size);
        let image = StrokeShadowRasterizer::new(&style).rasterize(&layout, &*glyphs);
        assert_eq!(image.dimensions(), (layout.width, layout.height));

        let line = &layout.lines[0];
        let word = &line.words[0];
        let mid_x = (word.x + word.width / 2.0) as u32;
        let baseline = line.baseline(layout.ascent) as u32;
        let mid_y = baseline - 4;

        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(layout.width - 1, layout.height - 1)[3], 0);
        assert_eq!(*image.get_pixel(mid_x, mid_y), Rgba([255, 255, 255, 255]));

        // Block starts one pixel right of the pen; stroke reaches 4 further.
        let ink_left = word.x.round() as u32 + 1;
        assert_eq!(*image.get_pixel(ink_left - 3, mid_y), Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(ink_left - 6, mid_y)[3], 0);
    }

    #[test]
    fn test_block_shadow_is_offset_stroke() {
        let style = ActiveStyle {
            stroke_width: 2,
            shadow_style: ShadowStyle::Block,
            shadow_offset: ShadowOffset::new(3, 3),
            ..small_style()
        };
        let layout = layout_for(&style, "A", None);
        let glyphs = BlockFont.at_size(style.font_size);
        let rasterizer = StrokeShadowRasterizer::new(&style);
        let layers = rasterizer.layers(&layout, &*glyphs);
        let stroke = layers.stroke.as_ref().unwrap();
        let shadow = layers.shadow.as_ref().unwrap();
        assert_eq!(mask_area(stroke), mask_area(shadow));
        for (x, y, px) in stroke.enumerate_pixels() {
            if px[0] > 0 {
                assert_eq!(shadow.get_pixel(x + 3, y + 3)[0], 255);
            }
        }

        // Right of the stroke on a middle row only the shadow shows.
        let row = layout.height / 2;
        let right_edge = (0..layout.width)
            .rev()
            .find(|&x| stroke.get_pixel(x, row)[0] > 0)
            .unwrap();
        let image = rasterizer.composite(&layers);
        assert_eq!(
            *image.get_pixel(right_edge + 3, row + 3),
            Rgba(style.palette.shadow.to_array())
        );
    }

    #[test]
    fn test_drop_shadow_is_soft() {
        let ink = rect_ink(80, 80, &[(30, 30, 50, 50)]);
        let hard = shadow_mask(&ink, ShadowOffset::new(4, 4), ShadowStyle::Block, 8);
        let soft = shadow_mask(&ink, ShadowOffset::new(4, 4), ShadowStyle::Drop, 8);
        assert_eq!(hard.get_pixel(60, 44)[0], 0);
        assert!(soft.get_pixel(60, 44)[0] > 0);
        assert!(soft.get_pixel(54, 44)[0] < 255);
    }

    #[test]
    fn test_highlight_pill_behind_word() {
        let style = small_style();
        let layout = layout_for(&style, "A", Some(0));
        let glyphs = BlockFont.at_size(style.font_size);
        let rasterizer = StrokeShadowRasterizer::new(&style);
        let layers = rasterizer.layers(&layout, &*glyphs);
        assert!(layers.pill.is_some());

        let (word, top) = layout.highlighted().unwrap();
        let x = (word.x - 8.0) as u32;
        let y = (top + layout.line_height / 2.0) as u32;
        let image = rasterizer.composite(&layers);
        assert_eq!(
            *image.get_pixel(x, y),
            Rgba(style.palette.highlight_background.to_array())
        );
    }

    #[test]
    fn test_pill_corners_are_round() {
        let mask = pill_mask(60, 40, (5, 5, 55, 35), 10);
        assert_eq!(mask.get_pixel(5, 5)[0], 0);
        assert_eq!(mask.get_pixel(30, 5)[0], 255);
        assert_eq!(mask.get_pixel(5, 20)[0], 255);
        assert_eq!(mask.get_pixel(55, 20)[0], 0);
    }

    #[test]
    fn test_blend_over_transparent_keeps_source() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend_over(&mut dst, [10, 20, 30, 200], 1.0);
        assert_eq!(dst, Rgba([10, 20, 30, 200]));

        let mut opaque = Rgba([255, 255, 255, 255]);
        blend_over(&mut opaque, [0, 0, 0, 255], 0.5);
        assert_eq!(opaque[3], 255);
        assert_eq!(opaque[0], 128);
    }

    proptest! {
        #[test]
        fn rounding_never_shrinks_the_stroke(
            x0 in 8u32..30, y0 in 8u32..30, w in 2u32..20, h in 2u32..20,
            gap in 1u32..20,
            stroke in 1u32..5,
            radius in 1u32..8,
        ) {
            let x1 = x0 + w;
            let ink = rect_ink(
                120,
                80,
                &[(x0, y0, x1, y0 + h), (x1 + gap, y0, (x1 + gap + w).min(100), y0 + h)],
            );
            let flat = mask_area(&stroke_mask(&ink, stroke, 0));
            let rounded = mask_area(&stroke_mask(&ink, stroke, radius));
            prop_assert!(rounded >= flat);
        }
    }
}

//! Caption placement inside the platform safe zone.
//!
//! Margins are defined at a reference resolution. Vertical margins scale by
//! `height / reference_height`, horizontal ones by `width / reference_width`,
//! both truncated to whole pixels.

use reelcap_caption_model::config::PlacementConfig;
use reelcap_caption_model::geometry::{SafeAreaBounds, SafeZoneMargins};
use reelcap_caption_model::style::VerticalIntent;
use serde::Serialize;

/// Top-left position of a caption image on the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    /// Whether the image lies vertically inside the safe band.
    pub within_safe_band: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeZonePositioner {
    margins: SafeZoneMargins,
}

impl SafeZonePositioner {
    pub fn new(margins: SafeZoneMargins) -> Self {
        Self { margins }
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(config.effective_margins())
    }

    pub fn margins(&self) -> &SafeZoneMargins {
        &self.margins
    }

    /// Safe area of a `width x height` frame.
    pub fn safe_area_bounds(&self, width: u32, height: u32) -> SafeAreaBounds {
        let (top, bottom) = self.vertical_margins(height);
        let (left, right) = self.horizontal_margins(width);
        let bottom = height.saturating_sub(bottom);
        let right = width.saturating_sub(right);
        SafeAreaBounds {
            top,
            bottom,
            left,
            right,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    /// Position a `caption_width x caption_height` image.
    ///
    /// `padding` is the extra distance from the band edge for top and bottom
    /// placement. A caption taller than the band is placed by the same rule
    /// and reported through `within_safe_band`, never clamped.
    pub fn position(
        &self,
        video_width: u32,
        video_height: u32,
        caption_width: u32,
        caption_height: u32,
        intent: VerticalIntent,
        padding: u32,
    ) -> Placement {
        let (top, bottom) = self.vertical_margins(video_height);
        let (top, bottom, vh) = (top as i64, bottom as i64, video_height as i64);
        let (ch, pad) = (caption_height as i64, padding as i64);

        let y = match intent {
            VerticalIntent::Top => top + pad,
            VerticalIntent::Center => {
                let band = vh - top - bottom;
                top + (band - ch).div_euclid(2)
            }
            VerticalIntent::Bottom => vh - bottom - ch - pad,
        };
        let x = (video_width as i64 - caption_width as i64).div_euclid(2);

        let bounds = self.safe_area_bounds(video_width, video_height);
        let y = clamp_i32(y);
        Placement {
            x: clamp_i32(x),
            y,
            within_safe_band: bounds.contains_span(y, caption_height),
        }
    }

    fn vertical_margins(&self, height: u32) -> (u32, u32) {
        let scale = ratio(height, self.margins.reference_height);
        (
            scale_margin(self.margins.top, scale),
            scale_margin(self.margins.bottom, scale),
        )
    }

    fn horizontal_margins(&self, width: u32) -> (u32, u32) {
        let scale = ratio(width, self.margins.reference_width);
        (
            scale_margin(self.margins.left, scale),
            scale_margin(self.margins.right, scale),
        )
    }
}

impl Default for SafeZonePositioner {
    fn default() -> Self {
        Self::new(SafeZoneMargins::VERTICAL_1080)
    }
}

fn ratio(actual: u32, reference: u32) -> f64 {
    if reference == 0 {
        1.0
    } else {
        actual as f64 / reference as f64
    }
}

fn scale_margin(margin: u32, scale: f64) -> u32 {
    (margin as f64 * scale) as u32
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_placement_at_reference_size() {
        let p = SafeZonePositioner::default().position(1080, 1920, 800, 100, VerticalIntent::Bottom, 20);
        assert_eq!(p.y, 1044);
        assert_eq!(p.x, 140);
        assert!(p.within_safe_band);
    }

    #[test]
    fn test_top_placement() {
        let p = SafeZonePositioner::default().position(1080, 1920, 1080, 100, VerticalIntent::Top, 20);
        assert_eq!(p.y, 272);
        assert_eq!(p.x, 0);
    }

    #[test]
    fn test_center_placement() {
        let p =
            SafeZonePositioner::default().position(1080, 1920, 500, 100, VerticalIntent::Center, 20);
        // band 252..1164 is 912 tall
        assert_eq!(p.y, 252 + 406);
    }

    #[test]
    fn test_margins_scale_with_height() {
        let p = SafeZonePositioner::default().position(540, 960, 200, 50, VerticalIntent::Bottom, 20);
        // bottom margin 378
        assert_eq!(p.y, 960 - 378 - 50 - 20);
    }

    #[test]
    fn test_oversized_caption_is_flagged_not_clamped() {
        let p =
            SafeZonePositioner::default().position(1080, 1920, 1000, 1000, VerticalIntent::Bottom, 20);
        assert_eq!(p.y, 144);
        assert!(!p.within_safe_band);

        let c =
            SafeZonePositioner::default().position(1080, 1920, 1000, 1001, VerticalIntent::Center, 0);
        // (912 - 1001) floors to -45
        assert_eq!(c.y, 252 - 45);
        assert!(!c.within_safe_band);
    }

    #[test]
    fn test_disabled_safe_zones_use_frame_edges() {
        let config = PlacementConfig {
            use_safe_zones: false,
            ..PlacementConfig::default()
        };
        let p = SafeZonePositioner::from_config(&config).position(
            1080,
            1920,
            800,
            100,
            VerticalIntent::Bottom,
            20,
        );
        assert_eq!(p.y, 1920 - 100 - 20);
    }

    #[test]
    fn test_safe_area_bounds() {
        let bounds = SafeZonePositioner::default().safe_area_bounds(1080, 1920);
        assert_eq!(
            bounds,
            SafeAreaBounds {
                top: 252,
                bottom: 1164,
                left: 120,
                right: 840,
                width: 720,
                height: 912,
            }
        );

        let half = SafeZonePositioner::default().safe_area_bounds(540, 960);
        assert_eq!((half.top, half.bottom, half.left, half.right), (126, 582, 60, 420));
    }

    #[test]
    fn test_wide_caption_goes_negative_x() {
        let p = SafeZonePositioner::default().position(1080, 1920, 1200, 100, VerticalIntent::Bottom, 20);
        assert_eq!(p.x, -60);
    }
}

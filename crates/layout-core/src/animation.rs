//! Animation hints for the compositor.
//!
//! The core never renders animation frames itself. Each caption image
//! carries a descriptor with pure `scale_at` / `opacity_at` curves over
//! clip-local time.

use reelcap_caption_model::config::AnimationConfig;
use serde::Serialize;

/// Scale from `start_scale` to `end_scale` with an ease-out cubic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomIn {
    pub start_scale: f64,
    pub end_scale: f64,
    pub duration: f64,
}

impl ZoomIn {
    pub fn scale_at(&self, t: f64) -> f64 {
        if self.duration <= 0.0 || t >= self.duration {
            return self.end_scale;
        }
        let progress = (t / self.duration).max(0.0);
        let eased = 1.0 - (1.0 - progress).powi(3);
        self.start_scale + (self.end_scale - self.start_scale) * eased
    }
}

/// Linear fade in and out plus a pulse peaking at mid-clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FadePulse {
    pub fade_duration: f64,
    pub intensity: f64,
    pub clip_duration: f64,
}

impl FadePulse {
    pub fn scale_at(&self, t: f64) -> f64 {
        let half = self.clip_duration / 2.0;
        let closeness = 1.0 - (t - half).abs() / half.max(0.1);
        (1.0 + self.intensity * closeness).max(0.1)
    }

    pub fn opacity_at(&self, t: f64) -> f64 {
        if self.fade_duration <= 0.0 {
            return 1.0;
        }
        let fade_in = t / self.fade_duration;
        let fade_out = (self.clip_duration - t) / self.fade_duration;
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}

/// Animation applied to one caption image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CaptionAnimation {
    pub zoom: Option<ZoomIn>,
    pub fade: Option<FadePulse>,
}

impl CaptionAnimation {
    /// Descriptor for a clip of `clip_duration` seconds.
    pub fn for_clip(config: &AnimationConfig, clip_duration: f64) -> Self {
        let zoom = config.zoom.then(|| ZoomIn {
            start_scale: config.zoom_start_scale,
            end_scale: config.zoom_end_scale,
            duration: config.zoom_duration.min(clip_duration),
        });
        let fade = config.fade_and_scale.then(|| FadePulse {
            fade_duration: config.fade_duration.min(clip_duration * 0.3),
            intensity: config.scale_effect_intensity,
            clip_duration,
        });
        Self { zoom, fade }
    }

    pub fn is_static(&self) -> bool {
        self.zoom.is_none() && self.fade.is_none()
    }

    /// Combined scale at clip-local time `t`.
    pub fn scale_at(&self, t: f64) -> f64 {
        let zoom = self.zoom.map_or(1.0, |z| z.scale_at(t));
        let pulse = self.fade.map_or(1.0, |f| f.scale_at(t));
        zoom * pulse
    }

    pub fn opacity_at(&self, t: f64) -> f64 {
        self.fade.map_or(1.0, |f| f.opacity_at(t))
    }
}

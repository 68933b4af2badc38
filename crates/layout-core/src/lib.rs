//! Reelcap Layout Core
//!
//! Turns a flat sequence of timed words into positioned caption blocks:
//! - **Aspect Fit:** Crop or letterbox/pillarbox plan for the target ratio
//! - **Scaling:** Resolution-proportional style sizes
//! - **Grouping:** Words clustered by gap, width, count, and duration
//! - **Text Layout:** Greedy line wrapping and per-word positions
//! - **Safe Zones:** Vertical placement clear of platform UI
//! - **Timing:** Clip intervals clamped to the video duration
//! - **Animation / Subtitles:** Compositor hints and SRT/VTT sidecars
//!
//! Pure computation: no I/O, no font files, no pixels. Text width comes in
//! through the [`TextMeasure`] trait.

pub mod anomaly;
pub mod animation;
pub mod aspect_fit;
pub mod grouping;
pub mod metrics;
pub mod safe_zone;
pub mod scaling;
pub mod subtitles;
pub mod text_layout;
pub mod timing;

pub use anomaly::CaptionAnomaly;
pub use animation::CaptionAnimation;
pub use aspect_fit::AspectFitPlanner;
pub use grouping::WordGrouper;
pub use metrics::TextMeasure;
pub use safe_zone::{Placement, SafeZonePositioner};
pub use scaling::DynamicScaler;
pub use text_layout::{LayoutResult, TextLayoutEngine};
pub use timing::CaptionFrame;

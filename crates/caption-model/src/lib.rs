//! Reelcap Caption Model
//!
//! Defines the core data contracts for caption runs:
//! - **Words:** Timestamped words as produced by an external transcriber
//! - **Groups:** Consecutive words shown together for one time interval
//! - **Style:** Base (configured) and active (resolution-scaled) styling
//! - **Geometry:** Aspect-fit transforms and safe-area bounds
//! - **Config:** The full caption configuration surface
//!
//! All pixel values are in output-frame pixels; all times are seconds.

pub mod color;
pub mod config;
pub mod geometry;
pub mod group;
pub mod style;
pub mod video;
pub mod word;

pub use color::*;
pub use config::*;
pub use geometry::*;
pub use group::*;
pub use style::*;
pub use video::*;
pub use word::*;

//! Reelcap Render Engine
//!
//! Turns laid-out caption blocks into transparent RGBA overlays and drives
//! whole caption runs.
//!
//! # Pipeline Architecture
//!
//! ```text
//! words.json ──┐
//!              ├── Group (sequential)
//! source ──────┘         │
//!   │                    ├── Layout ── Rasterize ── Position   (parallel per caption)
//!   └── Aspect plan ─────┘                              │
//!                                                       ▼
//!                                      CaptionImage + interval + placement
//!                                                       │
//!                                                       ▼
//!                                           external compositor/encoder
//! ```

pub mod font;
pub mod pipeline;
pub mod rasterizer;

pub use font::{BlockFont, FontFace, GlyphSource, TrueTypeFont};
pub use pipeline::{CaptionImage, CaptionPipeline, CaptionRun, OverlayEntry};
pub use rasterizer::StrokeShadowRasterizer;

//! promoshot renders app-store promotional images.
//!
//! Each asset is a fixed-size canvas built in four steps:
//!
//! 1. **Background**: a dark base with a blurred glow and translucent bubbles, or a vertical
//!    gradient ([`build_background`]).
//! 2. **Text**: title and optional subtitle, split on line breaks, every line centered on its
//!    own ([`TextEngine`]).
//! 3. **Device**: screenshots only, a rounded bezel with a drop shadow and the resized
//!    screenshot inside it ([`draw_device_frame`]).
//! 4. **Save**: PNG into the set's output directory ([`Processor::process`]).
//!
//! The asset lists and themes are static ([`asset_sets`]). Pixels are premultiplied RGBA8
//! until they are written out.
#![forbid(unsafe_code)]

mod background;
mod config;
mod foundation;
mod frame;
mod pipeline;
mod render;
mod text;

pub use background::{BackgroundStyle, Bubble, DeepSea, build_background, scatter_bubbles};
pub use config::{
    AssetSet, AssetSpec, FONT_PATH, Size, TextMetrics, Theme, Typography, asset_sets,
};
pub use foundation::color::Rgba8;
pub use foundation::error::{PromoError, PromoResult};
pub use foundation::rng::Rng;
pub use frame::{
    FrameFit, FrameStyle, PixelRect, PlacedFrame, composite_device_frame, draw_device_frame,
    screen_size,
};
pub use pipeline::{AssetReport, Processor, RenderedAsset, run_set};
pub use render::canvas::{Canvas, Layer};
pub use render::cpu::{ShapeFill, fill_shapes};
pub use text::font::{FontOrigin, LoadedFont, load_font, system_fallback};
pub use text::layout::{LineBox, ShapedText, TextBlock, TextEngine, stack_lines};

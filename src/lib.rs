//! Glyph rendering backend for terminal grids.
//!
//! This crate decides, once per (font context, code point) pair, the cheapest
//! way to draw a glyph, caches that decision for the lifetime of the font
//! context, shares font contexts between terminal widgets with identical font
//! settings, and batches consecutive glyphs into as few draw calls as
//! possible. Text shaping and painting are delegated to the [`Shaper`] and
//! [`Canvas`] traits; box drawing and block mosaics are drawn from geometry.
//!
//! All types here are confined to the rendering thread. The shared
//! [`FontContextRegistry`] is reference counted with `Rc`, so the compiler
//! rejects any attempt to move it across threads.

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod registry;
pub mod shaping;
pub mod style;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{CodepointCache, FontMetrics, GlyphKind, GlyphRepresentation};
pub use config::GlyphConfig;
pub use draw::{
    BoxDrawing, Canvas, CanvasExt, Color, DisplayList, DrawAttrs, DrawFlags, DrawOp,
    DrawRequest, LocalGraphics, Rect, RunDispatcher,
};
pub use error::{GlyphError, Result};
pub use font::{
    ContextFingerprint, FontDescription, FontStyle, Language, RenderOptions, Resolution, Slant,
    Weight,
};
pub use registry::{CacheHandle, Clock, FontContextRegistry, SystemClock};
pub use shaping::{FontHandle, GlyphInfo, Layout, ScaledFont, ShapedLine, Shaper, SystemShaper};
pub use style::{CellScale, StyleSet, TextMetrics};

//! Boundary with the text shaping engine.
//!
//! The cache never makes shaping decisions itself. It hands one code point
//! (or a fixed probe string) to a [`Layout`] created by a [`Shaper`] and
//! classifies whatever comes back. All geometry crossing this boundary is in
//! 1/64 pixel units; [`px_ceil`] converts to whole device pixels.

mod discovery;
mod system;

pub use discovery::FontIndex;
pub use system::SystemShaper;

use std::fmt;
use std::rc::Rc;

use crate::Result;
use crate::font::{ContextFingerprint, RenderOptions};

/// Fixed-point scale of shaper geometry (1/64 px).
pub const PIXEL_SCALE: i32 = 64;

/// Convert 1/64 px units to whole pixels, rounding up.
pub fn px_ceil(units: i32) -> i32 {
    (units + PIXEL_SCALE - 1).div_euclid(PIXEL_SCALE)
}

/// Identity of a font face within one shaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

struct ScaledFontData {
    font: FontId,
    size_px: f32,
    options: RenderOptions,
}

/// A font face instantiated at a pixel size with rendering options.
///
/// Shared with `Rc`; two handles are the same scaled font only if they point
/// at the same allocation. Batched draw calls require identical handles.
#[derive(Clone)]
pub struct ScaledFont(Rc<ScaledFontData>);

impl ScaledFont {
    pub fn new(font: FontId, size_px: f32, options: RenderOptions) -> Self {
        Self(Rc::new(ScaledFontData {
            font,
            size_px,
            options,
        }))
    }

    pub fn font_id(&self) -> FontId {
        self.0.font
    }

    pub fn size_px(&self) -> f32 {
        self.0.size_px
    }

    pub fn options(&self) -> RenderOptions {
        self.0.options
    }
}

impl PartialEq for ScaledFont {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ScaledFont {}

impl fmt::Debug for ScaledFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledFont")
            .field("font", &self.0.font)
            .field("size_px", &self.0.size_px)
            .finish()
    }
}

struct FontData {
    id: FontId,
    family: String,
    size_px: f32,
    scaled: Option<ScaledFont>,
}

/// A font resolved by the shaper for part of a text.
///
/// `scaled_font` is `None` when the face cannot be drawn through the
/// batched glyph path (the cache then keeps a glyph string instead).
#[derive(Clone)]
pub struct FontHandle(Rc<FontData>);

impl FontHandle {
    pub fn new(
        id: FontId,
        family: impl Into<String>,
        size_px: f32,
        scaled: Option<ScaledFont>,
    ) -> Self {
        Self(Rc::new(FontData {
            id,
            family: family.into(),
            size_px,
            scaled,
        }))
    }

    pub fn id(&self) -> FontId {
        self.0.id
    }

    pub fn family(&self) -> &str {
        &self.0.family
    }

    pub fn size_px(&self) -> f32 {
        self.0.size_px
    }

    pub fn scaled_font(&self) -> Option<&ScaledFont> {
        self.0.scaled.as_ref()
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for FontHandle {}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("id", &self.0.id)
            .field("family", &self.0.family)
            .field("size_px", &self.0.size_px)
            .finish()
    }
}

/// One positioned glyph from the shaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphInfo {
    /// Glyph index within the font (not a code point).
    pub glyph: u32,
    /// Offset from the pen position, 1/64 px.
    pub x_offset: i32,
    pub y_offset: i32,
    /// Horizontal advance, 1/64 px.
    pub advance: i32,
    /// Byte offset of the cluster this glyph belongs to.
    pub cluster: u32,
}

impl GlyphInfo {
    /// Positioned exactly at the pen position.
    pub fn is_at_origin(&self) -> bool {
        self.x_offset == 0 && self.y_offset == 0
    }

    /// Glyph index usable by the batched 16-bit glyph path.
    pub fn index_u16(&self) -> Option<u16> {
        u16::try_from(self.glyph).ok()
    }
}

/// A sequence of glyphs shaped with one font.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    pub font: FontHandle,
    pub glyphs: Vec<GlyphInfo>,
}

/// Result of shaping the layout's current text (first line only; the
/// renderer never shapes text containing line breaks).
#[derive(Debug, Clone, Default)]
pub struct Shaping {
    pub runs: Vec<ShapedRun>,
    /// Logical width, 1/64 px.
    pub width: i32,
    /// Logical line height, 1/64 px.
    pub height: i32,
    /// Distance from the top of the line to the baseline, 1/64 px.
    pub baseline: i32,
    /// Number of glyphs the shaper could not find in any font.
    pub unknown_glyphs: usize,
}

/// A shaped line that owns its runs outright.
///
/// Produced by [`Layout::take_line`], which empties the layout it came from,
/// so the line lives independently of the layout's later reuse.
#[derive(Debug)]
pub struct ShapedLine {
    runs: Vec<ShapedRun>,
    width: i32,
}

impl ShapedLine {
    pub fn new(runs: Vec<ShapedRun>, width: i32) -> Self {
        Self { runs, width }
    }

    pub fn runs(&self) -> &[ShapedRun] {
        &self.runs
    }

    /// Logical width, 1/64 px.
    pub fn width(&self) -> i32 {
        self.width
    }
}

/// A reusable shaping context bound to one font context.
pub trait Layout {
    /// Replace the layout text.
    fn set_text(&mut self, text: &str);

    /// Shape the current text. Results stay valid until the next `set_text`.
    fn shape(&mut self) -> &Shaping;

    /// Move the shaped line out of the layout and reset the layout text to
    /// empty, so nothing in the layout refers to the returned line.
    fn take_line(&mut self) -> ShapedLine;
}

/// Creates layouts for font contexts.
pub trait Shaper {
    /// Build a layout for `context`.
    ///
    /// Fails when no usable font can be resolved; such a context cannot
    /// render anything.
    fn create_layout(&self, context: &ContextFingerprint) -> Result<Box<dyn Layout>>;
}

#[cfg(test)]
mod tests;

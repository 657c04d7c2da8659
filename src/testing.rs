//! Deterministic test doubles: a scriptable shaper and a manual clock.
//!
//! `FakeShaper` maps every code point to the glyph with the same index, in
//! a primary font with a fixed advance per style. Individual code points
//! can be scripted to be missing, to come from a fallback font, or to come
//! from a font without a scaled font. Zero-width characters attach to the
//! preceding glyph with a vertical offset, as combining marks do.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthChar;

use crate::font::{ContextFingerprint, FontStyle, Slant};
use crate::registry::Clock;
use crate::shaping::{
    FontHandle, FontId, GlyphInfo, Layout, ScaledFont, ShapedLine, ShapedRun, Shaper, Shaping,
};
use crate::{GlyphError, Result};

/// Advance of a single-width character in the regular style, pixels.
pub const DEFAULT_ADVANCE: i32 = 10;
/// Line height, pixels.
pub const DEFAULT_HEIGHT: i32 = 20;
/// Baseline from the top of the line, pixels.
pub const DEFAULT_ASCENT: i32 = 16;
/// Vertical offset given to zero-width marks, 1/64 px.
const MARK_OFFSET: i32 = -4 * 64;

#[derive(Default)]
struct FakeState {
    advances: [Option<i32>; 4],
    missing: HashSet<char>,
    fallback: HashSet<char>,
    unscaled: HashSet<char>,
    split: HashSet<char>,
    failing_families: HashSet<String>,
    layouts: Cell<usize>,
    shapes: Cell<usize>,
    next_font: Cell<u32>,
}

impl FakeState {
    fn advance(&self, style: FontStyle) -> i32 {
        self.advances[style.index()]
            .or(self.advances[0])
            .unwrap_or(DEFAULT_ADVANCE)
    }

    fn font_id(&self) -> FontId {
        let id = self.next_font.get();
        self.next_font.set(id + 1);
        FontId(id)
    }
}

/// Scriptable in-memory shaper.
///
/// Clones share their script and counters, so a test can keep one clone
/// for assertions while another is handed to the code under test.
#[derive(Clone, Default)]
pub struct FakeShaper {
    state: Rc<RefCell<FakeState>>,
}

impl FakeShaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance of a single-width character in `style`, pixels. Styles
    /// without their own advance use the regular one.
    #[must_use]
    pub fn with_advance(self, style: FontStyle, px: i32) -> Self {
        self.state.borrow_mut().advances[style.index()] = Some(px);
        self
    }

    /// Code points no font covers; they shape to glyph 0.
    #[must_use]
    pub fn with_missing(self, chars: impl IntoIterator<Item = char>) -> Self {
        self.state.borrow_mut().missing.extend(chars);
        self
    }

    /// Code points only the fallback font covers.
    #[must_use]
    pub fn with_fallback(self, chars: impl IntoIterator<Item = char>) -> Self {
        self.state.borrow_mut().fallback.extend(chars);
        self
    }

    /// Code points served by a font that has no scaled font.
    #[must_use]
    pub fn with_unscaled(self, chars: impl IntoIterator<Item = char>) -> Self {
        self.state.borrow_mut().unscaled.extend(chars);
        self
    }

    /// Code points that need two fonts: a base glyph from the primary font
    /// plus a zero-advance mark from the fallback font.
    #[must_use]
    pub fn with_split(self, chars: impl IntoIterator<Item = char>) -> Self {
        self.state.borrow_mut().split.extend(chars);
        self
    }

    /// Families for which `create_layout` fails.
    #[must_use]
    pub fn with_failing_family(self, family: &str) -> Self {
        self.state
            .borrow_mut()
            .failing_families
            .insert(family.to_owned());
        self
    }

    /// Number of layouts created so far.
    pub fn layouts_created(&self) -> usize {
        self.state.borrow().layouts.get()
    }

    /// Number of shaping passes performed by all layouts so far.
    pub fn shape_calls(&self) -> usize {
        self.state.borrow().shapes.get()
    }
}

impl Shaper for FakeShaper {
    fn create_layout(&self, context: &ContextFingerprint) -> Result<Box<dyn Layout>> {
        let state = self.state.borrow();
        let desc = &context.font;
        if state.failing_families.contains(&desc.family) {
            return Err(GlyphError::NoFontMap {
                family: desc.family.clone(),
            });
        }
        state.layouts.set(state.layouts.get() + 1);

        let style = FontStyle::from_attrs(desc.weight.is_bold(), desc.slant != Slant::Normal);
        let size_px = desc.size_px(context.resolution);
        let font = |name: &str, scaled: bool| {
            let id = state.font_id();
            let scaled = scaled.then(|| ScaledFont::new(id, size_px, context.options));
            FontHandle::new(id, format!("{}{name}", desc.family), size_px, scaled)
        };
        let fonts = [font("", true), font(" Fallback", true), font(" Bitmap", false)];
        let advance = state.advance(style) * 64;

        Ok(Box::new(FakeLayout {
            state: Rc::clone(&self.state),
            fonts,
            advance,
            text: String::new(),
            shaping: Shaping::default(),
            dirty: true,
        }))
    }
}

struct FakeLayout {
    state: Rc<RefCell<FakeState>>,
    /// Primary, fallback, unscaled.
    fonts: [FontHandle; 3],
    advance: i32,
    text: String,
    shaping: Shaping,
    dirty: bool,
}

impl FakeLayout {
    fn compute(&self) -> Shaping {
        let state = self.state.borrow();
        state.shapes.set(state.shapes.get() + 1);

        let mut shaping = Shaping {
            height: DEFAULT_HEIGHT * 64,
            baseline: DEFAULT_ASCENT * 64,
            ..Shaping::default()
        };
        for (offset, c) in self.text.char_indices() {
            let columns = c.width().unwrap_or(1);
            let font = if state.fallback.contains(&c) {
                1
            } else if state.unscaled.contains(&c) {
                2
            } else {
                0
            };
            let glyph = if state.missing.contains(&c) {
                0
            } else {
                u32::from(c)
            };

            let mut info = GlyphInfo {
                glyph,
                x_offset: 0,
                y_offset: 0,
                advance: self.advance * columns as i32,
                cluster: offset as u32,
            };
            if columns == 0 {
                if let Some(last) = shaping.runs.last_mut() {
                    info.y_offset = MARK_OFFSET;
                    info.cluster = last.glyphs.last().map_or(0, |g| g.cluster);
                    last.glyphs.push(info);
                    continue;
                }
                info.y_offset = MARK_OFFSET;
            }

            if glyph == 0 {
                shaping.unknown_glyphs += 1;
            }
            shaping.width += info.advance;
            self.push(&mut shaping, font, info);
            if state.split.contains(&c) {
                let mark = GlyphInfo {
                    advance: 0,
                    y_offset: MARK_OFFSET,
                    ..info
                };
                self.push(&mut shaping, 1, mark);
            }
        }
        shaping
    }

    fn push(&self, shaping: &mut Shaping, font: usize, info: GlyphInfo) {
        match shaping.runs.last_mut() {
            Some(run) if run.font == self.fonts[font] => run.glyphs.push(info),
            _ => shaping.runs.push(ShapedRun {
                font: self.fonts[font].clone(),
                glyphs: vec![info],
            }),
        }
    }
}

impl Layout for FakeLayout {
    fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.dirty = true;
        }
    }

    fn shape(&mut self) -> &Shaping {
        if self.dirty {
            self.shaping = self.compute();
            self.dirty = false;
        }
        &self.shaping
    }

    fn take_line(&mut self) -> ShapedLine {
        self.shape();
        let shaping = std::mem::take(&mut self.shaping);
        self.text.clear();
        self.dirty = true;
        ShapedLine::new(shaping.runs, shaping.width)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

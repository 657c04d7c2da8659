//! The drawing surface the dispatcher paints onto.
//!
//! [`Canvas`] is implemented by the embedding widget. [`DisplayList`] is an
//! implementation that records every call, used by tests and benchmarks and
//! by callers that replay drawing later.

use crate::shaping::{FontHandle, GlyphInfo, ScaledFont, ShapedLine};

/// Stroke width of `draw_rectangle`, pixels.
pub const LINE_WIDTH: f64 = 1.0;

/// 16-bit per channel RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Color {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle from whole-pixel coordinates.
    pub fn from_px(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// How a fill combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Blend over the destination.
    Over,
    /// Replace the destination, alpha included.
    Source,
}

/// One glyph of a batched draw call, at its baseline origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedGlyph {
    pub glyph: u16,
    pub x: i32,
    pub y: i32,
}

/// One path segment. Angles are in radians, clockwise from the positive x
/// axis (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    /// Arc swept counter-clockwise from `start` to `end`.
    ArcNegative {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

/// Vector path, relative to the origin it is drawn at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        let mut path = Self::new();
        if let Some((&(x, y), rest)) = points.split_first() {
            path.move_to(x, y);
            for &(x, y) in rest {
                path.line_to(x, y);
            }
            path.close();
        }
        path
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ops.push(PathOp::MoveTo { x, y });
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ops.push(PathOp::LineTo { x, y });
        self
    }

    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> &mut Self {
        self.ops.push(PathOp::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
        self
    }

    pub fn arc_negative(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    ) -> &mut Self {
        self.ops.push(PathOp::ArcNegative {
            cx,
            cy,
            radius,
            start,
            end,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A surface that can paint glyphs and simple geometry.
///
/// Glyph positions are baseline origins in device pixels. Path coordinates
/// are offset by the `x`/`y` origin passed with them.
pub trait Canvas {
    /// Paint a batch of glyphs from one scaled font in one call.
    fn show_glyphs(
        &mut self,
        font: &ScaledFont,
        glyphs: &[PositionedGlyph],
        color: Color,
        alpha: f64,
    );

    /// Paint a glyph string from one font, pen starting at `x`, `y`.
    fn show_glyph_run(
        &mut self,
        font: &FontHandle,
        glyphs: &[GlyphInfo],
        x: i32,
        y: i32,
        color: Color,
        alpha: f64,
    );

    /// Paint a shaped line whose baseline starts at `x`, `y`.
    fn show_line(&mut self, line: &ShapedLine, x: i32, y: i32, color: Color, alpha: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f64, operator: Operator);

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color, alpha: f64);

    fn fill_path(&mut self, path: &Path, x: f64, y: f64, color: Color, alpha: f64);

    fn stroke_path(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        line_width: f64,
        color: Color,
        alpha: f64,
    );

    /// Restrict painting to `rect` (intersected with any enclosing clip)
    /// until the matching `pop_clip`.
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

/// Terminal drawing primitives built on [`Canvas`].
pub trait CanvasExt: Canvas {
    /// Replace the area with `color` at `alpha`, discarding what was there.
    fn clear(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color, alpha: f64) {
        self.fill_rect(Rect::from_px(x, y, width, height), color, alpha, Operator::Source);
    }

    fn fill_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
        alpha: f64,
    ) {
        self.fill_rect(Rect::from_px(x, y, width, height), color, alpha, Operator::Over);
    }

    /// Outline drawn inside the area, so adjacent rectangles never overlap.
    fn draw_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
        alpha: f64,
    ) {
        let inset = LINE_WIDTH / 2.0;
        let rect = Rect::new(
            f64::from(x) + inset,
            f64::from(y) + inset,
            f64::from(width) - LINE_WIDTH,
            f64::from(height) - LINE_WIDTH,
        );
        self.stroke_rect(rect, LINE_WIDTH, color, alpha);
    }

    /// Line from (`x`, `y`) to (`xp`, `yp`) inclusive, at least `line_width`
    /// pixels thick in each direction.
    fn draw_line(
        &mut self,
        x: i32,
        y: i32,
        xp: i32,
        yp: i32,
        line_width: i32,
        color: Color,
        alpha: f64,
    ) {
        self.fill_rectangle(
            x,
            y,
            line_width.max(xp - x + 1),
            line_width.max(yp - y + 1),
            color,
            alpha,
        );
    }

    fn clip(&mut self, rect: Rect) {
        self.push_clip(rect);
    }

    fn unclip(&mut self) {
        self.pop_clip();
    }
}

impl<C: Canvas + ?Sized> CanvasExt for C {}

/// A recorded [`Canvas`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Glyphs {
        font: ScaledFont,
        glyphs: Vec<PositionedGlyph>,
        color: Color,
        alpha: f64,
    },
    GlyphRun {
        font: FontHandle,
        glyphs: Vec<GlyphInfo>,
        x: i32,
        y: i32,
        color: Color,
        alpha: f64,
    },
    /// A shaped line; only its extent is kept.
    Line {
        runs: usize,
        width: i32,
        x: i32,
        y: i32,
        color: Color,
        alpha: f64,
    },
    FillRect {
        rect: Rect,
        color: Color,
        alpha: f64,
        operator: Operator,
    },
    StrokeRect {
        rect: Rect,
        line_width: f64,
        color: Color,
        alpha: f64,
    },
    FillPath {
        path: Path,
        x: f64,
        y: f64,
        color: Color,
        alpha: f64,
    },
    StrokePath {
        path: Path,
        x: f64,
        y: f64,
        line_width: f64,
        color: Color,
        alpha: f64,
    },
    PushClip(Rect),
    PopClip,
}

impl DrawOp {
    /// Whether this op paints text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Glyphs { .. } | Self::GlyphRun { .. } | Self::Line { .. })
    }
}

/// Canvas that records calls instead of painting.
#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.ops.clear();
    }

    /// Number of recorded text draw calls.
    pub fn text_calls(&self) -> usize {
        self.ops.iter().filter(|op| op.is_text()).count()
    }
}

impl Canvas for DisplayList {
    fn show_glyphs(
        &mut self,
        font: &ScaledFont,
        glyphs: &[PositionedGlyph],
        color: Color,
        alpha: f64,
    ) {
        self.ops.push(DrawOp::Glyphs {
            font: font.clone(),
            glyphs: glyphs.to_vec(),
            color,
            alpha,
        });
    }

    fn show_glyph_run(
        &mut self,
        font: &FontHandle,
        glyphs: &[GlyphInfo],
        x: i32,
        y: i32,
        color: Color,
        alpha: f64,
    ) {
        self.ops.push(DrawOp::GlyphRun {
            font: font.clone(),
            glyphs: glyphs.to_vec(),
            x,
            y,
            color,
            alpha,
        });
    }

    fn show_line(&mut self, line: &ShapedLine, x: i32, y: i32, color: Color, alpha: f64) {
        self.ops.push(DrawOp::Line {
            runs: line.runs().len(),
            width: line.width(),
            x,
            y,
            color,
            alpha,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f64, operator: Operator) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color,
            alpha,
            operator,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color, alpha: f64) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            line_width,
            color,
            alpha,
        });
    }

    fn fill_path(&mut self, path: &Path, x: f64, y: f64, color: Color, alpha: f64) {
        self.ops.push(DrawOp::FillPath {
            path: path.clone(),
            x,
            y,
            color,
            alpha,
        });
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        line_width: f64,
        color: Color,
        alpha: f64,
    ) {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            x,
            y,
            line_width,
            color,
            alpha,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }
}

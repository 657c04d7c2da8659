//! Turning draw requests into as few canvas calls as possible.
//!
//! The [`RunDispatcher`] walks a sequence of cell requests, resolves each
//! code point through the style's [`CodepointCache`](crate::CodepointCache),
//! and accumulates consecutive single glyphs that share a scaled font into
//! one batched `show_glyphs` call. Glyph runs and shaped lines break the
//! batch and are drawn on their own. Box drawing and mosaic code points
//! never reach the cache; they are painted by a [`LocalGraphics`]
//! implementation sized to the cell.

mod builtin;
mod canvas;
mod mirror;
mod undercurl;

pub use builtin::{BoxDrawing, GraphicCell, LocalGraphics, is_local_graphic, is_separable_mosaic};
pub use canvas::{
    Canvas, CanvasExt, Color, DisplayList, DrawOp, LINE_WIDTH, Operator, Path, PathOp,
    PositionedGlyph, Rect,
};
pub use mirror::{mirror, mirror_box, mirror_char};
pub use undercurl::Undercurl;

use std::fmt;

use bitflags::bitflags;

use crate::cache::GlyphKind;
use crate::config::DrawConfig;
use crate::font::FontStyle;
use crate::shaping::ScaledFont;
use crate::style::StyleSet;

bitflags! {
    /// Per-request flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawFlags: u8 {
        /// The cell is in a right-to-left context; draw the mirrored glyph.
        const MIRROR     = 1;
        /// With `MIRROR`, also flip box drawing and block graphics.
        const BOX_MIRROR = 1 << 1;
    }
}

bitflags! {
    /// Attributes applying to a whole `draw_text` call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawAttrs: u8 {
        /// Paint block mosaics as separated (gapped) blocks.
        const SEPARATED_MOSAIC = 1;
    }
}

/// One code point to draw at the top left corner of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub c: char,
    pub x: i32,
    pub y: i32,
    /// Cells covered: 1, or 2 for wide characters.
    pub columns: u16,
    pub flags: DrawFlags,
}

impl DrawRequest {
    pub fn new(c: char, x: i32, y: i32, columns: u16) -> Self {
        Self {
            c,
            x,
            y,
            columns,
            flags: DrawFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DrawFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The code point actually drawn, after mirroring.
    pub fn glyph_char(&self) -> char {
        if self.flags.contains(DrawFlags::MIRROR) {
            mirror(self.c, self.flags.contains(DrawFlags::BOX_MIRROR))
        } else {
            self.c
        }
    }
}

/// Batches glyphs into draw calls.
///
/// Holds only scratch state (the pending batch and the undercurl shape), so
/// one dispatcher can serve any number of style sets.
pub struct RunDispatcher {
    max_run: usize,
    builtin_graphics: bool,
    graphics: Box<dyn LocalGraphics>,
    batch: Vec<PositionedGlyph>,
    batch_font: Option<ScaledFont>,
    undercurl: Option<Undercurl>,
}

impl Default for RunDispatcher {
    fn default() -> Self {
        Self::new(&DrawConfig::default())
    }
}

impl RunDispatcher {
    pub fn new(config: &DrawConfig) -> Self {
        let max_run = config.effective_max_run_length();
        Self {
            max_run,
            builtin_graphics: config.builtin_graphics,
            graphics: Box::new(BoxDrawing),
            batch: Vec::with_capacity(max_run),
            batch_font: None,
            undercurl: None,
        }
    }

    /// Replace the painter used for local graphics.
    #[must_use]
    pub fn with_graphics(mut self, graphics: Box<dyn LocalGraphics>) -> Self {
        self.graphics = graphics;
        self
    }

    pub fn max_run_length(&self) -> usize {
        self.max_run
    }

    /// Draw `requests` in `style`.
    ///
    /// Every glyph sits on the regular face's baseline so mixed styles in a
    /// line share one baseline. All pending glyphs are submitted before
    /// returning.
    pub fn draw_text(
        &mut self,
        canvas: &mut dyn Canvas,
        styles: &StyleSet,
        requests: &[DrawRequest],
        attrs: DrawAttrs,
        color: Color,
        alpha: f64,
        style: FontStyle,
    ) {
        let baseline = styles.spacing().top + styles.normal_metrics().ascent;
        let font_width = styles.metrics(style).width;
        let mut cache = styles.cache(style).borrow_mut();
        self.batch_font = None;

        for request in requests {
            let c = request.glyph_char();

            if self.builtin_graphics && is_local_graphic(c) {
                let cell = GraphicCell {
                    x: request.x,
                    y: request.y,
                    width: styles.cell_width() * i32::from(request.columns),
                    height: styles.cell_height(),
                    font_width,
                };
                self.graphics.draw(canvas, c, cell, attrs, color, alpha);
                continue;
            }

            let rep = cache.classify(c);
            let (left, _) = styles.glyph_edges(rep.width, request.columns);
            let x = request.x + left;
            let y = request.y + baseline;

            match &rep.kind {
                GlyphKind::Single { font, glyph } => {
                    if self.batch_font.as_ref() != Some(font) || self.batch.len() >= self.max_run {
                        self.flush(canvas, color, alpha);
                        self.batch_font = Some(font.clone());
                    }
                    self.batch.push(PositionedGlyph {
                        glyph: *glyph,
                        x,
                        y,
                    });
                }
                GlyphKind::Run { font, glyphs } => {
                    self.flush(canvas, color, alpha);
                    canvas.show_glyph_run(font, glyphs, x, y, color, alpha);
                }
                GlyphKind::Line(line) => {
                    self.flush(canvas, color, alpha);
                    canvas.show_line(line, x, y, color, alpha);
                }
            }
        }

        self.flush(canvas, color, alpha);
    }

    /// Draw one request if `style`'s font has a real glyph for it. Returns
    /// whether anything was drawn.
    pub fn draw_char(
        &mut self,
        canvas: &mut dyn Canvas,
        styles: &StyleSet,
        request: DrawRequest,
        attrs: DrawAttrs,
        color: Color,
        alpha: f64,
        style: FontStyle,
    ) -> bool {
        let drawable = styles.has_char(request.c, style);
        if drawable {
            self.draw_text(canvas, styles, &[request], attrs, color, alpha, style);
        }
        drawable
    }

    /// Submit the pending batch, if any.
    fn flush(&mut self, canvas: &mut dyn Canvas, color: Color, alpha: f64) {
        if self.batch.is_empty() {
            return;
        }
        if let Some(font) = &self.batch_font {
            log::trace!("dispatch: flushing {} glyphs", self.batch.len());
            canvas.show_glyphs(font, &self.batch, color, alpha);
        }
        self.batch.clear();
    }

    /// Stroke a curly underline under `count` cells starting at `x`, with
    /// its top edge at `y`.
    ///
    /// The curl shape is rebuilt only when the cell width or line width
    /// changes.
    pub fn draw_undercurl(
        &mut self,
        canvas: &mut dyn Canvas,
        styles: &StyleSet,
        x: i32,
        y: f64,
        line_width: f64,
        count: usize,
        color: Color,
        alpha: f64,
    ) {
        let cell_width = styles.cell_width();
        if !self
            .undercurl
            .as_ref()
            .is_some_and(|curl| curl.matches(cell_width, line_width))
        {
            log::trace!("dispatch: building undercurl for cell width {cell_width}");
            self.undercurl = None;
        }
        let curl = self
            .undercurl
            .get_or_insert_with(|| Undercurl::new(cell_width, line_width));

        let mut cell_x = x;
        for _ in 0..count {
            canvas.stroke_path(curl.path(), f64::from(cell_x), y, line_width, color, alpha);
            cell_x += cell_width;
        }
    }

    /// The undercurl shape built by the last `draw_undercurl`.
    pub fn undercurl(&self) -> Option<&Undercurl> {
        self.undercurl.as_ref()
    }
}

impl fmt::Debug for RunDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunDispatcher")
            .field("max_run", &self.max_run)
            .field("builtin_graphics", &self.builtin_graphics)
            .field("pending", &self.batch.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;

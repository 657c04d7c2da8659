//! How one code point is drawn in one font context.

use crate::shaping::{FontHandle, GlyphInfo, ScaledFont, ShapedLine};

/// Rendering strategy chosen for a code point, cheapest first.
#[derive(Debug)]
pub enum GlyphKind {
    /// One glyph from one scaled font at the pen position. The only kind
    /// that can be batched with neighbouring glyphs into one draw call.
    Single { font: ScaledFont, glyph: u16 },
    /// Several glyphs (or one with an offset, or an index beyond 16 bits)
    /// from a single font. The glyph string is an owned copy.
    Run {
        font: FontHandle,
        glyphs: Vec<GlyphInfo>,
    },
    /// The code point needed more than one font. The line owns its runs and
    /// is independent of the layout it was shaped in.
    Line(ShapedLine),
}

/// Cached classification of one code point.
#[derive(Debug)]
pub struct GlyphRepresentation {
    pub kind: GlyphKind,
    /// Advance in device pixels, rounded up.
    pub width: i32,
    /// The shaper substituted a missing-glyph box somewhere.
    pub has_unknown_glyphs: bool,
}

impl GlyphRepresentation {
    pub fn is_single(&self) -> bool {
        matches!(self.kind, GlyphKind::Single { .. })
    }

    /// Whether the font actually has a glyph for this code point.
    pub fn has_usable_glyph(&self) -> bool {
        !self.has_unknown_glyphs
    }
}

/// Number of classifications per representation kind, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub single: usize,
    pub run: usize,
    pub line: usize,
    pub unknown: usize,
}

impl Coverage {
    pub(crate) fn record(&mut self, rep: &GlyphRepresentation) {
        match rep.kind {
            GlyphKind::Single { .. } => self.single += 1,
            GlyphKind::Run { .. } => self.run += 1,
            GlyphKind::Line(_) => self.line += 1,
        }
        if rep.has_unknown_glyphs {
            self.unknown += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.single + self.run + self.line
    }
}

//! The four style variants of one widget's font, and the cell box.
//!
//! A [`StyleSet`] acquires one cache per style from the registry. Bold faces
//! whose width strays too far from the upright face they pair with are
//! discarded and the slot aliased, so a terminal never mixes cell widths.
//! The cell box and glyph padding are derived from the regular face.

use crate::Result;
use crate::cache::{CodepointCache, FontMetrics};
use crate::config::StyleConfig;
use crate::draw::is_local_graphic;
use crate::font::{ContextFingerprint, FontStyle};
use crate::registry::{CacheHandle, FontContextRegistry};
use crate::shaping::Shaper;

/// Horizontal and vertical cell scale factors (letter and line spacing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub width: f64,
    pub height: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl CellScale {
    pub fn from_config(config: &StyleConfig) -> Self {
        Self {
            width: config.effective_cell_width_scale(),
            height: config.effective_cell_height_scale(),
        }
    }
}

/// Padding between the glyph box and the cell box. Odd remainders put the
/// extra pixel on the right and on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacing {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// Cell box and vertical font metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub cell_width: i32,
    pub cell_height: i32,
    /// Regular face ascent; every style draws on this baseline.
    pub ascent: i32,
    pub descent: i32,
    pub spacing: Spacing,
}

/// Regular, bold, italic and bold-italic caches for one widget.
///
/// Rejected bold faces share the cache of the face they were measured
/// against; each distinct cache is held by exactly one handle, so teardown
/// releases every acquisition once.
#[derive(Debug)]
pub struct StyleSet {
    /// Distinct caches, regular first.
    handles: Vec<CacheHandle>,
    /// Index into `handles` serving each style.
    slots: [usize; 4],
    normal: FontMetrics,
    text: TextMetrics,
}

impl StyleSet {
    /// Acquire caches for all four styles of `base` and derive the cell box.
    ///
    /// On error every handle acquired so far is released again.
    pub fn build(
        registry: &FontContextRegistry,
        shaper: &dyn Shaper,
        base: &ContextFingerprint,
        config: &StyleConfig,
    ) -> Result<Self> {
        let mut acquired: [Option<CacheHandle>; 4] = Default::default();
        for style in FontStyle::ALL {
            let fingerprint = base.with_font(base.font.for_style(style));
            let handle = registry.acquire(&fingerprint, || {
                CodepointCache::for_context(shaper, &fingerprint)
            })?;
            acquired[style.index()] = Some(handle);
        }

        let width_of = |acquired: &[Option<CacheHandle>; 4], style: FontStyle| {
            acquired[style.index()]
                .as_ref()
                .map_or(1, |handle| handle.metrics().width)
        };
        let mut alias = [0, 1, 2, 3];
        for bold in [FontStyle::Bold, FontStyle::BoldItalic] {
            let upright = bold.without_bold();
            let ratio = width_of(&acquired, bold) * 100 / width_of(&acquired, upright).max(1);
            if (ratio - 100).unsigned_abs() > config.bold_width_tolerance {
                log::debug!("style set: rejecting {bold:?} face ({ratio}% of {upright:?})");
                acquired[bold.index()] = None;
                alias[bold.index()] = upright.index();
            }
        }

        let mut position = [0; 4];
        let mut handles = Vec::with_capacity(4);
        for (i, handle) in acquired.into_iter().enumerate() {
            if let Some(handle) = handle {
                position[i] = handles.len();
                handles.push(handle);
            }
        }
        let slots = alias.map(|target| position[target]);

        let normal = handles[0].metrics();
        let text = cell_box(normal, CellScale::from_config(config));
        Ok(Self {
            handles,
            slots,
            normal,
            text,
        })
    }

    /// Replace this set with one built for `base`.
    ///
    /// The new caches are acquired before the old ones are released, so a
    /// failure leaves the current set in place and an unchanged font is
    /// never rebuilt.
    pub fn rebuild(
        &mut self,
        registry: &FontContextRegistry,
        shaper: &dyn Shaper,
        base: &ContextFingerprint,
        config: &StyleConfig,
    ) -> Result<()> {
        *self = Self::build(registry, shaper, base, config)?;
        Ok(())
    }

    /// The cache serving `style`.
    pub fn cache(&self, style: FontStyle) -> &CacheHandle {
        &self.handles[self.slots[style.index()]]
    }

    /// Whether two styles are served by the same cache.
    pub fn shares_cache(&self, a: FontStyle, b: FontStyle) -> bool {
        self.slots[a.index()] == self.slots[b.index()]
    }

    /// Number of distinct caches held.
    pub fn distinct_caches(&self) -> usize {
        self.handles.len()
    }

    pub fn metrics(&self, style: FontStyle) -> FontMetrics {
        self.cache(style).metrics()
    }

    /// Metrics of the regular face.
    pub fn normal_metrics(&self) -> FontMetrics {
        self.normal
    }

    pub fn text_metrics(&self) -> TextMetrics {
        self.text
    }

    pub fn cell_width(&self) -> i32 {
        self.text.cell_width
    }

    pub fn cell_height(&self) -> i32 {
        self.text.cell_height
    }

    pub fn spacing(&self) -> Spacing {
        self.text.spacing
    }

    /// Whether `style`'s font has a real glyph for `c`.
    pub fn has_char(&self, c: char, style: FontStyle) -> bool {
        self.cache(style).borrow_mut().has_char(c)
    }

    /// Left and right edge of `c` drawn in `style` over `columns` cells,
    /// relative to the left edge of its first cell. Locally drawn graphics
    /// cover the whole cell box.
    pub fn char_edges(&self, c: char, columns: u16, style: FontStyle) -> (i32, i32) {
        if is_local_graphic(c) {
            return (0, self.text.cell_width * i32::from(columns));
        }
        let width = self.cache(style).borrow_mut().classify(c).width;
        self.glyph_edges(width, columns)
    }

    /// Horizontal placement of a glyph `width` pixels wide over `columns`
    /// cells.
    ///
    /// Glyphs no wider than the regular face sit after half the letter
    /// spacing (a full spacing for double-width cells). Wider glyphs that
    /// still fit the cell box are centred. Anything wider starts at the
    /// cell's left edge and overflows to the right.
    pub fn glyph_edges(&self, width: i32, columns: u16) -> (i32, i32) {
        let columns = i32::from(columns);
        let normal_width = self.normal.width * columns;
        let fits_width = self.text.cell_width * columns;
        let spacing = self.text.spacing;

        let left = if width <= normal_width {
            spacing.left + if columns == 2 { spacing.right } else { 0 }
        } else if width <= fits_width {
            (fits_width - width) / 2
        } else {
            0
        };
        (left, left + width)
    }
}

/// Scale the regular face's box into the cell box and split the difference
/// into padding.
fn cell_box(normal: FontMetrics, scale: CellScale) -> TextMetrics {
    let cell_width = (f64::from(normal.width) * scale.width) as i32;
    let cell_height = (f64::from(normal.height) * scale.height) as i32;
    TextMetrics {
        cell_width,
        cell_height,
        ascent: normal.ascent,
        descent: normal.height - normal.ascent,
        spacing: Spacing {
            left: (cell_width - normal.width) / 2,
            right: (cell_width - normal.width + 1) / 2,
            top: (cell_height - normal.height + 1) / 2,
            bottom: (cell_height - normal.height) / 2,
        },
    }
}

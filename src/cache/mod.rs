//! Per-font-context code point cache.
//!
//! Each code point is shaped at most once per cache. The result is reduced
//! to the cheapest [`GlyphRepresentation`] that reproduces it and kept for
//! the cache's lifetime: code points below [`INLINE_SLOTS`] live in a fixed
//! array, everything else in a hash map.
//!
//! Construction measures the font (widest printable ASCII character, line
//! height, ascent) and then pre-populates the ASCII slots from a single
//! shaping call over a space-separated probe string.

mod glyph;

pub use glyph::{Coverage, GlyphKind, GlyphRepresentation};

use std::collections::HashMap;

use crate::Result;
use crate::font::{ContextFingerprint, Language};
use crate::shaping::{GlyphInfo, Layout, ScaledFont, ShapedRun, Shaper, px_ceil};

/// Number of code points resolved through the inline array.
pub const INLINE_SLOTS: usize = 128;

/// Printable ASCII, space separated so the shaper cannot form ligatures.
const PROBE: &str = "  ! \" # $ % & ' ( ) * + , - . / 0 1 2 3 4 5 6 7 8 9 : ; < = > ? @ \
A B C D E F G H I J K L M N O P Q R S T U V W X Y Z [ \\ ] ^ _ ` \
a b c d e f g h i j k l m n o p q r s t u v w x y z { | } ~ ";

/// Font metrics in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Widest printable ASCII character.
    pub width: i32,
    /// Tallest printable ASCII character's line box.
    pub height: i32,
    /// Baseline offset from the top of the line box.
    pub ascent: i32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            ascent: 0,
        }
    }
}

/// Code point → representation cache for one font context.
pub struct CodepointCache {
    layout: Box<dyn Layout>,
    inline: [Option<GlyphRepresentation>; INLINE_SLOTS],
    other: HashMap<char, GlyphRepresentation>,
    metrics: FontMetrics,
    coverage: Coverage,
    latin: bool,
}

impl CodepointCache {
    /// Build a cache around `layout`: measure metrics, then precache ASCII.
    pub fn new(layout: Box<dyn Layout>, language: &Language) -> Self {
        let mut cache = Self {
            layout,
            inline: std::array::from_fn(|_| None),
            other: HashMap::new(),
            metrics: FontMetrics::default(),
            coverage: Coverage::default(),
            latin: language.uses_latin_script(),
        };
        cache.metrics = measure(cache.layout.as_mut());
        let precached = cache.precache_ascii();
        log::debug!(
            "glyph cache: metrics {:?}, {precached} ASCII glyphs precached",
            cache.metrics
        );
        cache
    }

    /// Create the shaper layout for `context` and build a cache around it.
    ///
    /// Fails if the shaper cannot produce a usable font for the context.
    pub fn for_context(shaper: &dyn Shaper, context: &ContextFingerprint) -> Result<Self> {
        let layout = shaper.create_layout(context)?;
        Ok(Self::new(layout, &context.language))
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Number of classified code points.
    pub fn len(&self) -> usize {
        self.inline.iter().flatten().count() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached classification of `c`, without shaping on a miss.
    pub fn cached(&self, c: char) -> Option<&GlyphRepresentation> {
        match inline_index(c) {
            Some(i) => self.inline[i].as_ref(),
            None => self.other.get(&c),
        }
    }

    /// Classify `c`, shaping it on first use.
    ///
    /// Repeated calls return the stored representation without touching the
    /// shaper.
    pub fn classify(&mut self, c: char) -> &GlyphRepresentation {
        let Self {
            layout,
            inline,
            other,
            coverage,
            ..
        } = self;
        let shape = || {
            let rep = shape_code_point(layout.as_mut(), c);
            coverage.record(&rep);
            log::trace!("glyph cache: classified {c:?} as {:?}", rep.kind);
            rep
        };
        match inline_index(c) {
            Some(i) => inline[i].get_or_insert_with(shape),
            None => other.entry(c).or_insert_with(shape),
        }
    }

    /// Whether the font has a real glyph for `c` (no missing-glyph box).
    pub fn has_char(&mut self, c: char) -> bool {
        self.classify(c).has_usable_glyph()
    }

    /// Populate the ASCII slots from one shaping call over the probe string.
    ///
    /// Only clusters that are exactly one byte, one glyph at the pen
    /// position with a 16-bit index are stored; slots that are already
    /// classified are left alone. For languages not written in Latin only
    /// letters are stored, leaving shared punctuation to per-character
    /// shaping. Returns the number of slots filled.
    pub fn precache_ascii(&mut self) -> usize {
        let Self {
            layout,
            inline,
            coverage,
            latin,
            ..
        } = self;
        with_text(layout.as_mut(), PROBE, |layout| {
            let shaping = layout.shape();
            if shaping.unknown_glyphs != 0 {
                return 0;
            }
            let [run] = shaping.runs.as_slice() else {
                return 0;
            };
            let Some(font) = run.font.scaled_font() else {
                return 0;
            };

            let mut filled = 0;
            for (glyph, text) in single_glyph_clusters(&run.glyphs, PROBE) {
                let (Some(index), [byte]) = (glyph.index_u16(), text.as_bytes()) else {
                    continue;
                };
                let c = char::from(*byte);
                if !glyph.is_at_origin() || (!*latin && !c.is_ascii_alphabetic()) {
                    continue;
                }
                let slot = &mut inline[usize::from(*byte)];
                if slot.is_some() {
                    continue;
                }
                let rep = GlyphRepresentation {
                    kind: GlyphKind::Single {
                        font: font.clone(),
                        glyph: index,
                    },
                    width: px_ceil(glyph.advance),
                    has_unknown_glyphs: false,
                };
                coverage.record(&rep);
                *slot = Some(rep);
                filled += 1;
            }
            filled
        })
    }
}

impl Drop for CodepointCache {
    fn drop(&mut self) {
        let c = self.coverage;
        log::debug!(
            "glyph cache: dropped after {} classifications ({} single, {} run, {} line, {} unknown)",
            c.total(),
            c.single,
            c.run,
            c.line,
            c.unknown
        );
    }
}

fn inline_index(c: char) -> Option<usize> {
    let i = c as usize;
    (i < INLINE_SLOTS).then_some(i)
}

/// Run `f` with `text` loaded into `layout`; the layout is emptied before
/// and after so no text leaks between uses.
fn with_text<R>(layout: &mut dyn Layout, text: &str, f: impl FnOnce(&mut dyn Layout) -> R) -> R {
    layout.set_text("");
    layout.set_text(text);
    let result = f(&mut *layout);
    layout.set_text("");
    result
}

/// Widest and tallest printable ASCII character, each measured on its own.
/// The ascent comes from the probe string's baseline.
fn measure(layout: &mut dyn Layout) -> FontMetrics {
    let ascent = with_text(layout, PROBE, |layout| px_ceil(layout.shape().baseline));
    let mut metrics = FontMetrics {
        ascent,
        ..FontMetrics::default()
    };
    let mut buf = [0u8; 4];
    for c in '!'..='~' {
        with_text(layout, c.encode_utf8(&mut buf), |layout| {
            let shaping = layout.shape();
            metrics.width = metrics.width.max(px_ceil(shaping.width));
            metrics.height = metrics.height.max(px_ceil(shaping.height));
        });
    }
    metrics
}

fn shape_code_point(layout: &mut dyn Layout, c: char) -> GlyphRepresentation {
    let mut buf = [0u8; 4];
    with_text(layout, c.encode_utf8(&mut buf), |layout| {
        let shaping = layout.shape();
        let width = px_ceil(shaping.width);
        let has_unknown_glyphs = shaping.unknown_glyphs != 0;

        let [run] = shaping.runs.as_slice() else {
            return GlyphRepresentation {
                kind: GlyphKind::Line(layout.take_line()),
                width,
                has_unknown_glyphs,
            };
        };
        let kind = match single_glyph(run) {
            Some((font, glyph)) if !has_unknown_glyphs => GlyphKind::Single { font, glyph },
            _ => GlyphKind::Run {
                font: run.font.clone(),
                glyphs: run.glyphs.clone(),
            },
        };
        GlyphRepresentation {
            kind,
            width,
            has_unknown_glyphs,
        }
    })
}

/// The run's scaled font and glyph index if it is one 16-bit glyph at the
/// pen position.
fn single_glyph(run: &ShapedRun) -> Option<(ScaledFont, u16)> {
    match run.glyphs.as_slice() {
        [glyph] if glyph.is_at_origin() => {
            Some((run.font.scaled_font()?.clone(), glyph.index_u16()?))
        }
        _ => None,
    }
}

/// Clusters of `glyphs` that consist of exactly one glyph, paired with the
/// text they cover. Cluster values are byte offsets into `text`.
fn single_glyph_clusters<'a>(
    glyphs: &'a [GlyphInfo],
    text: &'a str,
) -> impl Iterator<Item = (&'a GlyphInfo, &'a str)> {
    let mut consumed = 0;
    glyphs
        .chunk_by(|a, b| a.cluster == b.cluster)
        .filter_map(move |cluster| {
            consumed += cluster.len();
            let [glyph] = cluster else {
                return None;
            };
            let end = glyphs
                .get(consumed)
                .map_or(text.len(), |next| next.cluster as usize);
            Some((glyph, text.get(glyph.cluster as usize..end)?))
        })
}

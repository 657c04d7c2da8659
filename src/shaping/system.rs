//! `rustybuzz`-backed shaper over fonts found on disk.
//!
//! Text is segmented into runs by face coverage (primary first, then the
//! fallback chain), each run is shaped independently, and positions are
//! converted to 1/64 px. Zero-width marks stay with the preceding run when
//! its face covers them, so a base + combining mark shapes as one cluster.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use unicode_width::UnicodeWidthChar;

use super::discovery::FontIndex;
use super::{
    FontHandle, FontId, GlyphInfo, Layout, ScaledFont, ShapedLine, ShapedRun, Shaper, Shaping,
};
use crate::font::{ContextFingerprint, FontStyle, Slant};
use crate::{GlyphError, Result};

/// Raw font bytes plus the metrics needed without re-parsing.
struct FaceData {
    id: FontId,
    path: PathBuf,
    bytes: Vec<u8>,
    units_per_em: f32,
    ascender: i16,
    descender: i16,
    line_gap: i16,
}

impl FaceData {
    fn load(id: FontId, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| GlyphError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let face = rustybuzz::Face::from_slice(&bytes, 0).ok_or_else(|| GlyphError::FontParse {
            path: path.to_path_buf(),
        })?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let (ascender, descender, line_gap) = (face.ascender(), face.descender(), face.line_gap());
        Ok(Self {
            id,
            path: path.to_path_buf(),
            bytes,
            units_per_em,
            ascender,
            descender,
            line_gap,
        })
    }

    /// Transient face borrowing the stored bytes.
    fn face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.bytes, 0)
    }

    fn family(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_owned()
    }
}

/// Shaper that resolves fonts through a [`FontIndex`] and shapes with
/// `rustybuzz`.
///
/// Loaded faces are kept for the shaper's lifetime, so creating further
/// layouts for the same files costs no I/O.
pub struct SystemShaper {
    index: FontIndex,
    faces: RefCell<HashMap<PathBuf, Rc<FaceData>>>,
    next_id: Cell<u32>,
    features: Vec<rustybuzz::Feature>,
}

impl Default for SystemShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemShaper {
    /// Shaper over the platform font directories.
    pub fn new() -> Self {
        Self::with_index(FontIndex::scan())
    }

    pub fn with_index(index: FontIndex) -> Self {
        Self {
            index,
            faces: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            features: Vec::new(),
        }
    }

    /// Apply OpenType feature settings (`"calt"`, `"-liga"`) to every layout.
    #[must_use]
    pub fn with_features(mut self, features: &[String]) -> Self {
        self.features = parse_features(features);
        self
    }

    pub fn index(&self) -> &FontIndex {
        &self.index
    }

    fn load(&self, path: &Path) -> Result<Rc<FaceData>> {
        if let Some(face) = self.faces.borrow().get(path) {
            return Ok(Rc::clone(face));
        }
        let id = FontId(self.next_id.get());
        let face = Rc::new(FaceData::load(id, path)?);
        self.next_id.set(id.0 + 1);
        log::debug!("shaper: loaded {} as {id:?}", path.display());
        self.faces
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&face));
        Ok(face)
    }
}

impl Shaper for SystemShaper {
    fn create_layout(&self, context: &ContextFingerprint) -> Result<Box<dyn Layout>> {
        let desc = &context.font;
        let style = FontStyle::from_attrs(desc.weight.is_bold(), desc.slant != Slant::Normal);
        let path = self
            .index
            .resolve(&desc.family, style)
            .ok_or_else(|| GlyphError::NoFontMap {
                family: desc.family.clone(),
            })?;
        let primary = self.load(&path)?;

        let mut faces = vec![primary];
        for fallback in self.index.fallback_paths() {
            if fallback == path {
                continue;
            }
            match self.load(&fallback) {
                Ok(face) => faces.push(face),
                Err(e) => log::warn!("shaper: skipping fallback font: {e}"),
            }
        }

        let size_px = desc.size_px(context.resolution);
        let language = context
            .language
            .as_str()
            .parse::<rustybuzz::Language>()
            .ok();
        let faces = faces
            .into_iter()
            .map(|data| {
                let scaled = ScaledFont::new(data.id, size_px, context.options);
                let handle = FontHandle::new(data.id, data.family(), size_px, Some(scaled));
                LayoutFace { data, handle }
            })
            .collect();

        Ok(Box::new(BuzzLayout {
            faces,
            size_px,
            language,
            features: self.features.clone(),
            text: String::new(),
            shaping: Shaping::default(),
            dirty: true,
        }))
    }
}

/// Parse feature strings into rustybuzz features.
///
/// Each string is a 4-char OpenType tag, optionally prefixed with `-` to
/// disable. Invalid tags are skipped.
pub(crate) fn parse_features(strings: &[String]) -> Vec<rustybuzz::Feature> {
    strings
        .iter()
        .filter_map(|s| {
            let (tag_str, value) = s.strip_prefix('-').map_or((s.as_str(), 1), |rest| (rest, 0));
            let Ok(bytes) = <[u8; 4]>::try_from(tag_str.as_bytes()) else {
                log::warn!("shaper: ignoring invalid feature tag: {s}");
                return None;
            };
            let tag = rustybuzz::ttf_parser::Tag::from_bytes(&bytes);
            Some(rustybuzz::Feature::new(tag, value, ..))
        })
        .collect()
}

struct LayoutFace {
    data: Rc<FaceData>,
    handle: FontHandle,
}

/// Text of one face-coverage segment; `start` is its byte offset in the
/// layout text.
struct Segment {
    face: usize,
    start: u32,
    text: String,
}

struct BuzzLayout {
    /// Primary face first, then fallbacks. Never empty.
    faces: Vec<LayoutFace>,
    size_px: f32,
    language: Option<rustybuzz::Language>,
    features: Vec<rustybuzz::Feature>,
    text: String,
    shaping: Shaping,
    dirty: bool,
}

impl BuzzLayout {
    fn compute(&self) -> Shaping {
        let faces: Vec<Option<rustybuzz::Face<'_>>> =
            self.faces.iter().map(|f| f.data.face()).collect();

        let primary = &self.faces[0].data;
        let scale = self.size_px / primary.units_per_em;
        let line_height = i32::from(primary.ascender) - i32::from(primary.descender)
            + i32::from(primary.line_gap);
        let mut shaping = Shaping {
            height: to_q6(line_height as f32 * scale),
            baseline: to_q6(f32::from(primary.ascender) * scale),
            ..Shaping::default()
        };

        for segment in segment_by_face(&self.text, &faces) {
            let Some(face) = faces[segment.face].as_ref() else {
                continue;
            };
            let mut buffer = rustybuzz::UnicodeBuffer::new();
            buffer.push_str(&segment.text);
            buffer.set_direction(rustybuzz::Direction::LeftToRight);
            if let Some(language) = &self.language {
                buffer.set_language(language.clone());
            }

            let output = rustybuzz::shape(face, &self.features, buffer);
            let scale = self.size_px / self.faces[segment.face].data.units_per_em;
            let glyphs: Vec<GlyphInfo> = output
                .glyph_infos()
                .iter()
                .zip(output.glyph_positions())
                .map(|(info, pos)| GlyphInfo {
                    glyph: info.glyph_id,
                    x_offset: to_q6(pos.x_offset as f32 * scale),
                    y_offset: to_q6(pos.y_offset as f32 * scale),
                    advance: to_q6(pos.x_advance as f32 * scale),
                    cluster: segment.start + info.cluster,
                })
                .collect();

            shaping.unknown_glyphs += glyphs.iter().filter(|g| g.glyph == 0).count();
            shaping.width += glyphs.iter().map(|g| g.advance).sum::<i32>();
            shaping.runs.push(ShapedRun {
                font: self.faces[segment.face].handle.clone(),
                glyphs,
            });
        }
        shaping
    }
}

impl Layout for BuzzLayout {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.dirty = true;
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

fn to_q6(px: f32) -> i32 {
    (px * 64.0).round() as i32
}

fn covers(faces: &[Option<rustybuzz::Face<'_>>], face: usize, c: char) -> bool {
    faces
        .get(face)
        .and_then(Option::as_ref)
        .is_some_and(|f| f.glyph_index(c).is_some())
}

/// First face covering `c`; the primary face when none does (it then
/// produces `.notdef`, which the caller counts as unknown).
fn face_for_char(faces: &[Option<rustybuzz::Face<'_>>], c: char) -> usize {
    (0..faces.len()).find(|&i| covers(faces, i, c)).unwrap_or(0)
}

fn segment_by_face(text: &str, faces: &[Option<rustybuzz::Face<'_>>]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for (offset, c) in text.char_indices() {
        let zero_width = c.width() == Some(0);
        let face = match segments.last() {
            Some(seg) if zero_width && covers(faces, seg.face, c) => seg.face,
            _ => face_for_char(faces, c),
        };
        match segments.last_mut() {
            Some(seg) if seg.face == face => seg.text.push(c),
            _ => segments.push(Segment {
                face,
                start: offset as u32,
                text: c.to_string(),
            }),
        }
    }
    segments
}

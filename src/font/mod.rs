//! Font descriptions, style variants, and the rendering-context fingerprint.
//!
//! A [`ContextFingerprint`] captures every input that influences how a code
//! point is shaped: resolution, font description, rendering options,
//! language, and the font configuration generation. Two fingerprints that
//! compare equal produce identical glyph decisions, which is what lets the
//! registry share one cache between them.

mod context;

pub use context::{
    Antialias, ContextFingerprint, Hinting, Language, RenderOptions, Resolution, SubpixelOrder,
};

use serde::{Deserialize, Serialize};

/// Fixed-point scale for font sizes (1/64 point, like FreeType's 26.6).
pub const SIZE_SCALE: u32 = 64;

/// The four style variants a terminal cell can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular = 0,
    Bold = 1,
    Italic = 2,
    BoldItalic = 3,
}

impl FontStyle {
    /// All variants, indexed by discriminant.
    pub const ALL: [Self; 4] = [Self::Regular, Self::Bold, Self::Italic, Self::BoldItalic];

    /// Map bold/italic attributes to the appropriate style.
    pub fn from_attrs(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => Self::BoldItalic,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (false, false) => Self::Regular,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }

    /// Slot index within a four-entry style table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The non-bold style this variant is measured against when deciding
    /// whether its bold face is acceptable.
    pub fn without_bold(self) -> Self {
        Self::from_attrs(false, self.is_italic())
    }
}

/// Font weight on the usual 100–900 CSS/OpenType scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Weight(pub u16);

impl Weight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);

    pub fn is_bold(self) -> bool {
        self.0 >= 600
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// A requested font: family, size, weight, and slant.
///
/// Size is stored in 1/64 points so the description hashes and compares
/// exactly, without floating point equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontDescription {
    pub family: String,
    /// Size in 1/64 points.
    pub size_q6: u32,
    pub weight: Weight,
    pub slant: Slant,
}

impl FontDescription {
    /// Create a regular-weight, upright description at `size_pt` points.
    pub fn new(family: impl Into<String>, size_pt: f32) -> Self {
        Self {
            family: family.into(),
            size_q6: size_to_q6(size_pt),
            weight: Weight::NORMAL,
            slant: Slant::Normal,
        }
    }

    /// Size in points.
    pub fn size_pt(&self) -> f32 {
        self.size_q6 as f32 / SIZE_SCALE as f32
    }

    /// Pixel size at the given resolution.
    pub fn size_px(&self, resolution: Resolution) -> f32 {
        self.size_pt() * resolution.dpi() as f32 / 72.0
    }

    #[must_use]
    pub fn with_weight(&self, weight: Weight) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_slant(&self, slant: Slant) -> Self {
        Self {
            slant,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_size(&self, size_pt: f32) -> Self {
        Self {
            size_q6: size_to_q6(size_pt),
            ..self.clone()
        }
    }

    /// Derive the description for a style variant. Only weight and slant
    /// change; bold-italic is the bold description with an italic slant.
    #[must_use]
    pub fn for_style(&self, style: FontStyle) -> Self {
        let mut desc = self.clone();
        if style.is_bold() {
            desc.weight = Weight::BOLD;
        }
        if style.is_italic() {
            desc.slant = Slant::Italic;
        }
        desc
    }
}

fn size_to_q6(size_pt: f32) -> u32 {
    (size_pt.max(0.0) * SIZE_SCALE as f32).round() as u32
}

#[cfg(test)]
mod tests;

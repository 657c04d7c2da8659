//! Rendering-context fingerprint: the key under which font caches are shared.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::FontDescription;

/// Output resolution in dots per inch.
///
/// Compared and hashed by bit pattern, so two contexts share a cache only if
/// their resolutions are exactly equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Resolution(f64);

impl Resolution {
    pub const DEFAULT: Self = Self(96.0);

    pub fn new(dpi: f64) -> Self {
        // Adding 0.0 turns -0.0 into 0.0 so equal values share one bit pattern.
        Self(dpi + 0.0)
    }

    pub fn dpi(self) -> f64 {
        self.0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for Resolution {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Resolution {}

impl Hash for Resolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Antialiasing mode requested from the rasterizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antialias {
    #[default]
    Default,
    None,
    Gray,
    Subpixel,
}

/// Outline hinting strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hinting {
    #[default]
    Default,
    None,
    Slight,
    Medium,
    Full,
}

/// LCD subpixel layout, used only for subpixel antialiasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubpixelOrder {
    #[default]
    Default,
    Rgb,
    Bgr,
    Vrgb,
    Vbgr,
}

/// Font rendering options. Always present in a fingerprint (the defaults
/// stand in for "whatever the rasterizer prefers").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub antialias: Antialias,
    pub hinting: Hinting,
    pub subpixel_order: SubpixelOrder,
    pub hint_metrics: bool,
}

/// Languages whose default script is not Latin.
const NON_LATIN_LANGUAGES: &[&str] = &[
    "am", "ar", "as", "be", "bg", "bn", "bo", "dz", "el", "fa", "gu", "he", "hi", "hy", "iu", "ja",
    "ka", "kk", "km", "kn", "ko", "ky", "lo", "mk", "ml", "mn", "mr", "my", "ne", "or", "pa", "ps",
    "ru", "sa", "si", "sr", "ta", "te", "tg", "th", "ti", "tt", "ug", "uk", "ur", "yi", "zh",
];

/// A normalized language tag such as `en-us` or `ja`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language(String);

impl Language {
    /// Normalize a tag: lowercase, `_` becomes `-`, and any POSIX encoding
    /// or modifier suffix (`.UTF-8`, `@euro`) is dropped.
    pub fn new(tag: &str) -> Self {
        let tag = tag.split(['.', '@']).next().unwrap_or_default();
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        if tag.is_empty() || tag == "c" || tag == "posix" {
            return Self::default();
        }
        Self(tag)
    }

    /// The language of the process locale (`LC_ALL`, `LC_CTYPE`, `LANG`).
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .map_or_else(Self::default, |value| Self::new(&value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag (`en` for `en-us`).
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Whether this language is normally written in the Latin script.
    pub fn uses_latin_script(&self) -> bool {
        !NON_LATIN_LANGUAGES.contains(&self.primary())
    }
}

impl Default for Language {
    fn default() -> Self {
        Self("en".to_owned())
    }
}

/// Everything that determines how a code point is shaped.
///
/// Equality and hashing are structural over all five fields: independently
/// created contexts with identical visual parameters collapse onto one
/// cache. `config_generation` changes whenever the system font
/// configuration is reloaded, which retires caches built from stale fonts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextFingerprint {
    pub resolution: Resolution,
    pub font: FontDescription,
    pub options: RenderOptions,
    pub language: Language,
    pub config_generation: u32,
}

impl ContextFingerprint {
    /// Fingerprint with default resolution, options, and language.
    pub fn new(font: FontDescription) -> Self {
        Self {
            resolution: Resolution::DEFAULT,
            font,
            options: RenderOptions::default(),
            language: Language::default(),
            config_generation: 0,
        }
    }

    /// Same context with a different font description.
    #[must_use]
    pub fn with_font(&self, font: FontDescription) -> Self {
        Self {
            font,
            ..self.clone()
        }
    }
}

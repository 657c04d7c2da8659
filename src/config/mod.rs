//! Tunable policy knobs for caching, style selection, and drawing.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default delay before an unused font context is destroyed.
pub const DEFAULT_EVICTION_DELAY_MS: u64 = 30_000;

/// Default maximum number of glyphs submitted in one batched draw call.
pub const DEFAULT_MAX_RUN_LENGTH: usize = 100;

/// Default bold/normal width mismatch (percent) above which bold is rejected.
pub const DEFAULT_BOLD_WIDTH_TOLERANCE: u32 = 10;

const MIN_CELL_SCALE: f64 = 1.0;
const MAX_CELL_SCALE: f64 = 2.0;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub cache: CacheConfig,
    pub style: StyleConfig,
    pub draw: DrawConfig,
}

/// Font context registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an unreferenced font context survives before destruction.
    ///
    /// A widget recreated (or zoomed back) within this window reuses the
    /// existing cache instead of re-measuring the font.
    pub eviction_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            eviction_delay_ms: DEFAULT_EVICTION_DELAY_MS,
        }
    }
}

impl CacheConfig {
    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }
}

/// Style variant selection and cell geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Maximum width difference (percent) between a bold face and its
    /// normal counterpart before the bold face is replaced by the normal one.
    pub bold_width_tolerance: u32,
    /// Horizontal cell scale applied to the measured glyph width.
    pub cell_width_scale: f64,
    /// Vertical cell scale applied to the measured line height.
    pub cell_height_scale: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bold_width_tolerance: DEFAULT_BOLD_WIDTH_TOLERANCE,
            cell_width_scale: 1.0,
            cell_height_scale: 1.0,
        }
    }
}

impl StyleConfig {
    /// Returns `cell_width_scale` clamped to [1.0, 2.0].
    pub fn effective_cell_width_scale(&self) -> f64 {
        self.cell_width_scale.clamp(MIN_CELL_SCALE, MAX_CELL_SCALE)
    }

    /// Returns `cell_height_scale` clamped to [1.0, 2.0].
    pub fn effective_cell_height_scale(&self) -> f64 {
        self.cell_height_scale.clamp(MIN_CELL_SCALE, MAX_CELL_SCALE)
    }
}

/// Run dispatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Maximum glyphs per batched draw call. Long batches make some
    /// rasterizers allocate temporary arrays, so runs are split.
    pub max_run_length: usize,
    /// Draw box drawing, block elements, and mosaics from geometry instead
    /// of font glyphs.
    pub builtin_graphics: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_run_length: DEFAULT_MAX_RUN_LENGTH,
            builtin_graphics: true,
        }
    }
}

impl DrawConfig {
    /// Returns `max_run_length`, never less than 1.
    pub fn effective_max_run_length(&self) -> usize {
        self.max_run_length.max(1)
    }
}

impl GlyphConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the configuration file at `path`.
    ///
    /// A missing file yields defaults silently; an unreadable or invalid
    /// file is logged and also yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("glyph config: failed to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match Self::from_toml(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("glyph config: {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

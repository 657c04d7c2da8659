//! Error types for font context construction and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building font contexts or loading configuration.
///
/// Missing glyphs are not errors: they are recorded on the glyph
/// representation and surfaced through `has_char`.
#[derive(Error, Debug)]
pub enum GlyphError {
    /// No font could be resolved for the requested family, so no cache can
    /// be built for the rendering context.
    #[error("no usable font map for family {family:?}")]
    NoFontMap { family: String },

    /// A font file exists but could not be read.
    #[error("failed to read font file {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file was read but is not a face rustybuzz can parse.
    #[error("failed to parse font file {}", path.display())]
    FontParse { path: PathBuf },

    /// The configuration file is not valid TOML for `GlyphConfig`.
    #[error("invalid glyph configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GlyphError>;

use std::path::{Path, PathBuf};

use super::system::parse_features;
use super::{
    FontHandle, FontId, FontIndex, GlyphInfo, ScaledFont, Shaper, SystemShaper, px_ceil,
};
use crate::GlyphError;
use crate::font::{ContextFingerprint, FontDescription, FontStyle, RenderOptions};

/// Fresh directory under the system temp dir, unique per test and process.
fn temp_font_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "oriterm_glyphs_fonts_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create temp font dir");
    dir
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").expect("write fake font file");
    path
}

#[test]
fn px_ceil_rounds_up() {
    assert_eq!(px_ceil(0), 0);
    assert_eq!(px_ceil(1), 1);
    assert_eq!(px_ceil(64), 1);
    assert_eq!(px_ceil(65), 2);
    assert_eq!(px_ceil(-1), 0);
    assert_eq!(px_ceil(-64), -1);
}

#[test]
fn glyph_info_helpers() {
    let mut info = GlyphInfo {
        glyph: 36,
        x_offset: 0,
        y_offset: 0,
        advance: 640,
        cluster: 0,
    };
    assert!(info.is_at_origin());
    assert_eq!(info.index_u16(), Some(36));

    info.y_offset = -3;
    assert!(!info.is_at_origin());

    info.glyph = 0x1_0000;
    assert_eq!(info.index_u16(), None);
}

#[test]
fn scaled_font_identity_is_by_allocation() {
    let a = ScaledFont::new(FontId(0), 16.0, RenderOptions::default());
    let b = ScaledFont::new(FontId(0), 16.0, RenderOptions::default());
    assert_eq!(a, a.clone());
    assert_ne!(a, b);

    let handle = FontHandle::new(FontId(0), "Mono", 16.0, Some(a.clone()));
    assert_eq!(handle.scaled_font(), Some(&a));
    assert_eq!(handle, handle.clone());
    assert_ne!(handle, FontHandle::new(FontId(0), "Mono", 16.0, Some(a)));
}

#[test]
fn parse_features_enable_and_disable() {
    let features = parse_features(&["calt".to_owned(), "-liga".to_owned()]);
    assert_eq!(features.len(), 2);
    assert_eq!(features[0].value, 1);
    assert_eq!(features[1].value, 0);
}

#[test]
fn parse_features_skips_invalid_tags() {
    let features = parse_features(&["toolong".to_owned(), "ab".to_owned(), "-".to_owned()]);
    assert!(features.is_empty());
}

#[test]
fn index_resolves_known_family_and_falls_back_to_regular() {
    let dir = temp_font_dir("known");
    let regular = touch(&dir, "DejaVuSansMono.ttf");
    let bold = touch(&dir, "DejaVuSansMono-Bold.ttf");
    let index = FontIndex::from_dirs(&[dir.clone()]);

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.resolve("DejaVu Sans Mono", FontStyle::Regular),
        Some(regular.clone())
    );
    assert_eq!(index.resolve("dejavu sans mono", FontStyle::Bold), Some(bold));
    // No oblique file: the regular face stands in.
    assert_eq!(
        index.resolve("DejaVu Sans Mono", FontStyle::Italic),
        Some(regular)
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn index_generic_monospace_uses_priority_order() {
    let dir = temp_font_dir("generic");
    touch(&dir, "LiberationMono-Regular.ttf");
    let jetbrains = touch(&dir, "JetBrainsMono-Regular.ttf");
    let index = FontIndex::from_dirs(&[dir.clone()]);

    assert_eq!(index.resolve("monospace", FontStyle::Regular), Some(jetbrains.clone()));
    assert_eq!(index.resolve("", FontStyle::Bold), Some(jetbrains));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn index_guesses_unknown_family_file_names() {
    let dir = temp_font_dir("guess");
    let nested = dir.join("fira");
    std::fs::create_dir_all(&nested).expect("create nested dir");
    let regular = touch(&nested, "FiraCode-Regular.ttf");
    let bold = touch(&nested, "FiraCode-Bold.otf");
    let index = FontIndex::from_dirs(&[dir.clone()]);

    assert_eq!(index.resolve("Fira Code", FontStyle::Regular), Some(regular.clone()));
    assert_eq!(index.resolve("Fira Code", FontStyle::Bold), Some(bold));
    assert_eq!(index.resolve("Fira Code", FontStyle::Italic), Some(regular));
    assert_eq!(index.resolve("Nonexistent", FontStyle::Regular), None);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn index_fallbacks_in_priority_order() {
    let dir = temp_font_dir("fallback");
    let dejavu = touch(&dir, "DejaVuSans.ttf");
    let noto = touch(&dir, "NotoSansMono-Regular.ttf");
    let index = FontIndex::from_dirs(&[dir.clone()]);
    assert_eq!(index.fallback_paths(), vec![noto, dejavu]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_family_is_no_font_map() {
    let shaper = SystemShaper::with_index(FontIndex::default());
    let ctx = ContextFingerprint::new(FontDescription::new("Nowhere Mono", 12.0));
    let err = shaper.create_layout(&ctx).err().expect("no fonts indexed");
    assert!(matches!(err, GlyphError::NoFontMap { ref family } if family == "Nowhere Mono"));
}

#[test]
fn unparsable_font_is_reported() {
    let dir = temp_font_dir("corrupt");
    touch(&dir, "DejaVuSansMono.ttf");
    let shaper = SystemShaper::with_index(FontIndex::from_dirs(&[dir.clone()]));
    let ctx = ContextFingerprint::new(FontDescription::new("DejaVu Sans Mono", 12.0));
    let err = shaper.create_layout(&ctx).err().expect("empty file cannot parse");
    assert!(matches!(err, GlyphError::FontParse { .. }));
    let _ = std::fs::remove_dir_all(&dir);
}

/// Shapes with whatever monospace font the machine has. Skipped on systems
/// without any of the known families.
#[test]
fn system_font_shapes_ascii_as_single_glyphs() {
    let shaper = SystemShaper::new();
    let ctx = ContextFingerprint::new(FontDescription::new("monospace", 12.0));
    let Ok(mut layout) = shaper.create_layout(&ctx) else {
        return;
    };

    layout.set_text("A");
    let shaping = layout.shape();
    assert_eq!(shaping.runs.len(), 1);
    assert_eq!(shaping.runs[0].glyphs.len(), 1);
    assert_eq!(shaping.unknown_glyphs, 0);
    assert!(shaping.runs[0].glyphs[0].glyph != 0);
    assert!(shaping.width > 0);
    assert!(shaping.baseline > 0 && shaping.baseline < shaping.height);

    let line = layout.take_line();
    assert_eq!(line.runs().len(), 1);
    assert!(layout.shape().runs.is_empty());
}

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{
    ContextFingerprint, FontDescription, FontStyle, Language, RenderOptions, Resolution, Slant,
    Weight,
};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn style_from_attrs() {
    assert_eq!(FontStyle::from_attrs(false, false), FontStyle::Regular);
    assert_eq!(FontStyle::from_attrs(true, false), FontStyle::Bold);
    assert_eq!(FontStyle::from_attrs(false, true), FontStyle::Italic);
    assert_eq!(FontStyle::from_attrs(true, true), FontStyle::BoldItalic);
}

#[test]
fn style_indices_match_all_table() {
    for (i, style) in FontStyle::ALL.iter().enumerate() {
        assert_eq!(style.index(), i);
    }
    assert_eq!(FontStyle::BoldItalic.without_bold(), FontStyle::Italic);
    assert_eq!(FontStyle::Bold.without_bold(), FontStyle::Regular);
}

#[test]
fn style_variants_change_only_weight_and_slant() {
    let base = FontDescription::new("Mono", 12.0);
    let bold_italic = base.for_style(FontStyle::BoldItalic);
    assert_eq!(bold_italic.family, base.family);
    assert_eq!(bold_italic.size_q6, base.size_q6);
    assert_eq!(bold_italic.weight, Weight::BOLD);
    assert_eq!(bold_italic.slant, Slant::Italic);
    assert_eq!(base.for_style(FontStyle::Regular), base);
}

#[test]
fn size_is_fixed_point() {
    let desc = FontDescription::new("Mono", 10.5);
    assert_eq!(desc.size_q6, 672);
    assert!((desc.size_pt() - 10.5).abs() < f32::EPSILON);
    // 12pt at 96 DPI is 16px.
    let px = FontDescription::new("Mono", 12.0).size_px(Resolution::new(96.0));
    assert!((px - 16.0).abs() < 1e-4);
}

#[test]
fn equal_fingerprints_hash_equal() {
    let a = ContextFingerprint::new(FontDescription::new("Mono", 12.0));
    let b = ContextFingerprint {
        resolution: Resolution::new(96.0),
        font: FontDescription::new("Mono", 12.0),
        options: RenderOptions::default(),
        language: Language::new("en"),
        config_generation: 0,
    };
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn each_field_distinguishes_fingerprints() {
    let base = ContextFingerprint::new(FontDescription::new("Mono", 12.0));

    let mut other = base.clone();
    other.resolution = Resolution::new(120.0);
    assert_ne!(base, other);

    let other = base.with_font(base.font.with_size(13.0));
    assert_ne!(base, other);

    let mut other = base.clone();
    other.options.hint_metrics = true;
    assert_ne!(base, other);

    let mut other = base.clone();
    other.language = Language::new("ja");
    assert_ne!(base, other);

    let mut other = base.clone();
    other.config_generation = 1;
    assert_ne!(base, other);
}

#[test]
fn negative_zero_resolution_equals_zero() {
    assert_eq!(Resolution::new(-0.0), Resolution::new(0.0));
    assert_eq!(hash_of(&Resolution::new(-0.0)), hash_of(&Resolution::new(0.0)));
}

#[test]
fn language_normalization() {
    assert_eq!(Language::new("en_US.UTF-8").as_str(), "en-us");
    assert_eq!(Language::new("de_DE@euro").as_str(), "de-de");
    assert_eq!(Language::new("C"), Language::default());
    assert_eq!(Language::new(""), Language::default());
    assert_eq!(Language::new("zh_TW").primary(), "zh");
}

#[test]
fn latin_script_detection() {
    assert!(Language::new("en_US").uses_latin_script());
    assert!(Language::new("fr").uses_latin_script());
    assert!(!Language::new("ja_JP.UTF-8").uses_latin_script());
    assert!(!Language::new("ru").uses_latin_script());
}

use std::rc::Rc;
use std::time::Duration;

use super::{
    CanvasExt, Color, DisplayList, DrawAttrs, DrawFlags, DrawOp, DrawRequest, Operator, Rect,
    RunDispatcher, mirror, mirror_box, mirror_char,
};
use crate::config::{DrawConfig, StyleConfig};
use crate::font::{ContextFingerprint, FontDescription, FontStyle};
use crate::registry::FontContextRegistry;
use crate::style::StyleSet;
use crate::testing::{DEFAULT_ADVANCE, DEFAULT_ASCENT, FakeShaper, ManualClock};

const WHITE: Color = Color::new(0xffff, 0xffff, 0xffff);

struct Fixture {
    _registry: FontContextRegistry,
    styles: StyleSet,
}

fn fixture_with(shaper: &FakeShaper, config: &StyleConfig) -> Fixture {
    let registry = FontContextRegistry::new(Duration::from_secs(30), Rc::new(ManualClock::new()));
    let base = ContextFingerprint::new(FontDescription::new("Mono", 12.0));
    let styles = StyleSet::build(&registry, shaper, &base, config).expect("fake shaper builds");
    Fixture {
        _registry: registry,
        styles,
    }
}

fn fixture(shaper: &FakeShaper) -> Fixture {
    fixture_with(shaper, &StyleConfig::default())
}

/// One request per character, laid out left to right in single cells.
fn requests(text: &str) -> Vec<DrawRequest> {
    text.chars()
        .enumerate()
        .map(|(i, c)| DrawRequest::new(c, i as i32 * DEFAULT_ADVANCE, 0, 1))
        .collect()
}

fn draw(
    dispatcher: &mut RunDispatcher,
    styles: &StyleSet,
    requests: &[DrawRequest],
) -> DisplayList {
    let mut list = DisplayList::new();
    dispatcher.draw_text(
        &mut list,
        styles,
        requests,
        DrawAttrs::empty(),
        WHITE,
        1.0,
        FontStyle::Regular,
    );
    list
}

/// Kind of each text op, in order.
fn text_kinds(list: &DisplayList) -> Vec<&'static str> {
    list.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Glyphs { .. } => Some("glyphs"),
            DrawOp::GlyphRun { .. } => Some("run"),
            DrawOp::Line { .. } => Some("line"),
            _ => None,
        })
        .collect()
}

// Batching.

#[test]
fn long_ascii_run_is_split_at_max_run_length() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let text: String = ('!'..='~').cycle().take(150).collect();
    let reqs = requests(&text);

    let list = draw(&mut dispatcher, &fx.styles, &reqs);
    assert_eq!(list.len(), 2);

    let mut positions = Vec::new();
    for op in list.ops() {
        let DrawOp::Glyphs { glyphs, .. } = op else {
            panic!("expected a glyph batch, got {op:?}");
        };
        positions.extend(glyphs.iter().map(|g| (g.glyph, g.x, g.y)));
    }
    let DrawOp::Glyphs { glyphs: first, .. } = &list.ops()[0] else {
        unreachable!();
    };
    assert_eq!(first.len(), 100);

    let expected: Vec<_> = reqs
        .iter()
        .map(|r| (u32::from(r.c) as u16, r.x, DEFAULT_ASCENT))
        .collect();
    assert_eq!(positions, expected);
}

#[test]
fn configured_run_length_bounds_batches() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::new(&DrawConfig {
        max_run_length: 4,
        ..DrawConfig::default()
    });
    let list = draw(&mut dispatcher, &fx.styles, &requests("abcdefghij"));
    assert_eq!(list.text_calls(), 3);
}

#[test]
fn zero_run_length_still_draws() {
    let dispatcher = RunDispatcher::new(&DrawConfig {
        max_run_length: 0,
        ..DrawConfig::default()
    });
    assert_eq!(dispatcher.max_run_length(), 1);
}

#[test]
fn font_change_flushes_batch() {
    let shaper = FakeShaper::new().with_fallback(['λ']);
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let list = draw(&mut dispatcher, &fx.styles, &requests("abλcd"));
    assert_eq!(text_kinds(&list), ["glyphs", "glyphs", "glyphs"]);

    let sizes: Vec<usize> = list
        .ops()
        .iter()
        .map(|op| match op {
            DrawOp::Glyphs { glyphs, .. } => glyphs.len(),
            _ => 0,
        })
        .collect();
    assert_eq!(sizes, [2, 1, 2]);
}

#[test]
fn glyph_run_flushes_pending_batch_first() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let list = draw(&mut dispatcher, &fx.styles, &requests("ab\u{301}c"));
    assert_eq!(text_kinds(&list), ["glyphs", "run", "glyphs"]);
}

#[test]
fn shaped_line_flushes_pending_batch_first() {
    let shaper = FakeShaper::new().with_split(['ǭ']);
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let list = draw(&mut dispatcher, &fx.styles, &requests("aǭb"));
    assert_eq!(text_kinds(&list), ["glyphs", "line", "glyphs"]);
    assert!(matches!(list.ops()[1], DrawOp::Line { runs: 2, x: 10, .. }));
}

#[test]
fn empty_request_list_draws_nothing() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    assert!(draw(&mut dispatcher, &fx.styles, &[]).is_empty());
}

// Placement.

#[test]
fn every_style_uses_the_regular_baseline() {
    let shaper = FakeShaper::new();
    let config = StyleConfig {
        cell_height_scale: 1.5,
        ..StyleConfig::default()
    };
    let fx = fixture_with(&shaper, &config);
    let mut dispatcher = RunDispatcher::default();
    let top = fx.styles.spacing().top;
    assert_eq!(top, 5);

    for style in FontStyle::ALL {
        let mut list = DisplayList::new();
        dispatcher.draw_text(
            &mut list,
            &fx.styles,
            &[DrawRequest::new('a', 0, 40, 1)],
            DrawAttrs::empty(),
            WHITE,
            1.0,
            style,
        );
        let DrawOp::Glyphs { glyphs, .. } = &list.ops()[0] else {
            panic!("expected a glyph batch");
        };
        assert_eq!(glyphs[0].y, 40 + top + DEFAULT_ASCENT, "{style:?}");
    }
}

#[test]
fn letter_spacing_offsets_glyphs() {
    let shaper = FakeShaper::new();
    let config = StyleConfig {
        cell_width_scale: 1.25,
        ..StyleConfig::default()
    };
    let fx = fixture_with(&shaper, &config);
    let mut dispatcher = RunDispatcher::default();
    let cell = fx.styles.cell_width();
    assert_eq!(cell, 12);

    let reqs = [DrawRequest::new('a', 0, 0, 1), DrawRequest::new('中', cell, 0, 2)];
    let list = draw(&mut dispatcher, &fx.styles, &reqs);
    let DrawOp::Glyphs { glyphs, .. } = &list.ops()[0] else {
        panic!("expected a glyph batch");
    };
    // Half the spacing for a single cell, a full spacing for a wide one.
    assert_eq!(glyphs[0].x, 1);
    assert_eq!(glyphs[1].x, cell + 2);
}

#[test]
fn style_selects_its_own_scaled_font() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let mut fonts = Vec::new();
    for style in [FontStyle::Regular, FontStyle::Bold] {
        let mut list = DisplayList::new();
        dispatcher.draw_text(
            &mut list,
            &fx.styles,
            &requests("x"),
            DrawAttrs::empty(),
            WHITE,
            1.0,
            style,
        );
        let DrawOp::Glyphs { font, .. } = &list.ops()[0] else {
            panic!("expected a glyph batch");
        };
        fonts.push(font.clone());
    }
    assert_ne!(fonts[0], fonts[1]);
}

// Local graphics.

#[test]
fn box_drawing_bypasses_the_cache() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let before = shaper.shape_calls();

    let list = draw(&mut dispatcher, &fx.styles, &requests("─█\u{1FB00}"));
    assert_eq!(list.text_calls(), 0);
    assert!(!list.is_empty());
    assert_eq!(shaper.shape_calls(), before);
    let cache = fx.styles.cache(FontStyle::Regular).borrow();
    assert!(cache.cached('─').is_none());
    assert!(cache.cached('█').is_none());
}

#[test]
fn graphics_do_not_break_a_batch() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let list = draw(&mut dispatcher, &fx.styles, &requests("ab─cd"));
    assert_eq!(text_kinds(&list), ["glyphs"]);
    let DrawOp::Glyphs { glyphs, .. } = list.ops().last().expect("ops") else {
        panic!("batch is submitted last");
    };
    assert_eq!(glyphs.len(), 4);
}

#[test]
fn graphics_fill_the_whole_cell_span() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let list = draw(&mut dispatcher, &fx.styles, &[DrawRequest::new('█', 30, 40, 2)]);
    assert_eq!(
        list.ops(),
        [DrawOp::FillRect {
            rect: Rect::new(30.0, 40.0, 20.0, 20.0),
            color: WHITE,
            alpha: 1.0,
            operator: Operator::Over,
        }]
    );
}

#[test]
fn disabled_builtin_graphics_use_the_font() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::new(&DrawConfig {
        builtin_graphics: false,
        ..DrawConfig::default()
    });
    let list = draw(&mut dispatcher, &fx.styles, &requests("─"));
    assert_eq!(text_kinds(&list), ["glyphs"]);
    assert!(fx.styles.cache(FontStyle::Regular).borrow().cached('─').is_some());
}

#[test]
fn legacy_mosaics_are_drawn_in_the_cell_box() {
    let shaper = FakeShaper::new();
    let config = StyleConfig {
        cell_width_scale: 1.5,
        ..StyleConfig::default()
    };
    let fx = fixture_with(&shaper, &config);
    let mut dispatcher = RunDispatcher::default();
    let cell = fx.styles.cell_width();
    assert_eq!(cell, 15);

    // Left one eighth boundary block, a wedge and a diagonal join.
    let list = draw(&mut dispatcher, &fx.styles, &requests("\u{1FB70}\u{1FB3C}\u{1FBA0}"));
    assert_eq!(list.text_calls(), 0);
    assert_eq!(list.len(), 3);
    assert_eq!(
        list.ops()[0],
        DrawOp::FillRect {
            rect: Rect::new(1.0, 0.0, 2.0, f64::from(fx.styles.cell_height())),
            color: WHITE,
            alpha: 1.0,
            operator: Operator::Over,
        }
    );

    // Geometry and edges agree on the full cell box.
    assert_eq!(fx.styles.char_edges('\u{1FB70}', 1, FontStyle::Regular), (0, cell));
    let cache = fx.styles.cache(FontStyle::Regular).borrow();
    assert!(cache.cached('\u{1FB70}').is_none());
    assert!(cache.cached('\u{1FB3C}').is_none());
}

// Mirroring.

#[test]
fn mirror_tables() {
    assert_eq!(mirror_char('('), ')');
    assert_eq!(mirror_char('»'), '«');
    assert_eq!(mirror_char('a'), 'a');
    assert_eq!(mirror_char('⟮'), '⟯');
    assert_eq!(mirror_char('⟬'), '⟭');
    assert_eq!(mirror_char('⸢'), '⸣');
    assert_eq!(mirror_char('⦍'), '⦐');
    assert_eq!(mirror_char('⊘'), '⦸');
    assert_eq!(mirror_char('∕'), '⧵');
    assert_eq!(mirror_box('┌'), '┐');
    assert_eq!(mirror_box('╒'), '╕');
    assert_eq!(mirror_box('┤'), '├');
    assert_eq!(mirror_box('╼'), '╾');
    assert_eq!(mirror_box('╭'), '╮');
    assert_eq!(mirror_box('▌'), '▐');
    assert_eq!(mirror_box('─'), '─');
    assert_eq!(mirror_box('┼'), '┼');
    assert_eq!(mirror('┌', false), '┌');
    assert_eq!(mirror('(', true), ')');
}

#[test]
fn mirrored_request_draws_the_mirror_without_caching_the_original() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let request = DrawRequest::new('«', 0, 0, 1).with_flags(DrawFlags::MIRROR);

    let list = draw(&mut dispatcher, &fx.styles, &[request]);
    let DrawOp::Glyphs { glyphs, .. } = &list.ops()[0] else {
        panic!("expected a glyph batch");
    };
    assert_eq!(glyphs[0].glyph, u32::from('»') as u16);

    let cache = fx.styles.cache(FontStyle::Regular).borrow();
    assert!(cache.cached('»').is_some());
    assert!(cache.cached('«').is_none());
}

#[test]
fn box_mirror_flips_graphics() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let flags = DrawFlags::MIRROR | DrawFlags::BOX_MIRROR;

    let mirrored = draw(
        &mut dispatcher,
        &fx.styles,
        &[DrawRequest::new('┌', 0, 0, 1).with_flags(flags)],
    );
    let direct = draw(&mut dispatcher, &fx.styles, &requests("┐"));
    assert_eq!(mirrored.ops(), direct.ops());

    // Without BOX_MIRROR only bidi pairs change.
    let plain = draw(
        &mut dispatcher,
        &fx.styles,
        &[DrawRequest::new('┌', 0, 0, 1).with_flags(DrawFlags::MIRROR)],
    );
    assert_ne!(plain.ops(), direct.ops());
}

// draw_char.

#[test]
fn draw_char_skips_missing_glyphs() {
    let shaper = FakeShaper::new().with_missing(['ж']);
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let mut list = DisplayList::new();

    let drawn = dispatcher.draw_char(
        &mut list,
        &fx.styles,
        DrawRequest::new('ж', 0, 0, 1),
        DrawAttrs::empty(),
        WHITE,
        1.0,
        FontStyle::Regular,
    );
    assert!(!drawn);
    assert!(list.is_empty());

    let drawn = dispatcher.draw_char(
        &mut list,
        &fx.styles,
        DrawRequest::new('a', 0, 0, 1),
        DrawAttrs::empty(),
        WHITE,
        1.0,
        FontStyle::Regular,
    );
    assert!(drawn);
    assert_eq!(list.text_calls(), 1);
}

// Undercurl and primitives.

#[test]
fn undercurl_repeats_per_cell_and_reuses_its_shape() {
    let shaper = FakeShaper::new();
    let fx = fixture(&shaper);
    let mut dispatcher = RunDispatcher::default();
    let mut list = DisplayList::new();

    dispatcher.draw_undercurl(&mut list, &fx.styles, 5, 18.0, 1.0, 3, WHITE, 1.0);
    let origins: Vec<f64> = list
        .ops()
        .iter()
        .map(|op| match op {
            DrawOp::StrokePath { x, .. } => *x,
            _ => f64::NAN,
        })
        .collect();
    assert_eq!(origins, [5.0, 15.0, 25.0]);

    let first = dispatcher.undercurl().cloned().expect("shape built");
    dispatcher.draw_undercurl(&mut list, &fx.styles, 0, 0.0, 1.0, 1, WHITE, 1.0);
    assert_eq!(dispatcher.undercurl(), Some(&first));

    dispatcher.draw_undercurl(&mut list, &fx.styles, 0, 0.0, 2.0, 1, WHITE, 1.0);
    let rebuilt = dispatcher.undercurl().expect("shape built");
    assert_eq!(rebuilt.line_width(), 2.0);
    assert_eq!(rebuilt.cell_width(), DEFAULT_ADVANCE);
}

#[test]
fn undercurl_height_covers_both_arcs() {
    let height = super::Undercurl::height(10, 1.0);
    // radius = 10 / 2 / sqrt(2); arc height = radius * (1 - sqrt(2) / 2)
    let radius = 10.0 / 2.0 / std::f64::consts::SQRT_2;
    let expected = 2.0 * radius * (1.0 - std::f64::consts::SQRT_2 / 2.0) + 1.0;
    assert!((height - expected).abs() < 1e-12);
}

#[test]
fn primitives() {
    let mut list = DisplayList::new();
    list.clear(0, 0, 10, 20, WHITE, 0.5);
    list.fill_rectangle(1, 2, 3, 4, WHITE, 1.0);
    list.draw_rectangle(0, 0, 10, 10, WHITE, 1.0);
    list.draw_line(5, 5, 5, 15, 2, WHITE, 1.0);
    list.clip(Rect::new(0.0, 0.0, 4.0, 4.0));
    list.unclip();

    assert_eq!(
        list.ops(),
        [
            DrawOp::FillRect {
                rect: Rect::new(0.0, 0.0, 10.0, 20.0),
                color: WHITE,
                alpha: 0.5,
                operator: Operator::Source,
            },
            DrawOp::FillRect {
                rect: Rect::new(1.0, 2.0, 3.0, 4.0),
                color: WHITE,
                alpha: 1.0,
                operator: Operator::Over,
            },
            DrawOp::StrokeRect {
                rect: Rect::new(0.5, 0.5, 9.0, 9.0),
                line_width: 1.0,
                color: WHITE,
                alpha: 1.0,
            },
            DrawOp::FillRect {
                rect: Rect::new(5.0, 5.0, 2.0, 11.0),
                color: WHITE,
                alpha: 1.0,
                operator: Operator::Over,
            },
            DrawOp::PushClip(Rect::new(0.0, 0.0, 4.0, 4.0)),
            DrawOp::PopClip,
        ]
    );
}

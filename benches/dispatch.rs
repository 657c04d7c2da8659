//! Benchmarks for the glyph hot path.
//!
//! Models what a terminal redraw does: classify every visible code point
//! (almost always a cache hit) and batch rows of glyphs into draw calls.
//! The fake shaper keeps shaping cost out of the numbers, so these measure
//! the cache and the dispatcher alone.
//!
//! - **80x24**: Classic terminal (ssh, tmux panes).
//! - **120x50**: Modern half-screen split.
//! - **240x80**: Full-screen 4K terminal.

use std::rc::Rc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use oriterm_glyphs::config::StyleConfig;
use oriterm_glyphs::testing::{FakeShaper, ManualClock};
use oriterm_glyphs::{
    CodepointCache, Color, ContextFingerprint, DisplayList, DrawAttrs, DrawRequest,
    FontContextRegistry, FontDescription, FontStyle, RunDispatcher, StyleSet,
};

/// Terminal sizes that represent real usage.
const SIZES: [(usize, usize); 3] = [
    (80, 24),  // Classic VT100.
    (120, 50), // Modern split pane.
    (240, 80), // Full-screen 4K.
];

const CELL_WIDTH: i32 = 10;
const CELL_HEIGHT: i32 = 20;

fn context() -> ContextFingerprint {
    ContextFingerprint::new(FontDescription::new("Mono", 12.0))
}

fn style_set(shaper: &FakeShaper) -> (FontContextRegistry, StyleSet) {
    let registry = FontContextRegistry::new(Duration::from_secs(30), Rc::new(ManualClock::new()));
    let styles = StyleSet::build(&registry, shaper, &context(), &StyleConfig::default())
        .expect("fake shaper builds");
    (registry, styles)
}

/// Compiler output, logs, `ls -la`: mostly ASCII, a wide character every
/// 20 cells and the odd box drawing border.
fn mixed_row(cols: usize, line: usize) -> Vec<DrawRequest> {
    let mut requests = Vec::with_capacity(cols);
    let mut col = 0;
    while col < cols {
        let x = col as i32 * CELL_WIDTH;
        let y = line as i32 * CELL_HEIGHT;
        if col == 0 || col == cols - 1 {
            requests.push(DrawRequest::new('│', x, y, 1));
            col += 1;
        } else if col % 20 == 19 && col + 1 < cols - 1 {
            requests.push(DrawRequest::new('好', x, y, 2));
            col += 2;
        } else {
            let c = char::from(b'a' + (col % 26) as u8);
            requests.push(DrawRequest::new(c, x, y, 1));
            col += 1;
        }
    }
    requests
}

/// Classification of cached code points: the per-cell cost of every redraw.
fn bench_classify_hit(c: &mut Criterion) {
    let shaper = FakeShaper::new();
    let mut cache = CodepointCache::for_context(&shaper, &context()).expect("fake shaper builds");
    let text: Vec<char> = "The quick brown fox jumps over the lazy dog 0123456789 é中"
        .chars()
        .collect();
    for &ch in &text {
        cache.classify(ch);
    }

    c.bench_function("classify/cached", |b| {
        b.iter(|| {
            for &ch in &text {
                black_box(cache.classify(black_box(ch)).width);
            }
        });
    });
}

/// Building a cache: metric probes plus the batched ASCII precache.
fn bench_cache_construction(c: &mut Criterion) {
    let shaper = FakeShaper::new();
    c.bench_function("cache/construct", |b| {
        b.iter(|| {
            black_box(CodepointCache::for_context(&shaper, &context()).map(|cache| cache.len()))
        });
    });
}

/// A full-screen redraw, one `draw_text` call per row.
fn bench_draw_screen(c: &mut Criterion) {
    let shaper = FakeShaper::new();
    let (_registry, styles) = style_set(&shaper);
    let mut group = c.benchmark_group("dispatch/screen");
    for (cols, lines) in SIZES {
        let rows: Vec<Vec<DrawRequest>> = (0..lines).map(|line| mixed_row(cols, line)).collect();
        let mut dispatcher = RunDispatcher::default();
        let mut canvas = DisplayList::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &rows,
            |b, rows| {
                b.iter(|| {
                    canvas.reset();
                    for row in rows {
                        dispatcher.draw_text(
                            &mut canvas,
                            &styles,
                            row,
                            DrawAttrs::empty(),
                            Color::default(),
                            1.0,
                            FontStyle::Regular,
                        );
                    }
                    black_box(canvas.len())
                });
            },
        );
    }
    group.finish();
}

/// A TUI border: every cell a locally drawn box drawing character.
fn bench_draw_box_row(c: &mut Criterion) {
    let shaper = FakeShaper::new();
    let (_registry, styles) = style_set(&shaper);
    let row: Vec<DrawRequest> = (0..240)
        .map(|col| DrawRequest::new('─', col * CELL_WIDTH, 0, 1))
        .collect();
    let mut dispatcher = RunDispatcher::default();
    let mut canvas = DisplayList::new();

    c.bench_function("dispatch/box_row_240", |b| {
        b.iter(|| {
            canvas.reset();
            dispatcher.draw_text(
                &mut canvas,
                &styles,
                &row,
                DrawAttrs::empty(),
                Color::default(),
                1.0,
                FontStyle::Regular,
            );
            black_box(canvas.len())
        });
    });
}

criterion_group!(
    benches,
    bench_classify_hit,
    bench_cache_construction,
    bench_draw_screen,
    bench_draw_box_row,
);
criterion_main!(benches);

//! Locally drawn graphics: box drawing, block elements and mosaics.
//!
//! These code points are painted as geometry sized to the cell instead of
//! going through a font, so lines join seamlessly across cells whatever
//! font is loaded. Nothing here is cached; every call paints from scratch.

use std::f64::consts::{FRAC_PI_2, PI};

use super::DrawAttrs;
use super::canvas::{Canvas, Color, Operator, Path, Rect};

/// Whether `c` belongs to the range the renderer reserves for local
/// drawing. Such glyphs always span the full cell box.
pub fn is_local_graphic(c: char) -> bool {
    matches!(c,
        '\u{2500}'..='\u{259F}' |   // Box Drawing, Block Elements
        '\u{25E2}'..='\u{25E5}' |   // Geometric Shapes: corner triangles
        '\u{1FB00}'..='\u{1FBFF}'   // Symbols for Legacy Computing
    )
}

/// Whether the separated-mosaic attribute applies to `c`.
pub fn is_separable_mosaic(c: char) -> bool {
    matches!(c, '\u{1FB00}'..='\u{1FB9F}' | '\u{25E2}'..='\u{25E5}' | '\u{2580}'..='\u{259F}')
}

/// Pixel box of the cell (or cells) a graphic fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicCell {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Advance of the current style's font; line weights derive from it.
    pub font_width: i32,
}

/// Paints local graphics.
///
/// Called for every code point in the reserved range; a code point the
/// painter has no geometry for paints nothing.
pub trait LocalGraphics {
    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        c: char,
        cell: GraphicCell,
        attrs: DrawAttrs,
        color: Color,
        alpha: f64,
    );
}

/// Geometry for box drawing, block elements, corner triangles and the
/// legacy computing mosaics (sextants, wedges, eighths, shades, checkers and
/// diagonals).
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxDrawing;

impl LocalGraphics for BoxDrawing {
    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        c: char,
        cell: GraphicCell,
        attrs: DrawAttrs,
        color: Color,
        alpha: f64,
    ) {
        let widths = LineWidths::for_char(c, cell.font_width);
        let mut pen = Pen {
            canvas,
            color,
            alpha,
        };
        if attrs.contains(DrawAttrs::SEPARATED_MOSAIC) && is_separable_mosaic(c) {
            draw_separated(&mut pen, c, cell, widths);
        } else {
            paint(&mut pen, c, cell, widths);
        }
    }
}

struct Pen<'a> {
    canvas: &'a mut dyn Canvas,
    color: Color,
    alpha: f64,
}

impl Pen<'_> {
    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.shaded_rect(x, y, width, height, 1.0);
    }

    fn shaded_rect(&mut self, x: i32, y: i32, width: i32, height: i32, density: f64) {
        if width > 0 && height > 0 {
            self.canvas.fill_rect(
                Rect::from_px(x, y, width, height),
                self.color,
                self.alpha * density,
                Operator::Over,
            );
        }
    }

    fn fill(&mut self, path: &Path, cell: GraphicCell) {
        self.shaded_fill(path, cell, 1.0);
    }

    fn shaded_fill(&mut self, path: &Path, cell: GraphicCell, density: f64) {
        self.canvas.fill_path(
            path,
            f64::from(cell.x),
            f64::from(cell.y),
            self.color,
            self.alpha * density,
        );
    }

    fn stroke(&mut self, path: &Path, cell: GraphicCell, line_width: i32) {
        self.canvas.stroke_path(
            path,
            f64::from(cell.x),
            f64::from(cell.y),
            f64::from(line_width),
            self.color,
            self.alpha,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineWidths {
    pub light: i32,
    pub heavy: i32,
}

impl LineWidths {
    /// Light lines are a fifth of the font width; heavy lines are light plus
    /// two pixels, except in the double-line block where a heavy line spans
    /// a double line (two light strokes and the gap between them).
    pub fn for_char(c: char, font_width: i32) -> Self {
        let light = (font_width / 5).max(1);
        let heavy = if ('\u{2550}'..='\u{256C}').contains(&c) {
            3 * light
        } else {
            light + 2
        };
        Self { light, heavy }
    }

    fn of(self, weight: Weight) -> i32 {
        match weight {
            Weight::None => 0,
            Weight::Light => self.light,
            Weight::Heavy => self.heavy,
            Weight::Double => 3 * self.light,
        }
    }
}

fn paint(pen: &mut Pen<'_>, c: char, cell: GraphicCell, widths: LineWidths) {
    match c {
        '\u{2500}'..='\u{257F}' => draw_box(pen, c, cell, widths),
        '\u{2580}'..='\u{259F}' => draw_block(pen, c, cell),
        '\u{25E2}'..='\u{25E5}' => draw_triangle(pen, c, cell),
        '\u{1FB00}'..='\u{1FB3B}' => draw_sextant(pen, c, cell),
        '\u{1FB3C}'..='\u{1FB6F}' => draw_wedge(pen, c, cell),
        '\u{1FB70}'..='\u{1FB9F}' => draw_legacy_block(pen, c, cell),
        '\u{1FBA0}'..='\u{1FBAE}' => draw_diagonal_joins(pen, c, cell, widths.light),
        _ => {}
    }
}

// Box drawing (U+2500..U+257F).
//
// Most characters are up to four arms running from the cell centre to the
// middle of each edge. Each arm has a weight; double arms are two light
// strokes one light width apart.

/// Weight of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Weight {
    None,
    Light,
    Heavy,
    Double,
}

impl Weight {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            1 => Self::Light,
            2 => Self::Heavy,
            3 => Self::Double,
            _ => Self::None,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Light => 1,
            Self::Heavy => 2,
            Self::Double => 3,
        }
    }
}

/// Arms of U+2500 + index, two bits per arm: left in bits 0-1, right in
/// 2-3, up in 4-5, down in 6-7. Zero marks characters drawn another way
/// (arcs and diagonals).
pub(crate) const BOX_SEGMENTS: [u8; 128] = [
    0x05, 0x0a, 0x50, 0xa0, 0x05, 0x0a, 0x50, 0xa0, 0x05, 0x0a, 0x50, 0xa0, 0x44, 0x48, 0x84, 0x88, // U+2500
    0x41, 0x42, 0x81, 0x82, 0x14, 0x18, 0x24, 0x28, 0x11, 0x12, 0x21, 0x22, 0x54, 0x58, 0x64, 0x94, // U+2510
    0xa4, 0x68, 0x98, 0xa8, 0x51, 0x52, 0x61, 0x91, 0xa1, 0x62, 0x92, 0xa2, 0x45, 0x46, 0x49, 0x4a, // U+2520
    0x85, 0x86, 0x89, 0x8a, 0x15, 0x16, 0x19, 0x1a, 0x25, 0x26, 0x29, 0x2a, 0x55, 0x56, 0x59, 0x5a, // U+2530
    0x65, 0x95, 0xa5, 0x66, 0x69, 0x96, 0x99, 0x6a, 0x9a, 0xa6, 0xa9, 0xaa, 0x05, 0x0a, 0x50, 0xa0, // U+2540
    0x0f, 0xf0, 0x4c, 0xc4, 0xcc, 0x43, 0xc1, 0xc3, 0x1c, 0x34, 0x3c, 0x13, 0x31, 0x33, 0x5c, 0xf4, // U+2550
    0xfc, 0x53, 0xf1, 0xf3, 0x4f, 0xc5, 0xcf, 0x1f, 0x35, 0x3f, 0x5f, 0xf5, 0xff, 0x00, 0x00, 0x00, // U+2560
    0x00, 0x00, 0x00, 0x00, 0x01, 0x10, 0x04, 0x40, 0x02, 0x20, 0x08, 0x80, 0x09, 0x90, 0x06, 0x60, // U+2570
];

/// Arms of a box drawing character as `[left, right, up, down]`, or `None`
/// for characters outside the table or drawn without arms.
pub(crate) fn box_segments(c: char) -> Option<[Weight; 4]> {
    let index = u32::from(c).checked_sub(0x2500)?;
    let packed = *BOX_SEGMENTS.get(index as usize)?;
    (packed != 0).then(|| [0, 2, 4, 6].map(|shift| Weight::from_bits(packed >> shift)))
}

pub(crate) fn pack_segments(segments: [Weight; 4]) -> u8 {
    segments
        .iter()
        .zip([0, 2, 4, 6])
        .fold(0, |packed, (weight, shift)| packed | weight.bits() << shift)
}

/// Dash count and orientation (`true` for horizontal) of dashed lines.
fn dashes(c: char) -> Option<(i32, bool)> {
    match c {
        '\u{2504}' | '\u{2505}' => Some((3, true)),
        '\u{2506}' | '\u{2507}' => Some((3, false)),
        '\u{2508}' | '\u{2509}' => Some((4, true)),
        '\u{250A}' | '\u{250B}' => Some((4, false)),
        '\u{254C}' | '\u{254D}' => Some((2, true)),
        '\u{254E}' | '\u{254F}' => Some((2, false)),
        _ => None,
    }
}

fn draw_box(pen: &mut Pen<'_>, c: char, cell: GraphicCell, widths: LineWidths) {
    match c {
        '\u{256D}'..='\u{2570}' => draw_arc_corner(pen, c, cell, widths.light),
        '\u{2571}'..='\u{2573}' => draw_diagonal(pen, c, cell, widths.light),
        _ => {
            let Some(segments) = box_segments(c) else {
                return;
            };
            match dashes(c) {
                Some((count, horizontal)) => {
                    let weight = if horizontal { segments[0] } else { segments[2] };
                    draw_dashes(pen, cell, count, horizontal, widths.of(weight));
                }
                None => draw_arms(pen, cell, segments, widths),
            }
        }
    }
}

/// Where an arm running toward the centre stops: on the near stroke of a
/// double line it turns into, past the far side of a crossing line, or at
/// the centre when nothing crosses.
fn arm_end(band_start: i32, band: i32, centre: i32, into_double: bool, light: i32) -> i32 {
    if into_double {
        band_start + light
    } else if band > 0 {
        band_start + band
    } else {
        centre
    }
}

/// Where an arm running away from the centre starts; see [`arm_end`].
fn arm_start(band_start: i32, band: i32, centre: i32, into_double: bool, light: i32) -> i32 {
    if into_double {
        band_start + 2 * light
    } else if band > 0 {
        band_start
    } else {
        centre
    }
}

fn draw_arms(pen: &mut Pen<'_>, cell: GraphicCell, segments: [Weight; 4], widths: LineWidths) {
    let [left, right, up, down] = segments;
    let light = widths.light;
    let cx = cell.x + cell.width / 2;
    let cy = cell.y + cell.height / 2;
    let right_edge = cell.x + cell.width;
    let bottom_edge = cell.y + cell.height;

    // Bands occupied by the vertical and horizontal strokes.
    let v_band = widths.of(up).max(widths.of(down));
    let v_start = cx - v_band / 2;
    let h_band = widths.of(left).max(widths.of(right));
    let h_start = cy - h_band / 2;
    let double_h = (cy - 3 * light / 2, cy - 3 * light / 2 + 2 * light);
    let double_v = (cx - 3 * light / 2, cx - 3 * light / 2 + 2 * light);

    match left {
        Weight::None => {}
        Weight::Double => {
            let top_end = arm_end(v_start, v_band, cx, up == Weight::Double, light);
            let bottom_end = arm_end(v_start, v_band, cx, down == Weight::Double, light);
            pen.rect(cell.x, double_h.0, top_end - cell.x, light);
            pen.rect(cell.x, double_h.1, bottom_end - cell.x, light);
        }
        weight => {
            let t = widths.of(weight);
            let end = arm_end(v_start, v_band, cx, false, light);
            pen.rect(cell.x, cy - t / 2, end - cell.x, t);
        }
    }

    match right {
        Weight::None => {}
        Weight::Double => {
            let top_start = arm_start(v_start, v_band, cx, up == Weight::Double, light);
            let bottom_start = arm_start(v_start, v_band, cx, down == Weight::Double, light);
            pen.rect(top_start, double_h.0, right_edge - top_start, light);
            pen.rect(bottom_start, double_h.1, right_edge - bottom_start, light);
        }
        weight => {
            let t = widths.of(weight);
            let start = arm_start(v_start, v_band, cx, false, light);
            pen.rect(start, cy - t / 2, right_edge - start, t);
        }
    }

    match up {
        Weight::None => {}
        Weight::Double => {
            let left_end = arm_end(h_start, h_band, cy, left == Weight::Double, light);
            let right_end = arm_end(h_start, h_band, cy, right == Weight::Double, light);
            pen.rect(double_v.0, cell.y, light, left_end - cell.y);
            pen.rect(double_v.1, cell.y, light, right_end - cell.y);
        }
        weight => {
            let t = widths.of(weight);
            let end = arm_end(h_start, h_band, cy, false, light);
            pen.rect(cx - t / 2, cell.y, t, end - cell.y);
        }
    }

    match down {
        Weight::None => {}
        Weight::Double => {
            let left_start = arm_start(h_start, h_band, cy, left == Weight::Double, light);
            let right_start = arm_start(h_start, h_band, cy, right == Weight::Double, light);
            pen.rect(double_v.0, left_start, light, bottom_edge - left_start);
            pen.rect(double_v.1, right_start, light, bottom_edge - right_start);
        }
        weight => {
            let t = widths.of(weight);
            let start = arm_start(h_start, h_band, cy, false, light);
            pen.rect(cx - t / 2, start, t, bottom_edge - start);
        }
    }
}

fn draw_dashes(pen: &mut Pen<'_>, cell: GraphicCell, count: i32, horizontal: bool, thickness: i32) {
    let length = if horizontal { cell.width } else { cell.height };
    for i in 0..count {
        let from = length * i / count;
        let to = length * (i + 1) / count;
        let gap = ((to - from) / 3).max(1);
        let dash = to - from - gap;
        if horizontal {
            let y = cell.y + cell.height / 2 - thickness / 2;
            pen.rect(cell.x + from + gap / 2, y, dash, thickness);
        } else {
            let x = cell.x + cell.width / 2 - thickness / 2;
            pen.rect(x, cell.y + from + gap / 2, thickness, dash);
        }
    }
}

/// Rounded corners U+256D..U+2570: a quarter circle joining the middle of
/// two edges.
fn draw_arc_corner(pen: &mut Pen<'_>, c: char, cell: GraphicCell, light: i32) {
    // Direction of the horizontal and vertical arm.
    let (hx, vy): (i32, i32) = match c {
        '\u{256D}' => (1, 1),
        '\u{256E}' => (-1, 1),
        '\u{256F}' => (-1, -1),
        _ => (1, -1),
    };
    let width = f64::from(cell.width);
    let height = f64::from(cell.height);
    let cx = f64::from(cell.width / 2 - light / 2) + f64::from(light) / 2.0;
    let cy = f64::from(cell.height / 2 - light / 2) + f64::from(light) / 2.0;
    let radius = width.min(height) / 2.0;
    let (hx, vy) = (f64::from(hx), f64::from(vy));

    let start = if hx > 0.0 { PI } else { 0.0 };
    let end = start + hx * vy * FRAC_PI_2;
    let mut path = Path::new();
    path.move_to(cx, if vy > 0.0 { height } else { 0.0 })
        .line_to(cx, cy + vy * radius);
    if end > start {
        path.arc(cx + hx * radius, cy + vy * radius, radius, start, end);
    } else {
        path.arc_negative(cx + hx * radius, cy + vy * radius, radius, start, end);
    }
    path.line_to(if hx > 0.0 { width } else { 0.0 }, cy);
    pen.stroke(&path, cell, light);
}

/// Diagonals U+2571..U+2573.
fn draw_diagonal(pen: &mut Pen<'_>, c: char, cell: GraphicCell, light: i32) {
    let width = f64::from(cell.width);
    let height = f64::from(cell.height);
    let mut path = Path::new();
    if c != '\u{2572}' {
        path.move_to(width, 0.0).line_to(0.0, height);
    }
    if c != '\u{2571}' {
        path.move_to(0.0, 0.0).line_to(width, height);
    }
    pen.stroke(&path, cell, light);
}

// Block elements (U+2580..U+259F).

/// Fill the part of the cell between fractions `x0/x_den..x1/x_den` across
/// and `y0/y_den..y1/y_den` down.
fn fraction(
    pen: &mut Pen<'_>,
    cell: GraphicCell,
    (x0, x1, x_den): (i32, i32, i32),
    (y0, y1, y_den): (i32, i32, i32),
    density: f64,
) {
    let left = cell.x + cell.width * x0 / x_den;
    let right = cell.x + cell.width * x1 / x_den;
    let top = cell.y + cell.height * y0 / y_den;
    let bottom = cell.y + cell.height * y1 / y_den;
    pen.shaded_rect(left, top, (right - left).max(1), (bottom - top).max(1), density);
}

/// Quadrants U+2596..U+259F. Bit 3 = top-left, 2 = top-right,
/// 1 = bottom-left, 0 = bottom-right.
const QUADRANTS: [u8; 10] = [
    0b0010, 0b0001, 0b1000, 0b1011, 0b1001, 0b1110, 0b1101, 0b0100, 0b0110, 0b0111,
];

fn draw_block(pen: &mut Pen<'_>, c: char, cell: GraphicCell) {
    const FULL: (i32, i32, i32) = (0, 1, 1);
    let code = u32::from(c) as i32;
    match c {
        '\u{2580}' => fraction(pen, cell, FULL, (0, 1, 2), 1.0),
        '\u{2581}'..='\u{2588}' => {
            let eighths = code - 0x2580;
            fraction(pen, cell, FULL, (8 - eighths, 8, 8), 1.0);
        }
        '\u{2589}'..='\u{258F}' => {
            let eighths = 0x2590 - code;
            fraction(pen, cell, (0, eighths, 8), FULL, 1.0);
        }
        '\u{2590}' => fraction(pen, cell, (1, 2, 2), FULL, 1.0),
        '\u{2591}'..='\u{2593}' => {
            let density = f64::from(code - 0x2590) * 0.25;
            fraction(pen, cell, FULL, FULL, density);
        }
        '\u{2594}' => fraction(pen, cell, FULL, (0, 1, 8), 1.0),
        '\u{2595}' => fraction(pen, cell, (7, 8, 8), FULL, 1.0),
        '\u{2596}'..='\u{259F}' => {
            let mask = QUADRANTS[(code - 0x2596) as usize];
            for (bit, column, row) in [(3, 0, 0), (2, 1, 0), (1, 0, 1), (0, 1, 1)] {
                if mask & (1 << bit) != 0 {
                    fraction(pen, cell, (column, column + 1, 2), (row, row + 1, 2), 1.0);
                }
            }
        }
        _ => {}
    }
}

/// Corner triangles U+25E2..U+25E5.
fn draw_triangle(pen: &mut Pen<'_>, c: char, cell: GraphicCell) {
    let width = f64::from(cell.width);
    let height = f64::from(cell.height);
    let points = match c {
        '\u{25E2}' => [(width, 0.0), (width, height), (0.0, height)],
        '\u{25E3}' => [(0.0, 0.0), (width, height), (0.0, height)],
        '\u{25E4}' => [(0.0, 0.0), (width, 0.0), (0.0, height)],
        _ => [(0.0, 0.0), (width, 0.0), (width, height)],
    };
    pen.fill(&Path::polygon(&points), cell);
}

// Sextants (U+1FB00..U+1FB3B).

/// Bit pattern of a sextant: bit 0 top-left, 1 top-right, 2 middle-left,
/// 3 middle-right, 4 bottom-left, 5 bottom-right. The code points skip the
/// empty, full and half-block patterns, which are encoded elsewhere.
pub(crate) fn sextant_bits(c: char) -> Option<u8> {
    let index = u32::from(c).checked_sub(0x1FB00)?;
    if index > 0x3B {
        return None;
    }
    let mut bits = index as u8 + 1;
    if bits >= 0b01_0101 {
        bits += 1;
    }
    if bits >= 0b10_1010 {
        bits += 1;
    }
    Some(bits)
}

/// Column and row boundaries of the 2x3 mosaic grid, relative to the cell.
fn mosaic_grid(cell: GraphicCell) -> ([i32; 3], [i32; 4]) {
    let columns = [0, cell.width / 2, cell.width];
    let rows = [0, cell.height / 3, cell.height * 2 / 3, cell.height];
    (columns, rows)
}

fn draw_sextant(pen: &mut Pen<'_>, c: char, cell: GraphicCell) {
    let Some(bits) = sextant_bits(c) else {
        return;
    };
    let (columns, rows) = mosaic_grid(cell);
    for i in 0..6 {
        if bits & (1 << i) != 0 {
            let (column, row) = (i % 2, i / 2);
            pen.rect(
                cell.x + columns[column],
                cell.y + rows[row],
                columns[column + 1] - columns[column],
                rows[row + 1] - rows[row],
            );
        }
    }
}

// Wedges (U+1FB3C..U+1FB6F).

/// Smooth mosaic wedges U+1FB3C..U+1FB67 as polygons on the 2x3 grid.
const WEDGES: [&[(i32, i32)]; 44] = [
    &[(0, 2), (1, 3), (0, 3)],
    &[(0, 2), (2, 3), (0, 3)],
    &[(0, 1), (1, 3), (0, 3)],
    &[(0, 1), (2, 3), (0, 3)],
    &[(0, 0), (1, 3), (0, 3)],
    &[(0, 1), (1, 0), (2, 0), (2, 3), (0, 3)],
    &[(0, 1), (2, 0), (2, 3), (0, 3)],
    &[(0, 2), (1, 0), (2, 0), (2, 3), (0, 3)],
    &[(0, 2), (2, 0), (2, 3), (0, 3)],
    &[(0, 3), (1, 0), (2, 0), (2, 3)],
    &[(0, 2), (2, 1), (2, 3), (0, 3)],
    &[(1, 3), (2, 2), (2, 3)],
    &[(0, 3), (2, 2), (2, 3)],
    &[(1, 3), (2, 1), (2, 3)],
    &[(0, 3), (2, 1), (2, 3)],
    &[(1, 3), (2, 0), (2, 3)],
    &[(0, 0), (1, 0), (2, 1), (2, 3), (0, 3)],
    &[(0, 0), (2, 1), (2, 3), (0, 3)],
    &[(0, 0), (1, 0), (2, 2), (2, 3), (0, 3)],
    &[(0, 0), (2, 2), (2, 3), (0, 3)],
    &[(0, 0), (1, 0), (2, 3), (0, 3)],
    &[(0, 1), (2, 2), (2, 3), (0, 3)],
    &[(0, 0), (2, 0), (2, 3), (1, 3), (0, 2)],
    &[(0, 0), (2, 0), (2, 3), (0, 2)],
    &[(0, 0), (2, 0), (2, 3), (1, 3), (0, 1)],
    &[(0, 0), (2, 0), (2, 3), (0, 1)],
    &[(0, 0), (2, 0), (2, 3), (1, 3)],
    &[(0, 0), (1, 0), (0, 1)],
    &[(0, 0), (2, 0), (0, 1)],
    &[(0, 0), (1, 0), (0, 2)],
    &[(0, 0), (2, 0), (0, 2)],
    &[(0, 0), (1, 0), (0, 3)],
    &[(0, 0), (2, 0), (2, 1), (0, 2)],
    &[(0, 0), (2, 0), (2, 2), (1, 3), (0, 3)],
    &[(0, 0), (2, 0), (2, 2), (0, 3)],
    &[(0, 0), (2, 0), (2, 1), (1, 3), (0, 3)],
    &[(0, 0), (2, 0), (2, 1), (0, 3)],
    &[(0, 0), (2, 0), (1, 3), (0, 3)],
    &[(1, 0), (2, 0), (2, 1)],
    &[(0, 0), (2, 0), (2, 1)],
    &[(1, 0), (2, 0), (2, 2)],
    &[(0, 0), (2, 0), (2, 2)],
    &[(1, 0), (2, 0), (2, 3)],
    &[(0, 0), (2, 0), (2, 2), (0, 1)],
];

/// Notched blocks and centre triangles U+1FB68..U+1FB6F on a 2x2 grid.
const CENTRE_WEDGES: [&[(i32, i32)]; 8] = [
    &[(0, 0), (2, 0), (2, 2), (0, 2), (1, 1)],
    &[(0, 0), (1, 1), (2, 0), (2, 2), (0, 2)],
    &[(0, 0), (2, 0), (1, 1), (2, 2), (0, 2)],
    &[(0, 0), (2, 0), (2, 2), (1, 1), (0, 2)],
    &[(0, 0), (1, 1), (0, 2)],
    &[(0, 0), (2, 0), (1, 1)],
    &[(1, 1), (2, 0), (2, 2)],
    &[(1, 1), (2, 2), (0, 2)],
];

/// Polygon through grid points `x/x_den` across and `y/y_den` down,
/// snapped to whole pixels.
fn grid_polygon(cell: GraphicCell, (x_den, y_den): (i32, i32), points: &[(i32, i32)]) -> Path {
    let points: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| {
            (
                f64::from(cell.width * x / x_den),
                f64::from(cell.height * y / y_den),
            )
        })
        .collect();
    Path::polygon(&points)
}

fn draw_wedge(pen: &mut Pen<'_>, c: char, cell: GraphicCell) {
    let index = (u32::from(c) - 0x1FB3C) as usize;
    let path = match index.checked_sub(WEDGES.len()) {
        None => grid_polygon(cell, (2, 3), WEDGES[index]),
        Some(i) => match CENTRE_WEDGES.get(i) {
            Some(points) => grid_polygon(cell, (2, 2), points),
            None => return,
        },
    };
    pen.fill(&path, cell);
}

// Eighths, shades and checkers (U+1FB70..U+1FB9F).

/// Fill every pixel of the cell for which `on(x, y)` holds, `x` and `y`
/// being surface coordinates so patterns tile across cells.
fn draw_pattern(pen: &mut Pen<'_>, cell: GraphicCell, on: fn(i32, i32) -> bool) {
    let mut path = Path::new();
    for dy in 0..cell.height {
        let mut run_start = None;
        for dx in 0..=cell.width {
            let lit = dx < cell.width && on(cell.x + dx, cell.y + dy);
            match (lit, run_start) {
                (true, None) => run_start = Some(dx),
                (false, Some(start)) => {
                    let (x0, x1) = (f64::from(start), f64::from(dx));
                    let (y0, y1) = (f64::from(dy), f64::from(dy + 1));
                    path.move_to(x0, y0)
                        .line_to(x1, y0)
                        .line_to(x1, y1)
                        .line_to(x0, y1)
                        .close();
                    run_start = None;
                }
                _ => {}
            }
        }
    }
    if !path.is_empty() {
        pen.fill(&path, cell);
    }
}

fn draw_legacy_block(pen: &mut Pen<'_>, c: char, cell: GraphicCell) {
    const FULL: (i32, i32, i32) = (0, 1, 1);
    const HALF: f64 = 0.5;
    let code = u32::from(c) as i32;
    // Eighth counts of the growing blocks skip the quarter already in
    // Block Elements.
    let grown = |first: i32| {
        let v = code - first + 2;
        if v >= 4 { v + 1 } else { v }
    };
    match c {
        '\u{1FB70}'..='\u{1FB75}' => {
            let v = code - 0x1FB70 + 1;
            fraction(pen, cell, (v, v + 1, 8), FULL, 1.0);
        }
        '\u{1FB76}'..='\u{1FB7B}' => {
            let v = code - 0x1FB76 + 1;
            fraction(pen, cell, FULL, (v, v + 1, 8), 1.0);
        }
        '\u{1FB7C}' => {
            fraction(pen, cell, FULL, (7, 8, 8), 1.0);
            fraction(pen, cell, (0, 1, 8), FULL, 1.0);
        }
        '\u{1FB7D}' => {
            fraction(pen, cell, FULL, (0, 1, 8), 1.0);
            fraction(pen, cell, (0, 1, 8), FULL, 1.0);
        }
        '\u{1FB7E}' => {
            fraction(pen, cell, FULL, (0, 1, 8), 1.0);
            fraction(pen, cell, (7, 8, 8), FULL, 1.0);
        }
        '\u{1FB7F}' => {
            fraction(pen, cell, FULL, (7, 8, 8), 1.0);
            fraction(pen, cell, (7, 8, 8), FULL, 1.0);
        }
        '\u{1FB80}' => {
            fraction(pen, cell, FULL, (0, 1, 8), 1.0);
            fraction(pen, cell, FULL, (7, 8, 8), 1.0);
        }
        '\u{1FB81}' => {
            for row in [0, 2, 4, 7] {
                fraction(pen, cell, FULL, (row, row + 1, 8), 1.0);
            }
        }
        '\u{1FB82}'..='\u{1FB86}' => {
            fraction(pen, cell, FULL, (0, grown(0x1FB82), 8), 1.0);
        }
        '\u{1FB87}'..='\u{1FB8B}' => {
            fraction(pen, cell, (8 - grown(0x1FB87), 8, 8), FULL, 1.0);
        }
        '\u{1FB8C}' => fraction(pen, cell, (0, 1, 2), FULL, HALF),
        '\u{1FB8D}' => fraction(pen, cell, (1, 2, 2), FULL, HALF),
        '\u{1FB8E}' => fraction(pen, cell, FULL, (0, 1, 2), HALF),
        '\u{1FB8F}' => fraction(pen, cell, FULL, (1, 2, 2), HALF),
        '\u{1FB90}' => fraction(pen, cell, FULL, FULL, HALF),
        '\u{1FB91}' => {
            fraction(pen, cell, FULL, (0, 1, 2), 1.0);
            fraction(pen, cell, FULL, (1, 2, 2), HALF);
        }
        '\u{1FB92}' => {
            fraction(pen, cell, FULL, (1, 2, 2), 1.0);
            fraction(pen, cell, FULL, (0, 1, 2), HALF);
        }
        '\u{1FB94}' => {
            fraction(pen, cell, (1, 2, 2), FULL, 1.0);
            fraction(pen, cell, (0, 1, 2), FULL, HALF);
        }
        '\u{1FB95}' => draw_pattern(pen, cell, |x, y| (x & 2) == (y & 2)),
        '\u{1FB96}' => draw_pattern(pen, cell, |x, y| (x & 2) != (y & 2)),
        '\u{1FB97}' => {
            fraction(pen, cell, FULL, (1, 2, 4), 1.0);
            fraction(pen, cell, FULL, (3, 4, 4), 1.0);
        }
        '\u{1FB98}' => draw_pattern(pen, cell, |x, y| (x & 3) == (y & 3)),
        '\u{1FB99}' => draw_pattern(pen, cell, |x, y| ((x + y) & 3) == 3),
        '\u{1FB9A}' | '\u{1FB9B}' => {
            let points = if c == '\u{1FB9A}' {
                [(0, 0), (1, 0), (0, 1), (1, 1)]
            } else {
                [(0, 0), (1, 1), (1, 0), (0, 1)]
            };
            pen.fill(&grid_polygon(cell, (1, 1), &points), cell);
        }
        '\u{1FB9C}'..='\u{1FB9F}' => {
            let points: [(i32, i32); 3] = match c {
                '\u{1FB9C}' => [(0, 0), (1, 0), (0, 1)],
                '\u{1FB9D}' => [(0, 0), (1, 0), (1, 1)],
                '\u{1FB9E}' => [(0, 1), (1, 0), (1, 1)],
                _ => [(0, 0), (1, 1), (0, 1)],
            };
            pen.shaded_fill(&grid_polygon(cell, (1, 1), &points), cell, HALF);
        }
        // U+1FB93 is unassigned.
        _ => {}
    }
}

// Diagonal joins (U+1FBA0..U+1FBAE).

/// Corners each join connects: bit 0 upper left, 1 upper right, 2 lower
/// left, 3 lower right.
const DIAGONAL_JOINS: [u8; 15] = [
    0b0001, 0b0010, 0b0100, 0b1000, 0b0101, 0b1010, 0b1100, 0b0011, 0b1001, 0b0110, 0b1110,
    0b1101, 0b1011, 0b0111, 0b1111,
];

/// Light strokes from the middle of a side edge to the middle of the top
/// or bottom edge.
fn draw_diagonal_joins(pen: &mut Pen<'_>, c: char, cell: GraphicCell, light: i32) {
    let Some(&mask) = DIAGONAL_JOINS.get((u32::from(c) - 0x1FBA0) as usize) else {
        return;
    };
    let adjust = if light % 2 == 1 { 0.5 } else { 0.0 };
    let half = f64::from(light) / 2.0;
    let width = f64::from(cell.width);
    let height = f64::from(cell.height);
    let cx = f64::from(cell.width / 2) + adjust;
    let cy = f64::from(cell.height / 2) + adjust;

    let mut path = Path::new();
    for (bit, edge_x, inner_x, inner_y, edge_y) in [
        (0, 0.0, half, half, 0.0),
        (1, width, width - half, half, 0.0),
        (2, 0.0, half, height - half, height),
        (3, width, width - half, height - half, height),
    ] {
        if mask & (1 << bit) != 0 {
            path.move_to(edge_x, cy)
                .line_to(inner_x, cy)
                .line_to(cx, inner_y)
                .line_to(cx, edge_y);
        }
    }
    pen.stroke(&path, cell, light);
}

/// Paint a mosaic as six separated blocks: each block of the 2x3 grid loses
/// one light line width on its left and bottom. Too small a cell leaves
/// nothing to paint.
fn draw_separated(pen: &mut Pen<'_>, c: char, cell: GraphicCell, widths: LineWidths) {
    let pel = widths.light;
    if cell.width <= 2 * pel || cell.height <= 3 * pel {
        return;
    }
    let (columns, rows) = mosaic_grid(cell);
    for row in 0..3 {
        for column in 0..2 {
            let clip = Rect::from_px(
                cell.x + columns[column] + pel,
                cell.y + rows[row],
                columns[column + 1] - columns[column] - pel,
                rows[row + 1] - rows[row] - pel,
            );
            pen.canvas.push_clip(clip);
            paint(pen, c, cell, widths);
            pen.canvas.pop_clip();
        }
    }
}

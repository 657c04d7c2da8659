//! Code point substitution for right-to-left cells.

use super::builtin::{BOX_SEGMENTS, box_segments, pack_segments};

/// Glyphs outside the segment table that mirror onto each other.
const GRAPHIC_PAIRS: &[(char, char)] = &[
    ('╭', '╮'),
    ('╯', '╰'),
    ('╱', '╲'),
    ('▌', '▐'),
    ('▏', '▕'),
    ('▖', '▗'),
    ('▘', '▝'),
    ('▙', '▟'),
    ('▚', '▞'),
    ('▛', '▜'),
    ('◢', '◣'),
    ('◤', '◥'),
];

fn lookup(pairs: &[(char, char)], c: char) -> Option<char> {
    pairs.iter().find_map(|&(a, b)| {
        if a == c {
            Some(b)
        } else if b == c {
            Some(a)
        } else {
            None
        }
    })
}

/// Bidi mirror of `c` from the Unicode `Bidi_Mirroring_Glyph` data, or `c`
/// itself if it has none.
pub fn mirror_char(c: char) -> char {
    unicode_bidi_mirroring::get_mirrored(c).unwrap_or(c)
}

/// Horizontal flip of a box drawing or block graphic, or `c` itself if it
/// is symmetric or not a graphic.
pub fn mirror_box(c: char) -> char {
    if let Some(m) = lookup(GRAPHIC_PAIRS, c) {
        return m;
    }
    let Some([left, right, up, down]) = box_segments(c) else {
        return c;
    };
    if left == right {
        return c;
    }
    let flipped = pack_segments([right, left, up, down]);
    BOX_SEGMENTS
        .iter()
        .position(|&packed| packed == flipped)
        .and_then(|i| char::from_u32(0x2500 + i as u32))
        .unwrap_or(c)
}

/// Mirror for a request: box graphics first when asked, then bidi pairs.
pub fn mirror(c: char, box_mirror: bool) -> char {
    if box_mirror {
        let m = mirror_box(c);
        if m != c {
            return m;
        }
    }
    mirror_char(c)
}

//! Curly underline geometry.
//!
//! One period of the curl spans one cell: a downward arc over the left half
//! and an upward arc over the right half, each a quarter circle of radius
//! `cell_width / 2 / sqrt(2)`. The path is built once per cell width and
//! line width and repeated for every cell.

use std::f64::consts::{FRAC_PI_4, SQRT_2};

use super::canvas::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Undercurl {
    cell_width: i32,
    line_width: f64,
    path: Path,
}

impl Undercurl {
    fn radius(cell_width: i32) -> f64 {
        f64::from(cell_width) / 2.0 / SQRT_2
    }

    /// Height of one arc above its chord.
    fn arc_height(cell_width: i32) -> f64 {
        Self::radius(cell_width) * (1.0 - SQRT_2 / 2.0)
    }

    /// Vertical extent of the stroked curl.
    pub fn height(cell_width: i32, line_width: f64) -> f64 {
        2.0 * Self::arc_height(cell_width) + line_width
    }

    pub fn new(cell_width: i32, line_width: f64) -> Self {
        let width = f64::from(cell_width);
        let radius = Self::radius(cell_width);
        let centre = Self::height(cell_width, line_width) / 2.0;

        let mut path = Path::new();
        path.arc(
            width / 4.0,
            centre + width / 4.0,
            radius,
            5.0 * FRAC_PI_4,
            7.0 * FRAC_PI_4,
        )
        .arc_negative(
            3.0 * width / 4.0,
            centre - width / 4.0,
            radius,
            3.0 * FRAC_PI_4,
            FRAC_PI_4,
        );

        Self {
            cell_width,
            line_width,
            path,
        }
    }

    /// Whether this curl was built for the given geometry.
    pub fn matches(&self, cell_width: i32, line_width: f64) -> bool {
        self.cell_width == cell_width && self.line_width.to_bits() == line_width.to_bits()
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// One period, relative to the top left corner of its cell.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

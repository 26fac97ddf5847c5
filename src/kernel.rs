// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  A point c is in the Mandelbrot set if the
//! orbit of z -> z² + c, starting at zero, stays bounded.  We can't
//! iterate forever, so a point whose orbit stays inside the circle of
//! radius 2 for the whole iteration budget is treated as bounded.

use num::Complex;
use planes::{GridSize, RealAxisTable};

/// Rendered for points treated as inside the set.
pub const INSIDE: u8 = b'#';

/// Rendered for points whose orbit escaped.
pub const OUTSIDE: u8 = b'.';

/// Escape radius. Comparing the magnitude (not its square) against
/// exactly this value keeps boundary points classified the same way
/// every time.
const ESCAPE_RADIUS: f32 = 2.0;

/// Iterate the orbit of `c` and return the final counter.
///
/// The counter is bumped *before* it is compared against `max_n`, and
/// only while the orbit is still inside the escape radius, so at most
/// `max_n - 1` updates of z happen.  A return value equal to `max_n`
/// means the orbit never escaped.
#[inline]
pub fn escape_count(c: Complex<f32>, max_n: usize) -> usize {
    let mut z: Complex<f32> = Complex::new(0.0, 0.0);
    let mut n = 0;
    while z.norm() < ESCAPE_RADIUS {
        n += 1;
        if n >= max_n {
            break;
        }
        z = z * z + c;
    }
    n
}

/// The symbol for a single point.
#[inline]
pub fn classify(c: Complex<f32>, max_n: usize) -> u8 {
    if escape_count(c, max_n) == max_n {
        INSIDE
    } else {
        OUTSIDE
    }
}

/// Binds the grid dimensions to the precomputed real axis so that
/// workers can ask for a symbol by (row, column) alone.  Shared by
/// reference across all workers; nothing in it is ever written.
pub struct EscapeKernel<'a> {
    size: GridSize,
    axis: &'a RealAxisTable,
}

impl<'a> EscapeKernel<'a> {
    /// The axis table must cover every column of `size`.
    pub fn new(size: GridSize, axis: &'a RealAxisTable) -> EscapeKernel<'a> {
        assert_eq!(size.columns, axis.len());
        EscapeKernel { size, axis }
    }

    /// The dimensions this kernel renders.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The symbol for the cell at (row, column).
    pub fn symbol(&self, row: usize, column: usize) -> u8 {
        classify(
            self.axis.point(column, self.size.imaginary(row)),
            self.size.max_n,
        )
    }

    /// Fill `buffer` with every symbol of `row`.  The buffer is
    /// cleared first and ends up exactly `columns` long.
    pub fn render_row(&self, row: usize, buffer: &mut Vec<u8>) {
        let imaginary = self.size.imaginary(row);
        let max_n = self.size.max_n;
        buffer.clear();
        buffer.extend(
            (0..self.size.columns).map(|column| classify(self.axis.point(column, imaginary), max_n)),
        );
    }
}

//! Contains the relationship between the integral grid of rows and
//! columns and the slice of the complex plane it samples.  The real
//! axis runs from -1.5 to 0.5 across the columns and the imaginary
//! axis from -1.0 to 1.0 down the rows.
//!
//! All arithmetic here is single precision.  Points that sit right on
//! the boundary of the set classify differently in double precision,
//! and the output must not change with the machine it runs on.

use errors::{MandelError, Result};
use num::Complex;
use std::mem;

/// The size of the render: the number of rows and columns of the
/// integral grid, and the iteration cap for every point in it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSize {
    /// Number of rows (the height of the image).
    pub rows: usize,
    /// Number of columns (the width of the image).
    pub columns: usize,
    /// The iteration cap.
    pub max_n: usize,
}

impl GridSize {
    /// Constructor.
    pub fn new(rows: usize, columns: usize, max_n: usize) -> GridSize {
        GridSize {
            rows,
            columns,
            max_n,
        }
    }

    /// Map a row of the integral grid to its imaginary component.
    /// Constant along the row, so callers compute it once per row.
    pub fn imaginary(&self, row: usize) -> f32 {
        (row as f32) * 2.0 / (self.rows as f32) - 1.0
    }
}

/// The real component of every column, computed once before any
/// worker starts and only read after that.
#[derive(Clone, Debug)]
pub struct RealAxisTable(Vec<f32>);

impl RealAxisTable {
    /// Precompute the real component for each of `columns` columns.
    /// The table is reserved up front; if the allocator refuses it the
    /// render can't proceed.
    pub fn new(columns: usize) -> Result<RealAxisTable> {
        let mut reals: Vec<f32> = Vec::new();
        reals.try_reserve_exact(columns).map_err(|_| {
            MandelError::AxisAllocation(columns.saturating_mul(mem::size_of::<f32>()))
        })?;
        reals.extend((0..columns).map(|c| (c as f32) * 2.0 / (columns as f32) - 1.5));
        Ok(RealAxisTable(reals))
    }

    /// The real component of column `column`.
    #[inline]
    pub fn real(&self, column: usize) -> f32 {
        self.0[column]
    }

    /// Number of columns covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Describes that the table covers no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Given a pixel's column and the imaginary component of its row,
    /// return the point on the complex plane it samples.
    #[inline]
    pub fn point(&self, column: usize, imaginary: f32) -> Complex<f32> {
        Complex::new(self.0[column], imaginary)
    }
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row-partitioned Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which the orbit of z -> z² + c, starting at zero, stays bounded.
//! This crate samples a fixed window of the plane on a grid of rows
//! and columns and renders each sample as a single character: `#` for
//! points that never escaped within the iteration cap, `.` for points
//! that did.
//!
//! The work is split by rows.  The planner picks a worker count from
//! the number of processors and the height of the grid, the rows are
//! divided into contiguous, near-equal partitions, and each worker
//! renders its own rows on a scoped thread.  Workers never share a
//! row, and the image is assembled only after all of them have been
//! joined, so the output is the same no matter how the rows were
//! split.

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod input;
pub mod kernel;
pub mod partition;
pub mod plan;
pub mod planes;
pub mod planner;

pub use config::Config;
pub use dispatch::{render_sequential, Dispatcher, Grid};
pub use errors::{Exit, MandelError, Result};
pub use plan::ExecutionPlan;
pub use planes::GridSize;
pub use planner::CpuCount;

/// Plan and render a grid of `size` on `cpus` processors.
pub fn render(size: GridSize, config: &Config, cpus: CpuCount) -> Result<Grid> {
    debug!("Running on {} CPUs", cpus.get());
    let plan = ExecutionPlan::new(size.rows, cpus);
    Dispatcher::new(config).render(size, &plan)
}

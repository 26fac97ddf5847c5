// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs an execution plan.  One scoped worker is spawned per
//! partition; each allocates and fills the rows it owns and hands
//! them back when it is joined.  No worker ever touches a row outside
//! of its partition, so the grid needs no locking: it doesn't exist
//! until every worker has been collected.

extern crate crossbeam;

use config::Config;
use crossbeam::thread::ScopedJoinHandle;
use errors::{MandelError, Result};
use kernel::EscapeKernel;
use partition::WorkPartition;
use plan::ExecutionPlan;
use planes::{GridSize, RealAxisTable};
use std::io::Write;
use std::mem;

type Rows = Vec<Vec<u8>>;

/// The finished image, one buffer per row.  Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: Rows,
}

impl Grid {
    /// All rows, in row order.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// A single row.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.rows[row]
    }

    /// Write the image row-major: each row's symbols, then a newline.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for row in &self.rows {
            out.write_all(row)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// The byte size of a row of `columns` symbols, refusing anything over
/// the ceiling.
fn row_bytes(columns: usize, max_row_bytes: usize) -> Result<usize> {
    let bytes = columns.saturating_mul(mem::size_of::<u8>());
    if bytes > max_row_bytes {
        return Err(MandelError::RowTooLarge(bytes, max_row_bytes));
    }
    Ok(bytes)
}

/// Reserve the buffer for `row`, refusing anything over the ceiling.
fn allocate_row(row: usize, columns: usize, max_row_bytes: usize) -> Result<Vec<u8>> {
    let bytes = row_bytes(columns, max_row_bytes)?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| MandelError::Allocation(bytes, row))?;
    Ok(buffer)
}

/// The body of a worker: every row of the partition, in order.
fn render_partition(
    kernel: &EscapeKernel,
    partition: WorkPartition,
    max_row_bytes: usize,
) -> Result<Rows> {
    partition
        .rows()
        .map(|row| {
            let mut buffer = allocate_row(row, kernel.size().columns, max_row_bytes)?;
            kernel.render_row(row, &mut buffer);
            Ok(buffer)
        })
        .collect()
}

/// Spawns the workers of a plan and assembles their rows.
pub struct Dispatcher<'a> {
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    /// Constructor.
    pub fn new(config: &'a Config) -> Dispatcher<'a> {
        Dispatcher { config }
    }

    /// Render `size` with one worker per partition of `plan`.
    ///
    /// Every worker is joined before this returns, even when one of
    /// them fails.  If several fail, the error from the earliest
    /// partition is reported.
    pub fn render(&self, size: GridSize, plan: &ExecutionPlan) -> Result<Grid> {
        let max_row_bytes = self.config.max_row_bytes;
        let axis = match prepare_axis(size, max_row_bytes)? {
            Some(axis) => axis,
            None => return Ok(Grid { rows: vec![] }),
        };
        let kernel = EscapeKernel::new(size, &axis);
        let kernel = &kernel;

        let collected = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Result<Rows>>> = plan
                .partitions
                .iter()
                .enumerate()
                .map(|(i, &partition)| {
                    debug!(
                        "Creating Thread {} from {} to {}",
                        i,
                        partition.start,
                        partition.end.saturating_sub(1)
                    );
                    spawner.spawn(move |_| render_partition(kernel, partition, max_row_bytes))
                })
                .collect();

            handles
                .into_iter()
                .zip(plan.partitions.iter())
                .enumerate()
                .map(|(i, (handle, partition))| {
                    debug!(
                        "Collecting Thread {} from {} to {}",
                        i,
                        partition.start,
                        partition.end.saturating_sub(1)
                    );
                    handle.join()
                })
                .collect::<Vec<_>>()
        })
        .map_err(|_| MandelError::WorkersLost)?;

        let mut rows = Vec::with_capacity(size.rows);
        for (i, result) in collected.into_iter().enumerate() {
            match result {
                Ok(Ok(partition_rows)) => rows.extend(partition_rows),
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(MandelError::WorkerPanicked(i)),
            }
        }
        Ok(Grid { rows })
    }
}

/// Check the row size against the ceiling, then build the real axis.
/// Nothing is allocated for a grid with no rows.
fn prepare_axis(size: GridSize, max_row_bytes: usize) -> Result<Option<RealAxisTable>> {
    if size.rows == 0 {
        return Ok(None);
    }
    row_bytes(size.columns, max_row_bytes)?;
    RealAxisTable::new(size.columns).map(Some)
}

/// Render every row on the calling thread.  Produces the same grid as
/// any plan does.
pub fn render_sequential(size: GridSize, config: &Config) -> Result<Grid> {
    let axis = match prepare_axis(size, config.max_row_bytes)? {
        Some(axis) => axis,
        None => return Ok(Grid { rows: vec![] }),
    };
    let kernel = EscapeKernel::new(size, &axis);
    let rows = render_partition(
        &kernel,
        WorkPartition {
            start: 0,
            end: size.rows,
        },
        config.max_row_bytes,
    )?;
    Ok(Grid { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::{CpuCount, MAX_CPUS};

    fn plan(rows: usize, cpus: usize) -> ExecutionPlan {
        ExecutionPlan::new(rows, CpuCount::new(cpus).unwrap())
    }

    #[test]
    fn grid_has_the_requested_shape() {
        let config = Config::default();
        let size = GridSize::new(37, 53, 40);
        let grid = Dispatcher::new(&config).render(size, &plan(37, 3)).unwrap();
        assert_eq!(grid.rows().len(), 37);
        assert!(grid.rows().iter().all(|row| row.len() == 53));
        assert!(grid
            .rows()
            .iter()
            .all(|row| row.iter().all(|&b| b == b'#' || b == b'.')));
    }

    #[test]
    fn cap_of_one_fills_the_grid() {
        let config = Config::default();
        let size = GridSize::new(12, 9, 1);
        let grid = Dispatcher::new(&config).render(size, &plan(12, 2)).unwrap();
        assert!(grid.rows().iter().all(|row| row.iter().all(|&b| b == b'#')));
    }

    #[test]
    fn output_does_not_depend_on_the_plan() {
        let config = Config::default();
        let size = GridSize::new(61, 47, 200);
        let reference = render_sequential(size, &config).unwrap();
        for cpus in 1..=MAX_CPUS {
            let grid = Dispatcher::new(&config)
                .render(size, &plan(size.rows, cpus))
                .unwrap();
            assert_eq!(grid, reference, "differs with {} cpus", cpus);
        }
    }

    #[test]
    fn empty_grid_renders_nothing() {
        let config = Config::default();
        let size = GridSize::new(0, 10, 10);
        let grid = Dispatcher::new(&config).render(size, &plan(0, 4)).unwrap();
        assert!(grid.rows().is_empty());
        let mut out = Vec::new();
        grid.write_to(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_columns_gives_empty_lines() {
        let config = Config::default();
        let size = GridSize::new(3, 0, 10);
        let grid = Dispatcher::new(&config).render(size, &plan(3, 2)).unwrap();
        let mut out = Vec::new();
        grid.write_to(&mut out).unwrap();
        assert_eq!(out, b"\n\n\n".to_vec());
    }

    #[test]
    fn serializes_rows_in_order() {
        let config = Config::default();
        let size = GridSize::new(2, 4, 100);
        let grid = Dispatcher::new(&config).render(size, &plan(2, 2)).unwrap();
        let mut out = Vec::new();
        grid.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "####");
        assert_eq!(grid.row(1), b"####");
    }

    #[test]
    fn oversized_rows_are_refused() {
        let config = Config {
            max_row_bytes: 8,
            ..Config::default()
        };
        let size = GridSize::new(4, 9, 10);
        match Dispatcher::new(&config).render(size, &plan(4, 2)) {
            Err(MandelError::RowTooLarge(9, 8)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match render_sequential(size, &config) {
            Err(MandelError::RowTooLarge(9, 8)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn huge_width_is_refused_before_anything_is_allocated() {
        let config = Config::default();
        let size = GridSize::new(1, usize::max_value() / 2, 1);
        match Dispatcher::new(&config).render(size, &plan(1, 1)) {
            Err(MandelError::RowTooLarge(bytes, ceiling)) => {
                assert_eq!(bytes, usize::max_value() / 2);
                assert_eq!(ceiling, config.max_row_bytes);
            }
            other => panic!("unexpected {:?}", other),
        }
        match render_sequential(size, &config) {
            Err(MandelError::RowTooLarge(..)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn no_rows_skips_the_size_check() {
        let config = Config {
            max_row_bytes: 1,
            ..Config::default()
        };
        let size = GridSize::new(0, usize::max_value() / 2, 1);
        assert!(Dispatcher::new(&config)
            .render(size, &plan(0, 1))
            .unwrap()
            .rows()
            .is_empty());
        assert!(render_sequential(size, &config).unwrap().rows().is_empty());
    }

    #[test]
    fn row_at_the_ceiling_is_fine() {
        let config = Config {
            max_row_bytes: 9,
            ..Config::default()
        };
        let size = GridSize::new(4, 9, 10);
        assert!(Dispatcher::new(&config).render(size, &plan(4, 2)).is_ok());
    }
}

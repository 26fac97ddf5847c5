//! Decides how many workers a render gets.
//!
//! Ideally there would be one worker per row, each on its own CPU.
//! There are almost always more rows than CPUs, though, so we aim for
//! a row/worker ratio close to one while keeping the number of workers
//! below a fixed multiple of the CPU count.

use errors::{MandelError, Result};

/// Upper bound on the number of processors we are willing to plan for.
pub const MAX_CPUS: usize = 64;

/// The overload cap: at most this many workers per CPU.
pub const MAX_THREAD_CPU_RATIO: f32 = 10.0;

/// A processor count known to lie in `[1, MAX_CPUS]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CpuCount(usize);

impl CpuCount {
    /// Validate a raw processor count.
    pub fn new(cpus: usize) -> Result<CpuCount> {
        if cpus == 0 || cpus > MAX_CPUS {
            return Err(MandelError::CpuCount(cpus, MAX_CPUS));
        }
        Ok(CpuCount(cpus))
    }

    /// The validated count.
    pub fn get(self) -> usize {
        self.0
    }
}

/// Choose the worker count for `max_row` rows on `cpus` processors.
///
/// With at least as many CPUs as rows every row gets its own worker.
/// Otherwise the count grows one at a time for as long as every worker
/// still has at least one row and the cap of `MAX_THREAD_CPU_RATIO`
/// workers per CPU holds, and the step that broke the condition is
/// taken back.  The result is roughly `min(max_row, 10 * cpus)`.
pub fn plan_thread_count(max_row: usize, cpus: CpuCount) -> usize {
    let cpus = cpus.get();
    if cpus >= max_row {
        return max_row;
    }

    let mut threads = 0;
    loop {
        threads += 1;
        let row_thread_ratio = max_row / threads;
        let thread_cpu_ratio = threads as f32 / cpus as f32;
        if !(row_thread_ratio >= 1 && thread_cpu_ratio <= MAX_THREAD_CPU_RATIO) {
            break;
        }
    }
    threads - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpus(n: usize) -> CpuCount {
        CpuCount::new(n).unwrap()
    }

    #[test]
    fn cpu_count_rejects_out_of_range() {
        assert!(CpuCount::new(0).is_err());
        assert!(CpuCount::new(65).is_err());
        assert_eq!(CpuCount::new(1).unwrap().get(), 1);
        assert_eq!(CpuCount::new(64).unwrap().get(), 64);
    }

    #[test]
    fn one_worker_per_row_when_cpus_suffice() {
        assert_eq!(plan_thread_count(10, cpus(MAX_CPUS)), 10);
        assert_eq!(plan_thread_count(4, cpus(4)), 4);
    }

    #[test]
    fn no_rows_means_no_workers() {
        assert_eq!(plan_thread_count(0, cpus(1)), 0);
        assert_eq!(plan_thread_count(0, cpus(64)), 0);
    }

    #[test]
    fn overload_cap_limits_workers() {
        assert_eq!(plan_thread_count(100, cpus(2)), 20);
        assert_eq!(plan_thread_count(1000, cpus(8)), 80);
        assert_eq!(plan_thread_count(10_000, cpus(64)), 640);
    }

    #[test]
    fn rows_limit_workers_below_the_cap() {
        assert_eq!(plan_thread_count(15, cpus(2)), 15);
        assert_eq!(plan_thread_count(20, cpus(2)), 20);
        assert_eq!(plan_thread_count(21, cpus(2)), 20);
    }

    #[test]
    fn single_cpu() {
        assert_eq!(plan_thread_count(1, cpus(1)), 1);
        assert_eq!(plan_thread_count(2, cpus(1)), 2);
        assert_eq!(plan_thread_count(50, cpus(1)), 10);
    }

    #[test]
    fn always_between_one_and_max_row() {
        for cpu in 1..=MAX_CPUS {
            for max_row in 1..300 {
                let threads = plan_thread_count(max_row, cpus(cpu));
                assert!(threads >= 1 && threads <= max_row);
                assert!(threads as f32 / cpu as f32 <= MAX_THREAD_CPU_RATIO || threads == max_row);
            }
        }
    }
}

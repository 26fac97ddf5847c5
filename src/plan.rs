//! The execution plan: how many workers, and which rows each one
//! owns.  Computed once from the grid height and the CPU count, then
//! consumed by the dispatcher.

use partition::{partition_rows, WorkPartition};
use planner::{plan_thread_count, CpuCount};

/// Worker count and row assignment for a single render.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionPlan {
    /// Number of workers to spawn.
    pub thread_count: usize,
    /// One partition per worker, ordered by starting row.
    pub partitions: Vec<WorkPartition>,
}

impl ExecutionPlan {
    /// Plan a render of `max_row` rows on `cpus` processors.
    pub fn new(max_row: usize, cpus: CpuCount) -> ExecutionPlan {
        let thread_count = plan_thread_count(max_row, cpus);
        debug!("Running with {} threads", thread_count);
        ExecutionPlan {
            thread_count,
            partitions: partition_rows(max_row, thread_count),
        }
    }
}

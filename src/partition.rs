//! Splits the rows of the grid into one contiguous range per worker.

use std::ops::Range;

/// A contiguous range of rows handed to a single worker.  `end` is
/// exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkPartition {
    /// First row of the range.
    pub start: usize,
    /// One past the last row of the range.
    pub end: usize,
}

impl WorkPartition {
    /// Number of rows in the partition.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Describes that the partition covers no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The rows covered, in the order the worker processes them.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `[0, max_row)` into `thread_count` contiguous partitions.
///
/// Every partition gets `max_row / thread_count` rows and the first
/// `max_row % thread_count` of them take one extra, so that a large
/// remainder is spread out instead of landing on a single worker.
/// `thread_count` must not exceed `max_row` unless both are zero.
pub fn partition_rows(max_row: usize, thread_count: usize) -> Vec<WorkPartition> {
    if thread_count == 0 {
        return vec![];
    }
    let rows_per_thread = max_row / thread_count;
    let mut remainder = max_row % thread_count;
    let mut last_end = 0;
    (0..thread_count)
        .map(|_| {
            let start = last_end;
            let mut end = start + rows_per_thread;
            if remainder > 0 {
                end += 1;
                remainder -= 1;
            }
            last_end = end;
            WorkPartition { start, end }
        })
        .collect()
}

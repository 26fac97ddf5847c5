// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  Nothing in the library recovers from
//! any of these; they exist so the binary can decide, in one place,
//! whether a failure is a bad request, a resource problem, or a
//! broken invariant.

use std::io;

/// The failure taxonomy for a render.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// The three input integers could not be read.
    #[fail(display = "Could not read input: {}", _0)]
    Input(String),

    /// A command-line flag or environment override could not be used.
    #[fail(display = "Bad configuration: {}", _0)]
    Config(String),

    /// The processor count fell outside of the supported range.
    #[fail(display = "CPU count {} is outside of the range [1, {}]", _0, _1)]
    CpuCount(usize, usize),

    /// A single row would need more bytes than the configured ceiling.
    #[fail(
        display = "Trying to allocate too much memory: row of {} bytes exceeds ceiling of {} bytes",
        _0, _1
    )]
    RowTooLarge(usize, usize),

    /// The allocator refused a row buffer.
    #[fail(display = "Could not allocate {} bytes for row {}", _0, _1)]
    Allocation(usize, usize),

    /// The allocator refused the table of real components.
    #[fail(display = "Could not allocate {} bytes for the real axis", _0)]
    AxisAllocation(usize),

    /// A worker thread died before handing back its rows.
    #[fail(display = "Worker {} panicked while rendering", _0)]
    WorkerPanicked(usize),

    /// The worker scope ended with threads that were never joined.
    #[fail(display = "Render workers could not all be joined")]
    WorkersLost,

    /// Reading the input or writing the image failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),
}

/// How the process should end when a given error reaches `main`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Exit {
    /// Terminate with the given status code.
    Code(i32),
    /// Terminate abnormally; the invariant the run depends on is broken.
    Abort,
}

impl MandelError {
    /// Map the error to its process exit policy.
    pub fn exit(&self) -> Exit {
        match *self {
            MandelError::Input(_) | MandelError::Config(_) => Exit::Code(2),
            MandelError::CpuCount(..) => Exit::Abort,
            MandelError::RowTooLarge(..)
            | MandelError::Allocation(..)
            | MandelError::AxisAllocation(_)
            | MandelError::WorkerPanicked(_)
            | MandelError::WorkersLost
            | MandelError::Io(_) => Exit::Code(1),
        }
    }
}

impl From<io::Error> for MandelError {
    fn from(err: io::Error) -> Self {
        MandelError::Io(err)
    }
}

/// Results for everything in this crate.
pub type Result<T> = ::std::result::Result<T, MandelError>;

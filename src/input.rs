//! Reads the three integers that describe a render: row count, column
//! count, iteration cap.  They may be split across lines; anything
//! after the third is ignored.

use errors::{MandelError, Result};
use planes::GridSize;
use std::io::BufRead;

const NAMES: [&str; 3] = ["row count", "column count", "iteration cap"];

/// Read a `GridSize` from `reader`.  Negative or non-numeric values
/// are rejected; zero is allowed everywhere.
pub fn read_grid_size<R: BufRead>(reader: R) -> Result<GridSize> {
    let mut values = Vec::with_capacity(NAMES.len());
    for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            if values.len() == NAMES.len() {
                break;
            }
            let name = NAMES[values.len()];
            let value = token.parse::<usize>().map_err(|_| {
                MandelError::Input(format!(
                    "{} must be a non-negative integer, got {:?}",
                    name, token
                ))
            })?;
            values.push(value);
        }
        if values.len() == NAMES.len() {
            break;
        }
    }

    if values.len() < NAMES.len() {
        return Err(MandelError::Input(format!(
            "missing {}",
            NAMES[values.len()]
        )));
    }
    Ok(GridSize::new(values[0], values[1], values[2]))
}

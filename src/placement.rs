use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A fixed terminal cell where a bar's output begins.
///
/// Coordinates are zero based. They are not checked against the terminal size;
/// writing outside the screen is up to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub column: u16,
    pub row: u16,
}

impl Placement {
    pub fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Placements at column 0 for every row in `first..last`.
    ///
    /// An empty or reversed range gives no placements.
    pub fn rows(first: u16, last: u16) -> Vec<Placement> {
        (first..last).map(|row| Placement::new(0, row)).collect()
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Progress of a single bar, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    pub fn new(value: u32) -> Result<Self> {
        if value > 100 {
            return Err(Error::ProgressOutOfRange(value));
        }
        Ok(Progress(value as u8))
    }

    /// Scales `step` out of `steps` onto `0..=100`, rounding down.
    ///
    /// With 100 steps, step `i` maps to `i` percent.
    pub fn of(step: usize, steps: usize) -> Self {
        if steps == 0 {
            return Progress::COMPLETE;
        }
        let percent = step.min(steps) * 100 / steps;
        Progress(percent as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

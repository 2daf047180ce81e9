use std::process::ExitStatus;

use thiserror::Error;

use crate::Placement;

/// Errors produced while rendering or dispatching progress bars.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A progress value was outside `0..=100`.
    #[error("progress value {0} is out of range (expected 0..=100)")]
    ProgressOutOfRange(u32),

    /// A job descriptor could not be encoded or decoded.
    #[error("malformed job descriptor: {0}")]
    Protocol(#[from] serde_json::Error),

    /// A worker process exited unsuccessfully.
    #[error("worker for {placement} exited with {status}")]
    WorkerExit {
        placement: Placement,
        status: ExitStatus,
    },

    /// A parallel job failed, aborting the whole run.
    #[error("job at {placement} failed")]
    JobFailed {
        placement: Placement,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

//! Logging setup.
//!
//! The terminal belongs to the bars, so log events only go to a file, and only when
//! `MULTIBAR_LOG` names one. The file is opened for appending so that worker processes
//! can share it with the dispatcher. Filtering follows `RUST_LOG` and defaults to `info`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_VAR: &str = "MULTIBAR_LOG";

/// Initializes logging from the environment. Does nothing if no log file is configured.
pub fn init_from_env() -> io::Result<()> {
    match std::env::var_os(LOG_FILE_VAR) {
        Some(path) if !path.is_empty() => init_logging(Path::new(&path)),
        _ => Ok(()),
    }
}

pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)
}

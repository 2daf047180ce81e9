//! Progress bars pinned to fixed terminal cells.
//!
//! Each bar writes through a [`PositionedSink`], which moves the cursor to the bar's
//! [`Placement`], draws, and puts the cursor back. Because every redraw is a single
//! self-contained write, bars can share a screen whether they are driven from a single
//! thread ([`SequentialMultiplexer`]) or from separate processes ([`ParallelDispatcher`]).
//!
//! ```
//! use std::sync::Arc;
//! use multibar::{BarDriver, Driver, Placement, PositionedSink, Progress, VirtualTerminal};
//!
//! let screen = Arc::new(VirtualTerminal::new(60, 4));
//! let sink = PositionedSink::new(screen.clone(), Placement::new(0, 2));
//! let mut bar = BarDriver::new(sink, 10).with_message("Calibrating flux capacitors");
//! bar.start()?;
//! bar.update(Progress::new(50)?)?;
//! assert_eq!(screen.line(2), "█████░░░░░ 50/100 Calibrating flux capacitors");
//! bar.finish()?;
//! # Ok::<(), multibar::Error>(())
//! ```

pub mod config;
pub mod dispatcher;
pub mod driver;
mod error;
pub mod logging;
pub mod modes;
pub mod multiplexer;
mod placement;
pub mod progressbar;
pub mod sink;
pub mod terminal;

pub use config::{Settings, SettingsArgs};
pub use dispatcher::{
    InProcessRunner, JobDescriptor, JobReport, JobRunner, ParallelDispatcher, ProcessRunner,
};
pub use driver::{BarDriver, Driver};
pub use error::{Error, Result};
pub use modes::Mode;
pub use multiplexer::SequentialMultiplexer;
pub use placement::{Placement, Progress};
pub use sink::PositionedSink;
pub use terminal::{AnsiTerminal, FullScreen, Terminal, VirtualTerminal};

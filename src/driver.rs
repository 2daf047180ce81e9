use tracing::debug;

use crate::progressbar::{LifecycleState, ProgressBarState};
use crate::sink::PositionedSink;
use crate::terminal::Terminal;
use crate::{Placement, Progress, Result};

/// The lifecycle of one progress bar.
///
/// `finish` consumes the driver, so a finished bar can no longer be updated.
pub trait Driver {
    /// Resets progress to zero and draws the bar for the first time.
    fn start(&mut self) -> Result<()>;

    /// Sets the progress and redraws.
    ///
    /// Values are taken as given. Going backwards is allowed and drawn as such.
    fn update(&mut self, progress: Progress) -> Result<()>;

    /// Draws the bar as complete and releases it.
    fn finish(self) -> Result<()>
    where
        Self: Sized;
}

/// A progress bar drawn through a [`PositionedSink`].
///
/// A started bar that is dropped without being finished is redrawn as abandoned.
pub struct BarDriver<T: Terminal + ?Sized> {
    bar: ProgressBarState,
    sink: PositionedSink<T>,
}

impl<T: Terminal + ?Sized> BarDriver<T> {
    pub fn new(sink: PositionedSink<T>, width: usize) -> Self {
        Self {
            bar: ProgressBarState::new(Progress::COMPLETE.value() as usize, width),
            sink,
        }
    }

    /// Sets a message which shows up after the bar.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let m = message.into();
        self.bar.message = if m.is_empty() { None } else { Some(m) };
        self
    }

    pub fn placement(&self) -> Placement {
        self.sink.placement()
    }

    pub fn state(&self) -> &ProgressBarState {
        &self.bar
    }

    fn render(&self) -> Result<()> {
        self.sink.write(&self.bar.render_to_string())?;
        Ok(())
    }
}

impl<T: Terminal + ?Sized> Driver for BarDriver<T> {
    fn start(&mut self) -> Result<()> {
        debug!(placement = %self.placement(), "bar started");
        self.bar.position = 0;
        self.bar.lifecycle = LifecycleState::InProgress;
        self.render()
    }

    fn update(&mut self, progress: Progress) -> Result<()> {
        self.bar.position = progress.value() as usize;
        self.render()
    }

    fn finish(mut self) -> Result<()> {
        self.bar.position = self.bar.length;
        self.bar.lifecycle = LifecycleState::Completed;
        debug!(placement = %self.placement(), "bar finished");
        self.render()
    }
}

impl<T: Terminal + ?Sized> Drop for BarDriver<T> {
    fn drop(&mut self) {
        if self.bar.lifecycle == LifecycleState::InProgress {
            self.bar.lifecycle = LifecycleState::Abandoned;
            self.render().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::terminal::VirtualTerminal;

    fn driver_at(terminal: &Arc<VirtualTerminal>, row: u16) -> BarDriver<VirtualTerminal> {
        BarDriver::new(
            PositionedSink::new(terminal.clone(), Placement::new(0, row)),
            10,
        )
    }

    #[test]
    fn full_lifecycle_ends_at_hundred() {
        let terminal = Arc::new(VirtualTerminal::new(40, 6));
        let mut driver = driver_at(&terminal, 5);

        driver.start().unwrap();
        assert_eq!(terminal.line(5), "░░░░░░░░░░ 0/100");
        for i in 0..=100 {
            driver.update(Progress::new(i).unwrap()).unwrap();
        }
        assert_eq!(terminal.line(5), "██████████ 100/100");
        driver.finish().unwrap();

        assert_eq!(terminal.line(5), "██████████ 100/100");
        // start, 101 updates, finish
        assert_eq!(terminal.write_count(), 103);
    }

    #[test]
    fn finish_completes_a_partial_bar() {
        let terminal = Arc::new(VirtualTerminal::new(40, 2));
        let mut driver = driver_at(&terminal, 1).with_message("copying");
        driver.start().unwrap();
        driver.update(Progress::new(30).unwrap()).unwrap();
        assert_eq!(terminal.line(1), "███░░░░░░░ 30/100 copying");
        driver.finish().unwrap();
        assert_eq!(terminal.line(1), "██████████ 100/100 copying");
    }

    #[test]
    fn backwards_updates_are_drawn() {
        let terminal = Arc::new(VirtualTerminal::new(40, 1));
        let mut driver = driver_at(&terminal, 0);
        driver.start().unwrap();
        driver.update(Progress::new(80).unwrap()).unwrap();
        driver.update(Progress::new(20).unwrap()).unwrap();
        assert_eq!(driver.state().position, 20);
        assert_eq!(terminal.line(0), "██░░░░░░░░ 20/100");
    }

    #[test]
    fn dropping_a_started_bar_abandons_it() {
        let terminal = Arc::new(VirtualTerminal::new(40, 1));
        {
            let mut driver = driver_at(&terminal, 0);
            driver.start().unwrap();
            driver.update(Progress::new(50).unwrap()).unwrap();
        }
        assert_eq!(terminal.line(0), "█████╳╳╳╳╳ 50/100");
    }

    #[test]
    fn dropping_an_unstarted_bar_draws_nothing() {
        let terminal = Arc::new(VirtualTerminal::new(40, 1));
        drop(driver_at(&terminal, 0));
        assert_eq!(terminal.write_count(), 0);
    }

    #[test]
    fn terminal_errors_propagate() {
        let terminal = Arc::new(VirtualTerminal::new(40, 1));
        let mut driver = driver_at(&terminal, 3);
        assert!(matches!(driver.start(), Err(crate::Error::Io(_))));
    }
}

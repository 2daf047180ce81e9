use std::thread::sleep;
use std::time::Duration;

use tracing::info;

use crate::driver::Driver;
use crate::{Progress, Result};

/// Drives several bars in lockstep from a single thread.
///
/// Every phase visits the drivers in list order: all are started, then each step
/// updates all of them, then all are finished.
pub struct SequentialMultiplexer<D: Driver> {
    drivers: Vec<D>,
    steps: usize,
    step_delay: Duration,
}

impl<D: Driver> SequentialMultiplexer<D> {
    pub fn new(drivers: Vec<D>, steps: usize, step_delay: Duration) -> Self {
        Self {
            drivers,
            steps,
            step_delay,
        }
    }

    /// Runs every driver to completion. Stops at the first error.
    pub fn run(mut self) -> Result<()> {
        info!(
            bars = self.drivers.len(),
            steps = self.steps,
            "running bars in lockstep"
        );

        for driver in &mut self.drivers {
            driver.start()?;
        }

        for step in 0..self.steps {
            if !self.step_delay.is_zero() {
                sleep(self.step_delay);
            }
            let progress = Progress::of(step, self.steps);
            for driver in &mut self.drivers {
                driver.update(progress)?;
            }
        }

        for driver in self.drivers {
            driver.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::driver::BarDriver;
    use crate::sink::PositionedSink;
    use crate::terminal::VirtualTerminal;
    use crate::Placement;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Start(usize),
        Update(usize, u8),
        Finish(usize),
    }

    struct Recording {
        id: usize,
        log: Rc<RefCell<Vec<Call>>>,
    }

    impl Driver for Recording {
        fn start(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Start(self.id));
            Ok(())
        }

        fn update(&mut self, progress: Progress) -> Result<()> {
            self.log
                .borrow_mut()
                .push(Call::Update(self.id, progress.value()));
            Ok(())
        }

        fn finish(self) -> Result<()> {
            self.log.borrow_mut().push(Call::Finish(self.id));
            Ok(())
        }
    }

    fn recorded_run(k: usize, steps: usize) -> Vec<Call> {
        let log = Rc::new(RefCell::new(vec![]));
        let drivers = (0..k)
            .map(|id| Recording {
                id,
                log: log.clone(),
            })
            .collect();
        SequentialMultiplexer::new(drivers, steps, Duration::ZERO)
            .run()
            .unwrap();
        let calls = log.borrow().clone();
        calls
    }

    #[test]
    fn phases_are_ordered() {
        let k = 4;
        let calls = recorded_run(k, 100);
        assert_eq!(calls.len(), k + k * 100 + k);

        let starts: Vec<_> = (0..k).map(Call::Start).collect();
        let finishes: Vec<_> = (0..k).map(Call::Finish).collect();
        assert_eq!(&calls[..k], starts.as_slice());
        assert_eq!(&calls[calls.len() - k..], finishes.as_slice());

        for (step, chunk) in calls[k..calls.len() - k].chunks(k).enumerate() {
            let expected: Vec<_> = (0..k).map(|id| Call::Update(id, step as u8)).collect();
            assert_eq!(chunk, expected.as_slice());
        }
    }

    #[test]
    fn zero_steps_only_starts_and_finishes() {
        let calls = recorded_run(2, 0);
        assert_eq!(
            calls,
            vec![
                Call::Start(0),
                Call::Start(1),
                Call::Finish(0),
                Call::Finish(1)
            ]
        );
    }

    #[test]
    fn three_bars_reach_hundred() {
        let terminal = Arc::new(VirtualTerminal::new(40, 3));
        let drivers = Placement::rows(0, 3)
            .into_iter()
            .map(|placement| BarDriver::new(PositionedSink::new(terminal.clone(), placement), 10))
            .collect();
        SequentialMultiplexer::new(drivers, 100, Duration::ZERO)
            .run()
            .unwrap();

        for row in 0..3 {
            assert_eq!(terminal.line(row), "██████████ 100/100");
        }
        // 3 starts, 300 updates, 3 finishes
        assert_eq!(terminal.write_count(), 306);
    }

    #[test]
    fn first_error_stops_the_run() {
        let terminal = Arc::new(VirtualTerminal::new(40, 2));
        let drivers = [0, 5, 1]
            .into_iter()
            .map(|row| {
                BarDriver::new(
                    PositionedSink::new(terminal.clone(), Placement::new(0, row)),
                    10,
                )
            })
            .collect();
        let result = SequentialMultiplexer::new(drivers, 100, Duration::ZERO).run();
        assert!(result.is_err());
        // Row 0 started and was abandoned when the multiplexer was dropped
        assert_eq!(terminal.line(0), "╳╳╳╳╳╳╳╳╳╳ 0/100");
        assert_eq!(terminal.line(1), "");
    }
}

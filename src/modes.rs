//! The four ways of putting bars on screen.

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::dispatcher::{run_job, JobDescriptor, JobReport, JobRunner, ParallelDispatcher};
use crate::driver::BarDriver;
use crate::multiplexer::SequentialMultiplexer;
use crate::sink::PositionedSink;
use crate::terminal::Terminal;
use crate::{Placement, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One bar at an arbitrary cell.
    Single { column: u16, row: u16 },
    /// Bars on rows `first..last`, updated in lockstep from one thread.
    Multi { first: u16, last: u16 },
    /// Two bars on the given rows, each in its own worker.
    ParallelSingle { line1: u16, line2: u16 },
    /// Bars on rows `first..last`, each in its own worker.
    ParallelMulti { first: u16, last: u16 },
}

impl Mode {
    pub fn placements(&self) -> Vec<Placement> {
        match *self {
            Mode::Single { column, row } => vec![Placement::new(column, row)],
            Mode::Multi { first, last } | Mode::ParallelMulti { first, last } => {
                Placement::rows(first, last)
            }
            Mode::ParallelSingle { line1, line2 } => {
                vec![Placement::new(0, line1), Placement::new(0, line2)]
            }
        }
    }
}

/// Runs `mode` to completion.
///
/// `terminal` is drawn to directly by the single and multi modes. The parallel modes hand
/// their jobs to `runner` instead, which owns its own way of reaching the screen.
pub fn run<T, R>(mode: Mode, terminal: Arc<T>, runner: R, settings: &Settings) -> Result<()>
where
    T: Terminal + ?Sized,
    R: JobRunner,
{
    info!(?mode, "starting");
    let placements = mode.placements();
    match mode {
        Mode::Single { .. } => run_single(terminal, &placements, settings),
        Mode::Multi { .. } => run_multi(terminal, &placements, settings),
        Mode::ParallelSingle { .. } | Mode::ParallelMulti { .. } => {
            run_parallel(runner, &placements, settings).map(|_| ())
        }
    }
}

pub fn run_single<T: Terminal + ?Sized>(
    terminal: Arc<T>,
    placements: &[Placement],
    settings: &Settings,
) -> Result<()> {
    for job in JobDescriptor::for_placements(placements, settings) {
        run_job(&job, terminal.clone())?;
    }
    Ok(())
}

pub fn run_multi<T: Terminal + ?Sized>(
    terminal: Arc<T>,
    placements: &[Placement],
    settings: &Settings,
) -> Result<()> {
    let drivers = placements
        .iter()
        .map(|&placement| {
            BarDriver::new(
                PositionedSink::new(terminal.clone(), placement),
                settings.bar_width,
            )
        })
        .collect();
    SequentialMultiplexer::new(drivers, settings.steps, settings.step_delay).run()
}

pub fn run_parallel<R: JobRunner>(
    runner: R,
    placements: &[Placement],
    settings: &Settings,
) -> Result<Vec<JobReport>> {
    let dispatcher = ParallelDispatcher::new(runner);
    info!(
        bars = placements.len(),
        pool_size = dispatcher.pool_size(),
        "running bars in parallel"
    );
    dispatcher.run(JobDescriptor::for_placements(placements, settings))
}

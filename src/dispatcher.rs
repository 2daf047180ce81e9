//! Fanning single-bar jobs out over a pool of workers.
//!
//! A job is plain data ([`JobDescriptor`]) so that it can be handed to another process.
//! Each job draws one bar on its own row, pausing a random amount before every update.

use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, sleep};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Settings;
use crate::driver::{BarDriver, Driver};
use crate::sink::PositionedSink;
use crate::terminal::Terminal;
use crate::{Error, Placement, Progress, Result};

/// Name of the hidden subcommand that runs one job read from stdin.
pub const WORKER_COMMAND: &str = "worker";

/// Everything a worker needs to run one bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub placement: Placement,
    pub seed: u64,
    pub steps: usize,
    pub max_delay: Duration,
    pub bar_width: usize,
}

impl JobDescriptor {
    /// One job per placement, each with its own random seed.
    pub fn for_placements(placements: &[Placement], settings: &Settings) -> Vec<JobDescriptor> {
        let mut rng = rand::thread_rng();
        placements
            .iter()
            .map(|&placement| JobDescriptor {
                placement,
                seed: rng.gen(),
                steps: settings.steps,
                max_delay: settings.max_job_delay,
                bar_width: settings.bar_width,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub placement: Placement,
    pub elapsed: Duration,
}

/// Draws the job's bar from start to finish, simulating work between updates.
pub fn run_job<T: Terminal + ?Sized>(job: &JobDescriptor, terminal: Arc<T>) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(job.seed);
    let mut driver = BarDriver::new(
        PositionedSink::new(terminal, job.placement),
        job.bar_width,
    );

    driver.start()?;
    for step in 0..job.steps {
        if !job.max_delay.is_zero() {
            sleep(job.max_delay.mul_f64(rng.gen::<f64>()));
        }
        driver.update(Progress::of(step, job.steps))?;
    }
    driver.finish()
}

/// Reads a JSON job from `input` and runs it. This is the body of a worker process.
pub fn run_worker<T: Terminal + ?Sized>(input: impl Read, terminal: Arc<T>) -> Result<()> {
    let job: JobDescriptor = serde_json::from_reader(input)?;
    info!(placement = %job.placement, steps = job.steps, "worker started");
    run_job(&job, terminal)
}

/// Executes a single job to completion.
pub trait JobRunner: Sync {
    fn run(&self, job: &JobDescriptor) -> Result<()>;
}

/// Runs each job on the calling pool thread, drawing to a shared terminal.
pub struct InProcessRunner<T: Terminal + ?Sized> {
    terminal: Arc<T>,
}

impl<T: Terminal + ?Sized> InProcessRunner<T> {
    pub fn new(terminal: Arc<T>) -> Self {
        Self { terminal }
    }
}

impl<T: Terminal + ?Sized> JobRunner for InProcessRunner<T> {
    fn run(&self, job: &JobDescriptor) -> Result<()> {
        run_job(job, self.terminal.clone())
    }
}

/// Runs each job in a child process.
///
/// The child is `program` invoked with the [`WORKER_COMMAND`] subcommand. It receives the job
/// as JSON on stdin and draws straight to the inherited stdout.
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Workers are further copies of the running executable.
    pub fn current_exe() -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }
}

impl JobRunner for ProcessRunner {
    fn run(&self, job: &JobDescriptor) -> Result<()> {
        let payload = serde_json::to_vec(job)?;
        let mut child = Command::new(&self.program)
            .arg(WORKER_COMMAND)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        // Dropping stdin after the write closes the pipe so the worker sees EOF
        let sent = child
            .stdin
            .take()
            .map(|mut stdin| stdin.write_all(&payload));
        let status = child.wait()?;
        if !status.success() {
            return Err(Error::WorkerExit {
                placement: job.placement,
                status,
            });
        }
        if let Some(sent) = sent {
            sent?;
        }
        Ok(())
    }
}

/// Runs jobs on a pool sized to the machine's available parallelism.
///
/// If any job fails, no further jobs are started, jobs already running are waited for,
/// and the first failure is returned.
pub struct ParallelDispatcher<R: JobRunner> {
    runner: R,
    pool_size: usize,
}

impl<R: JobRunner> ParallelDispatcher<R> {
    pub fn new(runner: R) -> Self {
        let pool_size = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self { runner, pool_size }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Runs every job and blocks until the whole pool is done.
    ///
    /// Reports are returned in the order of `jobs`.
    pub fn run(&self, jobs: Vec<JobDescriptor>) -> Result<Vec<JobReport>> {
        let total = jobs.len();
        let workers = self.pool_size.min(total);
        info!(jobs = total, workers, "dispatching jobs");

        let queue = Mutex::new(jobs.into_iter().enumerate());
        let abort = AtomicBool::new(false);
        let (result_tx, result_rx) = mpsc::channel::<(usize, Result<JobReport>)>();

        let mut reports: Vec<Option<JobReport>> = vec![None; total];
        let mut first_error = None;

        thread::scope(|scope| {
            for _ in 0..workers {
                let result_tx = result_tx.clone();
                let (queue, abort) = (&queue, &abort);
                scope.spawn(move || loop {
                    if abort.load(Ordering::SeqCst) {
                        break;
                    }
                    let next = queue.lock().unwrap().next();
                    let Some((index, job)) = next else {
                        break;
                    };

                    let started = Instant::now();
                    let outcome = match self.runner.run(&job) {
                        Ok(()) => Ok(JobReport {
                            placement: job.placement,
                            elapsed: started.elapsed(),
                        }),
                        Err(source) => {
                            abort.store(true, Ordering::SeqCst);
                            Err(Error::JobFailed {
                                placement: job.placement,
                                source: Box::new(source),
                            })
                        }
                    };
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                });
            }
            drop(result_tx);

            for (index, outcome) in result_rx {
                match outcome {
                    Ok(report) => {
                        info!(placement = %report.placement, elapsed = ?report.elapsed, "job finished");
                        reports[index] = Some(report);
                    }
                    Err(err) => {
                        warn!(error = %err, "job failed, aborting remaining jobs");
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }
        });

        match first_error {
            Some(err) => Err(err),
            None => Ok(reports.into_iter().flatten().collect()),
        }
    }
}

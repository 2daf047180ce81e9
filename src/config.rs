//! Run settings.
//!
//! Every setting is a global command line option that can also be given through a
//! `MULTIBAR_*` environment variable.

use std::time::Duration;

use clap::Args;

pub const STEPS_VAR: &str = "MULTIBAR_STEPS";
pub const STEP_DELAY_VAR: &str = "MULTIBAR_STEP_DELAY_MS";
pub const MAX_JOB_DELAY_VAR: &str = "MULTIBAR_MAX_JOB_DELAY_MS";
pub const BAR_WIDTH_VAR: &str = "MULTIBAR_BAR_WIDTH";

const DEFAULT_STEPS: usize = 100;
const DEFAULT_STEP_DELAY_MS: u64 = 10;
const DEFAULT_MAX_JOB_DELAY_MS: u64 = 20;
const DEFAULT_BAR_WIDTH: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Number of updates each bar receives between start and finish.
    pub steps: usize,
    /// Pause between two lockstep updates of the sequential multiplexer.
    pub step_delay: Duration,
    /// Upper bound of the random pause before each update of a single-bar job.
    pub max_job_delay: Duration,
    /// Number of glyphs in a bar.
    pub bar_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        SettingsArgs::default().into()
    }
}

/// Command line options for [`Settings`].
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct SettingsArgs {
    /// Updates per bar
    #[arg(long, global = true, env = STEPS_VAR, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Milliseconds between lockstep updates in multi mode
    #[arg(long, global = true, env = STEP_DELAY_VAR, default_value_t = DEFAULT_STEP_DELAY_MS)]
    pub step_delay_ms: u64,

    /// Upper bound, in milliseconds, of the random pause before each update of a job
    #[arg(long, global = true, env = MAX_JOB_DELAY_VAR, default_value_t = DEFAULT_MAX_JOB_DELAY_MS)]
    pub max_job_delay_ms: u64,

    /// Glyphs per bar
    #[arg(long, global = true, env = BAR_WIDTH_VAR, default_value_t = DEFAULT_BAR_WIDTH)]
    pub bar_width: usize,
}

impl Default for SettingsArgs {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            max_job_delay_ms: DEFAULT_MAX_JOB_DELAY_MS,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            steps: args.steps,
            step_delay: Duration::from_millis(args.step_delay_ms),
            max_job_delay: Duration::from_millis(args.max_job_delay_ms),
            bar_width: args.bar_width,
        }
    }
}

use std::io::stdin;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use multibar::dispatcher::{run_worker, WORKER_COMMAND};
use multibar::{
    logging, modes, AnsiTerminal, FullScreen, Mode, ProcessRunner, Settings, SettingsArgs,
};

const USAGE: &str = "Usage:
    multibar single x_pos y_pos
    multibar multi first_line last_line
    multibar parallel_single line_one line_two
    multibar parallel_multi first_line last_line
";

#[derive(Parser)]
#[command(name = "multibar", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Subcommand)]
enum Command {
    /// One bar at column X, row Y
    #[command(name = "single")]
    Single { x: u16, y: u16 },
    /// Bars on rows FIRST..LAST, updated together
    #[command(name = "multi")]
    Multi { first: u16, last: u16 },
    /// Two bars on the given rows, each in its own process
    #[command(name = "parallel_single")]
    ParallelSingle { line1: u16, line2: u16 },
    /// Bars on rows FIRST..LAST, each in its own process
    #[command(name = "parallel_multi")]
    ParallelMulti { first: u16, last: u16 },
    /// Runs one job read from stdin
    #[command(name = WORKER_COMMAND, hide = true)]
    Worker,
}

fn main() -> anyhow::Result<()> {
    logging::init_from_env().context("failed to initialize logging")?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            debug!(error = %err, "invalid usage");
            print!("{}", USAGE);
            return Ok(());
        }
    };

    let terminal = Arc::new(AnsiTerminal::stdout());
    let mode = match cli.command {
        Command::Worker => {
            return run_worker(stdin().lock(), terminal).context("worker failed");
        }
        Command::Single { x, y } => Mode::Single { column: x, row: y },
        Command::Multi { first, last } => Mode::Multi { first, last },
        Command::ParallelSingle { line1, line2 } => Mode::ParallelSingle { line1, line2 },
        Command::ParallelMulti { first, last } => Mode::ParallelMulti { first, last },
    };

    let settings = Settings::from(cli.settings);
    let runner = ProcessRunner::current_exe().context("cannot locate worker executable")?;

    let _screen = FullScreen::enter().context("cannot enter full-screen mode")?;
    if let Mode::Single { column, row } = mode {
        println!("Printing at ({}, {})", column, row);
    }
    modes::run(mode, terminal, runner, &settings)?;
    Ok(())
}

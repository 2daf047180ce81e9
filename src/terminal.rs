//! Terminal control.
//!
//! Everything that touches the screen goes through [`Terminal::write_at`], which moves the
//! cursor to a cell, writes a piece of text and puts the cursor back where it was.
//! The whole sequence is emitted as a single buffered write so that other writers,
//! including other processes sharing the same terminal, only ever see complete sequences.

use std::io::{self, stdout, Stdout, Write};
use std::sync::Mutex;

use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::Placement;

/// Anything that can place text at an absolute screen position.
pub trait Terminal: Send + Sync {
    /// Writes `text` starting at `placement` and leaves the cursor where it was before the call.
    fn write_at(&self, placement: Placement, text: &str) -> io::Result<()>;
}

/// A terminal driven by ANSI escape sequences written to `W`.
pub struct AnsiTerminal<W: Write> {
    out: Mutex<W>,
}

impl AnsiTerminal<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout())
    }
}

impl<W: Write> AnsiTerminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap()
    }
}

impl<W: Write + Send> Terminal for AnsiTerminal<W> {
    fn write_at(&self, placement: Placement, text: &str) -> io::Result<()> {
        let mut sequence = Vec::with_capacity(text.len() + 32);
        queue!(
            sequence,
            SavePosition,
            MoveTo(placement.column, placement.row),
            Print(text),
            // Wipe whatever a longer previous render left behind
            Clear(ClearType::UntilNewLine),
            RestorePosition
        )?;

        let mut out = self.out.lock().unwrap();
        out.write_all(&sequence)?;
        out.flush()
    }
}

/// An in-memory screen.
///
/// Writes outside the screen fail with [`io::ErrorKind::InvalidInput`].
pub struct VirtualTerminal {
    screen: Mutex<Screen>,
}

struct Screen {
    width: u16,
    height: u16,
    cells: Vec<Vec<char>>,
    cursor: Placement,
    writes: usize,
}

impl VirtualTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Mutex::new(Screen {
                width,
                height,
                cells: vec![vec![' '; width as usize]; height as usize],
                cursor: Placement::new(0, 0),
                writes: 0,
            }),
        }
    }

    pub fn cursor(&self) -> Placement {
        self.screen.lock().unwrap().cursor
    }

    pub fn set_cursor(&self, cursor: Placement) {
        self.screen.lock().unwrap().cursor = cursor;
    }

    /// Contents of `row` with trailing blanks removed.
    pub fn line(&self, row: u16) -> String {
        let screen = self.screen.lock().unwrap();
        screen
            .cells
            .get(row as usize)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// Number of successful [`Terminal::write_at`] calls so far.
    pub fn write_count(&self) -> usize {
        self.screen.lock().unwrap().writes
    }
}

impl Terminal for VirtualTerminal {
    fn write_at(&self, placement: Placement, text: &str) -> io::Result<()> {
        let mut screen = self.screen.lock().unwrap();
        if placement.column >= screen.width || placement.row >= screen.height {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} is outside the {}x{} screen",
                    placement, screen.width, screen.height
                ),
            ));
        }

        let saved = screen.cursor;
        screen.cursor = placement;

        let row = &mut screen.cells[placement.row as usize];
        let mut column = placement.column as usize;
        for c in text.chars().take_while(|&c| c != '\n') {
            if column >= row.len() {
                break;
            }
            row[column] = c;
            column += 1;
        }
        for cell in &mut row[column..] {
            *cell = ' ';
        }

        screen.cursor = saved;
        screen.writes += 1;
        Ok(())
    }
}

/// Exit status used when the run is interrupted with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Keeps the terminal on the alternate screen while alive.
///
/// The normal screen is restored on drop, including while unwinding from an error.
/// Ctrl-C does not unwind, so entering also installs a handler that restores the screen
/// and exits with [`INTERRUPTED_EXIT_CODE`]. The screen is left alone when stdout is not
/// a terminal. Only one guard may be entered per process.
pub struct FullScreen {
    active: bool,
}

impl FullScreen {
    pub fn enter() -> io::Result<Self> {
        let active = atty::is(atty::Stream::Stdout);
        ctrlc::set_handler(move || {
            if active {
                leave_full_screen(&mut stdout()).ok();
            }
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
        .map_err(io::Error::other)?;

        if active {
            execute!(stdout(), EnterAlternateScreen)?;
        }
        Ok(Self { active })
    }
}

impl Drop for FullScreen {
    fn drop(&mut self) {
        if self.active {
            leave_full_screen(&mut stdout()).ok();
        }
    }
}

/// Switches `out` back to the normal screen.
pub fn leave_full_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen)
}

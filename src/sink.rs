use std::io;
use std::sync::Arc;

use crate::terminal::Terminal;
use crate::Placement;

/// A text destination pinned to one cell of a shared terminal.
///
/// Every write lands at the same placement, so a progress tracker can redraw itself
/// without knowing where on the screen it lives.
pub struct PositionedSink<T: Terminal + ?Sized> {
    terminal: Arc<T>,
    placement: Placement,
}

impl<T: Terminal + ?Sized> PositionedSink<T> {
    pub fn new(terminal: Arc<T>, placement: Placement) -> Self {
        Self {
            terminal,
            placement,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn write(&self, text: &str) -> io::Result<()> {
        self.terminal.write_at(self.placement, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::VirtualTerminal;

    #[test]
    fn write_keeps_cursor_in_place() {
        let terminal = Arc::new(VirtualTerminal::new(80, 24));
        for (column, row) in [(0, 0), (10, 5), (79, 23)] {
            let sink = PositionedSink::new(terminal.clone(), Placement::new(column, row));
            terminal.set_cursor(Placement::new(4, 2));
            sink.write("###").unwrap();
            assert_eq!(terminal.cursor(), Placement::new(4, 2));
        }
    }

    #[test]
    fn sinks_write_to_their_own_rows() {
        let terminal = Arc::new(VirtualTerminal::new(20, 4));
        let top = PositionedSink::new(terminal.clone(), Placement::new(0, 1));
        let bottom = PositionedSink::new(terminal.clone(), Placement::new(2, 3));
        top.write("top").unwrap();
        bottom.write("bottom").unwrap();
        top.write("top again").unwrap();
        assert_eq!(terminal.line(1), "top again");
        assert_eq!(terminal.line(3), "  bottom");
        assert_eq!(terminal.line(0), "");
    }

    #[test]
    fn overlapping_sinks_are_not_rejected() {
        let terminal = Arc::new(VirtualTerminal::new(20, 1));
        let a = PositionedSink::new(terminal.clone(), Placement::new(0, 0));
        let b = PositionedSink::new(terminal.clone(), Placement::new(0, 0));
        a.write("first").unwrap();
        b.write("second").unwrap();
        assert_eq!(terminal.line(0), "second");
    }

    #[test]
    fn errors_from_the_terminal_propagate() {
        let terminal = Arc::new(VirtualTerminal::new(5, 5));
        let sink = PositionedSink::new(terminal, Placement::new(9, 0));
        assert!(sink.write("x").is_err());
    }
}

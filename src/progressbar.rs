use std::io::Write;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';
const BAR_ABANDONED: char = '╳';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

/// The state of a single progress bar and how it is drawn.
#[derive(Clone, Debug)]
pub struct ProgressBarState {
    pub length: usize,
    pub position: usize,
    pub message: Option<String>,
    pub lifecycle: LifecycleState,
    width: usize,
}

impl ProgressBarState {
    pub fn new(length: usize, width: usize) -> Self {
        Self {
            length,
            position: 0,
            message: None,
            lifecycle: LifecycleState::Pending,
            width,
        }
    }

    /// Fraction of the bar that is filled, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.length > 0 {
            (self.position.min(self.length) as f64 / self.length as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        let filled_steps = (self.progress() * self.width as f64).floor() as usize;
        let empty = if self.lifecycle == LifecycleState::Abandoned {
            BAR_ABANDONED
        } else {
            BAR_EMPTY
        };

        let mut output = String::with_capacity(self.width * 3);
        for i in 0..self.width {
            output.push(if i < filled_steps { BAR_FILLED } else { empty });
        }
        write!(out, "{} {}/{}", output, self.position, self.length)?;
        if let Some(msg) = &self.message {
            write!(out, " {}", msg)?;
        }

        Ok(())
    }

    pub fn render_to_string(&self) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        self.render(&mut out).ok();
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bar() {
        let bar = ProgressBarState::new(100, 10);
        assert_eq!(bar.render_to_string(), "░░░░░░░░░░ 0/100");
    }

    #[test]
    fn half_bar_with_message() {
        let mut bar = ProgressBarState::new(100, 10);
        bar.position = 55;
        bar.message = Some("row 3".to_string());
        assert_eq!(bar.render_to_string(), "█████░░░░░ 55/100 row 3");
    }

    #[test]
    fn overfull_position_is_drawn_full() {
        let mut bar = ProgressBarState::new(10, 4);
        bar.position = 20;
        assert_eq!(bar.progress(), 1.0);
        assert_eq!(bar.render_to_string(), "████ 20/10");
    }

    #[test]
    fn zero_length_is_empty() {
        let bar = ProgressBarState::new(0, 3);
        assert_eq!(bar.progress(), 0.0);
    }

    #[test]
    fn abandoned_remainder_is_marked() {
        let mut bar = ProgressBarState::new(4, 4);
        bar.position = 1;
        bar.lifecycle = LifecycleState::Abandoned;
        assert_eq!(bar.render_to_string(), "█╳╳╳ 1/4");
    }
}

//! Styled terminal UI.

use console::Term;
use std::io::Write;

use crate::operation::StepRecord;

use super::{should_use_colors, OutputMode, SteplineTheme, UserInterface};

/// Terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: SteplineTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI, colored when the terminal allows it.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_colors(mode, should_use_colors())
    }

    /// Create a terminal UI with colors forced on or off.
    pub fn with_colors(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            SteplineTheme::new()
        } else {
            SteplineTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_headers() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        // Errors go to stderr in every mode.
        writeln!(Term::stderr(), "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_headers() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_step(&mut self, record: &StepRecord) {
        if self.mode.shows_steps() {
            writeln!(self.term, "{}", self.theme.format_step(record)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the UI for the given output mode.
pub fn create_ui(mode: OutputMode, no_color: bool) -> Box<dyn UserInterface> {
    if no_color {
        Box::new(TerminalUI::with_colors(mode, false))
    } else {
        Box::new(TerminalUI::new(mode))
    }
}

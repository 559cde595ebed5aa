//! Terminal UI writing to stdout and stderr.

use super::theme::{should_use_colors, Theme};
use super::{OutputMode, UserInterface};

/// UI implementation for the terminal.
///
/// Data goes to stdout; warnings, errors and details go to stderr so that
/// `dotazure env > vars.txt` captures only the variables.
pub struct TerminalUI {
    mode: OutputMode,
    theme: Theme,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        Self {
            mode,
            theme: if colors { Theme::new() } else { Theme::plain() },
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            eprintln!("{}", self.theme.format_detail(msg));
        }
    }
}

/// Create the terminal UI.
///
/// Colors are used only when `colors` is set and the environment allows
/// them (`NO_COLOR`, TTY detection).
pub fn create_ui(mode: OutputMode, colors: bool) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode, colors && should_use_colors()))
}

use std::cell::Cell;
use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

/// Status messages about the interpreter itself. Never mixed into the
/// script's own output: everything here goes to stderr, and only when
/// verbose mode is on.
pub struct Output;

#[allow(unused)]
#[derive(Clone, Copy, Debug)]
pub enum MsgColor {
    Green,
    Cyan,
    Red,
}

impl Output {
    thread_local! {
        static IS_VERBOSE: Cell<bool> = const { Cell::new(false) };
    }

    /// Returns the previous setting.
    pub fn set_verbose(new_value: bool) -> bool {
        Self::IS_VERBOSE.with(|value| value.replace(new_value))
    }

    pub fn is_verbose() -> bool {
        Self::IS_VERBOSE.with(Cell::get)
    }

    /// Right-aligned coloured tag followed by a message, e.g. `   Loading target a.nd`.
    pub fn message(color: MsgColor, left: &str, right: impl Display) {
        if !Self::is_verbose() {
            return;
        }
        let left = match color {
            MsgColor::Green => left.green(),
            MsgColor::Cyan => left.cyan(),
            MsgColor::Red => left.red(),
        };
        eprintln!("{left:>12} {right}");
    }

    pub fn file_message(color: MsgColor, left: &str, path: &Path) {
        Self::message(color, left, format_args!("target {}", path.display()));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verbose_toggle() {
        assert!(!Output::is_verbose());
        assert!(!Output::set_verbose(true));
        assert!(Output::is_verbose());
        assert!(Output::set_verbose(false));
        // Silent; must not panic
        Output::message(MsgColor::Green, "Running", "nothing");
    }
}

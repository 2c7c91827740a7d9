use std::{fmt, io, path::Path};

use miette::{miette, LabeledSpan, Report, Severity};

use crate::{command::Command, lexer::Token, source::Source, span::Span};

// File errors

pub fn file_open(path: &Path, err: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "file::open",
        help = format!("{err}"),
        "Can't open file: {}",
        path.display()
    )
}

// Lexer errors

pub fn lex_unclosed_str(src: &Source, span: Span, line: u32) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::unclosed_str",
        help = "string literals must be closed with a \" on the same line.",
        labels = vec![LabeledSpan::at(span, "unterminated literal")],
        "Syntax error (line {line})",
    )
    .with_source_code(src.named())
}

pub fn lex_bad_escape(src: &Source, span: Span, line: u32, found: char) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::bad_escape",
        help = "the supported escapes are \\n, \\t, \\\" and \\\\",
        labels = vec![LabeledSpan::at(span, format!("unknown escape `\\{found}`"))],
        "Syntax error (line {line})",
    )
    .with_source_code(src.named())
}

pub fn lex_invalid_utf8(src: &Source, offs: usize, line: u32) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::invalid_utf8",
        help = "scripts must be saved as UTF-8",
        labels = vec![LabeledSpan::at_offset(offs, "invalid UTF-8")],
        "Syntax error (line {line})",
    )
    .with_source_code(src.named())
}

pub fn lex_too_long(src: &Source, span: Span, line: u32, max: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::too_long",
        help = format!("tokens are limited to {max} bytes"),
        labels = vec![LabeledSpan::at(span, "token too long")],
        "Syntax error (line {line})",
    )
    .with_source_code(src.named())
}

// Parser errors

pub fn parse_unexpected(src: &Source, found: &Token, expected: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::unexpected_token",
        help = format!("expected {expected}, found {}", found.kind),
        labels = vec![LabeledSpan::at(found.span, "unexpected token")],
        "Syntax error (line {})",
        found.line
    )
    .with_source_code(src.named())
}

pub fn parse_eof(src: &Source, line: u32, expected: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::unexpected_eof",
        help = format!("expected {expected}; you may be missing operands or a `;` in your last statement"),
        labels = vec![LabeledSpan::at_offset(src.text().len(), "end of file")],
        "Syntax error (line {line})",
    )
    .with_source_code(src.named())
}

pub fn parse_unknown_command(src: &Source, found: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::unknown_command",
        help = "commands are print, set, add, sub, mult, div, mod, eq, less, goto and if",
        labels = vec![LabeledSpan::at(found.span, "unknown command")],
        "Syntax error (line {})",
        found.line
    )
    .with_source_code(src.named())
}

pub fn parse_bad_label(src: &Source, found: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::bad_label",
        help = "labels follow the same naming rules as variables",
        labels = vec![LabeledSpan::at(found.span, "invalid label name")],
        "Syntax error (line {})",
        found.line
    )
    .with_source_code(src.named())
}

pub fn parse_duplicate_label(src: &Source, found: &Token, name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::duplicate_label",
        help = "each label may only be declared once per script",
        labels = vec![LabeledSpan::at(found.span, "duplicate label")],
        "Duplicate label: {name} (line {})",
        found.line
    )
    .with_source_code(src.named())
}

// Runtime errors

/// Failure while executing a single command.
#[derive(Debug)]
pub enum RuntimeError {
    UndefinedVariable(String),
    InvalidNumber(String),
    DivideByZero,
    UnknownLabel(String),
    Output(io::Error),
}

impl std::error::Error for RuntimeError {}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable(name) => write!(f, "Undefined variable: {name}"),
            Self::InvalidNumber(_) => write!(f, "Invalid number"),
            Self::DivideByZero => write!(f, "Divide by zero"),
            Self::UnknownLabel(name) => write!(f, "Unknown label: {name}"),
            Self::Output(e) => write!(f, "Failed to write output: {e}"),
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(value: io::Error) -> Self {
        RuntimeError::Output(value)
    }
}

/// Attach the failing command's location to a runtime error.
pub fn runtime(err: RuntimeError, cmd: &Command, src: &Source) -> Report {
    let (code, help, label) = match &err {
        RuntimeError::UndefinedVariable(name) => (
            "run::undefined_variable",
            format!("`{name}` is read before any command sets it"),
            "undefined variable",
        ),
        RuntimeError::InvalidNumber(val) => (
            "run::invalid_number",
            format!("`{val}` does not start with an integer"),
            "invalid number",
        ),
        RuntimeError::DivideByZero => (
            "run::divide_by_zero",
            String::from("the divisor evaluated to 0"),
            "divide by zero",
        ),
        RuntimeError::UnknownLabel(name) => (
            "run::unknown_label",
            format!("no label `{name}:` is declared in this script"),
            "unknown label",
        ),
        RuntimeError::Output(_) => (
            "run::output",
            String::from("standard output could not be written"),
            "while printing",
        ),
    };
    miette!(
        severity = Severity::Error,
        code = code,
        help = help,
        labels = vec![LabeledSpan::at(cmd.span, label)],
        "{err} (line {})",
        cmd.line
    )
    .with_source_code(src.named())
}

pub fn run_step_limit(limit: u64) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::step_limit",
        help = "raise --max-steps or NONDE_MAX_STEPS if the script is expected to run longer",
        "Step limit of {limit} exceeded",
    )
}

/// Diagnostic code of a report, for matching in tests.
#[cfg(test)]
pub(crate) fn code_of(report: &Report) -> String {
    report.code().map(|c| c.to_string()).unwrap_or_default()
}

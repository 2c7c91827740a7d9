// Loading
mod lexer;
pub use lexer::{is_var_name, Lexer, Token, TokenKind, MAX_TOKEN, MAX_VARNAME};
mod parser;
pub use parser::Parser;
mod command;
pub use command::{Binary, Command, CommandKind, Keyword, Operand};
mod label;
pub use label::LabelTable;
mod program;
pub use program::Program;
mod source;
pub use source::Source;
mod span;
pub use span::Span;

// Running
mod runtime;
pub use runtime::RunEnvironment;
mod store;
pub use store::{parse_int, VarStore};

mod error;
pub use error::RuntimeError;
mod output;
pub use output::{MsgColor, Output};

pub mod env;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 2;

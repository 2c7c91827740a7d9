use std::fmt;

use miette::Result;

use crate::error;
use crate::lexer::cursor::Cursor;
use crate::source::Source;
use crate::span::Span;

pub mod cursor;

/// Longest token allowed in a script, in bytes.
pub const MAX_TOKEN: usize = 1023;

/// Longest variable or label name, in bytes.
pub const MAX_VARNAME: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Bare word: keyword, variable, label declaration or unquoted literal
    Word,
    /// Quoted literal, escapes already processed
    Str,
    /// `;` command terminator
    Term,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word => write!(f, "word"),
            TokenKind::Str => write!(f, "string literal"),
            TokenKind::Term => write!(f, "`;`"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    /// Word text, or literal content without quotes
    pub val: String,
    pub span: Span,
    /// Line the token starts on
    pub line: u32,
}

impl Token {
    /// Bare word ending in `:`, declaring a label.
    pub fn is_label(&self) -> bool {
        self.kind == TokenKind::Word && self.val.ends_with(':')
    }

    /// Bare word that is a legal variable name.
    pub fn is_var(&self) -> bool {
        self.kind == TokenKind::Word && is_var_name(&self.val)
    }
}

/// Test if a string is a legal variable (or label) name.
pub fn is_var_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= MAX_VARNAME && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Test if a character separates tokens.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r' | '\x0b' | '\x0c')
}

/// Characters that end a bare word without being part of it.
fn ends_word(c: char) -> bool {
    is_whitespace(c) || matches!(c, '"' | '#' | ';')
}

pub struct Lexer<'a> {
    src: &'a Source,
    cur: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a Source) -> Self {
        Lexer {
            src,
            cur: Cursor::new(src.text()),
        }
    }

    /// Current line, used for end-of-input diagnostics.
    pub fn line(&self) -> u32 {
        self.cur.line()
    }

    /// Read the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia();

        let start = self.cur.pos();
        let line = self.cur.line();
        let Some(first) = self.cur.bump() else {
            return Ok(None);
        };
        let (kind, val) = match first {
            ';' => (TokenKind::Term, String::from(";")),
            '"' => (TokenKind::Str, self.string(start)?),
            c => (TokenKind::Word, self.word(c, start)?),
        };
        Ok(Some(Token {
            kind,
            val,
            span: Span::new(start, self.cur.pos() - start),
            line,
        }))
    }

    /// Skip whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.cur.first() {
                Some(c) if is_whitespace(c) => {
                    self.cur.bump();
                }
                // Newline is left for the whitespace arm so it gets counted
                Some('#') => self.cur.take_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    fn word(&mut self, first: char, start: usize) -> Result<String> {
        let mut val = String::from(first);
        while let Some(c) = self.cur.first() {
            if ends_word(c) {
                break;
            }
            if val.len() + c.len_utf8() > MAX_TOKEN {
                return Err(self.too_long(start));
            }
            val.push(c);
            self.cur.bump();
        }
        Ok(val)
    }

    fn string(&mut self, start: usize) -> Result<String> {
        let mut val = String::new();
        loop {
            let c = match self.cur.first() {
                None | Some('\n') => return Err(self.unclosed(start)),
                Some(c) => c,
            };
            self.cur.bump();
            let c = match c {
                '"' => break,
                '\\' => self.escape(start)?,
                c => c,
            };
            // Counts both quotes
            if val.len() + c.len_utf8() + 2 > MAX_TOKEN {
                return Err(self.too_long(start));
            }
            val.push(c);
        }
        Ok(val)
    }

    /// Character after a backslash inside a literal.
    fn escape(&mut self, start: usize) -> Result<char> {
        let c = match self.cur.first() {
            None | Some('\n') => return Err(self.unclosed(start)),
            Some(c) => c,
        };
        let esc_start = self.cur.pos() - 1;
        self.cur.bump();
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            other => Err(error::lex_bad_escape(
                self.src,
                Span::new(esc_start, self.cur.pos() - esc_start),
                self.line(),
                other,
            )),
        }
    }

    fn unclosed(&self, start: usize) -> miette::Report {
        error::lex_unclosed_str(self.src, self.span_from(start), self.line())
    }

    fn too_long(&self, start: usize) -> miette::Report {
        error::lex_too_long(self.src, self.span_from(start), self.line(), MAX_TOKEN)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.cur.pos() - start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

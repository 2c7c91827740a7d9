//! Peekable character cursor over script source.
// Modelled on the cursor in `rustc_lexer`, with a line counter added for diagnostics.
// See https://doc.rust-lang.org/beta/nightly-rustc/src/rustc_lexer/cursor.rs.html

use std::str::Chars;

pub struct Cursor<'a> {
    /// Full input, for computing offsets
    src: &'a str,
    /// Remaining characters
    chars: Chars<'a>,
    /// Line of the next character, starting from 1
    line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            src: input,
            chars: input.chars(),
            line: 1,
        }
    }

    /// Peek the next character without consuming it.
    pub fn first(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Consume the next character. Every consumed newline advances the line counter.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume characters while `predicate` holds.
    pub fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.first() {
            if !predicate(c) {
                break;
            }
            self.bump();
        }
    }

    /// Byte offset of the next character.
    pub fn pos(&self) -> usize {
        self.src.len() - self.chars.as_str().len()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

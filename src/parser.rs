use miette::Result;

use crate::{
    command::{Binary, Command, CommandKind, Keyword, Operand},
    error,
    label::LabelTable,
    lexer::{is_var_name, Lexer, Token, TokenKind},
    source::Source,
};

/// Single forward pass from tokens to commands, recording labels as they appear.
pub struct Parser<'a> {
    src: &'a Source,
    lexer: Lexer<'a>,
    commands: Vec<Command>,
    labels: LabelTable,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a Source) -> Self {
        Parser {
            src,
            lexer: Lexer::new(src),
            commands: Vec::new(),
            labels: LabelTable::new(),
        }
    }

    /// Load every command and label in the source.
    pub fn parse(mut self) -> Result<(Vec<Command>, LabelTable)> {
        while let Some(tok) = self.lexer.next_token()? {
            if tok.is_label() {
                self.declare_label(&tok)?;
            } else {
                let cmd = self.parse_command(tok)?;
                self.commands.push(cmd);
            }
        }
        Ok((self.commands, self.labels))
    }

    /// Bind `name:` to the index of the next command.
    fn declare_label(&mut self, tok: &Token) -> Result<()> {
        let name = &tok.val[..tok.val.len() - 1];
        if !is_var_name(name) {
            return Err(error::parse_bad_label(self.src, tok));
        }
        match self.labels.insert(name, self.commands.len()) {
            Ok(()) => Ok(()),
            Err(_) => Err(error::parse_duplicate_label(self.src, tok, name)),
        }
    }

    /// Parse the operands and terminator following `keyword`.
    fn parse_command(&mut self, keyword: Token) -> Result<Command> {
        if keyword.kind != TokenKind::Word {
            return Err(error::parse_unexpected(self.src, &keyword, "a command"));
        }
        let Ok(kw) = keyword.val.parse::<Keyword>() else {
            return Err(error::parse_unknown_command(self.src, &keyword));
        };

        let kind = match kw {
            Keyword::Print => CommandKind::Print {
                arg: self.expect_operand()?,
            },
            Keyword::Set => {
                let dest = self.expect_var()?;
                let src = self.expect_operand()?;
                CommandKind::Set { dest, src }
            }
            Keyword::Add => CommandKind::Add(self.binary()?),
            Keyword::Sub => CommandKind::Sub(self.binary()?),
            Keyword::Mult => CommandKind::Mult(self.binary()?),
            Keyword::Div => CommandKind::Div(self.binary()?),
            Keyword::Mod => CommandKind::Mod(self.binary()?),
            Keyword::Eq => CommandKind::Eq(self.binary()?),
            Keyword::Less => CommandKind::Less(self.binary()?),
            Keyword::Goto => CommandKind::Goto {
                target: self.expect_target()?,
            },
            Keyword::If => {
                let cond = self.expect_operand()?;
                let target = self.expect_target()?;
                CommandKind::If { cond, target }
            }
        };

        let term = self.expect_where(|tok| tok.kind == TokenKind::Term, "`;`")?;
        Ok(Command::new(kind, term.line, keyword.span.join(term.span)))
    }

    fn binary(&mut self) -> Result<Binary> {
        let dest = self.expect_var()?;
        let lhs = self.expect_operand()?;
        let rhs = self.expect_operand()?;
        Ok(Binary { dest, lhs, rhs })
    }

    fn expect_where(&mut self, check: impl FnOnce(&Token) -> bool, expected: &str) -> Result<Token> {
        match self.lexer.next_token()? {
            Some(tok) if check(&tok) => Ok(tok),
            Some(unexpected) => Err(error::parse_unexpected(self.src, &unexpected, expected)),
            None => Err(error::parse_eof(self.src, self.lexer.line(), expected)),
        }
    }

    /// Destination variable name.
    fn expect_var(&mut self) -> Result<String> {
        Ok(self.expect_where(Token::is_var, "a variable name")?.val)
    }

    /// Source value: variable names are looked up, anything else is a literal.
    fn expect_operand(&mut self) -> Result<Operand> {
        let tok = self.expect_where(|tok| tok.kind != TokenKind::Term, "a variable or literal")?;
        Ok(if tok.is_var() {
            Operand::Var(tok.val)
        } else {
            Operand::Lit(tok.val)
        })
    }

    /// Jump target. Resolved when the jump runs, so it may name a later label.
    fn expect_target(&mut self) -> Result<String> {
        Ok(self
            .expect_where(|tok| tok.kind == TokenKind::Word, "a label name")?
            .val)
    }
}

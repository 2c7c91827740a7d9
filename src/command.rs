use std::{fmt, io::Write, str::FromStr};

use crate::error::RuntimeError;
use crate::label::LabelTable;
use crate::span::Span;
use crate::store::VarStore;

/// Command argument, decided when the script is loaded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    /// Read from the variable store when executed
    Var(String),
    /// Used as-is
    Lit(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name) => write!(f, "{name}"),
            Operand::Lit(text) => {
                write!(f, "\"")?;
                for c in text.chars() {
                    match c {
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// Command keywords of the language.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Keyword {
    Print,
    Set,
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Eq,
    Less,
    Goto,
    If,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Print => "print",
            Keyword::Set => "set",
            Keyword::Add => "add",
            Keyword::Sub => "sub",
            Keyword::Mult => "mult",
            Keyword::Div => "div",
            Keyword::Mod => "mod",
            Keyword::Eq => "eq",
            Keyword::Less => "less",
            Keyword::Goto => "goto",
            Keyword::If => "if",
        }
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "print" => Ok(Keyword::Print),
            "set" => Ok(Keyword::Set),
            "add" => Ok(Keyword::Add),
            "sub" => Ok(Keyword::Sub),
            "mult" => Ok(Keyword::Mult),
            "div" => Ok(Keyword::Div),
            "mod" => Ok(Keyword::Mod),
            "eq" => Ok(Keyword::Eq),
            "less" => Ok(Keyword::Less),
            "goto" => Ok(Keyword::Goto),
            "if" => Ok(Keyword::If),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operands shared by the arithmetic and comparison commands: `op dest lhs rhs;`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Binary {
    pub dest: String,
    pub lhs: Operand,
    pub rhs: Operand,
}

impl Binary {
    fn ints(&self, store: &VarStore) -> Result<(i64, i64), RuntimeError> {
        Ok((store.resolve_int(&self.lhs)?, store.resolve_int(&self.rhs)?))
    }

    /// Store the decimal result of `op` in `dest`.
    fn store_int(
        &self,
        store: &mut VarStore,
        op: impl FnOnce(i64, i64) -> Result<i64, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let (lhs, rhs) = self.ints(store)?;
        let res = op(lhs, rhs)?;
        store.set(&self.dest, res.to_string());
        Ok(())
    }

    /// Store `1` in `dest` if `test` holds, otherwise a blank.
    fn store_flag(
        &self,
        store: &mut VarStore,
        test: impl FnOnce(i64, i64) -> bool,
    ) -> Result<(), RuntimeError> {
        let (lhs, rhs) = self.ints(store)?;
        store.set(&self.dest, if test(lhs, rhs) { "1" } else { "" });
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CommandKind {
    /// Write the operand's text to output
    Print { arg: Operand },
    /// Copy the operand's text into `dest`
    Set { dest: String, src: Operand },
    Add(Binary),
    Sub(Binary),
    Mult(Binary),
    /// Integer division, truncating toward zero
    Div(Binary),
    /// Remainder, with the sign of the dividend
    Mod(Binary),
    Eq(Binary),
    Less(Binary),
    /// Jump to a label
    Goto { target: String },
    /// Jump to a label when `cond` is a nonzero integer
    If { cond: Operand, target: String },
}

impl CommandKind {
    pub fn keyword(&self) -> Keyword {
        match self {
            CommandKind::Print { .. } => Keyword::Print,
            CommandKind::Set { .. } => Keyword::Set,
            CommandKind::Add(_) => Keyword::Add,
            CommandKind::Sub(_) => Keyword::Sub,
            CommandKind::Mult(_) => Keyword::Mult,
            CommandKind::Div(_) => Keyword::Div,
            CommandKind::Mod(_) => Keyword::Mod,
            CommandKind::Eq(_) => Keyword::Eq,
            CommandKind::Less(_) => Keyword::Less,
            CommandKind::Goto { .. } => Keyword::Goto,
            CommandKind::If { .. } => Keyword::If,
        }
    }
}

/// One parsed statement.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Command {
    pub kind: CommandKind,
    /// Line of the terminating `;`
    pub line: u32,
    /// Keyword through terminator
    pub span: Span,
}

impl Command {
    pub fn new(kind: CommandKind, line: u32, span: Span) -> Self {
        Command { kind, line, span }
    }

    /// Run the command and return the index of the next one.
    pub fn execute<W: Write>(
        &self,
        pc: usize,
        labels: &LabelTable,
        store: &mut VarStore,
        out: &mut W,
    ) -> Result<usize, RuntimeError> {
        match &self.kind {
            CommandKind::Print { arg } => {
                let text = store.resolve(arg)?;
                if !text.is_empty() {
                    out.write_all(text.as_bytes())?;
                    out.flush()?;
                }
            }
            CommandKind::Set { dest, src } => {
                let val = store.resolve(src)?.to_owned();
                store.set(dest, val);
            }
            CommandKind::Add(bin) => bin.store_int(store, |a, b| Ok(a.wrapping_add(b)))?,
            CommandKind::Sub(bin) => bin.store_int(store, |a, b| Ok(a.wrapping_sub(b)))?,
            CommandKind::Mult(bin) => bin.store_int(store, |a, b| Ok(a.wrapping_mul(b)))?,
            CommandKind::Div(bin) => bin.store_int(store, |a, b| match b {
                0 => Err(RuntimeError::DivideByZero),
                b => Ok(a.wrapping_div(b)),
            })?,
            CommandKind::Mod(bin) => bin.store_int(store, |a, b| match b {
                0 => Err(RuntimeError::DivideByZero),
                b => Ok(a.wrapping_rem(b)),
            })?,
            CommandKind::Eq(bin) => bin.store_flag(store, |a, b| a == b)?,
            CommandKind::Less(bin) => bin.store_flag(store, |a, b| a < b)?,
            CommandKind::Goto { target } => return jump(labels, target),
            CommandKind::If { cond, target } => {
                if store.resolve_int(cond)? != 0 {
                    return jump(labels, target);
                }
            }
        }
        Ok(pc + 1)
    }
}

fn jump(labels: &LabelTable, target: &str) -> Result<usize, RuntimeError> {
    labels
        .find(target)
        .ok_or_else(|| RuntimeError::UnknownLabel(target.to_owned()))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.keyword())?;
        match &self.kind {
            CommandKind::Print { arg } => write!(f, " {arg}")?,
            CommandKind::Set { dest, src } => write!(f, " {dest} {src}")?,
            CommandKind::Add(bin)
            | CommandKind::Sub(bin)
            | CommandKind::Mult(bin)
            | CommandKind::Div(bin)
            | CommandKind::Mod(bin)
            | CommandKind::Eq(bin)
            | CommandKind::Less(bin) => write!(f, " {} {} {}", bin.dest, bin.lhs, bin.rhs)?,
            CommandKind::Goto { target } => write!(f, " {target}")?,
            CommandKind::If { cond, target } => write!(f, " {cond} {target}")?,
        }
        write!(f, ";")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn var(name: &str) -> Operand {
        Operand::Var(name.into())
    }

    fn lit(text: &str) -> Operand {
        Operand::Lit(text.into())
    }

    fn cmd(kind: CommandKind) -> Command {
        Command::new(kind, 1, Span::dummy())
    }

    fn bin(dest: &str, lhs: Operand, rhs: Operand) -> Binary {
        Binary {
            dest: dest.into(),
            lhs,
            rhs,
        }
    }

    /// Execute one command at pc 0, returning next pc and printed text.
    fn exec(
        kind: CommandKind,
        labels: &LabelTable,
        store: &mut VarStore,
    ) -> Result<(usize, String), RuntimeError> {
        let mut out = Vec::new();
        let next = cmd(kind).execute(0, labels, store, &mut out)?;
        Ok((next, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn print_literal_and_variable() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();
        store.set("x", "value");

        let (next, out) = exec(CommandKind::Print { arg: lit("hi\n") }, &labels, &mut store).unwrap();
        assert_eq!((next, out.as_str()), (1, "hi\n"));

        let (_, out) = exec(CommandKind::Print { arg: var("x") }, &labels, &mut store).unwrap();
        assert_eq!(out, "value");

        let err = exec(CommandKind::Print { arg: var("nope") }, &labels, &mut store).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable(_)));
    }

    #[test]
    fn arithmetic() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();
        store.set("x", "17");

        let cases = [
            (CommandKind::Add(bin("r", var("x"), lit("3"))), "20"),
            (CommandKind::Sub(bin("r", var("x"), lit("20"))), "-3"),
            (CommandKind::Mult(bin("r", var("x"), lit("-2"))), "-34"),
            (CommandKind::Div(bin("r", var("x"), lit("5"))), "3"),
            (CommandKind::Div(bin("r", lit("-17"), lit("5"))), "-3"),
            (CommandKind::Mod(bin("r", var("x"), lit("5"))), "2"),
            (CommandKind::Mod(bin("r", lit("-17"), lit("5"))), "-2"),
            (CommandKind::Div(bin("r", lit("0"), lit("5"))), "0"),
        ];
        for (kind, expected) in cases {
            let shown = cmd(kind.clone()).to_string();
            exec(kind, &labels, &mut store).unwrap();
            assert_eq!(store.get("r"), Some(expected), "{shown}");
        }
    }

    #[test]
    fn arithmetic_wraps() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();
        let max = i64::MAX.to_string();
        exec(CommandKind::Add(bin("r", lit(&max), lit("1"))), &labels, &mut store).unwrap();
        assert_eq!(store.get("r"), Some(i64::MIN.to_string().as_str()));
    }

    #[test]
    fn divide_by_zero() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();
        for kind in [
            CommandKind::Div(bin("r", lit("10"), lit("0"))),
            CommandKind::Mod(bin("r", lit("10"), lit(""))),
        ] {
            let err = exec(kind, &labels, &mut store).unwrap_err();
            assert!(matches!(err, RuntimeError::DivideByZero));
        }
        assert_eq!(store.get("r"), None);
    }

    #[test]
    fn invalid_number() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();
        store.set("w", "word");
        let err = exec(CommandKind::Add(bin("r", var("w"), lit("1"))), &labels, &mut store)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidNumber(v) if v == "word"));
    }

    #[test]
    fn comparisons_store_one_or_blank() {
        let labels = LabelTable::new();
        let mut store = VarStore::new();

        exec(CommandKind::Eq(bin("r", lit("4"), lit("4"))), &labels, &mut store).unwrap();
        assert_eq!(store.get("r"), Some("1"));
        exec(CommandKind::Eq(bin("r", lit("4"), lit("5"))), &labels, &mut store).unwrap();
        assert_eq!(store.get("r"), Some(""));
        exec(CommandKind::Less(bin("r", lit("-1"), lit("0"))), &labels, &mut store).unwrap();
        assert_eq!(store.get("r"), Some("1"));
        exec(CommandKind::Less(bin("r", lit("3"), lit("3"))), &labels, &mut store).unwrap();
        assert_eq!(store.get("r"), Some(""));
    }

    #[test]
    fn jumps() {
        let mut labels = LabelTable::new();
        labels.insert("there", 9).unwrap();
        let mut store = VarStore::new();
        store.set("yes", "1");
        store.set("no", "");

        let goto = CommandKind::Goto {
            target: "there".into(),
        };
        assert_eq!(exec(goto, &labels, &mut store).unwrap().0, 9);

        let taken = CommandKind::If {
            cond: var("yes"),
            target: "there".into(),
        };
        assert_eq!(exec(taken, &labels, &mut store).unwrap().0, 9);

        let skipped = CommandKind::If {
            cond: var("no"),
            target: "nowhere".into(),
        };
        assert_eq!(exec(skipped, &labels, &mut store).unwrap().0, 1);

        let missing = CommandKind::Goto {
            target: "nowhere".into(),
        };
        let err = exec(missing, &labels, &mut store).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownLabel(name) if name == "nowhere"));

        let unset = CommandKind::If {
            cond: var("maybe"),
            target: "there".into(),
        };
        let err = exec(unset, &labels, &mut store).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable(_)));
    }

    #[test]
    fn displays_as_source() {
        let shown = cmd(CommandKind::Add(bin("y", var("x"), lit("3")))).to_string();
        assert_eq!(shown, "add y x \"3\";");
        let shown = cmd(CommandKind::Print {
            arg: lit("a \"b\"\n"),
        })
        .to_string();
        assert_eq!(shown, r#"print "a \"b\"\n";"#);
    }

    #[test]
    fn keywords_round_trip() {
        for kw in ["print", "set", "add", "sub", "mult", "div", "mod", "eq", "less", "goto", "if"] {
            assert_eq!(kw.parse::<Keyword>().unwrap().as_str(), kw);
        }
        assert!("PRINT".parse::<Keyword>().is_err());
    }
}

use std::collections::HashMap;

use crate::command::Operand;
use crate::error::RuntimeError;

/// Runtime variables. Every value is a string; arithmetic reads it as an integer on demand.
#[derive(Clone, Debug, Default)]
pub struct VarStore {
    vars: HashMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_owned(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Text of an operand: the variable's value, or the literal itself.
    pub fn resolve<'a>(&'a self, operand: &'a Operand) -> Result<&'a str, RuntimeError> {
        match operand {
            Operand::Var(name) => self
                .get(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Operand::Lit(text) => Ok(text),
        }
    }

    /// Integer value of an operand.
    pub fn resolve_int(&self, operand: &Operand) -> Result<i64, RuntimeError> {
        let text = self.resolve(operand)?;
        parse_int(text).ok_or_else(|| RuntimeError::InvalidNumber(text.to_owned()))
    }
}

/// Read a leading decimal integer the way `scanf("%ld")` does.
///
/// Leading whitespace is skipped and trailing text ignored. A blank value reads
/// as 0, which is what a false `eq`/`less` result holds.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    if text.is_empty() {
        return Some(0);
    }
    let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_like_scanf() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("  12"), Some(12));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("3 4"), Some(3));
        assert_eq!(parse_int(""), Some(0));
        assert_eq!(parse_int("   "), Some(0));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("+-1"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn resolves_operands() {
        let mut store = VarStore::new();
        store.set("x", "5");

        assert_eq!(store.resolve(&Operand::Var("x".into())).unwrap(), "5");
        assert_eq!(store.resolve(&Operand::Lit("x".into())).unwrap(), "x");
        assert_eq!(store.resolve_int(&Operand::Var("x".into())).unwrap(), 5);
        assert!(matches!(
            store.resolve(&Operand::Var("y".into())),
            Err(RuntimeError::UndefinedVariable(name)) if name == "y"
        ));
        assert!(matches!(
            store.resolve_int(&Operand::Lit("five".into())),
            Err(RuntimeError::InvalidNumber(_))
        ));
    }

    #[test]
    fn set_overwrites() {
        let mut store = VarStore::new();
        store.set("v", "1");
        store.set("v", "");
        assert_eq!(store.get("v"), Some(""));
        assert_eq!(store.len(), 1);
    }
}

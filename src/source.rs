use std::fs;
use std::path::Path;

use miette::{NamedSource, Result};

use crate::error;

/// Script text together with the name it is reported under.
#[derive(Clone, Debug)]
pub struct Source {
    name: String,
    text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a whole script into memory. The file is closed before this returns.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| error::file_open(path, e))?;
        Self::from_bytes(path.display().to_string(), bytes)
    }

    /// Script text must be valid UTF-8, so that literals print back unchanged.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Source { name, text }),
            Err(e) => {
                let offs = e.utf8_error().valid_up_to();
                let bytes = e.into_bytes();
                let line = bytes[..offs].iter().filter(|&&b| b == b'\n').count() as u32 + 1;
                // Valid prefix is unchanged, so `offs` still points at the bad byte
                let lossy = Source {
                    name,
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                };
                Err(error::lex_invalid_utf8(&lossy, offs, line))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Owned copy for attaching to a diagnostic.
    pub fn named(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.text.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::code_of;

    #[test]
    fn accepts_utf8() {
        let src = Source::from_bytes("ok", "print \"café\";".as_bytes().to_vec()).unwrap();
        assert_eq!(src.name(), "ok");
        assert_eq!(src.text(), "print \"café\";");
    }

    #[test]
    fn rejects_invalid_utf8_with_line() {
        let err = Source::from_bytes("latin1", b"print \"a\";\nprint \"caf\xe9\";\n".to_vec())
            .unwrap_err();
        assert_eq!(code_of(&err), "lex::invalid_utf8");
        assert_eq!(err.to_string(), "Syntax error (line 2)");
    }
}

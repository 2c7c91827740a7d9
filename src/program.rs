use std::fmt;

use miette::Result;

use crate::{command::Command, label::LabelTable, parser::Parser, source::Source};

/// Loaded script: commands in order, the labels pointing into them, and the
/// source text used for diagnostics. Read-only once built.
#[derive(Clone, Debug)]
pub struct Program {
    commands: Vec<Command>,
    labels: LabelTable,
    source: Source,
}

impl Program {
    /// Run the load pass over `source`.
    pub fn load(source: Source) -> Result<Program> {
        let (commands, labels) = Parser::new(&source).parse()?;
        Ok(Program {
            commands,
            labels,
            source,
        })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, idx: usize) -> Option<&Command> {
        self.commands.get(idx)
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Listing with command indices, source lines and label markers.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in 0..=self.commands.len() {
            for name in self.labels.labels_at(idx) {
                writeln!(f, "{name}:")?;
            }
            if let Some(cmd) = self.commands.get(idx) {
                let text = cmd.to_string();
                writeln!(f, "{idx:>5}  {text:<40} # line {}", cmd.line)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_and_lists() {
        let src = Source::new("count", "top: print \"x\";\ngoto top;\ndone:\n");
        let prog = Program::load(src).unwrap();
        assert_eq!(prog.len(), 2);
        assert_eq!(prog.labels().find("done"), Some(2));
        assert_eq!(prog.source().name(), "count");

        let listing = prog.to_string();
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "top:");
        assert!(lines[1].starts_with("    0  print \"x\";"));
        assert!(lines[1].ends_with("# line 1"));
        assert!(lines[2].starts_with("    1  goto top;"));
        assert_eq!(lines[3], "done:");
    }

    #[test]
    fn empty_program() {
        let prog = Program::load(Source::new("empty", "# nothing here\n")).unwrap();
        assert!(prog.is_empty());
        assert_eq!(prog.to_string(), "");
    }
}

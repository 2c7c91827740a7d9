use std::io::Write;

use miette::Result;

use crate::{error, program::Program, store::VarStore};

/// Complete execution state for one run of a program.
pub struct RunEnvironment<W: Write> {
    program: Program,
    /// Variables, owned here and lent to each command
    store: VarStore,
    /// Sink for `print`
    out: W,
    /// Index of the next command
    pc: usize,
    /// Commands executed so far
    steps: u64,
    /// Stop with an error after this many commands
    max_steps: Option<u64>,
}

impl<W: Write> RunEnvironment<W> {
    pub fn new(program: Program, out: W) -> Self {
        RunEnvironment {
            program,
            store: VarStore::new(),
            out,
            pc: 0,
            steps: 0,
            max_steps: None,
        }
    }

    pub fn with_step_limit(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Run until the program counter passes the last command.
    ///
    /// Without a step limit a program that loops forever never returns.
    pub fn run(&mut self) -> Result<()> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }

    /// Execute the command at the program counter. Does nothing once finished.
    pub fn step(&mut self) -> Result<()> {
        let Some(cmd) = self.program.get(self.pc) else {
            return Ok(());
        };
        if let Some(limit) = self.max_steps {
            if self.steps >= limit {
                return Err(error::run_step_limit(limit));
            }
        }
        self.pc = cmd
            .execute(self.pc, self.program.labels(), &mut self.store, &mut self.out)
            .map_err(|e| error::runtime(e, cmd, self.program.source()))?;
        self.steps += 1;
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.pc >= self.program.len()
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn store(&self) -> &VarStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

use std::io::{self, Write};

use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::debug;

use crate::{
    diagnostics::{MirrorError, Result},
    host::Host,
    runtime::Interpreter,
};

/// What the session loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Quit,
}

pub struct Repl<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
}

impl Repl<io::Stdout> {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Repl<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Repl<W> {
    pub fn with_host(host: Host<W>) -> Self {
        Self {
            interpreter: Interpreter::with_host(host),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    if self.handle_line(trimmed)? == ReplAction::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        debug!("repl session ended");
        Ok(())
    }

    /// Evaluates one line. The result is written through the host's sink,
    /// and diagnostics go to stderr.
    pub fn handle_line(&mut self, line: &str) -> Result<ReplAction> {
        let trimmed = line.trim();
        if trimmed == ":quit" || trimmed == ":exit" {
            return Ok(ReplAction::Quit);
        }
        if trimmed.is_empty() {
            return Ok(ReplAction::Continue);
        }
        match self.interpreter.eval_source(trimmed) {
            Ok(value) => {
                let result = format!("=> {}", value.inspect());
                self.interpreter.host_mut().echo(result)?;
            }
            Err(MirrorError::Diagnostic(diag)) => {
                eprintln!("{:?}: {}", diag.kind, diag.message);
            }
            Err(other) => eprintln!("error: {other}"),
        }
        Ok(ReplAction::Continue)
    }

    pub fn into_interpreter(self) -> Interpreter<W> {
        self.interpreter
    }
}

fn readline_error(err: ReadlineError) -> MirrorError {
    MirrorError::from(io::Error::other(err))
}

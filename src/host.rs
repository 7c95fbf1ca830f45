//! The embedding side: constants and capabilities a host hands to scripts.

use std::{
    fmt,
    io::{self, Write},
};

use tracing::trace;

use crate::diagnostics::{Diagnostic, Result};

/// Display strings the host exposes to every script it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub description: String,
    pub copyright: String,
}

impl HostConfig {
    pub fn new(description: impl Into<String>, copyright: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            copyright: copyright.into(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            description: format!(
                "{} {} (embedded)",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            copyright: format!(
                "{} - Copyright (c) 2025 {} developers",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_NAME")
            ),
        }
    }
}

/// What the current execution context is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub output: bool,
}

impl Capabilities {
    pub const fn console() -> Self {
        Self { output: true }
    }

    pub const fn sandboxed() -> Self {
        Self { output: false }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::console()
    }
}

pub struct Host<W: Write = io::Stdout> {
    config: HostConfig,
    capabilities: Capabilities,
    output: W,
}

impl Host<io::Stdout> {
    pub fn stdout(config: HostConfig, capabilities: Capabilities) -> Self {
        Self::new(config, capabilities, io::stdout())
    }
}

impl<W: Write> Host<W> {
    pub fn new(config: HostConfig, capabilities: Capabilities, output: W) -> Self {
        Self {
            config,
            capabilities,
            output,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn can_output(&self) -> bool {
        self.capabilities.output
    }

    /// Writes one line, adding `\n` unless the text already ends with one.
    /// Fails when the host grants no output capability.
    pub fn puts(&mut self, line: impl fmt::Display) -> Result<()> {
        if !self.can_output() {
            return Err(Diagnostic::runtime("undefined method 'puts' for main")
                .with_note("the host does not provide an output capability")
                .into());
        }
        let line = line.to_string();
        trace!(bytes = line.len(), "puts");
        self.write_line(&line)
    }

    /// Writes on behalf of the embedder itself, so no capability is checked.
    pub fn echo(&mut self, line: impl fmt::Display) -> Result<()> {
        self.write_line(&line.to_string())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.output.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            self.output.write_all(b"\n")?;
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> fmt::Debug for Host<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

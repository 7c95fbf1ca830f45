//! Embeddable interpreter host for the mirror example scripts.
//! Hosts inject their display constants and capabilities, run the bundled
//! inspection script, or evaluate small source strings.

pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod host;
pub mod inspect;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod script;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, MirrorError, SourceSpan};
pub use host::{Capabilities, Host, HostConfig};
pub use inspect::{Example, Inspect};
pub use repl::{Repl, ReplAction};
pub use runtime::Interpreter;
pub use value::{Value, ValueKind};

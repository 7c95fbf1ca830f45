//! The bundled example script.
//!
//! When the host can write output it prints its description, its copyright
//! line and the representation of a fresh [`Example`]. Either way the
//! script evaluates to [`SCRIPT_RESULT`].

use std::io::Write;

use tracing::debug;

use crate::{
    diagnostics::Result,
    host::Host,
    inspect::{Example, Inspect},
    value::Value,
};

pub const SCRIPT_RESULT: i64 = 42;

pub fn run<W: Write>(host: &mut Host<W>) -> Result<Value> {
    if host.can_output() {
        let description = host.config().description.clone();
        let copyright = host.config().copyright.clone();
        host.puts(description)?;
        host.puts(copyright)?;
        host.puts(Example::new().inspect())?;
    } else {
        debug!("host has no output capability, skipping banner");
    }
    debug!(result = SCRIPT_RESULT, "example script finished");
    Ok(Value::int(SCRIPT_RESULT))
}

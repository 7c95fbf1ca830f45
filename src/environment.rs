use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, MirrorError, SourceSpan},
    host::HostConfig,
    value::Value,
};

/// Constants visible to evaluated source. Host constants are installed
/// first and can never be reassigned.
#[derive(Debug, Default)]
pub struct Environment {
    constants: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_host(config: &HostConfig) -> Self {
        let mut env = Self::new();
        env.define("DESCRIPTION", Value::string(config.description.clone()));
        env.define("COPYRIGHT", Value::string(config.copyright.clone()));
        env
    }

    /// Returns `false` without overwriting when the constant already exists.
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if self.constants.contains_key(&name) {
            return false;
        }
        self.constants.insert(name, value);
        true
    }

    pub fn get(&self, name: &str, span: SourceSpan) -> Result<Value, MirrorError> {
        self.constants.get(name).cloned().ok_or_else(|| {
            let known = self.names().collect::<Vec<_>>().join(", ");
            MirrorError::from(
                Diagnostic::runtime(format!("uninitialized constant {name}"))
                    .with_span(span)
                    .with_note(format!("defined constants: {known}")),
            )
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constants.keys().map(String::as_str)
    }
}

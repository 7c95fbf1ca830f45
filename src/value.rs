use std::{fmt, rc::Rc};

use crate::diagnostics::{Diagnostic, MirrorError, SourceSpan};

#[derive(Clone, PartialEq)]
pub struct Value(pub Rc<ValueKind>);

#[derive(Clone, PartialEq)]
pub enum ValueKind {
    Nil,
    Int(i64),
    String(String),
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn nil() -> Self {
        Self::new(ValueKind::Nil)
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueKind::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String(value.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            ValueKind::Nil => "NilClass",
            ValueKind::Int(_) => "Integer",
            ValueKind::String(_) => "String",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match &*self.0 {
            ValueKind::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn expect_int(&self, span: SourceSpan) -> Result<i64, MirrorError> {
        self.as_int().ok_or_else(|| {
            MirrorError::from(
                Diagnostic::runtime(format!("expected Integer, found {}", self.type_name()))
                    .with_span(span),
            )
        })
    }

    /// Rendering used by the REPL and error messages.
    pub fn inspect(&self) -> String {
        match &*self.0 {
            ValueKind::Nil => "nil".into(),
            ValueKind::Int(n) => n.to_string(),
            ValueKind::String(s) => format!("{s:?}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

/// Rendering used by `puts`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Nil => Ok(()),
            ValueKind::Int(n) => write!(f, "{n}"),
            ValueKind::String(s) => f.write_str(s),
        }
    }
}

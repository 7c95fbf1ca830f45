use std::io::{self, Write};

use tracing::{debug, trace};

use crate::{
    ast::{BinaryOp, Expr, ExprKind, Literal, Program, Stmt, StmtKind, UnaryOp},
    diagnostics::{Diagnostic, MirrorError, Result, SourceSpan},
    environment::Environment,
    host::{Capabilities, Host, HostConfig},
    parser,
    value::{Value, ValueKind},
};

/// Evaluates source strings on behalf of an embedding [`Host`].
pub struct Interpreter<W: Write = io::Stdout> {
    host: Host<W>,
    env: Environment,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_host(Host::stdout(HostConfig::default(), Capabilities::console()))
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_host(host: Host<W>) -> Self {
        let env = Environment::from_host(host.config());
        Self { host, env }
    }

    pub fn host(&self) -> &Host<W> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host<W> {
        &mut self.host
    }

    pub fn into_host(self) -> Host<W> {
        self.host
    }

    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let program = parser::parse_program(source)?;
        debug!(statements = program.items.len(), "evaluating source");
        self.eval_program(&program)
    }

    pub fn eval_program(&mut self, program: &Program) -> Result<Value> {
        let mut last_value = Value::nil();
        for stmt in &program.items {
            last_value = self.execute_statement(stmt)?;
        }
        Ok(last_value)
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<Value> {
        trace!(?stmt.span, "statement");
        match &stmt.kind {
            StmtKind::Puts(expr) => {
                let value = match expr {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::nil(),
                };
                self.host.puts(&value).map_err(|err| match err {
                    MirrorError::Diagnostic(diag) => {
                        MirrorError::from(diag.with_span(stmt.span))
                    }
                    other => other,
                })?;
                Ok(Value::nil())
            }
            StmtKind::Expr(expr) => self.evaluate(expr),
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal(lit)),
            ExprKind::Constant(name) => self.env.get(name, expr.span),
            ExprKind::Identifier(name) => Err(MirrorError::from(
                Diagnostic::runtime(format!("undefined local variable or method '{name}'"))
                    .with_span(expr.span),
            )),
            ExprKind::Binary { op, left, right } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                binary(*op, &left_value, &right_value, expr.span)
            }
            ExprKind::Unary { op, expr: inner } => {
                let value = self.evaluate(inner)?;
                unary(*op, &value, expr.span)
            }
            ExprKind::Group(inner) => self.evaluate(inner),
        }
    }
}

fn literal(literal: &Literal) -> Value {
    match literal {
        Literal::Int(n) => Value::int(*n),
        Literal::String(s) => Value::string(s.clone()),
        Literal::Nil => Value::nil(),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value, span: SourceSpan) -> Result<Value> {
    if let (BinaryOp::Add, ValueKind::String(a), ValueKind::String(b)) =
        (op, &*left.0, &*right.0)
    {
        return Ok(Value::string(format!("{a}{b}")));
    }
    let (a, b) = match (left.as_int(), right.as_int()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(MirrorError::from(
                Diagnostic::runtime(format!(
                    "undefined method '{}' for {} and {}",
                    op.symbol(),
                    left.type_name(),
                    right.type_name()
                ))
                .with_span(span),
            ));
        }
    };
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div | BinaryOp::Mod if b == 0 => {
            return Err(MirrorError::from(
                Diagnostic::runtime("divided by 0").with_span(span),
            ));
        }
        BinaryOp::Div => floor_div(a, b),
        BinaryOp::Mod => floor_mod(a, b),
    };
    result.map(Value::int).ok_or_else(|| {
        MirrorError::from(
            Diagnostic::runtime(format!("integer overflow in {a} {} {b}", op.symbol()))
                .with_span(span),
        )
    })
}

fn unary(op: UnaryOp, value: &Value, span: SourceSpan) -> Result<Value> {
    match op {
        UnaryOp::Negate => {
            let n = value.expect_int(span)?;
            n.checked_neg().map(Value::int).ok_or_else(|| {
                MirrorError::from(
                    Diagnostic::runtime(format!("integer overflow in -{n}")).with_span(span),
                )
            })
        }
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Remainder taking the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    // Only i64::MIN % -1 overflows, and its remainder is 0.
    let rem = a.checked_rem(b).unwrap_or(0);
    if rem != 0 && ((rem < 0) != (b < 0)) {
        Some(rem + b)
    } else {
        Some(rem)
    }
}

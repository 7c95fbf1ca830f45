use crate::{
    ast::{BinaryOp, Expr, ExprKind, Literal, Program, Stmt, StmtKind, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Keyword, Lexer, Token, TokenKind},
};

/// Deepest allowed nesting of groups and unary operators.
pub const MAX_NESTING: usize = 128;
/// Most binary operators allowed in one statement.
pub const MAX_OPERATORS: usize = 1024;

pub fn parse_program(source: &str) -> Result<Program, Diagnostic> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    operators: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
            operators: 0,
        }
    }

    fn parse_program(&mut self) -> Result<Program, Diagnostic> {
        let mut items = Vec::new();
        self.skip_terminators();
        while !self.check(TokenKind::Eof) {
            items.push(self.parse_statement()?);
            if !self.check(TokenKind::Eof) && !self.at_terminator() {
                let token = self.current_token();
                return Err(self.error(
                    token,
                    &format!("unexpected `{}` after statement", token.lexeme),
                ));
            }
            self.skip_terminators();
        }
        Ok(Program { items })
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        self.operators = 0;
        if self.matches(TokenKind::Keyword(Keyword::Puts)) {
            let keyword = self.previous().span;
            if self.at_terminator() || self.check(TokenKind::Eof) {
                return Ok(Stmt {
                    span: keyword,
                    kind: StmtKind::Puts(None),
                });
            }
            let expr = self.parse_expression()?;
            return Ok(Stmt {
                span: keyword.to(expr.span),
                kind: StmtKind::Puts(Some(expr)),
            });
        }
        let expr = self.parse_expression()?;
        Ok(Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = if self.matches(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.matches(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            self.count_operator()?;
            self.skip_newlines();
            let right = self.parse_factor()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.matches(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.matches(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.matches(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            self.count_operator()?;
            self.skip_newlines();
            let right = self.parse_unary()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        if self.matches(TokenKind::Minus) {
            let operator = self.previous().span;
            // Fold `-<digits>` so that i64::MIN stays representable.
            if self.check(TokenKind::Number) {
                let token = self.advance();
                let value = parse_int(&format!("-{}", token.lexeme), operator.to(token.span))?;
                return Ok(Expr {
                    span: operator.to(token.span),
                    kind: ExprKind::Literal(Literal::Int(value)),
                });
            }
            let right = self.nested(operator, Self::parse_unary)?;
            return Ok(Expr {
                span: operator.to(right.span),
                kind: ExprKind::Unary {
                    op: UnaryOp::Negate,
                    expr: Box::new(right),
                },
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        if self.is_at_end() {
            return Err(self.error_eof("unexpected end of input"));
        }
        let token = self.advance();
        let kind = match &token.kind {
            TokenKind::Number => {
                ExprKind::Literal(Literal::Int(parse_int(&token.lexeme, token.span)?))
            }
            TokenKind::String => ExprKind::Literal(Literal::String(token.lexeme.clone())),
            TokenKind::Keyword(Keyword::Nil) => ExprKind::Literal(Literal::Nil),
            TokenKind::Constant => ExprKind::Constant(token.lexeme.clone()),
            TokenKind::Identifier => ExprKind::Identifier(token.lexeme.clone()),
            TokenKind::LParen => {
                let inner = self.nested(token.span, |parser| {
                    parser.skip_newlines();
                    let inner = parser.parse_expression()?;
                    parser.skip_newlines();
                    Ok(inner)
                })?;
                let rparen = self.consume(TokenKind::RParen, "expected `)` after expression")?;
                return Ok(Expr {
                    span: token.span.to(rparen.span),
                    kind: ExprKind::Group(Box::new(inner)),
                });
            }
            _ => {
                return Err(self.error(
                    &token,
                    &format!("unexpected `{}`, expected expression", token.lexeme),
                ));
            }
        };
        Ok(Expr {
            span: token.span,
            kind,
        })
    }

    fn nested<F>(&mut self, opener: SourceSpan, parse: F) -> Result<Expr, Diagnostic>
    where
        F: FnOnce(&mut Self) -> Result<Expr, Diagnostic>,
    {
        if self.depth >= MAX_NESTING {
            return Err(
                Diagnostic::new(DiagnosticKind::Parser, "expression nested too deeply")
                    .with_span(opener)
                    .with_note(format!("at most {MAX_NESTING} levels are allowed")),
            );
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn count_operator(&mut self) -> Result<(), Diagnostic> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            let span = self.previous().span;
            return Err(
                Diagnostic::new(DiagnosticKind::Parser, "expression has too many operators")
                    .with_span(span)
                    .with_note(format!("at most {MAX_OPERATORS} are allowed per statement")),
            );
        }
        Ok(())
    }

    fn at_terminator(&self) -> bool {
        self.check(TokenKind::Newline) || self.check(TokenKind::Semicolon)
    }

    fn skip_terminators(&mut self) {
        while self.at_terminator() {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.matches(TokenKind::Newline) {}
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(self.error_eof(message))
        } else {
            Err(self.error(self.current_token(), message))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current)
            .is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn is_at_end(&self) -> bool {
        matches!(
            self.tokens.get(self.current).map(|t| &t.kind),
            Some(TokenKind::Eof) | None
        )
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string()).with_span(token.span)
    }

    fn error_eof(&self, message: &str) -> Diagnostic {
        let end = self.current_token().span.end;
        Diagnostic::new(DiagnosticKind::Parser, message.to_string())
            .with_span(SourceSpan::new(end, end))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr {
        span: left.span.to(right.span),
        kind: ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    }
}

fn parse_int(lexeme: &str, span: SourceSpan) -> Result<i64, Diagnostic> {
    lexeme.replace('_', "").parse().map_err(|_| {
        Diagnostic::new(
            DiagnosticKind::Parser,
            format!("integer literal `{lexeme}` is out of range"),
        )
        .with_span(span)
    })
}

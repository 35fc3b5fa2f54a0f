use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};
use crate::foundation::error::ScriptValueResult;
use crate::value::model::{BinaryOp, ScriptValue, UnaryOp};

/// Convert legacy expression text into a script value tree.
///
/// Never fails: text that does not parse becomes `number:0`. Use
/// [`try_parse_expression`] to get the syntax error instead.
#[tracing::instrument(level = "trace")]
pub fn parse_expression(src: &str) -> ScriptValue {
    match parse_expr(src) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "legacy expression degraded to 0");
            ScriptValue::Number(0)
        }
    }
}

/// Strict variant of [`parse_expression`] reporting the first syntax error.
pub fn try_parse_expression(src: &str) -> ScriptValueResult<ScriptValue> {
    Ok(parse_expr(src)?)
}

pub(crate) fn parse_expr(src: &str) -> Result<ScriptValue, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = p.parse_binary(0)?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

/// Nesting bound for unary chains, parentheses and calls.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Binding power and node kind for infix operators. Higher binds tighter;
/// all levels are left associative.
fn infix_op(kind: &TokenKind) -> Option<(u8, BinaryOp)> {
    let entry = match kind {
        TokenKind::OrOr => (1, BinaryOp::Or),
        TokenKind::AndAnd => (2, BinaryOp::And),
        TokenKind::Pipe => (3, BinaryOp::BOr),
        TokenKind::Caret => (4, BinaryOp::BXor),
        TokenKind::Amp => (5, BinaryOp::BAnd),
        TokenKind::EqEq => (6, BinaryOp::Eq),
        TokenKind::Ne => (6, BinaryOp::Ne),
        TokenKind::Lt => (7, BinaryOp::Lt),
        TokenKind::Le => (7, BinaryOp::Lte),
        TokenKind::Gt => (7, BinaryOp::Gt),
        TokenKind::Ge => (7, BinaryOp::Gte),
        TokenKind::Shl => (8, BinaryOp::Shl),
        TokenKind::Shr => (8, BinaryOp::Shr),
        TokenKind::Plus => (9, BinaryOp::Add),
        TokenKind::Minus => (9, BinaryOp::Sub),
        TokenKind::Star => (10, BinaryOp::Mul),
        TokenKind::Slash => (10, BinaryOp::Div),
        TokenKind::Percent => (10, BinaryOp::Mod),
        _ => return None,
    };
    Some(entry)
}

enum Callee {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

fn callee(name: &str) -> Option<Callee> {
    match name {
        "min" => Some(Callee::Binary(BinaryOp::Min)),
        "max" => Some(Callee::Binary(BinaryOp::Max)),
        "atan2" => Some(Callee::Binary(BinaryOp::Atan2)),
        "abs" => Some(Callee::Unary(UnaryOp::Abs)),
        "rnd" => Some(Callee::Unary(UnaryOp::Rnd)),
        "isqrt" => Some(Callee::Unary(UnaryOp::Isqrt)),
        _ => None,
    }
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::new(
                self.span().start,
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn parse_binary(&mut self, min_power: u8) -> Result<ScriptValue, ExprError> {
        let mut lhs = self.parse_unary()?;
        while let Some((power, op)) = infix_op(&self.peek().kind) {
            if power <= min_power {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(power)?;
            lhs = ScriptValue::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ScriptValue, ExprError> {
        self.nested(Self::parse_prefixed)
    }

    fn parse_prefixed(&mut self) -> Result<ScriptValue, ExprError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(ScriptValue::binary(BinaryOp::Sub, ScriptValue::Number(0), e));
        }
        if self.consume(TokenKind::Bang) {
            let e = self.parse_unary()?;
            return Ok(ScriptValue::unary(UnaryOp::Not, e));
        }
        if self.consume(TokenKind::Tilde) {
            let e = self.parse_unary()?;
            return Ok(ScriptValue::unary(UnaryOp::BNot, e));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ScriptValue, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Number(v) => Ok(ScriptValue::Number(v)),
            TokenKind::True => Ok(ScriptValue::Number(1)),
            TokenKind::False => Ok(ScriptValue::Number(0)),
            TokenKind::Variable(id) => Ok(ScriptValue::Variable(id)),
            TokenKind::Ident(name) => self.parse_call(&name, t.span),
            TokenKind::LParen => self.nested(|p| {
                let e = p.parse_binary(0)?;
                p.expect(TokenKind::RParen)?;
                Ok(e)
            }),
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }

    fn parse_call(&mut self, name: &str, span: Span) -> Result<ScriptValue, ExprError> {
        let Some(f) = callee(name) else {
            return Err(ExprError::new(
                span.start,
                format!("unknown function '{name}'"),
            ));
        };
        self.expect(TokenKind::LParen)?;
        let mut args = self.nested(Self::parse_args)?;
        match f {
            Callee::Unary(op) => {
                if args.len() != 1 {
                    return Err(ExprError::new(
                        span.start,
                        format!("{name} expects 1 argument, got {}", args.len()),
                    ));
                }
                let a = args.remove(0);
                Ok(ScriptValue::unary(op, a))
            }
            Callee::Binary(op) => {
                if args.len() != 2 {
                    return Err(ExprError::new(
                        span.start,
                        format!("{name} expects 2 arguments, got {}", args.len()),
                    ));
                }
                let b = args.remove(1);
                let a = args.remove(0);
                Ok(ScriptValue::binary(op, a, b))
            }
        }
    }

    fn parse_args(&mut self) -> Result<Vec<ScriptValue>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_binary(0)?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;

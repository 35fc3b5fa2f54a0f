use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(i64),
    /// `$..$` reference, already normalised.
    Variable(String),
    True,
    False,

    LParen,
    RParen,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Bang,
    Tilde,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Shl,
    Shr,
    Amp,
    Pipe,
    Caret,

    AndAnd,
    OrOr,

    Eof,
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Number: [0-9]+
        if c.is_ascii_digit() {
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            let s = &input[start..i];
            let v: i64 = s
                .parse()
                .map_err(|_| ExprError::new(start, "integer literal out of range"))?;
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        // Variable: $<token>$
        if c == '$' {
            let Some(len) = input[start + 1..].find('$') else {
                return Err(ExprError::new(start, "unterminated variable reference"));
            };
            let raw = &input[start + 1..start + 1 + len];
            let Some(id) = normalize_variable_token(raw) else {
                return Err(ExprError::new(
                    start,
                    format!("invalid variable reference '${raw}$'"),
                ));
            };
            i = start + len + 2;
            out.push(Token {
                kind: TokenKind::Variable(id),
                span: Span { start, end: i },
            });
            continue;
        }

        // Ident
        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    i += 1;
                } else {
                    break;
                }
            }
            let s = &input[start..i];
            let kind = match s {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                _ => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        // Two-char operators
        if let Some(two) = input.get(i..i + 2) {
            let kind = match two {
                "&&" => Some(TokenKind::AndAnd),
                "||" => Some(TokenKind::OrOr),
                "==" => Some(TokenKind::EqEq),
                "!=" => Some(TokenKind::Ne),
                "<=" => Some(TokenKind::Le),
                ">=" => Some(TokenKind::Ge),
                "<<" => Some(TokenKind::Shl),
                ">>" => Some(TokenKind::Shr),
                _ => None,
            };
            if let Some(kind) = kind {
                i += 2;
                out.push(Token {
                    kind,
                    span: Span { start, end: i },
                });
                continue;
            }
        }

        // Single-char tokens
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '~' => TokenKind::Tilde,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            _ => {
                let ch = input[start..].chars().next().unwrap_or(c);
                return Err(ExprError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        i += 1;
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}

/// Normalise the inside of a `$..$` reference into a variable id.
///
/// Bare digits are globals and lose leading zeros (`00` -> `0`); `L`, `V` and
/// `T` prefixed tokens are kept verbatim.
pub(crate) fn normalize_variable_token(raw: &str) -> Option<String> {
    let (prefixed, digits) = match raw.as_bytes().first()? {
        b'L' | b'V' | b'T' => (true, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if prefixed {
        return Some(raw.to_owned());
    }
    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed }.to_owned())
}

/// Variable references embedded in legacy expression text, left to right.
///
/// Works on raw text without lexing, so references are still found in
/// expressions that fail to parse.
pub(crate) fn scan_variable_refs(src: &str) -> VariableRefs<'_> {
    VariableRefs { src, pos: 0 }
}

pub(crate) struct VariableRefs<'a> {
    src: &'a str,
    pos: usize,
}

impl Iterator for VariableRefs<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let open = self.src[self.pos..].find('$')?;
            let start = self.pos + open + 1;
            let close = self.src[start..].find('$')?;
            let end = start + close;
            match normalize_variable_token(&self.src[start..end]) {
                Some(id) => {
                    self.pos = end + 1;
                    return Some(id);
                }
                // The closing '$' may open the next reference.
                None => self.pos = end,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;

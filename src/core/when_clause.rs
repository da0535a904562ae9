//! When clauses: boolean enablement expressions over context flags.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! or      := and ( "||" and )*
//! and     := unary ( "&&" unary )*
//! unary   := "!" unary | primary
//! primary := identifier | "true" | "false" | "(" or ")"
//! ```
//!
//! In strict mode every identifier referenced by the clause must be present in
//! the context, whether or not evaluation would reach it.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::context::WhenClauseContext;
use super::error::{CommandError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhenClauseMode {
    /// Unknown identifiers are an error.
    #[default]
    Strict,
    /// Unknown identifiers evaluate to `false`.
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Literal(bool),
    Key(CompactString),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    fn eval(&self, ctx: &WhenClauseContext) -> bool {
        match self {
            Expr::Literal(value) => *value,
            Expr::Key(key) => ctx.get(key).unwrap_or(false),
            Expr::Not(inner) => !inner.eval(ctx),
            Expr::And(terms) => terms.iter().all(|t| t.eval(ctx)),
            Expr::Or(terms) => terms.iter().any(|t| t.eval(ctx)),
        }
    }
}

/// A parsed when clause. Parse once, evaluate many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhenClause {
    source: CompactString,
    expr: Option<Expr>,
    identifiers: Vec<CompactString>,
}

impl WhenClause {
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self {
                source: CompactString::from(source),
                expr: None,
                identifiers: Vec::new(),
            });
        }

        let tokens = tokenize(source)?;
        let mut parser = Parser {
            source,
            tokens: &tokens,
            pos: 0,
            identifiers: Vec::new(),
        };
        let expr = parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(invalid(source, format!("unexpected {}", token)));
        }

        Ok(Self {
            source: CompactString::from(source),
            expr: Some(expr),
            identifiers: parser.identifiers,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Referenced context keys in first-occurrence order, without duplicates.
    pub fn identifiers(&self) -> &[CompactString] {
        &self.identifiers
    }

    pub fn is_unconditional(&self) -> bool {
        self.expr.is_none()
    }

    pub fn evaluate(&self, ctx: &WhenClauseContext, mode: WhenClauseMode) -> Result<bool> {
        let Some(expr) = &self.expr else {
            return Ok(true);
        };

        if mode == WhenClauseMode::Strict {
            if let Some(key) = self.identifiers.iter().find(|key| !ctx.contains(key)) {
                return Err(CommandError::UnknownContextKey {
                    key: key.clone(),
                    expression: self.source.clone(),
                });
            }
        }

        Ok(expr.eval(ctx))
    }
}

/// Parses and evaluates `expression` in one go. `None` means "no restriction".
pub fn evaluate(
    expression: Option<&str>,
    ctx: &WhenClauseContext,
    mode: WhenClauseMode,
) -> Result<bool> {
    match expression {
        None => Ok(true),
        Some(source) => WhenClause::parse(source)?.evaluate(ctx, mode),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(CompactString),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::And => f.write_str("'&&'"),
            Token::Or => f.write_str("'||'"),
            Token::Not => f.write_str("'!'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn invalid(source: &str, message: impl Into<String>) -> CommandError {
    CommandError::InvalidWhenClause {
        expression: CompactString::from(source),
        message: message.into(),
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | ':' | '-')
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '!' => tokens.push(Token::Not),
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == ch).is_none() {
                    return Err(invalid(
                        source,
                        format!("expected '{ch}{ch}' at offset {offset}"),
                    ));
                }
                tokens.push(if ch == '&' { Token::And } else { Token::Or });
            }
            c if is_ident_start(c) => {
                let mut end = offset + c.len_utf8();
                while let Some((idx, next)) = chars.next_if(|&(_, next)| is_ident_continue(next)) {
                    end = idx + next.len_utf8();
                }
                tokens.push(Token::Ident(CompactString::from(&source[offset..end])));
            }
            other => {
                return Err(invalid(
                    source,
                    format!("unexpected character '{}' at offset {}", other, offset),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    identifiers: Vec<CompactString>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut terms = vec![self.parse_and()?];
        while self.eat(&Token::Or) {
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Or(terms)
        })
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut terms = vec![self.parse_unary()?];
        while self.eat(&Token::And) {
            terms.push(self.parse_unary()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::And(terms)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let tokens = self.tokens;
        let Some(token) = tokens.get(self.pos) else {
            return Err(invalid(self.source, "unexpected end of expression"));
        };
        self.pos += 1;

        match token {
            Token::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(true),
                "false" => Expr::Literal(false),
                _ => {
                    if !self.identifiers.contains(name) {
                        self.identifiers.push(name.clone());
                    }
                    Expr::Key(name.clone())
                }
            }),
            Token::LParen => {
                let inner = self.parse_or()?;
                if !self.eat(&Token::RParen) {
                    return Err(invalid(self.source, "expected ')'"));
                }
                Ok(inner)
            }
            other => Err(invalid(self.source, format!("unexpected {}", other))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/when_clause.rs"]
mod tests;

//! Literal values embedded in annotation arguments and view module configs.
//!
//! The accepted grammar is a relaxed JSON: object keys may be bare
//! identifiers, strings may use single quotes, and trailing commas are
//! allowed.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Number kept as written
    Number(String),
    String(String),
    Array(Vec<Literal>),
    Object(Vec<(String, Literal)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse a complete literal; trailing non-whitespace is an error.
pub fn parse(text: &str) -> Result<Literal, LiteralError> {
    let (literal, consumed) = parse_prefix(text)?;
    let mut parser = Parser { src: text, pos: consumed };
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(literal)
}

/// Parse one literal from the start of `text`, returning it with the number
/// of bytes consumed.
pub fn parse_prefix(text: &str) -> Result<(Literal, usize), LiteralError> {
    let mut parser = Parser { src: text, pos: 0 };
    let literal = parser.value()?;
    Ok((literal, parser.pos))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(q @ ('"' | '\'')) => self.string(q).map(Literal::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => match self.identifier().as_str() {
                "true" => Ok(Literal::Bool(true)),
                "false" => Ok(Literal::Bool(false)),
                "null" => Ok(Literal::Null),
                _ => Err(self.error("unexpected identifier")),
            },
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn object(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(Literal::Object(entries));
            }
            let key = match self.peek() {
                Some(q @ ('"' | '\'')) => self.string(q)?,
                Some(c) if is_ident_start(c) => self.identifier(),
                _ => return Err(self.error("expected object key")),
            };
            self.skip_ws();
            if !self.eat(':') {
                return Err(self.error("expected ':'"));
            }
            let value = self.value()?;
            entries.push((key, value));
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                if self.eat('}') {
                    return Ok(Literal::Object(entries));
                }
                return Err(self.error("expected ',' or '}'"));
            }
        }
    }

    fn array(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(']') {
                return Ok(Literal::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                if self.eat(']') {
                    return Ok(Literal::Array(items));
                }
                return Err(self.error("expected ',' or ']'"));
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        self.eat('-');
        let digits = |p: &mut Self| {
            let before = p.pos;
            while matches!(p.peek(), Some(c) if c.is_ascii_digit()) {
                p.bump();
            }
            p.pos > before
        };
        if !digits(self) {
            return Err(self.error("expected digits"));
        }
        if self.eat('.') && !digits(self) {
            return Err(self.error("expected fraction digits"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if !self.eat('+') {
                self.eat('-');
            }
            if !digits(self) {
                return Err(self.error("expected exponent digits"));
            }
        }
        Ok(Literal::Number(self.src[start..self.pos].to_string()))
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_start(c) || c.is_ascii_digit()) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c))
        && chars.all(|c| is_ident_start(c) || c.is_ascii_digit())
}

/// Double-quoted string literal with escapes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Object key as written in source: bare when possible, quoted otherwise.
pub fn object_key(key: &str) -> String {
    if is_plain_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => f.write_str(n),
            Literal::String(s) => f.write_str(&quote(s)),
            Literal::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Literal::Object(entries) if entries.is_empty() => f.write_str("{}"),
            Literal::Object(entries) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {value}", object_key(key))?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => n
                .parse::<Number>()
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Literal::Object(entries) => {
                let map: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

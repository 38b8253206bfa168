//! Lenient decoder for array-like text that is not strict JSON.
//!
//! Models often answer with `['Intro', 'Agenda']`, `(1, 2)`, `[True, None]`
//! or a trailing comma. This accepts those forms and produces plain JSON
//! values; anything it cannot read is an error, never a guess.

use serde_json::{Map as JsonMap, Number, Value};
use thiserror::Error;

/// Matches the recursion limit serde_json applies to strict input.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub reason: String,
}

pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser {
        chars: text.char_indices().collect(),
        pos: 0,
        len: text.len(),
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
    depth: usize,
}

impl LiteralParser {
    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.nested(|parser| parser.sequence(']')),
            Some('(') => self.nested(|parser| parser.sequence(')')),
            Some('{') => self.nested(Self::mapping),
            Some(quote @ ('\'' | '"')) => self.string(quote).map(Value::String),
            Some(ch) if ch == '-' || ch == '+' || ch == '.' || ch.is_ascii_digit() => self.number(),
            Some(ch) if ch.is_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Value, LiteralError>,
    ) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(close) {
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(Value::Array(items));
            }
            return Err(self.error("expected ',' or closing bracket"));
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = JsonMap::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(text) => text,
                other => other.to_string(),
            };
            self.skip_whitespace();
            if !self.eat(':') {
                return Err(self.error("expected ':' after mapping key"));
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            return Err(self.error("expected ',' or '}'"));
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.bump();
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| self.error("unterminated escape sequence"))?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                ch if ch == quote => return Ok(out),
                ch => out.push(ch),
            }
        }
        Err(self.error("unterminated string"))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.offset();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | '.' | '_') {
                self.bump();
            } else {
                break;
            }
        }
        let raw: String = self.slice_from(start).chars().filter(|ch| *ch != '_').collect();
        if let Ok(integer) = raw.parse::<i64>() {
            return Ok(Value::Number(integer.into()));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError {
                offset: start,
                reason: format!("invalid number '{raw}'"),
            })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.offset();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match self.slice_from(start).as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            other => Err(LiteralError {
                offset: start,
                reason: format!("unknown name '{other}'"),
            }),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, ch)| *ch)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.len)
    }

    fn slice_from(&self, start: usize) -> String {
        self.chars
            .iter()
            .filter(|(offset, _)| *offset >= start && *offset < self.offset())
            .map(|(_, ch)| *ch)
            .collect()
    }

    fn error(&self, reason: &str) -> LiteralError {
        LiteralError {
            offset: self.offset(),
            reason: reason.to_string(),
        }
    }
}

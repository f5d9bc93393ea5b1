//! Rule header compiler.
//!
//! Grammar, one line:
//!
//! ```text
//! header  := '*' flag* [ clause ( ',' clause )* ] ws*
//! flag    := '!' | '?'
//! clause  := key ( '==' | '!=' ) '"' value '"'
//! ```
//!
//! Whitespace may separate any two tokens. Inside a value, `\"` and `\\`
//! escape a quote and a backslash; other backslashes are kept as written.

use crate::schema::{Clause, CompiledHeader, Operator, Predicate};

/// Leading character of every header line.
pub const MARKER: char = '*';

/// Why a header failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxReason {
    #[error("header must start with '*'")]
    MissingMarker,
    #[error("expected a key")]
    ExpectedKey,
    #[error("expected '==' or '!='")]
    ExpectedOperator,
    #[error("expected '\"' to open the value")]
    ExpectedQuote,
    #[error("missing closing '\"'")]
    UnterminatedValue,
    #[error("unexpected character {0:?}")]
    Unexpected(char),
}

/// Header compile failure with the 1-based column where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {column}: {reason}")]
pub struct SyntaxError {
    pub column: usize,
    pub reason: SyntaxReason,
}

/// Whether a config line opens a new rule.
pub fn is_header(line: &[u8]) -> bool {
    line.first() == Some(&(MARKER as u8))
}

/// Compile one header line into its predicate and flags.
pub fn compile(line: &str) -> Result<CompiledHeader, SyntaxError> {
    let mut cur = Cursor::new(line);
    if !cur.eat(MARKER) {
        return Err(cur.error(SyntaxReason::MissingMarker));
    }

    let mut header = CompiledHeader::default();
    loop {
        cur.skip_ws();
        match cur.peek() {
            Some('!') => header.immediate = true,
            Some('?') => header.preamble = true,
            _ => break,
        }
        cur.bump();
    }

    let mut clauses = Vec::new();
    if !cur.at_end() {
        loop {
            clauses.push(clause(&mut cur)?);
            cur.skip_ws();
            match cur.peek() {
                None => break,
                Some(',') => {
                    cur.bump();
                    cur.skip_ws();
                }
                Some(c) => return Err(cur.error(SyntaxReason::Unexpected(c))),
            }
        }
    }

    header.predicate = Predicate::new(clauses);
    Ok(header)
}

fn clause(cur: &mut Cursor<'_>) -> Result<Clause, SyntaxError> {
    let key = cur.take_while(is_key_char);
    if key.is_empty() {
        return Err(cur.error(SyntaxReason::ExpectedKey));
    }
    cur.skip_ws();

    let op = if cur.eat_str("==") {
        Operator::Equals
    } else if cur.eat_str("!=") {
        Operator::NotEquals
    } else {
        return Err(cur.error(SyntaxReason::ExpectedOperator));
    };
    cur.skip_ws();

    if !cur.eat('"') {
        return Err(cur.error(SyntaxReason::ExpectedQuote));
    }
    let mut value = String::new();
    loop {
        match cur.bump() {
            None => return Err(cur.error(SyntaxReason::UnterminatedValue)),
            Some('"') => break,
            Some('\\') => match cur.peek() {
                Some(c @ ('"' | '\\')) => {
                    cur.bump();
                    value.push(c);
                }
                _ => value.push('\\'),
            },
            Some(c) => value.push(c),
        }
    }

    Ok(Clause::new(key, op, value))
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, want: &str) -> bool {
        if self.rest().starts_with(want) {
            self.pos += want.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn error(&self, reason: SyntaxReason) -> SyntaxError {
        SyntaxError {
            column: self.pos + 1,
            reason,
        }
    }
}

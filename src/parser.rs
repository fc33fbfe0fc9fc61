// src/parser.rs
use crate::errors::{MatchError, Result};

/// Character-level cursor over an expression string.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// `[A-Za-z_$][A-Za-z0-9_$]*`, ASCII only.
    pub fn parse_identifier(&mut self) -> Result<&'a str> {
        let start = self.i;
        match self.peek_char() {
            Some(c) if is_ident_start(c) => self.i += 1,
            Some(c) => {
                return Err(MatchError::rejected(format!(
                    "identifier expected at offset {start}, found '{c}'"
                )))
            }
            None => {
                return Err(MatchError::rejected(format!(
                    "identifier expected at offset {start}, found end of input"
                )))
            }
        }
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.i += 1;
            } else {
                break;
            }
        }
        Ok(&self.s[start..self.i])
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn consume_str(&mut self, lit: &str) -> bool {
        if self.peek_str(lit) {
            self.i += lit.len();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_ws(c) {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }

    pub fn offset(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

/// Unicode whitespace plus U+FEFF (BOM), which `char::is_whitespace` omits.
pub fn is_ws(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

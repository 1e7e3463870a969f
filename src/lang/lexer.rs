//! Hand-written lexer for the command DSL (§4.H).

use crate::{err_at, Result};

/// `(line_no, col_no)` within the source text, both 1-based — mirrors the
/// position type the teacher's `parsec::Position` reports in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position(pub usize, pub usize);

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Str(Vec<u8>),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Amp,
    Pipe,
    Comma,
    Semi,
    Eof,
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Lexer<'a> {
        Lexer { src: src.as_bytes(), pos: 0, line: 1, col: 1 }
    }

    fn position(&self) -> Position {
        Position(self.line, self.col)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Next token and the position it started at.
    pub fn next_token(&mut self) -> Result<(Token, Position)> {
        self.skip_ws();
        let start = self.position();
        let tok = match self.peek() {
            None => Token::Eof,
            Some(b'(') => {
                self.bump();
                Token::LParen
            }
            Some(b')') => {
                self.bump();
                Token::RParen
            }
            Some(b'[') => {
                self.bump();
                Token::LBracket
            }
            Some(b']') => {
                self.bump();
                Token::RBracket
            }
            Some(b'&') => {
                self.bump();
                Token::Amp
            }
            Some(b'|') => {
                self.bump();
                Token::Pipe
            }
            Some(b',') => {
                self.bump();
                Token::Comma
            }
            Some(b';') => {
                self.bump();
                Token::Semi
            }
            Some(b'"') => Token::Str(self.lex_string(start)?),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => Token::Ident(self.lex_ident()),
            Some(b) => {
                return err_at!(
                    ParseError,
                    msg: "unexpected character {:?} at {}",
                    b as char,
                    start
                )
            }
        };
        Ok((tok, start))
    }

    fn lex_ident(&mut self) -> String {
        let from = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.bump();
        }
        String::from_utf8_lossy(&self.src[from..self.pos]).into_owned()
    }

    /// Parse a double-quoted literal with standard backslash escapes plus
    /// `\xNN` hex-byte escapes (§4.H).
    fn lex_string(&mut self, start: Position) -> Result<Vec<u8>> {
        self.bump(); // opening quote
        let mut out = Vec::new();
        loop {
            match self.bump() {
                None => {
                    return err_at!(ParseError, msg: "unterminated string starting at {}", start)
                }
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b'0') => out.push(0),
                    Some(b'\\') => out.push(b'\\'),
                    Some(b'"') => out.push(b'"'),
                    Some(b'x') => {
                        let hi = self.hex_digit(start)?;
                        let lo = self.hex_digit(start)?;
                        out.push((hi << 4) | lo);
                    }
                    Some(other) => out.push(other),
                    None => {
                        return err_at!(
                            ParseError,
                            msg: "unterminated escape starting at {}",
                            start
                        )
                    }
                },
                Some(b) => out.push(b),
            }
        }
        Ok(out)
    }

    fn hex_digit(&mut self, start: Position) -> Result<u8> {
        match self.bump() {
            Some(b) if b.is_ascii_hexdigit() => {
                Ok((b as char).to_digit(16).unwrap() as u8)
            }
            _ => err_at!(ParseError, msg: "invalid \\x escape in string starting at {}", start),
        }
    }
}

#[cfg(test)]
#[path = "lexer_test.rs"]
mod lexer_test;

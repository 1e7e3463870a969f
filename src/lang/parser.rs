//! Recursive-descent parser for the command DSL (§4.H).
//!
//! The query grammar's textual production rules read as flat,
//! left-associative `and`/`or` lists, but the worked example (§8 S5:
//! `"cat" | "dog" & "msm" | "monk"` parses as `OR(cat, AND(dog, OR(msm,
//! monk)))`) only comes out of a grammar where `&`'s right-hand side is a
//! full `or` rather than another `and` — i.e. both operators are
//! right-recursive and `&`'s right operand can itself contain a `|`. This
//! parser follows that worked example rather than the flattened prose
//! description.

use crate::ngram::IndexKind;
use crate::query::Query;
use crate::{err_at, Result};

use super::lexer::{Lexer, Position, Token};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Select(Query),
    Index { path: String, kinds: Vec<IndexKind> },
    Reindex { dataset_id: String, kinds: Vec<IndexKind> },
    Compact { smart: bool },
    Status,
    Topology,
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: (Token, Position),
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Parser<'a>> {
        let mut lexer = Lexer::new(src);
        let cur = lexer.next_token()?;
        Ok(Parser { lexer, cur })
    }

    fn advance(&mut self) -> Result<Token> {
        let (tok, _) = std::mem::replace(&mut self.cur, (Token::Eof, Position(0, 0)));
        self.cur = self.lexer.next_token()?;
        Ok(tok)
    }

    fn expect(&mut self, want: &Token) -> Result<()> {
        if &self.cur.0 == want {
            self.advance()?;
            Ok(())
        } else {
            err_at!(
                ParseError,
                msg: "expected {:?}, found {:?} at {}",
                want,
                self.cur.0,
                self.cur.1
            )
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.advance()? {
            Token::Ident(s) => Ok(s),
            other => err_at!(ParseError, msg: "expected identifier, found {:?} at {}", other, self.cur.1),
        }
    }

    fn expect_string(&mut self) -> Result<Vec<u8>> {
        match self.advance()? {
            Token::Str(s) => Ok(s),
            other => err_at!(ParseError, msg: "expected string, found {:?} at {}", other, self.cur.1),
        }
    }

    fn parse_command(&mut self) -> Result<Command> {
        let verb = self.expect_ident()?;
        let cmd = match verb.as_str() {
            "select" => Command::Select(self.parse_or()?),
            "index" => {
                let path = String::from_utf8_lossy(&self.expect_string()?).into_owned();
                let kinds = self.parse_optional_with()?;
                Command::Index { path, kinds }
            }
            "reindex" => {
                let dataset_id = String::from_utf8_lossy(&self.expect_string()?).into_owned();
                let kinds = self.parse_optional_with()?;
                Command::Reindex { dataset_id, kinds }
            }
            "compact" => {
                let smart = if let Token::Ident(w) = &self.cur.0 {
                    if w == "smart" {
                        self.advance()?;
                        true
                    } else {
                        false
                    }
                } else {
                    false
                };
                Command::Compact { smart }
            }
            "status" => Command::Status,
            "topology" => Command::Topology,
            other => return err_at!(ParseError, msg: "unknown command {:?} at {}", other, self.cur.1),
        };
        self.expect(&Token::Semi)?;
        Ok(cmd)
    }

    /// `with [gram3, text4, ...]`, or nothing (defaulting to every kind).
    fn parse_optional_with(&mut self) -> Result<Vec<IndexKind>> {
        if let Token::Ident(w) = &self.cur.0 {
            if w == "with" {
                self.advance()?;
                self.expect(&Token::LBracket)?;
                let mut kinds = Vec::new();
                loop {
                    let name = self.expect_ident()?;
                    kinds.push(IndexKind::parse_name(&name)?);
                    if matches!(self.cur.0, Token::Comma) {
                        self.advance()?;
                        continue;
                    }
                    break;
                }
                self.expect(&Token::RBracket)?;
                return Ok(kinds);
            }
        }
        Ok(crate::ngram::ALL_KINDS.to_vec())
    }

    fn parse_or(&mut self) -> Result<Query> {
        let lhs = self.parse_and()?;
        if matches!(self.cur.0, Token::Pipe) {
            self.advance()?;
            let rhs = self.parse_or()?;
            Ok(Query::Or(vec![lhs, rhs]))
        } else {
            Ok(lhs)
        }
    }

    fn parse_and(&mut self) -> Result<Query> {
        let lhs = self.parse_primary()?;
        if matches!(self.cur.0, Token::Amp) {
            self.advance()?;
            let rhs = self.parse_or()?;
            Ok(Query::And(vec![lhs, rhs]))
        } else {
            Ok(lhs)
        }
    }

    fn parse_primary(&mut self) -> Result<Query> {
        match self.cur.0.clone() {
            Token::Str(bytes) => {
                self.advance()?;
                Ok(Query::Literal(bytes))
            }
            Token::LParen => {
                self.advance()?;
                let q = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(q)
            }
            other => err_at!(ParseError, msg: "expected string or '(', found {:?} at {}", other, self.cur.1),
        }
    }
}

/// Parse one `;`-terminated command.
pub fn parse_command(src: &str) -> Result<Command> {
    let mut parser = Parser::new(src)?;
    parser.parse_command()
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;

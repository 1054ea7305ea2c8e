use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ast::{Expr, Stmt};
use crate::ctx::Context;
use crate::diag::{FullParseError, LexError, ParseError, Position};
use crate::interner::Symbol;
use crate::scanner::Scanner;
use crate::token::Token;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParserError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Parse(FullParseError),
}

/// Recursive-descent parser with one token of lookahead.
///
/// The parser pulls tokens from the scanner one at a time; the only
/// buffered state is the current token.  There is no backtracking and no
/// resynchronization: the first error aborts the whole parse.
pub struct Parser<'s> {
    scanner: Scanner<'s>,
    current_token: Token,
    current_pos: Position,
}

impl<'s> Parser<'s> {
    /// Creates a parser over `source` and classifies the first token, so
    /// `current_token` is meaningful from the start.
    pub fn new(source: &'s str, ctx: Rc<Context>) -> Result<Parser<'s>, ParserError> {
        let mut parser = Parser {
            scanner: Scanner::new(source, ctx),
            current_token: Token::Eof,
            current_pos: 0,
        };
        parser.advance()?;
        Ok(parser)
    }

    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, ParserError> {
        let mut prg = vec![];
        loop {
            match self.current_token {
                Token::Eof => break,
                _ => prg.push(self.statement()?),
            }
        }
        debug!(statements = prg.len(), "parsed program");
        Ok(prg)
    }

    #[cfg(test)]
    fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        self.expression()
    }

    fn statement(&mut self) -> Result<Stmt, ParserError> {
        match self.current_token.clone() {
            Token::Print => {
                self.advance()?;
                let expr = Box::new(self.expression()?);
                self.consume(Token::Terminator)?;
                Ok(Stmt::Print(expr))
            }
            Token::Sprint => {
                self.advance()?;
                let expr = Box::new(self.expression()?);
                self.consume(Token::Terminator)?;
                Ok(Stmt::Sprint(expr))
            }
            Token::U8 => self.var_def(),
            Token::Test5g => {
                self.advance()?;
                self.consume(Token::Terminator)?;
                Ok(Stmt::Test5g)
            }
            Token::Cyberspaces => {
                self.advance()?;
                self.consume(Token::Terminator)?;
                Ok(Stmt::Cyberspaces)
            }
            Token::Terminator => {
                self.advance()?;
                Ok(Stmt::Nop)
            }
            Token::Identifier(sym) => {
                self.advance()?;
                self.ident_statement(sym)
            }
            Token::OpenBracket | Token::Number(_) | Token::OpenParen => {
                let expr = Box::new(self.expression()?);
                self.consume(Token::Terminator)?;
                Ok(Stmt::Expr(expr))
            }
            _ => Err(self.error(ParseError::BadStatement)),
        }
    }

    /// Parse variable definition or declaration.
    /// Current token is Token::U8.
    fn var_def(&mut self) -> Result<Stmt, ParserError> {
        self.advance()?;
        let name = self.identifier()?;
        let init = match self.current_token {
            Token::Equal => {
                self.advance()?;
                self.expression()?
            }
            // Bare declaration binds an empty set.
            _ => Expr::Set(vec![]),
        };
        self.consume(Token::Terminator)?;
        Ok(Stmt::VarDef(name, Box::new(init)))
    }

    /// Parse the remainder of a statement that started with an identifier:
    /// assignment, increment, or an expression statement whose leftmost
    /// primary is the variable.
    fn ident_statement(&mut self, sym: Symbol) -> Result<Stmt, ParserError> {
        match self.current_token {
            Token::Equal => {
                self.advance()?;
                let rhs = Box::new(self.expression()?);
                self.consume(Token::Terminator)?;
                Ok(Stmt::VarAssign(sym, rhs))
            }
            Token::PlusPlus => {
                self.advance()?;
                self.consume(Token::Terminator)?;
                Ok(Stmt::VarIncrement(sym))
            }
            _ => {
                let expr = Box::new(self.expression_tail(Expr::Var(sym))?);
                self.consume(Token::Terminator)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn identifier(&mut self) -> Result<Symbol, ParserError> {
        if let Token::Identifier(sym) = self.current_token.clone() {
            self.advance()?;
            Ok(sym)
        } else {
            Err(self.error(ParseError::ExpectedIdentifier))
        }
    }

    fn expression(&mut self) -> Result<Expr, ParserError> {
        let primary = self.primary()?;
        self.expression_tail(primary)
    }

    /// Parse the rest of an expression whose leftmost primary is already
    /// known.
    fn expression_tail(&mut self, primary: Expr) -> Result<Expr, ParserError> {
        let lhs = self.postfix_tail(primary)?;
        let lhs = self.term_tail(lhs)?;
        self.join_tail(lhs)
    }

    /// Left-associative `|` tail, the lowest-precedence operator:
    /// concatenation of two sets.
    fn join_tail(&mut self, mut expr: Expr) -> Result<Expr, ParserError> {
        while self.current_token == Token::Bar {
            self.advance()?;
            let rhs = self.postfix()?;
            let rhs = self.term_tail(rhs)?;
            expr = Expr::Join(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// Left-associative `+` / `-` tail.
    fn term_tail(&mut self, mut expr: Expr) -> Result<Expr, ParserError> {
        loop {
            match self.current_token {
                Token::Plus => {
                    self.advance()?;
                    expr = Expr::Add(Box::new(expr), Box::new(self.postfix()?));
                }
                Token::Minus => {
                    self.advance()?;
                    expr = Expr::Sub(Box::new(expr), Box::new(self.postfix()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn postfix(&mut self) -> Result<Expr, ParserError> {
        let primary = self.primary()?;
        self.postfix_tail(primary)
    }

    /// Indexing and indexed-assignment tail: `expr [ index ]` and
    /// `name [ index ] = value`.
    fn postfix_tail(&mut self, mut expr: Expr) -> Result<Expr, ParserError> {
        while self.current_token == Token::OpenBracket {
            self.advance()?;
            let index = self.expression()?;
            self.consume(Token::CloseBracket)?;
            if self.current_token == Token::Equal {
                self.advance()?;
                let value = self.expression()?;
                return if let Expr::Var(sym) = expr {
                    Ok(Expr::IndexAssign(
                        sym,
                        Box::new(index),
                        Box::new(value),
                    ))
                } else {
                    Err(self.error(ParseError::ExpectedLvalue))
                };
            }
            expr = Expr::Index(Box::new(expr), Box::new(index));
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParserError> {
        match self.current_token.clone() {
            Token::OpenBracket => self.bracket_set(),
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Identifier(sym) => {
                self.advance()?;
                Ok(Expr::Var(sym))
            }
            Token::OpenParen => {
                self.advance()?;
                let expr = self.expression()?;
                self.consume(Token::CloseParen)?;
                Ok(Expr::Group(Box::new(expr)))
            }
            _ => Err(self.error(ParseError::BadStatement)),
        }
    }

    /// Parse a bracketed set literal.
    /// Current token is Token::OpenBracket.
    ///
    /// Numbers and bars may come in any order; the literal is just the
    /// number sequence.
    fn bracket_set(&mut self) -> Result<Expr, ParserError> {
        self.advance()?;
        let mut values = vec![];
        loop {
            match self.current_token {
                Token::CloseBracket => {
                    self.advance()?;
                    break;
                }
                Token::Number(n) => {
                    values.push(n);
                    self.advance()?;
                }
                Token::Bar => {
                    self.advance()?;
                }
                _ => return Err(self.error(ParseError::BadStatement)),
            }
        }
        Ok(Expr::Set(values))
    }

    fn advance(&mut self) -> Result<&Token, ParserError> {
        let (pos, token) = self.scanner.get_token()?;
        self.current_token = token;
        self.current_pos = pos;
        Ok(&self.current_token)
    }

    fn consume(&mut self, expected: Token) -> Result<(), ParserError> {
        if self.current_token == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(self.error(ParseError::UnexpectedToken(
                self.current_token.to_string(),
                expected.to_string(),
            )))
        }
    }

    fn error(&self, error: ParseError) -> ParserError {
        ParserError::Parse(FullParseError {
            pos: self.current_pos,
            error,
        })
    }
}

//! Lexical analyzer

use std::iter::Peekable;
use std::rc::Rc;
use std::str::CharIndices;

use crate::ctx::Context;
use crate::diag::{LexError, Position};
use crate::token::Token;

/// Turn a source string into a sequence of tokens.
///
/// Forward-only cursor: each call to [`Scanner::get_token`] consumes one
/// token and returns it together with the byte offset of its first code
/// point.  After the end of input it keeps returning [`Token::Eof`].
pub struct Scanner<'s> {
    input: Peekable<CharIndices<'s>>,
    eof: Position,
    ctx: Rc<Context>,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &'s str, ctx: Rc<Context>) -> Scanner<'s> {
        Scanner {
            input: source.char_indices().peekable(),
            eof: source.len(),
            ctx,
            buf: String::new(),
        }
    }

    /// Scan next token and return it with its starting byte offset.
    pub fn get_token(&mut self) -> Result<(Position, Token), LexError> {
        loop {
            let (pos, ch) = match self.input.next() {
                None => return Ok((self.eof, Token::Eof)),
                Some(x) => x,
            };
            let token = match ch {
                c if is_whitespace(c) || is_line_terminator(c) => continue,
                '[' => Token::OpenBracket,
                ']' => Token::CloseBracket,
                '{' => Token::OpenBrace,
                '}' => Token::CloseBrace,
                '(' => Token::OpenParen,
                ')' => Token::CloseParen,
                ',' => Token::Comma,
                ';' | ':' => Token::Terminator,
                '|' => Token::Bar,
                '-' => Token::Minus,
                '<' => Token::Less,
                '=' => Token::Equal,
                '+' => {
                    if let Some((_, '+')) = self.input.peek() {
                        self.input.next();
                        Token::PlusPlus
                    } else {
                        Token::Plus
                    }
                }
                '0'..='9' => self.scan_number(pos, ch)?,
                c if is_identifier_start(c) => self.scan_identifier(c),
                c => return Err(LexError::BadChar(c, pos)),
            };
            return Ok((pos, token));
        }
    }

    fn scan_number(&mut self, pos: Position, first_digit: char) -> Result<Token, LexError> {
        // A redundant leading zero ("00...") is malformed.
        if first_digit == '0' {
            if let Some((_, '0')) = self.input.peek() {
                return Err(LexError::BadNumber(pos));
            }
        }

        self.buf.clear();
        self.buf.push(first_digit);
        while let Some((_, c)) = self.input.peek() {
            if c.is_ascii_digit() {
                self.buf.push(*c);
                self.input.next();
            } else {
                break;
            }
        }

        // Known limitation: literals wider than i64 are clamped by the
        // decode step.
        let n = self.buf.parse::<i64>().unwrap_or(i64::MAX);
        Ok(Token::Number(n))
    }

    fn scan_identifier(&mut self, first_char: char) -> Token {
        self.buf.clear();
        self.buf.push(first_char);
        // Greedy scan: everything up to the next whitespace belongs to the
        // identifier, punctuation included.
        while let Some((_, c)) = self.input.peek() {
            if is_whitespace(*c) || is_line_terminator(*c) {
                break;
            }
            self.buf.push(*c);
            self.input.next();
        }

        let sym = self.ctx.symbol(&self.buf);
        if let Some(token) = self.ctx.keyword(&sym) {
            token
        } else {
            Token::Identifier(sym)
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok((_, Token::Eof)) => None,
            Ok((_, t)) => Some(Ok(t)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Insignificant whitespace, as the upstream language defines it.
fn is_whitespace(code_point: char) -> bool {
    matches!(
        code_point,
        '\u{0009}' // character tabulation
        | '\u{000B}' // line tabulation
        | '\u{000C}' // form feed
        | '\u{0020}' // space
        | '\u{00A0}' // no-break space
    )
}

fn is_line_terminator(code_point: char) -> bool {
    matches!(code_point, '\r' | '\n' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_start(code_point: char) -> bool {
    code_point.is_ascii_alphabetic() || code_point == '_' || code_point == '$'
}

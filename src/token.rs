use std::fmt;

use crate::interner::Symbol;

/// "Words" produced by `Scanner`.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Punctuation
    Bar,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    /// Statement terminator.  Both `;` and `:` lex to this token.
    Terminator,
    Minus,
    Plus,
    PlusPlus,
    Less,
    Equal,

    // Keywords
    Print,
    Sprint,
    U8,
    Test5g,
    Cyberspaces,

    Identifier(Symbol),
    Number(i64),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "EOF"),
            Token::Bar => write!(f, "|"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::OpenBracket => write!(f, "["),
            Token::CloseBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Terminator => write!(f, ";"),
            Token::Minus => write!(f, "-"),
            Token::Plus => write!(f, "+"),
            Token::PlusPlus => write!(f, "++"),
            Token::Less => write!(f, "<"),
            Token::Equal => write!(f, "="),
            Token::Print => write!(f, "print"),
            Token::Sprint => write!(f, "sprint"),
            Token::U8 => write!(f, "u8"),
            Token::Test5g => write!(f, "test5g"),
            Token::Cyberspaces => write!(f, "cyberspaces"),
            Token::Identifier(sym) => write!(f, "{}", sym),
            Token::Number(n) => write!(f, "{}", n),
        }
    }
}

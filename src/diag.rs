//! Error kinds shared by the scanner and the parser.

use thiserror::Error;

/// Byte offset from the start of the source text.
pub type Position = usize;

/// Lexical error: the character stream cannot be tokenized.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{0}' at byte {1}")]
    BadChar(char, Position),

    /// Number literal starting with a redundant `00`.
    #[error("malformed number literal at byte {0}")]
    BadNumber(Position),
}

/// A syntax error together with the byte offset of the offending token.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("parse error at byte {pos}: {error}")]
pub struct FullParseError {
    pub pos: Position,
    pub error: ParseError,
}

/// Token sequence does not match any grammar production.
///
/// All variants are fatal to the current parse; there is no
/// resynchronization.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("token does not start a statement or expression")]
    BadStatement,

    #[error("unexpected token '{0}', expected '{1}'")]
    UnexpectedToken(String, String),

    #[error("expected identifier")]
    ExpectedIdentifier,

    #[error("indexed assignment target must be a variable")]
    ExpectedLvalue,
}

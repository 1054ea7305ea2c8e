//! An interpreter for helang, Saint He's cyber programming language.
//!
//! The pipeline is a scanner feeding a recursive-descent parser one token
//! at a time, and a tree-walk evaluator running the resulting statements
//! against a single flat environment.  The only value type is the
//! [`value::U8`], an ordered sequence of integers.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail
//!   out on the first encountered error.
//! - Identifier scanning is greedy (it stops only at whitespace), so
//!   punctuation after an identifier must be separated from it by a space.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod interpreter;
pub mod value;

mod ast;
mod ctx;
mod diag;
mod eval;
mod interner;
mod parser;
mod scanner;
mod token;

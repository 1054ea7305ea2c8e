//! API to control the interpreter.

use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ctx::Context;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::{Parser, ParserError};

/// Tree-walk interpreter for the cyber language.
///
/// One interpreter owns one environment, so bindings persist across `eval`
/// calls:
///
/// ```
/// # use helang::interpreter::{Interpreter, HelangError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.eval("u8 whichKey = [1 | 2 | 3] ;")?;
/// interp.eval("whichKey [0] = 0 ;")?;
/// interp.eval("print whichKey ;")?;
///
/// assert_eq!(output, b"0 | 0 | 0\n");
/// # Ok::<(), HelangError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    ctx: Rc<Context>,
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
///
/// Both kinds are fatal to the run that raised them; the caller decides
/// whether to report and continue with fresh input or to abort.
#[derive(Debug, Error)]
pub enum HelangError {
    /// Error occurring during lexical or syntactic analysis.
    #[error("{0}")]
    Parse(#[from] ParserError),

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl<W: Write> Interpreter<'_, W> {
    pub fn new(output: &mut W) -> Interpreter<'_, W> {
        Interpreter {
            ctx: Context::new(),
            evaluator: Evaluator::new(output),
        }
    }

    /// Parses and evaluates `source` against the interpreter's
    /// environment.
    pub fn eval(&mut self, source: &str) -> Result<(), HelangError> {
        let mut parser = Parser::new(source, self.ctx.clone())?;
        let prg = parser.parse_program()?;
        debug!(statements = prg.len(), "evaluating program");
        self.evaluator.eval_stmts(&prg)?;
        Ok(())
    }
}

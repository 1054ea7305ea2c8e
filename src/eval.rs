use std::collections::HashMap;
use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::trace;

use crate::ast::{Expr, Stmt};
use crate::interner::Symbol;
use crate::value::U8;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown variable: {0}")]
    UnknownVar(String),

    #[error("operands have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("index {0} is out of range for a value of length {1}")]
    BadIndex(i64, usize),

    #[error("{0} is not a Unicode code point")]
    BadCodePoint(i64),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Walks the AST, writing program output to `output`.
///
/// The evaluator owns the one environment shared by every statement of the
/// run; bindings made by earlier statements are visible to later ones.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    env: Env,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a mut W) -> Evaluator<'a, W> {
        Evaluator {
            output,
            env: Env::new(),
        }
    }

    pub fn eval_stmts(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    /// Evaluates one statement.  Every statement yields a U8; the caller
    /// discards it at top level, but print-like statements pass their
    /// operand through so they compose as expressions.
    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<U8, RuntimeError> {
        trace!(?stmt, "evaluating statement");
        match stmt {
            Stmt::Nop => Ok(U8::new()),
            Stmt::Expr(e) => self.eval_expr(e),
            Stmt::Print(e) => {
                let val = self.eval_expr(e)?;
                writeln!(self.output, "{}", val)?;
                Ok(val)
            }
            Stmt::Sprint(e) => {
                let val = self.eval_expr(e)?;
                let text = decode_code_points(&val)?;
                writeln!(self.output, "{}", text)?;
                Ok(val)
            }
            Stmt::VarDef(sym, init) => {
                let val = self.eval_expr(init)?;
                self.env.define(sym, val);
                Ok(U8::new())
            }
            Stmt::VarAssign(sym, e) => {
                let val = self.eval_expr(e)?;
                self.env.assign(sym, val.clone())?;
                Ok(val)
            }
            Stmt::VarIncrement(sym) => {
                let binding = self.env.get_mut(sym)?;
                binding.increment();
                Ok(binding.clone())
            }
            Stmt::Test5g => {
                writeln!(self.output, "5g test: speed is faster than fast.")?;
                Ok(U8::new())
            }
            Stmt::Cyberspaces => {
                writeln!(self.output, "cyberspaces: connected.")?;
                Ok(U8::new())
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<U8, RuntimeError> {
        match expr {
            Expr::Set(values) => Ok(U8::from_values(values.clone())),
            Expr::Number(n) => Ok(U8::singleton(*n)),
            Expr::Var(sym) => Ok(self.env.get(sym)?.clone()),
            Expr::Add(lhs, rhs) => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                elementwise(&l, &r, i64::wrapping_add)
            }
            Expr::Sub(lhs, rhs) => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                elementwise(&l, &r, i64::wrapping_sub)
            }
            Expr::Join(lhs, rhs) => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                let mut values = l.values().to_vec();
                values.extend_from_slice(r.values());
                Ok(U8::from_values(values))
            }
            Expr::Index(base, index) => {
                let base = self.eval_expr(base)?;
                let index = self.eval_expr(index)?;
                let mut selected = vec![];
                for &pos in index.values() {
                    match select(&base, pos)? {
                        Selection::All => selected.extend_from_slice(base.values()),
                        Selection::One(i) => selected.push(base.values()[i]),
                    }
                }
                Ok(U8::from_values(selected))
            }
            Expr::IndexAssign(sym, index, value) => {
                let index = self.eval_expr(index)?;
                let val = self.eval_expr(value)?;
                if val.len() != 1 {
                    return Err(RuntimeError::LengthMismatch(1, val.len()));
                }
                let stored = val.values()[0];
                let binding = self.env.get_mut(sym)?;
                for &pos in index.values() {
                    match select(binding, pos)? {
                        Selection::All => {
                            for v in binding.values_mut() {
                                *v = stored;
                            }
                        }
                        Selection::One(i) => binding.values_mut()[i] = stored,
                    }
                }
                Ok(val)
            }
            Expr::Group(e) => self.eval_expr(e),
        }
    }
}

enum Selection {
    All,
    One(usize),
}

/// Resolves a cyber index against `base`: positions are one-based and
/// position 0 means every element.
fn select(base: &U8, pos: i64) -> Result<Selection, RuntimeError> {
    if pos == 0 {
        return Ok(Selection::All);
    }
    let i = pos
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok())
        .ok_or(RuntimeError::BadIndex(pos, base.len()))?;
    if i < base.len() {
        Ok(Selection::One(i))
    } else {
        Err(RuntimeError::BadIndex(pos, base.len()))
    }
}

fn elementwise(l: &U8, r: &U8, op: fn(i64, i64) -> i64) -> Result<U8, RuntimeError> {
    // A one-element operand broadcasts across the other.
    let values = if l.len() == r.len() {
        l.values()
            .iter()
            .zip(r.values())
            .map(|(&a, &b)| op(a, b))
            .collect()
    } else if r.len() == 1 {
        let b = r.values()[0];
        l.values().iter().map(|&a| op(a, b)).collect()
    } else if l.len() == 1 {
        let a = l.values()[0];
        r.values().iter().map(|&b| op(a, b)).collect()
    } else {
        return Err(RuntimeError::LengthMismatch(l.len(), r.len()));
    };
    Ok(U8::from_values(values))
}

fn decode_code_points(val: &U8) -> Result<String, RuntimeError> {
    val.values()
        .iter()
        .map(|&n| {
            u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .ok_or(RuntimeError::BadCodePoint(n))
        })
        .collect()
}

/// The name-to-value binding table.
///
/// One flat table per run; the language has no nested scopes.
#[derive(Debug, Default)]
struct Env {
    bindings: HashMap<Symbol, U8>,
}

impl Env {
    fn new() -> Env {
        Env::default()
    }

    /// Binds `sym`, overwriting any prior binding.
    fn define(&mut self, sym: &Symbol, val: U8) {
        self.bindings.insert(sym.clone(), val);
    }

    /// Rebinds an existing variable.
    fn assign(&mut self, sym: &Symbol, val: U8) -> Result<(), RuntimeError> {
        match self.bindings.get_mut(sym) {
            Some(slot) => {
                *slot = val;
                Ok(())
            }
            None => Err(RuntimeError::UnknownVar(sym.name().to_owned())),
        }
    }

    fn get(&self, sym: &Symbol) -> Result<&U8, RuntimeError> {
        self.bindings
            .get(sym)
            .ok_or_else(|| RuntimeError::UnknownVar(sym.name().to_owned()))
    }

    fn get_mut(&mut self, sym: &Symbol) -> Result<&mut U8, RuntimeError> {
        self.bindings
            .get_mut(sym)
            .ok_or_else(|| RuntimeError::UnknownVar(sym.name().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ctx::Context;

    fn eval_expr(expr: &Expr) -> Result<U8, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut evaluator = Evaluator::new(&mut out);
        let val = evaluator.eval_expr(expr)?;
        assert!(out.is_empty());
        Ok(val)
    }

    fn eval_prg(prg: &[Stmt]) -> Result<String, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut evaluator = Evaluator::new(&mut out);
        evaluator.eval_stmts(prg)?;
        Ok(String::from_utf8(out).expect("output is not UTF-8"))
    }

    #[test]
    fn set_literal() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Set(vec![1, 2, 3]))?,
            U8::from_values(vec![1, 2, 3])
        );
        Ok(())
    }

    #[test]
    fn empty_set_literal() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Set(vec![]))?, U8::new());
        Ok(())
    }

    #[test]
    fn number_is_a_singleton() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Number(42))?, U8::singleton(42));
        Ok(())
    }

    #[test]
    fn elementwise_addition() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(
                Box::new(Expr::Set(vec![1, 2])),
                Box::new(Expr::Set(vec![10, 20]))
            ))?,
            U8::from_values(vec![11, 22])
        );
        Ok(())
    }

    #[test]
    fn scalar_broadcast() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(
                Box::new(Expr::Set(vec![1, 2])),
                Box::new(Expr::Number(1))
            ))?,
            U8::from_values(vec![2, 3])
        );
        assert_eq!(
            eval_expr(&Expr::Sub(
                Box::new(Expr::Number(10)),
                Box::new(Expr::Set(vec![1, 2]))
            ))?,
            U8::from_values(vec![9, 8])
        );
        Ok(())
    }

    #[test]
    fn length_mismatch() {
        match eval_expr(&Expr::Add(
            Box::new(Expr::Set(vec![1, 2])),
            Box::new(Expr::Set(vec![1, 2, 3])),
        )) {
            Err(RuntimeError::LengthMismatch(2, 3)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn join_concatenates() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Join(
                Box::new(Expr::Set(vec![1, 2])),
                Box::new(Expr::Number(3))
            ))?,
            U8::from_values(vec![1, 2, 3])
        );
        Ok(())
    }

    #[test]
    fn index_is_one_based() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Index(
                Box::new(Expr::Set(vec![10, 20, 30])),
                Box::new(Expr::Number(2))
            ))?,
            U8::singleton(20)
        );
        Ok(())
    }

    #[test]
    fn index_zero_selects_everything() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Index(
                Box::new(Expr::Set(vec![10, 20, 30])),
                Box::new(Expr::Number(0))
            ))?,
            U8::from_values(vec![10, 20, 30])
        );
        Ok(())
    }

    #[test]
    fn index_set_selects_several() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Index(
                Box::new(Expr::Set(vec![10, 20, 30])),
                Box::new(Expr::Set(vec![1, 3]))
            ))?,
            U8::from_values(vec![10, 30])
        );
        Ok(())
    }

    #[test]
    fn index_out_of_range() {
        match eval_expr(&Expr::Index(
            Box::new(Expr::Set(vec![10, 20])),
            Box::new(Expr::Number(3)),
        )) {
            Err(RuntimeError::BadIndex(3, 2)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
        match eval_expr(&Expr::Index(
            Box::new(Expr::Set(vec![10, 20])),
            Box::new(Expr::Number(-1)),
        )) {
            Err(RuntimeError::BadIndex(-1, 2)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn index_at_negative_extreme() {
        match eval_expr(&Expr::Index(
            Box::new(Expr::Set(vec![10, 20])),
            Box::new(Expr::Number(i64::MIN)),
        )) {
            Err(RuntimeError::BadIndex(i64::MIN, 2)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn print_stmt() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg(&[Stmt::Print(Box::new(Expr::Set(vec![1, 2, 3])))])?,
            "1 | 2 | 3\n"
        );
        Ok(())
    }

    #[test]
    fn print_of_empty_set_is_a_blank_line() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg(&[Stmt::Print(Box::new(Expr::Set(vec![])))])?, "\n");
        Ok(())
    }

    #[test]
    fn sprint_decodes_code_points() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg(&[Stmt::Sprint(Box::new(Expr::Set(vec![72, 105])))])?,
            "Hi\n"
        );
        Ok(())
    }

    #[test]
    fn sprint_rejects_bad_code_point() {
        match eval_prg(&[Stmt::Sprint(Box::new(Expr::Set(vec![-1])))]) {
            Err(RuntimeError::BadCodePoint(-1)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn set_and_print_var() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg(&[
                Stmt::VarDef(ctx.symbol("a"), Box::new(Expr::Set(vec![1, 2]))),
                Stmt::Print(Box::new(Expr::Var(ctx.symbol("a")))),
            ])?,
            "1 | 2\n"
        );
        Ok(())
    }

    #[test]
    fn var_def_overwrites() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg(&[
                Stmt::VarDef(ctx.symbol("a"), Box::new(Expr::Set(vec![1]))),
                Stmt::VarDef(ctx.symbol("a"), Box::new(Expr::Set(vec![2]))),
                Stmt::Print(Box::new(Expr::Var(ctx.symbol("a")))),
            ])?,
            "2\n"
        );
        Ok(())
    }

    #[test]
    fn assign_unknown_var() {
        let ctx = Context::new();
        match eval_prg(&[Stmt::VarAssign(
            ctx.symbol("ghost"),
            Box::new(Expr::Set(vec![1])),
        )]) {
            Err(RuntimeError::UnknownVar(name)) if name == "ghost" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn read_unknown_var() {
        let ctx = Context::new();
        match eval_prg(&[Stmt::Print(Box::new(Expr::Var(ctx.symbol("ghost"))))]) {
            Err(RuntimeError::UnknownVar(name)) if name == "ghost" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn increment_var() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg(&[
                Stmt::VarDef(ctx.symbol("a"), Box::new(Expr::Set(vec![1, 2]))),
                Stmt::VarIncrement(ctx.symbol("a")),
                Stmt::Print(Box::new(Expr::Var(ctx.symbol("a")))),
            ])?,
            "2 | 3\n"
        );
        Ok(())
    }

    #[test]
    fn indexed_assignment_to_all_positions() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg(&[
                Stmt::VarDef(ctx.symbol("k"), Box::new(Expr::Set(vec![1, 2, 3]))),
                Stmt::Expr(Box::new(Expr::IndexAssign(
                    ctx.symbol("k"),
                    Box::new(Expr::Number(0)),
                    Box::new(Expr::Number(0)),
                ))),
                Stmt::Print(Box::new(Expr::Var(ctx.symbol("k")))),
            ])?,
            "0 | 0 | 0\n"
        );
        Ok(())
    }

    #[test]
    fn indexed_assignment_to_one_position() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg(&[
                Stmt::VarDef(ctx.symbol("k"), Box::new(Expr::Set(vec![1, 2, 3]))),
                Stmt::Expr(Box::new(Expr::IndexAssign(
                    ctx.symbol("k"),
                    Box::new(Expr::Number(2)),
                    Box::new(Expr::Number(9)),
                ))),
                Stmt::Print(Box::new(Expr::Var(ctx.symbol("k")))),
            ])?,
            "1 | 9 | 3\n"
        );
        Ok(())
    }

    #[test]
    fn indexed_assignment_needs_scalar_value() {
        let ctx = Context::new();
        match eval_prg(&[
            Stmt::VarDef(ctx.symbol("k"), Box::new(Expr::Set(vec![1, 2]))),
            Stmt::Expr(Box::new(Expr::IndexAssign(
                ctx.symbol("k"),
                Box::new(Expr::Number(1)),
                Box::new(Expr::Set(vec![1, 2])),
            ))),
        ]) {
            Err(RuntimeError::LengthMismatch(1, 2)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn test5g_prints_fixed_line() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg(&[Stmt::Test5g])?, "5g test: speed is faster than fast.\n");
        Ok(())
    }

    #[test]
    fn cyberspaces_prints_fixed_line() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg(&[Stmt::Cyberspaces])?, "cyberspaces: connected.\n");
        Ok(())
    }
}

use crate::interner::Symbol;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Nop,
    Expr(Box<Expr>),
    Print(Box<Expr>),
    Sprint(Box<Expr>),
    /// `u8 name = expr ;`.  A bare `u8 name ;` declaration carries an
    /// empty set literal as its initializer.
    VarDef(Symbol, Box<Expr>),
    VarAssign(Symbol, Box<Expr>),
    VarIncrement(Symbol),
    Test5g,
    Cyberspaces,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    /// Bracketed set literal, `[1 | 2 | 3]`.
    Set(Vec<i64>),
    /// Bare number literal: a one-element set.
    Number(i64),
    Var(Symbol),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    /// `a | b` outside a set literal: sequence concatenation.
    Join(Box<Expr>, Box<Expr>),
    /// `base [ index ]`: one-based selection; index 0 selects everything.
    Index(Box<Expr>, Box<Expr>),
    /// `name [ index ] = value`: in-place element store.
    IndexAssign(Symbol, Box<Expr>, Box<Expr>),
    Group(Box<Expr>),
}

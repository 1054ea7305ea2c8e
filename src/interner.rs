//! String interner for identifiers.
//!
//! Identifiers recur constantly (every variable reference repeats its
//! name), so they are interned once and handed around as cheap `Symbol`
//! handles compared by pointer.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// Stores all interned strings.
#[derive(Debug)]
pub struct Interner(HashSet<Symbol>);

impl Interner {
    pub fn new() -> Interner {
        Interner(HashSet::new())
    }

    /// Returns the symbol for `name`, interning it first if unknown.
    pub fn symbol(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.0.get(name) {
            sym.clone()
        } else {
            let sym = Symbol(Rc::new(name.to_string()));
            self.0.insert(sym.clone());
            sym
        }
    }
}

/// An interned, immutable string.
///
/// Two symbols produced by the same interner are equal exactly when their
/// names are equal, so comparison is by address rather than by content.
#[derive(Debug, Hash, Clone)]
pub struct Symbol(Rc<String>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ptr() == other.0.as_ptr()
    }
}

impl Eq for Symbol {}

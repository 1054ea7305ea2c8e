use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interner::{Interner, Symbol};
use crate::token::Token;

/// Shared read-mostly state: the string interner and the keyword table.
///
/// The keyword table is built once here and handed by reference into the
/// scanner, so there is no ambient global state and lookup stays O(1).
#[derive(Debug)]
pub struct Context {
    interner: RefCell<Interner>,
    keywords: HashMap<Symbol, Token>,
}

impl Context {
    /// Creates a new context.
    ///
    /// Returns an `Rc` because the context is shared between the scanner,
    /// the parser, and the evaluator of one interpreter.
    pub fn new() -> Rc<Self> {
        let mut interner = Interner::new();

        let mut keywords = HashMap::new();
        for (name, token) in KEYWORDS.iter().cloned() {
            keywords.insert(interner.symbol(name), token);
        }

        Rc::new(Context {
            interner: RefCell::new(interner),
            keywords,
        })
    }

    /// Interns `name` if needed and returns its symbol.
    pub fn symbol(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().symbol(name)
    }

    /// Returns the token for `sym` if it is a reserved word.
    pub fn keyword(&self, sym: &Symbol) -> Option<Token> {
        self.keywords.get(sym).cloned()
    }
}

const KEYWORDS: [(&str, Token); 5] = [
    ("print", Token::Print),
    ("sprint", Token::Sprint),
    ("u8", Token::U8),
    ("test5g", Token::Test5g),
    ("cyberspaces", Token::Cyberspaces),
];

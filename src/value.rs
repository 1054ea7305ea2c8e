//! The Saint He composite value type.

use std::fmt;

/// An ordered sequence of integers, the only value type in the language.
///
/// Despite the name, a `U8` has nothing to do with a fixed-width unsigned
/// integer: it is the cyber equivalent of an array.  Its length is fixed
/// once constructed; `increment` mutates elements in place but never the
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct U8 {
    values: Vec<i64>,
}

impl U8 {
    /// Creates an empty value (zero-length sequence).
    pub fn new() -> U8 {
        U8 { values: vec![] }
    }

    /// Creates a value holding exactly the given elements.
    pub fn from_values(values: Vec<i64>) -> U8 {
        U8 { values }
    }

    /// Creates a one-element value.
    pub fn singleton(value: i64) -> U8 {
        U8 {
            values: vec![value],
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [i64] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adds one to every element in place.  Wraps on overflow.
    pub fn increment(&mut self) {
        for v in &mut self.values {
            *v = v.wrapping_add(1);
        }
    }
}

impl From<Vec<i64>> for U8 {
    fn from(values: Vec<i64>) -> U8 {
        U8 { values }
    }
}

impl fmt::Display for U8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.values {
            if first {
                first = false;
            } else {
                write!(f, " | ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

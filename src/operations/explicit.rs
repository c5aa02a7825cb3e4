//! Operations defined by their full value table.

use crate::combinatorics::{lex_index, power};
use crate::error::{Error, Result};

/// An operation stored as the vector of its outputs, indexed by input
/// tuple in lexicographic order. The default representation every
/// generic construction falls back to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitOperation {
    arity: usize,
    dom: usize,
    table: Vec<usize>,
}

impl ExplicitOperation {
    /// Wrap a value table. The table must have `dom^arity` entries,
    /// each smaller than `dom`.
    pub fn new(arity: usize, dom: usize, table: Vec<usize>) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        let expected = power(dom, arity);
        if table.len() != expected {
            return Err(Error::Invalid(format!(
                "value table of length {} where {dom}^{arity} = {expected} entries were expected",
                table.len()
            )));
        }
        for &v in &table {
            if v >= dom {
                return Err(Error::Domain { value: v, dom });
            }
        }
        Ok(Self { arity, dom, table })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    /// The value table in lexicographic input order.
    pub fn table(&self) -> &[usize] {
        &self.table
    }

    #[inline]
    pub(crate) fn eval_unchecked(&self, x: &[usize]) -> usize {
        self.table[lex_index(x, self.dom)]
    }
}

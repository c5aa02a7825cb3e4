//! Error taxonomy of the crate.
//!
//! `Arity`, `Domain` and `Composition` are local precondition
//! violations raised synchronously by operation and cost-function
//! methods; they are never retried. Solver infeasibility is *not* an
//! error (it drives the primal/dual branching in membership tests) and
//! does not appear here; failures of the external solver processes do,
//! wrapped in [`Error::Solver`].

use crate::solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An input tuple or operand list whose length does not match the
    /// declared arity.
    #[error("got {got} arguments where arity {expected} was expected")]
    Arity { got: usize, expected: usize },

    /// A value outside `[0, dom)`, or a restriction target that the
    /// operation does not preserve.
    #[error("value {value} outside domain of size {dom}")]
    Domain { value: usize, dom: usize },

    /// Operands being composed disagree on their own arity.
    #[error("composed operands have mismatched arities {arities:?}")]
    Composition { arities: Vec<usize> },

    /// A constructor was given arguments that cannot form a valid
    /// value (empty clone, malformed Sperner family, table of the
    /// wrong size, ...).
    #[error("invalid construction: {0}")]
    Invalid(String),

    /// `in_wclone` requires every supported operation of the candidate
    /// to be a member of the supporting clone.
    #[error("candidate support is not contained in the supporting clone")]
    SupportNotInClone,

    /// Both the primal and the dual membership programs reported
    /// infeasible. By LP duality exactly one must be feasible, so this
    /// indicates a defective or numerically failing solver.
    #[error("primal and dual membership programs both infeasible")]
    Duality,

    /// A failure of an external solver process.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that `x` is a valid input tuple for an operation of the
    /// given arity and domain.
    pub(crate) fn check_input(x: &[usize], arity: usize, dom: usize) -> Result<()> {
        if x.len() != arity {
            return Err(Error::Arity {
                got: x.len(),
                expected: arity,
            });
        }
        for &v in x {
            if v >= dom {
                return Err(Error::Domain { value: v, dom });
            }
        }
        Ok(())
    }
}

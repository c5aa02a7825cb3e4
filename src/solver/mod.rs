//! Interfaces to the two external numeric collaborators.
//!
//! The crate never implements polyhedral conversion or linear
//! programming itself; it builds systems, hands them to a
//! [`ConeSolver`] or [`LpSolver`], and decodes what comes back.
//! Everything at this boundary is `f64`: the pure layer converts its
//! exact rational rows on the way in, and rounds every returned
//! coordinate to `dom` decimal digits on the way out (see
//! [`round_to_digits`]) — the rounding is part of the crate's
//! semantics, not cosmetics, and is the agreed way to neutralise
//! solver floating-point noise.
//!
//! Conventions:
//! - an inequality row `[b, a_1, …, a_n]` states `b + Σ a_i·x_i ≥ 0`
//!   (the polyhedral H-representation convention);
//! - a generator row holds the coordinates of one ray of a cone
//!   through the origin.

mod cdd;
mod lp;

pub use cdd::CddSolver;
pub use lp::LpSolveAdapter;

use ndarray::{Array2, ArrayView1, Axis};
use num::rational::Rational64;
use std::io;
use thiserror::Error;

/// Failures of the external solver processes. Infeasibility of a
/// linear program is *not* an error (see [`LpSolution`]).
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("error while parsing solver output: {0}")]
    Parse(String),
    #[error("solver {program} exited with status {status}")]
    Failed { program: String, status: i32 },
}

/// A system of linear inequalities `b + Σ a_i·x_i ≥ 0`, one row
/// `[b, a_1, …, a_n]` each.
#[derive(Clone, Debug, PartialEq)]
pub struct IneqSystem {
    matrix: Array2<f64>,
}

impl IneqSystem {
    /// An empty system over `vars` variables.
    pub fn new(vars: usize) -> Self {
        Self {
            matrix: Array2::zeros((0, vars + 1)),
        }
    }

    /// Build from rows of width `vars + 1` (bias first).
    pub fn from_rows(vars: usize, rows: &[Vec<f64>]) -> Self {
        let mut system = Self::new(vars);
        for row in rows {
            system.push_row(row);
        }
        system
    }

    /// Append one `[b, a_1, …, a_n]` row.
    pub fn push_row(&mut self, row: &[f64]) {
        assert_eq!(row.len(), self.matrix.ncols());
        self.matrix
            .push_row(ArrayView1::from(row))
            .expect("row width checked above");
    }

    /// Number of variables.
    pub fn vars(&self) -> usize {
        self.matrix.ncols() - 1
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.matrix.axis_iter(Axis(0))
    }
}

/// The generators (rays) of a cone through the origin, one coordinate
/// row per ray.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSystem {
    matrix: Array2<f64>,
}

impl GeneratorSystem {
    /// An empty generator set in `vars` dimensions.
    pub fn new(vars: usize) -> Self {
        Self {
            matrix: Array2::zeros((0, vars)),
        }
    }

    /// Build from coordinate rows of width `vars`.
    pub fn from_rows(vars: usize, rows: &[Vec<f64>]) -> Self {
        let mut system = Self::new(vars);
        for row in rows {
            system.push_ray(row);
        }
        system
    }

    /// Append one ray.
    pub fn push_ray(&mut self, coords: &[f64]) {
        assert_eq!(coords.len(), self.matrix.ncols());
        self.matrix
            .push_row(ArrayView1::from(coords))
            .expect("row width checked above");
    }

    pub fn vars(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    pub fn rays(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.matrix.axis_iter(Axis(0))
    }
}

/// A double-description solver: converts between the inequality and
/// the generator representation of a polyhedral cone and removes
/// redundant rows.
pub trait ConeSolver {
    /// A minimal set of rays generating `{x : b + A·x ≥ 0}`.
    fn extreme_rays(&self, system: &IneqSystem) -> Result<Vec<Vec<f64>>, SolverError>;

    /// The inequality representation of the cone generated by rays,
    /// canonicalized.
    fn inequalities(&self, generators: &GeneratorSystem) -> Result<IneqSystem, SolverError>;

    /// Remove redundant rows.
    fn canonicalize(&self, system: IneqSystem) -> Result<IneqSystem, SolverError>;
}

/// Constraint sense in an [`LpProblem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

/// One linear constraint `Σ coeffs_i·x_i  ⟨relation⟩  rhs`.
#[derive(Clone, Debug)]
pub struct LpConstraint {
    pub coeffs: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A pure feasibility program: no objective, a sign restriction per
/// variable, and a list of constraints.
#[derive(Clone, Debug)]
pub struct LpProblem {
    vars: usize,
    nonneg: Vec<bool>,
    constraints: Vec<LpConstraint>,
}

impl LpProblem {
    /// A program over `vars` variables, all constrained nonnegative
    /// when `nonneg` is true and free otherwise.
    pub fn new(vars: usize, nonneg: bool) -> Self {
        Self {
            vars,
            nonneg: vec![nonneg; vars],
            constraints: Vec::new(),
        }
    }

    pub fn vars(&self) -> usize {
        self.vars
    }

    /// Sign restrictions, one per variable.
    pub fn nonneg(&self) -> &[bool] {
        &self.nonneg
    }

    pub fn constraints(&self) -> &[LpConstraint] {
        &self.constraints
    }

    /// Add `Σ coeffs_i·x_i ⟨relation⟩ rhs`.
    pub fn add(&mut self, coeffs: Vec<f64>, relation: Relation, rhs: f64) {
        assert_eq!(coeffs.len(), self.vars);
        self.constraints.push(LpConstraint {
            coeffs,
            relation,
            rhs,
        });
    }
}

/// Outcome of an LP feasibility run.
#[derive(Clone, Debug, PartialEq)]
pub enum LpSolution {
    /// A satisfying assignment.
    Feasible(Vec<f64>),
    /// No assignment exists; a normal outcome, not an error.
    Infeasible,
}

/// An LP feasibility solver.
pub trait LpSolver {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError>;
}

/// Round to `digits` decimal digits and materialise the result as an
/// exact rational. Callers pass the domain size as the digit count;
/// that convention is what makes independently computed solver results
/// comparable. Digit counts are clamped at 18, the most an `i64`
/// denominator can carry.
pub fn round_to_digits(x: f64, digits: usize) -> Rational64 {
    let digits = digits.min(18) as u32;
    let scale = 10i64.pow(digits);
    Rational64::new((x * scale as f64).round() as i64, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::rational::Rational64;

    #[test]
    fn rounding() {
        assert_eq!(round_to_digits(0.5000000001, 2), Rational64::new(1, 2));
        assert_eq!(round_to_digits(-0.9999999999, 2), Rational64::from_integer(-1));
        assert_eq!(round_to_digits(1.0 / 3.0, 2), Rational64::new(33, 100));
        assert_eq!(round_to_digits(0.0, 5), Rational64::from_integer(0));
        // ties round away from zero
        assert_eq!(round_to_digits(0.25, 1), Rational64::new(3, 10));
    }

    #[test]
    fn system_shapes() {
        let mut system = IneqSystem::new(3);
        system.push_row(&[0.0, 1.0, -1.0, 0.5]);
        system.push_row(&[1.0, 0.0, 0.0, -1.0]);
        assert_eq!(system.vars(), 3);
        assert_eq!(system.len(), 2);
        let rays = GeneratorSystem::from_rows(2, &[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(rays.vars(), 2);
        assert_eq!(rays.len(), 2);
    }
}

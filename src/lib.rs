//!An implementation of weighted clones and
//![weighted polymorphisms](https://arxiv.org/abs/1207.6692)
//!for reasoning about the tractability of valued constraint
//!satisfaction problems.
//!
//!
//!
//!# Example
//!
//!```rust,no_run
//!use weighted_clones::*;
//!use num::rational::Rational64;
//!
//!pub fn main() -> Result<()> {
//!    // The binary submodularity weighted operation on {0, 1}:
//!    // -x -y +min +max.
//!    let sub = Submodular::new(2)?;
//!    let wop = sub.weighted_operation();
//!
//!    // A soft implication cost function.
//!    let soft = CostFunction::new(
//!        2,
//!        2,
//!        [0, 0, 1, 0].map(Rational64::from_integer).to_vec(),
//!    )?;
//!
//!    // Submodular cost functions are exactly the ones it improves.
//!    assert!(wop.improves(&soft)?.is_improved());
//!
//!    // Generate the binary cost functions it improves, through an
//!    // external double-description solver.
//!    let solver = CddSolver::default();
//!    for cf in wop.imp(2, false, &solver)? {
//!        println!("{cf}");
//!    }
//!    Ok(())
//!}
//!```
//!

#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    //unused_qualifications,
    unused_labels,
    //unused_results
)]

mod clone;
pub use crate::clone::CloneSet;

mod combinatorics;
mod common;
mod error;
pub use crate::error::{Error, Result};

mod iterators;
mod operation;
pub use crate::operation::Operation;

pub mod operations;

mod cost;
pub use crate::cost::{CostFunction, common_wpol, separating_wpol};

mod weighted;
pub use crate::weighted::{Improvement, Membership, TranslationFilter, WeightedOperation};

mod submodular;
pub use crate::submodular::Submodular;

pub mod solver;
pub use crate::solver::{CddSolver, ConeSolver, LpSolveAdapter, LpSolver};

use env_logger::Env;

/// Initialise logging at the info level (overridable through
/// `RUST_LOG`).
pub fn init_default_log() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

/// Initialise logging at the trace level (overridable through
/// `RUST_LOG`).
pub fn init_debug_log() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("trace")).try_init();
}

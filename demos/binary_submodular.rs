//! Generate the binary submodular cost functions on a two-element
//! domain.
//!
//! Requires a cdd-compatible double-description binary on the path
//! (override with the `CDD` environment variable):
//!
//! ```text
//! cargo run --example binary-submodular
//! ```

use weighted_clones::{CddSolver, Result, Submodular, init_default_log};

fn main() -> Result<()> {
    init_default_log();

    let submodular = Submodular::new(2)?;
    let wop = submodular.weighted_operation();
    println!("weighted operation:\n{wop}");

    let solver = match std::env::var("CDD") {
        Ok(program) => CddSolver::with_program(program),
        Err(_) => CddSolver::default(),
    };

    println!("generators of the binary submodular cone:");
    for cf in wop.imp(2, false, &solver)? {
        println!("  {cf}");
    }
    Ok(())
}

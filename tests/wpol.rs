//! Weighted-polymorphism generation flows against scripted solvers.

mod common;

use common::{ScriptedCone, ScriptedLp};
use num::rational::Rational64;
use weighted_clones::solver::LpSolution;
use weighted_clones::{
    CloneSet, CostFunction, Operation, WeightedOperation, common_wpol, separating_wpol,
};

fn rat(n: i64) -> Rational64 {
    Rational64::from_integer(n)
}

fn rats(values: &[i64]) -> Vec<Rational64> {
    values.iter().map(|&v| rat(v)).collect()
}

/// Unary cost 1 at 0, cost 0 at 1.
fn mu0() -> CostFunction {
    CostFunction::new(1, 2, rats(&[1, 0])).unwrap()
}

/// Unary cost 0 at 0, cost 1 at 1.
fn mu1() -> CostFunction {
    CostFunction::new(1, 2, rats(&[0, 1])).unwrap()
}

#[test]
fn unary_wpol_decodes_negated_rays() {
    // the cone solver reports one ray; its negation weights the
    // identity by -1 and the constant 1 by +1
    let cone = ScriptedCone::returning_rays(vec![vec![vec![1.0, 0.0, 0.0, -1.0]]]);
    let result = mu0().wpol(1, None, &cone).unwrap();
    let expected = WeightedOperation::from_parts(
        1,
        2,
        vec![
            Operation::projection(1, 2, 0).unwrap(),
            Operation::explicit(1, 2, vec![1, 1]).unwrap(),
        ],
        rats(&[-1, 1]),
    )
    .unwrap();
    assert_eq!(result, vec![expected]);

    // the system was the five weighted-operation rows plus the two
    // improvement rows
    let seen = cone.seen_systems.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].vars(), 4);
    assert_eq!(seen[0].len(), 7);
}

#[test]
fn no_common_unary_wpol_for_opposed_costs() {
    let cone = ScriptedCone::returning_rays(vec![vec![]]);
    let result = common_wpol(&[mu0(), mu1()], 1, None, false, &cone).unwrap();
    assert!(result.is_empty());
}

#[test]
fn soft_implication_is_the_common_binary_wpol() {
    // over the 16 binary operations on {0,1}: projections at 0 and 1,
    // min at 3, max at 7 in the lexicographic clone order
    let mut ray = vec![0.0; 16];
    ray[0] = 1.0;
    ray[1] = 1.0;
    ray[3] = -1.0;
    ray[7] = -1.0;
    let cone = ScriptedCone::returning_rays(vec![vec![ray]]);
    let result = common_wpol(&[mu0(), mu1()], 2, None, false, &cone).unwrap();
    let submodularity = WeightedOperation::from_parts(
        2,
        2,
        vec![
            Operation::projection(2, 2, 0).unwrap(),
            Operation::projection(2, 2, 1).unwrap(),
            Operation::explicit(2, 2, vec![0, 0, 0, 1]).unwrap(),
            Operation::explicit(2, 2, vec![0, 1, 1, 1]).unwrap(),
        ],
        rats(&[-1, -1, 1, 1]),
    )
    .unwrap();
    assert_eq!(result, vec![submodularity]);
}

#[test]
fn multimorphism_rows_pin_projection_weights() {
    let base = ScriptedCone::returning_rays(vec![vec![]]);
    common_wpol(&[mu0()], 1, None, false, &base).unwrap();
    let pinned = ScriptedCone::returning_rays(vec![vec![]]);
    common_wpol(&[mu0()], 1, None, true, &pinned).unwrap();
    let without = base.seen_systems.borrow()[0].len();
    let with = pinned.seen_systems.borrow()[0].len();
    // two extra rows per projection coordinate
    assert_eq!(with, without + 2);
}

#[test]
fn empty_input_has_no_wpol() {
    let cone = ScriptedCone::returning_rays(vec![]);
    assert!(common_wpol(&[], 3, None, false, &cone).unwrap().is_empty());
}

#[test]
fn separation_finds_a_witness() {
    // a weighted operation improving μ0 but violating an improvement
    // row of μ1: -identity +constant1
    let lp = ScriptedLp::returning(vec![
        LpSolution::Infeasible,
        LpSolution::Feasible(vec![1.0, 0.0, 0.0, -1.0]),
    ]);
    let witness = separating_wpol(&[mu0()], &mu1(), 1, None, &lp)
        .unwrap()
        .expect("a separating weighted operation exists");
    let expected = WeightedOperation::from_parts(
        1,
        2,
        vec![
            Operation::projection(1, 2, 0).unwrap(),
            Operation::explicit(1, 2, vec![1, 1]).unwrap(),
        ],
        rats(&[-1, 1]),
    )
    .unwrap();
    assert_eq!(witness, expected);
    // one feasibility program per candidate improvement row, stopping
    // at the first feasible one
    assert_eq!(lp.seen.borrow().len(), 2);
}

#[test]
fn separation_gives_up_without_a_witness() {
    let lp = ScriptedLp::returning(vec![LpSolution::Infeasible, LpSolution::Infeasible]);
    assert!(
        separating_wpol(&[mu0()], &mu1(), 1, None, &lp)
            .unwrap()
            .is_none()
    );
}

#[test]
fn explicit_clone_restricts_the_columns() {
    // over the clone generated by min alone, the submodularity
    // operation is not expressible; the column count follows the clone
    let min: Operation = Operation::explicit(2, 2, vec![0, 0, 0, 1]).unwrap();
    let clone = CloneSet::generate(&[min], 2).unwrap();
    assert_eq!(clone.len(), 3);
    let cone = ScriptedCone::returning_rays(vec![vec![]]);
    let result = mu0().wpol(2, Some(&clone), &cone).unwrap();
    assert!(result.is_empty());
    assert_eq!(cone.seen_systems.borrow()[0].vars(), 3);
}

//! Cross-representation operation semantics.

use std::collections::BTreeMap;
use weighted_clones::operations::{BinaryOperation, MinMax, Projection, SharpTernary};
use weighted_clones::{CloneSet, Operation};

fn explicit(arity: usize, dom: usize, table: &[usize]) -> Operation {
    Operation::explicit(arity, dom, table.to_vec()).unwrap()
}

fn proj(arity: usize, dom: usize, index: usize) -> Operation {
    Operation::projection(arity, dom, index).unwrap()
}

#[test]
fn projections_select_their_operand() {
    // the identity composes every unary operation to itself
    for dom in 2..4 {
        let clone = CloneSet::all_operations(1, dom).unwrap();
        let p = proj(1, dom, 0);
        for f in &clone {
            assert_eq!(p.compose(std::slice::from_ref(f)).unwrap(), *f);
        }
    }
    // and at higher arity, coordinate by coordinate
    let f = explicit(2, 2, &[1, 0, 0, 1]);
    let g = explicit(2, 2, &[0, 1, 1, 1]);
    let h = explicit(2, 2, &[0, 0, 0, 1]);
    for (i, expected) in [&f, &g, &h].into_iter().enumerate() {
        let p = proj(3, 2, i);
        assert_eq!(
            p.compose(&[f.clone(), g.clone(), h.clone()]).unwrap(),
            *expected
        );
    }
}

#[test]
fn restriction_crosses_representations() {
    // restricting a domain-3 operation to {0, 2} yields the
    // compressed min on {0, 1}
    let dom3: Operation = BinaryOperation::from_entries(
        3,
        &[
            ((0, 0), 0),
            ((0, 1), 1),
            ((0, 2), 0),
            ((1, 0), 1),
            ((1, 1), 2),
            ((1, 2), 1),
            ((2, 0), 0),
            ((2, 1), 2),
            ((2, 2), 2),
        ],
        false,
        false,
    )
    .unwrap()
    .into();
    let min: Operation = BinaryOperation::from_entries(2, &[((0, 1), 0)], true, true)
        .unwrap()
        .into();
    let restricted = dom3.restrict(&[0, 2]).unwrap();
    assert_eq!(restricted, min);
    assert!(restricted.as_binary().unwrap().commutes());
    assert!(restricted.as_binary().unwrap().idempotent());
    // the compressed min also equals its explicit table
    assert_eq!(min, explicit(2, 2, &[0, 0, 0, 1]));
    // and the binary projections equal the table-free ones
    let p0: Operation =
        BinaryOperation::from_entries(2, &[((0, 1), 0), ((1, 0), 1)], false, true)
            .unwrap()
            .into();
    assert_eq!(p0, proj(2, 2, 0));
}

#[test]
fn min_max_lattice_scenario() {
    let min = MinMax::min_op(2, 2).unwrap();
    let max = MinMax::max_op(2, 2).unwrap();
    assert!(min.lt(&max));
    assert_eq!(&min * &max, min);
    assert_eq!(&min + &max, max);
}

#[test]
fn sharp_composition_permutes_pixley_operations() {
    let f: BTreeMap<[usize; 3], usize> = BTreeMap::from([
        ([0, 1, 2], 0),
        ([0, 2, 1], 1),
        ([1, 0, 2], 2),
        ([1, 2, 0], 0),
        ([2, 0, 1], 1),
        ([2, 1, 0], 2),
    ]);
    let g: BTreeMap<[usize; 3], usize> = BTreeMap::from([
        ([0, 1, 2], 0),
        ([0, 2, 1], 2),
        ([1, 0, 2], 1),
        ([1, 2, 0], 1),
        ([2, 0, 1], 0),
        ([2, 1, 0], 2),
    ]);
    let h: BTreeMap<[usize; 3], usize> = BTreeMap::from([
        ([0, 1, 2], 1),
        ([0, 2, 1], 2),
        ([1, 0, 2], 2),
        ([1, 2, 0], 0),
        ([2, 0, 1], 0),
        ([2, 1, 0], 1),
    ]);
    let pixley0: Operation = SharpTernary::new(3, [2, 1, 1], f.clone()).unwrap().into();
    let p: Vec<Operation> = (0..3).map(|i| proj(3, 3, i)).collect();
    // identity tuple
    assert_eq!(
        pixley0
            .compose(&[p[0].clone(), p[1].clone(), p[2].clone()])
            .unwrap(),
        pixley0
    );
    // cyclic shifts move between the pixley variants
    let pixley2: Operation = SharpTernary::new(3, [0, 1, 0], h).unwrap().into();
    let pixley1: Operation = SharpTernary::new(3, [2, 0, 0], g).unwrap().into();
    let shifted = pixley0
        .compose(&[p[2].clone(), p[0].clone(), p[1].clone()])
        .unwrap();
    assert_eq!(shifted, pixley2);
    let shifted = pixley0
        .compose(&[p[1].clone(), p[2].clone(), p[0].clone()])
        .unwrap();
    assert_eq!(shifted, pixley1);
}

#[test]
fn sharp_operations_are_sharp() {
    let f: BTreeMap<[usize; 3], usize> = BTreeMap::from([
        ([0, 1, 2], 0),
        ([0, 2, 1], 1),
        ([1, 0, 2], 2),
        ([1, 2, 0], 0),
        ([2, 0, 1], 1),
        ([2, 1, 0], 2),
    ]);
    let maj: Operation = SharpTernary::new(3, [0, 0, 1], f).unwrap().into();
    assert!(maj.is_sharp());
    assert!(!proj(3, 3, 0).is_sharp());
    // the boolean majority, given by its table, is sharp as well
    assert!(explicit(3, 2, &[0, 0, 0, 1, 0, 1, 1, 1]).is_sharp());
}

#[test]
fn clone_generation_is_closed_over_minmax() {
    let min: Operation = MinMax::min_op(2, 2).unwrap().into();
    let max: Operation = MinMax::max_op(2, 2).unwrap().into();
    let clone = CloneSet::generate(&[min, max], 2).unwrap();
    assert_eq!(clone.len(), 4);
    for f in &clone {
        for g in &clone {
            for h in &clone {
                assert!(clone.contains(&f.compose(&[g.clone(), h.clone()]).unwrap()));
            }
        }
    }
    // generation agrees with the dedicated min/max enumeration
    assert_eq!(clone.len(), MinMax::clone_set(2, 2).unwrap().len());
}

#[test]
fn display_round_trips() {
    let ops: Vec<Operation> = vec![
        proj(4, 3, 2),
        explicit(2, 3, &[0, 1, 0, 1, 1, 1, 0, 2, 2]),
        BinaryOperation::from_entries(2, &[((0, 0), 0), ((0, 1), 1), ((1, 1), 1)], true, false)
            .unwrap()
            .into(),
        MinMax::new(4, 2, &[vec![0, 3], vec![1, 2]]).unwrap().into(),
        Projection::new(1, 7, 0).unwrap().into(),
    ];
    for op in ops {
        let parsed: Operation = op.to_string().parse().unwrap();
        assert_eq!(parsed, op);
        assert_eq!(parsed.value_table(), op.value_table());
    }
}

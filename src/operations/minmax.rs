//! Monotone operations built from min and max.
//!
//! A monotone lattice term over `arity` variables is determined by a
//! Sperner family on `[arity]` (an antichain of index sets): the value
//! is the maximum over the family of the minimum over each set. On a
//! totally ordered domain this covers exactly the operations generated
//! by binary min and max. The family algebra makes composition, the
//! domination order and lattice neighbours cheap, without touching
//! value tables.

use crate::clone::CloneSet;
use crate::error::{Error, Result};
use crate::operation::Operation;

/// A min/max operation, `f(x) = max { min { x_i : i ∈ s } : s ∈ S }`
/// for a Sperner family `S` stored as sorted bitmasks over `[arity]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MinMax {
    arity: usize,
    dom: usize,
    family: Vec<u32>,
}

/// Remove every set that contains another one, leaving the minimal
/// antichain, sorted.
fn sperner_reduce(mut sets: Vec<u32>) -> Vec<u32> {
    sets.sort_unstable();
    sets.dedup();
    let keep: Vec<u32> = sets
        .iter()
        .filter(|&&s| !sets.iter().any(|&t| t != s && t & s == t))
        .copied()
        .collect();
    keep
}

impl MinMax {
    /// Build from a family of index sets. The family is reduced to its
    /// Sperner core; it must be nonempty with nonempty sets, and the
    /// bitmask representation caps the arity at 32.
    pub fn new(arity: usize, dom: usize, sets: &[Vec<usize>]) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        if arity == 0 || arity > 32 {
            return Err(Error::Invalid(format!(
                "min/max operations support arities 1 to 32, got {arity}"
            )));
        }
        if sets.is_empty() {
            return Err(Error::Invalid("empty min/max family".into()));
        }
        let mut family = Vec::with_capacity(sets.len());
        for set in sets {
            if set.is_empty() {
                return Err(Error::Invalid("empty set in min/max family".into()));
            }
            let mut mask = 0u32;
            for &i in set {
                if i >= arity {
                    return Err(Error::Invalid(format!(
                        "index {i} out of range for arity {arity}"
                    )));
                }
                mask |= 1 << i;
            }
            family.push(mask);
        }
        Ok(Self::from_family(arity, dom, family))
    }

    /// The minimum of all arguments.
    pub fn min_op(arity: usize, dom: usize) -> Result<Self> {
        Self::new(arity, dom, &[(0..arity).collect()])
    }

    /// The maximum of all arguments.
    pub fn max_op(arity: usize, dom: usize) -> Result<Self> {
        let singletons: Vec<Vec<usize>> = (0..arity).map(|i| vec![i]).collect();
        Self::new(arity, dom, &singletons)
    }

    pub(crate) fn from_family(arity: usize, dom: usize, family: Vec<u32>) -> Self {
        debug_assert!(!family.is_empty());
        Self {
            arity,
            dom,
            family: sperner_reduce(family),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    /// The Sperner family, as sorted bitmasks over `[arity]`.
    pub fn family(&self) -> &[u32] {
        &self.family
    }

    #[inline]
    pub(crate) fn eval_unchecked(&self, x: &[usize]) -> usize {
        self.family
            .iter()
            .map(|&s| {
                (0..self.arity)
                    .filter(|i| s & (1 << i) != 0)
                    .map(|i| x[i])
                    .min()
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0)
    }

    /// Domination order: `self ≤ other` when every set of `self`'s
    /// family contains some set of `other`'s.
    pub fn le(&self, other: &Self) -> bool {
        self.family
            .iter()
            .all(|&s| other.family.iter().any(|&t| t & s == t))
    }

    /// Strict domination.
    pub fn lt(&self, other: &Self) -> bool {
        self != other && self.le(other)
    }

    /// The join, pointwise maximum of the two operations.
    pub fn join(&self, other: &Self) -> Self {
        let mut family = self.family.clone();
        family.extend_from_slice(&other.family);
        Self::from_family(self.arity, self.dom, family)
    }

    /// The meet, pointwise minimum of the two operations.
    pub fn meet(&self, other: &Self) -> Self {
        let mut family = Vec::with_capacity(self.family.len() * other.family.len());
        for &s in &self.family {
            for &t in &other.family {
                family.push(s | t);
            }
        }
        Self::from_family(self.arity, self.dom, family)
    }

    /// Compose with min/max operands, entirely in the family algebra:
    /// substitute each variable by the corresponding operand, turning
    /// the family into meets and joins of the operands.
    pub(crate) fn compose_minmax(&self, ops: &[&MinMax]) -> MinMax {
        debug_assert_eq!(ops.len(), self.arity);
        let mut acc: Option<MinMax> = None;
        for &s in &self.family {
            let mut term: Option<MinMax> = None;
            for i in (0..self.arity).filter(|i| s & (1 << i) != 0) {
                term = Some(match term {
                    None => ops[i].clone(),
                    Some(t) => t.meet(ops[i]),
                });
            }
            let term = term.expect("nonempty set invariant");
            acc = Some(match acc {
                None => term,
                Some(a) => a.join(&term),
            });
        }
        acc.expect("nonempty family invariant")
    }

    /// The operations immediately below this one in the lattice of
    /// min/max operations of the same arity: for each set of the
    /// family, replace it by all its one-larger supersets.
    pub fn below(&self) -> Vec<MinMax> {
        let full = if self.arity == 32 {
            u32::MAX
        } else {
            (1u32 << self.arity) - 1
        };
        let mut result = Vec::new();
        for &s in &self.family {
            let mut sets: Vec<u32> = self.family.iter().copied().filter(|&t| t != s).collect();
            for i in (0..self.arity).filter(|i| full & s & (1 << i) == 0) {
                sets.push(s | (1 << i));
            }
            let reduced = sperner_reduce(sets);
            if !reduced.is_empty() && reduced != self.family {
                result.push(MinMax {
                    arity: self.arity,
                    dom: self.dom,
                    family: reduced,
                });
            }
        }
        result.sort_by(|a, b| a.family.cmp(&b.family));
        result.dedup();
        result
    }

    /// The arity-section of the clone generated by min and max: every
    /// monotone lattice term on `arity` variables, enumerated by the
    /// standard recursion on the variable count, then reordered so the
    /// projections come first as clones require.
    pub fn clone_set(arity: usize, dom: usize) -> Result<CloneSet> {
        let mut ops: Vec<MinMax> = vec![Self::new(arity, dom, &[vec![0]])?];
        for i in 1..arity {
            let n = ops.len();
            let xi = Self::new(arity, dom, &[vec![i]])?;
            let mut push = |ops: &mut Vec<MinMax>, op: MinMax| {
                if !ops.contains(&op) {
                    ops.push(op);
                }
            };
            push(&mut ops, xi.clone());

            // x_i ∧ t, then x_i ∨ t, for every earlier term t
            for t in 0..n {
                let meet = xi.meet(&ops[t]);
                push(&mut ops, meet);
            }
            for t in 0..n {
                let join = xi.join(&ops[t]);
                push(&mut ops, join);
            }

            // s ∨ (x_i ∧ t) for comparable earlier pairs
            for j in 0..n {
                for k in j + 1..n {
                    let (s, t) = (ops[j].clone(), ops[k].clone());
                    if s.le(&t) {
                        push(&mut ops, s.join(&xi.meet(&t)));
                    } else if t.le(&s) {
                        push(&mut ops, t.join(&xi.meet(&s)));
                    }
                }
            }
        }
        let projection = |op: &MinMax| op.family.len() == 1 && op.family[0].count_ones() == 1;
        let mut ordered: Vec<Operation> = Vec::with_capacity(ops.len());
        for i in 0..arity {
            let mask = 1u32 << i;
            let p = ops
                .iter()
                .find(|op| projection(op) && op.family[0] == mask)
                .expect("the recursion seeds every projection");
            ordered.push(p.clone().into());
        }
        for op in ops {
            if !projection(&op) {
                ordered.push(op.into());
            }
        }
        CloneSet::new(ordered)
    }
}

impl PartialOrd for MinMax {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering::*;
        if self == other {
            Some(Equal)
        } else if self.le(other) {
            Some(Less)
        } else if other.le(self) {
            Some(Greater)
        } else {
            None
        }
    }
}

/// Join of two min/max operations.
impl std::ops::Add for &MinMax {
    type Output = MinMax;

    fn add(self, other: &MinMax) -> MinMax {
        self.join(other)
    }
}

/// Meet of two min/max operations.
impl std::ops::Mul for &MinMax {
    type Output = MinMax;

    fn mul(self, other: &MinMax) -> MinMax {
        self.meet(other)
    }
}

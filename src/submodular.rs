//! The submodularity weighted operation.
//!
//! Submodular cost functions are exactly those improved by the
//! weighted operation assigning weight −1 to both binary projections
//! and +1 to min and max. Over the ⟨min,max⟩ clone its translations
//! collapse to covering pairs in the lattice of monotone operations,
//! which keeps the membership programs small; everything else is the
//! generic [`WeightedOperation`] machinery.

use crate::clone::CloneSet;
use crate::error::Result;
use crate::operations::MinMax;
use crate::solver::LpSolver;
use crate::weighted::{Membership, WeightedOperation, decide_membership};
use log::debug;
use num::rational::Rational64;

/// The weighted operation `−x −y +min +max` on a given domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submodular {
    wop: WeightedOperation,
    dom: usize,
}

impl Submodular {
    pub fn new(dom: usize) -> Result<Self> {
        let minus_one = Rational64::from_integer(-1);
        let one = Rational64::from_integer(1);
        let wop = WeightedOperation::new(
            2,
            dom,
            [
                (crate::operation::Operation::projection(2, dom, 0)?, minus_one),
                (crate::operation::Operation::projection(2, dom, 1)?, minus_one),
                (MinMax::min_op(2, dom)?.into(), one),
                (MinMax::max_op(2, dom)?.into(), one),
            ],
        )?;
        Ok(Self { wop, dom })
    }

    /// The underlying weighted operation.
    pub fn weighted_operation(&self) -> &WeightedOperation {
        &self.wop
    }

    /// A generating set of translations over a ⟨min,max⟩ clone,
    /// restricted to covering pairs: incomparable `f, g` whose meet
    /// and join are immediate lattice neighbours contribute the row
    /// `−f −g +(f∨g) +(f∧g)`. Falls back to the generic enumeration
    /// when the clone holds anything other than min/max operations.
    /// Defaults to [`MinMax::clone_set`] at the given arity.
    pub fn translations(
        &self,
        arity: usize,
        clone: Option<&CloneSet>,
    ) -> Result<Vec<Vec<Rational64>>> {
        let generated;
        let clone = match clone {
            Some(c) => c,
            None => {
                generated = MinMax::clone_set(arity, self.dom)?;
                &generated
            }
        };
        let elements: Option<Vec<&MinMax>> = clone.iter().map(|op| op.as_min_max()).collect();
        let Some(elements) = elements else {
            debug!("clone is not min/max only, using the generic translation enumeration");
            return self.wop.translations(arity, Some(clone));
        };
        let n = clone.len();
        let zero = Rational64::from_integer(0);
        let one = Rational64::from_integer(1);
        let mut rows = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                let f = elements[i];
                let g = elements[j];
                if f.lt(g) || g.lt(f) {
                    continue;
                }
                let meet = f.meet(g);
                let join = f.join(g);
                let covering = (f.below().contains(&meet) || join.below().contains(g))
                    && (g.below().contains(&meet) || join.below().contains(f));
                if !covering {
                    continue;
                }
                let meet_at = clone
                    .position(&meet.clone().into())
                    .ok_or(crate::error::Error::SupportNotInClone)?;
                let join_at = clone
                    .position(&join.clone().into())
                    .ok_or(crate::error::Error::SupportNotInClone)?;
                let mut row = vec![zero; n];
                row[i] -= one;
                row[j] -= one;
                row[join_at] += one;
                row[meet_at] += one;
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Weighted-clone membership over the ⟨min,max⟩ clone, using the
    /// covering-pair translations.
    pub fn in_wclone<L: LpSolver>(
        &self,
        other: &WeightedOperation,
        clone: Option<&CloneSet>,
        lp: &L,
    ) -> Result<Membership> {
        let generated;
        let clone = match clone {
            Some(c) => c,
            None => {
                generated = MinMax::clone_set(other.arity(), self.dom)?;
                &generated
            }
        };
        let rows = self.translations(other.arity(), Some(clone))?;
        decide_membership(self.dom, other, clone, &rows, lp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;

    #[test]
    fn weights() {
        let sub = Submodular::new(2).unwrap();
        let wop = sub.weighted_operation();
        let min: Operation = MinMax::min_op(2, 2).unwrap().into();
        assert_eq!(wop.weight(&min), Rational64::from_integer(1));
        assert_eq!(
            wop.weight(&Operation::projection(2, 2, 0).unwrap()),
            Rational64::from_integer(-1)
        );
        assert_eq!(wop.support_len(), 4);
    }

    #[test]
    fn covering_pair_translations_arity_two() {
        // over [x, y, min, max] the only covering pair is (x, y)
        let sub = Submodular::new(2).unwrap();
        let rows = sub.translations(2, None).unwrap();
        let expected: Vec<Rational64> = [-1i64, -1, 1, 1]
            .iter()
            .map(|&v| Rational64::from_integer(v))
            .collect();
        assert_eq!(rows, vec![expected]);
    }

    #[test]
    fn covering_pairs_match_generic_rows_at_arity_two() {
        let sub = Submodular::new(2).unwrap();
        let clone = MinMax::clone_set(2, 2).unwrap();
        let generic = sub
            .weighted_operation()
            .translations(2, Some(&clone))
            .unwrap();
        assert_eq!(sub.translations(2, Some(&clone)).unwrap(), generic);
    }
}

//! Binary operations with compressed tables.
//!
//! A commutative operation stores only the entries `(a, b)` with
//! `a ≤ b`; an idempotent one drops the diagonal as well (it returns
//! the repeated argument directly). Non-commutative operations keep
//! the full square table.

use crate::common::{FlatMatrix, Sym, SymNonRefl};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Table {
    /// Row-major `dom × dom` table.
    Full(Vec<usize>),
    /// Upper triangle including the diagonal (commutative).
    Half(Sym<usize>),
    /// Upper triangle without the diagonal (commutative, idempotent).
    OffDiag(SymNonRefl<usize>),
}

/// A binary operation, with commutativity and idempotency recorded so
/// the symmetric and diagonal entries need not be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryOperation {
    dom: usize,
    comm: bool,
    idem: bool,
    table: Table,
}

impl BinaryOperation {
    /// Build from explicit entries. Exactly the entries the flags make
    /// significant must be determined: all pairs for a general
    /// operation, unordered pairs for a commutative one, off-diagonal
    /// (pairs of distinct values) for an idempotent one.
    pub fn from_entries(
        dom: usize,
        entries: &[((usize, usize), usize)],
        commutes: bool,
        idempotent: bool,
    ) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        let mut slots: Vec<Option<usize>> = vec![None; dom * dom];
        for &((a, b), v) in entries {
            Error::check_input(&[a, b], 2, dom)?;
            if v >= dom {
                return Err(Error::Domain { value: v, dom });
            }
            let mut write = |a: usize, b: usize| -> Result<()> {
                let slot = &mut slots[a * dom + b];
                match *slot {
                    Some(old) if old != v => Err(Error::Invalid(format!(
                        "conflicting entries for ({a}, {b}): {old} and {v}"
                    ))),
                    _ => {
                        *slot = Some(v);
                        Ok(())
                    }
                }
            };
            write(a, b)?;
            if commutes {
                write(b, a)?;
            }
        }
        if idempotent {
            for a in 0..dom {
                let slot = &mut slots[a * dom + a];
                match *slot {
                    Some(old) if old != a => {
                        return Err(Error::Invalid(format!(
                            "diagonal entry ({a}, {a}) = {old} contradicts idempotency"
                        )));
                    }
                    _ => *slot = Some(a),
                }
            }
        }
        let mut full = Vec::with_capacity(dom * dom);
        for a in 0..dom {
            for b in 0..dom {
                match slots[a * dom + b] {
                    Some(v) => full.push(v),
                    None => {
                        return Err(Error::Invalid(format!("missing entry for ({a}, {b})")));
                    }
                }
            }
        }
        Self::with_flags(dom, full, commutes, idempotent)
    }

    /// Wrap a full row-major table, detecting the flags from it.
    pub fn from_full_table(dom: usize, table: Vec<usize>) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        if table.len() != dom * dom {
            return Err(Error::Invalid(format!(
                "binary table of length {} where {} entries were expected",
                table.len(),
                dom * dom
            )));
        }
        for &v in &table {
            if v >= dom {
                return Err(Error::Domain { value: v, dom });
            }
        }
        let comm = (0..dom).all(|a| (0..a).all(|b| table[a * dom + b] == table[b * dom + a]));
        let idem = (0..dom).all(|a| table[a * dom + a] == a);
        Self::with_flags(dom, table, comm, idem)
    }

    fn with_flags(dom: usize, full: Vec<usize>, comm: bool, idem: bool) -> Result<Self> {
        if comm {
            for a in 0..dom {
                for b in 0..a {
                    if full[a * dom + b] != full[b * dom + a] {
                        return Err(Error::Invalid(format!(
                            "entries ({b}, {a}) and ({a}, {b}) contradict commutativity"
                        )));
                    }
                }
            }
        }
        let table = match (comm, idem) {
            (true, true) => {
                let mut t = SymNonRefl::new(0, dom);
                for a in 0..dom {
                    for b in 0..a {
                        t[(b, a)] = full[a * dom + b];
                    }
                }
                Table::OffDiag(t)
            }
            (true, false) => {
                let mut t = Sym::new(0, dom);
                for a in 0..dom {
                    for b in 0..=a {
                        t[(b, a)] = full[a * dom + b];
                    }
                }
                Table::Half(t)
            }
            (false, _) => Table::Full(full),
        };
        Ok(Self {
            dom,
            comm,
            idem,
            table,
        })
    }

    pub fn arity(&self) -> usize {
        2
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    /// Whether the operation is commutative.
    pub fn commutes(&self) -> bool {
        self.comm
    }

    /// Whether the operation is idempotent.
    pub fn idempotent(&self) -> bool {
        self.idem
    }

    #[inline]
    pub(crate) fn eval_unchecked(&self, x: &[usize]) -> usize {
        let (a, b) = (x[0], x[1]);
        if self.idem && a == b {
            return a;
        }
        match &self.table {
            Table::Full(t) => t[a * self.dom + b],
            Table::Half(t) => t.get(a, b),
            Table::OffDiag(t) => t.get(a, b),
        }
    }

    /// Restriction to a duplicate-free subset of the domain, relabeled
    /// to an initial segment. Fails with a domain error when some
    /// entry escapes the subset; the flags of the restriction are
    /// recomputed from its table.
    pub fn restrict(&self, set: &[usize]) -> Result<BinaryOperation> {
        let n = set.len();
        let mut table = Vec::with_capacity(n * n);
        for &a in set {
            for &b in set {
                Error::check_input(&[a, b], 2, self.dom)?;
                let v = self.eval_unchecked(&[a, b]);
                match set.iter().position(|&s| s == v) {
                    Some(p) => table.push(p),
                    None => {
                        return Err(Error::Domain {
                            value: v,
                            dom: self.dom,
                        });
                    }
                }
            }
        }
        Self::from_full_table(n, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // the two binary projections, stored idempotently
    fn projections() -> [BinaryOperation; 2] {
        [
            BinaryOperation::from_entries(2, &[((0, 1), 0), ((1, 0), 1)], false, true).unwrap(),
            BinaryOperation::from_entries(2, &[((0, 1), 1), ((1, 0), 0)], false, true).unwrap(),
        ]
    }

    #[test]
    fn eval_compressed() {
        let min = BinaryOperation::from_entries(2, &[((0, 1), 0)], true, true).unwrap();
        assert_eq!(min.eval_unchecked(&[0, 1]), 0);
        assert_eq!(min.eval_unchecked(&[1, 0]), 0);
        assert_eq!(min.eval_unchecked(&[1, 1]), 1);
        let [p0, p1] = projections();
        assert_eq!(p0.eval_unchecked(&[0, 1]), 0);
        assert_eq!(p1.eval_unchecked(&[0, 1]), 1);
    }

    #[test]
    fn flags_detected() {
        // x ∧ y on dom 2, given as a full table
        let min = BinaryOperation::from_full_table(2, vec![0, 0, 0, 1]).unwrap();
        assert!(min.commutes());
        assert!(min.idempotent());
        // constant 0 is commutative but not idempotent
        let zero = BinaryOperation::from_full_table(2, vec![0, 0, 0, 0]).unwrap();
        assert!(zero.commutes());
        assert!(!zero.idempotent());
    }

    #[test]
    fn missing_entries_rejected() {
        assert!(BinaryOperation::from_entries(2, &[((0, 1), 0)], false, true).is_err());
        assert!(BinaryOperation::from_entries(2, &[((0, 1), 0)], true, false).is_err());
    }

    #[test]
    fn restrict_recomputes_flags() {
        // the domain-3 operation of the reference scenario
        let f = BinaryOperation::from_entries(
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
        .unwrap();
        let r = f.restrict(&[0, 2]).unwrap();
        assert!(r.commutes());
        assert!(r.idempotent());
        // {0,1} is not closed: f(1,1) = 2
        assert!(f.restrict(&[0, 1]).is_err());
        let s = f.restrict(&[1, 2]).unwrap();
        assert!(!s.commutes());
        assert!(!s.idempotent());
    }
}

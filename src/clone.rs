//! Composition-closed operation sets of a fixed arity.
//!
//! A [`CloneSet`] is the arity-`k` part of a clone: an ordered,
//! deduplicated list of `k`-ary operations over one domain, closed
//! under composition with itself, whose first `k` entries are the `k`
//! projections. Inequality systems throughout the crate are indexed by
//! clone position, so the ordering is part of the value: generation is
//! deterministic (projections, then seeds, then discoveries in scan
//! order) and the set is immutable afterwards.

use crate::error::{Error, Result};
use crate::iterators::{Functions, StreamingIterator};
use crate::operation::Operation;
use crate::operations::Projection;
use log::{debug, info};
use std::collections::HashMap;
use std::ops::Index;

/// The arity-`k` part of a clone.
#[derive(Clone, Debug)]
pub struct CloneSet {
    arity: usize,
    dom: usize,
    ops: Vec<Operation>,
    index: HashMap<Operation, usize>,
}

impl CloneSet {
    /// Wrap an explicit operation list. The list must be nonempty,
    /// consistent in arity and domain, duplicate-free, and start with
    /// the projections in coordinate order. Closure under composition
    /// is the caller's responsibility here; use [`CloneSet::generate`]
    /// to obtain it.
    pub fn new(ops: Vec<Operation>) -> Result<Self> {
        let first = ops
            .first()
            .ok_or_else(|| Error::Invalid("empty clone".into()))?;
        let arity = first.arity();
        let dom = first.dom();
        if ops.len() < arity {
            return Err(Error::Invalid(format!(
                "clone of arity {arity} needs its {arity} projections first"
            )));
        }
        let mut index = HashMap::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            if op.arity() != arity {
                return Err(Error::Arity {
                    got: op.arity(),
                    expected: arity,
                });
            }
            if op.dom() != dom {
                return Err(Error::Domain {
                    value: op.dom(),
                    dom,
                });
            }
            if i < arity && op.projection_index() != Some(i) {
                return Err(Error::Invalid(format!(
                    "clone entry {i} is not the projection to coordinate {i}"
                )));
            }
            if index.insert(op.clone(), i).is_some() {
                return Err(Error::Invalid(format!("duplicate clone entry at {i}")));
            }
        }
        Ok(Self {
            arity,
            dom,
            ops,
            index,
        })
    }

    /// Close a seed set under composition. Every seed must already
    /// have the target arity (lift lower-arity generators with
    /// [`Operation::lift`] beforehand) and a common domain. The
    /// fixpoint terminates because the space of `arity`-ary operations
    /// on the domain is finite; its size is also the worst case, so
    /// this is only tractable for the small arities and domains the
    /// subject matter deals in.
    pub fn generate(seed: &[Operation], arity: usize) -> Result<Self> {
        let first = seed
            .first()
            .ok_or_else(|| Error::Invalid("empty generator set".into()))?;
        let dom = first.dom();
        let mut ops: Vec<Operation> = Vec::with_capacity(arity + seed.len());
        let mut index: HashMap<Operation, usize> = HashMap::new();
        for i in 0..arity {
            let p: Operation = Projection::new(arity, dom, i)?.into();
            index.insert(p.clone(), i);
            ops.push(p);
        }
        for op in seed {
            if op.arity() != arity {
                return Err(Error::Arity {
                    got: op.arity(),
                    expected: arity,
                });
            }
            if op.dom() != dom {
                return Err(Error::Domain {
                    value: op.dom(),
                    dom,
                });
            }
            if !index.contains_key(op) {
                index.insert(op.clone(), ops.len());
                ops.push(op.clone());
            }
        }

        let mut operands: Vec<Operation> = Vec::with_capacity(arity);
        loop {
            let n = ops.len();
            debug!("clone closure pass over {n} operations");
            let mut changed = false;
            for i in 0..n {
                let mut tuples = Functions::new(arity, n);
                while let Some(t) = tuples.next() {
                    operands.clear();
                    operands.extend(t.iter().map(|&j| ops[j].clone()));
                    let h = ops[i].compose(&operands)?;
                    if !index.contains_key(&h) {
                        index.insert(h.clone(), ops.len());
                        ops.push(h);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        info!(
            "generated clone of {} {arity}-ary operations over domain {dom}",
            ops.len()
        );
        Ok(Self {
            arity,
            dom,
            ops,
            index,
        })
    }

    /// Every operation of the given arity and domain: the projections
    /// first, the rest ordered lexicographically by value table. There
    /// are `dom^(dom^arity)` of them, so this is only for very small
    /// parameters.
    pub fn all_operations(arity: usize, dom: usize) -> Result<Self> {
        let mut ops: Vec<Operation> = Vec::new();
        let mut projection_tables = Vec::with_capacity(arity);
        for i in 0..arity {
            let p: Operation = Projection::new(arity, dom, i)?.into();
            projection_tables.push(p.value_table());
            ops.push(p);
        }
        let table_len = crate::combinatorics::power(dom, arity);
        let mut tables = Functions::new(table_len, dom);
        while let Some(table) = tables.next() {
            if projection_tables.iter().any(|t| t == table) {
                continue;
            }
            ops.push(Operation::explicit(arity, dom, table.to_vec())?);
        }
        Self::new(ops)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Operation> {
        self.ops.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Position of a semantically equal operation, if present.
    pub fn position(&self, op: &Operation) -> Option<usize> {
        self.index.get(op).copied()
    }

    /// Membership by semantic equality.
    pub fn contains(&self, op: &Operation) -> bool {
        self.index.contains_key(op)
    }
}

impl Index<usize> for CloneSet {
    type Output = Operation;

    fn index(&self, i: usize) -> &Operation {
        &self.ops[i]
    }
}

impl PartialEq for CloneSet {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.dom == other.dom && self.ops == other.ops
    }
}

impl Eq for CloneSet {}

impl<'a> IntoIterator for &'a CloneSet {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

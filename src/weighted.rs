//! Weighted operations and weighted clones.
//!
//! A [`WeightedOperation`] assigns nonzero rational weights to
//! finitely many operations of one arity and domain. It is the central
//! reasoning object of the crate: it knows which inequality systems a
//! cost function must satisfy to be improved by it
//! ([`imp_ineq`](WeightedOperation::imp_ineq)), can generate the
//! improved cost functions through a cone solver
//! ([`imp`](WeightedOperation::imp)), enumerate its translations by a
//! clone, and decide membership of another weighted operation in the
//! weighted clone it generates by a primal/dual pair of linear
//! programs ([`in_wclone`](WeightedOperation::in_wclone)).
//!
//! For a weighted operation to be a weighted polymorphism in the
//! strict sense, only projections may carry negative weight and the
//! weights must sum to zero. The type does not enforce this; the
//! algorithms that assume it say so.

use crate::clone::CloneSet;
use crate::combinatorics::{lex_index, power, tuple_at};
use crate::cost::CostFunction;
use crate::error::{Error, Result};
use crate::iterators::{Functions, Multisets, StreamingIterator};
use crate::operation::{HashMemo, Operation};
use crate::solver::{
    ConeSolver, GeneratorSystem, IneqSystem, LpProblem, LpSolution, LpSolver, Relation,
    round_to_digits,
};
use log::{debug, info};
use num::ToPrimitive;
use num::Zero;
use num::rational::Rational64;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Outcome of [`WeightedOperation::improves`]: either the cost
/// function is improved, or the first violated inequality row is the
/// counterexample certificate.
#[derive(Clone, Debug, PartialEq)]
pub enum Improvement {
    Improved,
    Violated(Vec<Rational64>),
}

impl Improvement {
    pub fn is_improved(&self) -> bool {
        matches!(self, Improvement::Improved)
    }
}

/// Which translation rows to keep.
///
/// The translation of a weighted operation by a tuple of clone
/// elements accumulates its weights over the composites' clone
/// positions; translations of a genuine weighted polymorphism sum to
/// zero, so a row without negative entries is necessarily the zero
/// row. `DropZeroRows` keeps everything else and is what the reference
/// computation amounts to on genuine weighted operations.
/// `FullSupport` additionally discards rows where any single
/// coordinate vanishes — a strictly stronger reading that drops
/// translations in which some composite happens to land on a column
/// with cancelling weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TranslationFilter {
    #[default]
    DropZeroRows,
    FullSupport,
}

/// Result of a weighted-clone membership test.
#[derive(Clone, Debug)]
pub enum Membership {
    /// The candidate is a nonnegative combination of translations;
    /// `combination` lists the rounded nonzero coefficients with their
    /// translation rows (indexed by `clone` position).
    Inside {
        clone: CloneSet,
        combination: Vec<(Rational64, Vec<Rational64>)>,
    },
    /// The candidate is separated: assigning cost `costs[i]` to the
    /// value tuple of `clone[i]` yields a cost function improved by
    /// every translation but not by the candidate. The assignment is
    /// kept sparse, against the clone, because its total table would
    /// have `dom^(dom^r)` entries.
    Separated {
        clone: CloneSet,
        costs: Vec<Rational64>,
    },
}

impl Membership {
    pub fn is_inside(&self) -> bool {
        matches!(self, Membership::Inside { .. })
    }
}

/// A formal signed weighting of finitely many operations of one arity
/// and domain.
#[derive(Clone, Debug)]
pub struct WeightedOperation {
    arity: usize,
    dom: usize,
    entries: Vec<(Operation, Rational64)>,
    index: HashMap<Operation, usize>,
    memo: HashMemo,
}

impl WeightedOperation {
    /// Build from (operation, weight) pairs. Weights of duplicate
    /// operations accumulate; entries whose accumulated weight is zero
    /// are dropped. Every operation must have the declared arity and
    /// domain.
    pub fn new(
        arity: usize,
        dom: usize,
        pairs: impl IntoIterator<Item = (Operation, Rational64)>,
    ) -> Result<Self> {
        let mut entries: Vec<(Operation, Rational64)> = Vec::new();
        let mut index: HashMap<Operation, usize> = HashMap::new();
        for (op, w) in pairs {
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
            match index.get(&op) {
                Some(&i) => entries[i].1 += w,
                None => {
                    index.insert(op.clone(), entries.len());
                    entries.push((op, w));
                }
            }
        }
        entries.retain(|(_, w)| !w.is_zero());
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (op, _))| (op.clone(), i))
            .collect();
        Ok(Self {
            arity,
            dom,
            entries,
            index,
            memo: HashMemo::default(),
        })
    }

    /// Build from parallel operation and weight lists.
    pub fn from_parts(
        arity: usize,
        dom: usize,
        ops: Vec<Operation>,
        weights: Vec<Rational64>,
    ) -> Result<Self> {
        if ops.len() != weights.len() {
            return Err(Error::Invalid(format!(
                "{} operations with {} weights",
                ops.len(),
                weights.len()
            )));
        }
        Self::new(arity, dom, ops.into_iter().zip(weights))
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    /// The weight of `op`, zero when unsupported.
    pub fn weight(&self, op: &Operation) -> Rational64 {
        match self.index.get(op) {
            Some(&i) => self.entries[i].1,
            None => Rational64::zero(),
        }
    }

    /// The operations carrying nonzero weight, in first-insertion
    /// order.
    pub fn support(&self) -> impl Iterator<Item = &Operation> {
        self.entries.iter().map(|(op, _)| op)
    }

    /// (operation, weight) pairs, in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Operation, Rational64)> {
        self.entries.iter().map(|(op, w)| (op, *w))
    }

    /// Number of supported operations.
    pub fn support_len(&self) -> usize {
        self.entries.len()
    }

    /// The inequality system characterising the `r`-ary cost functions
    /// improved by this weighted operation. Each row is indexed by the
    /// `dom^r` tuples in lexicographic order; a cost function `g` is
    /// improved exactly when `row · g ≤ 0` for every row. The rows are
    /// sorted and deduplicated, and the zero row is dropped.
    ///
    /// One row arises per tableau: a multiset of `arity` many
    /// `r`-tuples, each supported operation applied to its columns
    /// accumulating the operation's weight at the resulting tuple.
    pub fn imp_ineq(&self, r: usize) -> Result<Vec<Vec<Rational64>>> {
        let cols = power(self.dom, r);
        let tuples: Vec<Vec<usize>> = (0..cols).map(|i| tuple_at(i, r, self.dom)).collect();
        let mut rows: BTreeSet<Vec<Rational64>> = BTreeSet::new();
        let mut columns = vec![vec![0usize; self.arity]; r];
        let mut choice = Multisets::new(cols, self.arity);
        while let Some(multiset) = choice.next() {
            for (j, column) in columns.iter_mut().enumerate() {
                for (slot, &t) in column.iter_mut().zip(multiset) {
                    *slot = tuples[t][j];
                }
            }
            let mut row = vec![Rational64::zero(); cols];
            for (op, w) in &self.entries {
                let mut y = Vec::with_capacity(r);
                for column in &columns {
                    y.push(op.evaluate(column)?);
                }
                row[lex_index(&y, self.dom)] += *w;
            }
            if row.iter().any(|v| !v.is_zero()) {
                rows.insert(row);
            }
        }
        Ok(rows.into_iter().collect())
    }

    /// A minimal generating set of the `r`-ary cost functions improved
    /// by this weighted operation, computed by the cone solver from
    /// the nonnegativity rows (each cost coordinate at least zero; at
    /// most one as well when `maxcsp`) together with the negated
    /// improvement rows.
    pub fn imp<C: ConeSolver>(
        &self,
        r: usize,
        maxcsp: bool,
        solver: &C,
    ) -> Result<Vec<CostFunction>> {
        let n = power(self.dom, r);
        let mut system = IneqSystem::new(n);
        let mut row = vec![0.0; n + 1];
        for i in 0..n {
            row[i + 1] = 1.0;
            system.push_row(&row);
            row[i + 1] = 0.0;
        }
        if maxcsp {
            row[0] = 1.0;
            for i in 0..n {
                row[i + 1] = -1.0;
                system.push_row(&row);
                row[i + 1] = 0.0;
            }
            row[0] = 0.0;
        }
        for ineq in self.imp_ineq(r)? {
            let mut negated = vec![0.0; n + 1];
            for (slot, v) in negated[1..].iter_mut().zip(&ineq) {
                *slot = -v.to_f64().unwrap_or(f64::NAN);
            }
            system.push_row(&negated);
        }
        info!(
            "imp: requesting extreme rays of a {}-row system in {} cost coordinates",
            system.len(),
            n
        );
        let rays = solver.extreme_rays(&system)?;
        let mut result = Vec::with_capacity(rays.len());
        for ray in rays {
            let costs: Vec<Rational64> = ray
                .iter()
                .map(|&v| round_to_digits(v, self.dom))
                .collect();
            result.push(CostFunction::new(r, self.dom, costs)?);
        }
        Ok(result)
    }

    /// Whether this weighted operation improves `cf`. On failure the
    /// first violated inequality row (under the sorted row order of
    /// [`imp_ineq`](WeightedOperation::imp_ineq)) is returned as a
    /// certificate.
    pub fn improves(&self, cf: &CostFunction) -> Result<Improvement> {
        if cf.dom() != self.dom {
            return Err(Error::Domain {
                value: cf.dom(),
                dom: self.dom,
            });
        }
        let costs = cf.cost_tuple();
        for row in self.imp_ineq(cf.arity())? {
            let value = row
                .iter()
                .zip(costs)
                .filter(|(r, _)| !r.is_zero())
                .fold(Rational64::zero(), |acc, (r, c)| acc + *r * *c);
            if value > Rational64::zero() {
                return Ok(Improvement::Violated(row));
            }
        }
        Ok(Improvement::Improved)
    }

    /// The clone generated by the support at the given arity, lifting
    /// lower-arity support operations through the canonical initial
    /// projections first.
    pub fn generated_clone(&self, arity: usize) -> Result<CloneSet> {
        let mut seeds = Vec::with_capacity(self.entries.len());
        for op in self.support() {
            seeds.push(op.lift(arity)?);
        }
        CloneSet::generate(&seeds, arity)
    }

    /// The translations of this weighted operation by `arity`-tuples
    /// of clone elements, as sorted deduplicated rows over clone
    /// positions, under the default row filter. Defaults to the clone
    /// generated by the support when none is given.
    pub fn translations(
        &self,
        arity: usize,
        clone: Option<&CloneSet>,
    ) -> Result<Vec<Vec<Rational64>>> {
        self.translations_filtered(arity, clone, TranslationFilter::default())
    }

    /// [`translations`](WeightedOperation::translations) under an
    /// explicit row filter.
    pub fn translations_filtered(
        &self,
        arity: usize,
        clone: Option<&CloneSet>,
        filter: TranslationFilter,
    ) -> Result<Vec<Vec<Rational64>>> {
        let generated;
        let clone = match clone {
            Some(c) => c,
            None => {
                generated = self.generated_clone(arity)?;
                &generated
            }
        };
        let n = clone.len();
        let mut rows: BTreeSet<Vec<Rational64>> = BTreeSet::new();
        let mut operands: Vec<Operation> = Vec::with_capacity(self.arity);
        let mut choice = Functions::new(self.arity, n);
        while let Some(t) = choice.next() {
            operands.clear();
            operands.extend(t.iter().map(|&j| clone[j].clone()));
            let mut row = vec![Rational64::zero(); n];
            for (op, w) in &self.entries {
                let composed = op.compose(&operands)?;
                let position = clone
                    .position(&composed)
                    .ok_or(Error::SupportNotInClone)?;
                row[position] += *w;
            }
            let keep = match filter {
                TranslationFilter::DropZeroRows => row.iter().any(|v| !v.is_zero()),
                TranslationFilter::FullSupport => row.iter().all(|v| !v.is_zero()),
            };
            if keep {
                rows.insert(row);
            }
        }
        debug!("{} distinct translations over a clone of {n}", rows.len());
        Ok(rows.into_iter().collect())
    }

    /// Decide whether `other` lies in the weighted clone generated by
    /// this weighted operation over the supporting clone (generated
    /// from the support by default). Every supported operation of
    /// `other` must belong to the clone. Exactly one of the primal
    /// combination program and the dual separation program is
    /// feasible; the matching certificate is returned.
    pub fn in_wclone<L: LpSolver>(
        &self,
        other: &WeightedOperation,
        clone: Option<&CloneSet>,
        lp: &L,
    ) -> Result<Membership> {
        if other.dom != self.dom {
            return Err(Error::Domain {
                value: other.dom,
                dom: self.dom,
            });
        }
        let generated;
        let clone = match clone {
            Some(c) => c,
            None => {
                generated = self.generated_clone(other.arity)?;
                &generated
            }
        };
        for op in other.support() {
            if !clone.contains(op) {
                return Err(Error::SupportNotInClone);
            }
        }
        let rows = self.translations(other.arity, Some(clone))?;
        decide_membership(self.dom, other, clone, &rows, lp)
    }

    /// A generating set of the `k`-ary part of the weighted clone:
    /// convert the translations to inequality form, force every
    /// non-projection clone coordinate nonnegative, and read the
    /// extreme rays back as weighted operations.
    pub fn wclone<C: ConeSolver>(
        &self,
        k: usize,
        clone: Option<&CloneSet>,
        solver: &C,
    ) -> Result<Vec<WeightedOperation>> {
        let generated;
        let clone = match clone {
            Some(c) => c,
            None => {
                generated = self.generated_clone(k)?;
                &generated
            }
        };
        let n = clone.len();
        let t_rows = self.translations(k, Some(clone))?;
        let mut generators = GeneratorSystem::new(n);
        for row in &t_rows {
            let coords: Vec<f64> = row.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect();
            generators.push_ray(&coords);
        }
        let mut system = solver.inequalities(&generators)?;
        // the first k clone elements are the projections; everything
        // after them must not go negative
        let mut row = vec![0.0; n + 1];
        for i in k..n {
            row[i + 1] = 1.0;
            system.push_row(&row);
            row[i + 1] = 0.0;
        }
        let system = solver.canonicalize(system)?;
        let rays = solver.extreme_rays(&system)?;
        let mut result = Vec::with_capacity(rays.len());
        for ray in rays {
            let wop = decode_ray(&ray, clone, k, self.dom, false)?;
            if wop.support_len() == 0 {
                debug!("dropping trivial ray");
                continue;
            }
            result.push(wop);
        }
        Ok(result)
    }
}

/// Decode one solver ray over clone coordinates into a weighted
/// operation, rounding each coordinate to `dom` decimal digits and
/// negating when the system's unknowns are negated weights.
pub(crate) fn decode_ray(
    ray: &[f64],
    clone: &CloneSet,
    arity: usize,
    dom: usize,
    negate: bool,
) -> Result<WeightedOperation> {
    let mut pairs = Vec::new();
    for (j, &v) in ray.iter().enumerate().take(clone.len()) {
        let mut value = round_to_digits(v, dom);
        if negate {
            value = -value;
        }
        if !value.is_zero() {
            pairs.push((clone[j].clone(), value));
        }
    }
    WeightedOperation::new(arity, dom, pairs)
}

/// The shared primal/dual decision behind
/// [`WeightedOperation::in_wclone`], parameterised by the translation
/// rows so specialised enumerations can reuse it.
pub(crate) fn decide_membership<L: LpSolver>(
    dom: usize,
    other: &WeightedOperation,
    clone: &CloneSet,
    rows: &[Vec<Rational64>],
    lp: &L,
) -> Result<Membership> {
    for op in other.support() {
        if !clone.contains(op) {
            return Err(Error::SupportNotInClone);
        }
    }
    let n = clone.len();

    // primal: nonnegative coefficients over the translations matching
    // the candidate's weight on every clone coordinate
    let mut primal = LpProblem::new(rows.len(), true);
    for j in 0..n {
        let coeffs: Vec<f64> = rows
            .iter()
            .map(|row| row[j].to_f64().unwrap_or(f64::NAN))
            .collect();
        let rhs = other.weight(&clone[j]).to_f64().unwrap_or(f64::NAN);
        primal.add(coeffs, Relation::Eq, rhs);
    }
    info!(
        "membership: primal program with {} translations over a clone of {n}",
        rows.len()
    );
    if let LpSolution::Feasible(y) = lp.solve(&primal)? {
        let mut combination = Vec::new();
        for (coeff, row) in y.iter().zip(rows) {
            let rounded = round_to_digits(*coeff, dom);
            if !rounded.is_zero() {
                combination.push((rounded, row.clone()));
            }
        }
        return Ok(Membership::Inside {
            clone: clone.clone(),
            combination,
        });
    }

    // dual: a cost assignment on clone elements that every translation
    // improves while the candidate strictly does not
    let mut dual = LpProblem::new(n, false);
    for row in rows {
        let coeffs: Vec<f64> = row.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect();
        dual.add(coeffs, Relation::Le, 0.0);
    }
    let mut objective = vec![0.0; n];
    for (op, w) in other.iter() {
        let j = clone.position(op).ok_or(Error::SupportNotInClone)?;
        objective[j] += w.to_f64().unwrap_or(f64::NAN);
    }
    dual.add(objective, Relation::Ge, 1.0);
    info!("membership: primal infeasible, solving the separation program");
    match lp.solve(&dual)? {
        LpSolution::Feasible(z) => Ok(Membership::Separated {
            clone: clone.clone(),
            costs: z.iter().map(|&v| round_to_digits(v, dom)).collect(),
        }),
        LpSolution::Infeasible => Err(Error::Duality),
    }
}

impl PartialEq for WeightedOperation {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity
            && self.dom == other.dom
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(op, w)| other.weight(op) == *w)
    }
}

impl Eq for WeightedOperation {}

impl Hash for WeightedOperation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let h = self.memo.get_or_init(|| {
            // order-independent fold over the support
            let mut acc: u64 = 0;
            for (op, w) in &self.entries {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                op.hash(&mut hasher);
                w.hash(&mut hasher);
                acc = acc.wrapping_add(hasher.finish());
            }
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.arity.hash(&mut hasher);
            self.dom.hash(&mut hasher);
            acc.hash(&mut hasher);
            hasher.finish()
        });
        state.write_u64(h);
    }
}

impl fmt::Display for WeightedOperation {
    /// One header line `wop <arity> <dom> <n>`, then one
    /// `<weight> <operation>` line per supported operation, sorted by
    /// weight and then by operation text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "wop {} {} {}", self.arity, self.dom, self.entries.len())?;
        let mut lines: Vec<(Rational64, String)> = self
            .entries
            .iter()
            .map(|(op, w)| (*w, op.to_string()))
            .collect();
        lines.sort();
        for (w, op) in lines {
            writeln!(f, "{w} {op}")?;
        }
        Ok(())
    }
}

impl FromStr for WeightedOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| Error::Invalid("empty weighted operation".into()))?;
        let mut fields = header.split_whitespace();
        if fields.next() != Some("wop") {
            return Err(Error::Invalid("expected a `wop` header".into()));
        }
        let parse = |field: Option<&str>| -> Result<usize> {
            field
                .ok_or_else(|| Error::Invalid("truncated `wop` header".into()))?
                .parse()
                .map_err(|_| Error::Invalid("malformed `wop` header".into()))
        };
        let arity = parse(fields.next())?;
        let dom = parse(fields.next())?;
        let count = parse(fields.next())?;
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let line = lines
                .next()
                .ok_or_else(|| Error::Invalid("missing weighted-operation entry".into()))?;
            let (weight, op) = line
                .trim()
                .split_once(' ')
                .ok_or_else(|| Error::Invalid("malformed weighted-operation entry".into()))?;
            let weight: Rational64 = weight
                .parse()
                .map_err(|_| Error::Invalid(format!("malformed weight {weight:?}")))?;
            pairs.push((op.parse::<Operation>()?, weight));
        }
        if lines.next().is_some() {
            return Err(Error::Invalid("trailing weighted-operation entries".into()));
        }
        WeightedOperation::new(arity, dom, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64) -> Rational64 {
        Rational64::from_integer(n)
    }

    fn min2() -> Operation {
        Operation::explicit(2, 2, vec![0, 0, 0, 1]).unwrap()
    }

    fn max2() -> Operation {
        Operation::explicit(2, 2, vec![0, 1, 1, 1]).unwrap()
    }

    fn proj2() -> [Operation; 2] {
        [
            Operation::projection(2, 2, 0).unwrap(),
            Operation::projection(2, 2, 1).unwrap(),
        ]
    }

    /// The submodularity weighted operation −x −y +min +max.
    fn sm() -> WeightedOperation {
        let [p0, p1] = proj2();
        WeightedOperation::from_parts(
            2,
            2,
            vec![p0, p1, min2(), max2()],
            vec![rat(-1), rat(-1), rat(1), rat(1)],
        )
        .unwrap()
    }

    /// An unbalanced variant: −2x −2y +min +3max.
    fn nsm() -> WeightedOperation {
        let [p0, p1] = proj2();
        WeightedOperation::from_parts(
            2,
            2,
            vec![p0, p1, min2(), max2()],
            vec![rat(-2), rat(-2), rat(1), rat(3)],
        )
        .unwrap()
    }

    fn int_rows(rows: &[Vec<i64>]) -> Vec<Vec<Rational64>> {
        rows.iter()
            .map(|row| row.iter().map(|&v| rat(v)).collect())
            .collect()
    }

    #[test]
    fn accumulation_and_weights() {
        let [p0, _] = proj2();
        let double_max = WeightedOperation::from_parts(
            2,
            2,
            vec![p0.clone(), max2(), max2()],
            vec![rat(-1), rat(1), rat(1)],
        )
        .unwrap();
        assert_eq!(double_max.weight(&max2()), rat(2));
        assert_eq!(double_max.weight(&min2()), rat(0));
        assert_eq!(double_max.support_len(), 2);
        // cancelling weights drop the entry
        let cancelled = WeightedOperation::from_parts(
            2,
            2,
            vec![max2(), max2()],
            vec![rat(1), rat(-1)],
        )
        .unwrap();
        assert_eq!(cancelled.support_len(), 0);
    }

    #[test]
    fn equality_ignores_order() {
        let [p0, p1] = proj2();
        let sm2 = WeightedOperation::from_parts(
            2,
            2,
            vec![p0, p1, max2(), min2()],
            vec![rat(-1), rat(-1), rat(1), rat(1)],
        )
        .unwrap();
        assert_eq!(sm(), sm2);
        assert_ne!(sm(), nsm());
        use std::collections::hash_map::DefaultHasher;
        let digest = |w: &WeightedOperation| {
            let mut h = DefaultHasher::new();
            w.hash(&mut h);
            h.finish()
        };
        assert_eq!(digest(&sm()), digest(&sm2));
    }

    #[test]
    fn imp_ineq_binary() {
        assert_eq!(sm().imp_ineq(2).unwrap(), int_rows(&[vec![1, -1, -1, 1]]));
        let mut expected = int_rows(&[
            vec![-1, 1, 0, 0],
            vec![-1, 0, 1, 0],
            vec![-1, 0, 0, 1],
            vec![1, -2, -2, 3],
            vec![0, -1, 0, 1],
            vec![0, 0, -1, 1],
        ]);
        expected.sort();
        assert_eq!(nsm().imp_ineq(2).unwrap(), expected);
    }

    #[test]
    fn imp_ineq_ternary() {
        let mut expected = int_rows(&[
            vec![1, -1, -1, 1, 0, 0, 0, 0],
            vec![1, -1, 0, 0, -1, 1, 0, 0],
            vec![1, -1, 0, 0, 0, 0, -1, 1],
            vec![1, 0, -1, 0, -1, 0, 1, 0],
            vec![1, 0, -1, 0, 0, -1, 0, 1],
            vec![1, 0, 0, -1, -1, 0, 0, 1],
            vec![0, 1, 0, -1, 0, -1, 0, 1],
            vec![0, 0, 1, -1, 0, 0, -1, 1],
            vec![0, 0, 0, 0, 1, -1, -1, 1],
        ]);
        expected.sort();
        assert_eq!(sm().imp_ineq(3).unwrap(), expected);
    }

    #[test]
    fn improvement_certificates() {
        let cf1 = CostFunction::new(2, 2, vec![rat(0), rat(0), rat(1), rat(1)]).unwrap();
        assert!(sm().improves(&cf1).unwrap().is_improved());
        assert_eq!(
            nsm().improves(&cf1).unwrap(),
            Improvement::Violated(int_rows(&[vec![-1, 0, 0, 1]]).remove(0))
        );
        let cf3 = CostFunction::new(
            3,
            2,
            [1, 0, 1, 0, 1, 0, 0, 0].iter().map(|&v| rat(v)).collect(),
        )
        .unwrap();
        assert_eq!(
            sm().improves(&cf3).unwrap(),
            Improvement::Violated(int_rows(&[vec![0, 0, 0, 0, 1, -1, -1, 1]]).remove(0))
        );
    }

    #[test]
    fn translations_of_submodularity() {
        assert_eq!(
            sm().translations(2, None).unwrap(),
            int_rows(&[vec![-1, -1, 1, 1]])
        );
        // the stricter filter agrees on this instance
        assert_eq!(
            sm().translations_filtered(2, None, TranslationFilter::FullSupport)
                .unwrap(),
            int_rows(&[vec![-1, -1, 1, 1]])
        );
    }

    #[test]
    fn display_round_trip() {
        for wop in [sm(), nsm()] {
            let parsed: WeightedOperation = wop.to_string().parse().unwrap();
            assert_eq!(parsed, wop);
        }
    }
}

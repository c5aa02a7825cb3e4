//! Cost functions and their weighted polymorphisms.
//!
//! A [`CostFunction`] is a total map from `[dom]^arity` into the
//! rationals, stored as its cost table in lexicographic tuple order.
//! Besides evaluation it owns the inequality builders that
//! characterise its weighted polymorphisms over a supporting clone:
//! [`wop_ineq`](CostFunction::wop_ineq) pins the shape of a weighted
//! operation (projections alone may go negative, weights sum to zero)
//! and [`wpol_ineq`](CostFunction::wpol_ineq) pins the improvement
//! inequalities. [`wpol`](CostFunction::wpol) feeds both to a cone
//! solver and decodes the extreme rays as weighted operations.
//!
//! In all these systems the unknowns are the *negated* weights over
//! the clone coordinates; decoding negates each rounded ray
//! coordinate.

use crate::clone::CloneSet;
use crate::combinatorics::{lex_index, power};
use crate::error::{Error, Result};
use crate::iterators::{Functions, MixedRadix, StreamingIterator};
use crate::operation::HashMemo;
use crate::solver::{ConeSolver, IneqSystem, LpProblem, LpSolution, LpSolver, Relation};
use crate::weighted::{WeightedOperation, decode_ray};
use log::{debug, info};
use num::ToPrimitive;
use num::Zero;
use num::rational::Rational64;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A total, finite-valued cost function on tuples over a finite
/// domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostFunction {
    arity: usize,
    dom: usize,
    costs: Vec<Rational64>,
    memo: HashMemo,
}

impl CostFunction {
    /// Wrap a cost table in lexicographic tuple order; it must have
    /// `dom^arity` entries.
    pub fn new(arity: usize, dom: usize, costs: Vec<Rational64>) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        let expected = power(dom, arity);
        if costs.len() != expected {
            return Err(Error::Invalid(format!(
                "cost table of length {} where {dom}^{arity} = {expected} entries were expected",
                costs.len()
            )));
        }
        Ok(Self {
            arity,
            dom,
            costs,
            memo: HashMemo::default(),
        })
    }

    /// Build from (tuple, cost) entries covering every tuple exactly
    /// once.
    pub fn from_entries(
        arity: usize,
        dom: usize,
        entries: &[(Vec<usize>, Rational64)],
    ) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        let mut costs: Vec<Option<Rational64>> = vec![None; power(dom, arity)];
        for (tuple, cost) in entries {
            Error::check_input(tuple, arity, dom)?;
            let slot = &mut costs[lex_index(tuple, dom)];
            if slot.is_some() {
                return Err(Error::Invalid(format!("duplicate cost entry for {tuple:?}")));
            }
            *slot = Some(*cost);
        }
        let costs = costs
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Invalid("cost table does not cover every tuple".into()))?;
        Self::new(arity, dom, costs)
    }

    /// A cost function with integer costs drawn uniformly from
    /// `0..=max_cost`, for experiments and tests.
    pub fn random<R: Rng>(arity: usize, dom: usize, max_cost: i64, rng: &mut R) -> Result<Self> {
        if dom == 0 {
            return Err(Error::Invalid("empty domain".into()));
        }
        let costs = (0..power(dom, arity))
            .map(|_| Rational64::from_integer(rng.random_range(0..=max_cost)))
            .collect();
        Self::new(arity, dom, costs)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn dom(&self) -> usize {
        self.dom
    }

    /// The cost of one tuple.
    pub fn evaluate(&self, x: &[usize]) -> Result<Rational64> {
        Error::check_input(x, self.arity, self.dom)?;
        Ok(self.costs[lex_index(x, self.dom)])
    }

    /// The cost table in lexicographic tuple order.
    pub fn cost_tuple(&self) -> &[Rational64] {
        &self.costs
    }

    /// The inequality rows stating that an assignment over the clone
    /// coordinates is (the negation of) a weighted operation: every
    /// non-projection coordinate is sign-restricted and the
    /// coordinates sum to zero. Without a clone the coordinate count
    /// defaults to the number of all `arity`-ary operations on the
    /// domain, `dom^(dom^arity)`.
    pub fn wop_ineq(&self, arity: usize, clone: Option<&CloneSet>) -> Vec<Vec<Rational64>> {
        let n = match clone {
            Some(c) => c.len(),
            None => power(self.dom, power(self.dom, arity)),
        };
        let zero = Rational64::zero();
        let one = Rational64::from_integer(1);
        let mut rows = Vec::with_capacity(n - arity + 2);
        for i in arity..n {
            let mut row = vec![zero; n + 1];
            row[i + 1] = -one;
            rows.push(row);
        }
        let mut sum = vec![one; n + 1];
        sum[0] = zero;
        rows.push(sum);
        let mut sum = vec![-one; n + 1];
        sum[0] = zero;
        rows.push(sum);
        rows
    }

    /// The improvement rows a weighted polymorphism of this cost
    /// function must satisfy over the clone coordinates. One row per
    /// tableau built from zero-cost and nonzero-cost tuples with at
    /// least one nonzero-cost slot; tableaux of zero-cost tuples alone
    /// are added (nontrivial rows only) exactly when some cost is
    /// strictly positive, which rules out the trivial zero weighting.
    /// Rows keep first-emission order, with duplicates suppressed.
    pub fn wpol_ineq(&self, arity: usize, clone: &CloneSet) -> Result<Vec<Vec<Rational64>>> {
        let n = clone.len();
        let r = self.arity;
        let zero = Rational64::zero();

        let mut zero_cost: Vec<Vec<usize>> = Vec::new();
        let mut nonzero_cost: Vec<Vec<usize>> = Vec::new();
        let mut positive = false;
        let mut tuples = Functions::new(r, self.dom);
        while let Some(x) = tuples.next() {
            let cost = self.costs[lex_index(x, self.dom)];
            if cost.is_zero() {
                zero_cost.push(x.to_vec());
            } else {
                nonzero_cost.push(x.to_vec());
                if cost > zero {
                    positive = true;
                }
            }
        }

        let mut rows: Vec<Vec<Rational64>> = Vec::new();
        let mut seen: HashSet<Vec<Rational64>> = HashSet::new();
        let mut columns = vec![vec![0usize; arity]; r];

        // tableaux containing at least one nonzero-cost tuple
        let mut statuses = Functions::new(arity, 2);
        while let Some(status) = statuses.next() {
            if status.iter().all(|&s| s == 0) {
                continue;
            }
            let pools: Vec<&[Vec<usize>]> = status
                .iter()
                .map(|&s| {
                    if s == 0 {
                        zero_cost.as_slice()
                    } else {
                        nonzero_cost.as_slice()
                    }
                })
                .collect();
            self.emit_wpol_rows(clone, &pools, &mut columns, &mut rows, &mut seen, false)?;
        }

        // all-zero-cost tableaux matter only with positive costs around
        if positive {
            let pools: Vec<&[Vec<usize>]> = (0..arity).map(|_| zero_cost.as_slice()).collect();
            self.emit_wpol_rows(clone, &pools, &mut columns, &mut rows, &mut seen, true)?;
        }
        debug!(
            "{} weighted-polymorphism rows for a clone of {n}",
            rows.len()
        );
        Ok(rows)
    }

    // One improvement row per tableau assembled from the pools; the
    // columns buffer is scratch space shared across calls.
    fn emit_wpol_rows(
        &self,
        clone: &CloneSet,
        pools: &[&[Vec<usize>]],
        columns: &mut [Vec<usize>],
        rows: &mut Vec<Vec<Rational64>>,
        seen: &mut HashSet<Vec<Rational64>>,
        skip_trivial: bool,
    ) -> Result<()> {
        let n = clone.len();
        let r = self.arity;
        let zero = Rational64::zero();
        let mut selection = MixedRadix::new(pools.iter().map(|p| p.len()).collect());
        while let Some(sel) = selection.next() {
            for (j, column) in columns.iter_mut().enumerate() {
                for (slot, (&s, pool)) in column.iter_mut().zip(sel.iter().zip(pools)) {
                    *slot = pool[s][j];
                }
            }
            let mut row = vec![zero; n + 1];
            let mut trivial = true;
            for (i, op) in clone.iter().enumerate() {
                let mut y = Vec::with_capacity(r);
                for column in columns.iter() {
                    y.push(op.evaluate(column)?);
                }
                let cost = self.costs[lex_index(&y, self.dom)];
                if !cost.is_zero() {
                    trivial = false;
                }
                row[i + 1] = cost;
            }
            if skip_trivial && trivial {
                continue;
            }
            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }
        Ok(())
    }

    /// The weighted polymorphisms of this cost function at the given
    /// arity: a generating set of the cone cut out by
    /// [`wop_ineq`](CostFunction::wop_ineq) and
    /// [`wpol_ineq`](CostFunction::wpol_ineq), decoded from the cone
    /// solver's extreme rays. Defaults to the clone of all operations
    /// of that arity.
    pub fn wpol<C: ConeSolver>(
        &self,
        arity: usize,
        clone: Option<&CloneSet>,
        solver: &C,
    ) -> Result<Vec<WeightedOperation>> {
        common_wpol(
            std::slice::from_ref(self),
            arity,
            clone,
            false,
            solver,
        )
    }
}

impl Hash for CostFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let h = self.memo.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.arity.hash(&mut hasher);
            self.dom.hash(&mut hasher);
            self.costs.hash(&mut hasher);
            hasher.finish()
        });
        state.write_u64(h);
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cost {} {}", self.arity, self.dom)?;
        for c in &self.costs {
            write!(f, " {c}")?;
        }
        Ok(())
    }
}

impl FromStr for CostFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut iter = s.split_whitespace();
        if iter.next() != Some("cost") {
            return Err(Error::Invalid("expected a `cost` record".into()));
        }
        let mut parse_usize = |what: &str| -> Result<usize> {
            iter.next()
                .ok_or_else(|| Error::Invalid(format!("missing {what}")))?
                .parse()
                .map_err(|_| Error::Invalid(format!("malformed {what}")))
        };
        let arity = parse_usize("arity")?;
        let dom = parse_usize("domain")?;
        let mut costs = Vec::with_capacity(power(dom, arity));
        for _ in 0..power(dom, arity) {
            let field = iter
                .next()
                .ok_or_else(|| Error::Invalid("missing cost entry".into()))?;
            costs.push(
                field
                    .parse()
                    .map_err(|_| Error::Invalid(format!("malformed cost {field:?}")))?,
            );
        }
        if iter.next().is_some() {
            return Err(Error::Invalid("trailing input after cost table".into()));
        }
        CostFunction::new(arity, dom, costs)
    }
}

/// The weighted operations improving every one of the given cost
/// functions at once. With `multimorphisms`, each projection weight is
/// additionally pinned to one. Defaults to the clone of all
/// `arity`-ary operations on the common domain.
pub fn common_wpol<C: ConeSolver>(
    cost_functions: &[CostFunction],
    arity: usize,
    clone: Option<&CloneSet>,
    multimorphisms: bool,
    solver: &C,
) -> Result<Vec<WeightedOperation>> {
    let Some(first) = cost_functions.first() else {
        return Ok(Vec::new());
    };
    let dom = first.dom;
    for cf in cost_functions {
        if cf.dom != dom {
            return Err(Error::Domain { value: cf.dom, dom });
        }
    }
    let generated;
    let clone = match clone {
        Some(c) => c,
        None => {
            generated = CloneSet::all_operations(arity, dom)?;
            &generated
        }
    };
    let n = clone.len();
    let zero = Rational64::zero();
    let one = Rational64::from_integer(1);

    let mut rows = first.wop_ineq(arity, Some(clone));
    if multimorphisms {
        for i in 0..arity {
            let mut row = vec![zero; n + 1];
            row[0] = one;
            row[i + 1] = one;
            rows.push(row.clone());
            row[0] = -one;
            row[i + 1] = -one;
            rows.push(row);
        }
    }
    let mut seen: HashSet<Vec<Rational64>> = rows.iter().cloned().collect();
    for cf in cost_functions {
        for row in cf.wpol_ineq(arity, clone)? {
            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }
    }

    let mut system = IneqSystem::new(n);
    for row in &rows {
        let frow: Vec<f64> = row.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect();
        system.push_row(&frow);
    }
    info!(
        "wpol: requesting extreme rays of a {}-row system over a clone of {n}",
        system.len()
    );
    let rays = solver.extreme_rays(&system)?;
    let mut result = Vec::with_capacity(rays.len());
    for ray in rays {
        let wop = decode_ray(&ray, clone, arity, dom, true)?;
        if wop.support_len() > 0 {
            result.push(wop);
        }
    }
    Ok(result)
}

/// Search for a weighted operation that satisfies the
/// weighted-operation sign rows and the improvement rows of every
/// target cost function while violating at least one improvement row
/// of the candidate — a witness that the candidate is not expressible
/// over the targets. One feasibility program is solved per candidate
/// row; the first feasible one is decoded (negated, rounded) and
/// returned.
pub fn separating_wpol<L: LpSolver>(
    targets: &[CostFunction],
    candidate: &CostFunction,
    arity: usize,
    clone: Option<&CloneSet>,
    lp: &L,
) -> Result<Option<WeightedOperation>> {
    let dom = candidate.dom;
    for cf in targets {
        if cf.dom != dom {
            return Err(Error::Domain { value: cf.dom, dom });
        }
    }
    let generated;
    let clone = match clone {
        Some(c) => c,
        None => {
            generated = CloneSet::all_operations(arity, dom)?;
            &generated
        }
    };
    let n = clone.len();

    let mut constraints = candidate.wop_ineq(arity, Some(clone));
    for cf in targets {
        constraints.extend(cf.wpol_ineq(arity, clone)?);
    }

    for (i, violated) in candidate.wpol_ineq(arity, clone)?.into_iter().enumerate() {
        let mut problem = LpProblem::new(n, false);
        for row in &constraints {
            let coeffs: Vec<f64> = row[1..]
                .iter()
                .map(|v| v.to_f64().unwrap_or(f64::NAN))
                .collect();
            let rhs = -row[0].to_f64().unwrap_or(f64::NAN);
            problem.add(coeffs, Relation::Ge, rhs);
        }
        // strict violation of the candidate row, normalised by cone scaling
        let coeffs: Vec<f64> = violated[1..]
            .iter()
            .map(|v| v.to_f64().unwrap_or(f64::NAN))
            .collect();
        problem.add(coeffs, Relation::Le, -1.0);
        debug!("separation attempt against candidate row {i}");
        if let LpSolution::Feasible(y) = lp.solve(&problem)? {
            let wop = decode_ray(&y, clone, arity, dom, true)?;
            if wop.support_len() > 0 {
                return Ok(Some(wop));
            }
        }
    }
    Ok(None)
}

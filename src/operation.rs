//! The central operation value type.
//!
//! An [`Operation`] is a total function `[dom]^arity → [dom]`. It
//! wraps one of the concrete representations of
//! [`operations`](crate::operations) behind a closed variant set, so
//! that equality and hashing are always those of the full value table
//! in lexicographic input order, whatever the representation.
//! Representation-pair shortcuts (projection indices, Sperner
//! families, canonical dispatch vectors) are layered on top of that
//! contract, never beside it.
//!
//! Operations are immutable values; composition, restriction,
//! identification and lifting all build fresh operations. The only
//! interior state is a write-once memo of the value-table hash.

use crate::combinatorics::power;
use crate::error::{Error, Result};
use crate::iterators::{Choose, Functions, StreamingIterator};
use crate::operations::{BinaryOperation, ExplicitOperation, MinMax, Projection, SharpTernary};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

/// Write-once memo for a value hash. Transparent to equality and
/// cloning: an unfilled memo and a filled one compare equal, and
/// refilling always reproduces the same value.
#[derive(Debug, Default)]
pub(crate) struct HashMemo(OnceLock<u64>);

impl HashMemo {
    pub(crate) fn get_or_init(&self, f: impl FnOnce() -> u64) -> u64 {
        *self.0.get_or_init(f)
    }

    fn get(&self) -> Option<u64> {
        self.0.get().copied()
    }
}

impl Clone for HashMemo {
    fn clone(&self) -> Self {
        let memo = OnceLock::new();
        if let Some(&v) = self.0.get() {
            let _ = memo.set(v);
        }
        Self(memo)
    }
}

impl PartialEq for HashMemo {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for HashMemo {}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Repr {
    Projection(Projection),
    Explicit(ExplicitOperation),
    Binary(BinaryOperation),
    Sharp(SharpTernary),
    MinMax(MinMax),
}

/// A total operation on a finite domain.
#[derive(Clone, Debug)]
pub struct Operation {
    repr: Repr,
    memo: HashMemo,
}

impl From<Projection> for Operation {
    fn from(p: Projection) -> Self {
        Self::wrap(Repr::Projection(p))
    }
}

impl From<ExplicitOperation> for Operation {
    fn from(f: ExplicitOperation) -> Self {
        Self::wrap(Repr::Explicit(f))
    }
}

impl From<BinaryOperation> for Operation {
    fn from(f: BinaryOperation) -> Self {
        Self::wrap(Repr::Binary(f))
    }
}

impl From<SharpTernary> for Operation {
    fn from(f: SharpTernary) -> Self {
        Self::wrap(Repr::Sharp(f))
    }
}

impl From<MinMax> for Operation {
    fn from(f: MinMax) -> Self {
        Self::wrap(Repr::MinMax(f))
    }
}

impl Operation {
    fn wrap(repr: Repr) -> Self {
        Self {
            repr,
            memo: HashMemo::default(),
        }
    }

    /// The projection to coordinate `index`.
    pub fn projection(arity: usize, dom: usize, index: usize) -> Result<Self> {
        Projection::new(arity, dom, index).map(Into::into)
    }

    /// An operation from its value table in lexicographic input order.
    pub fn explicit(arity: usize, dom: usize, table: Vec<usize>) -> Result<Self> {
        ExplicitOperation::new(arity, dom, table).map(Into::into)
    }

    pub fn arity(&self) -> usize {
        match &self.repr {
            Repr::Projection(p) => p.arity(),
            Repr::Explicit(f) => f.arity(),
            Repr::Binary(f) => f.arity(),
            Repr::Sharp(f) => f.arity(),
            Repr::MinMax(f) => f.arity(),
        }
    }

    pub fn dom(&self) -> usize {
        match &self.repr {
            Repr::Projection(p) => p.dom(),
            Repr::Explicit(f) => f.dom(),
            Repr::Binary(f) => f.dom(),
            Repr::Sharp(f) => f.dom(),
            Repr::MinMax(f) => f.dom(),
        }
    }

    /// The min/max structure, when this operation carries one.
    pub fn as_min_max(&self) -> Option<&MinMax> {
        match &self.repr {
            Repr::MinMax(f) => Some(f),
            _ => None,
        }
    }

    /// The binary structure, when this operation carries one.
    pub fn as_binary(&self) -> Option<&BinaryOperation> {
        match &self.repr {
            Repr::Binary(f) => Some(f),
            _ => None,
        }
    }

    /// The sharp ternary structure, when this operation carries one.
    pub fn as_sharp(&self) -> Option<&SharpTernary> {
        match &self.repr {
            Repr::Sharp(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    fn eval_unchecked(&self, x: &[usize]) -> usize {
        match &self.repr {
            Repr::Projection(p) => p.eval_unchecked(x),
            Repr::Explicit(f) => f.eval_unchecked(x),
            Repr::Binary(f) => f.eval_unchecked(x),
            Repr::Sharp(f) => f.eval_unchecked(x),
            Repr::MinMax(f) => f.eval_unchecked(x),
        }
    }

    /// Apply the operation to an input tuple.
    pub fn evaluate(&self, x: &[usize]) -> Result<usize> {
        Error::check_input(x, self.arity(), self.dom())?;
        Ok(self.eval_unchecked(x))
    }

    /// Apply the operation to the columns of a tableau of `arity` rows
    /// of equal length `r`, producing the `r`-tuple of column values.
    pub fn apply_to_tableau(&self, rows: &[Vec<usize>]) -> Result<Vec<usize>> {
        if rows.len() != self.arity() {
            return Err(Error::Arity {
                got: rows.len(),
                expected: self.arity(),
            });
        }
        let r = rows.first().map_or(0, Vec::len);
        let dom = self.dom();
        for row in rows {
            if row.len() != r {
                return Err(Error::Arity {
                    got: row.len(),
                    expected: r,
                });
            }
            for &v in row {
                if v >= dom {
                    return Err(Error::Domain { value: v, dom });
                }
            }
        }
        let mut column = vec![0; self.arity()];
        let mut result = Vec::with_capacity(r);
        for j in 0..r {
            for (i, row) in rows.iter().enumerate() {
                column[i] = row[j];
            }
            result.push(self.eval_unchecked(&column));
        }
        Ok(result)
    }

    /// The full value table, in lexicographic input order.
    pub fn value_table(&self) -> Vec<usize> {
        let mut table = Vec::with_capacity(power(self.dom(), self.arity()));
        let mut inputs = Functions::new(self.arity(), self.dom());
        while let Some(x) = inputs.next() {
            table.push(self.eval_unchecked(x));
        }
        table
    }

    // Memoized hash of (arity, dom, value table).
    fn table_hash(&self) -> u64 {
        self.memo.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.arity().hash(&mut hasher);
            self.dom().hash(&mut hasher);
            let mut inputs = Functions::new(self.arity(), self.dom());
            while let Some(x) = inputs.next() {
                self.eval_unchecked(x).hash(&mut hasher);
            }
            hasher.finish()
        })
    }

    fn check_compose(&self, operands: &[Operation]) -> Result<()> {
        if operands.len() != self.arity() {
            return Err(Error::Arity {
                got: operands.len(),
                expected: self.arity(),
            });
        }
        let arities: Vec<usize> = operands.iter().map(Operation::arity).collect();
        if arities.windows(2).any(|w| w[0] != w[1]) {
            return Err(Error::Composition { arities });
        }
        for g in operands {
            if g.dom() < self.dom() {
                return Err(Error::Domain {
                    value: g.dom(),
                    dom: self.dom(),
                });
            }
        }
        Ok(())
    }

    fn generic_compose(&self, operands: &[Operation]) -> Result<Operation> {
        let m = operands[0].arity();
        let dom = self.dom();
        let mut table = Vec::with_capacity(power(dom, m));
        let mut inner = vec![0; self.arity()];
        let mut inputs = Functions::new(m, dom);
        while let Some(x) = inputs.next() {
            for (v, g) in inner.iter_mut().zip(operands) {
                *v = g.eval_unchecked(x);
            }
            // an operand over a larger domain may escape ours
            for &v in &inner {
                if v >= dom {
                    return Err(Error::Domain { value: v, dom });
                }
            }
            table.push(self.eval_unchecked(&inner));
        }
        Ok(ExplicitOperation::new(m, dom, table)?.into())
    }

    /// The composition `self(g_1, …, g_k)` with `k = self.arity()`
    /// operations of equal arity over a domain at least as large.
    /// Representations compose algebraically where they can:
    /// projections select an operand, sharp ternary operations stay
    /// sharp, min/max operations stay in the family algebra, and
    /// binary compositions recompute their compression flags.
    pub fn compose(&self, operands: &[Operation]) -> Result<Operation> {
        self.check_compose(operands)?;
        match &self.repr {
            Repr::Projection(p) => return Ok(operands[p.index()].clone()),
            Repr::Binary(f) => {
                if f.idempotent() && operands[0] == operands[1] {
                    return Ok(operands[0].clone());
                }
                if operands[0].arity() == 2 && operands.iter().all(|g| g.dom() == self.dom()) {
                    let dom = self.dom();
                    let mut table = Vec::with_capacity(dom * dom);
                    for a in 0..dom {
                        for b in 0..dom {
                            let x = [a, b];
                            let inner = [
                                operands[0].eval_unchecked(&x),
                                operands[1].eval_unchecked(&x),
                            ];
                            table.push(f.eval_unchecked(&inner));
                        }
                    }
                    return Ok(BinaryOperation::from_full_table(dom, table)?.into());
                }
            }
            Repr::Sharp(f) => {
                if operands[0].arity() == 3 && operands.iter().all(|g| g.dom() == self.dom()) {
                    let mut sharps: Vec<SharpTernary> = Vec::with_capacity(3);
                    for g in operands {
                        match &g.repr {
                            Repr::Sharp(s) => sharps.push(s.clone()),
                            Repr::Projection(p) => {
                                sharps.push(SharpTernary::from_projection(p.dom(), p.index()))
                            }
                            _ => break,
                        }
                    }
                    if sharps.len() == 3 {
                        return Ok(f.compose_sharp([&sharps[0], &sharps[1], &sharps[2]]).into());
                    }
                }
            }
            Repr::MinMax(f) => {
                if operands.iter().all(|g| {
                    g.as_min_max()
                        .is_some_and(|m| m.dom() == self.dom())
                }) {
                    let ops: Vec<&MinMax> = operands
                        .iter()
                        .map(|g| g.as_min_max().expect("checked above"))
                        .collect();
                    return Ok(f.compose_minmax(&ops).into());
                }
            }
            Repr::Explicit(_) => {}
        }
        self.generic_compose(operands)
    }

    /// Restrict to a duplicate-free subset of the domain, relabeled to
    /// `0..set.len()`. Fails with a domain error when the subset is
    /// not closed under the operation.
    pub fn restrict(&self, set: &[usize]) -> Result<Operation> {
        if set.is_empty() {
            return Err(Error::Invalid("empty restriction set".into()));
        }
        for (i, &v) in set.iter().enumerate() {
            if v >= self.dom() {
                return Err(Error::Domain {
                    value: v,
                    dom: self.dom(),
                });
            }
            if set[..i].contains(&v) {
                return Err(Error::Invalid(format!(
                    "duplicate value {v} in restriction set"
                )));
            }
        }
        match &self.repr {
            Repr::Projection(p) => Ok(Projection::new(p.arity(), set.len(), p.index())?.into()),
            Repr::Binary(f) => Ok(f.restrict(set)?.into()),
            _ => {
                let arity = self.arity();
                let n = set.len();
                let mut table = Vec::with_capacity(power(n, arity));
                let mut x = vec![0; arity];
                let mut inputs = Functions::new(arity, n);
                while let Some(t) = inputs.next() {
                    for (v, &i) in x.iter_mut().zip(t) {
                        *v = set[i];
                    }
                    let out = self.eval_unchecked(&x);
                    match set.iter().position(|&s| s == out) {
                        Some(p) => table.push(p),
                        None => {
                            return Err(Error::Domain {
                                value: out,
                                dom: self.dom(),
                            });
                        }
                    }
                }
                Ok(ExplicitOperation::new(arity, n, table)?.into())
            }
        }
    }

    /// Equate coordinates `a` and `b` (`a < b` after reordering),
    /// producing the operation of arity one less in which the larger
    /// coordinate is removed.
    pub fn identify(&self, a: usize, b: usize) -> Result<Operation> {
        let k = self.arity();
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        if a == b || b >= k {
            return Err(Error::Invalid(format!(
                "cannot identify coordinates {a} and {b} at arity {k}"
            )));
        }
        let dom = self.dom();
        let mut table = Vec::with_capacity(power(dom, k - 1));
        let mut x = vec![0; k];
        let mut inputs = Functions::new(k - 1, dom);
        while let Some(y) = inputs.next() {
            for j in 0..k {
                x[j] = match j.cmp(&b) {
                    std::cmp::Ordering::Less => y[j],
                    std::cmp::Ordering::Equal => y[a],
                    std::cmp::Ordering::Greater => y[j - 1],
                };
            }
            table.push(self.eval_unchecked(&x));
        }
        Ok(ExplicitOperation::new(k - 1, dom, table)?.into())
    }

    /// The coordinate this operation projects to, if any. Candidate
    /// elimination over all inputs, stopping as soon as no candidate
    /// remains.
    pub fn projection_index(&self) -> Option<usize> {
        match &self.repr {
            Repr::Projection(p) => return Some(p.index()),
            Repr::MinMax(f) => {
                let family = f.family();
                return if family.len() == 1 && family[0].count_ones() == 1 {
                    Some(family[0].trailing_zeros() as usize)
                } else {
                    None
                };
            }
            _ => {}
        }
        let arity = self.arity();
        let mut candidates = vec![true; arity];
        let mut remaining = arity;
        let mut inputs = Functions::new(arity, self.dom());
        while let Some(x) = inputs.next() {
            let v = self.eval_unchecked(x);
            for i in 0..arity {
                if candidates[i] && x[i] != v {
                    candidates[i] = false;
                    remaining -= 1;
                }
            }
            if remaining == 0 {
                return None;
            }
        }
        candidates.iter().position(|&c| c)
    }

    /// Whether this operation is a projection.
    pub fn is_projection(&self) -> bool {
        self.projection_index().is_some()
    }

    /// Whether this operation is sharp: not a projection, while every
    /// identification of two coordinates is one.
    pub fn is_sharp(&self) -> bool {
        if self.arity() < 2 || self.is_projection() {
            return false;
        }
        let mut pairs = Choose::new(self.arity(), 2);
        while let Some(p) = pairs.next() {
            let identified = self
                .identify(p[0], p[1])
                .expect("valid coordinate pair");
            if !identified.is_projection() {
                return false;
            }
        }
        true
    }

    /// Reinterpret at a larger arity by composing with the canonical
    /// initial projections; the extra coordinates are ignored.
    pub fn lift(&self, arity: usize) -> Result<Operation> {
        let k = self.arity();
        if arity == k {
            return Ok(self.clone());
        }
        if arity < k {
            return Err(Error::Arity {
                got: arity,
                expected: k,
            });
        }
        match &self.repr {
            Repr::Projection(p) => Ok(Projection::new(arity, p.dom(), p.index())?.into()),
            Repr::MinMax(f) => {
                Ok(MinMax::from_family(arity, f.dom(), f.family().to_vec()).into())
            }
            _ => {
                let projections: Vec<Operation> = (0..k)
                    .map(|i| Projection::new(arity, self.dom(), i).map(Into::into))
                    .collect::<Result<_>>()?;
                self.compose(&projections)
            }
        }
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        if self.arity() != other.arity() || self.dom() != other.dom() {
            return false;
        }
        // representation-pair fast paths; all of them are canonical,
        // so a structural verdict is definitive
        match (&self.repr, &other.repr) {
            (Repr::Projection(a), Repr::Projection(b)) => return a.index() == b.index(),
            (Repr::MinMax(a), Repr::MinMax(b)) => return a.family() == b.family(),
            (Repr::Sharp(a), Repr::Sharp(b)) => {
                return a.pos() == b.pos() && a.vals() == b.vals();
            }
            _ => {}
        }
        if let (Some(h1), Some(h2)) = (self.memo.get(), other.memo.get()) {
            if h1 != h2 {
                return false;
            }
        }
        let mut inputs = Functions::new(self.arity(), self.dom());
        while let Some(x) = inputs.next() {
            if self.eval_unchecked(x) != other.eval_unchecked(x) {
                return false;
            }
        }
        true
    }
}

impl Eq for Operation {}

impl Hash for Operation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.table_hash());
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.repr {
            Repr::Projection(p) => {
                write!(f, "projection {} {} {}", p.arity(), p.dom(), p.index())
            }
            Repr::Explicit(e) => {
                write!(f, "explicit {} {}", e.arity(), e.dom())?;
                for v in e.table() {
                    write!(f, " {v}")?;
                }
                Ok(())
            }
            Repr::Binary(b) => {
                let dom = b.dom();
                write!(
                    f,
                    "binary {} {} {}",
                    dom,
                    b.commutes() as u8,
                    b.idempotent() as u8
                )?;
                for x in 0..dom {
                    for y in 0..dom {
                        if b.commutes() && y < x || b.idempotent() && y == x {
                            continue;
                        }
                        write!(f, " {}", b.eval_unchecked(&[x, y]))?;
                    }
                }
                Ok(())
            }
            Repr::Sharp(s) => {
                let [p0, p1, p2] = s.pos();
                write!(f, "sharp {} {p0} {p1} {p2}", s.dom())?;
                for v in s.vals().values() {
                    write!(f, " {v}")?;
                }
                Ok(())
            }
            Repr::MinMax(m) => {
                write!(f, "minmax {} {} {}", m.arity(), m.dom(), m.family().len())?;
                for mask in m.family() {
                    write!(f, " {mask}")?;
                }
                Ok(())
            }
        }
    }
}

fn parse_next<T: FromStr>(iter: &mut std::str::SplitWhitespace, what: &str) -> Result<T> {
    iter.next()
        .ok_or_else(|| Error::Invalid(format!("missing {what}")))?
        .parse()
        .map_err(|_| Error::Invalid(format!("malformed {what}")))
}

impl FromStr for Operation {
    type Err = Error;

    /// Parse the format produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let mut iter = s.split_whitespace();
        let tag = iter
            .next()
            .ok_or_else(|| Error::Invalid("empty operation".into()))?;
        let op = match tag {
            "projection" => {
                let arity = parse_next(&mut iter, "arity")?;
                let dom = parse_next(&mut iter, "domain")?;
                let index = parse_next(&mut iter, "index")?;
                Projection::new(arity, dom, index)?.into()
            }
            "explicit" => {
                let arity = parse_next(&mut iter, "arity")?;
                let dom: usize = parse_next(&mut iter, "domain")?;
                let mut table = Vec::new();
                for _ in 0..power(dom, arity) {
                    table.push(parse_next(&mut iter, "table entry")?);
                }
                ExplicitOperation::new(arity, dom, table)?.into()
            }
            "binary" => {
                let dom: usize = parse_next(&mut iter, "domain")?;
                let comm = parse_next::<u8>(&mut iter, "commutativity flag")? != 0;
                let idem = parse_next::<u8>(&mut iter, "idempotency flag")? != 0;
                let mut entries = Vec::new();
                for x in 0..dom {
                    for y in 0..dom {
                        if comm && y < x || idem && y == x {
                            continue;
                        }
                        entries.push(((x, y), parse_next(&mut iter, "table entry")?));
                    }
                }
                BinaryOperation::from_entries(dom, &entries, comm, idem)?.into()
            }
            "sharp" => {
                let dom: usize = parse_next(&mut iter, "domain")?;
                let pos = [
                    parse_next(&mut iter, "dispatch position")?,
                    parse_next(&mut iter, "dispatch position")?,
                    parse_next(&mut iter, "dispatch position")?,
                ];
                let mut vals = BTreeMap::new();
                // triples in the order `Display` emits them: sorted
                let mut keys: Vec<[usize; 3]> = Vec::new();
                if dom >= 3 {
                    let mut triples = crate::iterators::Injection::new(dom, 3);
                    while let Some(t) = triples.next() {
                        keys.push([t[0], t[1], t[2]]);
                    }
                    keys.sort_unstable();
                }
                for key in keys {
                    vals.insert(key, parse_next(&mut iter, "table entry")?);
                }
                SharpTernary::new(dom, pos, vals)?.into()
            }
            "minmax" => {
                let arity = parse_next(&mut iter, "arity")?;
                let dom = parse_next(&mut iter, "domain")?;
                let n: usize = parse_next(&mut iter, "family size")?;
                let mut sets = Vec::with_capacity(n);
                for _ in 0..n {
                    let mask: u32 = parse_next(&mut iter, "family mask")?;
                    let set: Vec<usize> = (0..32).filter(|i| mask & (1 << i) != 0).collect();
                    sets.push(set);
                }
                MinMax::new(arity, dom, &sets)?.into()
            }
            other => {
                return Err(Error::Invalid(format!("unknown operation kind {other:?}")));
            }
        };
        if iter.next().is_some() {
            return Err(Error::Invalid("trailing input after operation".into()));
        }
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit(arity: usize, dom: usize, table: &[usize]) -> Operation {
        Operation::explicit(arity, dom, table.to_vec()).unwrap()
    }

    fn proj(arity: usize, dom: usize, index: usize) -> Operation {
        Operation::projection(arity, dom, index).unwrap()
    }

    #[test]
    fn equality_and_errors() {
        let f = explicit(2, 2, &[1, 0, 0, 1]);
        let fcopy = explicit(2, 2, &[1, 0, 0, 1]);
        let g = explicit(2, 2, &[0, 1, 1, 1]);
        assert_eq!(f, fcopy);
        assert_ne!(f, g);
        assert_eq!(f.evaluate(&[0, 0]).unwrap(), 1);
        assert!(matches!(
            f.evaluate(&[0, 1, 0]),
            Err(Error::Arity { got: 3, expected: 2 })
        ));
        assert!(matches!(
            f.evaluate(&[0, 2]),
            Err(Error::Domain { value: 2, dom: 2 })
        ));
    }

    #[test]
    fn equality_across_representations() {
        // the first binary projection, three ways
        let p = proj(2, 2, 0);
        let e = explicit(2, 2, &[0, 0, 1, 1]);
        let m: Operation = MinMax::new(2, 2, &[vec![0]]).unwrap().into();
        assert_eq!(p, e);
        assert_eq!(p, m);
        assert_eq!(e, m);
        let mut hashes = std::collections::HashSet::new();
        for op in [&p, &e, &m] {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            op.hash(&mut h);
            hashes.insert(std::hash::Hasher::finish(&h));
        }
        assert_eq!(hashes.len(), 1);
    }

    #[test]
    fn compose_generic() {
        let g = explicit(2, 2, &[0, 1, 1, 1]);
        let big = [
            explicit(3, 2, &[0, 1, 0, 1, 0, 1, 1, 1]),
            explicit(3, 2, &[0, 0, 0, 1, 0, 1, 1, 1]),
        ];
        let h = explicit(3, 2, &[0, 1, 0, 1, 0, 1, 1, 1]);
        assert_eq!(g.compose(&big).unwrap(), h);
        let maj = explicit(3, 2, &[0, 0, 0, 1, 0, 1, 1, 1]);
        assert!(matches!(maj.compose(&big), Err(Error::Arity { .. })));
        assert!(matches!(
            g.compose(&[maj.clone(), g.clone()]),
            Err(Error::Composition { .. })
        ));
    }

    #[test]
    fn compose_projection() {
        let f = explicit(2, 2, &[1, 0, 0, 1]);
        let g = explicit(2, 2, &[0, 1, 1, 1]);
        assert_eq!(proj(2, 2, 0).compose(&[f.clone(), g.clone()]).unwrap(), f);
        assert_eq!(proj(2, 2, 1).compose(&[f.clone(), g.clone()]).unwrap(), g);
    }

    #[test]
    fn projection_detection() {
        assert!(proj(2, 2, 0).is_projection());
        assert!(explicit(2, 2, &[0, 0, 1, 1]).is_projection());
        assert_eq!(explicit(2, 2, &[0, 1, 0, 1]).projection_index(), Some(1));
        assert!(!explicit(2, 2, &[1, 0, 0, 1]).is_projection());
    }

    #[test]
    fn sharpness() {
        let maj = explicit(3, 2, &[0, 0, 0, 1, 0, 1, 1, 1]);
        let h = explicit(3, 2, &[0, 1, 0, 1, 0, 1, 1, 1]);
        assert!(maj.is_sharp());
        assert!(!h.is_sharp());
        assert!(!proj(3, 2, 0).is_sharp());
    }

    #[test]
    fn tableau_application() {
        let g = explicit(2, 2, &[0, 1, 1, 1]);
        let x = vec![vec![0, 1, 0], vec![1, 0, 0]];
        assert_eq!(g.apply_to_tableau(&x).unwrap(), vec![1, 1, 0]);
        assert!(g.apply_to_tableau(&[vec![1, 1, 0]]).is_err());
        assert!(g.apply_to_tableau(&[vec![2, 0], vec![0, 1]]).is_err());
    }

    #[test]
    fn restriction() {
        let dom3 = explicit(2, 3, &[0, 1, 0, 1, 1, 1, 0, 2, 2]);
        let g = explicit(2, 2, &[0, 1, 1, 1]);
        assert_eq!(dom3.restrict(&[0, 1]).unwrap(), g);
        assert_ne!(dom3.restrict(&[0, 2]).unwrap(), g);
        assert!(dom3.restrict(&[0, 0]).is_err());
    }

    #[test]
    fn lifting() {
        let f = explicit(2, 2, &[1, 0, 0, 1]);
        let lifted = f.lift(3).unwrap();
        assert_eq!(lifted.arity(), 3);
        for x in [[0, 0, 0], [0, 1, 1], [1, 0, 1], [1, 1, 0]] {
            assert_eq!(
                lifted.evaluate(&x).unwrap(),
                f.evaluate(&x[..2]).unwrap()
            );
        }
        let m: Operation = MinMax::min_op(2, 2).unwrap().into();
        let ml = m.lift(4).unwrap();
        assert_eq!(ml.as_min_max().unwrap().family(), &[0b11]);
        assert!(f.lift(1).is_err());
    }

    #[test]
    fn display_round_trip() {
        let ops = [
            proj(3, 4, 2),
            explicit(2, 2, &[1, 0, 0, 1]),
            BinaryOperation::from_entries(2, &[((0, 1), 0)], true, true)
                .unwrap()
                .into(),
            MinMax::new(3, 2, &[vec![0, 1], vec![2]]).unwrap().into(),
        ];
        for op in ops {
            let parsed: Operation = op.to_string().parse().unwrap();
            assert_eq!(parsed, op);
        }
    }
}

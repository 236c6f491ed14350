//! Sets of ternary assignments forming a disjunction

use crate::*;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, Mul};
use std::slice::Iter;
use std::str::FromStr;
use std::vec::IntoIter;

pub(crate) static PATTERN_SEPARATORS: [char; 4] = [',', ';', '|', '\n'];

/// A set of [TObject]s representing the union of the states they cover.
///
/// A state vector is the disjunctive form of a Boolean constraint: a state
/// satisfies the constraint when at least one member covers it. The empty
/// vector covers nothing (contradiction) and a vector containing the free
/// assignment covers everything (tautology).
///
/// Vectors combine by [multiplication](Self::multiply) (the pairwise ternary
/// conjunction of their members, i.e. the intersection of the covered sets)
/// and reduce to a canonical compact form with [simplify](Self::simplify).
///
/// A vector can be parsed from a list of assignment strings separated by
/// `,`, `;`, `|` or newlines, e.g. `"0-1 ; -1-"`.
#[derive(Clone, Default, Debug, Eq)]
pub struct StateVector {
    states: Vec<TObject>,
}

impl StateVector {
    /// Create an empty vector (the contradiction)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the tautology: a vector with a single all-free member
    pub fn top() -> Self {
        Self::from(TObject::default())
    }

    /// Add an assignment to the vector.
    ///
    /// No consistency check is performed: the new member may duplicate or
    /// cover existing members until the next [simplify](Self::simplify).
    pub fn push(&mut self, t: TObject) {
        self.states.push(t);
    }

    /// Get the number of members
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Return whether the vector has no member (covers no state)
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Return whether the vector is reduced to the free assignment
    pub fn is_trivial(&self) -> bool {
        self.states.len() == 1 && self.states[0].is_free()
    }

    /// Access a member by position
    pub fn get(&self, index: usize) -> Option<&TObject> {
        self.states.get(index)
    }

    pub fn iter(&self) -> Iter<'_, TObject> {
        self.states.iter()
    }

    /// The set of variables fixed by at least one member
    pub fn support(&self) -> VarSet {
        let mut vars = VarSet::default();
        for t in &self.states {
            vars.union_with(&t.positive);
            vars.union_with(&t.negative);
        }
        vars
    }

    /// The consolidated value of a variable across all members.
    ///
    /// The value is fixed only if every member fixes the variable to the
    /// same value; it is [Free](Ternary::Free) otherwise, in particular for
    /// an empty vector.
    pub fn get_value(&self, var: Variable) -> Ternary {
        let mut members = self.states.iter();
        let first = match members.next() {
            None => return Ternary::Free,
            Some(t) => t.value(var),
        };
        if !first.is_fixed() {
            return Ternary::Free;
        }
        for t in members {
            if t.value(var) != first {
                return Ternary::Free;
            }
        }
        first
    }

    /// Multiply two vectors: the intersection of the covered state sets.
    ///
    /// Every pair of members is combined with the ternary conjunction,
    /// conflicting pairs are dropped and the result is simplified.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for a in &self.states {
            for b in &other.states {
                if let Some(p) = a.multiply(b) {
                    result.push(p);
                }
            }
        }
        result.simplify();
        result
    }

    /// Union of two vectors: the disjunction of the covered state sets
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.states.extend(other.states.iter().cloned());
        result.simplify();
        result
    }

    /// Reduce the vector to its canonical compact form.
    ///
    /// Two reductions alternate until a fixpoint: members covered by another
    /// member are removed (the first occurrence survives a tie), and pairs
    /// with the same fixed variables differing at a single position are
    /// merged by freeing that position. The resulting vector covers exactly
    /// the same states and contains no covered member and no mergeable pair.
    pub fn simplify(&mut self) {
        loop {
            let removed = self.drop_covered();
            let merged = self.merge_adjacent();
            if !removed && !merged {
                return;
            }
        }
    }

    /// Remove every member covered by another member (duplicates included)
    fn drop_covered(&mut self) -> bool {
        let len = self.states.len();
        let mut dropped = vec![false; len];
        let mut changed = false;
        for idx in 0..len {
            if dropped[idx] {
                continue;
            }
            for idx2 in idx + 1..len {
                if dropped[idx2] {
                    continue;
                }
                if self.states[idx].covers(&self.states[idx2]) {
                    dropped[idx2] = true;
                    changed = true;
                } else if self.states[idx2].covers(&self.states[idx]) {
                    dropped[idx] = true;
                    changed = true;
                    break;
                }
            }
        }
        if changed {
            let mut idx = 0;
            self.states.retain(|_| {
                idx += 1;
                !dropped[idx - 1]
            });
        }
        changed
    }

    /// Merge adjacent pairs, one greedy round.
    ///
    /// Members are grouped by their set of fixed variables; inside a group,
    /// bucketing on the values at all positions but one isolates the pairs
    /// mergeable at that position without a quadratic scan. Merged members
    /// land in the group with the smaller fixed set on the next round.
    fn merge_adjacent(&mut self) -> bool {
        let mut groups: BTreeMap<Vec<usize>, Vec<usize>> = BTreeMap::new();
        for (idx, t) in self.states.iter().enumerate() {
            groups.entry(t.defined().to_uids()).or_default().push(idx);
        }

        let mut consumed = vec![false; self.states.len()];
        let mut merged: Vec<TObject> = Vec::new();
        for (mask, members) in &groups {
            if members.len() < 2 {
                continue;
            }
            for &uid in mask {
                let var = Variable(uid);
                // the positive set without `var` captures the values at all
                // other fixed positions of the group
                let mut buckets: BTreeMap<Vec<usize>, (Option<usize>, Option<usize>)> =
                    BTreeMap::new();
                for &idx in members {
                    if consumed[idx] {
                        continue;
                    }
                    let t = &self.states[idx];
                    let mut key = t.positive.clone();
                    key.remove(var);
                    let slot = buckets.entry(key.to_uids()).or_default();
                    if t.positive.contains(var) {
                        slot.0 = Some(idx);
                    } else {
                        slot.1 = Some(idx);
                    }
                }
                for (_, slot) in buckets {
                    if let (Some(a), Some(b)) = slot {
                        let mut m = self.states[a].clone();
                        m.free(var);
                        merged.push(m);
                        consumed[a] = true;
                        consumed[b] = true;
                    }
                }
            }
        }

        if merged.is_empty() {
            return false;
        }
        let mut idx = 0;
        self.states.retain(|_| {
            idx += 1;
            !consumed[idx - 1]
        });
        self.states.append(&mut merged);
        true
    }

    /// Enumerate the concrete states of each member over `n` variables.
    ///
    /// Every free position among the first `n` variables expands to both
    /// values, false first, lowest position varying fastest. The iterator is
    /// finite and a fresh call restarts the same sequence.
    pub fn expansions(&self, n: usize) -> Expansions<'_> {
        Expansions {
            members: self.states.iter(),
            n,
            current: None,
        }
    }
}

/// Iterator over the concrete states covered by each member of a [StateVector]
pub struct Expansions<'a> {
    members: Iter<'a, TObject>,
    n: usize,
    current: Option<Expanding>,
}

struct Expanding {
    values: Vec<bool>,
    free: Vec<usize>,
    exhausted: bool,
}

impl Iterator for Expansions<'_> {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let member = self.members.next()?;
                let mut values = vec![false; self.n];
                let mut free = Vec::new();
                for uid in 0..self.n {
                    match member.value(Variable(uid)) {
                        Ternary::True => values[uid] = true,
                        Ternary::False => (),
                        Ternary::Free => free.push(uid),
                    }
                }
                self.current = Some(Expanding {
                    values,
                    free,
                    exhausted: false,
                });
            }

            let state = self.current.as_mut().filter(|s| !s.exhausted);
            if let Some(state) = state {
                let result = state.values.clone();
                // binary increment over the free positions
                state.exhausted = true;
                for &uid in &state.free {
                    if state.values[uid] {
                        state.values[uid] = false;
                    } else {
                        state.values[uid] = true;
                        state.exhausted = false;
                        break;
                    }
                }
                return Some(result);
            }
            self.current = None;
        }
    }
}

impl PartialEq for StateVector {
    /// Vectors are compared as multisets: member order is irrelevant
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let key = |t: &TObject| (t.positive.to_uids(), t.negative.to_uids());
        let mut a: Vec<_> = self.states.iter().map(key).collect();
        let mut b: Vec<_> = other.states.iter().map(key).collect();
        a.sort();
        b.sort();
        a == b
    }
}

impl Mul for &StateVector {
    type Output = StateVector;

    fn mul(self, rhs: &StateVector) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Index<usize> for StateVector {
    type Output = TObject;

    fn index(&self, index: usize) -> &Self::Output {
        self.states.index(index)
    }
}

impl From<TObject> for StateVector {
    fn from(t: TObject) -> Self {
        Self { states: vec![t] }
    }
}

impl FromIterator<TObject> for StateVector {
    fn from_iter<I: IntoIterator<Item = TObject>>(iter: I) -> Self {
        Self {
            states: Vec::from_iter(iter),
        }
    }
}

impl<'a> IntoIterator for &'a StateVector {
    type Item = &'a TObject;
    type IntoIter = Iter<'a, TObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

impl IntoIterator for StateVector {
    type Item = TObject;
    type IntoIter = IntoIter<TObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}

impl FromStr for StateVector {
    type Err = StakitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(&PATTERN_SEPARATORS[..])
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.parse())
            .collect()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.states {
            writeln!(f, "{}", t)?;
        }
        Ok(())
    }
}

impl NamedFmt for StateVector {
    fn fmt_named(&self, f: &mut fmt::Formatter<'_>, space: &VarSpace) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{{ contradiction }}");
        }
        writeln!(f, "{{")?;
        for t in &self.states {
            write!(f, "    ")?;
            t.fmt_named(f, space)?;
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

//! Ordering heuristics for multiplying collections of state vectors

use crate::*;
use log::{debug, info};
use std::cmp::Ordering;

/// Tuning knobs for the compilation scheduler.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Vectors of at most this many members act as predators
    pub max_predator_size: usize,
    /// Preferred bound on the size of intermediate products
    pub max_cluster_size: usize,
    /// Emit progress records at `info` level instead of `debug`
    pub verbose: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_predator_size: 4,
            max_cluster_size: 1024,
            verbose: false,
        }
    }
}

/// Multiply a collection of state vectors into a single product.
///
/// A plain left-to-right fold is correct but lets intermediate products
/// grow multiplicatively. The scheduler instead feeds small vectors to all
/// larger ones first (strong constraints shrink, they rarely grow), then
/// repeatedly merges the pair of remaining vectors with the most similar
/// variable support, where simplification is most likely to bite.
///
/// The empty collection yields the tautology. Any empty input or
/// intermediate product short-circuits to the empty vector. The result only
/// depends on the input order through deterministic tie-breaks.
pub fn combine(mut vectors: Vec<StateVector>, opts: &CompileOptions) -> StateVector {
    if vectors.iter().any(StateVector::is_empty) {
        return StateVector::new();
    }
    if !predator_phase(&mut vectors, opts) || !cluster_phase(&mut vectors, opts) {
        return StateVector::new();
    }
    vectors.pop().unwrap_or_else(StateVector::top)
}

/// Fold each small vector into every larger one, then drop it.
///
/// A predator that fed no prey must stay in the working set, and ends the
/// phase. Returns false when a product collapses to the contradiction.
fn predator_phase(vectors: &mut Vec<StateVector>, opts: &CompileOptions) -> bool {
    while vectors.len() > 1 {
        // the first of several equally small vectors wins
        let mut smallest: Option<(usize, usize)> = None;
        for (i, v) in vectors.iter().enumerate() {
            if smallest.map_or(true, |(_, len)| v.len() < len) {
                smallest = Some((i, v.len()));
            }
        }
        let (pi, plen) = match smallest {
            Some(pick) => pick,
            None => return true,
        };
        if plen > opts.max_predator_size {
            return true;
        }

        let predator = vectors.remove(pi);
        let mut fed = false;
        for prey in vectors.iter_mut() {
            if prey.len() > plen {
                *prey = prey.multiply(&predator);
                if prey.is_empty() {
                    return false;
                }
                fed = true;
            }
        }
        if !fed {
            vectors.insert(pi, predator);
            return true;
        }
        progress(vectors, opts);
    }
    true
}

/// Repeatedly merge the pair with the most similar variable support.
///
/// Similarity is the Jaccard ratio of the supports, compared exactly by
/// cross-multiplication; ties prefer the smaller combined member count,
/// then the earlier pair. Pairs whose size bound exceeds the cluster cap
/// are deferred, but when every pair exceeds it the best one is merged
/// anyway: the product must complete.
fn cluster_phase(vectors: &mut Vec<StateVector>, opts: &CompileOptions) -> bool {
    while vectors.len() > 1 {
        let supports: Vec<VarSet> = vectors.iter().map(StateVector::support).collect();

        let mut capped: Option<(PairRank, (usize, usize))> = None;
        let mut overall: Option<(PairRank, (usize, usize))> = None;
        for i in 0..vectors.len() {
            for j in i + 1..vectors.len() {
                let (inter, union) = jaccard(&supports[i], &supports[j]);
                let rank = PairRank {
                    inter,
                    union,
                    combined: vectors[i].len() + vectors[j].len(),
                };
                if overall.as_ref().map_or(true, |(best, _)| rank.beats(best)) {
                    overall = Some((rank.clone(), (i, j)));
                }
                if vectors[i].len() * vectors[j].len() <= opts.max_cluster_size
                    && capped.as_ref().map_or(true, |(best, _)| rank.beats(best))
                {
                    capped = Some((rank.clone(), (i, j)));
                }
            }
        }

        let (i, j) = match capped.or(overall) {
            Some((_, pair)) => pair,
            None => return true,
        };
        let right = vectors.remove(j);
        let product = vectors[i].multiply(&right);
        if product.is_empty() {
            return false;
        }
        vectors[i] = product;
        progress(vectors, opts);
    }
    true
}

/// Support similarity as an exact ratio; an empty union counts as identical
fn jaccard(a: &VarSet, b: &VarSet) -> (usize, usize) {
    let mut inter = a.clone();
    inter.intersect_with(b);
    let mut union = a.clone();
    union.union_with(b);
    match union.is_empty() {
        true => (1, 1),
        false => (inter.len(), union.len()),
    }
}

#[derive(Clone)]
struct PairRank {
    inter: usize,
    union: usize,
    combined: usize,
}

impl PairRank {
    /// Strictly better than the incumbent pair
    fn beats(&self, other: &Self) -> bool {
        match (self.inter * other.union).cmp(&(other.inter * self.union)) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.combined < other.combined,
        }
    }
}

fn progress(vectors: &[StateVector], opts: &CompileOptions) {
    let largest = vectors.iter().map(StateVector::len).max().unwrap_or(0);
    if opts.verbose {
        info!(
            "{} vectors remaining, largest holds {} members",
            vectors.len(),
            largest
        );
    } else {
        debug!(
            "{} vectors remaining, largest holds {} members",
            vectors.len(),
            largest
        );
    }
}

//! Cardinality and enumeration queries over a ZDD.
//!
//! All recurrences share the same shape: `base(FALSE) = 0`, `base(TRUE) = 1`
//! (or whatever the operation's identity is), and an inductive step that
//! combines `lo` and `hi` sub-results, memoized per node for the duration
//! of one call.

use crate::common::{HashMap, NodeId, FALSE, TRUE};
use crate::pool::Pool;
use num_bigint::BigUint;

/// Number of sets in the family rooted at `root`.
pub fn count(pool: &Pool, root: NodeId) -> BigUint {
    let mut memo: HashMap<NodeId, BigUint> = HashMap::default();
    count_rec(pool, root, &mut memo)
}

fn count_rec(pool: &Pool, n: NodeId, memo: &mut HashMap<NodeId, BigUint>) -> BigUint {
    if let Some(v) = memo.get(&n) {
        return v.clone();
    }
    let value = if n == FALSE {
        BigUint::from(0u8)
    } else if n == TRUE {
        BigUint::from(1u8)
    } else {
        let lo = pool.lo(n);
        let hi = pool.hi(n);
        let c_lo = count_rec(pool, lo, memo);
        let c_hi = count_rec(pool, hi, memo);
        c_lo + c_hi
    };
    memo.insert(n, value.clone());
    value
}

/// `(count, sum of |S| over S in the family)`.
pub fn count_1(pool: &Pool, root: NodeId) -> (BigUint, BigUint) {
    let mut c_memo: HashMap<NodeId, BigUint> = HashMap::default();
    let mut s_memo: HashMap<NodeId, BigUint> = HashMap::default();
    let s = count1_rec(pool, root, &mut c_memo, &mut s_memo);
    let c = count_rec(pool, root, &mut c_memo);
    (c, s)
}

fn count1_rec(
    pool: &Pool,
    n: NodeId,
    c_memo: &mut HashMap<NodeId, BigUint>,
    s_memo: &mut HashMap<NodeId, BigUint>,
) -> BigUint {
    if let Some(v) = s_memo.get(&n) {
        return v.clone();
    }
    let value = if n <= TRUE {
        BigUint::from(0u8)
    } else {
        let lo = pool.lo(n);
        let hi = pool.hi(n);
        let s_lo = count1_rec(pool, lo, c_memo, s_memo);
        let s_hi = count1_rec(pool, hi, c_memo, s_memo);
        let c_hi = count_rec(pool, hi, c_memo);
        s_lo + s_hi + c_hi
    };
    s_memo.insert(n, value.clone());
    value
}

/// `(count, sum of |S|, sum of |S|^2)`.
pub fn count_2(pool: &Pool, root: NodeId) -> (BigUint, BigUint, BigUint) {
    let mut c_memo: HashMap<NodeId, BigUint> = HashMap::default();
    let mut s1_memo: HashMap<NodeId, BigUint> = HashMap::default();
    let mut s2_memo: HashMap<NodeId, BigUint> = HashMap::default();
    let s2 = count2_rec(pool, root, &mut c_memo, &mut s1_memo, &mut s2_memo);
    let s1 = count1_rec(pool, root, &mut c_memo, &mut s1_memo);
    let c = count_rec(pool, root, &mut c_memo);
    (c, s1, s2)
}

fn count2_rec(
    pool: &Pool,
    n: NodeId,
    c_memo: &mut HashMap<NodeId, BigUint>,
    s1_memo: &mut HashMap<NodeId, BigUint>,
    s2_memo: &mut HashMap<NodeId, BigUint>,
) -> BigUint {
    if let Some(v) = s2_memo.get(&n) {
        return v.clone();
    }
    let value = if n <= TRUE {
        BigUint::from(0u8)
    } else {
        let lo = pool.lo(n);
        let hi = pool.hi(n);
        let s2_lo = count2_rec(pool, lo, c_memo, s1_memo, s2_memo);
        let s2_hi = count2_rec(pool, hi, c_memo, s1_memo, s2_memo);
        let s1_hi = count1_rec(pool, hi, c_memo, s1_memo);
        let c_hi = count_rec(pool, hi, c_memo);
        s2_lo + s2_hi + BigUint::from(2u8) * s1_hi + c_hi
    };
    s2_memo.insert(n, value.clone());
    value
}

/// Visits every set in the family, in lexicographic order of the sorted
/// element sequence, via a LO-then-HI depth-first walk.
pub fn forall(pool: &Pool, root: NodeId, mut f: impl FnMut(&[u16])) {
    let mut path = Vec::new();
    forall_rec(pool, root, &mut path, &mut f);
}

fn forall_rec(pool: &Pool, n: NodeId, path: &mut Vec<u16>, f: &mut impl FnMut(&[u16])) {
    if n == FALSE {
        return;
    }
    if n == TRUE {
        f(path);
        return;
    }
    let v = pool.v(n);
    forall_rec(pool, pool.lo(n), path, f);
    path.push(v);
    forall_rec(pool, pool.hi(n), path, f);
    path.pop();
}

/// Calls `f` with one maximum-cardinality set in the family, breaking ties
/// by preferring the lexicographically-first such set (i.e. preferring LO
/// over HI when both reach the same maximum).
pub fn forlargest(pool: &Pool, root: NodeId, f: impl FnOnce(&[u16])) {
    let mut memo: HashMap<NodeId, (u32, bool)> = HashMap::default();
    best_rec(pool, root, &mut memo);
    let mut path = Vec::new();
    let mut n = root;
    loop {
        if n == TRUE || n == FALSE {
            break;
        }
        let (_, take_hi) = memo[&n];
        if take_hi {
            path.push(pool.v(n));
            n = pool.hi(n);
        } else {
            n = pool.lo(n);
        }
    }
    f(&path);
}

/// Returns `(max cardinality reachable from n, whether HI achieves it with
/// priority over LO on ties)`.
fn best_rec(pool: &Pool, n: NodeId, memo: &mut HashMap<NodeId, (u32, bool)>) -> u32 {
    if n == FALSE {
        return u32::MIN; // unreachable: FALSE has no sets, caller must not rank it
    }
    if n == TRUE {
        return 0;
    }
    if let Some(&(best, _)) = memo.get(&n) {
        return best;
    }
    let lo = pool.lo(n);
    let hi = pool.hi(n);
    let lo_best = if lo == FALSE { None } else { Some(best_rec(pool, lo, memo)) };
    let hi_best = if hi == FALSE { None } else { Some(best_rec(pool, hi, memo) + 1) };
    let (best, take_hi) = match (lo_best, hi_best) {
        (Some(l), Some(h)) if h > l => (h, true),
        (Some(l), _) => (l, false),
        (None, Some(h)) => (h, true),
        (None, None) => unreachable!("a non-sentinel node has at least one non-FALSE child"),
    };
    memo.insert(n, (best, take_hi));
    best
}

/// Number of nodes in the region `[base, freenode)`, plus the two
/// sentinels.
pub fn size(pool: &Pool, base: NodeId) -> u32 {
    pool.freenode() - base + 2
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub duplicate_triples: Vec<(NodeId, NodeId)>,
    pub hi_to_false: Vec<NodeId>,
    pub self_loops: Vec<NodeId>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_triples.is_empty() && self.hi_to_false.is_empty() && self.self_loops.is_empty()
    }
}

/// Scans `[base, freenode)` for reducedness violations: duplicate
/// `(v,lo,hi)` triples, HI edges pointing at FALSE, and self-loops.
pub fn check(pool: &Pool, base: NodeId) -> CheckReport {
    let mut report = CheckReport::default();
    let mut seen: HashMap<(u16, NodeId, NodeId), NodeId> = HashMap::default();
    for i in base..pool.freenode() {
        let node = pool.get(i);
        let key = (node.v, node.lo, node.hi);
        if let Some(&first) = seen.get(&key) {
            report.duplicate_triples.push((first, i));
        } else {
            seen.insert(key, i);
        }
        if node.hi == FALSE {
            report.hi_to_false.push(i);
        }
        if node.lo == i || node.hi == i {
            report.self_loops.push(i);
        }
    }
    report
}

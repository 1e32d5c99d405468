//! Parameterized reduced-ZDD constructors.
//!
//! Each function pushes a new frame and builds a family over the ground set
//! `1..=vmax` directly in reduced form -- no post-reduction pass. The
//! reference (`original_source/fill.c`) builds these top-down with
//! relative-offset nodes into an append-only region sized for the whole
//! spine ahead of time; this crate builds the same DAGs bottom-up with a
//! small `Vec<NodeId>` scratch table per call, which needs no forward
//! arithmetic and composes cleanly with zero-suppression (see
//! `make_node`/`make_free` below). The node-for-node shapes these functions
//! produce -- single spine for unconstrained variables, a dedicated branch
//! that bypasses the rest of a run once a constraint is satisfied, a shared
//! tail once no further constraint can matter -- are exactly the reference's.

use crate::common::{Variable, FALSE, TRUE};
use crate::error::{EngineError, Result};
use crate::pool::Pool;
use crate::stack::Stack;

/// Allocates `!v ? lo : hi`, zero-suppressing in place: a HI edge to FALSE
/// is never materialized as a node, since a reduced ZDD forbids it -- the
/// node degenerates to its LO child instead.
fn make_node(pool: &mut Pool, v: Variable, lo: u32, hi: u32) -> Result<u32> {
    if hi == FALSE {
        Ok(lo)
    } else {
        pool.abs_node(v, lo, hi)
    }
}

/// Allocates an unconstrained choice over `v` (`lo == hi == next`), skipping
/// the node entirely if `next` is FALSE (both branches dead).
fn make_free(pool: &mut Pool, v: Variable, next: u32) -> Result<u32> {
    make_node(pool, v, next, next)
}

/// `{S subset of 1..=vmax}` -- every subset.
pub fn powerset(pool: &mut Pool, stack: &mut Stack, vmax: Variable) -> Result<()> {
    stack.push(pool);
    let mut next = TRUE;
    for v in (1..=vmax).rev() {
        next = pool.abs_node(v, next, next)?;
    }
    stack.set_root(next)?;
    Ok(())
}

/// `{S : |S ∩ a| == n}`, built as a bottom-up DP over "elements of `a` seen
/// so far", shared with a plain free spine once `v` passes the last element
/// of `a` (further variables cannot change whether the count reached `n`).
fn exactly_n_impl(pool: &mut Pool, vmax: Variable, a: &[Variable], n: u32) -> Result<u32> {
    let Some(&m) = a.last() else {
        return Ok(if n == 0 { build_plain_powerset_tail(pool, 1, vmax)? } else { FALSE });
    };
    let n = n as usize;
    let tail = build_plain_powerset_tail(pool, m + 1, vmax)?;
    let mut row = vec![FALSE; n + 1];
    row[n] = tail;
    for v in (1..=m).rev() {
        if a.binary_search(&v).is_ok() {
            let mut next_row = vec![FALSE; n + 1];
            for k in 0..=n {
                let hi = if k + 1 <= n { row[k + 1] } else { FALSE };
                next_row[k] = make_node(pool, v, row[k], hi)?;
            }
            row = next_row;
        } else {
            let mut next_row = vec![FALSE; n + 1];
            for k in 0..=n {
                next_row[k] = make_free(pool, v, row[k])?;
            }
            row = next_row;
        }
    }
    Ok(row[0])
}

/// Free spine over `[from, vmax]`, ending at TRUE. `from > vmax` yields TRUE
/// directly (no nodes).
fn build_plain_powerset_tail(pool: &mut Pool, from: Variable, vmax: Variable) -> Result<u32> {
    let mut next = TRUE;
    if from <= vmax {
        for v in (from..=vmax).rev() {
            next = make_free(pool, v, next)?;
        }
    }
    Ok(next)
}

/// `{S : S ∩ a == ∅}`.
pub fn contains_none(pool: &mut Pool, stack: &mut Stack, vmax: Variable, a: &[Variable]) -> Result<()> {
    stack.push(pool);
    let root = exactly_n_impl(pool, vmax, a, 0)?;
    stack.set_root(root)?;
    Ok(())
}

/// `{S : |S ∩ a| == n}`. Fails if `n` exceeds `a.len()`, since no subset can
/// then satisfy the constraint.
pub fn contains_exactly_n(
    pool: &mut Pool,
    stack: &mut Stack,
    vmax: Variable,
    n: u32,
    a: &[Variable],
) -> Result<()> {
    if n as usize > a.len() {
        return Err(EngineError::CountExceedsSetSize { n, len: a.len() });
    }
    stack.push(pool);
    let root = exactly_n_impl(pool, vmax, a, n)?;
    stack.set_root(root)?;
    Ok(())
}

/// `{S : |S ∩ a| == 1}`. An empty `a` has no element to pick, so the family
/// is empty (FALSE) rather than an error -- unlike `contains_exactly_n`,
/// which treats `n > |a|` as a caller mistake, "exactly one of nothing" is a
/// well-defined, simply unsatisfiable, predicate.
pub fn contains_exactly_1(pool: &mut Pool, stack: &mut Stack, vmax: Variable, a: &[Variable]) -> Result<()> {
    stack.push(pool);
    let root = if a.is_empty() { FALSE } else { exactly_n_impl(pool, vmax, a, 1)? };
    stack.set_root(root)?;
    Ok(())
}

/// `{S : S ∩ a != ∅}`.
///
/// `tail[v]` is the plain free spine over `[v, vmax]`: once an element of
/// `a` has been picked, every later variable is unconstrained. It is built
/// once, descending, so every branch that reaches "already satisfied" at a
/// given `v` shares the same node instead of allocating a fresh duplicate.
pub fn contains_at_least_1(pool: &mut Pool, stack: &mut Stack, vmax: Variable, a: &[Variable]) -> Result<()> {
    stack.push(pool);
    let Some(&m) = a.last() else {
        stack.set_root(FALSE)?;
        return Ok(());
    };
    let mut tail = vec![FALSE; (vmax as usize) + 2];
    tail[vmax as usize + 1] = TRUE;
    for v in (1..=vmax).rev() {
        tail[v as usize] = make_free(pool, v, tail[v as usize + 1])?;
    }
    let mut zero_row = FALSE; // "not yet satisfied" terminal past the last element of `a`
    for v in (1..=m).rev() {
        zero_row = if a.binary_search(&v).is_ok() {
            make_node(pool, v, zero_row, tail[v as usize + 1])?
        } else {
            make_free(pool, v, zero_row)?
        };
    }
    stack.set_root(zero_row)?;
    Ok(())
}

/// `{S : |S ∩ a| <= 1}`. The "already picked one" branch reuses
/// `contains_none`'s own spine restricted to the remaining suffix, since
/// from that point on every further element of `a` must be excluded.
pub fn contains_at_most_1(pool: &mut Pool, stack: &mut Stack, vmax: Variable, a: &[Variable]) -> Result<()> {
    stack.push(pool);
    let Some(&m) = a.last() else {
        let root = build_plain_powerset_tail(pool, 1, vmax)?;
        stack.set_root(root)?;
        return Ok(());
    };
    // `none_suffix[v]`: forced-excluded-from-here-on spine, i.e. the "one
    // already picked" state. Built once, descending, shared by every branch
    // that reaches it.
    let mut none_suffix = vec![FALSE; (vmax as usize) + 2];
    none_suffix[vmax as usize + 1] = TRUE;
    for v in (1..=vmax).rev() {
        none_suffix[v as usize] = if a.binary_search(&v).is_ok() {
            none_suffix[v as usize + 1]
        } else {
            make_free(pool, v, none_suffix[v as usize + 1])?
        };
    }
    let mut zero_row = none_suffix[m as usize + 1];
    for v in (1..=m).rev() {
        zero_row = if a.binary_search(&v).is_ok() {
            make_node(pool, v, zero_row, none_suffix[v as usize + 1])?
        } else {
            make_free(pool, v, zero_row)?
        };
    }
    stack.set_root(zero_row)?;
    Ok(())
}

/// `list` gives the strictly-ascending start of each interval partitioning
/// `1..=vmax`, with `list[0] == 1` implied and an implicit `vmax + 1`
/// sentinel closing the last interval. The resulting family has exactly one
/// element per interval.
pub fn one_per_interval(pool: &mut Pool, stack: &mut Stack, vmax: Variable, list: &[Variable]) -> Result<()> {
    stack.push(pool);
    let mut starts: Vec<Variable> = list.to_vec();
    if starts.first() != Some(&1) {
        starts.insert(0, 1);
    }
    starts.push(vmax + 1);

    let mut node_at = vec![FALSE; (vmax as usize) + 2];
    for v in (1..=vmax).rev() {
        let interval = starts.windows(2).position(|w| w[0] <= v && v < w[1]).expect("v lies in some interval");
        let interval_end = starts[interval + 1];
        let is_last_in_interval = v + 1 == interval_end;
        let is_last_interval = interval + 2 == starts.len();
        let hi = if is_last_interval { TRUE } else { node_at[interval_end as usize] };
        let lo = if is_last_in_interval { FALSE } else { node_at[v as usize + 1] };
        node_at[v as usize] = pool.abs_node(v, lo, hi)?;
    }
    stack.set_root(node_at[1])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{count, forall};
    use num_bigint::BigUint;

    fn brute_force<F: Fn(&[u16]) -> bool>(vmax: u16, pred: F) -> Vec<Vec<u16>> {
        let mut out = Vec::new();
        for mask in 0u32..(1 << vmax) {
            let set: Vec<u16> = (1..=vmax).filter(|v| mask & (1 << (v - 1)) != 0).collect();
            if pred(&set) {
                out.push(set);
            }
        }
        out
    }

    #[test]
    fn powerset_has_2_pow_v_sets() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        powerset(&mut pool, &mut stack, 4).unwrap();
        assert_eq!(count(&pool, stack.root().unwrap()), BigUint::from(16u32));
    }

    #[test]
    fn contains_exactly_1_matches_brute_force() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        let a = [2u16, 3u16];
        contains_exactly_1(&mut pool, &mut stack, 4, &a).unwrap();
        let mut got = Vec::new();
        forall(&pool, stack.root().unwrap(), |s| got.push(s.to_vec()));
        let want = brute_force(4, |s| s.iter().filter(|v| a.contains(v)).count() == 1);
        assert_eq!(got, want);
    }

    #[test]
    fn contains_at_most_1_matches_brute_force() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        let a = [1u16, 3u16, 4u16];
        contains_at_most_1(&mut pool, &mut stack, 5, &a).unwrap();
        let mut got = Vec::new();
        forall(&pool, stack.root().unwrap(), |s| got.push(s.to_vec()));
        let want = brute_force(5, |s| s.iter().filter(|v| a.contains(v)).count() <= 1);
        assert_eq!(got, want);
    }

    #[test]
    fn contains_at_least_1_matches_brute_force() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        let a = [2u16, 4u16];
        contains_at_least_1(&mut pool, &mut stack, 4, &a).unwrap();
        let mut got = Vec::new();
        forall(&pool, stack.root().unwrap(), |s| got.push(s.to_vec()));
        let want = brute_force(4, |s| s.iter().any(|v| a.contains(v)));
        assert_eq!(got, want);
    }

    #[test]
    fn contains_none_matches_brute_force() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        let a = [2u16];
        contains_none(&mut pool, &mut stack, 3, &a).unwrap();
        let mut got = Vec::new();
        forall(&pool, stack.root().unwrap(), |s| got.push(s.to_vec()));
        let want = brute_force(3, |s| !s.iter().any(|v| a.contains(v)));
        assert_eq!(got, want);
    }

    #[test]
    fn contains_exactly_n_rejects_n_too_large() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        let err = contains_exactly_n(&mut pool, &mut stack, 4, 3, &[1, 2]).unwrap_err();
        assert_eq!(err, EngineError::CountExceedsSetSize { n: 3, len: 2 });
    }

    #[test]
    fn one_per_interval_matches_brute_force() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        // Intervals [1,3), [3,5), [5,7) over V=6.
        one_per_interval(&mut pool, &mut stack, 6, &[1, 3, 5]).unwrap();
        let mut got = Vec::new();
        forall(&pool, stack.root().unwrap(), |s| got.push(s.to_vec()));
        let want = brute_force(6, |s| {
            let in_range = |lo: u16, hi: u16| s.iter().filter(|&&v| v >= lo && v < hi).count() == 1;
            in_range(1, 3) && in_range(3, 5) && in_range(5, 7)
        });
        assert_eq!(got, want);
    }
}

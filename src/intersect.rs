//! Meld-intersection: folds the top two ZDDs on the stack into their
//! family intersection, sharing subtrees via a memoized template pass
//! followed by zero-suppressing instantiation into real pool nodes.
//!
//! See Knuth's TAOCP 4A §7.1.4 "meld" operation. The two-pass structure
//! (build a template DAG keyed on node-id pairs, then instantiate it
//! bottom-up into real nodes through a per-variable uniqueness cache)
//! mirrors the reference `zdd_intersection`, translated from nested C
//! closures over a single `memo_t` pair into explicit state carried on a
//! small helper struct.

use crate::common::{HashMap, NodeId, Variable, FALSE, TRUE};
use crate::error::Result;
use crate::memo::{Memo, MemoHandle};
use crate::pool::Pool;
use crate::stack::Stack;

fn pack_pair(a: NodeId, b: NodeId) -> [u8; 8] {
    let mut key = [0u8; 8];
    key[0..4].copy_from_slice(&a.to_le_bytes());
    key[4..8].copy_from_slice(&b.to_le_bytes());
    key
}

#[derive(Clone, Copy)]
enum TemplateData {
    /// Already a concrete pool node (a sentinel, or a previously
    /// instantiated template).
    Leaf(NodeId),
    /// Shares its value with another template entry (the "differing
    /// variable" case below recurses into a sub-template and reuses its
    /// result verbatim rather than wrapping it).
    Alias(MemoHandle),
    Internal { v: Variable, lo: MemoHandle, hi: MemoHandle },
}

struct Melder<'a> {
    pool: &'a mut Pool,
    templates: Memo<TemplateData>,
    unique: HashMap<Variable, Memo<NodeId>>,
}

impl<'a> Melder<'a> {
    fn new(pool: &'a mut Pool) -> Self {
        Melder { pool, templates: Memo::new(), unique: HashMap::default() }
    }

    /// Builds (or finds) the template for `meld(k0, k1)`. Intersection is
    /// symmetric, so the key is normalized by numeric order -- this lets
    /// `meld(a,b)` and `meld(b,a)` share one template subtree.
    fn insert_template(&mut self, k0: NodeId, k1: NodeId) -> MemoHandle {
        let key = if k0 <= k1 { pack_pair(k0, k1) } else { pack_pair(k1, k0) };
        let (handle, created) = self.templates.insert_or_find(&key);
        if !created {
            return handle;
        }
        if k0 == FALSE || k1 == FALSE {
            self.templates.set_data(handle, TemplateData::Leaf(FALSE));
            return handle;
        }
        if k0 == TRUE && k1 == TRUE {
            self.templates.set_data(handle, TemplateData::Leaf(TRUE));
            return handle;
        }
        let n0 = self.pool.get(k0);
        let n1 = self.pool.get(k1);
        if n0.v == n1.v {
            let (lo, hi) = if n0.lo == n0.hi && n1.lo == n1.hi {
                let h = self.insert_template(n0.lo, n1.lo);
                (h, h)
            } else {
                let lo = self.insert_template(n0.lo, n1.lo);
                let hi = self.insert_template(n0.hi, n1.hi);
                (lo, hi)
            };
            self.templates.set_data(handle, TemplateData::Internal { v: n0.v, lo, hi });
        } else if n0.v < n1.v {
            // Dropping v(k0): any set satisfying k1 cannot contain v(k0),
            // so only k0's LO branch can possibly agree with k1.
            let sub = self.insert_template(n0.lo, k1);
            self.templates.set_data(handle, TemplateData::Alias(sub));
        } else {
            let sub = self.insert_template(k0, n1.lo);
            self.templates.set_data(handle, TemplateData::Alias(sub));
        }
        handle
    }

    fn get_node(&mut self, v: Variable, lo: NodeId, hi: NodeId) -> Result<NodeId> {
        let key = pack_pair(lo, hi);
        let table = self.unique.entry(v).or_insert_with(Memo::new);
        let (handle, created) = table.insert_or_find(&key);
        if created {
            let n = self.pool.abs_node(v, lo, hi)?;
            table.set_data(handle, n);
            Ok(n)
        } else {
            Ok(*table.data(handle).unwrap())
        }
    }

    /// Converts a template (and everything it depends on) into real pool
    /// nodes, zero-suppressing any node whose HI branch would point at
    /// FALSE. Each handle's data is overwritten with `Leaf(result)` once
    /// instantiated, so revisiting a shared template costs O(1).
    fn instantiate(&mut self, handle: MemoHandle) -> Result<NodeId> {
        let data = *self.templates.data(handle).unwrap();
        let result = match data {
            TemplateData::Leaf(n) => return Ok(n),
            TemplateData::Alias(target) => self.instantiate(target)?,
            TemplateData::Internal { v, lo, hi } => {
                let lo_n = self.instantiate(lo)?;
                let hi_n = self.instantiate(hi)?;
                if hi_n == FALSE {
                    lo_n
                } else {
                    self.get_node(v, lo_n, hi_n)?
                }
            }
        };
        self.templates.set_data(handle, TemplateData::Leaf(result));
        Ok(result)
    }
}

/// Replaces the top two ZDDs on the stack with their intersection.
///
/// On success, exactly one frame remains where there were two; its root is
/// relocated (by copy or pool swap) so that it sits at the lower of the two
/// original bases, preserving the invariant that a frame's nodes occupy a
/// contiguous region starting at its base -- except when the result is a
/// sentinel (FALSE/TRUE), which needs no region at all and is recorded as
/// the frame's root directly.
pub fn intersection(pool: &mut Pool, stack: &mut Stack) -> Result<NodeId> {
    if stack.len() < 2 {
        return stack.root();
    }
    let z0_root = stack.second_root()?;
    let z1_root = stack.root()?;
    let z0_base = stack.second_base()?;
    stack.drop_top()?;

    let root = {
        let mut melder = Melder::new(pool);
        let root_handle = melder.insert_template(z0_root, z1_root);
        // Overwrite the two input trees: everything built during template
        // instantiation reuses the region starting at the lower base.
        melder.pool.truncate(z0_base);
        melder.instantiate(root_handle)?
    };

    if root > TRUE {
        if root < z0_base {
            pool.overwrite(z0_base, root);
        } else if root > z0_base {
            pool.swap(z0_base, root);
        }
        stack.set_root(z0_base)?;
    } else {
        // Trivial result: no region is needed, the sentinel index serves as
        // the root directly. The caller (`ZddEngine::intersection`) decides
        // whether this is acceptable or should surface as an error.
        pool.truncate(z0_base);
        stack.set_root(root)?;
    }
    stack.root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FALSE;

    fn push_pair(pool: &mut Pool, stack: &mut Stack, elems: &[(Variable, i32, i32)]) {
        stack.push(pool);
        for &(v, lo, hi) in elems {
            pool.add_node(v, lo, hi).unwrap();
        }
    }

    #[test]
    fn intersecting_identical_zdds_is_idempotent() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        // {1} as a family over V=1: node !1 ? FALSE : TRUE.
        push_pair(&mut pool, &mut stack, &[(1, 0, -1)]);
        push_pair(&mut pool, &mut stack, &[(1, 0, -1)]);
        let root = intersection(&mut pool, &mut stack).unwrap();
        assert_eq!(pool.v(root), 1);
        assert_eq!(pool.lo(root), FALSE);
        assert_eq!(pool.hi(root), TRUE);
    }

    #[test]
    fn disjoint_constraints_intersect_to_false() {
        let mut pool = Pool::new(4096);
        let mut stack = Stack::new();
        // {1} and {2} (over the same two variables) share no subset.
        stack.push(&pool);
        pool.add_node(2, 0, -1).unwrap();
        pool.add_node(1, 1, 0).unwrap();
        stack.push(&pool);
        pool.add_node(2, -1, 0).unwrap();
        pool.add_node(1, 1, 0).unwrap();
        let root = intersection(&mut pool, &mut stack).unwrap();
        assert_eq!(root, FALSE);
    }
}

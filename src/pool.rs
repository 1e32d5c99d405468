//! The node pool: an append-only arena of ZDD nodes indexed by [`NodeId`].
//!
//! Node 0 is the FALSE sentinel (empty family), node 1 is the TRUE sentinel
//! (the family containing only the empty set). Allocation is a monotone
//! `freenode` counter; the [`crate::stack`] module is what lets regions of
//! the pool above a mark be discarded en masse.

use crate::common::{NodeId, Variable, FALSE, SENTINEL_VAR, TRUE};
use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub v: Variable,
    pub lo: NodeId,
    pub hi: NodeId,
}

pub struct Pool {
    nodes: Vec<Node>,
    capacity: usize,
}

impl Pool {
    pub fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.min(1 << 16));
        nodes.push(Node { v: SENTINEL_VAR, lo: FALSE, hi: FALSE });
        nodes.push(Node { v: SENTINEL_VAR, lo: TRUE, hi: TRUE });
        Pool { nodes, capacity }
    }

    pub fn freenode(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    pub fn last_node(&self) -> NodeId {
        self.freenode() - 1
    }

    pub fn get(&self, n: NodeId) -> Node {
        self.nodes[n as usize]
    }

    pub fn v(&self, n: NodeId) -> Variable {
        self.nodes[n as usize].v
    }

    pub fn lo(&self, n: NodeId) -> NodeId {
        self.nodes[n as usize].lo
    }

    pub fn hi(&self, n: NodeId) -> NodeId {
        self.nodes[n as usize].hi
    }

    pub fn set_lo(&mut self, n: NodeId, lo: NodeId) {
        self.nodes[n as usize].lo = lo;
    }

    pub fn set_hi(&mut self, n: NodeId, hi: NodeId) {
        self.nodes[n as usize].hi = hi;
    }

    pub fn set_hilo(&mut self, n: NodeId, hilo: NodeId) {
        self.nodes[n as usize].lo = hilo;
        self.nodes[n as usize].hi = hilo;
    }

    /// Allocates a node with the given fields. Fails if the pool has
    /// reached its configured capacity.
    pub fn abs_node(&mut self, v: Variable, lo: NodeId, hi: NodeId) -> Result<NodeId> {
        let n = self.freenode();
        if n as usize >= self.capacity {
            return Err(EngineError::PoolFull { capacity: self.capacity });
        }
        self.nodes.push(Node { v, lo, hi });
        Ok(n)
    }

    /// Allocates a node whose children are given as relative offsets from
    /// the about-to-be-allocated node's own index: `0` means FALSE, `-1`
    /// means TRUE, and any other `k` means `freenode + k`. A convenience for
    /// builders that lay out a straight-line spine of nodes referring
    /// forward to nodes not yet allocated.
    pub fn add_node(&mut self, v: Variable, off_lo: i32, off_hi: i32) -> Result<NodeId> {
        let n = self.freenode();
        let adjust = |off: i32| -> NodeId {
            if off == 0 {
                FALSE
            } else if off == -1 {
                TRUE
            } else {
                (n as i64 + off as i64) as NodeId
            }
        };
        self.abs_node(v, adjust(off_lo), adjust(off_hi))
    }

    /// Truncates the pool back to `mark`, discarding every node allocated
    /// since. Used by `Stack::pop`.
    pub fn truncate(&mut self, mark: NodeId) {
        self.nodes.truncate(mark as usize);
    }

    /// Swaps the contents of two pool slots and rewrites every live edge
    /// (in `[2, freenode)`) referencing either index so the swap is
    /// invisible to the rest of the structure. Used to relocate an
    /// intersection's result root onto a specific stack mark.
    pub fn swap(&mut self, x: NodeId, y: NodeId) {
        if x == y {
            return;
        }
        self.nodes.swap(x as usize, y as usize);
        let freenode = self.freenode();
        for i in 2..freenode {
            let node = &mut self.nodes[i as usize];
            if node.lo == x {
                node.lo = y;
            } else if node.lo == y {
                node.lo = x;
            }
            if node.hi == x {
                node.hi = y;
            } else if node.hi == y {
                node.hi = x;
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copies `src`'s fields onto `dst` in place (no allocation). Used when
    /// relocating an intersection result to a lower pool index than the one
    /// it was built at.
    pub fn overwrite(&mut self, dst: NodeId, src: NodeId) {
        self.nodes[dst as usize] = self.nodes[src as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_preinitialized() {
        let pool = Pool::new(1024);
        assert_eq!(pool.get(FALSE), Node { v: SENTINEL_VAR, lo: FALSE, hi: FALSE });
        assert_eq!(pool.get(TRUE), Node { v: SENTINEL_VAR, lo: TRUE, hi: TRUE });
        assert_eq!(pool.freenode(), 2);
    }

    #[test]
    fn add_node_offsets() {
        let mut pool = Pool::new(1024);
        let a = pool.add_node(3, 0, -1).unwrap(); // !3 ? FALSE : TRUE
        assert_eq!(pool.lo(a), FALSE);
        assert_eq!(pool.hi(a), TRUE);
        let b = pool.add_node(2, 1, 1).unwrap(); // both children point at `a`
        assert_eq!(pool.lo(b), a);
        assert_eq!(pool.hi(b), a);
    }

    #[test]
    fn pool_full_is_reported() {
        let mut pool = Pool::new(3);
        pool.abs_node(1, FALSE, TRUE).unwrap();
        let err = pool.abs_node(1, FALSE, TRUE).unwrap_err();
        assert_eq!(err, EngineError::PoolFull { capacity: 3 });
    }

    #[test]
    fn swap_rewrites_live_edges() {
        let mut pool = Pool::new(1024);
        let a = pool.abs_node(5, FALSE, TRUE).unwrap();
        let b = pool.abs_node(4, a, TRUE).unwrap();
        pool.swap(a, b);
        // b's old contents (v=4, lo=a, hi=TRUE) now live at `a`'s slot, and
        // any edge pointing at `b` now points at `a` and vice versa.
        assert_eq!(pool.v(a), 4);
        assert_eq!(pool.lo(a), b);
    }
}

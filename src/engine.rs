//! `ZddEngine`: the public facade tying [`Pool`], [`Stack`] and the
//! once-per-session `vmax` together into the single handle client code
//! drives. The reference keeps this state as process globals (`pool`,
//! `zddstack`, `vmax`); bundling it into a struct lets more than one engine
//! exist per process (useful for tests) without `unsafe` or thread-local
//! tricks.

use crate::combinators;
use crate::common::{NodeId, Variable, FALSE, TRUE};
use crate::error::{EngineError, Result};
use crate::intersect;
use crate::pool::Pool;
use crate::query::{self, CheckReport};
use crate::stack::Stack;
use num_bigint::BigUint;

pub struct ZddEngine {
    pool: Pool,
    stack: Stack,
    vmax: Option<Variable>,
}

impl ZddEngine {
    pub fn new(capacity: usize) -> Self {
        ZddEngine { pool: Pool::new(capacity), stack: Stack::new(), vmax: None }
    }

    /// Sets the ground-set size. Callable again only while the stack is
    /// empty, since every ZDD on the stack implicitly depends on the
    /// variable ordering `vmax` establishes.
    pub fn set_vmax(&mut self, vmax: Variable) -> Result<()> {
        if self.vmax.is_some() && !self.stack.is_empty() {
            return Err(EngineError::VmaxAlreadySet);
        }
        self.vmax = Some(vmax);
        Ok(())
    }

    pub fn vmax(&self) -> Result<Variable> {
        self.vmax.ok_or(EngineError::VmaxNotSet)
    }

    fn require_vmax(&self) -> Result<Variable> {
        self.vmax()
    }

    pub fn push(&mut self) {
        self.stack.push(&self.pool);
    }

    pub fn pop(&mut self) -> Result<NodeId> {
        self.stack.pop(&mut self.pool)
    }

    pub fn root(&self) -> Result<NodeId> {
        self.stack.root()
    }

    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        self.stack.set_root(root)
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn next_node(&self) -> NodeId {
        self.pool.freenode()
    }

    pub fn last_node(&self) -> NodeId {
        self.pool.last_node()
    }

    pub fn v(&self, n: NodeId) -> Variable {
        self.pool.v(n)
    }

    pub fn lo(&self, n: NodeId) -> NodeId {
        self.pool.lo(n)
    }

    pub fn hi(&self, n: NodeId) -> NodeId {
        self.pool.hi(n)
    }

    pub fn set_lo(&mut self, n: NodeId, lo: NodeId) {
        self.pool.set_lo(n, lo);
    }

    pub fn set_hi(&mut self, n: NodeId, hi: NodeId) {
        self.pool.set_hi(n, hi);
    }

    pub fn set_hilo(&mut self, n: NodeId, hilo: NodeId) {
        self.pool.set_hilo(n, hilo);
    }

    pub fn add_node(&mut self, v: Variable, off_lo: i32, off_hi: i32) -> Result<NodeId> {
        self.pool.add_node(v, off_lo, off_hi)
    }

    pub fn abs_node(&mut self, v: Variable, lo: NodeId, hi: NodeId) -> Result<NodeId> {
        self.pool.abs_node(v, lo, hi)
    }

    /// Size of the current top frame's region, sentinels included.
    pub fn size(&self) -> Result<u32> {
        Ok(query::size(&self.pool, self.stack.base()?))
    }

    /// Textual listing of every node in the current top frame's region, one
    /// `I<index>: !<v> ? <lo> : <hi>` line per node, matching the reference's
    /// `zdd_dump`.
    pub fn dump(&self) -> Result<String> {
        use std::fmt::Write;
        let base = self.stack.base()?;
        let mut out = String::new();
        for i in base..self.pool.freenode() {
            writeln!(out, "I{}: !{} ? {} : {}", i, self.pool.v(i), self.pool.lo(i), self.pool.hi(i)).unwrap();
        }
        Ok(out)
    }

    /// Scans the current top frame's region for reducedness violations.
    pub fn check(&self) -> Result<CheckReport> {
        Ok(query::check(&self.pool, self.stack.base()?))
    }

    pub fn count(&self) -> Result<BigUint> {
        Ok(query::count(&self.pool, self.stack.root()?))
    }

    pub fn count_1(&self) -> Result<(BigUint, BigUint)> {
        Ok(query::count_1(&self.pool, self.stack.root()?))
    }

    pub fn count_2(&self) -> Result<(BigUint, BigUint, BigUint)> {
        Ok(query::count_2(&self.pool, self.stack.root()?))
    }

    pub fn forall(&self, f: impl FnMut(&[Variable])) -> Result<()> {
        query::forall(&self.pool, self.stack.root()?, f);
        Ok(())
    }

    pub fn forlargest(&self, f: impl FnOnce(&[Variable])) -> Result<()> {
        query::forlargest(&self.pool, self.stack.root()?, f);
        Ok(())
    }

    pub fn powerset(&mut self) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::powerset(&mut self.pool, &mut self.stack, vmax)?;
        self.stack.root()
    }

    pub fn contains_none(&mut self, a: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::contains_none(&mut self.pool, &mut self.stack, vmax, a)?;
        self.stack.root()
    }

    pub fn contains_at_least_1(&mut self, a: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::contains_at_least_1(&mut self.pool, &mut self.stack, vmax, a)?;
        self.stack.root()
    }

    pub fn contains_at_most_1(&mut self, a: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::contains_at_most_1(&mut self.pool, &mut self.stack, vmax, a)?;
        self.stack.root()
    }

    pub fn contains_exactly_1(&mut self, a: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::contains_exactly_1(&mut self.pool, &mut self.stack, vmax, a)?;
        self.stack.root()
    }

    pub fn contains_exactly_n(&mut self, n: u32, a: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::contains_exactly_n(&mut self.pool, &mut self.stack, vmax, n, a)?;
        self.stack.root()
    }

    pub fn one_per_interval(&mut self, list: &[Variable]) -> Result<NodeId> {
        let vmax = self.require_vmax()?;
        combinators::one_per_interval(&mut self.pool, &mut self.stack, vmax, list)?;
        self.stack.root()
    }

    /// Intersects the top two ZDDs on the stack, replacing them with one
    /// frame holding the result. Fails if the result collapses to FALSE or
    /// TRUE -- use [`Self::intersection_allow_trivial`] when that is an
    /// expected outcome rather than a caller error.
    pub fn intersection(&mut self) -> Result<NodeId> {
        let root = intersect::intersection(&mut self.pool, &mut self.stack)?;
        if root == FALSE || root == TRUE {
            return Err(EngineError::TrivialIntersection);
        }
        Ok(root)
    }

    /// As [`Self::intersection`], but a trivial (FALSE/TRUE) result is
    /// returned rather than treated as an error.
    pub fn intersection_allow_trivial(&mut self) -> Result<NodeId> {
        intersect::intersection(&mut self.pool, &mut self.stack)
    }
}
